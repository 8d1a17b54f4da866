#[cfg(test)]
mod scanner_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::scanner::*;
    use lox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        let actual: Vec<(&str, &str)> = tokens
            .iter()
            .map(|t| (t.token_type.name(), t.lexeme))
            .collect();
        let wanted: Vec<(&str, &str)> = expected
            .iter()
            .map(|(tt, lexeme)| (tt.name(), *lexeme))
            .collect();

        assert_eq!(actual, wanted);
    }

    fn number() -> TokenType {
        TokenType::NUMBER(0.0)
    }

    fn string() -> TokenType {
        TokenType::STRING(String::new())
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::SEMICOLON, ""),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_compound_operators() {
        assert_token_sequence(
            "+= -= *= /= %= **= &= |= ^= <<= >>= ++ -- ** << >> ~ ? : == != <= >=",
            &[
                (TokenType::PLUS_EQUAL, "+="),
                (TokenType::MINUS_EQUAL, "-="),
                (TokenType::STAR_EQUAL, "*="),
                (TokenType::SLASH_EQUAL, "/="),
                (TokenType::PERCENT_EQUAL, "%="),
                (TokenType::STAR_STAR_EQUAL, "**="),
                (TokenType::AMPERSAND_EQUAL, "&="),
                (TokenType::PIPE_EQUAL, "|="),
                (TokenType::CARET_EQUAL, "^="),
                (TokenType::LESS_LESS_EQUAL, "<<="),
                (TokenType::GREATER_GREATER_EQUAL, ">>="),
                (TokenType::PLUS_PLUS, "++"),
                (TokenType::MINUS_MINUS, "--"),
                (TokenType::STAR_STAR, "**"),
                (TokenType::LESS_LESS, "<<"),
                (TokenType::GREATER_GREATER, ">>"),
                (TokenType::TILDE, "~"),
                (TokenType::QUESTION, "?"),
                (TokenType::COLON, ":"),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_literals() {
        assert_token_sequence(
            "class break continue fun_ny \"hi\" 12.5;",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::BREAK, "break"),
                (TokenType::CONTINUE, "continue"),
                (TokenType::IDENTIFIER, "fun_ny"),
                (string(), "\"hi\""),
                (number(), "12.5"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let results: Vec<_> = Scanner::new(",.$(#").collect();

        // COMMA, DOT, error, LEFT_PAREN, error, EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        let kinds: Vec<&str> = results
            .iter()
            .map(|r| match r {
                Ok(t) => t.token_type.name(),
                Err(_) => "error",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["COMMA", "DOT", "error", "LEFT_PAREN", "error", "EOF"]
        );

        let messages: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(|e| e.to_string())
            .collect();
        assert_eq!(
            messages,
            vec![
                "[line 1:3] Error: Unexpected character: $".to_string(),
                "[line 1:5] Error: Unexpected character: #".to_string(),
            ]
        );
    }

    #[test]
    fn semicolon_inserted_at_line_break() {
        assert_token_sequence(
            "var a = 1\nprint a\n",
            &[
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "a"),
                (TokenType::EQUAL, "="),
                (number(), "1"),
                (TokenType::SEMICOLON, ""),
                (TokenType::PRINT, "print"),
                (TokenType::IDENTIFIER, "a"),
                (TokenType::SEMICOLON, ""),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn no_semicolon_inside_parentheses() {
        assert_token_sequence(
            "f(1,\n2)\n",
            &[
                (TokenType::IDENTIFIER, "f"),
                (TokenType::LEFT_PAREN, "("),
                (number(), "1"),
                (TokenType::COMMA, ","),
                (number(), "2"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::SEMICOLON, ""),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn no_semicolon_after_control_header() {
        assert_token_sequence(
            "while (f(x))\nx--\n",
            &[
                (TokenType::WHILE, "while"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::IDENTIFIER, "f"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::MINUS_MINUS, "--"),
                (TokenType::SEMICOLON, ""),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn no_semicolon_when_next_line_continues() {
        assert_token_sequence(
            "a\n  .b\nc\n? 1\n: 2",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::DOT, "."),
                (TokenType::IDENTIFIER, "b"),
                (TokenType::SEMICOLON, ""),
                (TokenType::IDENTIFIER, "c"),
                (TokenType::QUESTION, "?"),
                (number(), "1"),
                (TokenType::COLON, ":"),
                (number(), "2"),
                (TokenType::SEMICOLON, ""),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn semicolon_inserted_before_closing_brace() {
        assert_token_sequence(
            "{ a }",
            &[
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::IDENTIFIER, "a"),
                (TokenType::SEMICOLON, ""),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn semicolon_after_lambda_body_but_not_block() {
        assert_token_sequence(
            "f = fun() { }\nif (x) { }\n",
            &[
                (TokenType::IDENTIFIER, "f"),
                (TokenType::EQUAL, "="),
                (TokenType::FUN, "fun"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::SEMICOLON, ""),
                (TokenType::IF, "if"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn explicit_semicolon_is_not_doubled() {
        assert_token_sequence(
            "a;\n}\n",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn comments_are_skipped_and_lines_counted() {
        let tokens = scan_tokens("// one\n/* two /* nested */\n still */ x;").unwrap();

        assert_eq!(tokens[0].lexeme, "x");
        assert_eq!((tokens[0].line, tokens[0].column), (3, 11));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn multi_line_string_keeps_start_position() {
        let tokens = scan_tokens("  \"a\nb\" x;").unwrap();

        assert_eq!(tokens[0].token_type, string());
        assert_eq!((tokens[0].line, tokens[0].column), (1, 3));
        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "a\nb"),
            other => panic!("expected a string, got {:?}", other),
        }
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn unterminated_literals_are_errors() {
        let errors = scan_tokens("\"abc").unwrap_err();
        assert_eq!(errors[0].to_string(), "[line 1:1] Error: Unterminated string.");

        let errors = scan_tokens("x /* never closed").unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "[line 1:3] Error: Unterminated block comment."
        );
    }

    #[test]
    fn token_display_matches_tokenize_output() {
        let tokens = scan_tokens("(3 2.5 \"hi\"").unwrap();
        let lines: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();

        assert_eq!(
            lines,
            vec![
                "LEFT_PAREN ( null",
                "NUMBER 3 3.0",
                "NUMBER 2.5 2.5",
                "STRING \"hi\" hi",
                "EOF  null",
            ]
        );
    }
}
