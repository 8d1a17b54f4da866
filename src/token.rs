use log::trace;
use serde::Serialize;
use std::fmt;
use std::mem;

/// The different kinds of tokens recognized by the scanner.
///
/// Variants without data represent punctuation, operators or keywords.
/// `STRING(String)` and `NUMBER(f64)` carry their literal values.
/// `IDENTIFIER` is used for user‑defined names.
/// `EOF` marks the end of input.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize)]
pub enum TokenType {
    // ── single‑character punctuation ─────────────────────────────────
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACE,
    RIGHT_BRACE,
    COMMA,
    DOT,
    SEMICOLON,
    QUESTION,
    COLON,
    TILDE,

    // ── arithmetic ───────────────────────────────────────────────────
    MINUS,
    MINUS_EQUAL,
    MINUS_MINUS,
    PLUS,
    PLUS_EQUAL,
    PLUS_PLUS,
    SLASH,
    SLASH_EQUAL,
    STAR,
    STAR_EQUAL,
    STAR_STAR,
    STAR_STAR_EQUAL,
    PERCENT,
    PERCENT_EQUAL,

    // ── bitwise ──────────────────────────────────────────────────────
    AMPERSAND,
    AMPERSAND_EQUAL,
    PIPE,
    PIPE_EQUAL,
    CARET,
    CARET_EQUAL,
    LESS_LESS,
    LESS_LESS_EQUAL,
    GREATER_GREATER,
    GREATER_GREATER_EQUAL,

    // ── comparison / assignment ──────────────────────────────────────
    BANG,
    BANG_EQUAL,
    EQUAL,
    EQUAL_EQUAL,
    GREATER,
    GREATER_EQUAL,
    LESS,
    LESS_EQUAL,

    /// A user‑defined identifier
    IDENTIFIER,

    /// A string literal (contents without quotes)
    STRING(String),

    /// A numeric literal
    #[serde(rename = "NUMBER")]
    NUMBER(f64),

    // ── keywords ─────────────────────────────────────────────────────
    AND,
    BREAK,
    CLASS,
    CONTINUE,
    ELSE,
    FALSE,
    FUN,
    FOR,
    IF,
    NIL,
    OR,
    PRINT,
    RETURN,
    SUPER,
    THIS,
    TRUE,
    VAR,
    WHILE,

    /// End‑of‑file marker
    EOF,
}

impl TokenType {
    /// For a compound assignment operator, the binary operator it applies
    /// (`+=` → `+`). `None` for every other token type.
    pub fn compound_base(&self) -> Option<TokenType> {
        let base = match self {
            TokenType::PLUS_EQUAL => TokenType::PLUS,
            TokenType::MINUS_EQUAL => TokenType::MINUS,
            TokenType::STAR_EQUAL => TokenType::STAR,
            TokenType::SLASH_EQUAL => TokenType::SLASH,
            TokenType::PERCENT_EQUAL => TokenType::PERCENT,
            TokenType::STAR_STAR_EQUAL => TokenType::STAR_STAR,
            TokenType::AMPERSAND_EQUAL => TokenType::AMPERSAND,
            TokenType::PIPE_EQUAL => TokenType::PIPE,
            TokenType::CARET_EQUAL => TokenType::CARET,
            TokenType::LESS_LESS_EQUAL => TokenType::LESS_LESS,
            TokenType::GREATER_GREATER_EQUAL => TokenType::GREATER_GREATER,
            _ => return None,
        };

        Some(base)
    }

    /// Variant name without payload, as printed by `tokenize`.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::LEFT_PAREN => "LEFT_PAREN",
            TokenType::RIGHT_PAREN => "RIGHT_PAREN",
            TokenType::LEFT_BRACE => "LEFT_BRACE",
            TokenType::RIGHT_BRACE => "RIGHT_BRACE",
            TokenType::COMMA => "COMMA",
            TokenType::DOT => "DOT",
            TokenType::SEMICOLON => "SEMICOLON",
            TokenType::QUESTION => "QUESTION",
            TokenType::COLON => "COLON",
            TokenType::TILDE => "TILDE",
            TokenType::MINUS => "MINUS",
            TokenType::MINUS_EQUAL => "MINUS_EQUAL",
            TokenType::MINUS_MINUS => "MINUS_MINUS",
            TokenType::PLUS => "PLUS",
            TokenType::PLUS_EQUAL => "PLUS_EQUAL",
            TokenType::PLUS_PLUS => "PLUS_PLUS",
            TokenType::SLASH => "SLASH",
            TokenType::SLASH_EQUAL => "SLASH_EQUAL",
            TokenType::STAR => "STAR",
            TokenType::STAR_EQUAL => "STAR_EQUAL",
            TokenType::STAR_STAR => "STAR_STAR",
            TokenType::STAR_STAR_EQUAL => "STAR_STAR_EQUAL",
            TokenType::PERCENT => "PERCENT",
            TokenType::PERCENT_EQUAL => "PERCENT_EQUAL",
            TokenType::AMPERSAND => "AMPERSAND",
            TokenType::AMPERSAND_EQUAL => "AMPERSAND_EQUAL",
            TokenType::PIPE => "PIPE",
            TokenType::PIPE_EQUAL => "PIPE_EQUAL",
            TokenType::CARET => "CARET",
            TokenType::CARET_EQUAL => "CARET_EQUAL",
            TokenType::LESS_LESS => "LESS_LESS",
            TokenType::LESS_LESS_EQUAL => "LESS_LESS_EQUAL",
            TokenType::GREATER_GREATER => "GREATER_GREATER",
            TokenType::GREATER_GREATER_EQUAL => "GREATER_GREATER_EQUAL",
            TokenType::BANG => "BANG",
            TokenType::BANG_EQUAL => "BANG_EQUAL",
            TokenType::EQUAL => "EQUAL",
            TokenType::EQUAL_EQUAL => "EQUAL_EQUAL",
            TokenType::GREATER => "GREATER",
            TokenType::GREATER_EQUAL => "GREATER_EQUAL",
            TokenType::LESS => "LESS",
            TokenType::LESS_EQUAL => "LESS_EQUAL",
            TokenType::IDENTIFIER => "IDENTIFIER",
            TokenType::STRING(_) => "STRING",
            TokenType::NUMBER(_) => "NUMBER",
            TokenType::AND => "AND",
            TokenType::BREAK => "BREAK",
            TokenType::CLASS => "CLASS",
            TokenType::CONTINUE => "CONTINUE",
            TokenType::ELSE => "ELSE",
            TokenType::FALSE => "FALSE",
            TokenType::FUN => "FUN",
            TokenType::FOR => "FOR",
            TokenType::IF => "IF",
            TokenType::NIL => "NIL",
            TokenType::OR => "OR",
            TokenType::PRINT => "PRINT",
            TokenType::RETURN => "RETURN",
            TokenType::SUPER => "SUPER",
            TokenType::THIS => "THIS",
            TokenType::TRUE => "TRUE",
            TokenType::VAR => "VAR",
            TokenType::WHILE => "WHILE",
            TokenType::EOF => "EOF",
        }
    }
}

impl PartialEq for TokenType {
    /// Two TokenTypes are equal if they share the same variant
    /// (ignoring any inner data). Uses `mem::discriminant` to compare.
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A scanned token, including its type, the original lexeme,
/// and the line/column where it starts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token<'a> {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact substring from the source that produced this token.
    /// Empty for semicolons inserted at a line break.
    pub lexeme: &'a str,

    /// 1‑based line number in the source.
    pub line: usize,

    /// 1‑based column of the first character of the lexeme.
    pub column: usize,
}

impl<'a> Token<'a> {
    /// Create a new Token with the given type, lexeme and position.
    pub fn new(token_type: TokenType, lexeme: &'a str, line: usize, column: usize) -> Self {
        trace!(
            "Creating new token: type={:?}, lexeme={}, line={}, column={}",
            token_type,
            lexeme,
            line,
            column
        );

        Self {
            token_type,
            lexeme,
            line,
            column,
        }
    }

    /// `true` for a semicolon the scanner inserted at a line break or at end
    /// of input.
    pub fn is_synthetic(&self) -> bool {
        self.token_type == TokenType::SEMICOLON && self.lexeme.is_empty()
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = self.token_type.name();

        match &self.token_type {
            TokenType::STRING(s) => write!(f, "{} {} {}", variant, self.lexeme, s),

            // 3 → "3.0", 3.14 → "3.14"
            TokenType::NUMBER(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                let mut buf = itoa::Buffer::new();
                write!(f, "{} {} {}.0", variant, self.lexeme, buf.format(*n as i64))
            }

            TokenType::NUMBER(n) => write!(f, "{} {} {}", variant, self.lexeme, n),

            _ => write!(f, "{} {} null", variant, self.lexeme),
        }
    }
}
