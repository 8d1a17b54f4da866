//! Module `scanner` implements a one‑pass, streaming lexer for the language.
//!
//! It transforms a source string into a sequence of `Token<'a>`s, skipping whitespace
//! and comments, and emitting exactly one `EOF` token at the end. Designed as a `FusedIterator`,
//! it can be chained safely with other iterator adapters.
//!
//! # Public API
//!
//! - `Scanner::new(src: &'a str) -> Scanner<'a>`
//!   Create a new lexer over the input buffer.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token<'a>, LoxError>` on each `.next()`, where `Ok(token)` is a scanned token
//!   and `Err` reports a lexing error with line/column information.
//!
//! - `scan_tokens(src)` collects the whole stream, or every lexing error found.
//!
//! # Token Recognition
//!
//! - Single‑character tokens: `(`, `)`, `{`, `}`, `,`, `.`, `;`, `?`, `:`, `~`.
//! - One‑ or two‑ or three‑character operators: `! != = == < <= << <<= > >= >> >>=`,
//!   `+ += ++ - -= -- * *= ** **= / /= % %= & &= | |= ^ ^=`.
//! - String literals: `"` … `"`, allowing multi‑line and reporting unterminated errors.
//! - Numeric literals: integer and optional fractional part.
//! - Identifiers/keywords: alphanumeric/_ sequences, resolved via a perfect‑hash `KEYWORDS` map.
//! - Comments: `//` to end of line (skipped with `memchr`) and nestable `/* … */`.
//!
//! # Automatic semicolons
//!
//! A line break (or the end of input) produces a `SEMICOLON` token with an empty
//! lexeme when all of the following hold:
//!
//! 1. the last emitted token can end a statement: an identifier, a literal,
//!    `this`, `)`, `++`, `--`, `break`, `continue` or `return`;
//! 2. no parenthesis is open;
//! 3. that last token is not the `)` closing an `if`/`while`/`for` header;
//! 4. the next non‑blank character is not one of `{ ) . , ? :`.

use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};
use log::{debug, info, trace};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"      => TokenType::AND,
    b"break"    => TokenType::BREAK,
    b"class"    => TokenType::CLASS,
    b"continue" => TokenType::CONTINUE,
    b"else"     => TokenType::ELSE,
    b"false"    => TokenType::FALSE,
    b"fun"      => TokenType::FUN,
    b"for"      => TokenType::FOR,
    b"if"       => TokenType::IF,
    b"nil"      => TokenType::NIL,
    b"or"       => TokenType::OR,
    b"print"    => TokenType::PRINT,
    b"return"   => TokenType::RETURN,
    b"super"    => TokenType::SUPER,
    b"this"     => TokenType::THIS,
    b"true"     => TokenType::TRUE,
    b"var"      => TokenType::VAR,
    b"while"    => TokenType::WHILE,
};

/// What an open `(` started; decides whether its `)` may end a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paren {
    Plain,
    /// `if (`, `while (`, `for (`.
    Header,
    /// Parameter list of a lambda (`fun (`).
    Params,
}

/// A single pass **scanner / lexer** that converts source text into a
/// sequence of [`Token`]s.  The lifetime `'a` ties every emitted token’s
/// `lexeme` slice back to the original source buffer.
pub struct Scanner<'a> {
    src: &'a str,               // entire source file
    bytes: &'a [u8],            // `src` viewed as bytes
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    line_start: usize,          // index of the first byte of the current line
    token_line: usize,          // line where the current lexeme starts
    token_column: usize,        // column where the current lexeme starts
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
    synthetic: bool,            // pending token is an inserted semicolon
    last: Option<TokenType>,    // kind of the last emitted token
    parens: Vec<Paren>,         // kinds of the currently open parens
    closed_paren: Option<Paren>, // kind of the paren the last `)` closed
    braces: Vec<bool>,          // open braces; `true` for a lambda body
    closed_lambda: bool,        // the last `}` closed a lambda body
    done: bool,                 // EOF already emitted
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            bytes: src.as_bytes(),
            start: 0,
            curr: 0,
            line: 1,
            line_start: 0,
            token_line: 1,
            token_column: 1,
            pending: None,
            synthetic: false,
            last: None,
            parens: Vec::new(),
            closed_paren: None,
            braces: Vec::new(),
            closed_lambda: false,
            done: false,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  Higher‑level code always guards with
    /// [`Self::is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.bytes[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` past EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.bytes[self.curr]
        }
    }

    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.curr + 1 >= self.len() {
            0
        } else {
            self.bytes[self.curr + 1]
        }
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Record that the byte just consumed was a `\n`.
    #[inline(always)]
    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.curr;
    }

    #[inline(always)]
    fn column(&self) -> usize {
        self.curr - self.line_start + 1
    }

    fn emit(&mut self, tt: TokenType) {
        self.pending = Some(tt);
    }

    /// Pick between a plain operator and its `=`‑suffixed compound form.
    fn with_equal(&mut self, compound: TokenType, plain: TokenType) {
        let tt = if self.match_byte(b'=') { compound } else { plain };
        self.emit(tt);
    }

    // ───────────────────────────── automatic semicolons ─────────────────────

    /// Could the statement end right after the last emitted token?
    fn wants_semicolon(&self) -> bool {
        if !self.parens.is_empty() {
            return false;
        }

        match &self.last {
            Some(
                TokenType::IDENTIFIER
                | TokenType::STRING(_)
                | TokenType::NUMBER(_)
                | TokenType::TRUE
                | TokenType::FALSE
                | TokenType::NIL
                | TokenType::THIS
                | TokenType::PLUS_PLUS
                | TokenType::MINUS_MINUS
                | TokenType::BREAK
                | TokenType::CONTINUE
                | TokenType::RETURN,
            ) => true,
            Some(TokenType::RIGHT_PAREN) => self.closed_paren != Some(Paren::Header),
            Some(TokenType::RIGHT_BRACE) => self.closed_lambda,
            _ => false,
        }
    }

    /// Does the next non‑blank character continue the current statement?
    fn continues_on_next_line(&self) -> bool {
        self.bytes[self.curr..]
            .iter()
            .copied()
            .find(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
            .is_some_and(|b| matches!(b, b'{' | b')' | b'.' | b',' | b'?' | b':'))
    }

    fn note_emitted(&mut self, tt: &TokenType) {
        match tt {
            TokenType::LEFT_PAREN => {
                let kind = match self.last {
                    Some(TokenType::IF | TokenType::WHILE | TokenType::FOR) => Paren::Header,
                    Some(TokenType::FUN) => Paren::Params,
                    _ => Paren::Plain,
                };
                self.parens.push(kind);
            }
            TokenType::RIGHT_PAREN => {
                self.closed_paren = self.parens.pop();
            }
            TokenType::LEFT_BRACE => {
                let lambda = self.last == Some(TokenType::RIGHT_PAREN)
                    && self.closed_paren == Some(Paren::Params);
                self.braces.push(lambda);
            }
            TokenType::RIGHT_BRACE => {
                self.closed_lambda = self.braces.pop().unwrap_or(false);
            }
            _ => {}
        }

        self.last = Some(tt.clone());
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces an
    /// actual token the kind is stored in `self.pending`.  Whitespace and
    /// comments are skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => self.emit(TokenType::LEFT_PAREN),
            b')' => self.emit(TokenType::RIGHT_PAREN),
            b'{' => self.emit(TokenType::LEFT_BRACE),
            b'}' => {
                if self.wants_semicolon() {
                    // End the statement first; the brace is scanned again.
                    trace!("Inserting semicolon before '}}' on line {}", self.line);
                    self.curr = self.start;
                    self.synthetic = true;
                    self.emit(TokenType::SEMICOLON);
                } else {
                    self.emit(TokenType::RIGHT_BRACE);
                }
            }
            b',' => self.emit(TokenType::COMMA),
            b'.' => self.emit(TokenType::DOT),
            b';' => self.emit(TokenType::SEMICOLON),
            b'?' => self.emit(TokenType::QUESTION),
            b':' => self.emit(TokenType::COLON),
            b'~' => self.emit(TokenType::TILDE),

            // ── operators with compound / doubled forms ──────────────────
            b'-' => {
                if self.match_byte(b'-') {
                    self.emit(TokenType::MINUS_MINUS);
                } else {
                    self.with_equal(TokenType::MINUS_EQUAL, TokenType::MINUS);
                }
            }

            b'+' => {
                if self.match_byte(b'+') {
                    self.emit(TokenType::PLUS_PLUS);
                } else {
                    self.with_equal(TokenType::PLUS_EQUAL, TokenType::PLUS);
                }
            }

            b'*' => {
                if self.match_byte(b'*') {
                    self.with_equal(TokenType::STAR_STAR_EQUAL, TokenType::STAR_STAR);
                } else {
                    self.with_equal(TokenType::STAR_EQUAL, TokenType::STAR);
                }
            }

            b'%' => self.with_equal(TokenType::PERCENT_EQUAL, TokenType::PERCENT),
            b'&' => self.with_equal(TokenType::AMPERSAND_EQUAL, TokenType::AMPERSAND),
            b'|' => self.with_equal(TokenType::PIPE_EQUAL, TokenType::PIPE),
            b'^' => self.with_equal(TokenType::CARET_EQUAL, TokenType::CARET),
            b'!' => self.with_equal(TokenType::BANG_EQUAL, TokenType::BANG),
            b'=' => self.with_equal(TokenType::EQUAL_EQUAL, TokenType::EQUAL),

            b'<' => {
                if self.match_byte(b'<') {
                    self.with_equal(TokenType::LESS_LESS_EQUAL, TokenType::LESS_LESS);
                } else {
                    self.with_equal(TokenType::LESS_EQUAL, TokenType::LESS);
                }
            }

            b'>' => {
                if self.match_byte(b'>') {
                    self.with_equal(
                        TokenType::GREATER_GREATER_EQUAL,
                        TokenType::GREATER_GREATER,
                    );
                } else {
                    self.with_equal(TokenType::GREATER_EQUAL, TokenType::GREATER);
                }
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => {
                return Ok(()); // skip insignificants
            }

            b'\n' => {
                if self.wants_semicolon() && !self.continues_on_next_line() {
                    trace!("Inserting semicolon at end of line {}", self.line);
                    self.synthetic = true;
                    self.emit(TokenType::SEMICOLON);
                }

                self.newline();

                return Ok(());
            }

            // ── comments and slash operators ─────────────────────────────
            b'/' => {
                if self.match_byte(b'/') {
                    // Fast‑forward to the next newline; the newline itself is
                    // scanned normally so line tracking stays in one place.
                    if let Some(pos) = memchr(b'\n', &self.bytes[self.curr..]) {
                        self.curr += pos;
                    } else {
                        self.curr = self.len();
                    }

                    return Ok(());
                }

                if self.match_byte(b'*') {
                    return self.skip_block_comment();
                }

                self.with_equal(TokenType::SLASH_EQUAL, TokenType::SLASH);
            }

            // ── string literal " … " ─────────────────────────────────────
            b'"' => {
                return self.parse_string();
            }

            // ── number literal (digit‑leading) ───────────────────────────
            b'0'..=b'9' => {
                self.parse_number();
            }

            // ── identifiers / keywords (alpha or underscore‑leading) ─────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.parse_identifier();
            }

            // ── unexpected character ─────────────────────────────────────
            _ => {
                let c = self.src[self.start..].chars().next().unwrap_or('\u{FFFD}');
                self.curr = self.start + c.len_utf8();

                return Err(LoxError::lex(
                    self.token_line,
                    self.token_column,
                    format!("Unexpected character: {}", c),
                ));
            }
        }

        Ok(())
    }

    /// Skip a `/* … */` comment; comments nest.
    fn skip_block_comment(&mut self) -> Result<()> {
        let mut depth = 1usize;

        while depth > 0 {
            if self.is_at_end() {
                return Err(LoxError::lex(
                    self.token_line,
                    self.token_column,
                    "Unterminated block comment.",
                ));
            }

            match self.advance() {
                b'\n' => self.newline(),
                b'/' if self.peek() == b'*' => {
                    self.advance();
                    depth += 1;
                }
                b'*' if self.peek() == b'/' => {
                    self.advance();
                    depth -= 1;
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Parse a double‑quoted string literal.
    ///
    /// * `self.start` still points to the opening `"`.
    /// * When we return, `self.curr` points **past** the closing `"`.
    fn parse_string(&mut self) -> Result<()> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.newline(); // multi‑line strings are allowed
            }
        }

        if self.is_at_end() {
            return Err(LoxError::lex(
                self.token_line,
                self.token_column,
                "Unterminated string.",
            ));
        }

        self.advance(); // consume closing quote

        // Slice excluding the surrounding quotes; both are ASCII so the
        // boundaries are valid char boundaries.
        let s: &str = &self.src[self.start + 1..self.curr - 1];

        self.emit(TokenType::STRING(s.to_owned()));

        Ok(())
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional.
    fn parse_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Optional fractional part.
        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume "."

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let s: &str = &self.src[self.start..self.curr];
        let n: f64 = s.parse::<f64>().unwrap_or(0.0); // digits only, cannot fail
        self.emit(TokenType::NUMBER(n));
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let slice: &[u8] = &self.bytes[self.start..self.curr];

        let tt: TokenType = KEYWORDS
            .get(slice)
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER);

        self.emit(tt);
    }

    fn make_token(&mut self, tt: TokenType) -> Token<'a> {
        let lexeme: &'a str = if self.synthetic {
            ""
        } else {
            &self.src[self.start..self.curr]
        };

        self.note_emitted(&tt);

        Token::new(tt, lexeme, self.token_line, self.token_column)
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>; // alias = Result<T, LoxError>

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Loop until we either emit a token, hit EOF, or see an error.
        loop {
            self.start = self.curr;
            self.token_line = self.line;
            self.token_column = self.column();
            self.pending = None;
            self.synthetic = false;

            // 1. EOF – close a dangling statement, then emit exactly one EOF.
            if self.is_at_end() {
                if self.wants_semicolon() {
                    self.synthetic = true;
                    return Some(Ok(self.make_token(TokenType::SEMICOLON)));
                }

                self.done = true;
                debug!("Reached end of input at line {}", self.line);

                return Some(Ok(self.make_token(TokenType::EOF)));
            }

            // 2. Attempt to scan a token.
            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            // 3. If a real token was recognised, build and return it.
            if let Some(tt) = self.pending.take() {
                trace!("Scanned token ({:?}) on line {}", tt, self.token_line);

                return Some(Ok(self.make_token(tt)));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }
    }
}

impl<'a> FusedIterator for Scanner<'a> {}

/// Scan the whole of `src`.  Returns every token (ending with `EOF`) or, if
/// any lexical error occurred, every error in source order.
pub fn scan_tokens(src: &str) -> std::result::Result<Vec<Token<'_>>, Vec<LoxError>> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for item in Scanner::new(src) {
        match item {
            Ok(token) => tokens.push(token),
            Err(e) => errors.push(e),
        }
    }

    info!(
        "Scanned {} token(s) with {} error(s)",
        tokens.len(),
        errors.len()
    );

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}
