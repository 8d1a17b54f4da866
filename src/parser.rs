/*!
Recursive‑descent parser producing the [`crate::ast`] tree.

### Cost

Each token is consumed once via `advance()`; error recovery (`synchronize`)
discards tokens up to the next statement boundary.  Overall **Θ(n)** in the
number of tokens, with call‑stack depth growing with syntactic nesting.

### Errors

Syntax errors never escape a single production: `declaration` records the
error, resynchronises and moves on, so one pass surfaces every independent
error.  A declaration that failed contributes no node.  Non‑fatal problems
(invalid assignment target, too many parameters) are recorded without
unwinding at all.

### Logging Policy

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`       | `info` | Lifecycle milestones.                     |
| `declaration`, `statement`   | `debug`| High‑level descent into grammar branches. |
| `synchronize`                | `debug`| Where recovery resumed.                   |

--------------------------------------------------------------------------------
Grammar (EBNF, lowest to highest precedence)
--------------------------------------------------------------------------------

```text
program        → declaration* EOF ;
declaration    → classDecl | funDecl | varDecl | statement ;
classDecl      → "class" IDENT ( "<" IDENT )? "{" function* "}" ;
funDecl        → "fun" function ;
function       → IDENT functionBody ;
functionBody   → "(" parameters? ")" block ;
varDecl        → "var" IDENT ( "=" expression )? ";" ;
statement      → exprStmt | forStmt | ifStmt | printStmt | returnStmt
               | whileStmt | breakStmt | block | ";" ;
breakStmt      → ( "break" | "continue" ) ";" ;
block          → "{" declaration* "}" ;

expression     → comma ;
comma          → assignment ( "," assignment )* ;
assignment     → ( call "." )? IDENT ( "=" | "+=" | "-=" | "*=" | "/=" | "%="
                 | "**=" | "&=" | "|=" | "^=" | "<<=" | ">>=" ) assignment
               | conditional ;
conditional    → logic_or ( "?" expression ":" conditional )? ;
logic_or       → logic_and ( "or" logic_and )* ;
logic_and      → bit_or ( "and" bit_or )* ;
bit_or         → bit_xor ( "|" bit_xor )* ;
bit_xor        → bit_and ( "^" bit_and )* ;
bit_and        → equality ( "&" equality )* ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → shift ( ( ">" | ">=" | "<" | "<=" ) shift )* ;
shift          → term ( ( "<<" | ">>" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → unary ( ( "/" | "*" | "%" ) unary )* ;
unary          → ( "!" | "-" | "+" | "~" ) unary | exponent ;
exponent       → prefix ( "**" unary )* ;
prefix         → ( "++" | "--" ) primary | postfix ;
postfix        → primary ( "++" | "--" ) | call ;
call           → primary ( "(" arguments? ")" | "." IDENT )* ;
arguments      → assignment ( "," assignment )* ;
primary        → NUMBER | STRING | "true" | "false" | "nil" | "this"
               | IDENT | "(" expression ")" | "fun" functionBody
               | "super" "." IDENT ;
```
*/

use crate::ast::{Expr, ExprId, FunctionDecl, FunctionExpr, LiteralValue, Stmt};
use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Maximum number of parameters or call arguments.
const MAX_ARITY: usize = 255;

const ASSIGNMENT_OPERATORS: [TokenType; 12] = [
    TokenType::EQUAL,
    TokenType::PLUS_EQUAL,
    TokenType::MINUS_EQUAL,
    TokenType::STAR_EQUAL,
    TokenType::SLASH_EQUAL,
    TokenType::PERCENT_EQUAL,
    TokenType::STAR_STAR_EQUAL,
    TokenType::AMPERSAND_EQUAL,
    TokenType::PIPE_EQUAL,
    TokenType::CARET_EQUAL,
    TokenType::LESS_LESS_EQUAL,
    TokenType::GREATER_GREATER_EQUAL,
];

/// Top‑level parser over an immutable slice of tokens.
///
/// The slice must end with an `EOF` token, as produced by the scanner.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    current: usize,
    next_id: usize,
    errors: Vec<LoxError>,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self {
            tokens,
            current: 0,
            next_id: 0,
            errors: Vec::new(),
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program and return its statement list, or every
    /// syntax error found in the pass.
    pub fn parse(&mut self) -> std::result::Result<Vec<Stmt<'a>>, Vec<LoxError>> {
        info!("Beginning parse phase");

        let mut statements: Vec<Stmt<'a>> = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        if self.errors.is_empty() {
            info!("Parsed {} statement(s)", statements.len());
            Ok(statements)
        } else {
            info!("Parse finished with {} error(s)", self.errors.len());
            Err(std::mem::take(&mut self.errors))
        }
    }

    // ──────────────────────── declaration rules ───────────────────

    fn declaration(&mut self) -> Option<Stmt<'a>> {
        debug!("Entering declaration at token {}", self.current);

        let result = if self.matches(TokenType::CLASS) {
            self.class_declaration()
        } else if self.check(TokenType::FUN) && self.check_next(TokenType::IDENTIFIER) {
            self.advance();
            self.function("function").map(Stmt::Function)
        } else if self.matches(TokenType::VAR) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(e) => {
                self.errors.push(e);
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> Result<Stmt<'a>> {
        let name: &'a Token<'a> = self.consume(TokenType::IDENTIFIER, "Expect class name.")?;

        let superclass: Option<Expr<'a>> = if self.matches(TokenType::LESS) {
            let super_name = self.consume(TokenType::IDENTIFIER, "Expect superclass name.")?;

            Some(Expr::Variable {
                id: self.next_id(),
                name: super_name,
            })
        } else {
            None
        };

        self.consume(TokenType::LEFT_BRACE, "Expect '{' before class body.")?;

        let mut methods: Vec<FunctionDecl<'a>> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }

        self.consume(TokenType::RIGHT_BRACE, "Expect '}' after class body.")?;

        Ok(Stmt::Class {
            name,
            superclass,
            methods,
        })
    }

    fn function(&mut self, kind: &str) -> Result<FunctionDecl<'a>> {
        let name: &'a Token<'a> =
            self.consume(TokenType::IDENTIFIER, &format!("Expect {} name.", kind))?;

        let function = self.function_body(kind, name)?;

        Ok(FunctionDecl { name, function })
    }

    /// `"(" parameters? ")" block`, shared by declarations, methods and lambdas.
    fn function_body(&mut self, kind: &str, keyword: &'a Token<'a>) -> Result<FunctionExpr<'a>> {
        self.consume(
            TokenType::LEFT_PAREN,
            &format!("Expect '(' after {} name.", kind),
        )?;

        let mut params: Vec<&'a Token<'a>> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARITY {
                    let error = LoxError::parse(
                        self.peek(),
                        format!("Can't have more than {} parameters.", MAX_ARITY),
                    );
                    self.errors.push(error);
                }

                params.push(self.consume(TokenType::IDENTIFIER, "Expect parameter name.")?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after parameters.")?;

        self.consume(
            TokenType::LEFT_BRACE,
            &format!("Expect '{{' before {} body.", kind),
        )?;

        let body: Vec<Stmt<'a>> = self.block()?;

        Ok(FunctionExpr {
            keyword,
            params,
            body,
        })
    }

    fn var_declaration(&mut self) -> Result<Stmt<'a>> {
        let name: &'a Token<'a> = self.consume(TokenType::IDENTIFIER, "Expect variable name.")?;

        let initializer: Option<Expr<'a>> = if self.matches(TokenType::EQUAL) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "Expect ';' after variable declaration.",
        )?;

        Ok(Stmt::Var { name, initializer })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt<'a>> {
        debug!("Parsing statement starting with {:?}", self.peek().token_type);

        if self.matches(TokenType::SEMICOLON) {
            // Empty statement.
            Ok(Stmt::Block(Vec::new()))
        } else if self.matches(TokenType::FOR) {
            self.for_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::BREAK) || self.matches(TokenType::CONTINUE) {
            self.break_statement()
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Stmt::Block(self.block()?))
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    /// `for` is sugar: `{ init; while (cond) body; incr }`, with the increment
    /// attached to the loop so `continue` still runs it.
    fn for_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume(TokenType::LEFT_PAREN, "Expect '(' after 'for'.")?;

        let initializer: Option<Stmt<'a>> = if self.matches(TokenType::SEMICOLON) {
            None
        } else if self.matches(TokenType::VAR) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition: Expr<'a> = if !self.check(TokenType::SEMICOLON) {
            self.expression()?
        } else {
            Expr::Literal(LiteralValue::Bool(true))
        };

        self.consume(TokenType::SEMICOLON, "Expect ';' after loop condition.")?;

        let increment: Option<Expr<'a>> = if !self.check(TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after for clauses.")?;

        let body = Box::new(self.statement()?);

        let looped = Stmt::While {
            condition,
            body,
            increment,
        };

        Ok(match initializer {
            Some(init) => Stmt::Block(vec![init, looped]),
            None => looped,
        })
    }

    fn break_statement(&mut self) -> Result<Stmt<'a>> {
        let keyword: &'a Token<'a> = self.previous();

        self.consume(
            TokenType::SEMICOLON,
            &format!("Expect ';' after '{}'.", keyword.lexeme),
        )?;

        Ok(Stmt::Break { keyword })
    }

    fn print_statement(&mut self) -> Result<Stmt<'a>> {
        let value: Expr<'a> = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expect ';' after value.")?;

        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> Result<Stmt<'a>> {
        let expr: Expr<'a> = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expect ';' after expression.")?;

        Ok(Stmt::Expression(expr))
    }

    fn if_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume(TokenType::LEFT_PAREN, "Expect '(' after 'if'.")?;
        let condition: Expr<'a> = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after if condition.")?;

        let then_branch: Box<Stmt<'a>> = Box::new(self.statement()?);
        let else_branch: Option<Box<Stmt<'a>>> = if self.matches(TokenType::ELSE) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume(TokenType::LEFT_PAREN, "Expect '(' after 'while'.")?;
        let condition: Expr<'a> = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after condition.")?;
        let body: Box<Stmt<'a>> = Box::new(self.statement()?);

        Ok(Stmt::While {
            condition,
            body,
            increment: None,
        })
    }

    fn return_statement(&mut self) -> Result<Stmt<'a>> {
        let keyword: &'a Token<'a> = self.previous();
        let value: Option<Expr<'a>> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expect ';' after return value.")?;

        Ok(Stmt::Return { keyword, value })
    }

    fn block(&mut self) -> Result<Vec<Stmt<'a>>> {
        let mut statements: Vec<Stmt<'a>> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenType::RIGHT_BRACE, "Expect '}' after block.")?;

        Ok(statements)
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Expr<'a>> {
        self.comma()
    }

    fn comma(&mut self) -> Result<Expr<'a>> {
        self.left_assoc(&[TokenType::COMMA], Self::assignment)
    }

    fn assignment(&mut self) -> Result<Expr<'a>> {
        let expr: Expr<'a> = self.conditional()?;

        if !self.matches_any(&ASSIGNMENT_OPERATORS) {
            return Ok(expr);
        }

        let operator: &'a Token<'a> = self.previous();
        let value: Box<Expr<'a>> = Box::new(self.assignment()?);

        match expr {
            Expr::Variable { name, .. } => Ok(Expr::Assign {
                id: self.next_id(),
                name,
                operator,
                value,
            }),

            Expr::Get { object, name } => Ok(Expr::Set {
                object,
                name,
                operator,
                value,
            }),

            other => {
                // Reported, not thrown: the parser is not confused.
                self.errors
                    .push(LoxError::parse(operator, "Invalid assignment target."));

                Ok(other)
            }
        }
    }

    fn conditional(&mut self) -> Result<Expr<'a>> {
        let condition: Expr<'a> = self.logical_or()?;

        if !self.matches(TokenType::QUESTION) {
            return Ok(condition);
        }

        let then_branch: Expr<'a> = self.expression()?;

        self.consume(
            TokenType::COLON,
            "Expect ':' after then branch of conditional expression.",
        )?;

        let else_branch: Expr<'a> = self.conditional()?;

        Ok(Expr::Ternary {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn logical_or(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let operator: &'a Token<'a> = self.previous();
            let right: Expr<'a> = self.logical_and()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.bit_or()?;

        while self.matches(TokenType::AND) {
            let operator: &'a Token<'a> = self.previous();
            let right: Expr<'a> = self.bit_or()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn bit_or(&mut self) -> Result<Expr<'a>> {
        self.left_assoc(&[TokenType::PIPE], Self::bit_xor)
    }

    fn bit_xor(&mut self) -> Result<Expr<'a>> {
        self.left_assoc(&[TokenType::CARET], Self::bit_and)
    }

    fn bit_and(&mut self) -> Result<Expr<'a>> {
        self.left_assoc(&[TokenType::AMPERSAND], Self::equality)
    }

    fn equality(&mut self) -> Result<Expr<'a>> {
        self.left_assoc(
            &[TokenType::BANG_EQUAL, TokenType::EQUAL_EQUAL],
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> Result<Expr<'a>> {
        self.left_assoc(
            &[
                TokenType::GREATER,
                TokenType::GREATER_EQUAL,
                TokenType::LESS,
                TokenType::LESS_EQUAL,
            ],
            Self::shift,
        )
    }

    fn shift(&mut self) -> Result<Expr<'a>> {
        self.left_assoc(
            &[TokenType::LESS_LESS, TokenType::GREATER_GREATER],
            Self::term,
        )
    }

    fn term(&mut self) -> Result<Expr<'a>> {
        self.left_assoc(&[TokenType::MINUS, TokenType::PLUS], Self::factor)
    }

    fn factor(&mut self) -> Result<Expr<'a>> {
        self.left_assoc(
            &[TokenType::STAR, TokenType::SLASH, TokenType::PERCENT],
            Self::unary,
        )
    }

    fn unary(&mut self) -> Result<Expr<'a>> {
        if self.matches_any(&[
            TokenType::BANG,
            TokenType::MINUS,
            TokenType::PLUS,
            TokenType::TILDE,
        ]) {
            let operator: &'a Token<'a> = self.previous();
            let operand: Expr<'a> = self.unary()?;

            return Ok(Expr::Unary {
                operator,
                operand: Box::new(operand),
                postfix: false,
            });
        }

        self.exponent()
    }

    /// `**` is right‑associative: its right operand re‑enters at `unary`.
    fn exponent(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.prefix()?;

        while self.matches(TokenType::STAR_STAR) {
            let operator: &'a Token<'a> = self.previous();
            let right: Expr<'a> = self.unary()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn prefix(&mut self) -> Result<Expr<'a>> {
        if self.matches_any(&[TokenType::PLUS_PLUS, TokenType::MINUS_MINUS]) {
            let operator: &'a Token<'a> = self.previous();
            let operand: Expr<'a> = self.primary()?;

            return Ok(Expr::Unary {
                operator,
                operand: Box::new(operand),
                postfix: false,
            });
        }

        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr<'a>> {
        let single_token_primary = matches!(
            self.peek().token_type,
            TokenType::IDENTIFIER
                | TokenType::NUMBER(_)
                | TokenType::STRING(_)
                | TokenType::TRUE
                | TokenType::FALSE
                | TokenType::NIL
                | TokenType::THIS
        );

        if single_token_primary
            && (self.check_next(TokenType::PLUS_PLUS) || self.check_next(TokenType::MINUS_MINUS))
        {
            let operand: Expr<'a> = self.primary()?;
            let operator: &'a Token<'a> = self.advance();

            return Ok(Expr::Unary {
                operator,
                operand: Box::new(operand),
                postfix: true,
            });
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.primary()?;

        loop {
            if self.matches(TokenType::LEFT_PAREN) {
                expr = self.finish_call(expr)?;
            } else if self.matches(TokenType::DOT) {
                let name: &'a Token<'a> =
                    self.consume(TokenType::IDENTIFIER, "Expect property name after '.'.")?;

                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr<'a>) -> Result<Expr<'a>> {
        let mut arguments: Vec<Expr<'a>> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= MAX_ARITY {
                    let error = LoxError::parse(
                        self.peek(),
                        format!("Can't have more than {} arguments.", MAX_ARITY),
                    );
                    self.errors.push(error);
                }

                // Assignment, not expression: the comma here separates arguments.
                arguments.push(self.assignment()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        let paren: &'a Token<'a> =
            self.consume(TokenType::RIGHT_PAREN, "Expect ')' after arguments.")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr<'a>> {
        if self.matches(TokenType::FALSE) {
            return Ok(Expr::Literal(LiteralValue::Bool(false)));
        }
        if self.matches(TokenType::TRUE) {
            return Ok(Expr::Literal(LiteralValue::Bool(true)));
        }
        if self.matches(TokenType::NIL) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }

        if let TokenType::NUMBER(n) = self.peek().token_type {
            self.advance();
            return Ok(Expr::Literal(LiteralValue::Number(n)));
        }

        if let TokenType::STRING(ref s) = self.peek().token_type {
            self.advance();
            return Ok(Expr::Literal(LiteralValue::Str(s.clone())));
        }

        if self.matches(TokenType::SUPER) {
            let keyword: &'a Token<'a> = self.previous();
            self.consume(TokenType::DOT, "Expect '.' after 'super'.")?;
            let method: &'a Token<'a> =
                self.consume(TokenType::IDENTIFIER, "Expect superclass method name.")?;

            return Ok(Expr::Super {
                id: self.next_id(),
                keyword,
                method,
            });
        }

        if self.matches(TokenType::THIS) {
            return Ok(Expr::This {
                id: self.next_id(),
                keyword: self.previous(),
            });
        }

        if self.matches(TokenType::IDENTIFIER) {
            return Ok(Expr::Variable {
                id: self.next_id(),
                name: self.previous(),
            });
        }

        if self.matches(TokenType::FUN) {
            let keyword: &'a Token<'a> = self.previous();
            return Ok(Expr::Function(self.function_body("function", keyword)?));
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: Expr<'a> = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "Expect ')' after expression.")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(LoxError::parse(self.peek(), "Expect expression."))
    }

    // ────────────────────── utility helpers ───────────────────────

    /// One left‑associative binary tier: `next ( op next )*`.
    fn left_assoc(
        &mut self,
        operators: &[TokenType],
        next: fn(&mut Self) -> Result<Expr<'a>>,
    ) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = next(self)?;

        while self.matches_any(operators) {
            let operator: &'a Token<'a> = self.previous();
            let right: Expr<'a> = next(self)?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    #[inline(always)]
    fn next_id(&mut self) -> ExprId {
        let id = ExprId(self.next_id);
        self.next_id += 1;
        id
    }

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    fn matches_any(&mut self, ttypes: &[TokenType]) -> bool {
        for ttype in ttypes {
            if self.check(ttype.clone()) {
                self.advance();

                return true;
            }
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<&'a Token<'a>> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        Err(LoxError::parse(self.peek(), message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    /// Like [`Self::check`] but one token further ahead.
    fn check_next(&self, ttype: TokenType) -> bool {
        match self.tokens.get(self.current + 1) {
            Some(token) if token.token_type != TokenType::EOF => token.token_type == ttype,
            _ => false,
        }
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &'a Token<'a> {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token<'a> {
        &self.tokens[self.current - 1]
    }

    /// Discards tokens until it thinks it is at a statement boundary.
    fn synchronize(&mut self) {
        self.advance(); // skip the token that caused the error

        while !self.is_at_end() {
            if matches!(self.previous().token_type, TokenType::SEMICOLON) {
                debug!("Resynchronised after ';' at line {}", self.previous().line);
                return;
            }

            match self.peek().token_type {
                TokenType::CLASS
                | TokenType::FUN
                | TokenType::VAR
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::PRINT
                | TokenType::RETURN
                | TokenType::BREAK
                | TokenType::CONTINUE => {
                    debug!("Resynchronised before {:?}", self.peek().token_type);
                    return;
                }
                _ => {}
            }

            self.advance();
        }
    }
}
