//! Abstract syntax tree shared by the parser, resolver and interpreter.
//!
//! Nodes borrow their tokens from the scanner's token buffer for `'a`, so the
//! tree (and every closure created from it at runtime) lives no longer than
//! the source it was parsed from.

use crate::token::Token;

/// Stable identity of a name‑bearing expression (`Variable`, `Assign`, `This`,
/// `Super`).  Handed out by the parser in source order; keys the resolver's
/// distance table independently of structural equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub usize);

/// A **literal constant** that appears directly in the source code.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Numeric literal ‑ stored as IEEE‑754 `f64`.
    Number(f64),

    /// String literal without surrounding quotes.
    Str(String),

    /// `true` or `false`.
    Bool(bool),

    /// The `nil` literal.
    Nil,
}

/// Parameter list and body shared by named functions, methods and lambdas.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr<'a> {
    /// `fun` keyword, or the name token for methods; used for diagnostics.
    pub keyword: &'a Token<'a>,

    /// Parameter name tokens (arity ≤ 255).
    pub params: Vec<&'a Token<'a>>,

    /// Body executed when the function is called.
    pub body: Vec<Stmt<'a>>,
}

/// A named function: a `fun` declaration or a class method.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl<'a> {
    pub name: &'a Token<'a>,
    pub function: FunctionExpr<'a>,
}

/// **Abstract‑Syntax‑Tree node** representing every kind of *expression*.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    /// A literal constant: number, string, `true`, `false`, or `nil`.
    Literal(LiteralValue),

    /// Parenthesised sub‑expression: `"(" expression ")"`.
    Grouping(Box<Expr<'a>>),

    /// Prefix or postfix unary operator expression.
    /// *Example:* `!ready`, `-42`, `~mask`, `++i`, `i--`
    Unary {
        operator: &'a Token<'a>,
        operand: Box<Expr<'a>>,
        /// `true` for `x++` / `x--`.
        postfix: bool,
    },

    /// Infix binary operator expression, including the sequencing comma.
    /// *Example:* `a + b`, `x <= y`, `a, b`
    Binary {
        left: Box<Expr<'a>>,
        operator: &'a Token<'a>,
        right: Box<Expr<'a>>,
    },

    /// Short‑circuiting logical operators `and` / `or`.
    Logical {
        left: Box<Expr<'a>>,
        operator: &'a Token<'a>,
        right: Box<Expr<'a>>,
    },

    /// `condition ? then_branch : else_branch`
    Ternary {
        condition: Box<Expr<'a>>,
        then_branch: Box<Expr<'a>>,
        else_branch: Box<Expr<'a>>,
    },

    /// Assignment to a variable; `operator` is `=` or a compound form (`+=`, …).
    Assign {
        id: ExprId,
        name: &'a Token<'a>,
        operator: &'a Token<'a>,
        value: Box<Expr<'a>>,
    },

    /// Variable access ‑ resolves to the identifier’s current value at runtime.
    Variable { id: ExprId, name: &'a Token<'a> },

    /// Function‑ or method‑call expression.
    Call {
        /// Expression that evaluates to a callable (variable, property, etc.).
        callee: Box<Expr<'a>>,
        /// The closing `)` token ‑ retained for error reporting.
        paren: &'a Token<'a>,
        /// Argument list (may be empty).
        arguments: Vec<Expr<'a>>,
    },

    /// object.property
    Get {
        object: Box<Expr<'a>>,
        name: &'a Token<'a>,
    },

    /// object.property = value (or a compound form)
    Set {
        object: Box<Expr<'a>>,
        name: &'a Token<'a>,
        operator: &'a Token<'a>,
        value: Box<Expr<'a>>,
    },

    /// The `this` keyword inside a method.
    This { id: ExprId, keyword: &'a Token<'a> },

    /// `super.method`
    Super {
        id: ExprId,
        keyword: &'a Token<'a>,
        method: &'a Token<'a>,
    },

    /// Anonymous function: `fun (a, b) { … }`
    Function(FunctionExpr<'a>),
}

/// **Abstract‑Syntax‑Tree node** for *statements*.  A program is a sequence of
/// these nodes returned by [`crate::parser::Parser::parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt<'a> {
    /// Stand‑alone expression terminated by a semicolon.
    Expression(Expr<'a>),

    /// `print` statement used for output.
    Print(Expr<'a>),

    /// Variable declaration: `"var" IDENT ("=" initializer)? ";"`.
    Var {
        name: &'a Token<'a>,
        initializer: Option<Expr<'a>>,
    },

    /// Braced scope containing zero or more declarations/statements.
    Block(Vec<Stmt<'a>>),

    /// `if` / `else` conditional.
    If {
        condition: Expr<'a>,
        then_branch: Box<Stmt<'a>>,
        else_branch: Option<Box<Stmt<'a>>>,
    },

    /// `while` loop.  `increment` is only set for desugared `for` loops and
    /// runs after every iteration, including one cut short by `continue`.
    While {
        condition: Expr<'a>,
        body: Box<Stmt<'a>>,
        increment: Option<Expr<'a>>,
    },

    /// `break` or `continue`, told apart by the keyword's token type.
    Break { keyword: &'a Token<'a> },

    /// Function declaration ‑ becomes a first‑class callable value.
    Function(FunctionDecl<'a>),

    /// `return` statement inside a function body.
    Return {
        /// The `return` keyword token (for error locations).
        keyword: &'a Token<'a>,

        /// Optional expression to return.  Absent ⇒ `nil` is returned.
        value: Option<Expr<'a>>,
    },

    /// `class Name (< Superclass)? { method* }`
    Class {
        name: &'a Token<'a>,
        /// Always an [`Expr::Variable`] when present.
        superclass: Option<Expr<'a>>,
        methods: Vec<FunctionDecl<'a>>,
    },
}
