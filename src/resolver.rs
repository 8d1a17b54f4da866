//! Static resolver pass.
//!
//! One walk over the AST that:
//! 1. Builds lexical scopes (a stack of maps from name to binding state).
//! 2. Reports static errors: redeclaration, reading a local in its own
//!    initializer, unused locals, misplaced `return`/`break`/`continue`/
//!    `this`/`super`.
//! 3. Records, for every variable occurrence that is a local, how many scopes
//!    lie between the use and the declaration.  Anything not found locally is
//!    a global and gets no entry; the interpreter looks those up dynamically.
//!
//! The pass never stops at the first problem; every error is collected.

use crate::ast::{Expr, ExprId, FunctionExpr, Stmt};
use crate::error::LoxError;
use crate::token::Token;
use log::{debug, info};
use std::collections::HashMap;

/// Scope distance of every resolved local, keyed by expression identity.
pub type Locals = HashMap<ExprId, usize>;

/// Are we inside a user function?  Used to validate `return`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum VarState {
    /// Name reserved; initializer not finished.
    Declared,
    Defined,
    /// Used at least once after definition.
    Read,
}

#[derive(Debug)]
struct Binding<'a> {
    /// `None` for the implicit `this` and `super`.
    name: Option<&'a Token<'a>>,
    state: VarState,
}

pub struct Resolver<'a> {
    scopes: Vec<HashMap<&'a str, Binding<'a>>>,
    locals: Locals,
    errors: Vec<LoxError>,
    current_function: FunctionType,
    current_class: ClassType,
    loop_depth: usize,
}

impl Default for Resolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Resolver<'a> {
    pub fn new() -> Self {
        info!("Resolver instantiated");

        Resolver {
            scopes: Vec::new(),
            locals: HashMap::new(),
            errors: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            loop_depth: 0,
        }
    }

    /// Walk all top‑level statements; the distance table on success, every
    /// static error otherwise.
    pub fn resolve(&mut self, statements: &[Stmt<'a>]) -> Result<Locals, Vec<LoxError>> {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        self.resolve_stmts(statements);

        if self.errors.is_empty() {
            info!("Resolved {} local reference(s)", self.locals.len());
            Ok(std::mem::take(&mut self.locals))
        } else {
            info!("Resolve finished with {} error(s)", self.errors.len());
            Err(std::mem::take(&mut self.errors))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmts(&mut self, statements: &[Stmt<'a>]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt<'a>) {
        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_stmts(statements);
                self.end_scope();
            }

            Stmt::Var { name, initializer } => {
                debug!("Resolving declaration of '{}'", name.lexeme);
                // declare → resolve initializer → define
                self.declare(*name);
                if let Some(expr) = initializer {
                    self.resolve_expr(expr);
                }
                self.define(*name);
            }

            Stmt::Function(decl) => {
                debug!("Resolving function '{}'", decl.name.lexeme);
                // the name is visible inside its own body
                self.declare(decl.name);
                self.define(decl.name);
                self.resolve_function(&decl.function, FunctionType::Function);
            }

            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expr(expr),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb);
                }
            }

            Stmt::While {
                condition,
                body,
                increment,
            } => {
                self.resolve_expr(condition);

                self.loop_depth += 1;
                self.resolve_stmt(body);
                if let Some(increment) = increment {
                    self.resolve_expr(increment);
                }
                self.loop_depth -= 1;
            }

            Stmt::Break { keyword } => {
                if self.loop_depth == 0 {
                    self.error(
                        keyword,
                        format!("Cannot use '{}' outside of a loop.", keyword.lexeme),
                    );
                }
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.error(keyword, "Cannot return from top-level code.");
                }

                if let Some(expr) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.error(keyword, "Cannot return a value from an initializer.");
                    }
                    self.resolve_expr(expr);
                }
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                debug!("Resolving class '{}'", name.lexeme);

                let enclosing_class = self.current_class;
                self.current_class = ClassType::Class;

                self.declare(*name);
                self.define(*name);

                if let Some(superclass) = superclass {
                    if let Expr::Variable {
                        name: super_name, ..
                    } = superclass
                    {
                        if super_name.lexeme == name.lexeme {
                            self.error(super_name, "A class cannot inherit from itself.");
                        }
                    }

                    self.current_class = ClassType::Subclass;
                    self.resolve_expr(superclass);

                    self.begin_scope();
                    self.define_implicit("super");
                }

                self.begin_scope();
                self.define_implicit("this");

                for method in methods {
                    let kind = if method.name.lexeme == "init" {
                        FunctionType::Initializer
                    } else {
                        FunctionType::Method
                    };
                    self.resolve_function(&method.function, kind);
                }

                self.end_scope();
                if superclass.is_some() {
                    self.end_scope();
                }

                self.current_class = enclosing_class;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &Expr<'a>) {
        match expr {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => self.resolve_expr(inner),

            Expr::Unary { operand, .. } => self.resolve_expr(operand),

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_expr(then_branch);
                self.resolve_expr(else_branch);
            }

            Expr::Variable { id, name } => self.resolve_local(*id, name, true),

            Expr::Assign {
                id,
                name,
                operator,
                value,
            } => {
                // RHS first, then bind LHS.  `x += 1` reads `x`; `x = 1` does not.
                self.resolve_expr(value);
                let reads = operator.token_type.compound_base().is_some();
                self.resolve_local(*id, name, reads);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }

            Expr::Get { object, .. } => self.resolve_expr(object),

            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }

            Expr::This { id, keyword } => {
                if self.current_class == ClassType::None {
                    self.error(keyword, "Cannot use 'this' outside of a class.");
                    return;
                }
                self.resolve_local(*id, keyword, true);
            }

            Expr::Super { id, keyword, .. } => {
                match self.current_class {
                    ClassType::None => {
                        self.error(keyword, "Cannot use 'super' outside of a class.")
                    }
                    ClassType::Class => self.error(
                        keyword,
                        "Cannot use 'super' in a class with no superclass.",
                    ),
                    ClassType::Subclass => {}
                }
                self.resolve_local(*id, keyword, true);
            }

            Expr::Function(function) => self.resolve_function(function, FunctionType::Function),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function’s parameters + body.  Loops around
    /// the declaration do not extend into the body.
    fn resolve_function(&mut self, function: &FunctionExpr<'a>, kind: FunctionType) {
        let enclosing_function = std::mem::replace(&mut self.current_function, kind);
        let enclosing_loops = std::mem::take(&mut self.loop_depth);

        self.begin_scope();
        for param in &function.params {
            self.declare(*param);
            self.define(*param);
        }
        self.resolve_stmts(&function.body);
        self.end_scope();

        self.loop_depth = enclosing_loops;
        self.current_function = enclosing_function;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the innermost scope, reporting locals that were never read.
    fn end_scope(&mut self) {
        let Some(scope) = self.scopes.pop() else {
            return;
        };

        let mut unused: Vec<&'a Token<'a>> = scope
            .into_values()
            .filter(|binding| binding.state == VarState::Defined)
            .filter_map(|binding| binding.name)
            .collect();
        unused.sort_by_key(|token| (token.line, token.column));

        for token in unused {
            self.error(token, "Local variable is not used.");
        }
    }

    fn declare(&mut self, name: &'a Token<'a>) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        if scope.contains_key(name.lexeme) {
            self.errors.push(LoxError::resolve(
                name,
                "Variable with this name already declared in this scope.",
            ));
        }

        scope.insert(
            name.lexeme,
            Binding {
                name: Some(name),
                state: VarState::Declared,
            },
        );
    }

    fn define(&mut self, name: &'a Token<'a>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(
                name.lexeme,
                Binding {
                    name: Some(name),
                    state: VarState::Defined,
                },
            );
        }
    }

    /// `this` / `super`: born read, so they never count as unused.
    fn define_implicit(&mut self, name: &'static str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(
                name,
                Binding {
                    name: None,
                    state: VarState::Read,
                },
            );
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding‑distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this occurrence as a local at depth `d`, or leave it global if
    /// no scope declares it.
    fn resolve_local(&mut self, id: ExprId, name: &Token<'a>, is_read: bool) {
        // innermost → outermost
        for (depth, scope) in self.scopes.iter_mut().rev().enumerate() {
            let Some(binding) = scope.get_mut(name.lexeme) else {
                continue;
            };

            if is_read {
                if binding.state == VarState::Declared {
                    self.errors.push(LoxError::resolve(
                        name,
                        "Cannot read local variable in its own initializer.",
                    ));
                } else {
                    binding.state = VarState::Read;
                }
            }

            debug!("Resolved '{}' at depth {}", name.lexeme, depth);
            self.locals.insert(id, depth);
            return;
        }

        debug!("Resolved '{}' as global", name.lexeme);
    }

    fn error(&mut self, token: &Token<'_>, message: impl Into<String>) {
        self.errors.push(LoxError::resolve(token, message));
    }
}
