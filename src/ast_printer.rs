use crate::ast::{Expr, FunctionExpr, LiteralValue, Stmt};
use crate::value::format_number;

/// Converts syntax trees to a parenthesised prefix form, e.g.
/// `1 + 2 * 3` → `(+ 1 (* 2 3))`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr<'_>) -> String {
        match expr {
            // ── literals ────────────────────────────────────────────────
            Expr::Literal(lit) => match lit {
                LiteralValue::Bool(b) => b.to_string(),

                LiteralValue::Nil => "nil".into(),

                LiteralValue::Str(s) => s.clone(),

                LiteralValue::Number(n) => format_number(*n),
            },

            // ── grouping ────────────────────────────────────────────────
            Expr::Grouping(inner) => format!("(group {})", Self::print(inner)),

            // ── unary operator ──────────────────────────────────────────
            Expr::Unary {
                operator,
                operand,
                postfix,
            } => {
                if *postfix {
                    format!("(post{} {})", operator.lexeme, Self::print(operand))
                } else {
                    format!("({} {})", operator.lexeme, Self::print(operand))
                }
            }

            // ── binary / logical operator ───────────────────────────────
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                operator.lexeme,
                Self::print(left),
                Self::print(right)
            ),

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => format!(
                "(?: {} {} {})",
                Self::print(condition),
                Self::print(then_branch),
                Self::print(else_branch)
            ),

            // ── variables ──────────────────────────────────────────────
            Expr::Variable { name, .. } => name.lexeme.into(),

            Expr::Assign {
                name,
                operator,
                value,
                ..
            } => format!("({} {} {})", operator.lexeme, name.lexeme, Self::print(value)),

            // ── calls and properties ───────────────────────────────────
            Expr::Call {
                callee, arguments, ..
            } => {
                let mut s = format!("(call {}", Self::print(callee));
                for arg in arguments {
                    s.push(' ');
                    s.push_str(&Self::print(arg));
                }
                s.push(')');
                s
            }

            Expr::Get { object, name } => format!("(. {} {})", Self::print(object), name.lexeme),

            Expr::Set {
                object,
                name,
                operator,
                value,
            } => format!(
                "({} (. {} {}) {})",
                operator.lexeme,
                Self::print(object),
                name.lexeme,
                Self::print(value)
            ),

            Expr::This { .. } => "this".into(),

            Expr::Super { method, .. } => format!("(super {})", method.lexeme),

            Expr::Function(function) => format!("(fun{})", Self::function_tail(function)),
        }
    }

    pub fn print_stmt(stmt: &Stmt<'_>) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(; {})", Self::print(expr)),

            Stmt::Print(expr) => format!("(print {})", Self::print(expr)),

            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("(var {} {})", name.lexeme, Self::print(init)),
                None => format!("(var {})", name.lexeme),
            },

            Stmt::Block(statements) => {
                let mut s = String::from("(block");
                Self::push_all(&mut s, statements);
                s.push(')');
                s
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    Self::print(condition),
                    Self::print_stmt(then_branch),
                    Self::print_stmt(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    Self::print(condition),
                    Self::print_stmt(then_branch)
                ),
            },

            Stmt::While {
                condition,
                body,
                increment,
            } => match increment {
                Some(increment) => format!(
                    "(while {} {} {})",
                    Self::print(condition),
                    Self::print_stmt(body),
                    Self::print(increment)
                ),
                None => format!(
                    "(while {} {})",
                    Self::print(condition),
                    Self::print_stmt(body)
                ),
            },

            Stmt::Break { keyword } => format!("({})", keyword.lexeme),

            Stmt::Function(decl) => format!(
                "(fun {}{})",
                decl.name.lexeme,
                Self::function_tail(&decl.function)
            ),

            Stmt::Return { value, .. } => match value {
                Some(value) => format!("(return {})", Self::print(value)),
                None => "(return)".into(),
            },

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                let mut s = format!("(class {}", name.lexeme);
                if let Some(superclass) = superclass {
                    s.push_str(" < ");
                    s.push_str(&Self::print(superclass));
                }
                for method in methods {
                    s.push_str(&format!(
                        " ({}{})",
                        method.name.lexeme,
                        Self::function_tail(&method.function)
                    ));
                }
                s.push(')');
                s
            }
        }
    }

    /// ` (a b) stmt…`: parameter list followed by the body.
    fn function_tail(function: &FunctionExpr<'_>) -> String {
        let params: Vec<&str> = function.params.iter().map(|p| p.lexeme).collect();
        let mut s = format!(" ({})", params.join(" "));
        Self::push_all(&mut s, &function.body);
        s
    }

    fn push_all(s: &mut String, statements: &[Stmt<'_>]) {
        for stmt in statements {
            s.push(' ');
            s.push_str(&Self::print_stmt(stmt));
        }
    }
}
