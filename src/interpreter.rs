//! Tree‑walking evaluator.
//!
//! Statements execute for effect and report how control left them through
//! [`Flow`]; expressions evaluate to a [`Value`].  Runtime errors travel on the
//! `Err` side of [`Result`] and are never confused with `return`, `break` or
//! `continue`, which are ordinary `Ok(Flow::…)` values.
//!
//! ### Logging Policy
//!
//! | Location                  | Level   | Purpose                          |
//! |---------------------------|---------|----------------------------------|
//! | `new`, `interpret`        | `info`  | Lifecycle milestones.            |
//! | `execute`, calls          | `debug` | One line per statement or call.  |
//! | `evaluate`                | `trace` | Per‑expression results.          |

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::rc::Rc;

use log::{debug, info, trace};

use crate::ast::{Expr, ExprId, LiteralValue, Stmt};
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::natives;
use crate::resolver::Locals;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenType};
use crate::value::{format_number, LoxClass, LoxFunction, LoxInstance, Value};

/// Default limit on nested calls before a program is stopped with
/// "Stack overflow.".
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Largest string, in bytes, that `*` repetition may build.
const MAX_STRING_LEN: usize = 1 << 30;

/// How control left a statement.
#[derive(Debug)]
enum Flow<'a> {
    Normal,
    Return(Value<'a>),
    Break(&'a Token<'a>),
    Continue(&'a Token<'a>),
}

/// Output writer that remembers whether anything went through it.
struct OutputSink<'a> {
    inner: Box<dyn Write + 'a>,
    written: bool,
}

impl Write for OutputSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !buf.is_empty() {
            self.written = true;
        }

        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

pub struct Interpreter<'a> {
    globals: Rc<RefCell<Environment<'a>>>,
    environment: Rc<RefCell<Environment<'a>>>,
    locals: Locals,
    output: OutputSink<'a>,
    input: Box<dyn BufRead + 'a>,
    call_depth: usize,
    max_call_depth: usize,
    last_value: Option<Value<'a>>,
}

impl Default for Interpreter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Interpreter<'a> {
    /// An interpreter wired to the process's stdout and stdin.
    pub fn new() -> Self {
        Self::with_io(io::stdout(), BufReader::new(io::stdin()))
    }

    /// An interpreter writing program output to `output` and reading lines
    /// for `readln` from `input`.
    pub fn with_io(output: impl Write + 'a, input: impl BufRead + 'a) -> Self {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));
        natives::define_globals(&mut globals.borrow_mut());

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output: OutputSink {
                inner: Box::new(output),
                written: false,
            },
            input: Box::new(input),
            call_depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            last_value: None,
        }
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// Installs scope distances computed by the resolver.
    pub fn resolve(&mut self, locals: Locals) {
        debug!("Installing {} resolved local(s)", locals.len());
        self.locals.extend(locals);
    }

    /// Runs a program.  Stops at the first runtime error.
    ///
    /// Returns the program's implicit result: the value of the last
    /// expression evaluated (loop and `if` conditions included), when that
    /// value is a number, string or boolean and the program wrote no output.
    pub fn interpret(&mut self, statements: &'a [Stmt<'a>]) -> Result<Option<Value<'a>>> {
        info!("Interpreting {} statement(s)", statements.len());

        self.output.written = false;
        self.last_value = None;

        for stmt in statements {
            match self.execute(stmt)? {
                Flow::Normal => {}
                Flow::Break(keyword) | Flow::Continue(keyword) => {
                    return Err(outside_loop(keyword));
                }
                Flow::Return(_) => {
                    debug!("Top-level return; stopping");
                    break;
                }
            }
        }

        self.output.flush()?;

        let implicit = match self.last_value.take() {
            Some(value @ (Value::Number(_) | Value::String(_) | Value::Bool(_)))
                if !self.output.written =>
            {
                Some(value)
            }
            _ => None,
        };

        info!("Interpretation completed successfully");

        Ok(implicit)
    }

    // ─────────────────────────── I/O for natives ───────────────────────────

    pub(crate) fn write_output(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())
    }

    /// Next input line without its terminator; `None` at end of input.
    pub(crate) fn read_line(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);

        Ok(Some(line))
    }

    // ───────────────────────────── statements ──────────────────────────────

    fn execute(&mut self, stmt: &'a Stmt<'a>) -> Result<Flow<'a>> {
        ensure_sufficient_stack(|| self.execute_stmt(stmt))
    }

    fn execute_stmt(&mut self, stmt: &'a Stmt<'a>) -> Result<Flow<'a>> {
        match stmt {
            Stmt::Expression(expr) => {
                debug!("Evaluating expression statement");
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                debug!("Printing value: {}", value);
                writeln!(self.output, "{}", value)?;
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Variable '{}' defined with value: {}", name.lexeme, value);
                self.environment.borrow_mut().define(name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                debug!("Entering block with {} statement(s)", statements.len());
                let scope = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, Rc::new(RefCell::new(scope)))
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(&self.evaluate(condition)?) {
                    debug!("Condition is truthy; executing then branch");
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    debug!("Condition is falsy; executing else branch");
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While {
                condition,
                body,
                increment,
            } => {
                debug!("Entering while loop");

                while is_truthy(&self.evaluate(condition)?) {
                    match self.execute(body)? {
                        Flow::Break(_) => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue(_) => {}
                    }

                    if let Some(increment) = increment {
                        self.evaluate(increment)?;
                    }
                }

                debug!("Exited while loop");
                Ok(Flow::Normal)
            }

            Stmt::Break { keyword } => Ok(match keyword.token_type {
                TokenType::CONTINUE => Flow::Continue(*keyword),
                _ => Flow::Break(*keyword),
            }),

            Stmt::Function(decl) => {
                debug!("Defining function '{}'", decl.name.lexeme);

                let function = LoxFunction {
                    name: Some(decl.name.lexeme),
                    declaration: &decl.function,
                    closure: Rc::clone(&self.environment),
                    is_initializer: false,
                };

                self.environment
                    .borrow_mut()
                    .define(decl.name.lexeme, Value::Function(Rc::new(function)));
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Returning value: {}", value);
                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                debug!("Defining class '{}'", name.lexeme);

                let superclass = match superclass {
                    Some(expr) => match self.evaluate(expr)? {
                        Value::Class(class) => Some(class),
                        _ => {
                            let at = match expr {
                                Expr::Variable { name, .. } => *name,
                                _ => *name,
                            };
                            return Err(LoxError::runtime(at, "Superclass must be a class."));
                        }
                    },
                    None => None,
                };

                self.environment.borrow_mut().define(name.lexeme, Value::Nil);

                let method_env = match &superclass {
                    Some(superclass) => {
                        let mut scope = Environment::with_enclosing(Rc::clone(&self.environment));
                        scope.define("super", Value::Class(Rc::clone(superclass)));
                        Rc::new(RefCell::new(scope))
                    }
                    None => Rc::clone(&self.environment),
                };

                let methods = methods
                    .iter()
                    .map(|method| {
                        let function = LoxFunction {
                            name: Some(method.name.lexeme),
                            declaration: &method.function,
                            closure: Rc::clone(&method_env),
                            is_initializer: method.name.lexeme == "init",
                        };
                        (method.name.lexeme, Rc::new(function))
                    })
                    .collect();

                let class = LoxClass {
                    name: name.lexeme,
                    superclass,
                    methods,
                };

                self.environment
                    .borrow_mut()
                    .assign(name, Value::Class(Rc::new(class)))?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Runs `statements` in `environment`, restoring the previous environment
    /// however the block exits.
    fn execute_block(
        &mut self,
        statements: &'a [Stmt<'a>],
        environment: Rc<RefCell<Environment<'a>>>,
    ) -> Result<Flow<'a>> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = self.run_statements(statements);
        self.environment = previous;
        result
    }

    fn run_statements(&mut self, statements: &'a [Stmt<'a>]) -> Result<Flow<'a>> {
        for stmt in statements {
            match self.execute(stmt)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
        }

        Ok(Flow::Normal)
    }

    // ──────────────────────────── expressions ──────────────────────────────

    /// Evaluates `expr` and remembers the result as the latest evaluated
    /// value.
    fn evaluate(&mut self, expr: &'a Expr<'a>) -> Result<Value<'a>> {
        let value = ensure_sufficient_stack(|| self.evaluate_expr(expr))?;
        self.last_value = Some(value.clone());
        Ok(value)
    }

    fn evaluate_expr(&mut self, expr: &'a Expr<'a>) -> Result<Value<'a>> {
        let value = match expr {
            Expr::Literal(literal) => match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(Rc::from(s.as_str())),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Nil => Value::Nil,
            },

            Expr::Grouping(inner) => self.evaluate(inner)?,

            Expr::Unary {
                operator,
                operand,
                postfix,
            } => self.evaluate_unary(*operator, operand, *postfix)?,

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                if operator.token_type == TokenType::COMMA {
                    self.evaluate(right)?
                } else {
                    let right = self.evaluate(right)?;
                    binary_op(operator, &operator.token_type, left, right)?
                }
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let short_circuit = match operator.token_type {
                    TokenType::OR => is_truthy(&left),
                    _ => !is_truthy(&left),
                };

                if short_circuit {
                    left
                } else {
                    self.evaluate(right)?
                }
            }

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(&self.evaluate(condition)?) {
                    self.evaluate(then_branch)?
                } else {
                    self.evaluate(else_branch)?
                }
            }

            Expr::Assign {
                id,
                name,
                operator,
                value,
            } => {
                let value = self.evaluate(value)?;
                let value = match operator.token_type.compound_base() {
                    Some(base) => {
                        let current = self.look_up_variable(name, *id)?;
                        binary_op(operator, &base, current, value)?
                    }
                    None => value,
                };

                self.assign_variable(name, *id, value.clone())?;
                value
            }

            Expr::Variable { id, name } => self.look_up_variable(name, *id)?,

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }

                self.call_value(callee, *paren, values)?
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name)?,
                _ => return Err(LoxError::runtime(name, "Only instances have properties.")),
            },

            Expr::Set {
                object,
                name,
                operator,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(LoxError::runtime(name, "Only instances have fields."));
                };

                let value = self.evaluate(value)?;
                let value = match operator.token_type.compound_base() {
                    Some(base) => {
                        let current = LoxInstance::get(&instance, name)?;
                        binary_op(operator, &base, current, value)?
                    }
                    None => value,
                };

                instance.set(name, value.clone());
                value
            }

            Expr::This { id, keyword } => self.look_up_variable(keyword, *id)?,

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, *keyword, *method)?,

            Expr::Function(declaration) => Value::Function(Rc::new(LoxFunction {
                name: None,
                declaration,
                closure: Rc::clone(&self.environment),
                is_initializer: false,
            })),
        };

        trace!("Expression evaluated to: {}", value);
        Ok(value)
    }

    fn evaluate_unary(
        &mut self,
        operator: &'a Token<'a>,
        operand: &'a Expr<'a>,
        postfix: bool,
    ) -> Result<Value<'a>> {
        if matches!(
            operator.token_type,
            TokenType::PLUS_PLUS | TokenType::MINUS_MINUS
        ) {
            return self.evaluate_increment(operator, operand, postfix);
        }

        let right = self.evaluate(operand)?;

        match operator.token_type {
            TokenType::BANG => Ok(Value::Bool(!is_truthy(&right))),

            TokenType::MINUS => Ok(Value::Number(-number_operand(operator, &right)?)),

            TokenType::PLUS => Ok(Value::Number(number_operand(operator, &right)?)),

            TokenType::TILDE => Ok(Value::Number(!integer_operand(operator, &right)? as f64)),

            _ => Err(LoxError::runtime(operator, "Invalid unary operator.")),
        }
    }

    /// `++x`, `--x`, `x++`, `x--`: stores the updated number and yields the
    /// new value (prefix) or the original one (postfix).
    fn evaluate_increment(
        &mut self,
        operator: &'a Token<'a>,
        operand: &'a Expr<'a>,
        postfix: bool,
    ) -> Result<Value<'a>> {
        let Expr::Variable { id, name } = operand else {
            return Err(LoxError::runtime(
                operator,
                "Operand of an increment operator must be a variable.",
            ));
        };

        let original = number_operand(operator, &self.look_up_variable(name, *id)?)?;
        let updated = match operator.token_type {
            TokenType::PLUS_PLUS => original + 1.0,
            _ => original - 1.0,
        };

        self.assign_variable(name, *id, Value::Number(updated))?;

        Ok(Value::Number(if postfix { original } else { updated }))
    }

    fn evaluate_super(
        &mut self,
        id: ExprId,
        keyword: &'a Token<'a>,
        method: &'a Token<'a>,
    ) -> Result<Value<'a>> {
        let Some(&distance) = self.locals.get(&id) else {
            return Err(LoxError::runtime(keyword, "Unresolved 'super'."));
        };

        let Value::Class(superclass) = Environment::get_at(&self.environment, distance, keyword)?
        else {
            return Err(LoxError::runtime(keyword, "Superclass must be a class."));
        };

        // `this` lives in the scope just inside the one binding `super`.
        let Some(Value::Instance(instance)) =
            Environment::lookup_at(&self.environment, distance.saturating_sub(1), "this")
        else {
            return Err(LoxError::runtime(keyword, "Unresolved 'this'."));
        };

        match superclass.find_method(method.lexeme) {
            Some(found) => Ok(Value::Function(Rc::new(found.bind(instance)))),
            None => Err(LoxError::runtime(
                method,
                format!("Undefined property '{}'.", method.lexeme),
            )),
        }
    }

    // ───────────────────────────── variables ───────────────────────────────

    fn look_up_variable(&self, name: &Token<'_>, id: ExprId) -> Result<Value<'a>> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn assign_variable(
        &mut self,
        name: &Token<'_>,
        id: ExprId,
        value: Value<'a>,
    ) -> Result<()> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::assign_at(&self.environment, distance, name, value),
            None => self.globals.borrow_mut().assign(name, value),
        }
    }

    // ─────────────────────────────── calls ─────────────────────────────────

    fn call_value(
        &mut self,
        callee: Value<'a>,
        paren: &'a Token<'a>,
        arguments: Vec<Value<'a>>,
    ) -> Result<Value<'a>> {
        if self.call_depth >= self.max_call_depth {
            return Err(LoxError::runtime(paren, "Stack overflow."));
        }

        self.call_depth += 1;
        let result = self.dispatch_call(callee, paren, arguments);
        self.call_depth -= 1;

        result
    }

    fn dispatch_call(
        &mut self,
        callee: Value<'a>,
        paren: &'a Token<'a>,
        arguments: Vec<Value<'a>>,
    ) -> Result<Value<'a>> {
        match callee {
            Value::Native(native) => {
                check_arity(paren, native.arity, arguments.len())?;
                debug!("Calling native function '{}'", native.name);
                (native.func)(self, &arguments).map_err(|message| LoxError::runtime(paren, message))
            }

            Value::Function(function) => {
                check_arity(paren, function.arity(), arguments.len())?;
                self.call_function(&function, arguments)
            }

            Value::Class(class) => {
                check_arity(paren, class.arity(), arguments.len())?;
                debug!("Instantiating class '{}'", class.name);

                let instance = Rc::new(LoxInstance::new(Rc::clone(&class)));
                if let Some(init) = class.find_method("init") {
                    self.call_function(&init.bind(Rc::clone(&instance)), arguments)?;
                }

                Ok(Value::Instance(instance))
            }

            _ => Err(LoxError::runtime(
                paren,
                "Can only call functions and classes.",
            )),
        }
    }

    fn call_function(
        &mut self,
        function: &LoxFunction<'a>,
        arguments: Vec<Value<'a>>,
    ) -> Result<Value<'a>> {
        debug!("Calling function {:?}", function.name);

        let declaration = function.declaration;
        let mut scope = Environment::with_enclosing(Rc::clone(&function.closure));
        for (param, argument) in declaration.params.iter().zip(arguments) {
            scope.define(param.lexeme, argument);
        }

        let flow = self.execute_block(&declaration.body, Rc::new(RefCell::new(scope)))?;

        if function.is_initializer {
            return Ok(Environment::lookup_at(&function.closure, 0, "this").unwrap_or(Value::Nil));
        }

        match flow {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
            Flow::Break(keyword) | Flow::Continue(keyword) => Err(outside_loop(keyword)),
        }
    }
}

// ───────────────────────────── operators ───────────────────────────────

/// Applies the binary operator `kind`; `operator` is the source token used
/// for error positions (for compound assignment it is the `+=`‑style token).
fn binary_op<'a>(
    operator: &Token<'_>,
    kind: &TokenType,
    left: Value<'a>,
    right: Value<'a>,
) -> Result<Value<'a>> {
    match kind {
        TokenType::PLUS => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(concat(&a, &b)),
            (Value::String(a), Value::Number(b)) => Ok(concat(&a, &format_number(b))),
            (Value::Number(a), Value::String(b)) => Ok(concat(&format_number(a), &b)),
            _ => Err(LoxError::runtime(
                operator,
                "Operands must be two numbers or two strings.",
            )),
        },

        TokenType::STAR => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
            (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
                repeat(operator, &s, n)
            }
            _ => Err(LoxError::runtime(operator, "Operands must be numbers.")),
        },

        TokenType::MINUS => {
            let (a, b) = number_operands(operator, &left, &right)?;
            Ok(Value::Number(a - b))
        }

        TokenType::SLASH => {
            let (a, b) = number_operands(operator, &left, &right)?;
            if b == 0.0 {
                return Err(LoxError::runtime(operator, "Division by zero."));
            }
            Ok(Value::Number(a / b))
        }

        TokenType::PERCENT => {
            let (a, b) = number_operands(operator, &left, &right)?;
            if b == 0.0 {
                return Err(LoxError::runtime(operator, "Modulo by zero."));
            }
            Ok(Value::Number(a % b))
        }

        TokenType::STAR_STAR => {
            let (a, b) = number_operands(operator, &left, &right)?;
            Ok(Value::Number(a.powf(b)))
        }

        TokenType::AMPERSAND
        | TokenType::PIPE
        | TokenType::CARET
        | TokenType::LESS_LESS
        | TokenType::GREATER_GREATER => {
            let a = integer_operand(operator, &left)?;
            let b = integer_operand(operator, &right)?;

            let result = match kind {
                TokenType::AMPERSAND => a & b,
                TokenType::PIPE => a | b,
                TokenType::CARET => a ^ b,
                TokenType::LESS_LESS => a.wrapping_shl(b as u32),
                _ => a.wrapping_shr(b as u32),
            };

            Ok(Value::Number(result as f64))
        }

        TokenType::GREATER
        | TokenType::GREATER_EQUAL
        | TokenType::LESS
        | TokenType::LESS_EQUAL => {
            let ordering = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                _ => {
                    return Err(LoxError::runtime(
                        operator,
                        "Operands must be two numbers or two strings.",
                    ))
                }
            };

            // NaN compares false under every ordering operator.
            let result = ordering.is_some_and(|ordering| match kind {
                TokenType::GREATER => ordering.is_gt(),
                TokenType::GREATER_EQUAL => ordering.is_ge(),
                TokenType::LESS => ordering.is_lt(),
                _ => ordering.is_le(),
            });

            Ok(Value::Bool(result))
        }

        TokenType::EQUAL_EQUAL => Ok(Value::Bool(is_equal(operator, &left, &right)?)),

        TokenType::BANG_EQUAL => Ok(Value::Bool(!is_equal(operator, &left, &right)?)),

        _ => Err(LoxError::runtime(operator, "Invalid binary operator.")),
    }
}

fn concat<'a>(a: &str, b: &str) -> Value<'a> {
    let mut s = String::with_capacity(a.len() + b.len());
    s.push_str(a);
    s.push_str(b);
    Value::String(Rc::from(s))
}

/// `"ab" * 3` → `"ababab"`.  Counts below one leave the string unchanged.
fn repeat<'a>(operator: &Token<'_>, s: &str, count: f64) -> Result<Value<'a>> {
    if count.fract() != 0.0 {
        return Err(LoxError::runtime(
            operator,
            "String multiplier must be an integer.",
        ));
    }

    if count < 1.0 {
        return Ok(Value::String(Rc::from(s)));
    }

    // `as` saturates, so a huge count still fails the length check.
    let count = count as usize;

    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_STRING_LEN => Ok(Value::String(Rc::from(s.repeat(count)))),
        _ => Err(LoxError::runtime(
            operator,
            "String repetition too large.",
        )),
    }
}

fn check_arity(paren: &Token<'_>, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(LoxError::runtime(
            paren,
            format!("Expected {} arguments but got {}.", expected, got),
        ));
    }

    Ok(())
}

fn number_operand(operator: &Token<'_>, value: &Value<'_>) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(LoxError::runtime(operator, "Operand must be a number.")),
    }
}

fn number_operands(operator: &Token<'_>, left: &Value<'_>, right: &Value<'_>) -> Result<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(LoxError::runtime(operator, "Operands must be numbers.")),
    }
}

/// Integral number as a 32‑bit two's‑complement integer, saturating at the
/// `i32` bounds.
fn integer_operand(operator: &Token<'_>, value: &Value<'_>) -> Result<i32> {
    match value {
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => Ok(*n as i32),
        _ => Err(LoxError::runtime(operator, "Operands must be integers.")),
    }
}

fn outside_loop(keyword: &Token<'_>) -> LoxError {
    LoxError::runtime(
        keyword,
        format!("Cannot use '{}' outside of a loop.", keyword.lexeme),
    )
}

/// `nil`, `false` and `0` are falsy; everything else is truthy.
fn is_truthy(value: &Value<'_>) -> bool {
    match value {
        Value::Nil => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0,
        _ => true,
    }
}

fn is_equal<'a>(operator: &Token<'_>, left: &Value<'a>, right: &Value<'a>) -> Result<bool> {
    let equal = match (left, right) {
        (Value::Nil, Value::Nil) => true,
        (Value::Nil, _) | (_, Value::Nil) => false,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
        (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
        _ => {
            return Err(LoxError::runtime(
                operator,
                format!("Cannot compare {} with {}.", left.kind(), right.kind()),
            ))
        }
    };

    Ok(equal)
}
