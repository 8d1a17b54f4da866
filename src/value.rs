//! Runtime values and the object model behind them.
//!
//! Everything a Lox expression can evaluate to is one variant of the closed
//! [`Value`] enum.  Heap objects (functions, classes, instances) are shared
//! through `Rc`; their identity is the identity of that allocation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::ast::FunctionExpr;
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::interpreter::Interpreter;
use crate::token::Token;

/// Signature every built‑in function implements.  An `Err` carries the
/// message; the interpreter attaches the call site.
pub type NativeFn =
    for<'a> fn(&mut Interpreter<'a>, &[Value<'a>]) -> std::result::Result<Value<'a>, String>;

#[derive(Debug, Clone)]
pub enum Value<'a> {
    Nil,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Native(Rc<NativeFunction>),
    Function(Rc<LoxFunction<'a>>),
    Class(Rc<LoxClass<'a>>),
    Instance(Rc<LoxInstance<'a>>),
}

impl<'a> Value<'a> {
    /// Human‑readable kind, used in type‑error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Native(_) | Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }
}

/// Canonical text of a number: integral values drop the fractional part
/// (`3.0` → `3`).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Number(n) => write!(f, "{}", format_number(*n)),

            Value::String(s) => write!(f, "{}", s),

            Value::Native(native) => write!(f, "<native fn {}>", native.name),

            Value::Function(function) => match function.name {
                Some(name) => write!(f, "<fn {}>", name),
                None => write!(f, "<fn>"),
            },

            Value::Class(class) => write!(f, "{}", class.name),

            Value::Instance(instance) => write!(f, "{} instance", instance.class.name),
        }
    }
}

// ───────────────────────────── natives ─────────────────────────────

/// A built‑in function seeded into the global environment.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

// ─────────────────────────── user functions ────────────────────────

/// A closure: a function body plus the environment it was declared in.
pub struct LoxFunction<'a> {
    /// `None` for lambdas.
    pub name: Option<&'a str>,
    pub declaration: &'a FunctionExpr<'a>,
    pub closure: Rc<RefCell<Environment<'a>>>,
    pub is_initializer: bool,
}

impl<'a> LoxFunction<'a> {
    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// A copy of this method whose closure binds `this` to `instance`.
    pub fn bind(&self, instance: Rc<LoxInstance<'a>>) -> LoxFunction<'a> {
        trace!("Binding method {:?} to an instance", self.name);

        let mut environment = Environment::with_enclosing(Rc::clone(&self.closure));
        environment.define("this", Value::Instance(instance));

        LoxFunction {
            name: self.name,
            declaration: self.declaration,
            closure: Rc::new(RefCell::new(environment)),
            is_initializer: self.is_initializer,
        }
    }
}

impl fmt::Debug for LoxFunction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoxFunction")
            .field("name", &self.name)
            .field("arity", &self.arity())
            .field("is_initializer", &self.is_initializer)
            .finish()
    }
}

// ───────────────────────────── classes ─────────────────────────────

pub struct LoxClass<'a> {
    pub name: &'a str,
    pub superclass: Option<Rc<LoxClass<'a>>>,
    pub methods: HashMap<&'a str, Rc<LoxFunction<'a>>>,
}

impl<'a> LoxClass<'a> {
    /// Looks `name` up on this class, then up the superclass chain.
    pub fn find_method(&self, name: &str) -> Option<Rc<LoxFunction<'a>>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }

        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }

    /// Calling a class takes the arguments of its initializer.
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }
}

impl fmt::Debug for LoxClass<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoxClass")
            .field("name", &self.name)
            .field("superclass", &self.superclass.as_ref().map(|s| s.name))
            .finish()
    }
}

// ──────────────────────────── instances ────────────────────────────

pub struct LoxInstance<'a> {
    pub class: Rc<LoxClass<'a>>,
    fields: RefCell<HashMap<String, Value<'a>>>,
}

impl<'a> LoxInstance<'a> {
    pub fn new(class: Rc<LoxClass<'a>>) -> Self {
        Self {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    /// Property read: fields shadow methods; methods come back bound.
    pub fn get(this: &Rc<Self>, name: &Token<'_>) -> Result<Value<'a>> {
        if let Some(value) = this.fields.borrow().get(name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = this.class.find_method(name.lexeme) {
            return Ok(Value::Function(Rc::new(method.bind(Rc::clone(this)))));
        }

        Err(LoxError::runtime(
            name,
            format!("Undefined property '{}'.", name.lexeme),
        ))
    }

    pub fn set(&self, name: &Token<'_>, value: Value<'a>) {
        self.fields.borrow_mut().insert(name.lexeme.to_string(), value);
    }
}

impl fmt::Debug for LoxInstance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoxInstance")
            .field("class", &self.class.name)
            .finish()
    }
}
