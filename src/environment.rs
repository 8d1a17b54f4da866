use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One scope's bindings plus a shared link to the scope around it.
#[derive(Debug, Default)]
pub struct Environment<'a> {
    values: HashMap<String, Value<'a>>,
    enclosing: Option<Rc<RefCell<Environment<'a>>>>,
}

impl<'a> Environment<'a> {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment<'a>>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Binds `name` in this scope, replacing any earlier binding.
    pub fn define(&mut self, name: &str, value: Value<'a>) {
        self.values.insert(name.to_string(), value);
    }

    /// Dynamic lookup through the whole chain.
    pub fn get(&self, name: &Token<'_>) -> Result<Value<'a>> {
        if let Some(value) = self.values.get(name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    pub fn assign(&mut self, name: &Token<'_>, value: Value<'a>) -> Result<()> {
        if let Some(slot) = self.values.get_mut(name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// Reads `name` from the scope exactly `distance` links up the chain.
    pub fn get_at(env: &Rc<RefCell<Self>>, distance: usize, name: &Token<'_>) -> Result<Value<'a>> {
        Self::lookup_at(env, distance, name.lexeme).ok_or_else(|| undefined(name))
    }

    pub fn assign_at(
        env: &Rc<RefCell<Self>>,
        distance: usize,
        name: &Token<'_>,
        value: Value<'a>,
    ) -> Result<()> {
        let scope = Self::ancestor(env, distance);
        let mut scope = scope.borrow_mut();

        match scope.values.get_mut(name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(undefined(name)),
        }
    }

    /// Lookup by plain name, for bindings with no token of their own such as
    /// the `this` a `super` call is bound to.
    pub fn lookup_at(env: &Rc<RefCell<Self>>, distance: usize, name: &str) -> Option<Value<'a>> {
        let scope = Self::ancestor(env, distance);
        let value = scope.borrow().values.get(name).cloned();
        value
    }

    fn ancestor(env: &Rc<RefCell<Self>>, distance: usize) -> Rc<RefCell<Self>> {
        let mut scope = Rc::clone(env);

        for _ in 0..distance {
            let parent = match &scope.borrow().enclosing {
                Some(parent) => Rc::clone(parent),
                // The resolver never hands out a distance deeper than the chain.
                None => break,
            };
            scope = parent;
        }

        scope
    }
}

fn undefined(name: &Token<'_>) -> LoxError {
    LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}
