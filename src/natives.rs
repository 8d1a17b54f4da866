//! Built‑in functions seeded into the global scope before user code runs.

use std::rc::Rc;

use chrono::Utc;
use log::debug;

use crate::environment::Environment;
use crate::interpreter::Interpreter;
use crate::value::{NativeFn, NativeFunction, Value};

const NATIVES: [(&str, usize, NativeFn); 3] = [
    ("clock", 0, clock),
    ("println", 1, println),
    ("readln", 1, readln),
];

pub fn define_globals(globals: &mut Environment<'_>) {
    for (name, arity, func) in NATIVES {
        debug!("Defining native function '{}'", name);
        globals.define(name, Value::Native(Rc::new(NativeFunction { name, arity, func })));
    }
}

/// Seconds since the Unix epoch, with millisecond resolution.
fn clock<'a>(_: &mut Interpreter<'a>, _: &[Value<'a>]) -> Result<Value<'a>, String> {
    let millis = Utc::now().timestamp_millis();
    Ok(Value::Number(millis as f64 / 1000.0))
}

fn println<'a>(interpreter: &mut Interpreter<'a>, args: &[Value<'a>]) -> Result<Value<'a>, String> {
    let line = match args.first() {
        Some(value) => format!("{}\n", value),
        None => "\n".to_string(),
    };

    interpreter
        .write_output(&line)
        .map_err(|e| format!("Output error: {}", e))?;

    Ok(Value::Nil)
}

/// Writes the prompt, then returns one input line, or `nil` at end of input.
fn readln<'a>(interpreter: &mut Interpreter<'a>, args: &[Value<'a>]) -> Result<Value<'a>, String> {
    if let Some(prompt) = args.first() {
        interpreter
            .write_output(&prompt.to_string())
            .map_err(|e| format!("Output error: {}", e))?;
    }

    let line = interpreter
        .read_line()
        .map_err(|e| format!("Input error: {}", e))?;

    Ok(match line {
        Some(line) => Value::String(Rc::from(line)),
        None => Value::Nil,
    })
}
