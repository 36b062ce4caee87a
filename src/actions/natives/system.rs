use errors::{Error, Span};

use crate::interpreter::{
    env::Environment,
    value::{Fields, Value},
    Interpreter,
};

pub fn implement(env: &Environment) {
    env.declare("print", Value::native("print", print));
    let mut console = Fields::new();
    console.insert("log".to_owned(), Value::native("log", print));
    env.declare("console", Value::object(console));
}

/// Writes the arguments on one line, separated by spaces.
fn print(interpreter: &mut Interpreter<'_>, arguments: Vec<Value>, _: &Span) -> Result<Value, Error> {
    let line = arguments
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    interpreter.print(&line);
    Ok(Value::Null)
}
