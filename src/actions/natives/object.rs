use errors::{invalid_argument_type, Error, Span};

use crate::interpreter::{
    env::Environment,
    value::{Fields, Value},
    Interpreter,
};

use super::expect_arguments;

pub fn implement(env: &Environment) {
    env.declare("Object", Value::native("Object", new_object));
    env.declare("keys", Value::native("keys", keys));
}

fn new_object(_: &mut Interpreter<'_>, arguments: Vec<Value>, span: &Span) -> Result<Value, Error> {
    expect_arguments(&arguments, 0, span)?;
    Ok(Value::object(Fields::new()))
}

fn keys(_: &mut Interpreter<'_>, arguments: Vec<Value>, span: &Span) -> Result<Value, Error> {
    expect_arguments(&arguments, 1, span)?;
    let keys = match &arguments[0] {
        Value::Object(fields) => fields.borrow().keys().map(|k| Value::str(k)).collect(),
        other => return Err(invalid_argument_type(span, "object", other.type_name())),
    };
    Ok(Value::list(keys))
}
