use errors::{invalid_argument_type, Error, Span};

use crate::interpreter::{env::Environment, value::Value, Interpreter};

use super::{expect_arguments, expect_size};

pub fn implement(env: &Environment) {
    env.declare("List", Value::native("List", new_list));
    env.declare("len", Value::native("len", len));
    env.declare("map", Value::native("map", map));
}

fn new_list(_: &mut Interpreter<'_>, arguments: Vec<Value>, span: &Span) -> Result<Value, Error> {
    expect_arguments(&arguments, 1, span)?;
    let size = expect_size(&arguments[0], span)?;
    let mut list = Vec::new();
    list.try_reserve_exact(size).map_err(|_| {
        invalid_argument_type(span, "size that fits in memory", &size.to_string())
    })?;
    list.resize(size, Value::Null);
    Ok(Value::list(list))
}

fn len(_: &mut Interpreter<'_>, arguments: Vec<Value>, span: &Span) -> Result<Value, Error> {
    expect_arguments(&arguments, 1, span)?;
    let len = match &arguments[0] {
        Value::List(list) => list.borrow().len(),
        Value::Str(s) => s.chars().count(),
        other => return Err(invalid_argument_type(span, "list", other.type_name())),
    };
    Ok(Value::Number(len as f64))
}

/// `map(func, list)`: a new list of `func(element)`.
fn map(interpreter: &mut Interpreter<'_>, arguments: Vec<Value>, span: &Span) -> Result<Value, Error> {
    expect_arguments(&arguments, 2, span)?;
    let func = match &arguments[0] {
        Value::Function(f) => f.clone(),
        other => return Err(invalid_argument_type(span, "function", other.type_name())),
    };
    // The callback may modify the list, so iterate over a snapshot.
    let items = match &arguments[1] {
        Value::List(list) => list.borrow().clone(),
        other => return Err(invalid_argument_type(span, "list", other.type_name())),
    };
    let mapped = items
        .into_iter()
        .map(|e| interpreter.call(&func, vec![e], span))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::list(mapped))
}
