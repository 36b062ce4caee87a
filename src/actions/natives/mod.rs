use errors::{invalid_argument_count, invalid_argument_type, Error, Span};

use crate::interpreter::{env::Environment, value::Value};

mod array;
mod object;
mod system;

pub fn load_natives(env: &Environment) {
    system::implement(env);
    object::implement(env);
    array::implement(env);
}

/// Natives check their own arity since they have no parameter list.
fn expect_arguments(arguments: &[Value], expected: usize, span: &Span) -> Result<(), Error> {
    if arguments.len() == expected {
        Ok(())
    } else {
        Err(invalid_argument_count(
            span,
            &Span::default(),
            expected,
            arguments.len(),
        ))
    }
}

/// Largest list `List(size)` will allocate.
const MAX_SIZE: usize = 1 << 24;

fn expect_size(value: &Value, span: &Span) -> Result<usize, Error> {
    match value {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => {
            if *n > MAX_SIZE as f64 {
                Err(invalid_argument_type(
                    span,
                    &format!("size of at most {}", MAX_SIZE),
                    &value.to_string(),
                ))
            } else {
                Ok(*n as usize)
            }
        }
        other => Err(invalid_argument_type(span, "size", other.type_name())),
    }
}
