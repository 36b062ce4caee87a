use std::{cell::RefCell, fmt, rc::Rc};

use either::Either;
use errors::{Error, Span};
use indexmap::IndexMap;

use crate::parser::function::FunctionDef;

use super::{env::Environment, Interpreter};

pub type NativeFn = fn(&mut Interpreter<'_>, Vec<Value>, &Span) -> Result<Value, Error>;

pub type Fields = IndexMap<String, Value>;

/// A script function and the environment it was created in.
pub struct Closure {
    pub def: Rc<FunctionDef>,
    pub env: Environment,
}

pub struct Function {
    pub name: String,
    pub code: Either<Closure, NativeFn>,
}

impl Function {
    pub fn closure(def: Rc<FunctionDef>, env: Environment) -> Self {
        Self {
            name: def.display_name().to_owned(),
            code: Either::Left(Closure { def, env }),
        }
    }

    pub fn native(name: &str, code: NativeFn) -> Self {
        Self {
            name: name.to_owned(),
            code: Either::Right(code),
        }
    }
}

#[derive(Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    Str(Rc<str>),
    List(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<Fields>>),
    Function(Rc<Function>),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn list(values: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(values)))
    }

    pub fn object(fields: Fields) -> Self {
        Value::Object(Rc::new(RefCell::new(fields)))
    }

    pub fn native(name: &str, code: NativeFn) -> Self {
        Value::Function(Rc::new(Function::native(name, code)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }
}

// Values with identity compare by reference, the rest by content.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(self, f, &mut Vec::new())
    }
}

fn write_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n.is_nan() {
        f.write_str("NaN")
    } else {
        write!(f, "{}", n)
    }
}

/// `open` holds the containers currently being written, so a container that
/// reaches itself prints `[Circular]` instead of recursing.
fn write_value(value: &Value, f: &mut fmt::Formatter<'_>, open: &mut Vec<*const ()>) -> fmt::Result {
    match value {
        Value::Null => write!(f, "null"),
        Value::Boolean(b) => write!(f, "{}", b),
        Value::Number(n) => write_number(*n, f),
        Value::Str(s) => write!(f, "{}", s),
        Value::List(list) => {
            let ptr = Rc::as_ptr(list) as *const ();
            if open.contains(&ptr) {
                return f.write_str("[Circular]");
            }
            open.push(ptr);
            f.write_str("[")?;
            for (i, e) in list.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(e, f, open)?;
            }
            open.pop();
            f.write_str("]")
        }
        Value::Object(fields) => {
            let ptr = Rc::as_ptr(fields) as *const ();
            if open.contains(&ptr) {
                return f.write_str("[Circular]");
            }
            open.push(ptr);
            f.write_str("{")?;
            for (i, (k, v)) in fields.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: ", k)?;
                write_value(v, f, open)?;
            }
            open.pop();
            f.write_str("}")
        }
        Value::Function(function) => write!(f, "<function {}>", function.name),
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_print_without_trailing_zeros() {
        assert_eq!(Value::Number(-2.0).to_string(), "-2");
        assert_eq!(Value::Number(4294967296.0).to_string(), "4294967296");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn shared_but_acyclic_containers_print_twice() {
        let inner = Value::list(vec![Value::Number(1.0)]);
        let outer = Value::list(vec![inner.clone(), inner]);
        assert_eq!(outer.to_string(), "[[1], [1]]");
    }

    #[test]
    fn containers_print_their_contents() {
        let mut fields = Fields::new();
        fields.insert("name".to_owned(), Value::str("o1"));
        fields.insert("items".to_owned(), Value::list(vec![Value::Number(1.0), Value::Null]));
        assert_eq!(Value::object(fields).to_string(), "{name: o1, items: [1, null]}");
    }

    #[test]
    fn identity_for_containers() {
        let a = Value::list(vec![]);
        let b = Value::list(vec![]);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(Value::str("x"), Value::str("x"));
        assert_ne!(Value::Number(1.0), Value::str("1"));
    }
}
