use std::rc::Rc;

use either::Either;
use errors::{
    expected_boolean, index_out_of_bounds, invalid_argument_count, invalid_assignment_target,
    invalid_index, invalid_operand_types, not_an_object, not_callable, not_indexable,
    property_not_found, undefined_variable, Error, Span, SpannedObject,
};

use crate::{
    actions::{natives::load_natives, run_context::RunContext},
    parser::{
        expression::Expr,
        statement::{CodeBlock, Statement},
        Operator,
    },
};

pub mod env;
pub mod value;

use env::Environment;
use value::{Function, Value};

/// How a statement finished.
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter<'a> {
    globals: Environment,
    context: &'a mut dyn RunContext,
}

impl<'a> Interpreter<'a> {
    pub fn new(context: &'a mut dyn RunContext) -> Self {
        let globals = Environment::new();
        load_natives(&globals);
        Self { globals, context }
    }

    pub fn print(&mut self, line: &str) {
        self.context.print(line);
    }

    /// Runs a program in the global scope. A top level `return` ends it early.
    pub fn run(&mut self, program: &CodeBlock) -> Result<(), Error> {
        let globals = self.globals.clone();
        self.execute_block(program, &globals)?;
        Ok(())
    }

    fn execute_block(&mut self, block: &CodeBlock, env: &Environment) -> Result<Flow, Error> {
        for statement in &block.0 {
            if let Flow::Return(value) = self.execute(statement, env)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn condition(&mut self, condition: &Expr, env: &Environment) -> Result<bool, Error> {
        match self.evaluate(condition, env)? {
            Value::Boolean(b) => Ok(b),
            other => Err(expected_boolean(&condition.span(), other.type_name())),
        }
    }

    fn execute(&mut self, statement: &Statement, env: &Environment) -> Result<Flow, Error> {
        match statement {
            Statement::Declaration { name, value } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Null,
                };
                env.declare(name, value);
            }
            Statement::Assignment { target, value } => self.assign(target, value, env)?,
            Statement::Function(def) => {
                let name = def.display_name().to_owned();
                let function = Function::closure(def.clone(), env.clone());
                env.declare(&name, Value::Function(Rc::new(function)));
            }
            Statement::If {
                condition,
                then,
                or_else,
            } => {
                if self.condition(condition, env)? {
                    return self.execute_block(then, &env.child());
                } else if let Some(or_else) = or_else {
                    return self.execute(or_else, env);
                }
            }
            Statement::While { condition, body } => {
                while self.condition(condition, env)? {
                    if let Flow::Return(value) = self.execute_block(body, &env.child())? {
                        return Ok(Flow::Return(value));
                    }
                }
            }
            Statement::Return(_, value) => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Null,
                };
                return Ok(Flow::Return(value));
            }
            Statement::Block(block) => return self.execute_block(block, &env.child()),
            Statement::Expression(expr) => {
                self.evaluate(expr, env)?;
            }
        }
        Ok(Flow::Normal)
    }

    fn assign(&mut self, target: &Expr, value: &Expr, env: &Environment) -> Result<(), Error> {
        match target {
            Expr::Variable(name) => {
                let value = self.evaluate(value, env)?;
                if env.assign(name, value) {
                    Ok(())
                } else {
                    Err(undefined_variable(&name.0, name, &env.names()))
                }
            }
            Expr::Field { source, name } => {
                let object = self.evaluate(source, env)?;
                let value = self.evaluate(value, env)?;
                match object {
                    Value::Object(fields) => {
                        fields.borrow_mut().insert(name.1.clone(), value);
                        Ok(())
                    }
                    other => Err(not_an_object(&source.span(), other.type_name())),
                }
            }
            Expr::Index {
                span,
                source,
                index,
            } => {
                let list = self.evaluate(source, env)?;
                let position = self.evaluate(index, env)?;
                let value = self.evaluate(value, env)?;
                match list {
                    Value::List(list) => {
                        let mut list = list.borrow_mut();
                        let position = to_index(&position, &index.span(), list.len())?;
                        list[position] = value;
                        Ok(())
                    }
                    other => Err(not_indexable(span, other.type_name())),
                }
            }
            other => Err(invalid_assignment_target(&other.span())),
        }
    }

    pub fn evaluate(&mut self, expr: &Expr, env: &Environment) -> Result<Value, Error> {
        Ok(match expr {
            Expr::Number(_, n) => Value::Number(*n),
            Expr::Str(_, s) => Value::str(s),
            Expr::Boolean(_, b) => Value::Boolean(*b),
            Expr::Null(_) => Value::Null,
            Expr::Variable(name) => match env.get(name) {
                Some(value) => value,
                None => return Err(undefined_variable(&name.0, name, &env.names())),
            },
            Expr::List(_, elements) => Value::list(
                elements
                    .iter()
                    .map(|e| self.evaluate(e, env))
                    .collect::<Result<_, _>>()?,
            ),
            Expr::Function(def) => {
                Value::Function(Rc::new(Function::closure(def.clone(), env.clone())))
            }
            Expr::Unary { operator, operand } => {
                let value = self.evaluate(operand, env)?;
                match (**operator, value) {
                    (Operator::Sub, Value::Number(n)) => Value::Number(-n),
                    (Operator::Not, Value::Boolean(b)) => Value::Boolean(!b),
                    (_, other) => {
                        return Err(invalid_operand_types(
                            &expr.span(),
                            operator.as_str(),
                            other.type_name(),
                            None,
                        ))
                    }
                }
            }
            Expr::Binary {
                operator,
                left,
                right,
            } => match **operator {
                Operator::And | Operator::Or => self.logical(operator, left, right, env)?,
                _ => {
                    let l = self.evaluate(left, env)?;
                    let r = self.evaluate(right, env)?;
                    binary(operator, l, r, &expr.span())?
                }
            },
            Expr::Call {
                span,
                callee,
                arguments,
            } => {
                let function = match self.evaluate(callee, env)? {
                    Value::Function(function) => function,
                    other => return Err(not_callable(&callee.span(), other.type_name())),
                };
                let arguments = arguments
                    .iter()
                    .map(|e| self.evaluate(e, env))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call(&function, arguments, span)?
            }
            Expr::Field { source, name } => match self.evaluate(source, env)? {
                Value::Object(fields) => {
                    let found = fields.borrow().get(&name.1).cloned();
                    match found {
                        Some(value) => value,
                        None => {
                            let keys = fields.borrow().keys().cloned().collect::<Vec<_>>();
                            return Err(property_not_found(&name.0, name, &keys));
                        }
                    }
                }
                other => return Err(not_an_object(&source.span(), other.type_name())),
            },
            Expr::Index {
                span,
                source,
                index,
            } => {
                let container = self.evaluate(source, env)?;
                let position = self.evaluate(index, env)?;
                match container {
                    Value::List(list) => {
                        let list = list.borrow();
                        let position = to_index(&position, &index.span(), list.len())?;
                        list[position].clone()
                    }
                    Value::Str(s) => {
                        let chars = s.chars().collect::<Vec<_>>();
                        let position = to_index(&position, &index.span(), chars.len())?;
                        Value::str(&chars[position].to_string())
                    }
                    other => return Err(not_indexable(span, other.type_name())),
                }
            }
        })
    }

    fn logical(
        &mut self,
        operator: &SpannedObject<Operator>,
        left: &Expr,
        right: &Expr,
        env: &Environment,
    ) -> Result<Value, Error> {
        let l = match self.evaluate(left, env)? {
            Value::Boolean(b) => b,
            other => {
                return Err(invalid_operand_types(
                    &left.span(),
                    operator.as_str(),
                    other.type_name(),
                    None,
                ))
            }
        };
        if (**operator == Operator::And) != l {
            return Ok(Value::Boolean(l));
        }
        match self.evaluate(right, env)? {
            Value::Boolean(r) => Ok(Value::Boolean(r)),
            other => Err(invalid_operand_types(
                &right.span(),
                operator.as_str(),
                other.type_name(),
                None,
            )),
        }
    }

    /// Calls `function` with already evaluated arguments. `span` is the call
    /// site, used for errors.
    pub fn call(
        &mut self,
        function: &Rc<Function>,
        arguments: Vec<Value>,
        span: &Span,
    ) -> Result<Value, Error> {
        match &function.code {
            Either::Left(closure) => {
                let def = &closure.def;
                if def.params.len() != arguments.len() {
                    return Err(invalid_argument_count(
                        span,
                        &def.span,
                        def.params.len(),
                        arguments.len(),
                    ));
                }
                let env = closure.env.child();
                for (param, value) in def.params.iter().zip(arguments) {
                    env.declare(param, value);
                }
                match self.execute_block(&def.body, &env)? {
                    Flow::Return(value) => Ok(value),
                    Flow::Normal => Ok(Value::Null),
                }
            }
            Either::Right(native) => native(self, arguments, span),
        }
    }
}

fn to_index(value: &Value, span: &Span, len: usize) -> Result<usize, Error> {
    match value {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => {
            let index = *n as usize;
            if index < len {
                Ok(index)
            } else {
                Err(index_out_of_bounds(index, len, span))
            }
        }
        other => Err(invalid_index(span, &other.to_string())),
    }
}

fn binary(
    operator: &SpannedObject<Operator>,
    left: Value,
    right: Value,
    span: &Span,
) -> Result<Value, Error> {
    Ok(match (**operator, &left, &right) {
        (Operator::Eq, _, _) => Value::Boolean(left == right),
        (Operator::NotEq, _, _) => Value::Boolean(left != right),
        (Operator::Add, Value::Number(a), Value::Number(b)) => Value::Number(a + b),
        (Operator::Add, Value::Str(_), _) | (Operator::Add, _, Value::Str(_)) => {
            Value::str(&format!("{}{}", left, right))
        }
        (Operator::Sub, Value::Number(a), Value::Number(b)) => Value::Number(a - b),
        (Operator::Mul, Value::Number(a), Value::Number(b)) => Value::Number(a * b),
        (Operator::Div, Value::Number(a), Value::Number(b)) => Value::Number(a / b),
        (Operator::Rem, Value::Number(a), Value::Number(b)) => Value::Number(a % b),
        (Operator::Lt, Value::Number(a), Value::Number(b)) => Value::Boolean(a < b),
        (Operator::LtEq, Value::Number(a), Value::Number(b)) => Value::Boolean(a <= b),
        (Operator::Gt, Value::Number(a), Value::Number(b)) => Value::Boolean(a > b),
        (Operator::GtEq, Value::Number(a), Value::Number(b)) => Value::Boolean(a >= b),
        (Operator::Lt, Value::Str(a), Value::Str(b)) => Value::Boolean(a < b),
        (Operator::LtEq, Value::Str(a), Value::Str(b)) => Value::Boolean(a <= b),
        (Operator::Gt, Value::Str(a), Value::Str(b)) => Value::Boolean(a > b),
        (Operator::GtEq, Value::Str(a), Value::Str(b)) => Value::Boolean(a >= b),
        _ => {
            return Err(invalid_operand_types(
                span,
                operator.as_str(),
                left.type_name(),
                Some(right.type_name()),
            ))
        }
    })
}
