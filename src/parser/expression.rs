use std::{collections::VecDeque, rc::Rc};

use errors::{invalid_token, trailing_tokens, Error, Span, SpannedObject};

use super::{
    function::{parse_function, FunctionDef},
    token_utils::{split_commas, Tokens},
    ClosableType, Keyword, Operator, Token,
};

const EXPRESSION_START: &[&str] = &[
    "number",
    "string",
    "identifier",
    "true",
    "false",
    "null",
    "function",
    "(...)",
    "[...]",
    "-",
    "!",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Span, f64),
    Str(Span, String),
    Boolean(Span, bool),
    Null(Span),
    Variable(SpannedObject<String>),
    List(Span, Vec<Expr>),
    Function(Rc<FunctionDef>),
    Unary {
        operator: SpannedObject<Operator>,
        operand: Box<Expr>,
    },
    Binary {
        operator: SpannedObject<Operator>,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        span: Span,
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Field {
        source: Box<Expr>,
        name: SpannedObject<String>,
    },
    Index {
        span: Span,
        source: Box<Expr>,
        index: Box<Expr>,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(span, _)
            | Expr::Str(span, _)
            | Expr::Boolean(span, _)
            | Expr::Null(span)
            | Expr::List(span, _)
            | Expr::Call { span, .. }
            | Expr::Index { span, .. } => span.clone(),
            Expr::Variable(name) => name.0.clone(),
            Expr::Function(def) => def.span.clone(),
            Expr::Unary { operator, operand } => operator.0.merge(&operand.span()),
            Expr::Binary { left, right, .. } => left.span().merge(&right.span()),
            Expr::Field { source, name } => source.span().merge(&name.0),
        }
    }

    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Expr::Variable(_) | Expr::Field { .. } | Expr::Index { .. }
        )
    }
}

/// Whether `token` can be the first token of an expression.
pub fn starts_expression(token: &Token) -> bool {
    match token {
        Token::Number(_, _) | Token::Str(_, _) | Token::Literal(_, _) => true,
        Token::Block(_, closable, _) => *closable != ClosableType::Bracket,
        Token::Operator(_, operator) => matches!(operator, Operator::Sub | Operator::Not),
        Token::Keyword(_, keyword) => matches!(
            keyword,
            Keyword::True | Keyword::False | Keyword::Null | Keyword::Function
        ),
        _ => false,
    }
}

/// Parses the longest expression at the front of `tokens`.
pub fn parse_expression(tokens: &mut Tokens) -> Result<Expr, Error> {
    parse_binary(tokens, 0)
}

/// Parses `tokens` as exactly one expression.
pub fn parse_group_expression(mut tokens: Tokens) -> Result<Expr, Error> {
    let expr = parse_expression(&mut tokens)?;
    match tokens.get_token() {
        None => Ok(expr),
        Some(extra) => {
            let mut span = extra.span().clone();
            while let Some(token) = tokens.get_token() {
                span = span.merge(token.span());
            }
            Err(trailing_tokens(&span, "expression"))
        }
    }
}

fn parse_binary(tokens: &mut Tokens, min_precedence: u8) -> Result<Expr, Error> {
    let mut left = parse_unary(tokens)?;
    loop {
        let (span, operator, precedence) = match tokens.peek_token() {
            Some(Token::Operator(span, operator)) => match operator.precedence() {
                Some(precedence) if precedence >= min_precedence => {
                    (span.clone(), *operator, precedence)
                }
                _ => break,
            },
            _ => break,
        };
        tokens.get_token();
        let right = parse_binary(tokens, precedence + 1)?;
        left = Expr::Binary {
            operator: SpannedObject(span, operator),
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    Ok(left)
}

fn parse_unary(tokens: &mut Tokens) -> Result<Expr, Error> {
    if matches!(
        tokens.peek_token(),
        Some(Token::Operator(_, Operator::Sub)) | Some(Token::Operator(_, Operator::Not))
    ) {
        if let Some(Token::Operator(span, operator)) = tokens.get_token() {
            let operand = parse_unary(tokens)?;
            return Ok(Expr::Unary {
                operator: SpannedObject(span, operator),
                operand: Box::new(operand),
            });
        }
    }
    let primary = parse_primary(tokens)?;
    parse_postfix(tokens, primary)
}

fn parse_list(span: &Span, name: &'static str, inner: VecDeque<Token>) -> Result<Vec<Expr>, Error> {
    split_commas(span, name, inner, EXPRESSION_START)?
        .into_iter()
        .map(parse_group_expression)
        .collect()
}

fn parse_primary(tokens: &mut Tokens) -> Result<Expr, Error> {
    Ok(match tokens.get_token() {
        Some(Token::Number(span, n)) => Expr::Number(span, n),
        Some(Token::Str(span, s)) => Expr::Str(span, s),
        Some(Token::Keyword(span, Keyword::True)) => Expr::Boolean(span, true),
        Some(Token::Keyword(span, Keyword::False)) => Expr::Boolean(span, false),
        Some(Token::Keyword(span, Keyword::Null)) => Expr::Null(span),
        Some(Token::Keyword(span, Keyword::Function)) => {
            Expr::Function(Rc::new(parse_function(tokens, span, false)?))
        }
        Some(Token::Literal(span, name)) => Expr::Variable(SpannedObject(span, name)),
        Some(Token::Block(span, ClosableType::Parenthesis, inner)) => {
            parse_group_expression(Tokens::new(inner, span, "("))?
        }
        Some(Token::Block(span, ClosableType::Square, inner)) => {
            let elements = parse_list(&span, "[", inner)?;
            Expr::List(span, elements)
        }
        Some(other) => {
            return Err(invalid_token(other.name(), EXPRESSION_START, other.span()));
        }
        None => return Err(tokens.expected(EXPRESSION_START)),
    })
}

fn parse_postfix(tokens: &mut Tokens, mut expr: Expr) -> Result<Expr, Error> {
    loop {
        let continues = matches!(
            tokens.peek_token(),
            Some(Token::Block(_, ClosableType::Parenthesis, _))
                | Some(Token::Block(_, ClosableType::Square, _))
                | Some(Token::Dot(_))
        );
        if !continues {
            return Ok(expr);
        }
        expr = match tokens.get_token() {
            Some(Token::Block(span, ClosableType::Parenthesis, inner)) => {
                let arguments = parse_list(&span, "(", inner)?;
                Expr::Call {
                    span: expr.span().merge(&span),
                    callee: Box::new(expr),
                    arguments,
                }
            }
            Some(Token::Block(span, ClosableType::Square, inner)) => {
                let index = parse_group_expression(Tokens::new(inner, span.clone(), "["))?;
                Expr::Index {
                    span: expr.span().merge(&span),
                    source: Box::new(expr),
                    index: Box::new(index),
                }
            }
            Some(Token::Dot(_)) => {
                let name = tokens.expect_literal()?;
                Expr::Field {
                    source: Box::new(expr),
                    name,
                }
            }
            _ => return Ok(expr),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenize;

    fn parse(source: &str) -> Result<Expr, Error> {
        let tokens = tokenize("t", source)?;
        parse_group_expression(Tokens::new(tokens, Span::default(), "start of file"))
    }

    fn num(n: f64) -> Expr {
        Expr::Number(Span::default(), n)
    }

    fn var(name: &str) -> Expr {
        Expr::Variable(SpannedObject::native(name.to_owned()))
    }

    fn binary(operator: Operator, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            operator: SpannedObject::native(operator),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn multiplication_binds_tighter() {
        assert_eq!(
            parse("1 + 2 * 3").unwrap(),
            binary(Operator::Add, num(1.0), binary(Operator::Mul, num(2.0), num(3.0)))
        );
    }

    #[test]
    fn same_precedence_is_left_associative() {
        assert_eq!(
            parse("10 - 4 - 3").unwrap(),
            binary(Operator::Sub, binary(Operator::Sub, num(10.0), num(4.0)), num(3.0))
        );
    }

    #[test]
    fn comparison_and_logic() {
        assert_eq!(
            parse("a < 2 && b == c || !d").unwrap(),
            binary(
                Operator::Or,
                binary(
                    Operator::And,
                    binary(Operator::Lt, var("a"), num(2.0)),
                    binary(Operator::Eq, var("b"), var("c"))
                ),
                Expr::Unary {
                    operator: SpannedObject::native(Operator::Not),
                    operand: Box::new(var("d")),
                }
            )
        );
    }

    #[test]
    fn negative_seed_argument() {
        assert_eq!(
            parse("createCounter(0 - 5)").unwrap(),
            Expr::Call {
                span: Span::default(),
                callee: Box::new(var("createCounter")),
                arguments: vec![binary(Operator::Sub, num(0.0), num(5.0))],
            }
        );
        assert_eq!(
            parse("createCounter(-5)").unwrap(),
            Expr::Call {
                span: Span::default(),
                callee: Box::new(var("createCounter")),
                arguments: vec![Expr::Unary {
                    operator: SpannedObject::native(Operator::Sub),
                    operand: Box::new(num(5.0)),
                }],
            }
        );
    }

    #[test]
    fn postfix_chains() {
        assert_eq!(
            parse("console.log(x, y)[0]").unwrap(),
            Expr::Index {
                span: Span::default(),
                source: Box::new(Expr::Call {
                    span: Span::default(),
                    callee: Box::new(Expr::Field {
                        source: Box::new(var("console")),
                        name: SpannedObject::native("log".to_owned()),
                    }),
                    arguments: vec![var("x"), var("y")],
                }),
                index: Box::new(num(0.0)),
            }
        );
    }

    #[test]
    fn spans_cover_the_whole_call() {
        let expr = parse("inc1()").unwrap();
        assert_eq!(expr.span().as_range(), 0..6);
    }

    #[test]
    fn malformed_expressions() {
        assert_eq!(parse("1 +").unwrap_err().code(), 6);
        assert_eq!(parse("(1 2)").unwrap_err().code(), 8);
        assert_eq!(parse("a.1").unwrap_err().code(), 5);
        assert_eq!(parse("*").unwrap_err().code(), 5);
    }

    #[test]
    fn empty_list_elements_are_rejected() {
        assert_eq!(parse("f(1,,2)").unwrap_err().code(), 5);
        assert_eq!(parse("f(,1)").unwrap_err().code(), 5);
        assert_eq!(parse("[1,,2]").unwrap_err().code(), 5);
        let e = parse("[1, 2,,]").unwrap_err();
        assert_eq!(e.span().as_range(), 6..7);
        match parse("[1, 2,]").unwrap() {
            Expr::List(_, elements) => assert_eq!(elements, vec![num(1.0), num(2.0)]),
            other => panic!("expected a list, found {:?}", other),
        }
    }
}
