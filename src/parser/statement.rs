use std::{collections::VecDeque, rc::Rc};

use errors::{invalid_assignment_target, invalid_token, Error, Span, SpannedObject};

use super::{
    expression::{parse_expression, parse_group_expression, starts_expression, Expr},
    function::{parse_function, FunctionDef},
    token_utils::Tokens,
    ClosableType, Keyword, Token,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeBlock(pub Vec<Statement>);

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration {
        name: SpannedObject<String>,
        value: Option<Expr>,
    },
    Assignment {
        target: Expr,
        value: Expr,
    },
    Function(Rc<FunctionDef>),
    If {
        condition: Expr,
        then: CodeBlock,
        or_else: Option<Box<Statement>>,
    },
    While {
        condition: Expr,
        body: CodeBlock,
    },
    Return(Span, Option<Expr>),
    Block(CodeBlock),
    Expression(Expr),
}

pub fn parse_program(file: &str, tokens: VecDeque<Token>) -> Result<CodeBlock, Error> {
    parse_block(Tokens::new(
        tokens,
        Span::new(file.to_owned(), 0, 0),
        "start of file",
    ))
}

pub fn parse_block(mut tokens: Tokens) -> Result<CodeBlock, Error> {
    let mut statements = Vec::new();
    loop {
        match tokens.peek_token() {
            None => break,
            Some(Token::SemiColon(_)) => {
                tokens.get_token();
            }
            Some(_) => statements.push(parse_statement(&mut tokens)?),
        }
    }
    Ok(CodeBlock(statements))
}

fn parse_body(tokens: &mut Tokens) -> Result<CodeBlock, Error> {
    let (span, inner) = tokens.expect_block(ClosableType::Bracket)?;
    parse_block(Tokens::new(inner, span, "{"))
}

fn end_statement(tokens: &mut Tokens) {
    if let Some(Token::SemiColon(_)) = tokens.peek_token() {
        tokens.get_token();
    }
}

fn parse_condition(tokens: &mut Tokens) -> Result<Expr, Error> {
    parse_group_expression(
        tokens.take_until(|e| matches!(e, Token::Block(_, ClosableType::Bracket, _))),
    )
}

fn parse_if(tokens: &mut Tokens) -> Result<Statement, Error> {
    let condition = parse_condition(tokens)?;
    let then = parse_body(tokens)?;
    let or_else = if let Some(Token::Keyword(_, Keyword::Else)) = tokens.peek_token() {
        tokens.get_token();
        if let Some(Token::Keyword(_, Keyword::If)) = tokens.peek_token() {
            tokens.get_token();
            Some(Box::new(parse_if(tokens)?))
        } else {
            Some(Box::new(Statement::Block(parse_body(tokens)?)))
        }
    } else {
        None
    };
    Ok(Statement::If {
        condition,
        then,
        or_else,
    })
}

fn parse_statement(tokens: &mut Tokens) -> Result<Statement, Error> {
    let token = match tokens.get_token() {
        Some(token) => token,
        None => return Err(tokens.expected(&["statement"])),
    };
    let statement = match token {
        Token::Keyword(_, Keyword::Var) => {
            let name = tokens.expect_literal()?;
            let value = if let Some(Token::Equals(_)) = tokens.peek_token() {
                tokens.get_token();
                Some(parse_expression(tokens)?)
            } else {
                None
            };
            Statement::Declaration { name, value }
        }
        Token::Keyword(span, Keyword::Function) => {
            Statement::Function(Rc::new(parse_function(tokens, span, true)?))
        }
        Token::Keyword(span, Keyword::Return) => {
            let value = match tokens.peek_token() {
                Some(next) if starts_expression(next) => Some(parse_expression(tokens)?),
                _ => None,
            };
            Statement::Return(span, value)
        }
        Token::Keyword(_, Keyword::If) => return parse_if(tokens),
        Token::Keyword(_, Keyword::While) => {
            let condition = parse_condition(tokens)?;
            let body = parse_body(tokens)?;
            return Ok(Statement::While { condition, body });
        }
        Token::Block(span, ClosableType::Bracket, inner) => {
            return Ok(Statement::Block(parse_block(Tokens::new(inner, span, "{"))?));
        }
        Token::Keyword(_, Keyword::Else) => {
            return Err(invalid_token("else", &["statement"], token.span()));
        }
        token => {
            tokens.push_front(token);
            let target = parse_expression(tokens)?;
            if let Some(Token::Equals(_)) = tokens.peek_token() {
                if !target.is_assignable() {
                    return Err(invalid_assignment_target(&target.span()));
                }
                tokens.get_token();
                let value = parse_expression(tokens)?;
                Statement::Assignment { target, value }
            } else {
                Statement::Expression(target)
            }
        }
    };
    end_statement(tokens);
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{tokenize, Operator};

    fn parse(source: &str) -> Result<CodeBlock, Error> {
        parse_program("t", tokenize("t", source)?)
    }

    fn name(name: &str) -> SpannedObject<String> {
        SpannedObject::native(name.to_owned())
    }

    fn call(callee: &str, arguments: Vec<Expr>) -> Expr {
        Expr::Call {
            span: Span::default(),
            callee: Box::new(Expr::Variable(name(callee))),
            arguments,
        }
    }

    #[test]
    fn statements_without_semicolons() {
        let program = parse("var z = inc1()\nvar x = inc1()\nx = inc1()").unwrap();
        assert_eq!(
            program,
            CodeBlock(vec![
                Statement::Declaration {
                    name: name("z"),
                    value: Some(call("inc1", vec![])),
                },
                Statement::Declaration {
                    name: name("x"),
                    value: Some(call("inc1", vec![])),
                },
                Statement::Assignment {
                    target: Expr::Variable(name("x")),
                    value: call("inc1", vec![]),
                },
            ])
        );
    }

    #[test]
    fn counter_factory() {
        let program = parse(
            "function createCounter(start) {
                function inc() {
                    start = start + 1
                    return start
                }
                return inc
            }",
        )
        .unwrap();
        let inc = FunctionDef {
            span: Span::default(),
            name: Some(name("inc")),
            params: vec![],
            body: CodeBlock(vec![
                Statement::Assignment {
                    target: Expr::Variable(name("start")),
                    value: Expr::Binary {
                        operator: SpannedObject::native(Operator::Add),
                        left: Box::new(Expr::Variable(name("start"))),
                        right: Box::new(Expr::Number(Span::default(), 1.0)),
                    },
                },
                Statement::Return(Span::default(), Some(Expr::Variable(name("start")))),
            ]),
        };
        assert_eq!(
            program,
            CodeBlock(vec![Statement::Function(Rc::new(FunctionDef {
                span: Span::default(),
                name: Some(name("createCounter")),
                params: vec![name("start")],
                body: CodeBlock(vec![
                    Statement::Function(Rc::new(inc)),
                    Statement::Return(Span::default(), Some(Expr::Variable(name("inc")))),
                ]),
            }))])
        );
    }

    #[test]
    fn else_if_chains() {
        let program = parse("if a { b() } else if (c) { d() } else { e() }").unwrap();
        match &program.0[..] {
            [Statement::If {
                or_else: Some(or_else),
                ..
            }] => match &**or_else {
                Statement::If {
                    condition,
                    or_else: Some(last),
                    ..
                } => {
                    assert_eq!(condition, &Expr::Variable(name("c")));
                    assert!(matches!(**last, Statement::Block(_)));
                }
                other => panic!("expected else if, found {:?}", other),
            },
            other => panic!("expected an if statement, found {:?}", other),
        }
    }

    #[test]
    fn bare_return_and_semicolons() {
        let program = parse("function f() { return; }; f();").unwrap();
        match &program.0[..] {
            [Statement::Function(def), Statement::Expression(_)] => {
                assert_eq!(
                    def.body,
                    CodeBlock(vec![Statement::Return(Span::default(), None)])
                );
            }
            other => panic!("unexpected program {:?}", other),
        }
    }

    #[test]
    fn anonymous_functions_are_expressions() {
        let program = parse("var f = function (a, b) { return a }").unwrap();
        match &program.0[..] {
            [Statement::Declaration {
                value: Some(Expr::Function(def)),
                ..
            }] => {
                assert_eq!(def.name, None);
                assert_eq!(def.params, vec![name("a"), name("b")]);
            }
            other => panic!("unexpected program {:?}", other),
        }
    }

    #[test]
    fn invalid_statements() {
        assert_eq!(parse("1 = 2").unwrap_err().code(), 7);
        assert_eq!(parse("f() = 2").unwrap_err().code(), 7);
        assert_eq!(parse("var").unwrap_err().code(), 6);
        assert_eq!(parse("var 1 = 2").unwrap_err().code(), 5);
        assert_eq!(parse("function () {}").unwrap_err().code(), 5);
        assert_eq!(parse("function f(a b) {}").unwrap_err().code(), 5);
        assert_eq!(parse("function f(a)").unwrap_err().code(), 6);
        assert_eq!(parse("function f(a,,b) {}").unwrap_err().code(), 5);
        assert_eq!(parse("function f(,a) {}").unwrap_err().code(), 5);
        assert_eq!(parse("while { }").unwrap_err().code(), 6);
        assert_eq!(parse("else { }").unwrap_err().code(), 5);
    }
}
