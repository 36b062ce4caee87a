use errors::{invalid_token, Error, Span, SpannedObject};

use super::{
    statement::{parse_block, CodeBlock},
    token_utils::{split_commas, Tokens},
    ClosableType, Token,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub span: Span,
    pub name: Option<SpannedObject<String>>,
    pub params: Vec<SpannedObject<String>>,
    pub body: CodeBlock,
}

impl FunctionDef {
    pub fn display_name(&self) -> &str {
        self.name.as_ref().map(|x| x.1.as_str()).unwrap_or("anonymous")
    }
}

/// Parses what follows a `function` keyword: an optional name (required when
/// `named`), the parameter list and the body.
pub fn parse_function(tokens: &mut Tokens, keyword: Span, named: bool) -> Result<FunctionDef, Error> {
    let name = if named || matches!(tokens.peek_token(), Some(Token::Literal(_, _))) {
        Some(tokens.expect_literal()?)
    } else {
        None
    };

    let (params_span, params) = tokens.expect_block(ClosableType::Parenthesis)?;
    let params = split_commas(&params_span, "(", params, &["identifier"])?
        .into_iter()
        .map(|mut group| {
            let param = group.expect_literal()?;
            match group.get_token() {
                None => Ok(param),
                Some(other) => Err(invalid_token(other.name(), &[",", ")"], other.span())),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (body_span, body) = tokens.expect_block(ClosableType::Bracket)?;
    let body = parse_block(Tokens::new(body, body_span.clone(), "{"))?;

    Ok(FunctionDef {
        span: keyword.merge(&body_span),
        name,
        params,
        body,
    })
}
