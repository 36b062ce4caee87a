use std::collections::VecDeque;

use errors::{expected_token_after, invalid_token, Error, Span, SpannedObject};

use super::{ClosableType, Token};

/// A queue of tokens that remembers the last token handed out, so running out
/// of input can be reported right after it.
pub struct Tokens {
    queue: VecDeque<Token>,
    previous: (Span, &'static str),
}

impl Tokens {
    pub fn new(queue: VecDeque<Token>, start: Span, start_name: &'static str) -> Self {
        Self {
            queue,
            previous: (start, start_name),
        }
    }

    fn skip_comments(&mut self) {
        while matches!(self.queue.front(), Some(Token::Comment(_, _))) {
            self.queue.pop_front();
        }
    }

    pub fn get_token(&mut self) -> Option<Token> {
        self.skip_comments();
        let token = self.queue.pop_front()?;
        self.previous = (token.span().clone(), token.name());
        Some(token)
    }

    pub fn peek_token(&mut self) -> Option<&Token> {
        self.skip_comments();
        self.queue.front()
    }

    pub fn push_front(&mut self, token: Token) {
        self.queue.push_front(token);
    }

    /// Error for input that ended where one of `expected` should have been.
    pub fn expected(&self, expected: &[&str]) -> Error {
        expected_token_after(&self.previous.0, self.previous.1, expected)
    }

    pub fn expect_literal(&mut self) -> Result<SpannedObject<String>, Error> {
        match self.get_token() {
            Some(Token::Literal(span, name)) => Ok(SpannedObject(span, name)),
            Some(other) => Err(invalid_token(other.name(), &["identifier"], other.span())),
            None => Err(self.expected(&["identifier"])),
        }
    }

    pub fn expect_block(
        &mut self,
        closable: ClosableType,
    ) -> Result<(Span, VecDeque<Token>), Error> {
        match self.get_token() {
            Some(Token::Block(span, found, inner)) if found == closable => Ok((span, inner)),
            Some(other) => Err(invalid_token(other.name(), &[closable.name()], other.span())),
            None => Err(self.expected(&[closable.name()])),
        }
    }

    pub fn take_until(&mut self, until: impl Fn(&Token) -> bool) -> Tokens {
        let mut taken = VecDeque::new();
        while let Some(e) = self.peek_token() {
            if until(e) {
                break;
            }
            if let Some(e) = self.queue.pop_front() {
                taken.push_back(e);
            }
        }
        Tokens::new(taken, self.previous.0.clone(), self.previous.1)
    }
}

pub enum SplitAction {
    None,
    SplitConsume,
}

pub fn split_complex(
    tokens: VecDeque<Token>,
    split_rule: impl Fn(&Token) -> SplitAction,
) -> Vec<VecDeque<Token>> {
    let mut a = Vec::new();
    let mut b = VecDeque::new();
    for c in tokens {
        match split_rule(&c) {
            SplitAction::None => {
                b.push_back(c);
            }
            SplitAction::SplitConsume => {
                if !b.is_empty() {
                    a.push(b);
                }
                b = VecDeque::new();
            }
        }
    }
    if !b.is_empty() {
        a.push(b);
    }
    a
}

/// Comma separated groups, each tagged with the span of the enclosing block.
/// A comma must follow a non-empty group; one trailing comma is allowed.
pub fn split_commas(
    block: &Span,
    name: &'static str,
    tokens: VecDeque<Token>,
    expected: &[&str],
) -> Result<Vec<Tokens>, Error> {
    let mut after_comma = true;
    for token in &tokens {
        match token {
            Token::Comma(span) if after_comma => {
                return Err(invalid_token(",", expected, span));
            }
            Token::Comma(_) => after_comma = true,
            Token::Comment(_, _) => (),
            _ => after_comma = false,
        }
    }
    Ok(split_complex(tokens, |t| {
        if matches!(t, Token::Comma(_)) {
            SplitAction::SplitConsume
        } else {
            SplitAction::None
        }
    })
    .into_iter()
    .map(|group| Tokens::new(group, block.clone(), name))
    .collect())
}
