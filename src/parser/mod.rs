use std::{collections::VecDeque, fmt};

use errors::{
    invalid_character, mismatched_delimiter, unclosed_delimiter, unterminated, Error, Span,
};

pub mod expression;
pub mod function;
pub mod statement;
pub mod token_utils;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Comma(Span),
    Dot(Span),
    SemiColon(Span),
    Equals(Span),
    Operator(Span, Operator),
    Literal(Span, String),
    Keyword(Span, Keyword),
    Number(Span, f64),
    Str(Span, String),
    Block(Span, ClosableType, VecDeque<Token>),
    Comment(Span, String),
}

impl Token {
    pub fn span(&self) -> &Span {
        match self {
            Token::Comma(span)
            | Token::Dot(span)
            | Token::SemiColon(span)
            | Token::Equals(span)
            | Token::Operator(span, _)
            | Token::Literal(span, _)
            | Token::Keyword(span, _)
            | Token::Number(span, _)
            | Token::Str(span, _)
            | Token::Block(span, _, _)
            | Token::Comment(span, _) => span,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Token::Comma(_) => ",",
            Token::Dot(_) => ".",
            Token::SemiColon(_) => ";",
            Token::Equals(_) => "=",
            Token::Operator(_, operator) => operator.as_str(),
            Token::Literal(_, _) => "identifier",
            Token::Keyword(_, keyword) => keyword.as_str(),
            Token::Number(_, _) => "number",
            Token::Str(_, _) => "string",
            Token::Block(_, closable, _) => closable.name(),
            Token::Comment(_, _) => "comment",
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum ClosableType {
    Parenthesis,
    Bracket,
    Square,
}

impl ClosableType {
    fn from_open(c: char) -> Option<Self> {
        match c {
            '(' => Some(ClosableType::Parenthesis),
            '{' => Some(ClosableType::Bracket),
            '[' => Some(ClosableType::Square),
            _ => None,
        }
    }

    fn from_close(c: char) -> Option<Self> {
        match c {
            ')' => Some(ClosableType::Parenthesis),
            '}' => Some(ClosableType::Bracket),
            ']' => Some(ClosableType::Square),
            _ => None,
        }
    }

    pub fn close(&self) -> char {
        match self {
            ClosableType::Parenthesis => ')',
            ClosableType::Bracket => '}',
            ClosableType::Square => ']',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClosableType::Parenthesis => "(...)",
            ClosableType::Bracket => "{...}",
            ClosableType::Square => "[...]",
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Keyword {
    Var,
    Function,
    Return,
    If,
    Else,
    While,
    True,
    False,
    Null,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Var => "var",
            Keyword::Function => "function",
            Keyword::Return => "return",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Not,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
            Operator::Eq => "==",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Not => "!",
        }
    }

    /// Binding power when used between two operands; `None` for prefix-only
    /// operators.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Operator::Or => Some(1),
            Operator::And => Some(2),
            Operator::Eq | Operator::NotEq => Some(3),
            Operator::Lt | Operator::LtEq | Operator::Gt | Operator::GtEq => Some(4),
            Operator::Add | Operator::Sub => Some(5),
            Operator::Mul | Operator::Div | Operator::Rem => Some(6),
            Operator::Not => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn validate(word: String, span: Span) -> Token {
    let keyword = match word.as_str() {
        "var" | "let" => Keyword::Var,
        "function" | "fn" => Keyword::Function,
        "return" => Keyword::Return,
        "if" => Keyword::If,
        "else" => Keyword::Else,
        "while" => Keyword::While,
        "true" => Keyword::True,
        "false" => Keyword::False,
        "null" => Keyword::Null,
        _ => return Token::Literal(span, word),
    };
    Token::Keyword(span, keyword)
}

type Chars = VecDeque<(usize, char)>;

/// Splits `source` into tokens, nesting everything between matching
/// delimiters into [`Token::Block`]s.
pub fn tokenize(file: &str, source: &str) -> Result<VecDeque<Token>, Error> {
    let mut chars = source.chars().enumerate().collect::<Chars>();
    let mut token_map = VecDeque::new();
    if let Some((closable, position)) = parse(&mut token_map, &mut chars, file)? {
        return Err(mismatched_delimiter(
            &Span::new(file.to_owned(), position, position + 1),
            closable.close(),
            None,
        ));
    }
    Ok(token_map)
}

fn next_is(chars: &Chars, expected: char) -> bool {
    matches!(chars.front(), Some((_, c)) if *c == expected)
}

fn eat(chars: &mut Chars, expected: char) -> bool {
    if next_is(chars, expected) {
        chars.pop_front();
        true
    } else {
        false
    }
}

/// Returns the closing delimiter that ended this level, if any.
fn parse(
    token_map: &mut VecDeque<Token>,
    chars: &mut Chars,
    file: &str,
) -> Result<Option<(ClosableType, usize)>, Error> {
    let span = |start: usize, end: usize| Span::new(file.to_owned(), start, end);
    while let Some((start, c)) = chars.pop_front() {
        let token = match c {
            ' ' | '\t' | '\n' | '\r' => continue,
            '/' if next_is(chars, '/') => {
                chars.pop_front();
                let mut comment = String::new();
                let mut end = start + 2;
                while let Some((i, c)) = chars.pop_front() {
                    end = i + 1;
                    if c == '\n' {
                        break;
                    }
                    comment.push(c);
                }
                Token::Comment(span(start, end), comment)
            }
            '/' if next_is(chars, '*') => {
                chars.pop_front();
                let mut comment = String::new();
                let mut closed = None;
                while let Some((i, c)) = chars.pop_front() {
                    if c == '*' && eat(chars, '/') {
                        closed = Some(i + 2);
                        break;
                    }
                    comment.push(c);
                }
                match closed {
                    Some(end) => Token::Comment(span(start, end), comment),
                    None => {
                        return Err(unterminated(&span(start, start + 2), "comment", "*/"));
                    }
                }
            }
            '"' | '\'' => read_string(chars, c, start, file)?,
            '(' | '{' | '[' => {
                let closable = match ClosableType::from_open(c) {
                    Some(closable) => closable,
                    None => return Err(invalid_character(&span(start, start + 1), c)),
                };
                let mut inner = VecDeque::new();
                match parse(&mut inner, chars, file)? {
                    Some((found, end)) if found == closable => {
                        Token::Block(span(start, end + 1), closable, inner)
                    }
                    Some((found, end)) => {
                        return Err(mismatched_delimiter(
                            &span(end, end + 1),
                            found.close(),
                            Some((&span(start, start + 1), c)),
                        ));
                    }
                    None => {
                        return Err(unclosed_delimiter(
                            &span(start, start + 1),
                            c,
                            closable.close(),
                        ));
                    }
                }
            }
            ')' | '}' | ']' => {
                return match ClosableType::from_close(c) {
                    Some(closable) => Ok(Some((closable, start))),
                    None => Err(invalid_character(&span(start, start + 1), c)),
                };
            }
            ',' => Token::Comma(span(start, start + 1)),
            '.' => Token::Dot(span(start, start + 1)),
            ';' => Token::SemiColon(span(start, start + 1)),
            '=' => {
                if eat(chars, '=') {
                    Token::Operator(span(start, start + 2), Operator::Eq)
                } else {
                    Token::Equals(span(start, start + 1))
                }
            }
            '!' | '<' | '>' => {
                let (short, long) = match c {
                    '!' => (Operator::Not, Operator::NotEq),
                    '<' => (Operator::Lt, Operator::LtEq),
                    _ => (Operator::Gt, Operator::GtEq),
                };
                if eat(chars, '=') {
                    Token::Operator(span(start, start + 2), long)
                } else {
                    Token::Operator(span(start, start + 1), short)
                }
            }
            '&' | '|' => {
                if !eat(chars, c) {
                    return Err(invalid_character(&span(start, start + 1), c));
                }
                let operator = if c == '&' { Operator::And } else { Operator::Or };
                Token::Operator(span(start, start + 2), operator)
            }
            '+' => Token::Operator(span(start, start + 1), Operator::Add),
            '-' => Token::Operator(span(start, start + 1), Operator::Sub),
            '*' => Token::Operator(span(start, start + 1), Operator::Mul),
            '/' => Token::Operator(span(start, start + 1), Operator::Div),
            '%' => Token::Operator(span(start, start + 1), Operator::Rem),
            '0'..='9' => {
                let mut text = c.to_string();
                let mut end = start + 1;
                let mut fraction = false;
                loop {
                    match chars.front() {
                        Some(&(i, d)) if d.is_ascii_digit() => {
                            text.push(d);
                            end = i + 1;
                            chars.pop_front();
                        }
                        Some(&(_, '.'))
                            if !fraction
                                && matches!(chars.get(1), Some((_, d)) if d.is_ascii_digit()) =>
                        {
                            fraction = true;
                            text.push('.');
                            chars.pop_front();
                        }
                        _ => break,
                    }
                }
                let number = text
                    .parse()
                    .map_err(|_| invalid_character(&span(start, end), c))?;
                Token::Number(span(start, end), number)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut word = c.to_string();
                let mut end = start + 1;
                while let Some(&(i, d)) = chars.front() {
                    if !(d.is_alphanumeric() || d == '_') {
                        break;
                    }
                    word.push(d);
                    end = i + 1;
                    chars.pop_front();
                }
                validate(word, span(start, end))
            }
            _ => return Err(invalid_character(&span(start, start + 1), c)),
        };
        token_map.push_back(token);
    }
    Ok(None)
}

fn read_string(chars: &mut Chars, quote: char, start: usize, file: &str) -> Result<Token, Error> {
    let mut literal = String::new();
    while let Some((i, c)) = chars.pop_front() {
        match c {
            '\\' => match chars.pop_front() {
                Some((_, e)) => literal.push(match e {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                }),
                None => break,
            },
            c if c == quote => {
                return Ok(Token::Str(Span::new(file.to_owned(), start, i + 1), literal));
            }
            c => literal.push(c),
        }
    }
    Err(unterminated(
        &Span::new(file.to_owned(), start, start + 1),
        "string",
        &quote.to_string(),
    ))
}
