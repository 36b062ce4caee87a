use std::{cmp::Ordering, fmt, ops::Range};

use ariadne::{Color, ColorGenerator, Fmt, Label, Report, ReportBuilder, ReportKind};

mod reporting;
mod wrappers;

pub use wrappers::*;

pub use reporting::NATIVE_FILE;

pub type ReportSpan = (String, Range<usize>);

/// A diagnostic produced while reading or running a script.
///
/// The rendered form is an ariadne report; `code` and `message` are kept
/// alongside so callers can inspect what went wrong without rendering.
pub struct Error {
    code: u32,
    message: String,
    span: Span,
    report: Report<ReportSpan>,
}

impl Error {
    fn new(code: u32, message: String, span: &Span, builder: ReportBuilder<ReportSpan>) -> Self {
        Self {
            code,
            message,
            span: span.clone(),
            report: builder.finish(),
        }
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[E{:02}] {} ({}:{}..{})",
            self.code, self.message, self.span.file, self.span.start, self.span.end
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[E{:02}] {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Eq)]
pub struct Span {
    pub file: String,
    pub start: usize,
    pub end: usize,
}

impl Default for Span {
    fn default() -> Self {
        Span {
            file: NATIVE_FILE.to_owned(),
            start: 0,
            end: 0,
        }
    }
}

impl PartialOrd for Span {
    fn partial_cmp(&self, _: &Self) -> Option<std::cmp::Ordering> {
        Some(Ordering::Equal)
    }
}

// Syntax trees compare equal regardless of where they were parsed from.
impl PartialEq for Span {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Span {
    pub fn as_range(&self) -> Range<usize> {
        Range {
            start: self.start,
            end: self.end,
        }
    }

    pub fn as_span(&self) -> ReportSpan {
        (self.file.to_owned(), self.as_range())
    }

    pub fn new(file: String, start: usize, end: usize) -> Self {
        Self { file, start, end }
    }

    pub fn merge(&self, other: &Span) -> Self {
        let start = self.start.min(other.start);
        let end = self.end.max(other.end);
        Self::new(self.file.clone(), start, end)
    }

    pub fn is_native(&self) -> bool {
        self.file == NATIVE_FILE
    }
}

fn expected_list(expected_tokens: &[&str]) -> String {
    let out = Color::Fixed(81);
    match expected_tokens.len() {
        0 => "No token expected".to_owned(),
        1 => format!("Expected {}", expected_tokens[0].fg(out)),
        _ => format!(
            "Expected {} or {}",
            expected_tokens[..expected_tokens.len() - 1]
                .iter()
                .map(|x| x.fg(out).to_string())
                .collect::<Vec<_>>()
                .join(", "),
            expected_tokens[expected_tokens.len() - 1].fg(out)
        ),
    }
}

pub fn invalid_character(span: &Span, c: char) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let message = "Invalid character".to_owned();
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(1)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!("{} can't start a token", format!("{:?}", c).fg(a)))
                .with_color(a),
        );
    Error::new(1, message, span, er)
}

pub fn unclosed_delimiter(span: &Span, open: char, close: char) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let message = format!("Unclosed delimiter {}", open);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(2)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!("This {} is never closed", open.fg(a)))
                .with_color(a),
        )
        .with_note(format!("Add a matching {}", close.fg(Color::Fixed(81))));
    Error::new(2, message, span, er)
}

pub fn mismatched_delimiter(span: &Span, found: char, open: Option<(&Span, char)>) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let b = colors.next();
    let message = format!("Unexpected closing delimiter {}", found);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(3)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!("This {} doesn't close anything", found.fg(a)))
                .with_color(a),
        );
    let er = match open {
        Some((open_span, open)) => er.with_label(
            Label::new(open_span.as_span())
                .with_message(format!("The innermost open delimiter is {}", open.fg(b)))
                .with_color(b),
        ),
        None => er,
    };
    Error::new(3, message, span, er)
}

pub fn unterminated(span: &Span, what: &str, terminator: &str) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let message = format!("Unterminated {}", what);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(4)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!("This {} reaches the end of the file", what))
                .with_color(a),
        )
        .with_note(format!("Expected {}", terminator.fg(Color::Fixed(81))));
    Error::new(4, message, span, er)
}

pub fn invalid_token(
    token_name: &str,
    expected_tokens: &[&str],
    span: &Span,
) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let message = "Invalid token".to_owned();
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(5)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!("This is a {} token", token_name.fg(a)))
                .with_color(a),
        )
        .with_note(expected_list(expected_tokens));
    Error::new(5, message, span, er)
}

pub fn expected_token_after(
    previous_span: &Span,
    previous_name: &str,
    expected_tokens: &[&str],
) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let message = format!("Expected token after {}", previous_name);
    let er = Report::build(
        ReportKind::Error,
        previous_span.file.to_owned(),
        previous_span.end,
    )
    .with_code(6)
    .with_message(&message)
    .with_label(
        Label::new(previous_span.as_span())
            .with_message(format!("Token expected after this {}", previous_name.fg(a)))
            .with_color(a),
    )
    .with_note(expected_list(expected_tokens));
    Error::new(6, message, previous_span, er)
}

pub fn invalid_assignment_target(span: &Span) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let message = "Invalid assignment target".to_owned();
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(7)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message("This expression can't be assigned to")
                .with_color(a),
        )
        .with_note("Only variables, fields and list elements can be assigned");
    Error::new(7, message, span, er)
}

pub fn trailing_tokens(span: &Span, context: &str) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let message = format!("Unexpected tokens in {}", context);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(8)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message("These tokens aren't part of the expression")
                .with_color(a),
        );
    Error::new(8, message, span, er)
}

pub fn report_similar(
    singular: &str,
    plural: &str,
    span: &Span,
    current: &str,
    strings: &[String],
    error_id: u32,
) -> Error {
    let mut colors = ColorGenerator::new();
    let b = colors.next();
    let mut similar = strings
        .iter()
        .filter(|k| {
            k.len() > 1
                && k.as_str() != current
                && strsim::damerau_levenshtein(current, k) <= (k.len() - 1).min(2)
        })
        .collect::<Vec<_>>();
    similar.sort();
    similar.dedup();
    similar.truncate(5);
    let message = format!("Undefined {} {}", singular, current);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(error_id)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!(
                    "{}{} {} wasn't found",
                    singular[0..1].to_uppercase(),
                    &singular[1..],
                    current.fg(Color::Blue)
                ))
                .with_color(b),
        );
    let er = if similar.is_empty() {
        er
    } else if similar.len() == 1 {
        er.with_note(format!(
            "Another {} in scope has a similar name {}",
            singular,
            similar[0].fg(Color::Blue)
        ))
    } else {
        er.with_note(format!(
            "Other {} in scope have similar names {}",
            plural,
            similar
                .iter()
                .map(|x| format!("{}", x.fg(Color::Blue)))
                .collect::<Vec<_>>()
                .join(", ")
        ))
    };
    Error::new(error_id, message, span, er)
}

pub fn undefined_variable(span: &Span, name: &str, in_scope: &[String]) -> Error {
    report_similar("variable", "variables", span, name, in_scope, 12)
}

pub fn property_not_found(span: &Span, name: &str, fields: &[String]) -> Error {
    report_similar("property", "properties", span, name, fields, 13)
}

pub fn invalid_operand_types(
    span: &Span,
    operator: &str,
    left_type: &str,
    right_type: Option<&str>,
) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let message = match right_type {
        Some(right_type) => format!(
            "Cannot apply {} to {} and {}",
            operator, left_type, right_type
        ),
        None => format!("Cannot apply {} to {}", operator, left_type),
    };
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(14)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(match right_type {
                    Some(right_type) => format!(
                        "Operands have types {} and {}",
                        left_type.fg(Color::Green),
                        right_type.fg(Color::Green)
                    ),
                    None => format!("Operand has type {}", left_type.fg(Color::Green)),
                })
                .with_color(a),
        );
    Error::new(14, message, span, er)
}

pub fn expected_boolean(span: &Span, found_type: &str) -> Error {
    let message = format!("Expected boolean found {}", found_type);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(15)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!(
                    "This condition has type {}",
                    found_type.fg(Color::Green)
                ))
                .with_color(Color::Green),
        )
        .with_note("Conditions must evaluate to true or false");
    Error::new(15, message, span, er)
}

pub fn not_callable(span: &Span, found_type: &str) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let message = format!("Not callable: {}", found_type);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(16)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!(
                    "This is a {} not a function",
                    found_type.fg(a)
                ))
                .with_color(a),
        );
    Error::new(16, message, span, er)
}

pub fn invalid_argument_count(
    span: &Span,
    definition: &Span,
    expected: usize,
    found: usize,
) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let b = colors.next();
    let message = format!("Expected {} arguments found {}", expected, found);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(17)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!(
                    "This call passes {} arguments",
                    found.to_string().fg(a)
                ))
                .with_color(a),
        );
    let er = if definition.is_native() {
        er
    } else {
        er.with_label(
            Label::new(definition.as_span())
                .with_message(format!(
                    "The function takes {} parameters",
                    expected.to_string().fg(b)
                ))
                .with_color(b),
        )
    };
    Error::new(17, message, span, er)
}

pub fn not_an_object(span: &Span, found_type: &str) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let message = format!("Not an object: {}", found_type);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(18)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!("This is a {} which has no fields", found_type.fg(a)))
                .with_color(a),
        );
    Error::new(18, message, span, er)
}

pub fn not_indexable(span: &Span, found_type: &str) -> Error {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let message = format!("Not indexable: {}", found_type);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(19)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!("This is a {} not a list", found_type.fg(a)))
                .with_color(a),
        );
    Error::new(19, message, span, er)
}

pub fn invalid_index(span: &Span, found: &str) -> Error {
    let message = format!("Cannot index with {}", found);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(20)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!(
                    "Found {} expected a non negative whole number",
                    found.fg(Color::Green)
                ))
                .with_color(Color::Green),
        );
    Error::new(20, message, span, er)
}

pub fn index_out_of_bounds(index: usize, len: usize, access: &Span) -> Error {
    let mut colors = ColorGenerator::new();
    let b = colors.next();
    let message = "Index out of bounds".to_owned();
    let er = Report::build(ReportKind::Error, access.file.to_owned(), access.start)
        .with_code(21)
        .with_message(&message)
        .with_label(
            Label::new(access.as_span())
                .with_message(format!(
                    "The accessed index is {} but the list length is {}",
                    index, len
                ))
                .with_color(b),
        );
    let er = if index == len && len > 0 {
        er.with_note(format!(
            "Did you correctly shift the index? In a {} size list the maximum index is {}",
            len,
            len - 1
        ))
    } else {
        er
    };
    Error::new(21, message, access, er)
}

pub fn invalid_argument_type(span: &Span, expected_type: &str, found_type: &str) -> Error {
    let message = format!("Invalid argument type: expected {} found {}", expected_type, found_type);
    let er = Report::build(ReportKind::Error, span.file.to_owned(), span.start)
        .with_code(22)
        .with_message(&message)
        .with_label(
            Label::new(span.as_span())
                .with_message(format!(
                    "Expected {} found {}",
                    expected_type.fg(Color::Green),
                    found_type.fg(Color::Green),
                ))
                .with_color(Color::Green),
        );
    Error::new(22, message, span, er)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::new("test.js".to_owned(), 4, 9)
    }

    #[test]
    fn similar_names_are_suggested() {
        let e = undefined_variable(
            &span(),
            "inc3",
            &["inc1".to_owned(), "inc2".to_owned(), "createCounter".to_owned()],
        );
        assert_eq!(e.code(), 12);
        assert_eq!(e.message(), "Undefined variable inc3");

        let mut out = Vec::new();
        e.write("var x = inc3()", &mut out).unwrap();
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("inc1"));
        assert!(rendered.contains("inc2"));
        assert!(!rendered.contains("createCounter"));
    }

    #[test]
    fn display_carries_code_and_message() {
        let e = index_out_of_bounds(3, 3, &span());
        assert_eq!(e.to_string(), "[E21] Index out of bounds");
        assert_eq!(e.span().as_range(), 4..9);
    }

    #[test]
    fn spans_merge_to_cover_both() {
        let a = Span::new("a".to_owned(), 3, 5);
        let b = Span::new("a".to_owned(), 10, 12);
        assert_eq!(a.merge(&b).as_range(), 3..12);
        assert!(Span::default().is_native());
    }
}
