use errors::Error;

use crate::parser::{
    statement::{parse_program, CodeBlock},
    tokenize,
};

/// Tokenizes and parses `source`; `file` names it in diagnostics.
pub fn build(file: &str, source: &str) -> Result<CodeBlock, Error> {
    let tokens = tokenize(file, source)?;
    parse_program(file, tokens)
}
