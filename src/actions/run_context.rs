use errors::Error;

use crate::interpreter::Interpreter;

use super::build_context::build;

/// Where a running program's output goes.
pub trait RunContext {
    fn print(&mut self, line: &str);
}

pub struct StdoutContext;

impl RunContext for StdoutContext {
    fn print(&mut self, line: &str) {
        println!("{}", line);
    }
}

pub fn run_script(file: &str, source: &str, context: &mut dyn RunContext) -> Result<(), Error> {
    let program = build(file, source)?;
    Interpreter::new(context).run(&program)
}
