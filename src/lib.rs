//! A counter factory and a small interpreter for scripts built on closures.

pub mod actions;
pub mod interpreter;
pub mod parser;

#[cfg(test)]
mod tests;

pub use actions::{
    build_context::build,
    demo::run_demo,
    run_context::{run_script, RunContext, StdoutContext},
    test_context::TestContext,
};
pub use errors::Error;
