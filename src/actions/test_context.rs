use super::run_context::RunContext;

impl RunContext for TestContext {
    fn print(&mut self, line: &str) {
        self.print.push_str(line);
        self.print.push('\n');
    }
}

/// Collects everything a program prints.
#[derive(Default)]
pub struct TestContext {
    pub print: String,
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<&str> {
        self.print.lines().collect()
    }
}
