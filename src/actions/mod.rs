pub mod build_context;
pub mod demo;
pub mod natives;
pub mod run_context;
pub mod test_context;
