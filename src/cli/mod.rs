pub mod orchestration;

pub use orchestration::{run_next_version, NextVersionArgs, WorkflowResult};
