//! Command-line workflow, independent of argument parsing

pub mod orchestration;

pub use orchestration::{run_import_workflow, ImportWorkflowArgs, ImportedFile, WorkflowResult};
