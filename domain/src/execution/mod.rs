//! Execution audit trail and caller-facing results.

pub mod entities;
pub mod report;

pub use entities::{
    ExecutionId, ExecutionPatch, ExecutionRecord, ExecutionResult, ExecutionStatus, NewExecution,
};
pub use report::PerformanceReport;
