//! Aggregate performance over execution records.

use super::entities::{ExecutionRecord, ExecutionStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_executions: usize,
    pub successful_executions: usize,
    pub failed_executions: usize,
    pub awaiting_approval: usize,
    /// Percentage of all executions that completed successfully.
    pub success_rate: f64,
    /// Mean over executions that recorded a duration.
    pub avg_execution_time_ms: u64,
}

impl PerformanceReport {
    pub fn from_records(records: &[ExecutionRecord]) -> Self {
        let total = records.len();
        let successful = records
            .iter()
            .filter(|r| r.status == ExecutionStatus::Completed && r.success == Some(true))
            .count();
        let failed = records
            .iter()
            .filter(|r| r.status == ExecutionStatus::Failed)
            .count();
        let awaiting = records.iter().filter(|r| r.is_awaiting_approval()).count();

        let timed: Vec<u64> = records.iter().filter_map(|r| r.execution_time_ms).collect();
        let avg = if timed.is_empty() {
            0
        } else {
            (timed.iter().sum::<u64>() as f64 / timed.len() as f64).round() as u64
        };

        Self {
            total_executions: total,
            successful_executions: successful,
            failed_executions: failed,
            awaiting_approval: awaiting,
            success_rate: if total > 0 {
                successful as f64 * 100.0 / total as f64
            } else {
                0.0
            },
            avg_execution_time_ms: avg,
        }
    }
}
