//! Execution record store port.
//!
//! The audit trail for `process_command`. Writes go through this port;
//! the orchestrator logs and swallows its errors.

use super::store_error::StoreError;
use async_trait::async_trait;
use skillgate_domain::{ExecutionId, ExecutionPatch, ExecutionRecord, NewExecution};

#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Persist a new record with status `started` and return its id.
    async fn create(&self, execution: NewExecution) -> Result<ExecutionId, StoreError>;

    /// Apply a partial update. Backward status moves are a `Conflict`.
    async fn update(&self, id: &ExecutionId, patch: ExecutionPatch) -> Result<(), StoreError>;

    async fn get(&self, id: &ExecutionId) -> Result<Option<ExecutionRecord>, StoreError>;

    /// All records, oldest first.
    async fn list(&self) -> Result<Vec<ExecutionRecord>, StoreError>;
}
