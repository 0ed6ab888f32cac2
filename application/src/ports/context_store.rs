//! Read-only context store port.
//!
//! Three idempotent lookups, each returning at most `limit` opaque records.
//! Adapters sort by recency where the source has a timestamp.

use super::store_error::StoreError;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait ContextStorePort: Send + Sync {
    /// Projects with status `active`.
    async fn active_projects(&self, limit: usize) -> Result<Vec<Value>, StoreError>;

    /// Tasks with status `pending` or `in_progress`.
    async fn open_tasks(&self, limit: usize) -> Result<Vec<Value>, StoreError>;

    /// Decisions with status `accepted`, most recent first.
    async fn accepted_decisions(&self, limit: usize) -> Result<Vec<Value>, StoreError>;
}
