//! Context store over a fixed set of records.
//!
//! Seeded from the `[context]` config section. Filters by `status` and
//! orders by the newest of `updated_at`, `decided_at` or `created_at`
//! (RFC 3339 strings compare chronologically); undated records go last.

use crate::config::FileContextConfig;
use async_trait::async_trait;
use serde_json::Value;
use skillgate_application::{ContextStorePort, StoreError};

const TIMESTAMP_FIELDS: [&str; 3] = ["updated_at", "decided_at", "created_at"];

#[derive(Debug, Clone, Default)]
pub struct StaticContextStore {
    projects: Vec<Value>,
    tasks: Vec<Value>,
    decisions: Vec<Value>,
}

impl StaticContextStore {
    pub fn new(projects: Vec<Value>, tasks: Vec<Value>, decisions: Vec<Value>) -> Self {
        Self {
            projects,
            tasks,
            decisions,
        }
    }

    pub fn from_config(config: &FileContextConfig) -> Self {
        Self::new(
            config.projects.clone(),
            config.tasks.clone(),
            config.decisions.clone(),
        )
    }

    fn select(records: &[Value], statuses: &[&str], limit: usize) -> Vec<Value> {
        let mut matching: Vec<&Value> = records
            .iter()
            .filter(|r| {
                r.get("status")
                    .and_then(Value::as_str)
                    .is_some_and(|s| statuses.contains(&s))
            })
            .collect();
        matching.sort_by(|a, b| recency(b).cmp(&recency(a)));
        matching.into_iter().take(limit).cloned().collect()
    }
}

fn recency(record: &Value) -> Option<&str> {
    TIMESTAMP_FIELDS
        .iter()
        .filter_map(|field| record.get(*field).and_then(Value::as_str))
        .max()
}

#[async_trait]
impl ContextStorePort for StaticContextStore {
    async fn active_projects(&self, limit: usize) -> Result<Vec<Value>, StoreError> {
        Ok(Self::select(&self.projects, &["active"], limit))
    }

    async fn open_tasks(&self, limit: usize) -> Result<Vec<Value>, StoreError> {
        Ok(Self::select(&self.tasks, &["pending", "in_progress"], limit))
    }

    async fn accepted_decisions(&self, limit: usize) -> Result<Vec<Value>, StoreError> {
        Ok(Self::select(&self.decisions, &["accepted"], limit))
    }
}
