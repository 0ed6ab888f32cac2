//! In-memory execution record store.

use async_trait::async_trait;
use skillgate_application::{ExecutionStore, StoreError};
use skillgate_domain::{ExecutionId, ExecutionPatch, ExecutionRecord, NewExecution};
use std::sync::Mutex;
use uuid::Uuid;

/// Records in insertion order. Ids are random UUIDs.
#[derive(Default)]
pub struct InMemoryExecutionStore {
    records: Mutex<Vec<ExecutionRecord>>,
}

impl InMemoryExecutionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend("execution store lock poisoned".to_string())
}

#[async_trait]
impl ExecutionStore for InMemoryExecutionStore {
    async fn create(&self, execution: NewExecution) -> Result<ExecutionId, StoreError> {
        let id = ExecutionId::new(Uuid::new_v4().to_string());
        let mut records = self.records.lock().map_err(poisoned)?;
        records.push(ExecutionRecord::from_new(id.clone(), execution));
        Ok(id)
    }

    async fn update(&self, id: &ExecutionId, patch: ExecutionPatch) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(poisoned)?;
        let record = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record
            .apply(patch)
            .map_err(|e| StoreError::Conflict(e.to_string()))
    }

    async fn get(&self, id: &ExecutionId) -> Result<Option<ExecutionRecord>, StoreError> {
        let records = self.records.lock().map_err(poisoned)?;
        Ok(records.iter().find(|r| &r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<ExecutionRecord>, StoreError> {
        Ok(self.records.lock().map_err(poisoned)?.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use skillgate_domain::ExecutionStatus;

    pub(crate) fn new_execution(command: &str) -> NewExecution {
        NewExecution {
            agent_id: "skillgate-orchestrator".to_string(),
            command: command.to_string(),
            input_context: json!({}),
            metadata: json!({ "source": "text" }),
            started_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_update_get() {
        let store = InMemoryExecutionStore::new();
        let id = store.create(new_execution("deploy")).await.unwrap();
        assert_eq!(store.len(), 1);

        store
            .update(&id, ExecutionPatch::completed("s1", json!({"ok": true}), 12))
            .await
            .unwrap();
        let record = store.get(&id).await.unwrap().unwrap();
        assert_eq!(record.status, ExecutionStatus::Completed);
        assert_eq!(record.execution_time_ms, Some(12));
    }

    #[tokio::test]
    async fn test_backward_transition_is_conflict() {
        let store = InMemoryExecutionStore::new();
        let id = store.create(new_execution("x")).await.unwrap();
        store
            .update(&id, ExecutionPatch::failed("boom", 1))
            .await
            .unwrap();

        let err = store
            .update(&id, ExecutionPatch::awaiting_approval(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = InMemoryExecutionStore::new();
        let err = store
            .update(&ExecutionId::new("missing"), ExecutionPatch::failed("x", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = InMemoryExecutionStore::new();
        let a = store.create(new_execution("a")).await.unwrap();
        let b = store.create(new_execution("b")).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }
}
