//! JSONL mirror of the execution record trail.
//!
//! [`JsonlAuditStore`] decorates another [`ExecutionStore`]: every
//! successful create/update is appended as one JSON line with an `event`
//! field and `timestamp`. Reads go straight to the inner store.

use async_trait::async_trait;
use serde_json::{Value, json};
use skillgate_application::{ExecutionStore, StoreError};
use skillgate_domain::{ExecutionId, ExecutionPatch, ExecutionRecord, NewExecution};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after each line and on `Drop`.
pub struct JsonlAuditStore {
    inner: Arc<dyn ExecutionStore>,
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditStore {
    /// Wrap `inner`, appending to the file at `path`.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(inner: Arc<dyn ExecutionStore>, path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            inner,
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, event: &str, id: &ExecutionId, payload: Value) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let record = json!({
            "event": event,
            "timestamp": timestamp,
            "execution_id": id,
            "data": payload,
        });

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!("Failed to write audit line to {}: {}", self.path.display(), e);
            }
        }
    }
}

#[async_trait]
impl ExecutionStore for JsonlAuditStore {
    async fn create(&self, execution: NewExecution) -> Result<ExecutionId, StoreError> {
        let payload = serde_json::to_value(&execution).unwrap_or(Value::Null);
        let id = self.inner.create(execution).await?;
        self.append("execution_created", &id, payload);
        Ok(id)
    }

    async fn update(&self, id: &ExecutionId, patch: ExecutionPatch) -> Result<(), StoreError> {
        let payload = serde_json::to_value(&patch).unwrap_or(Value::Null);
        self.inner.update(id, patch).await?;
        self.append("execution_updated", id, payload);
        Ok(())
    }

    async fn get(&self, id: &ExecutionId) -> Result<Option<ExecutionRecord>, StoreError> {
        self.inner.get(id).await
    }

    async fn list(&self) -> Result<Vec<ExecutionRecord>, StoreError> {
        self.inner.list().await
    }
}

impl Drop for JsonlAuditStore {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
