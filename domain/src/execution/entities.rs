//! Execution record entities.
//!
//! An [`ExecutionRecord`] tracks one command from receipt to its terminal
//! outcome. Status only moves forward:
//!
//! ```text
//! started ──► in_progress (awaiting approval)
//!    │              │
//!    ├──────────────┴──► completed
//!    └─────────────────► failed
//! ```

use crate::approval::ApprovalCheck;
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(String);

impl ExecutionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Started,
    /// Only used while a gated command awaits approval.
    InProgress,
    Completed,
    Failed,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Started => "started",
            ExecutionStatus::InProgress => "in_progress",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Failed)
    }

    pub fn can_transition_to(&self, next: ExecutionStatus) -> bool {
        use ExecutionStatus::*;
        matches!(
            (self, next),
            (Started, InProgress)
                | (Started, Completed)
                | (Started, Failed)
                | (InProgress, Completed)
                | (InProgress, Failed)
        )
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields supplied when an execution is first recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExecution {
    pub agent_id: String,
    pub command: String,
    pub input_context: Value,
    pub metadata: Value,
    pub started_at: DateTime<Utc>,
}

/// Partial update applied to a stored record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ExecutionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ExecutionPatch {
    pub fn awaiting_approval(payload: Value) -> Self {
        Self {
            status: Some(ExecutionStatus::InProgress),
            output_result: Some(payload),
            ..Default::default()
        }
    }

    pub fn completed(skill_id: impl Into<String>, output: Value, elapsed_ms: u64) -> Self {
        Self {
            status: Some(ExecutionStatus::Completed),
            output_result: Some(output),
            skill_id: Some(skill_id.into()),
            success: Some(true),
            execution_time_ms: Some(elapsed_ms),
            completed_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            status: Some(ExecutionStatus::Failed),
            error_message: Some(error.into()),
            success: Some(false),
            execution_time_ms: Some(elapsed_ms),
            completed_at: Some(Utc::now()),
            ..Default::default()
        }
    }
}

/// Stored audit entry for one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: ExecutionId,
    pub agent_id: String,
    pub status: ExecutionStatus,
    pub command: String,
    pub input_context: Value,
    pub metadata: Value,
    pub output_result: Option<Value>,
    pub error_message: Option<String>,
    pub skill_id: Option<String>,
    pub success: Option<bool>,
    pub execution_time_ms: Option<u64>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ExecutionRecord {
    pub fn from_new(id: ExecutionId, new: NewExecution) -> Self {
        Self {
            id,
            agent_id: new.agent_id,
            status: ExecutionStatus::Started,
            command: new.command,
            input_context: new.input_context,
            metadata: new.metadata,
            output_result: None,
            error_message: None,
            skill_id: None,
            success: None,
            execution_time_ms: None,
            started_at: new.started_at,
            updated_at: new.started_at,
            completed_at: None,
        }
    }

    /// Apply a patch, rejecting backward or repeated terminal transitions.
    pub fn apply(&mut self, patch: ExecutionPatch) -> Result<(), DomainError> {
        if let Some(next) = patch.status {
            if !self.status.can_transition_to(next) {
                return Err(DomainError::InvalidValue(format!(
                    "execution {} cannot move from {} to {}",
                    self.id, self.status, next
                )));
            }
            self.status = next;
        }
        if let Some(output) = patch.output_result {
            self.output_result = Some(output);
        }
        if let Some(error) = patch.error_message {
            self.error_message = Some(error);
        }
        if let Some(skill_id) = patch.skill_id {
            self.skill_id = Some(skill_id);
        }
        if let Some(success) = patch.success {
            self.success = Some(success);
        }
        if let Some(ms) = patch.execution_time_ms {
            self.execution_time_ms = Some(ms);
        }
        if let Some(at) = patch.completed_at {
            self.completed_at = Some(at);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// True when the record is parked waiting for a human decision.
    pub fn is_awaiting_approval(&self) -> bool {
        self.status == ExecutionStatus::InProgress
            && self
                .output_result
                .as_ref()
                .and_then(|v| v.get("status"))
                .and_then(Value::as_str)
                == Some("awaiting_approval")
    }
}

/// What `process_command` hands back to the caller.
///
/// Reflects the orchestrator's in-memory decision; `execution_id` is `None`
/// when the audit record could not be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_used: Option<String>,
    pub output: Value,
    pub execution_id: Option<ExecutionId>,
    pub approval_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval: Option<ApprovalCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
