//! Amplified context gathered for a problem.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One of the three read-only context sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSource {
    Projects,
    Tasks,
    Decisions,
}

impl ContextSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextSource::Projects => "projects",
            ContextSource::Tasks => "tasks",
            ContextSource::Decisions => "decisions",
        }
    }
}

impl std::fmt::Display for ContextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Advisory context for planning. Records are opaque to the engine.
///
/// Built once per command and read-only afterward. Empty sequences are
/// valid; a source that failed or timed out is listed in `degraded`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub relevant_projects: Vec<Value>,
    pub relevant_tasks: Vec<Value>,
    pub historical_decisions: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<ContextSource>,
}

impl Context {
    pub fn is_empty(&self) -> bool {
        self.relevant_projects.is_empty()
            && self.relevant_tasks.is_empty()
            && self.historical_decisions.is_empty()
    }

    pub fn records(&self, source: ContextSource) -> &[Value] {
        match source {
            ContextSource::Projects => &self.relevant_projects,
            ContextSource::Tasks => &self.relevant_tasks,
            ContextSource::Decisions => &self.historical_decisions,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_empty() {
        let ctx = Context::default();
        assert!(ctx.is_empty());
        assert!(!ctx.is_degraded());
    }

    #[test]
    fn test_records_by_source() {
        let ctx = Context {
            relevant_tasks: vec![json!({"id": 1})],
            ..Default::default()
        };
        assert_eq!(ctx.records(ContextSource::Tasks).len(), 1);
        assert!(ctx.records(ContextSource::Projects).is_empty());
        assert!(!ctx.is_empty());
    }
}
