//! Skill execution port.
//!
//! Executing a skill is a single opaque call from the router's point of
//! view: a structured outcome or an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use skillgate_domain::{Context, Problem, Skill, Solution};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SkillExecutionError {
    #[error("Skill {skill_id} failed: {message}")]
    Failed { skill_id: String, message: String },

    #[error("Skill {0} is not available")]
    Unavailable(String),

    #[error("Cancelled")]
    Cancelled,
}

/// Everything a skill receives about the command it serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillInvocation {
    pub command: String,
    pub problem: Problem,
    pub context: Context,
    pub solution: Solution,
}

/// Structured result of one skill execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillOutcome {
    pub output: Value,
    #[serde(default)]
    pub sub_agents_used: Vec<String>,
    /// The skill finished but its result needs a human to follow up
    /// (e.g. the review loop ran out of iterations).
    #[serde(default)]
    pub needs_follow_up: bool,
}

impl SkillOutcome {
    pub fn new(output: Value) -> Self {
        Self {
            output,
            sub_agents_used: Vec::new(),
            needs_follow_up: false,
        }
    }
}

#[async_trait]
pub trait SkillExecutorPort: Send + Sync {
    async fn execute(
        &self,
        skill: &Skill,
        invocation: &SkillInvocation,
    ) -> Result<SkillOutcome, SkillExecutionError>;
}
