//! Engine configuration: use case parameters.
//!
//! Passed explicitly at construction; nothing here is read from the
//! environment. The infrastructure config loader builds it from files.

use serde::{Deserialize, Serialize};
use skillgate_domain::{ApprovalPolicy, ClassificationRules, MetricsMode, ReviewLoopPolicy};
use std::time::Duration;

/// Limits and timeout for context amplification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Bounded wait for each individual lookup.
    pub lookup_timeout: Duration,
    pub max_projects: usize,
    pub max_tasks: usize,
    pub max_decisions: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(2),
            max_projects: 5,
            max_tasks: 10,
            max_decisions: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewConfig {
    pub policy: ReviewLoopPolicy,
    /// Wall-clock budget for one loop run. `None` means no deadline.
    pub deadline: Option<Duration>,
}

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Agent id written on every execution record.
    pub agent_id: String,
    pub classification: ClassificationRules,
    pub approval: ApprovalPolicy,
    pub context: ContextConfig,
    pub review: ReviewConfig,
    pub metrics_mode: MetricsMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            agent_id: "skillgate-orchestrator".to_string(),
            classification: ClassificationRules::default(),
            approval: ApprovalPolicy::default(),
            context: ContextConfig::default(),
            review: ReviewConfig::default(),
            metrics_mode: MetricsMode::default(),
        }
    }
}

impl EngineConfig {
    // ==================== Builder Methods ====================

    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    pub fn with_classification(mut self, rules: ClassificationRules) -> Self {
        self.classification = rules;
        self
    }

    pub fn with_approval(mut self, policy: ApprovalPolicy) -> Self {
        self.approval = policy;
        self
    }

    pub fn with_context(mut self, context: ContextConfig) -> Self {
        self.context = context;
        self
    }

    pub fn with_review(mut self, review: ReviewConfig) -> Self {
        self.review = review;
        self
    }

    pub fn with_metrics_mode(mut self, mode: MetricsMode) -> Self {
        self.metrics_mode = mode;
        self
    }
}
