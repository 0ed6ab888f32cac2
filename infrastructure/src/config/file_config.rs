//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.
//!
//! ```toml
//! [engine]
//! agent_id = "skillgate-orchestrator"
//! metrics_mode = "exact"          # or "legacy_rounding"
//!
//! [context]
//! lookup_timeout_ms = 2000
//! max_tasks = 10
//!
//! [[context.projects]]
//! name = "Website relaunch"
//! status = "active"
//!
//! [review]
//! max_iterations = 5
//! deadline_seconds = 120
//!
//! [[skills]]
//! id = "01-deployment-devops"
//! name = "Deployment & DevOps"
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use skillgate_application::{ContextConfig, EngineConfig, ReviewConfig};
use skillgate_domain::{
    ApprovalPolicy, ClassificationRules, DomainError, MetricsMode, ReviewLoopPolicy, Skill,
    SkillContract, SkillMetrics, SkillStatus,
};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("context.lookup_timeout_ms cannot be 0")]
    InvalidTimeout,

    #[error("review.max_iterations cannot be 0")]
    InvalidIterations,

    #[error("skill id cannot be empty")]
    EmptySkillId,

    #[error("duplicate skill id: {0}")]
    DuplicateSkill(String),

    #[error("skill success_rate must be within 0..=100 (skill {0})")]
    InvalidSuccessRate(String),

    #[error(transparent)]
    Rules(#[from] DomainError),
}

/// Raw engine configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    /// Agent id written on execution records
    pub agent_id: String,
    /// Success-rate bookkeeping
    pub metrics_mode: MetricsMode,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        Self {
            agent_id: EngineConfig::default().agent_id,
            metrics_mode: MetricsMode::default(),
        }
    }
}

/// Raw context configuration from TOML
///
/// The record lists seed the in-memory context store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContextConfig {
    pub lookup_timeout_ms: u64,
    pub max_projects: usize,
    pub max_tasks: usize,
    pub max_decisions: usize,
    pub projects: Vec<Value>,
    pub tasks: Vec<Value>,
    pub decisions: Vec<Value>,
}

impl Default for FileContextConfig {
    fn default() -> Self {
        let defaults = ContextConfig::default();
        Self {
            lookup_timeout_ms: defaults.lookup_timeout.as_millis() as u64,
            max_projects: defaults.max_projects,
            max_tasks: defaults.max_tasks,
            max_decisions: defaults.max_decisions,
            projects: Vec::new(),
            tasks: Vec::new(),
            decisions: Vec::new(),
        }
    }
}

/// Raw review loop configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReviewConfig {
    pub max_iterations: usize,
    /// Wall-clock budget per loop run
    pub deadline_seconds: Option<u64>,
    pub clamp_quality_regression: bool,
}

impl Default for FileReviewConfig {
    fn default() -> Self {
        let policy = ReviewLoopPolicy::default();
        Self {
            max_iterations: policy.max_iterations,
            deadline_seconds: None,
            clamp_quality_regression: policy.clamp_quality_regression,
        }
    }
}

/// Raw audit configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// JSONL file mirroring every execution record write
    pub log_path: Option<String>,
}

/// One `[[skills]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSkillConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub orchestrator_id: Option<String>,
    #[serde(default)]
    pub status: SkillStatus,
    #[serde(default)]
    pub contract: SkillContract,
    /// Seed metrics, e.g. carried over from another store
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub avg_execution_time_ms: u64,
}

impl FileSkillConfig {
    pub fn to_skill(&self) -> Skill {
        let mut skill = Skill::new(&self.id, &self.name)
            .with_status(self.status)
            .with_contract(self.contract)
            .with_metrics(SkillMetrics::from_rates(
                self.usage_count,
                self.success_rate,
                self.avg_execution_time_ms,
            ));
        skill.orchestrator_id = self.orchestrator_id.clone();
        skill
    }
}

/// Complete file configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub engine: FileEngineConfig,
    pub context: FileContextConfig,
    pub review: FileReviewConfig,
    pub audit: FileAuditConfig,
    /// Replaces the built-in classification tables when present
    pub classification: Option<ClassificationRules>,
    /// Replaces the built-in approval policy when present
    pub approval: Option<ApprovalPolicy>,
    /// Replaces the built-in skill catalog when non-empty
    pub skills: Vec<FileSkillConfig>,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.context.lookup_timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.review.max_iterations == 0 {
            return Err(ConfigValidationError::InvalidIterations);
        }

        let mut seen = HashSet::new();
        for skill in &self.skills {
            if skill.id.trim().is_empty() {
                return Err(ConfigValidationError::EmptySkillId);
            }
            if !(0.0..=100.0).contains(&skill.success_rate) {
                return Err(ConfigValidationError::InvalidSuccessRate(skill.id.clone()));
            }
            if !seen.insert(skill.id.as_str()) {
                return Err(ConfigValidationError::DuplicateSkill(skill.id.clone()));
            }
        }

        if let Some(rules) = &self.classification {
            rules.clone().validated()?;
        }
        if let Some(policy) = &self.approval {
            policy.clone().validated()?;
        }
        Ok(())
    }

    /// Build the engine configuration the use cases consume.
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigValidationError> {
        self.validate()?;

        let context = ContextConfig {
            lookup_timeout: Duration::from_millis(self.context.lookup_timeout_ms),
            max_projects: self.context.max_projects,
            max_tasks: self.context.max_tasks,
            max_decisions: self.context.max_decisions,
        };
        let review = ReviewConfig {
            policy: ReviewLoopPolicy {
                clamp_quality_regression: self.review.clamp_quality_regression,
                ..ReviewLoopPolicy::default()
            }
            .with_max_iterations(self.review.max_iterations),
            deadline: self.review.deadline_seconds.map(Duration::from_secs),
        };

        Ok(EngineConfig::default()
            .with_agent_id(&self.engine.agent_id)
            .with_classification(self.classification.clone().unwrap_or_default())
            .with_approval(self.approval.clone().unwrap_or_default())
            .with_context(context)
            .with_review(review)
            .with_metrics_mode(self.engine.metrics_mode))
    }

    /// Skills for the registry: `[[skills]]` if given, else the stock catalog.
    pub fn skill_catalog(&self) -> Vec<Skill> {
        if self.skills.is_empty() {
            Skill::default_catalog()
        } else {
            self.skills.iter().map(FileSkillConfig::to_skill).collect()
        }
    }

    /// Render as TOML (for `show-config`).
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
