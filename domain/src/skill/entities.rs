//! Skill entity.

use super::metrics::{MetricsMode, SkillMetrics};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillStatus {
    #[default]
    Active,
    Inactive,
}

/// What executing the skill involves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillContract {
    /// A single opaque call to the skill executor.
    #[default]
    Standard,
    /// Produces code and must converge through the review loop.
    CodeGeneration,
}

impl SkillContract {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillContract::Standard => "standard",
            SkillContract::CodeGeneration => "code_generation",
        }
    }
}

/// A named capability the router can invoke.
///
/// Created out-of-band from configuration; only the router mutates
/// `metrics`, once per routed invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub skill_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orchestrator_id: Option<String>,
    #[serde(default)]
    pub status: SkillStatus,
    #[serde(default)]
    pub contract: SkillContract,
    #[serde(default)]
    pub metrics: SkillMetrics,
}

impl Skill {
    pub fn new(skill_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            skill_id: skill_id.into(),
            name: name.into(),
            orchestrator_id: None,
            status: SkillStatus::Active,
            contract: SkillContract::Standard,
            metrics: SkillMetrics::default(),
        }
    }

    pub fn with_orchestrator(mut self, orchestrator_id: impl Into<String>) -> Self {
        self.orchestrator_id = Some(orchestrator_id.into());
        self
    }

    pub fn with_contract(mut self, contract: SkillContract) -> Self {
        self.contract = contract;
        self
    }

    pub fn with_status(mut self, status: SkillStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_metrics(mut self, metrics: SkillMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == SkillStatus::Active
    }

    pub fn record_invocation(&mut self, success: bool, elapsed_ms: u64, mode: MetricsMode) {
        self.metrics.record(success, elapsed_ms, mode);
    }

    /// The stock catalog: every skill the default classification and
    /// approval rules refer to.
    pub fn default_catalog() -> Vec<Skill> {
        let skill = |id: &str, name: &str| {
            Skill::new(id, name).with_orchestrator(format!("{}-orchestrator", id))
        };
        vec![
            skill("01-deployment-devops", "Deployment & DevOps"),
            skill("03-marketing-growth", "Marketing & Growth"),
            skill("04-fundraising-investor", "Fundraising & Investor Relations"),
            skill("05-finance-ops", "Finance Operations"),
            skill("06-client-delivery", "Client Delivery"),
            skill("07-avatar-comic-scriptwriter", "Avatar Comic Scriptwriter"),
            skill("08-web-artifacts-builder", "Web Artifacts Builder")
                .with_contract(SkillContract::CodeGeneration),
            skill("14-internal-comms", "Internal Communications"),
            skill("15-gratitude-department", "Gratitude Department"),
            skill("18-legacy-keeper", "Legacy Keeper"),
        ]
    }
}
