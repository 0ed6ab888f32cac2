//! Versioned classification rules for the PASS pipeline.
//!
//! The keyword families, urgency markers, scope thresholds, skill table and
//! sub-task templates are data, not code. [`ClassificationRules::default`]
//! carries the stock table; a config file can replace any part of it.

use super::problem::{ProblemType, Scope, Urgency};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A keyword family for one problem type.
///
/// `keywords` match as substrings, `words` only on word boundaries (for
/// short tokens such as "do" that would otherwise hit "document").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRule {
    pub problem_type: ProblemType,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub words: Vec<String>,
}

impl TypeRule {
    pub fn new(problem_type: ProblemType, keywords: &[&str]) -> Self {
        Self {
            problem_type,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            words: Vec::new(),
        }
    }

    pub fn with_words(mut self, words: &[&str]) -> Self {
        self.words = words.iter().map(|w| w.to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyRule {
    pub urgency: Urgency,
    pub keywords: Vec<String>,
}

/// Word-count thresholds. Strictly greater than the bound moves up a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeThresholds {
    pub moderate_above: usize,
    pub complex_above: usize,
}

impl Default for ScopeThresholds {
    fn default() -> Self {
        Self {
            moderate_above: 10,
            complex_above: 20,
        }
    }
}

impl ScopeThresholds {
    pub fn scope_for(&self, words: usize) -> Scope {
        if words > self.complex_above {
            Scope::Complex
        } else if words > self.moderate_above {
            Scope::Moderate
        } else {
            Scope::Simple
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMapping {
    pub problem_type: ProblemType,
    pub skill_id: String,
}

/// When the solution carries a `requires_approval` hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalHintRule {
    pub problem_types: Vec<ProblemType>,
    pub urgencies: Vec<Urgency>,
}

impl Default for ApprovalHintRule {
    fn default() -> Self {
        Self {
            problem_types: vec![ProblemType::Deployment, ProblemType::Communication],
            urgencies: vec![Urgency::Critical],
        }
    }
}

/// Placeholder decomposition keyed by scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTaskTemplates {
    pub simple: Vec<String>,
    pub moderate: Vec<String>,
    pub complex: Vec<String>,
}

impl Default for SubTaskTemplates {
    fn default() -> Self {
        let to_vec = |steps: &[&str]| steps.iter().map(|s| s.to_string()).collect();
        Self {
            simple: to_vec(&["Execute primary action"]),
            moderate: to_vec(&[
                "Prepare resources",
                "Execute primary action",
                "Verify results",
            ]),
            complex: to_vec(&[
                "Analyze requirements",
                "Design approach",
                "Prepare resources",
                "Execute in phases",
                "Test and validate",
                "Document and report",
            ]),
        }
    }
}

impl SubTaskTemplates {
    pub fn for_scope(&self, scope: Scope) -> &[String] {
        match scope {
            Scope::Simple => &self.simple,
            Scope::Moderate => &self.moderate,
            Scope::Complex => &self.complex,
        }
    }
}

/// Complete rule set consumed by [`analyze_problem`](super::analyze_problem)
/// and [`plan_solution`](super::plan_solution).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationRules {
    pub version: u32,
    /// Ordered; the first family with a hit decides the type.
    pub type_rules: Vec<TypeRule>,
    pub default_type: ProblemType,
    /// Ordered; the first rule with a hit decides the urgency.
    pub urgency_rules: Vec<UrgencyRule>,
    pub default_urgency: Urgency,
    pub scope: ScopeThresholds,
    pub skills: Vec<SkillMapping>,
    pub approval_hint: ApprovalHintRule,
    pub sub_tasks: SubTaskTemplates,
    /// `{skill}` and `{type}` are substituted.
    pub approach_template: String,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        let map = |problem_type, skill_id: &str| SkillMapping {
            problem_type,
            skill_id: skill_id.to_string(),
        };
        Self {
            version: 1,
            type_rules: vec![
                TypeRule::new(ProblemType::Deployment, &["deploy", "build"]),
                TypeRule::new(ProblemType::Creation, &["create", "generate"]),
                TypeRule::new(ProblemType::Analysis, &["analyze", "review"]),
                TypeRule::new(ProblemType::Communication, &["email", "message"]),
                TypeRule::new(ProblemType::Task, &["execute"]).with_words(&["do", "run"]),
            ],
            default_type: ProblemType::Query,
            urgency_rules: vec![
                UrgencyRule {
                    urgency: Urgency::Critical,
                    keywords: vec!["urgent".to_string(), "asap".to_string()],
                },
                UrgencyRule {
                    urgency: Urgency::High,
                    keywords: vec!["important".to_string()],
                },
            ],
            default_urgency: Urgency::Medium,
            scope: ScopeThresholds::default(),
            skills: vec![
                map(ProblemType::Deployment, "01-deployment-devops"),
                map(ProblemType::Creation, "08-web-artifacts-builder"),
                map(ProblemType::Analysis, "03-marketing-growth"),
                map(ProblemType::Communication, "14-internal-comms"),
                map(ProblemType::Task, "06-client-delivery"),
                map(ProblemType::Query, "18-legacy-keeper"),
            ],
            approval_hint: ApprovalHintRule::default(),
            sub_tasks: SubTaskTemplates::default(),
            approach_template: "Use {skill} to handle {type} request".to_string(),
        }
    }
}

impl ClassificationRules {
    /// Check the rule set is total and lowercase its keywords.
    ///
    /// Every problem type must map to exactly one skill, otherwise
    /// [`plan_solution`](super::plan_solution) could not be total.
    pub fn validated(mut self) -> Result<Self, DomainError> {
        for problem_type in ProblemType::ALL {
            let count = self
                .skills
                .iter()
                .filter(|m| m.problem_type == problem_type)
                .count();
            if count != 1 {
                return Err(DomainError::InvalidRules(format!(
                    "problem type '{}' must map to exactly one skill (found {})",
                    problem_type, count
                )));
            }
        }
        if self.skills.iter().any(|m| m.skill_id.trim().is_empty()) {
            return Err(DomainError::InvalidRules("empty skill id".to_string()));
        }
        if self.scope.moderate_above > self.scope.complex_above {
            return Err(DomainError::InvalidRules(
                "moderate_above must not exceed complex_above".to_string(),
            ));
        }

        let lower = |v: &mut Vec<String>| {
            v.iter_mut().for_each(|k| *k = k.trim().to_lowercase());
            v.retain(|k| !k.is_empty());
        };
        for rule in &mut self.type_rules {
            lower(&mut rule.keywords);
            lower(&mut rule.words);
        }
        for rule in &mut self.urgency_rules {
            lower(&mut rule.keywords);
        }
        Ok(self)
    }

    pub fn skill_for(&self, problem_type: ProblemType) -> Option<&str> {
        self.skills
            .iter()
            .find(|m| m.problem_type == problem_type)
            .map(|m| m.skill_id.as_str())
    }

    /// Every skill id this rule set can route to.
    pub fn routed_skills(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|m| m.skill_id.as_str())
    }
}
