//! Classification domain for the PASS pipeline (Problem, Amplification, Solution).
//!
//! Everything here is pure: the analyzer and planner take a
//! [`ClassificationRules`] value and never touch I/O. Context lookups live
//! behind a port in the application layer.

pub mod analysis;
pub mod context;
pub mod planning;
pub mod problem;
pub mod rules;
pub mod solution;

pub use analysis::{analyze_problem, extract_entities};
pub use context::{Context, ContextSource};
pub use planning::plan_solution;
pub use problem::{Problem, ProblemType, Scope, Urgency};
pub use rules::{
    ApprovalHintRule, ClassificationRules, ScopeThresholds, SkillMapping, SubTaskTemplates,
    TypeRule, UrgencyRule,
};
pub use solution::Solution;
