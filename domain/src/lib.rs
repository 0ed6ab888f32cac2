//! Domain layer for skillgate
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## PASS classification
//!
//! A command is turned into a [`Problem`], amplified with a [`Context`] and
//! mapped to a [`Solution`]. The keyword families and lookup tables live in a
//! versioned [`ClassificationRules`] value.
//!
//! ## Approval tiers
//!
//! [`ApprovalPolicy::classify`] assigns every solution exactly one
//! [`ApprovalTier`]: auto, draft, confirm or block.
//!
//! ## Skills
//!
//! A [`Skill`] carries live [`SkillMetrics`] updated once per routed call.
//!
//! ## Review loop
//!
//! Value types for the bounded generate/validate/improve cycle.

pub mod approval;
pub mod command;
pub mod core;
pub mod execution;
pub mod pass;
pub mod prompt;
pub mod review;
pub mod skill;

// Re-export commonly used types
pub use approval::{ApprovalCheck, ApprovalPolicy, ApprovalTier, TierRule};
pub use command::{CommandInput, CommandSource};
pub use core::error::DomainError;
pub use execution::{
    ExecutionId, ExecutionPatch, ExecutionRecord, ExecutionResult, ExecutionStatus, NewExecution,
    PerformanceReport,
};
pub use pass::{
    ClassificationRules, Context, ContextSource, Problem, ProblemType, Scope, Solution, Urgency,
    analyze_problem, plan_solution,
};
pub use prompt::ReviewPromptTemplate;
pub use review::{
    CodeGenerationRequest, CodeGenerationResult, CodeMetadata, GeneratedFile, IssueSeverity,
    ReviewIssue, ReviewIteration, ReviewLoopPolicy, ReviewLoopResult, ReviewLoopStatus,
    ReviewResult, improvement_directive,
};
pub use skill::{MetricsMode, Skill, SkillContract, SkillMetrics, SkillStatus};
