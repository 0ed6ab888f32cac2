//! Offline agents: skill execution, code generation and code review
//! without a completion service.

mod dry_run_executor;
mod heuristic_validator;
mod template_generator;

pub use dry_run_executor::DryRunSkillExecutor;
pub use heuristic_validator::HeuristicCodeValidator;
pub use template_generator::TemplateCodeGenerator;
