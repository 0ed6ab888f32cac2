//! Application layer for skillgate
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ContextConfig, EngineConfig, ReviewConfig};
pub use ports::{
    code_generator::{CodeGenerator, GenerationError},
    code_validator::{CodeValidator, ValidationError},
    completion::{CompletionError, CompletionService},
    context_store::ContextStorePort,
    execution_store::ExecutionStore,
    progress::{NoProgress, ProgressNotifier, Stage},
    skill_executor::{SkillExecutionError, SkillExecutorPort, SkillInvocation, SkillOutcome},
    skill_registry::SkillRegistry,
    store_error::StoreError,
};
pub use use_cases::classify_command::{Classification, PassError, PassPipeline};
pub use use_cases::code_generation_skill::CodeGenerationSkillExecutor;
pub use use_cases::completion_agents::{CompletionCodeGenerator, CompletionCodeValidator};
pub use use_cases::process_command::{CommandPreview, ProcessCommandError, ProcessCommandUseCase};
pub use use_cases::route_skill::{RouteError, RoutedOutput, SkillRouter};
pub use use_cases::run_review_loop::{ReviewLoopError, ReviewRunOptions, RunReviewLoopUseCase};
