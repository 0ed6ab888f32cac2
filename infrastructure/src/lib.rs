//! Infrastructure layer for skillgate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod agents;
pub mod config;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use agents::{DryRunSkillExecutor, HeuristicCodeValidator, TemplateCodeGenerator};
pub use config::{
    ConfigLoader, ConfigValidationError, FileAuditConfig, FileConfig, FileContextConfig,
    FileEngineConfig, FileReviewConfig, FileSkillConfig,
};
pub use logging::JsonlAuditStore;
pub use store::{InMemoryExecutionStore, InMemorySkillRegistry, StaticContextStore};

#[cfg(test)]
mod tests {
    //! Offline wiring of every adapter through the application use cases.

    use super::*;
    use serde_json::json;
    use skillgate_application::{
        CodeGenerationSkillExecutor, EngineConfig, ExecutionStore, ProcessCommandUseCase,
        RunReviewLoopUseCase, SkillRegistry,
    };
    use skillgate_domain::{
        CodeGenerationRequest, CommandInput, CommandSource, ExecutionStatus, ReviewLoopStatus,
        Skill,
    };
    use std::sync::Arc;

    fn review_loop(config: &EngineConfig) -> Arc<RunReviewLoopUseCase> {
        Arc::new(
            RunReviewLoopUseCase::new(
                Arc::new(TemplateCodeGenerator::new()),
                Arc::new(HeuristicCodeValidator::new()),
            )
            .with_policy(config.review.policy),
        )
    }

    #[tokio::test]
    async fn test_offline_review_loop_converges() {
        let config = EngineConfig::default();
        let request = CodeGenerationRequest::new("Signup form", "Collect email and password")
            .with_requirement("validate email")
            .with_requirement("hash password")
            .with_requirement("send confirmation")
            .with_requirement("rate limit attempts");

        let result = review_loop(&config).execute(&request).await.unwrap();

        assert_eq!(result.status, ReviewLoopStatus::Approved);
        assert_eq!(result.iterations, 2);
        assert_eq!(result.history.len(), 2);
        assert!(result.final_code.tests.is_some());
        assert!(
            result
                .history
                .windows(2)
                .all(|w| w[0].code.quality() <= w[1].code.quality())
        );
    }

    #[tokio::test]
    async fn test_offline_pipeline() {
        let config = EngineConfig::default();
        let registry = Arc::new(InMemorySkillRegistry::new(Skill::default_catalog()));
        let executions = Arc::new(InMemoryExecutionStore::new());
        let context = Arc::new(StaticContextStore::new(
            vec![json!({"name": "Relaunch", "status": "active"})],
            vec![],
            vec![],
        ));
        let executor = Arc::new(
            CodeGenerationSkillExecutor::new(Arc::new(DryRunSkillExecutor), review_loop(&config)),
        );
        let use_case = ProcessCommandUseCase::new(
            &config,
            context,
            registry.clone(),
            executor,
            executions.clone(),
        )
        .unwrap();

        let done = use_case
            .execute(CommandInput::new("what is the status of Relaunch", CommandSource::Voice))
            .await;
        assert!(done.success);
        assert_eq!(done.output["output"]["context_records"]["projects"], 1);

        let gated = use_case
            .execute(CommandInput::new("deploy Relaunch to production", CommandSource::Text))
            .await;
        assert!(gated.approval_required);

        let records = executions.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, ExecutionStatus::Completed);
        assert!(records[1].is_awaiting_approval());

        let keeper = registry.get_skill("18-legacy-keeper").await.unwrap().unwrap();
        assert_eq!(keeper.metrics.usage_count, 1);
    }
}
