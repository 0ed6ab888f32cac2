//! Skill executor that reports the plan instead of acting on it.

use async_trait::async_trait;
use serde_json::json;
use skillgate_application::{SkillExecutionError, SkillExecutorPort, SkillInvocation, SkillOutcome};
use skillgate_domain::{ContextSource, Skill};
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSkillExecutor;

#[async_trait]
impl SkillExecutorPort for DryRunSkillExecutor {
    async fn execute(
        &self,
        skill: &Skill,
        invocation: &SkillInvocation,
    ) -> Result<SkillOutcome, SkillExecutionError> {
        if !skill.is_active() {
            return Err(SkillExecutionError::Unavailable(skill.skill_id.clone()));
        }

        info!(
            "[dry-run] {} would handle: {}",
            skill.skill_id, invocation.solution.approach
        );

        let context = &invocation.context;
        let mut outcome = SkillOutcome::new(json!({
            "mode": "dry_run",
            "skill_id": skill.skill_id,
            "skill_name": skill.name,
            "approach": invocation.solution.approach,
            "sub_tasks": invocation.solution.sub_tasks,
            "context_records": {
                "projects": context.records(ContextSource::Projects).len(),
                "tasks": context.records(ContextSource::Tasks).len(),
                "decisions": context.records(ContextSource::Decisions).len(),
            },
        }));
        if let Some(orchestrator) = &skill.orchestrator_id {
            outcome.sub_agents_used.push(orchestrator.clone());
        }
        Ok(outcome)
    }
}
