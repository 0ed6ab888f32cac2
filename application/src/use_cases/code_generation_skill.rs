//! Skill executor that sends code-generation skills through the review loop.
//!
//! Skills with the [`SkillContract::CodeGeneration`] contract never reach the
//! wrapped executor: the command becomes a [`CodeGenerationRequest`] and the
//! loop result becomes the skill output. An unapproved loop is still a
//! successful call, flagged with `needs_follow_up`.

use crate::ports::progress::NoProgress;
use crate::ports::skill_executor::{
    SkillExecutionError, SkillExecutorPort, SkillInvocation, SkillOutcome,
};
use crate::use_cases::run_review_loop::{ReviewRunOptions, RunReviewLoopUseCase};
use async_trait::async_trait;
use serde_json::json;
use skillgate_domain::core::string::truncate;
use skillgate_domain::review::summarize;
use skillgate_domain::{CodeGenerationRequest, Skill, SkillContract};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

const FEATURE_NAME_LEN: usize = 60;

pub struct CodeGenerationSkillExecutor {
    inner: Arc<dyn SkillExecutorPort>,
    review_loop: Arc<RunReviewLoopUseCase>,
    deadline: Option<Duration>,
    cancellation: CancellationToken,
}

impl CodeGenerationSkillExecutor {
    pub fn new(inner: Arc<dyn SkillExecutorPort>, review_loop: Arc<RunReviewLoopUseCase>) -> Self {
        Self {
            inner,
            review_loop,
            deadline: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Wall-clock budget for each loop run.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Parent token; each run gets a child.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    fn request_for(invocation: &SkillInvocation) -> CodeGenerationRequest {
        let feature = if invocation.problem.entities.is_empty() {
            truncate(invocation.command.trim(), FEATURE_NAME_LEN)
        } else {
            invocation.problem.entities.join(" ")
        };
        invocation
            .solution
            .sub_tasks
            .iter()
            .fold(
                CodeGenerationRequest::new(feature, invocation.command.clone()),
                |req, step| req.with_requirement(step.clone()),
            )
    }
}

#[async_trait]
impl SkillExecutorPort for CodeGenerationSkillExecutor {
    async fn execute(
        &self,
        skill: &Skill,
        invocation: &SkillInvocation,
    ) -> Result<SkillOutcome, SkillExecutionError> {
        if skill.contract != SkillContract::CodeGeneration {
            return self.inner.execute(skill, invocation).await;
        }

        let request = Self::request_for(invocation);
        let mut options =
            ReviewRunOptions::default().with_cancellation(self.cancellation.child_token());
        if let Some(budget) = self.deadline {
            options = options.with_budget(budget);
        }

        info!("Skill {} runs through the review loop", skill.skill_id);
        let result = self
            .review_loop
            .execute_with_progress(&request, &options, &NoProgress)
            .await
            .map_err(|e| SkillExecutionError::Failed {
                skill_id: skill.skill_id.clone(),
                message: e.to_string(),
            })?;

        let summary = summarize(
            &request.feature,
            &result,
            self.review_loop.policy().max_iterations,
        );
        let needs_follow_up = !result.approved;

        Ok(SkillOutcome {
            output: json!({
                "summary": summary,
                "review_loop": result,
            }),
            sub_agents_used: vec!["coder".to_string(), "validator".to_string()],
            needs_follow_up,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::route_skill::tests::{FakeExecutor, invocation};
    use crate::use_cases::run_review_loop::tests::{ScriptedGenerator, ScriptedValidator};
    use skillgate_domain::ReviewLoopPolicy;

    fn executor(approve_at: usize) -> CodeGenerationSkillExecutor {
        let review_loop = RunReviewLoopUseCase::new(
            Arc::new(ScriptedGenerator::new(60, 10)),
            Arc::new(ScriptedValidator::new(approve_at)),
        )
        .with_policy(ReviewLoopPolicy::default().with_max_iterations(3));
        CodeGenerationSkillExecutor::new(Arc::new(FakeExecutor), Arc::new(review_loop))
    }

    fn builder() -> Skill {
        Skill::new("08-web-artifacts-builder", "Web Artifacts Builder")
            .with_contract(SkillContract::CodeGeneration)
    }

    #[tokio::test]
    async fn test_standard_skill_passes_through() {
        let outcome = executor(1)
            .execute(&Skill::new("s1", "One"), &invocation("do it", "s1"))
            .await
            .unwrap();
        assert_eq!(outcome.output["handled_by"], "s1");
        assert!(!outcome.needs_follow_up);
    }

    #[tokio::test]
    async fn test_code_generation_skill_runs_loop() {
        let outcome = executor(2)
            .execute(&builder(), &invocation("create a landing page", "08-web-artifacts-builder"))
            .await
            .unwrap();

        assert!(!outcome.needs_follow_up);
        assert_eq!(outcome.output["review_loop"]["iterations"], 2);
        assert_eq!(outcome.output["review_loop"]["status"], "approved");
        assert!(outcome.output["summary"].as_str().unwrap().contains("APPROVED"));
    }

    #[tokio::test]
    async fn test_unapproved_loop_needs_follow_up() {
        let outcome = executor(0)
            .execute(&builder(), &invocation("create a landing page", "08-web-artifacts-builder"))
            .await
            .unwrap();

        assert!(outcome.needs_follow_up);
        assert_eq!(outcome.output["review_loop"]["status"], "exhausted");
        assert_eq!(outcome.output["review_loop"]["approved"], false);
    }

    #[test]
    fn test_request_from_invocation() {
        let inv = invocation("create a landing page", "08-web-artifacts-builder");
        let req = CodeGenerationSkillExecutor::request_for(&inv);
        assert_eq!(req.feature, "create a landing page");
        assert_eq!(req.requirements, inv.solution.sub_tasks);
    }
}
