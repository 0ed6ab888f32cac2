//! Skill router use case.
//!
//! Looks a skill up, runs it through the executor and records exactly one
//! metrics update per resolved invocation, success or failure.

use crate::ports::skill_executor::{
    SkillExecutionError, SkillExecutorPort, SkillInvocation, SkillOutcome,
};
use crate::ports::skill_registry::SkillRegistry;
use crate::ports::store_error::StoreError;
use skillgate_domain::{MetricsMode, Skill};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone)]
pub enum RouteError {
    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("Skill registry error: {0}")]
    Registry(#[from] StoreError),

    #[error("{source}")]
    Execution {
        source: SkillExecutionError,
        elapsed_ms: u64,
    },
}

impl RouteError {
    /// Wall time spent in the executor, when it was reached.
    pub fn elapsed_ms(&self) -> Option<u64> {
        match self {
            RouteError::Execution { elapsed_ms, .. } => Some(*elapsed_ms),
            _ => None,
        }
    }
}

/// Successful routing outcome.
#[derive(Debug, Clone)]
pub struct RoutedOutput {
    pub skill: Skill,
    pub outcome: SkillOutcome,
    pub elapsed_ms: u64,
}

pub struct SkillRouter {
    registry: Arc<dyn SkillRegistry>,
    executor: Arc<dyn SkillExecutorPort>,
    metrics_mode: MetricsMode,
}

impl SkillRouter {
    pub fn new(registry: Arc<dyn SkillRegistry>, executor: Arc<dyn SkillExecutorPort>) -> Self {
        Self {
            registry,
            executor,
            metrics_mode: MetricsMode::default(),
        }
    }

    pub fn with_metrics_mode(mut self, mode: MetricsMode) -> Self {
        self.metrics_mode = mode;
        self
    }

    /// Route one invocation to `skill_id`.
    ///
    /// `SkillNotFound` leaves metrics untouched. Any outcome after the
    /// lookup records usage, including executor errors.
    pub async fn route(
        &self,
        skill_id: &str,
        invocation: &SkillInvocation,
    ) -> Result<RoutedOutput, RouteError> {
        let skill = self
            .registry
            .get_skill(skill_id)
            .await?
            .ok_or_else(|| RouteError::SkillNotFound(skill_id.to_string()))?;

        debug!("Routing to skill {} ({})", skill.skill_id, skill.name);
        let started = Instant::now();
        let result = self.executor.execute(&skill, invocation).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let success = result.is_ok();

        let updated = match self
            .registry
            .update_skill_metrics(&skill.skill_id, success, elapsed_ms, self.metrics_mode)
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                warn!("Failed to update metrics for {}: {}", skill.skill_id, e);
                skill
            }
        };

        match result {
            Ok(outcome) => {
                info!(
                    "Skill {} completed in {}ms (usage={}, success_rate={:.1}%)",
                    updated.skill_id,
                    elapsed_ms,
                    updated.metrics.usage_count,
                    updated.metrics.success_rate
                );
                Ok(RoutedOutput {
                    skill: updated,
                    outcome,
                    elapsed_ms,
                })
            }
            Err(source) => {
                warn!("Skill {} failed after {}ms: {}", updated.skill_id, elapsed_ms, source);
                Err(RouteError::Execution { source, elapsed_ms })
            }
        }
    }

    /// Active skills, in registry order.
    pub async fn available_skills(&self) -> Result<Vec<Skill>, RouteError> {
        let skills = self.registry.list_skills().await?;
        Ok(skills.into_iter().filter(Skill::is_active).collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use skillgate_domain::{
        Context, Problem, ProblemType, Scope, SkillStatus, Solution, Urgency,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Registry fake backed by a single mutex.
    pub(crate) struct FakeRegistry {
        pub skills: Mutex<HashMap<String, Skill>>,
        pub updates: AtomicUsize,
    }

    impl FakeRegistry {
        pub fn with(skills: Vec<Skill>) -> Self {
            Self {
                skills: Mutex::new(
                    skills
                        .into_iter()
                        .map(|s| (s.skill_id.clone(), s))
                        .collect(),
                ),
                updates: AtomicUsize::new(0),
            }
        }

        pub fn skill(&self, id: &str) -> Skill {
            self.skills.lock().unwrap()[id].clone()
        }
    }

    #[async_trait]
    impl SkillRegistry for FakeRegistry {
        async fn get_skill(&self, skill_id: &str) -> Result<Option<Skill>, StoreError> {
            Ok(self.skills.lock().unwrap().get(skill_id).cloned())
        }

        async fn update_skill_metrics(
            &self,
            skill_id: &str,
            success: bool,
            elapsed_ms: u64,
            mode: MetricsMode,
        ) -> Result<Skill, StoreError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            let mut skills = self.skills.lock().unwrap();
            let skill = skills
                .get_mut(skill_id)
                .ok_or_else(|| StoreError::NotFound(skill_id.to_string()))?;
            skill.record_invocation(success, elapsed_ms, mode);
            Ok(skill.clone())
        }

        async fn list_skills(&self) -> Result<Vec<Skill>, StoreError> {
            let mut skills: Vec<Skill> = self.skills.lock().unwrap().values().cloned().collect();
            skills.sort_by(|a, b| a.skill_id.cmp(&b.skill_id));
            Ok(skills)
        }
    }

    /// Executor fake: succeeds unless the command contains "fail".
    pub(crate) struct FakeExecutor;

    #[async_trait]
    impl SkillExecutorPort for FakeExecutor {
        async fn execute(
            &self,
            skill: &Skill,
            invocation: &SkillInvocation,
        ) -> Result<SkillOutcome, SkillExecutionError> {
            if invocation.command.contains("fail") {
                return Err(SkillExecutionError::Failed {
                    skill_id: skill.skill_id.clone(),
                    message: "boom".to_string(),
                });
            }
            Ok(SkillOutcome::new(json!({ "handled_by": skill.skill_id })))
        }
    }

    pub(crate) fn invocation(command: &str, skill_id: &str) -> SkillInvocation {
        SkillInvocation {
            command: command.to_string(),
            problem: Problem {
                problem_type: ProblemType::Task,
                intent: command.to_string(),
                entities: vec![],
                urgency: Urgency::Medium,
                scope: Scope::Simple,
            },
            context: Context::default(),
            solution: Solution {
                skill_id: skill_id.to_string(),
                approach: format!("Use {} to handle task request", skill_id),
                estimated_complexity: Scope::Simple,
                requires_approval: false,
                sub_tasks: vec!["Execute directly".to_string()],
            },
        }
    }

    fn router(registry: Arc<FakeRegistry>) -> SkillRouter {
        SkillRouter::new(registry, Arc::new(FakeExecutor))
    }

    #[tokio::test]
    async fn test_route_success_updates_metrics() {
        let registry = Arc::new(FakeRegistry::with(vec![Skill::new("s1", "One")]));
        let routed = router(registry.clone())
            .route("s1", &invocation("do it", "s1"))
            .await
            .unwrap();

        assert_eq!(routed.outcome.output["handled_by"], "s1");
        assert_eq!(routed.skill.metrics.usage_count, 1);
        assert_eq!(registry.skill("s1").metrics.success_count, 1);
    }

    #[tokio::test]
    async fn test_route_failure_still_updates_metrics() {
        let registry = Arc::new(FakeRegistry::with(vec![Skill::new("s1", "One")]));
        let err = router(registry.clone())
            .route("s1", &invocation("please fail", "s1"))
            .await
            .unwrap_err();

        assert!(matches!(err, RouteError::Execution { .. }));
        assert!(err.elapsed_ms().is_some());
        let metrics = registry.skill("s1").metrics;
        assert_eq!(metrics.usage_count, 1);
        assert_eq!(metrics.success_count, 0);
        assert_eq!(metrics.success_rate, 0.0);
    }

    #[tokio::test]
    async fn test_route_unknown_skill_skips_metrics() {
        let registry = Arc::new(FakeRegistry::with(vec![]));
        let err = router(registry.clone())
            .route("ghost", &invocation("do it", "ghost"))
            .await
            .unwrap_err();

        assert!(matches!(err, RouteError::SkillNotFound(id) if id == "ghost"));
        assert_eq!(registry.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_available_skills_filters_inactive() {
        let registry = Arc::new(FakeRegistry::with(vec![
            Skill::new("a", "A"),
            Skill::new("b", "B").with_status(SkillStatus::Inactive),
        ]));
        let skills = router(registry).available_skills().await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].skill_id, "a");
    }
}
