//! PASS pipeline use case.
//!
//! Turns a raw command into a routable [`Solution`]:
//!
//! 1. **Problem**: keyword classification (pure)
//! 2. **Amplification**: three concurrent, individually time-boxed context
//!    lookups; a failed or slow source degrades to an empty sequence
//! 3. **Solution**: skill table lookup and sub-task template (pure)

use crate::config::ContextConfig;
use crate::ports::context_store::ContextStorePort;
use crate::ports::progress::{ProgressNotifier, Stage};
use crate::ports::store_error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use skillgate_domain::{
    ClassificationRules, CommandInput, Context, ContextSource, DomainError, Problem, Solution,
    analyze_problem, plan_solution,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone)]
pub enum PassError {
    #[error("Invalid classification rules: {0}")]
    InvalidRules(#[from] DomainError),

    #[error("No skill mapped for problem type '{0}'")]
    NoSkillMapping(String),
}

/// Output of the first three PASS stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub problem: Problem,
    pub context: Context,
    pub solution: Solution,
}

pub struct PassPipeline {
    rules: Arc<ClassificationRules>,
    context_store: Arc<dyn ContextStorePort>,
    config: ContextConfig,
}

impl PassPipeline {
    /// Build the pipeline, validating the rule set up front.
    pub fn new(
        rules: ClassificationRules,
        context_store: Arc<dyn ContextStorePort>,
        config: ContextConfig,
    ) -> Result<Self, PassError> {
        Ok(Self {
            rules: Arc::new(rules.validated()?),
            context_store,
            config,
        })
    }

    pub fn rules(&self) -> &ClassificationRules {
        &self.rules
    }

    /// Stage 1: classify the command text.
    pub fn analyze_problem(&self, command: &str) -> Problem {
        analyze_problem(command, &self.rules)
    }

    /// Stage 2: gather advisory context.
    ///
    /// Never fails. Each source is bounded by `lookup_timeout`; sources that
    /// error or time out come back empty and are listed in `degraded`.
    pub async fn amplify_context(
        &self,
        problem: &Problem,
        user_context: Option<&Map<String, Value>>,
    ) -> Context {
        debug!(
            "Amplifying context for {} problem (user context keys: {})",
            problem.problem_type,
            user_context.map(|c| c.len()).unwrap_or(0)
        );

        let store = &self.context_store;
        let timeout = self.config.lookup_timeout;

        let (projects, tasks, decisions) = tokio::join!(
            bounded_lookup(
                ContextSource::Projects,
                timeout,
                self.config.max_projects,
                store.active_projects(self.config.max_projects),
            ),
            bounded_lookup(
                ContextSource::Tasks,
                timeout,
                self.config.max_tasks,
                store.open_tasks(self.config.max_tasks),
            ),
            bounded_lookup(
                ContextSource::Decisions,
                timeout,
                self.config.max_decisions,
                store.accepted_decisions(self.config.max_decisions),
            ),
        );

        let mut context = Context::default();
        for (source, result) in [
            (ContextSource::Projects, projects),
            (ContextSource::Tasks, tasks),
            (ContextSource::Decisions, decisions),
        ] {
            match result {
                Some(records) => match source {
                    ContextSource::Projects => context.relevant_projects = records,
                    ContextSource::Tasks => context.relevant_tasks = records,
                    ContextSource::Decisions => context.historical_decisions = records,
                },
                None => context.degraded.push(source),
            }
        }

        info!(
            "Context gathered: {} projects, {} tasks, {} decisions{}",
            context.relevant_projects.len(),
            context.relevant_tasks.len(),
            context.historical_decisions.len(),
            if context.is_degraded() { " (degraded)" } else { "" }
        );
        context
    }

    /// Stage 3: pick the skill and approach.
    pub fn identify_solution(
        &self,
        problem: &Problem,
        context: &Context,
    ) -> Result<Solution, PassError> {
        plan_solution(problem, context, &self.rules)
            .ok_or_else(|| PassError::NoSkillMapping(problem.problem_type.to_string()))
    }

    /// Run stages 1 to 3 in order.
    pub async fn classify(
        &self,
        input: &CommandInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<Classification, PassError> {
        if input.is_blank() {
            warn!("Blank command text; falling back to default classification");
        }

        progress.on_stage_start(Stage::Problem);
        let problem = self.analyze_problem(input.text());
        info!(
            "Problem analyzed: type={} urgency={} scope={}",
            problem.problem_type, problem.urgency, problem.scope
        );
        progress.on_problem(&problem);
        progress.on_stage_complete(Stage::Problem, true);

        progress.on_stage_start(Stage::Amplification);
        let context = self.amplify_context(&problem, input.user_context()).await;
        progress.on_stage_complete(Stage::Amplification, !context.is_degraded());

        progress.on_stage_start(Stage::Solution);
        let solution = match self.identify_solution(&problem, &context) {
            Ok(solution) => solution,
            Err(e) => {
                progress.on_stage_complete(Stage::Solution, false);
                return Err(e);
            }
        };
        info!(
            "Solution identified: skill={} approval_hint={}",
            solution.skill_id, solution.requires_approval
        );
        progress.on_solution(&solution);
        progress.on_stage_complete(Stage::Solution, true);

        Ok(Classification {
            problem,
            context,
            solution,
        })
    }
}

/// Await one lookup with a bounded wait, capping the result size.
async fn bounded_lookup<F>(
    source: ContextSource,
    timeout: Duration,
    limit: usize,
    lookup: F,
) -> Option<Vec<Value>>
where
    F: Future<Output = Result<Vec<Value>, StoreError>>,
{
    match tokio::time::timeout(timeout, lookup).await {
        Ok(Ok(mut records)) => {
            records.truncate(limit);
            Some(records)
        }
        Ok(Err(e)) => {
            warn!("Context lookup '{}' failed: {}", source, e);
            None
        }
        Err(_) => {
            warn!(
                "Context lookup '{}' timed out after {}ms",
                source,
                timeout.as_millis()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use serde_json::json;
    use skillgate_domain::{CommandSource, ProblemType, Urgency};

    #[derive(Clone, Copy)]
    enum Behaviour {
        Ok(usize),
        Fail,
        Hang,
    }

    struct FakeStore {
        projects: Behaviour,
        tasks: Behaviour,
        decisions: Behaviour,
    }

    impl FakeStore {
        fn healthy() -> Self {
            Self {
                projects: Behaviour::Ok(2),
                tasks: Behaviour::Ok(20),
                decisions: Behaviour::Ok(1),
            }
        }

        async fn run(behaviour: Behaviour, kind: &str) -> Result<Vec<Value>, StoreError> {
            match behaviour {
                Behaviour::Ok(n) => Ok((0..n).map(|i| json!({ "kind": kind, "i": i })).collect()),
                Behaviour::Fail => Err(StoreError::Backend("down".to_string())),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(vec![])
                }
            }
        }
    }

    #[async_trait]
    impl ContextStorePort for FakeStore {
        async fn active_projects(&self, _limit: usize) -> Result<Vec<Value>, StoreError> {
            Self::run(self.projects, "project").await
        }

        async fn open_tasks(&self, _limit: usize) -> Result<Vec<Value>, StoreError> {
            Self::run(self.tasks, "task").await
        }

        async fn accepted_decisions(&self, _limit: usize) -> Result<Vec<Value>, StoreError> {
            Self::run(self.decisions, "decision").await
        }
    }

    fn pipeline(store: FakeStore) -> PassPipeline {
        PassPipeline::new(
            ClassificationRules::default(),
            Arc::new(store),
            ContextConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_classify_end_to_end() {
        let pass = pipeline(FakeStore::healthy());
        let input = CommandInput::new("urgent: deploy the new release", CommandSource::Voice);
        let c = pass.classify(&input, &NoProgress).await.unwrap();

        assert_eq!(c.problem.problem_type, ProblemType::Deployment);
        assert_eq!(c.problem.urgency, Urgency::Critical);
        assert_eq!(c.solution.skill_id, "01-deployment-devops");
        assert!(c.solution.requires_approval);
        assert_eq!(c.context.relevant_projects.len(), 2);
        // capped to max_tasks
        assert_eq!(c.context.relevant_tasks.len(), 10);
        assert!(!c.context.is_degraded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_lookup_decays_to_empty() {
        let pass = pipeline(FakeStore {
            projects: Behaviour::Ok(1),
            tasks: Behaviour::Fail,
            decisions: Behaviour::Ok(3),
        });
        let problem = pass.analyze_problem("status");
        let context = pass.amplify_context(&problem, None).await;

        assert_eq!(context.relevant_projects.len(), 1);
        assert!(context.relevant_tasks.is_empty());
        assert_eq!(context.historical_decisions.len(), 3);
        assert_eq!(context.degraded, vec![ContextSource::Tasks]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_lookup_times_out() {
        let pass = pipeline(FakeStore {
            projects: Behaviour::Hang,
            tasks: Behaviour::Ok(1),
            decisions: Behaviour::Ok(1),
        });
        let problem = pass.analyze_problem("status");
        let started = tokio::time::Instant::now();
        let context = pass.amplify_context(&problem, None).await;

        assert!(started.elapsed() <= Duration::from_secs(3));
        assert!(context.relevant_projects.is_empty());
        assert_eq!(context.relevant_tasks.len(), 1);
        assert_eq!(context.degraded, vec![ContextSource::Projects]);
    }

    #[tokio::test]
    async fn test_blank_command_falls_back() {
        let pass = pipeline(FakeStore::healthy());
        let input = CommandInput::new("", CommandSource::Text);
        let c = pass.classify(&input, &NoProgress).await.unwrap();
        assert_eq!(c.problem.problem_type, ProblemType::Query);
        assert_eq!(c.solution.skill_id, "18-legacy-keeper");
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let mut rules = ClassificationRules::default();
        rules.skills.clear();
        let result = PassPipeline::new(
            rules,
            Arc::new(FakeStore::healthy()),
            ContextConfig::default(),
        );
        assert!(matches!(result, Err(PassError::InvalidRules(_))));
    }
}
