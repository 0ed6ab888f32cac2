//! Process Command use case
//!
//! The orchestrator. One command moves through:
//!
//! `started → PASS → approval gate → { awaiting approval | routed → completed | routed → failed }`
//!
//! The execution record is an audit trail: store failures are logged and
//! never change the returned [`ExecutionResult`].

use crate::config::EngineConfig;
use crate::ports::context_store::ContextStorePort;
use crate::ports::execution_store::ExecutionStore;
use crate::ports::progress::{NoProgress, ProgressNotifier, Stage};
use crate::ports::skill_executor::{SkillExecutorPort, SkillInvocation};
use crate::ports::skill_registry::SkillRegistry;
use crate::ports::store_error::StoreError;
use crate::use_cases::classify_command::{Classification, PassError, PassPipeline};
use crate::use_cases::route_skill::{RouteError, SkillRouter};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use skillgate_domain::{
    ApprovalCheck, ApprovalPolicy, CommandInput, DomainError, ExecutionId, ExecutionPatch,
    ExecutionResult, NewExecution, PerformanceReport,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

/// Construction-time failures. Runtime problems fold into [`ExecutionResult`].
#[derive(Error, Debug, Clone)]
pub enum ProcessCommandError {
    #[error(transparent)]
    Pass(#[from] PassError),

    #[error("Invalid approval policy: {0}")]
    InvalidPolicy(#[from] DomainError),
}

/// A classification plus the gate's verdict, without executing anything.
#[derive(Debug, Clone, Serialize)]
pub struct CommandPreview {
    pub classification: Classification,
    pub approval: ApprovalCheck,
}

pub struct ProcessCommandUseCase {
    pass: PassPipeline,
    approval: ApprovalPolicy,
    router: SkillRouter,
    executions: Arc<dyn ExecutionStore>,
    agent_id: String,
}

impl ProcessCommandUseCase {
    pub fn new(
        config: &EngineConfig,
        context_store: Arc<dyn ContextStorePort>,
        registry: Arc<dyn SkillRegistry>,
        executor: Arc<dyn SkillExecutorPort>,
        executions: Arc<dyn ExecutionStore>,
    ) -> Result<Self, ProcessCommandError> {
        let pass = PassPipeline::new(
            config.classification.clone(),
            context_store,
            config.context.clone(),
        )?;
        let approval = config.approval.clone().validated()?;
        let router = SkillRouter::new(registry, executor).with_metrics_mode(config.metrics_mode);

        Ok(Self {
            pass,
            approval,
            router,
            executions,
            agent_id: config.agent_id.clone(),
        })
    }

    pub fn router(&self) -> &SkillRouter {
        &self.router
    }

    /// Execute with default (no-op) progress
    pub async fn execute(&self, input: CommandInput) -> ExecutionResult {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the full pipeline with progress callbacks.
    pub async fn execute_with_progress(
        &self,
        input: CommandInput,
        progress: &dyn ProgressNotifier,
    ) -> ExecutionResult {
        let started = Instant::now();
        let execution_id = self.record_start(&input).await;

        let Classification {
            problem,
            context,
            solution,
        } = match self.pass.classify(&input, progress).await {
            Ok(classification) => classification,
            Err(e) => {
                let elapsed = started.elapsed().as_millis() as u64;
                self.record_update(execution_id.as_ref(), ExecutionPatch::failed(e.to_string(), elapsed))
                    .await;
                return failure(execution_id, None, e.to_string());
            }
        };

        // ==================== Approval Gate ====================

        progress.on_stage_start(Stage::Approval);
        let check = self.approval.classify(&solution.skill_id, &solution.approach);
        info!("Approval tier for {}: {} ({})", solution.skill_id, check.tier, check.reason);
        progress.on_approval(&check);
        progress.on_stage_complete(Stage::Approval, !check.is_gated());

        if check.is_gated() {
            let payload = json!({
                "status": "awaiting_approval",
                "problem": problem,
                "solution": solution,
                "approval_check": check,
            });
            self.record_update(
                execution_id.as_ref(),
                ExecutionPatch::awaiting_approval(payload.clone()),
            )
            .await;
            return ExecutionResult {
                success: false,
                skill_used: Some(solution.skill_id.clone()),
                output: payload,
                execution_id,
                approval_required: true,
                approval: Some(check),
                error: None,
            };
        }

        // ==================== Routing ====================

        progress.on_stage_start(Stage::Routing);
        let skill_id = solution.skill_id.clone();
        let invocation = SkillInvocation {
            command: input.text().to_string(),
            problem,
            context,
            solution,
        };

        match self.router.route(&skill_id, &invocation).await {
            Ok(routed) => {
                progress.on_stage_complete(Stage::Routing, true);
                let output = serde_json::to_value(&routed.outcome).unwrap_or(Value::Null);
                self.record_update(
                    execution_id.as_ref(),
                    ExecutionPatch::completed(&skill_id, output.clone(), routed.elapsed_ms),
                )
                .await;
                ExecutionResult {
                    success: true,
                    skill_used: Some(skill_id),
                    output,
                    execution_id,
                    approval_required: false,
                    approval: Some(check),
                    error: None,
                }
            }
            Err(e) => {
                progress.on_stage_complete(Stage::Routing, false);
                let elapsed = e
                    .elapsed_ms()
                    .unwrap_or_else(|| started.elapsed().as_millis() as u64);
                self.record_update(
                    execution_id.as_ref(),
                    ExecutionPatch::failed(e.to_string(), elapsed),
                )
                .await;
                let skill_used = match e {
                    RouteError::SkillNotFound(_) => None,
                    _ => Some(skill_id),
                };
                let mut result = failure(execution_id, skill_used, e.to_string());
                result.approval = Some(check);
                result
            }
        }
    }

    /// Run PASS and the approval gate only.
    pub async fn preview(&self, input: &CommandInput) -> Result<CommandPreview, PassError> {
        let classification = self.pass.classify(input, &NoProgress).await?;
        let approval = self.approval.classify(
            &classification.solution.skill_id,
            &classification.solution.approach,
        );
        Ok(CommandPreview {
            classification,
            approval,
        })
    }

    /// Aggregate over every stored execution record.
    pub async fn performance_report(&self) -> Result<PerformanceReport, StoreError> {
        let records = self.executions.list().await?;
        Ok(PerformanceReport::from_records(&records))
    }

    async fn record_start(&self, input: &CommandInput) -> Option<ExecutionId> {
        let new = NewExecution {
            agent_id: self.agent_id.clone(),
            command: input.text().to_string(),
            input_context: input
                .user_context()
                .map(|c| Value::Object(c.clone()))
                .unwrap_or_else(|| json!({})),
            metadata: input.audit_metadata(),
            started_at: Utc::now(),
        };
        match self.executions.create(new).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Failed to create execution record: {}", e);
                None
            }
        }
    }

    async fn record_update(&self, id: Option<&ExecutionId>, patch: ExecutionPatch) {
        let Some(id) = id else {
            return;
        };
        if let Err(e) = self.executions.update(id, patch).await {
            warn!("Failed to update execution record {}: {}", id, e);
        }
    }
}

fn failure(
    execution_id: Option<ExecutionId>,
    skill_used: Option<String>,
    error: String,
) -> ExecutionResult {
    ExecutionResult {
        success: false,
        skill_used,
        output: Value::Null,
        execution_id,
        approval_required: false,
        approval: None,
        error: Some(error),
    }
}
