//! Run Review Loop use case
//!
//! Bounded generate → validate → improve iteration. Strictly sequential
//! within one run. Ends in exactly one of:
//!
//! - **approved**: the validator accepted the current code
//! - **exhausted**: `max_iterations` reviews without approval
//! - **incomplete**: the deadline passed or the run was cancelled; checked
//!   only after an iteration's review completes. The result carries the
//!   highest-scoring iteration so far, not necessarily the latest one.

use crate::ports::code_generator::{CodeGenerator, GenerationError};
use crate::ports::code_validator::{CodeValidator, ValidationError};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use skillgate_domain::{
    CodeGenerationRequest, CodeGenerationResult, ReviewIteration, ReviewResult, ReviewLoopPolicy, ReviewLoopResult, ReviewLoopStatus,
    improvement_directive,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Collaborator failures. Exhaustion and deadline stops are not errors.
#[derive(Error, Debug, Clone)]
pub enum ReviewLoopError {
    #[error("Generation failed in iteration {iteration}: {source}")]
    Generation {
        iteration: usize,
        source: GenerationError,
    },

    #[error("Validation failed in iteration {iteration}: {source}")]
    Validation {
        iteration: usize,
        source: ValidationError,
    },
}

/// Per-run stop conditions.
#[derive(Debug, Clone, Default)]
pub struct ReviewRunOptions {
    pub deadline: Option<Instant>,
    pub cancellation: Option<CancellationToken>,
}

impl ReviewRunOptions {
    /// Deadline `budget` from now.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.deadline = Some(Instant::now() + budget);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn should_stop(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
            || self
                .cancellation
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
    }
}

pub struct RunReviewLoopUseCase {
    generator: Arc<dyn CodeGenerator>,
    validator: Arc<dyn CodeValidator>,
    policy: ReviewLoopPolicy,
}

impl RunReviewLoopUseCase {
    pub fn new(generator: Arc<dyn CodeGenerator>, validator: Arc<dyn CodeValidator>) -> Self {
        Self {
            generator,
            validator,
            policy: ReviewLoopPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReviewLoopPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &ReviewLoopPolicy {
        &self.policy
    }

    /// Run without a deadline and with no-op progress.
    pub async fn execute(
        &self,
        request: &CodeGenerationRequest,
    ) -> Result<ReviewLoopResult, ReviewLoopError> {
        self.execute_with_progress(request, &ReviewRunOptions::default(), &NoProgress)
            .await
    }

    pub async fn execute_with_progress(
        &self,
        request: &CodeGenerationRequest,
        options: &ReviewRunOptions,
        progress: &dyn ProgressNotifier,
    ) -> Result<ReviewLoopResult, ReviewLoopError> {
        let max_iterations = self.policy.max_iterations.max(1);
        info!(
            "Starting review loop for '{}' (max {} iterations)",
            request.feature, max_iterations
        );

        let mut iteration = 1;
        let mut code = self
            .generator
            .generate(request)
            .await
            .map_err(|source| ReviewLoopError::Generation { iteration, source })?;
        let mut history: Vec<ReviewIteration> = Vec::with_capacity(max_iterations);

        let (final_review, status) = loop {
            progress.on_review_iteration(iteration, max_iterations);

            let review = self
                .validator
                .review(&code, iteration)
                .await
                .map_err(|source| ReviewLoopError::Validation { iteration, source })?;
            debug!(
                "Iteration {}: score={} approved={} issues={}",
                iteration,
                review.score,
                review.approved,
                review.issues.len()
            );
            progress.on_review_result(iteration, &review);

            history.push(ReviewIteration {
                iteration,
                code: code.clone(),
                review: review.clone(),
            });

            if review.approved {
                break (review, ReviewLoopStatus::Approved);
            }
            if iteration >= max_iterations {
                break (review, ReviewLoopStatus::Exhausted);
            }
            if options.should_stop() {
                warn!("Review loop stopped after iteration {} (deadline/cancel)", iteration);
                break (review, ReviewLoopStatus::Incomplete);
            }

            let directive = improvement_directive(&review);
            let mut improved = self
                .generator
                .improve(request, &code, &directive)
                .await
                .map_err(|source| ReviewLoopError::Generation {
                    iteration: iteration + 1,
                    source,
                })?;

            if self.policy.clamp_quality_regression && improved.quality() < code.quality() {
                debug!(
                    "Quality regressed {} -> {}; holding at {}",
                    code.quality(),
                    improved.quality(),
                    code.quality()
                );
                improved.metadata.estimated_quality = code.quality();
            }

            code = improved;
            iteration += 1;
        };

        info!(
            "Review loop for '{}' finished: {} after {} iteration(s), score {}",
            request.feature, status, iteration, final_review.score
        );

        let (final_code, final_review) = match status {
            ReviewLoopStatus::Incomplete => {
                best_so_far(&history).unwrap_or((code, final_review))
            }
            _ => (code, final_review),
        };

        Ok(ReviewLoopResult {
            final_code,
            final_review,
            iterations: iteration,
            approved: status == ReviewLoopStatus::Approved,
            status,
            history,
        })
    }
}

/// Highest review score in `history`; ties go to the later iteration.
fn best_so_far(history: &[ReviewIteration]) -> Option<(CodeGenerationResult, ReviewResult)> {
    history
        .iter()
        .max_by_key(|h| h.review.score)
        .map(|h| (h.code.clone(), h.review.clone()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use skillgate_domain::{
        CodeGenerationResult, GeneratedFile, IssueSeverity, ReviewIssue, ReviewResult, Scope,
    };
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Generator whose quality moves by `step` on each improvement.
    pub(crate) struct ScriptedGenerator {
        pub start_quality: u8,
        pub step: i16,
        pub fail_on_improve: bool,
        pub improve_calls: AtomicUsize,
        pub directives: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new(start_quality: u8, step: i16) -> Self {
            Self {
                start_quality,
                step,
                fail_on_improve: false,
                improve_calls: AtomicUsize::new(0),
                directives: Mutex::new(vec![]),
            }
        }

        fn code(quality: u8) -> CodeGenerationResult {
            CodeGenerationResult::from_files(
                vec![GeneratedFile {
                    path: "src/lib.rs".to_string(),
                    content: "pub fn f() {}".to_string(),
                    language: "rust".to_string(),
                }],
                Scope::Simple,
                quality,
            )
        }
    }

    #[async_trait]
    impl CodeGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _request: &CodeGenerationRequest,
        ) -> Result<CodeGenerationResult, GenerationError> {
            Ok(Self::code(self.start_quality))
        }

        async fn improve(
            &self,
            _request: &CodeGenerationRequest,
            previous: &CodeGenerationResult,
            directive: &str,
        ) -> Result<CodeGenerationResult, GenerationError> {
            self.improve_calls.fetch_add(1, Ordering::SeqCst);
            self.directives.lock().unwrap().push(directive.to_string());
            if self.fail_on_improve {
                return Err(GenerationError::Failed("model offline".to_string()));
            }
            let q = (previous.quality() as i16 + self.step).clamp(0, 100) as u8;
            Ok(Self::code(q))
        }
    }

    /// Validator approving from iteration `approve_at` on (0 = never).
    pub(crate) struct ScriptedValidator {
        pub approve_at: usize,
        pub delay: Option<Duration>,
        pub calls: AtomicUsize,
    }

    impl ScriptedValidator {
        pub fn new(approve_at: usize) -> Self {
            Self {
                approve_at,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CodeValidator for ScriptedValidator {
        async fn review(
            &self,
            code: &CodeGenerationResult,
            iteration: usize,
        ) -> Result<ReviewResult, ValidationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let approved = self.approve_at != 0 && iteration >= self.approve_at;
            let issues = if approved {
                vec![]
            } else {
                vec![
                    ReviewIssue::new(IssueSeverity::High, "testing", "missing tests")
                        .with_suggestion("add unit tests"),
                ]
            };
            Ok(ReviewResult {
                approved,
                score: code.quality(),
                issues,
                next_steps: "add tests".to_string(),
            })
        }
    }

    fn request() -> CodeGenerationRequest {
        CodeGenerationRequest::new("login", "Login form").with_requirement("validate email")
    }

    fn use_case(
        generator: Arc<ScriptedGenerator>,
        validator: Arc<ScriptedValidator>,
    ) -> RunReviewLoopUseCase {
        RunReviewLoopUseCase::new(generator, validator)
    }

    #[tokio::test]
    async fn test_first_review_approves() {
        let generator = Arc::new(ScriptedGenerator::new(90, 10));
        let validator = Arc::new(ScriptedValidator::new(1));
        let result = use_case(generator.clone(), validator.clone())
            .execute(&request())
            .await
            .unwrap();

        assert!(result.approved);
        assert_eq!(result.status, ReviewLoopStatus::Approved);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.history.len(), 1);
        assert_eq!(generator.improve_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_approves_on_third_iteration() {
        let generator = Arc::new(ScriptedGenerator::new(60, 10));
        let validator = Arc::new(ScriptedValidator::new(3));
        let result = use_case(generator.clone(), validator.clone())
            .execute(&request())
            .await
            .unwrap();

        assert!(result.approved);
        assert_eq!(result.iterations, 3);
        assert_eq!(result.history.len(), 3);
        assert_eq!(result.final_code.quality(), 80);
        assert_eq!(generator.improve_calls.load(Ordering::SeqCst), 2);
        let directives = generator.directives.lock().unwrap();
        assert!(directives[0].contains("missing tests"));
    }

    #[tokio::test]
    async fn test_exhausts_at_cap() {
        let generator = Arc::new(ScriptedGenerator::new(50, 5));
        let validator = Arc::new(ScriptedValidator::new(0));
        let result = use_case(generator.clone(), validator.clone())
            .with_policy(ReviewLoopPolicy::default().with_max_iterations(4))
            .execute(&request())
            .await
            .unwrap();

        assert!(!result.approved);
        assert_eq!(result.status, ReviewLoopStatus::Exhausted);
        assert_eq!(result.iterations, 4);
        assert_eq!(result.history.len(), result.iterations);
        assert_eq!(validator.calls.load(Ordering::SeqCst), 4);
        assert_eq!(generator.improve_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_quality_regression_is_clamped() {
        let generator = Arc::new(ScriptedGenerator::new(70, -20));
        let validator = Arc::new(ScriptedValidator::new(0));
        let result = use_case(generator, validator)
            .with_policy(ReviewLoopPolicy::default().with_max_iterations(3))
            .execute(&request())
            .await
            .unwrap();

        let qualities: Vec<u8> = result.history.iter().map(|h| h.code.quality()).collect();
        assert_eq!(qualities, vec![70, 70, 70]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_marks_incomplete() {
        let generator = Arc::new(ScriptedGenerator::new(50, 5));
        let validator = Arc::new(ScriptedValidator {
            delay: Some(Duration::from_secs(10)),
            ..ScriptedValidator::new(0)
        });
        let options = ReviewRunOptions::default().with_budget(Duration::from_secs(15));
        let result = use_case(generator, validator.clone())
            .execute_with_progress(&request(), &options, &NoProgress)
            .await
            .unwrap();

        // iteration 2 was in flight when the deadline passed and still completed
        assert_eq!(result.status, ReviewLoopStatus::Incomplete);
        assert!(!result.approved);
        assert_eq!(result.iterations, 2);
        assert_eq!(result.history.len(), 2);
        assert_eq!(validator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_returns_best_scoring_iteration() {
        let generator = Arc::new(ScriptedGenerator::new(70, -20));
        let validator = Arc::new(ScriptedValidator {
            delay: Some(Duration::from_secs(10)),
            ..ScriptedValidator::new(0)
        });
        let policy = ReviewLoopPolicy {
            clamp_quality_regression: false,
            ..ReviewLoopPolicy::default()
        };
        let options = ReviewRunOptions::default().with_budget(Duration::from_secs(15));
        let result = use_case(generator, validator)
            .with_policy(policy)
            .execute_with_progress(&request(), &options, &NoProgress)
            .await
            .unwrap();

        assert_eq!(result.status, ReviewLoopStatus::Incomplete);
        assert_eq!(result.iterations, 2);
        assert_eq!(result.history[1].review.score, 50);
        assert_eq!(result.final_review.score, 70);
        assert_eq!(result.final_code.quality(), 70);
    }

    #[tokio::test]
    async fn test_cancellation_stops_after_iteration() {
        let generator = Arc::new(ScriptedGenerator::new(50, 5));
        let validator = Arc::new(ScriptedValidator::new(0));
        let token = CancellationToken::new();
        token.cancel();
        let options = ReviewRunOptions::default().with_cancellation(token);
        let result = use_case(generator, validator)
            .execute_with_progress(&request(), &options, &NoProgress)
            .await
            .unwrap();

        assert_eq!(result.status, ReviewLoopStatus::Incomplete);
        assert_eq!(result.iterations, 1);
    }

    #[tokio::test]
    async fn test_generator_failure_is_error() {
        let generator = Arc::new(ScriptedGenerator {
            fail_on_improve: true,
            ..ScriptedGenerator::new(50, 5)
        });
        let validator = Arc::new(ScriptedValidator::new(0));
        let err = use_case(generator, validator)
            .execute(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewLoopError::Generation { iteration: 2, .. }));
    }
}
