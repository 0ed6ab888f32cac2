//! Code validation port for the review loop.

use async_trait::async_trait;
use skillgate_domain::{CodeGenerationResult, ReviewResult};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Validation failed: {0}")]
    Failed(String),

    #[error("Unparseable validator output: {0}")]
    Unparseable(String),
}

#[async_trait]
pub trait CodeValidator: Send + Sync {
    /// Review one iteration's output. `iteration` starts at 1.
    async fn review(
        &self,
        code: &CodeGenerationResult,
        iteration: usize,
    ) -> Result<ReviewResult, ValidationError>;
}
