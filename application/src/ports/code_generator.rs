//! Code generation port for the review loop.

use async_trait::async_trait;
use skillgate_domain::{CodeGenerationRequest, CodeGenerationResult};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    #[error("Generation failed: {0}")]
    Failed(String),

    #[error("Unparseable generator output: {0}")]
    Unparseable(String),
}

#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// First attempt at the request.
    async fn generate(
        &self,
        request: &CodeGenerationRequest,
    ) -> Result<CodeGenerationResult, GenerationError>;

    /// Revise `previous` following the reviewer's directive.
    async fn improve(
        &self,
        request: &CodeGenerationRequest,
        previous: &CodeGenerationResult,
        directive: &str,
    ) -> Result<CodeGenerationResult, GenerationError>;
}
