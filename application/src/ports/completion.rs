//! Completion service port
//!
//! The language-model service that performs analysis, generation and review.
//! The engine treats it as a black box: no retry or backoff at this layer.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CompletionError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Gateway for completion requests.
///
/// `context` carries structured side information (system prompt, iteration,
/// etc.); adapters decide how to send it.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str, context: &Value) -> Result<String, CompletionError>;
}
