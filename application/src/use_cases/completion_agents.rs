//! Review-loop agents backed by the completion service.
//!
//! Both agents send a templated prompt and parse a fenced JSON answer.
//! Transport errors and unparseable answers surface as port errors; the
//! review loop decides what to do with them.

use crate::ports::code_generator::{CodeGenerator, GenerationError};
use crate::ports::code_validator::{CodeValidator, ValidationError};
use crate::ports::completion::CompletionService;
use async_trait::async_trait;
use serde_json::json;
use skillgate_domain::core::string::truncate;
use skillgate_domain::prompt::{parse_generation_response, parse_review_response};
use skillgate_domain::{CodeGenerationRequest, CodeGenerationResult, ReviewPromptTemplate, ReviewResult};
use std::sync::Arc;
use tracing::debug;

/// Quality assumed for a first draft that does not report one.
const INITIAL_QUALITY: u8 = 70;
/// Assumed gain per improvement step when the model does not report one.
const IMPROVEMENT_STEP: u8 = 10;
const ERROR_EXCERPT_LEN: usize = 200;

pub struct CompletionCodeGenerator {
    completion: Arc<dyn CompletionService>,
}

impl CompletionCodeGenerator {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    async fn ask(
        &self,
        prompt: &str,
        request: &CodeGenerationRequest,
        default_quality: u8,
    ) -> Result<CodeGenerationResult, GenerationError> {
        let context = json!({
            "role": "coder",
            "system": ReviewPromptTemplate::generation_system(),
            "feature": request.feature,
        });
        let response = self
            .completion
            .complete(prompt, &context)
            .await
            .map_err(|e| GenerationError::Failed(e.to_string()))?;
        debug!("Generator response: {} bytes", response.len());

        parse_generation_response(&response, request.estimated_complexity(), default_quality)
            .ok_or_else(|| GenerationError::Unparseable(truncate(&response, ERROR_EXCERPT_LEN)))
    }
}

#[async_trait]
impl CodeGenerator for CompletionCodeGenerator {
    async fn generate(
        &self,
        request: &CodeGenerationRequest,
    ) -> Result<CodeGenerationResult, GenerationError> {
        let prompt = ReviewPromptTemplate::generation_prompt(request);
        self.ask(&prompt, request, INITIAL_QUALITY).await
    }

    async fn improve(
        &self,
        request: &CodeGenerationRequest,
        previous: &CodeGenerationResult,
        directive: &str,
    ) -> Result<CodeGenerationResult, GenerationError> {
        let prompt = ReviewPromptTemplate::improvement_prompt(request, previous, directive);
        let default_quality = previous.quality().saturating_add(IMPROVEMENT_STEP).min(100);
        self.ask(&prompt, request, default_quality).await
    }
}

pub struct CompletionCodeValidator {
    completion: Arc<dyn CompletionService>,
}

impl CompletionCodeValidator {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }
}

#[async_trait]
impl CodeValidator for CompletionCodeValidator {
    async fn review(
        &self,
        code: &CodeGenerationResult,
        iteration: usize,
    ) -> Result<ReviewResult, ValidationError> {
        let prompt = ReviewPromptTemplate::validation_prompt(code, iteration);
        let context = json!({
            "role": "validator",
            "system": ReviewPromptTemplate::validation_system(),
            "iteration": iteration,
        });
        let response = self
            .completion
            .complete(&prompt, &context)
            .await
            .map_err(|e| ValidationError::Failed(e.to_string()))?;

        parse_review_response(&response)
            .ok_or_else(|| ValidationError::Unparseable(truncate(&response, ERROR_EXCERPT_LEN)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::completion::CompletionError;
    use serde_json::Value;
    use std::sync::Mutex;

    struct CannedCompletion {
        answers: Mutex<Vec<Result<String, CompletionError>>>,
        contexts: Mutex<Vec<Value>>,
    }

    impl CannedCompletion {
        fn new(answers: Vec<Result<String, CompletionError>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers),
                contexts: Mutex::new(vec![]),
            })
        }
    }

    #[async_trait]
    impl CompletionService for CannedCompletion {
        async fn complete(&self, _prompt: &str, context: &Value) -> Result<String, CompletionError> {
            self.contexts.lock().unwrap().push(context.clone());
            self.answers.lock().unwrap().remove(0)
        }
    }

    const FILES: &str = r#"```json
{"files": [{"path": "src/lib.rs", "content": "pub fn f() {}", "language": "rust"}]}
```"#;

    #[tokio::test]
    async fn test_generate_uses_default_quality() {
        let completion = CannedCompletion::new(vec![Ok(FILES.to_string())]);
        let generator = CompletionCodeGenerator::new(completion.clone());
        let result = generator
            .generate(&CodeGenerationRequest::new("f", "a function"))
            .await
            .unwrap();

        assert_eq!(result.quality(), INITIAL_QUALITY);
        assert_eq!(completion.contexts.lock().unwrap()[0]["role"], "coder");
    }

    #[tokio::test]
    async fn test_improve_raises_default_quality() {
        let completion = CannedCompletion::new(vec![Ok(FILES.to_string())]);
        let generator = CompletionCodeGenerator::new(completion);
        let request = CodeGenerationRequest::new("f", "a function");
        let previous = parse_generation_response(FILES, request.estimated_complexity(), 95).unwrap();

        let improved = generator.improve(&request, &previous, "add tests").await.unwrap();
        assert_eq!(improved.quality(), 100);
    }

    #[tokio::test]
    async fn test_generate_unparseable() {
        let completion = CannedCompletion::new(vec![Ok("sorry, I can't".to_string())]);
        let generator = CompletionCodeGenerator::new(completion);
        let err = generator
            .generate(&CodeGenerationRequest::new("f", "d"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Unparseable(_)));
    }

    #[tokio::test]
    async fn test_validator_parses_review() {
        let completion = CannedCompletion::new(vec![Ok(
            r#"{"approved": true, "score": 91, "issues": [], "next_steps": "merge"}"#.to_string(),
        )]);
        let validator = CompletionCodeValidator::new(completion.clone());
        let code = parse_generation_response(FILES, skillgate_domain::Scope::Simple, 80).unwrap();
        let review = validator.review(&code, 2).await.unwrap();

        assert!(review.approved);
        assert_eq!(review.score, 91);
        assert_eq!(completion.contexts.lock().unwrap()[0]["iteration"], 2);
    }

    #[tokio::test]
    async fn test_validator_transport_error() {
        let completion = CannedCompletion::new(vec![Err(CompletionError::Timeout)]);
        let validator = CompletionCodeValidator::new(completion);
        let code = parse_generation_response(FILES, skillgate_domain::Scope::Simple, 80).unwrap();
        let err = validator.review(&code, 1).await.unwrap_err();
        assert!(matches!(err, ValidationError::Failed(_)));
    }
}
