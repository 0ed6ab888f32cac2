//! Prompt templates for the generate/validate loop

use crate::review::{CodeGenerationRequest, CodeGenerationResult};

/// Templates for the coder and validator prompts
pub struct ReviewPromptTemplate;

impl ReviewPromptTemplate {
    /// System prompt for the code generator
    pub fn generation_system() -> &'static str {
        r#"You are a senior software engineer. You write working, tested, documented code.
Answer ONLY with a single ```json fenced block matching the requested schema."#
    }

    /// User prompt for the first generation step
    pub fn generation_prompt(request: &CodeGenerationRequest) -> String {
        let mut prompt = format!(
            r#"Implement the feature "{}".

Description:
{}
"#,
            request.feature, request.description
        );

        if !request.requirements.is_empty() {
            prompt.push_str("\nRequirements:\n");
            for req in &request.requirements {
                prompt.push_str(&format!("- {}\n", req));
            }
        }

        prompt.push_str(Self::generation_schema());
        prompt
    }

    /// User prompt for an improvement step
    pub fn improvement_prompt(
        request: &CodeGenerationRequest,
        previous: &CodeGenerationResult,
        directive: &str,
    ) -> String {
        let mut prompt = format!(
            r#"Improve your implementation of "{}".

Current code:
```
{}
```

Reviewer feedback:
{}
"#,
            request.feature, previous.code, directive
        );
        prompt.push_str(Self::generation_schema());
        prompt
    }

    fn generation_schema() -> &'static str {
        r#"
Respond with:
```json
{
  "files": [{"path": "string", "content": "string", "language": "string"}],
  "tests": "string (optional)",
  "documentation": "string (optional)",
  "estimated_quality": 0-100
}
```"#
    }

    /// System prompt for the validator
    pub fn validation_system() -> &'static str {
        r#"You are an adversarial code reviewer. Your job is to find real problems:
bugs, missing tests, missing documentation, security issues, unclear code.
Approve only code you would merge. Answer ONLY with a single ```json fenced block."#
    }

    /// User prompt for validating one iteration
    pub fn validation_prompt(code: &CodeGenerationResult, iteration: usize) -> String {
        let mut prompt = format!(
            r#"Review iteration {} of this change.

Code:
```
{}
```
"#,
            iteration, code.code
        );

        match &code.tests {
            Some(tests) => prompt.push_str(&format!("\nTests:\n```\n{}\n```\n", tests)),
            None => prompt.push_str("\nTests: none provided\n"),
        }
        match &code.documentation {
            Some(docs) => prompt.push_str(&format!("\nDocumentation:\n{}\n", docs)),
            None => prompt.push_str("\nDocumentation: none provided\n"),
        }

        prompt.push_str(
            r#"
Respond with:
```json
{
  "approved": true|false,
  "score": 0-100,
  "issues": [{"severity": "critical|high|medium|low", "category": "string",
              "message": "string", "file": "string (optional)",
              "suggestion": "string (optional)"}],
  "next_steps": "string"
}
```"#,
        );
        prompt
    }
}
