//! Offline code generator.
//!
//! Produces a deterministic Rust skeleton for a request and, on each
//! improvement, adds whatever the directive asks for (tests, docs,
//! error handling). Estimated quality rises by a fixed step per
//! improvement, capped at 100, so the loop sees a non-decreasing signal.

use async_trait::async_trait;
use skillgate_application::{CodeGenerator, GenerationError};
use skillgate_domain::{CodeGenerationRequest, CodeGenerationResult, GeneratedFile, Scope};

const INITIAL_QUALITY: u8 = 70;
const IMPROVEMENT_STEP: u8 = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateCodeGenerator;

impl TemplateCodeGenerator {
    pub fn new() -> Self {
        Self
    }

    fn slug(feature: &str) -> String {
        let slug: String = feature
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let slug = slug
            .split('_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        match slug.chars().next() {
            None => "feature".to_string(),
            Some(c) if c.is_ascii_digit() => format!("f_{}", slug),
            Some(_) => slug,
        }
    }

    fn module_source(request: &CodeGenerationRequest, with_errors: bool) -> String {
        let slug = Self::slug(&request.feature);
        let mut src = format!("//! {}\n//!\n//! {}\n\n", request.feature, request.description);

        if with_errors {
            src.push_str(&format!(
                "#[derive(Debug)]\npub enum {}Error {{\n    InvalidInput(String),\n}}\n\n",
                pascal(&slug)
            ));
        }

        let ret = if with_errors {
            format!("Result<(), {}Error>", pascal(&slug))
        } else {
            "bool".to_string()
        };
        let body = if with_errors { "Ok(())" } else { "true" };

        let steps: Vec<&str> = if request.requirements.is_empty() {
            vec![request.feature.as_str()]
        } else {
            request.requirements.iter().map(String::as_str).collect()
        };
        for (i, step) in steps.iter().enumerate() {
            src.push_str(&format!(
                "/// {}\npub fn {}_step_{}() -> {} {{\n    {}\n}}\n\n",
                step,
                slug,
                i + 1,
                ret,
                body
            ));
        }
        src.trim_end().to_string() + "\n"
    }

    fn tests_source(request: &CodeGenerationRequest, count: usize) -> String {
        let slug = Self::slug(&request.feature);
        let mut src = "#[cfg(test)]\nmod tests {\n    use super::*;\n".to_string();
        for i in 1..=count {
            src.push_str(&format!(
                "\n    #[test]\n    fn test_{slug}_step_{i}() {{\n        let _ = {slug}_step_{i}();\n    }}\n"
            ));
        }
        src.push_str("}\n");
        src
    }

    fn documentation(request: &CodeGenerationRequest) -> String {
        let mut doc = format!("# {}\n\n{}\n", request.feature, request.description);
        if !request.requirements.is_empty() {
            doc.push_str("\n## Requirements\n\n");
            for req in &request.requirements {
                doc.push_str(&format!("- {}\n", req));
            }
        }
        doc
    }

    fn build(
        request: &CodeGenerationRequest,
        with_errors: bool,
        quality: u8,
    ) -> CodeGenerationResult {
        let slug = Self::slug(&request.feature);
        let files = vec![GeneratedFile {
            path: format!("src/{}.rs", slug),
            content: Self::module_source(request, with_errors),
            language: "rust".to_string(),
        }];
        CodeGenerationResult::from_files(files, request.estimated_complexity(), quality)
    }
}

fn pascal(slug: &str) -> String {
    slug.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[async_trait]
impl CodeGenerator for TemplateCodeGenerator {
    async fn generate(
        &self,
        request: &CodeGenerationRequest,
    ) -> Result<CodeGenerationResult, GenerationError> {
        let quality = match request.estimated_complexity() {
            Scope::Complex => INITIAL_QUALITY - IMPROVEMENT_STEP,
            _ => INITIAL_QUALITY,
        };
        Ok(Self::build(request, false, quality))
    }

    async fn improve(
        &self,
        request: &CodeGenerationRequest,
        previous: &CodeGenerationResult,
        directive: &str,
    ) -> Result<CodeGenerationResult, GenerationError> {
        let directive = directive.to_lowercase();
        let with_errors =
            directive.contains("error handling") || previous.code.contains("Error {");
        let quality = previous.quality().saturating_add(IMPROVEMENT_STEP).min(100);

        let mut next = Self::build(request, with_errors, quality);
        next.tests = previous.tests.clone();
        next.documentation = previous.documentation.clone();

        if directive.contains("test") {
            let steps = request.requirements.len().max(1);
            next.tests = Some(Self::tests_source(request, steps));
        }
        if directive.contains("doc") {
            next.documentation = Some(Self::documentation(request));
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CodeGenerationRequest {
        CodeGenerationRequest::new("Login Form", "Email and password login")
            .with_requirement("validate email")
            .with_requirement("hash password")
    }

    #[test]
    fn test_slug() {
        assert_eq!(TemplateCodeGenerator::slug("Login Form!"), "login_form");
        assert_eq!(TemplateCodeGenerator::slug("  "), "feature");
        assert_eq!(TemplateCodeGenerator::slug("3d view"), "f_3d_view");
    }

    #[tokio::test]
    async fn test_generate_skeleton() {
        let result = TemplateCodeGenerator.generate(&request()).await.unwrap();
        assert_eq!(result.files[0].path, "src/login_form.rs");
        assert!(result.code.contains("pub fn login_form_step_2()"));
        assert!(result.tests.is_none());
        assert_eq!(result.quality(), INITIAL_QUALITY);
    }

    #[tokio::test]
    async fn test_improve_follows_directive() {
        let generator = TemplateCodeGenerator;
        let first = generator.generate(&request()).await.unwrap();
        let next = generator
            .improve(
                &request(),
                &first,
                "- [HIGH] (testing) No tests\n- [MEDIUM] (documentation) No docs\n- [MEDIUM] (robustness) missing error handling",
            )
            .await
            .unwrap();

        assert!(next.tests.as_deref().unwrap().contains("fn test_login_form_step_2"));
        assert!(next.documentation.as_deref().unwrap().contains("## Requirements"));
        assert!(next.code.contains("LoginFormError"));
        assert_eq!(next.quality(), INITIAL_QUALITY + IMPROVEMENT_STEP);
    }

    #[tokio::test]
    async fn test_quality_caps_at_100() {
        let generator = TemplateCodeGenerator;
        let mut code = generator.generate(&request()).await.unwrap();
        for _ in 0..10 {
            code = generator.improve(&request(), &code, "polish").await.unwrap();
        }
        assert_eq!(code.quality(), 100);
    }
}
