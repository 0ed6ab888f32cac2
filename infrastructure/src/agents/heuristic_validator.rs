//! Offline code reviewer.
//!
//! Flags missing tests, missing documentation, placeholder bodies and
//! missing error handling. Approves when nothing critical or high remains
//! and the blended score reaches the threshold.

use async_trait::async_trait;
use skillgate_application::{CodeValidator, ValidationError};
use skillgate_domain::{CodeGenerationResult, IssueSeverity, ReviewIssue, ReviewResult, Scope};

const PLACEHOLDERS: [&str; 3] = ["todo!(", "unimplemented!(", "// TODO"];

#[derive(Debug, Clone, Copy)]
pub struct HeuristicCodeValidator {
    approval_threshold: u8,
}

impl Default for HeuristicCodeValidator {
    fn default() -> Self {
        Self {
            approval_threshold: 80,
        }
    }
}

impl HeuristicCodeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.approval_threshold = threshold.min(100);
        self
    }

    fn inspect(code: &CodeGenerationResult) -> Vec<ReviewIssue> {
        let mut issues = Vec::new();

        if code.files.is_empty() || code.code.trim().is_empty() {
            issues.push(ReviewIssue::new(
                IssueSeverity::Critical,
                "completeness",
                "No code was produced",
            ));
            return issues;
        }

        if code.tests.as_deref().is_none_or(|t| t.trim().is_empty()) {
            issues.push(
                ReviewIssue::new(IssueSeverity::High, "testing", "No tests provided")
                    .with_suggestion("add unit tests covering each requirement"),
            );
        }

        for file in &code.files {
            if PLACEHOLDERS.iter().any(|p| file.content.contains(p)) {
                let mut issue = ReviewIssue::new(
                    IssueSeverity::High,
                    "completeness",
                    "Placeholder implementation left in code",
                )
                .with_suggestion("replace placeholders with working code");
                issue.file = Some(file.path.clone());
                issues.push(issue);
            }
        }

        if code.documentation.as_deref().is_none_or(|d| d.trim().is_empty()) {
            issues.push(
                ReviewIssue::new(IssueSeverity::Medium, "documentation", "No documentation provided")
                    .with_suggestion("add usage docs for the feature"),
            );
        }

        if code.metadata.complexity != Scope::Simple && !code.code.contains("Result<") {
            issues.push(
                ReviewIssue::new(
                    IssueSeverity::Medium,
                    "robustness",
                    "No error handling for a non-trivial change",
                )
                .with_suggestion("return Result and model failure cases"),
            );
        }

        issues
    }

    fn penalty(severity: IssueSeverity) -> u8 {
        match severity {
            IssueSeverity::Critical => 40,
            IssueSeverity::High => 15,
            IssueSeverity::Medium => 10,
            IssueSeverity::Low => 5,
        }
    }
}

#[async_trait]
impl CodeValidator for HeuristicCodeValidator {
    async fn review(
        &self,
        code: &CodeGenerationResult,
        _iteration: usize,
    ) -> Result<ReviewResult, ValidationError> {
        let issues = Self::inspect(code);

        let rule_score = issues
            .iter()
            .fold(100u8, |score, i| score.saturating_sub(Self::penalty(i.severity)));
        let score = ((u16::from(rule_score) + u16::from(code.quality())) / 2) as u8;

        let blocking = issues.iter().any(|i| {
            matches!(i.severity, IssueSeverity::Critical | IssueSeverity::High)
        });
        let approved = !blocking && score >= self.approval_threshold;

        let next_steps = if approved {
            "Ready to merge".to_string()
        } else if issues.is_empty() {
            "Raise overall quality".to_string()
        } else {
            let categories: Vec<&str> = issues.iter().map(|i| i.category.as_str()).collect();
            format!("Address {} issue(s): {}", issues.len(), categories.join(", "))
        };

        Ok(ReviewResult {
            approved,
            score,
            issues,
            next_steps,
        })
    }
}
