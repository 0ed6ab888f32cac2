//! Review loop entities and value objects.

use crate::pass::Scope;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What the generator is asked to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeGenerationRequest {
    pub feature: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

impl CodeGenerationRequest {
    pub fn new(feature: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            description: description.into(),
            requirements: Vec::new(),
            context: None,
        }
    }

    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirements.push(requirement.into());
        self
    }

    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = Some(context);
        self
    }

    /// Complexity from the number of requirements: up to 3 simple,
    /// up to 7 moderate, otherwise complex.
    pub fn estimated_complexity(&self) -> Scope {
        match self.requirements.len() {
            0..=3 => Scope::Simple,
            4..=7 => Scope::Moderate,
            _ => Scope::Complex,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMetadata {
    pub lines_of_code: usize,
    pub complexity: Scope,
    /// 0..=100
    pub estimated_quality: u8,
}

/// One generated artifact set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeGenerationResult {
    pub code: String,
    pub files: Vec<GeneratedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub metadata: CodeMetadata,
}

impl CodeGenerationResult {
    /// Build from files, joining their contents into `code`.
    pub fn from_files(files: Vec<GeneratedFile>, complexity: Scope, estimated_quality: u8) -> Self {
        let code = files
            .iter()
            .map(|f| f.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let lines_of_code = files.iter().map(|f| f.content.lines().count()).sum();
        Self {
            code,
            files,
            tests: None,
            documentation: None,
            metadata: CodeMetadata {
                lines_of_code,
                complexity,
                estimated_quality: estimated_quality.min(100),
            },
        }
    }

    pub fn quality(&self) -> u8 {
        self.metadata.estimated_quality
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl IssueSeverity {
    pub const ALL: [IssueSeverity; 4] = [
        IssueSeverity::Critical,
        IssueSeverity::High,
        IssueSeverity::Medium,
        IssueSeverity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Critical => "critical",
            IssueSeverity::High => "high",
            IssueSeverity::Medium => "medium",
            IssueSeverity::Low => "low",
        }
    }
}

impl std::str::FromStr for IssueSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(IssueSeverity::Critical),
            "high" => Ok(IssueSeverity::High),
            "medium" => Ok(IssueSeverity::Medium),
            "low" => Ok(IssueSeverity::Low),
            _ => Err(format!("Invalid IssueSeverity: {}", s)),
        }
    }
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewIssue {
    pub severity: IssueSeverity,
    #[serde(default)]
    pub category: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ReviewIssue {
    pub fn new(severity: IssueSeverity, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            file: None,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Validator verdict for one iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub approved: bool,
    /// 0..=100
    pub score: u8,
    #[serde(default)]
    pub issues: Vec<ReviewIssue>,
    #[serde(default)]
    pub next_steps: String,
}

impl ReviewResult {
    pub fn count(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewIteration {
    pub iteration: usize,
    pub code: CodeGenerationResult,
    pub review: ReviewResult,
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewLoopStatus {
    Approved,
    /// Hit the iteration cap without approval; needs manual follow-up.
    Exhausted,
    /// Stopped at the caller's deadline; the result is best-effort.
    Incomplete,
}

impl ReviewLoopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewLoopStatus::Approved => "approved",
            ReviewLoopStatus::Exhausted => "exhausted",
            ReviewLoopStatus::Incomplete => "incomplete",
        }
    }
}

impl std::fmt::Display for ReviewLoopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate produced by the review loop. `history` is append-only and
/// always has `iterations` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLoopResult {
    pub final_code: CodeGenerationResult,
    pub final_review: ReviewResult,
    pub iterations: usize,
    pub approved: bool,
    pub status: ReviewLoopStatus,
    pub history: Vec<ReviewIteration>,
}

/// Convergence policy for the review loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewLoopPolicy {
    pub max_iterations: usize,
    /// Hold estimated quality at the previous value when an improvement
    /// step reports a lower one.
    pub clamp_quality_regression: bool,
}

impl Default for ReviewLoopPolicy {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            clamp_quality_regression: true,
        }
    }
}

impl ReviewLoopPolicy {
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_from_requirements() {
        let mut req = CodeGenerationRequest::new("f", "d");
        assert_eq!(req.estimated_complexity(), Scope::Simple);
        for i in 0..4 {
            req = req.with_requirement(format!("r{i}"));
        }
        assert_eq!(req.estimated_complexity(), Scope::Moderate);
        for i in 0..4 {
            req = req.with_requirement(format!("s{i}"));
        }
        assert_eq!(req.estimated_complexity(), Scope::Complex);
    }

    #[test]
    fn test_from_files_counts_lines() {
        let result = CodeGenerationResult::from_files(
            vec![
                GeneratedFile {
                    path: "a.rs".into(),
                    content: "fn a() {\n}\n".into(),
                    language: "rust".into(),
                },
                GeneratedFile {
                    path: "b.rs".into(),
                    content: "fn b() {}".into(),
                    language: "rust".into(),
                },
            ],
            Scope::Simple,
            120,
        );
        assert_eq!(result.metadata.lines_of_code, 3);
        assert_eq!(result.quality(), 100);
    }

    #[test]
    fn test_issue_counts() {
        let review = ReviewResult {
            approved: false,
            score: 40,
            issues: vec![
                ReviewIssue::new(IssueSeverity::High, "tests", "missing tests"),
                ReviewIssue::new(IssueSeverity::High, "docs", "missing docs"),
                ReviewIssue::new(IssueSeverity::Low, "style", "naming"),
            ],
            next_steps: String::new(),
        };
        assert_eq!(review.count(IssueSeverity::High), 2);
        assert_eq!(review.count(IssueSeverity::Critical), 0);
    }

    #[test]
    fn test_policy_floor() {
        assert_eq!(ReviewLoopPolicy::default().max_iterations, 5);
        assert_eq!(ReviewLoopPolicy::default().with_max_iterations(0).max_iterations, 1);
    }
}
