//! Improvement directive derived from a review.

use super::entities::{IssueSeverity, ReviewResult};

/// Turn a rejected review into instructions for the next generation step.
///
/// Issues are listed most severe first; declaration order is kept within a
/// severity.
pub fn improvement_directive(review: &ReviewResult) -> String {
    let mut out = format!(
        "The previous version scored {}/100 and was not approved.\n",
        review.score
    );

    if !review.issues.is_empty() {
        out.push_str("\nFix the following issues:\n");
        for severity in IssueSeverity::ALL {
            for issue in review.issues.iter().filter(|i| i.severity == severity) {
                out.push_str(&format!("- [{}] ", severity.as_str().to_uppercase()));
                if !issue.category.is_empty() {
                    out.push_str(&format!("({}) ", issue.category));
                }
                out.push_str(&issue.message);
                if let Some(file) = &issue.file {
                    out.push_str(&format!(" in {}", file));
                }
                if let Some(suggestion) = &issue.suggestion {
                    out.push_str(&format!(" -> {}", suggestion));
                }
                out.push('\n');
            }
        }
    }

    if !review.next_steps.trim().is_empty() {
        out.push_str(&format!("\nNext steps: {}\n", review.next_steps.trim()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::entities::ReviewIssue;

    #[test]
    fn test_orders_by_severity() {
        let review = ReviewResult {
            approved: false,
            score: 55,
            issues: vec![
                ReviewIssue::new(IssueSeverity::Low, "style", "rename x"),
                ReviewIssue::new(IssueSeverity::Critical, "tests", "no test coverage")
                    .with_suggestion("add unit tests"),
            ],
            next_steps: "Add documentation".to_string(),
        };
        let directive = improvement_directive(&review);
        let critical = directive.find("[CRITICAL]").unwrap();
        let low = directive.find("[LOW]").unwrap();
        assert!(critical < low);
        assert!(directive.contains("-> add unit tests"));
        assert!(directive.contains("Next steps: Add documentation"));
        assert!(directive.contains("55/100"));
    }

    #[test]
    fn test_no_issues() {
        let review = ReviewResult {
            approved: false,
            score: 10,
            issues: vec![],
            next_steps: String::new(),
        };
        let directive = improvement_directive(&review);
        assert!(!directive.contains("Fix the following"));
    }
}
