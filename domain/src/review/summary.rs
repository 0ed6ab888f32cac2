//! Human-readable summary of a review loop run.

use super::entities::{IssueSeverity, ReviewLoopResult, ReviewLoopStatus};

pub fn summarize(feature: &str, result: &ReviewLoopResult, max_iterations: usize) -> String {
    let review = &result.final_review;
    let status = match result.status {
        ReviewLoopStatus::Approved => "APPROVED",
        ReviewLoopStatus::Exhausted => "NOT APPROVED",
        ReviewLoopStatus::Incomplete => "INCOMPLETE (deadline reached)",
    };

    let mut lines = vec![
        "Adversarial Review Summary".to_string(),
        "==========================".to_string(),
        String::new(),
        format!("Feature: {}", feature),
        format!("Iterations: {}/{}", result.iterations, max_iterations),
        format!("Final Score: {}/100", review.score),
        format!("Status: {}", status),
        String::new(),
        format!("Issues Found: {}", review.issues.len()),
    ];
    for severity in IssueSeverity::ALL {
        let label = severity.as_str();
        let mut chars = label.chars();
        let label = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        };
        lines.push(format!("- {}: {}", label, review.count(severity)));
    }
    lines.push(String::new());
    lines.push(format!("Next Steps: {}", review.next_steps));
    lines.push(String::new());
    lines.push(if result.approved {
        "Code is ready for merge!".to_string()
    } else {
        "Code needs additional work".to_string()
    });

    lines.join("\n")
}
