//! Console output formatter for orchestration results

use colored::{ColoredString, Colorize};
use serde::Serialize;
use skillgate_application::CommandPreview;
use skillgate_domain::review::summarize;
use skillgate_domain::{
    ApprovalCheck, ApprovalTier, ExecutionResult, PerformanceReport, ReviewLoopResult,
    ReviewLoopStatus, Skill,
};

/// Formats engine results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the outcome of one processed command
    pub fn format_execution(command: &str, result: &ExecutionResult) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "Command:".cyan().bold(), command));

        if let Some(check) = &result.approval {
            output.push_str(&Self::approval_line(check));
        }

        if result.approval_required {
            output.push_str(&format!(
                "{} {}\n",
                "Status:".cyan().bold(),
                "awaiting approval".yellow().bold()
            ));
            if let Some(skill) = &result.skill_used {
                output.push_str(&format!("{} {}\n", "Skill:".cyan().bold(), skill));
            }
        } else if result.success {
            output.push_str(&format!(
                "{} {}\n",
                "Status:".cyan().bold(),
                "completed".green().bold()
            ));
            if let Some(skill) = &result.skill_used {
                output.push_str(&format!("{} {}\n", "Skill:".cyan().bold(), skill));
            }
            if result.output["needs_follow_up"].as_bool() == Some(true) {
                output.push_str(&format!("{}\n", "Needs manual follow-up".yellow()));
            }
            let body = result
                .output
                .get("output")
                .and_then(|o| o.get("summary"))
                .and_then(|s| s.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    serde_json::to_string_pretty(&result.output["output"]).unwrap_or_default()
                });
            output.push_str(&format!("\n{}\n", body));
        } else {
            output.push_str(&format!(
                "{} {}\n",
                "Status:".cyan().bold(),
                "failed".red().bold()
            ));
            output.push_str(&format!(
                "{} {}\n",
                "Error:".red().bold(),
                result.error.as_deref().unwrap_or("Unknown")
            ));
        }

        if let Some(id) = &result.execution_id {
            output.push_str(&format!("{} {}\n", "Execution:".dimmed(), id));
        }

        output
    }

    /// Format a classification preview (no execution)
    pub fn format_preview(preview: &CommandPreview) -> String {
        let problem = &preview.classification.problem;
        let context = &preview.classification.context;
        let solution = &preview.classification.solution;

        let mut output = Self::header("Classification");
        output.push('\n');

        output.push_str(&Self::section_header("Problem"));
        output.push_str(&format!("  Type:     {}\n", problem.problem_type));
        output.push_str(&format!("  Urgency:  {}\n", problem.urgency));
        output.push_str(&format!("  Scope:    {}\n", problem.scope));
        if !problem.entities.is_empty() {
            output.push_str(&format!("  Entities: {}\n", problem.entities.join(", ")));
        }

        output.push_str(&Self::section_header("Context"));
        output.push_str(&format!(
            "  {} projects, {} tasks, {} decisions\n",
            context.relevant_projects.len(),
            context.relevant_tasks.len(),
            context.historical_decisions.len()
        ));
        if context.is_degraded() {
            let sources: Vec<&str> = context.degraded.iter().map(|s| s.as_str()).collect();
            output.push_str(&format!(
                "  {} {}\n",
                "Unavailable:".yellow(),
                sources.join(", ")
            ));
        }

        output.push_str(&Self::section_header("Solution"));
        output.push_str(&format!("  Skill:    {}\n", solution.skill_id));
        output.push_str(&format!("  Approach: {}\n", solution.approach));
        for (i, step) in solution.sub_tasks.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, step));
        }

        output.push_str(&Self::section_header("Approval"));
        output.push_str(&Self::approval_line(&preview.approval));
        output.push_str(&format!("  {}\n", preview.approval.tier.description().dimmed()));

        output
    }

    /// Format a review loop run
    pub fn format_review(feature: &str, result: &ReviewLoopResult, max_iterations: usize) -> String {
        let mut output = Self::header("Adversarial Review");
        output.push('\n');

        for step in &result.history {
            let verdict = if step.review.approved {
                "approved".green()
            } else {
                "rejected".red()
            };
            output.push_str(&format!(
                "  Iteration {}: score {:>3}/100, quality {:>3}, {} issue(s), {}\n",
                step.iteration,
                step.review.score,
                step.code.quality(),
                step.review.issues.len(),
                verdict
            ));
        }
        output.push('\n');
        output.push_str(&summarize(feature, result, max_iterations));
        output.push('\n');

        let status = match result.status {
            ReviewLoopStatus::Approved => "approved".green().bold(),
            ReviewLoopStatus::Exhausted => "exhausted".yellow().bold(),
            ReviewLoopStatus::Incomplete => "incomplete".yellow().bold(),
        };
        output.push_str(&format!("\n{} {}\n", "Result:".cyan().bold(), status));

        for file in &result.final_code.files {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ({}) ──", file.path, file.language).yellow().bold(),
                file.content
            ));
        }
        if let Some(tests) = &result.final_code.tests {
            output.push_str(&format!("\n{}\n{}\n", "── tests ──".yellow().bold(), tests));
        }

        output
    }

    /// Format the skill table
    pub fn format_skills(skills: &[Skill]) -> String {
        let mut output = format!(
            "{:<32} {:<16} {:>6} {:>8} {:>9}\n",
            "SKILL", "CONTRACT", "USES", "SUCCESS", "AVG MS"
        )
        .bold()
        .to_string();

        for skill in skills {
            let id = if skill.is_active() {
                skill.skill_id.normal()
            } else {
                skill.skill_id.dimmed()
            };
            output.push_str(&format!(
                "{:<32} {:<16} {:>6} {:>7.1}% {:>9}\n",
                id,
                skill.contract.as_str(),
                skill.metrics.usage_count,
                skill.metrics.success_rate,
                skill.metrics.avg_execution_time_ms
            ));
        }
        output
    }

    /// Format an aggregate performance report
    pub fn format_report(report: &PerformanceReport) -> String {
        let mut output = Self::section_header("Performance");
        output.push_str(&format!("  Total:             {}\n", report.total_executions));
        output.push_str(&format!("  Succeeded:         {}\n", report.successful_executions));
        output.push_str(&format!("  Failed:            {}\n", report.failed_executions));
        output.push_str(&format!("  Awaiting approval: {}\n", report.awaiting_approval));
        output.push_str(&format!("  Success rate:      {:.1}%\n", report.success_rate));
        output.push_str(&format!(
            "  Avg execution:     {}ms\n",
            report.avg_execution_time_ms
        ));
        output
    }

    /// Format any result as JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn approval_line(check: &ApprovalCheck) -> String {
        format!(
            "{} {} ({})\n",
            "Tier:".cyan().bold(),
            Self::tier_label(check.tier),
            check.reason
        )
    }

    fn tier_label(tier: ApprovalTier) -> ColoredString {
        match tier {
            ApprovalTier::Auto => tier.as_str().green().bold(),
            ApprovalTier::Draft => tier.as_str().blue().bold(),
            ApprovalTier::Confirm => tier.as_str().yellow().bold(),
            ApprovalTier::Block => tier.as_str().red().bold(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }
}
