//! Progress notification port
//!
//! Callbacks for reporting orchestration and review-loop progress.
//! Implementations live in the presentation layer.

use skillgate_domain::{ApprovalCheck, Problem, ReviewResult, Solution};

/// Stage of `process_command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Problem,
    Amplification,
    Solution,
    Approval,
    Routing,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Problem => "problem",
            Stage::Amplification => "amplification",
            Stage::Solution => "solution",
            Stage::Approval => "approval",
            Stage::Routing => "routing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Problem => "Analyzing problem",
            Stage::Amplification => "Gathering context",
            Stage::Solution => "Identifying solution",
            Stage::Approval => "Checking approval gate",
            Stage::Routing => "Executing skill",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

pub trait ProgressNotifier: Send + Sync {
    fn on_stage_start(&self, stage: Stage);

    fn on_stage_complete(&self, stage: Stage, success: bool);

    fn on_problem(&self, _problem: &Problem) {}

    fn on_solution(&self, _solution: &Solution) {}

    fn on_approval(&self, _check: &ApprovalCheck) {}

    // ==================== Review Loop Callbacks ====================

    fn on_review_iteration(&self, _iteration: usize, _max_iterations: usize) {}

    fn on_review_result(&self, _iteration: usize, _review: &ReviewResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage) {}
    fn on_stage_complete(&self, _stage: Stage, _success: bool) {}
}
