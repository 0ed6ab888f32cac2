//! Progress reporting for command processing and review loops

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use skillgate_application::{ProgressNotifier, Stage};
use skillgate_domain::{ApprovalCheck, ReviewResult};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner per stage and a bar for review iterations
pub struct ProgressReporter {
    stage_bar: Mutex<Option<ProgressBar>>,
    review_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            stage_bar: Mutex::new(None),
            review_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn review_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: Stage) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(stage.display_name());
        pb.set_message("...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.stage_bar.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_stage_complete(&self, _stage: Stage, success: bool) {
        if let Ok(mut slot) = self.stage_bar.lock()
            && let Some(pb) = slot.take()
        {
            let mark = if success {
                "done".green()
            } else {
                "degraded".yellow()
            };
            pb.finish_with_message(mark.to_string());
        }
    }

    fn on_approval(&self, check: &ApprovalCheck) {
        if let Ok(slot) = self.stage_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(format!("tier {}", check.tier));
        }
    }

    fn on_review_iteration(&self, iteration: usize, max_iterations: usize) {
        let Ok(mut slot) = self.review_bar.lock() else {
            return;
        };
        let pb = slot.get_or_insert_with(|| {
            let pb = ProgressBar::new(max_iterations as u64);
            pb.set_style(Self::review_style());
            pb.set_prefix("Review loop");
            pb
        });
        pb.set_message(format!("iteration {}: generating and validating", iteration));
    }

    fn on_review_result(&self, iteration: usize, review: &ReviewResult) {
        let Ok(mut slot) = self.review_bar.lock() else {
            return;
        };
        let Some(pb) = slot.as_ref() else {
            return;
        };
        pb.inc(1);
        let finished = if review.approved {
            pb.finish_with_message(format!("{} at iteration {}", "approved".green(), iteration));
            true
        } else if pb.position() >= pb.length().unwrap_or(0) {
            pb.finish_with_message(format!("{} (score {})", "not approved".yellow(), review.score));
            true
        } else {
            pb.set_message(format!("score {}, {} issue(s)", review.score, review.issues.len()));
            false
        };
        if finished {
            *slot = None;
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: Stage) {
        eprintln!("{} {}", "->".cyan(), stage.display_name().bold());
    }

    fn on_stage_complete(&self, _stage: Stage, success: bool) {
        if !success {
            eprintln!("  {} degraded", "!".yellow());
        }
    }

    fn on_approval(&self, check: &ApprovalCheck) {
        eprintln!("  tier: {} ({})", check.tier, check.reason);
    }

    fn on_review_iteration(&self, iteration: usize, max_iterations: usize) {
        eprintln!("{} Review iteration {}/{}", "->".cyan(), iteration, max_iterations);
    }

    fn on_review_result(&self, _iteration: usize, review: &ReviewResult) {
        let verdict = if review.approved {
            "v".green()
        } else {
            "x".red()
        };
        eprintln!(
            "  {} score {} ({} issue(s))",
            verdict,
            review.score,
            review.issues.len()
        );
    }
}
