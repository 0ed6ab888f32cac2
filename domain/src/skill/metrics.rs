//! Per-skill metrics ledger.
//!
//! Two update modes are supported:
//!
//! - [`MetricsMode::Exact`] keeps integer success and elapsed-time totals
//!   and derives the rate and mean from them, so nothing drifts.
//! - [`MetricsMode::LegacyRounding`] reproduces the incremental mean with
//!   rounding at every step, for parity with stored values produced that way.
//!
//! Both agree whenever the stored rate and mean are themselves exact.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsMode {
    #[default]
    Exact,
    LegacyRounding,
}

impl std::str::FromStr for MetricsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "exact" => Ok(MetricsMode::Exact),
            "legacy_rounding" | "legacy" => Ok(MetricsMode::LegacyRounding),
            _ => Err(format!("Invalid MetricsMode: {}", s)),
        }
    }
}

impl std::fmt::Display for MetricsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsMode::Exact => write!(f, "exact"),
            MetricsMode::LegacyRounding => write!(f, "legacy_rounding"),
        }
    }
}

/// Usage counters, success rate (0..=100) and mean latency for one skill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMetrics {
    pub usage_count: u64,
    pub success_count: u64,
    pub success_rate: f64,
    pub avg_execution_time_ms: u64,
    pub total_execution_time_ms: u64,
}

impl SkillMetrics {
    /// Rebuild integer totals from a stored rate and mean.
    pub fn from_rates(usage_count: u64, success_rate: f64, avg_execution_time_ms: u64) -> Self {
        let success_rate = success_rate.clamp(0.0, 100.0);
        let success_count = ((success_rate / 100.0) * usage_count as f64).round() as u64;
        Self {
            usage_count,
            success_count: success_count.min(usage_count),
            success_rate,
            avg_execution_time_ms,
            total_execution_time_ms: avg_execution_time_ms.saturating_mul(usage_count),
        }
    }

    pub fn failure_count(&self) -> u64 {
        self.usage_count - self.success_count
    }

    /// Record one routed invocation. Call exactly once per invocation.
    pub fn record(&mut self, success: bool, elapsed_ms: u64, mode: MetricsMode) {
        self.usage_count += 1;
        let n = self.usage_count;

        match mode {
            MetricsMode::Exact => {
                self.success_count += u64::from(success);
                self.total_execution_time_ms =
                    self.total_execution_time_ms.saturating_add(elapsed_ms);
                self.success_rate = self.success_count as f64 * 100.0 / n as f64;
                self.avg_execution_time_ms =
                    (self.total_execution_time_ms as f64 / n as f64).round() as u64;
            }
            MetricsMode::LegacyRounding => {
                let prev = n - 1;
                let prev_successes = ((self.success_rate / 100.0) * prev as f64).round() as u64;
                let new_successes = prev_successes + u64::from(success);
                self.success_rate = new_successes as f64 * 100.0 / n as f64;
                self.avg_execution_time_ms = ((self.avg_execution_time_ms as f64 * prev as f64
                    + elapsed_ms as f64)
                    / n as f64)
                    .round() as u64;
                self.success_count = new_successes.min(n);
                self.total_execution_time_ms =
                    self.total_execution_time_ms.saturating_add(elapsed_ms);
            }
        }
    }
}
