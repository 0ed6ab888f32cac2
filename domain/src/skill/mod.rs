//! Skills and their live performance statistics.

pub mod entities;
pub mod metrics;

pub use entities::{Skill, SkillContract, SkillStatus};
pub use metrics::{MetricsMode, SkillMetrics};
