//! Solution: the chosen skill and approach for a classified command.

use super::problem::Scope;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub skill_id: String,
    /// Free text describing the chosen strategy. The approval gate reads it.
    pub approach: String,
    pub estimated_complexity: Scope,
    /// Hint only. The approval gate has the final say.
    pub requires_approval: bool,
    pub sub_tasks: Vec<String>,
}
