//! Skill registry port.

use super::store_error::StoreError;
use async_trait::async_trait;
use skillgate_domain::{MetricsMode, Skill};

/// Lookup and metric updates for skills.
///
/// `update_skill_metrics` is a read-modify-write on one skill. Adapters must
/// serialize concurrent updates of the same skill id so no increment is
/// lost, and must not make updates of different skills contend.
#[async_trait]
pub trait SkillRegistry: Send + Sync {
    async fn get_skill(&self, skill_id: &str) -> Result<Option<Skill>, StoreError>;

    /// Record one invocation and return the updated skill.
    async fn update_skill_metrics(
        &self,
        skill_id: &str,
        success: bool,
        elapsed_ms: u64,
        mode: MetricsMode,
    ) -> Result<Skill, StoreError>;

    async fn list_skills(&self) -> Result<Vec<Skill>, StoreError>;
}
