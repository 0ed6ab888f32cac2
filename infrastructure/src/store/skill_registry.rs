//! In-memory skill registry.
//!
//! Each skill sits behind its own async mutex, so the read-modify-write in
//! `update_skill_metrics` serializes per skill id while different skills
//! update in parallel. The outer map is only locked long enough to clone
//! the per-skill handle.

use async_trait::async_trait;
use skillgate_application::{SkillRegistry, StoreError};
use skillgate_domain::{MetricsMode, Skill};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::debug;

type SkillSlot = Arc<Mutex<Skill>>;

#[derive(Default)]
pub struct InMemorySkillRegistry {
    skills: RwLock<BTreeMap<String, SkillSlot>>,
}

impl InMemorySkillRegistry {
    pub fn new(skills: impl IntoIterator<Item = Skill>) -> Self {
        let skills = skills
            .into_iter()
            .map(|s| (s.skill_id.clone(), Arc::new(Mutex::new(s))))
            .collect();
        Self {
            skills: RwLock::new(skills),
        }
    }

    /// Add or replace a skill.
    pub fn insert(&self, skill: Skill) -> Result<(), StoreError> {
        let mut skills = self.skills.write().map_err(poisoned)?;
        skills.insert(skill.skill_id.clone(), Arc::new(Mutex::new(skill)));
        Ok(())
    }

    fn slot(&self, skill_id: &str) -> Result<Option<SkillSlot>, StoreError> {
        let skills = self.skills.read().map_err(poisoned)?;
        Ok(skills.get(skill_id).cloned())
    }

    fn slots(&self) -> Result<Vec<SkillSlot>, StoreError> {
        let skills = self.skills.read().map_err(poisoned)?;
        Ok(skills.values().cloned().collect())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend("skill registry lock poisoned".to_string())
}

#[async_trait]
impl SkillRegistry for InMemorySkillRegistry {
    async fn get_skill(&self, skill_id: &str) -> Result<Option<Skill>, StoreError> {
        match self.slot(skill_id)? {
            Some(slot) => Ok(Some(slot.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn update_skill_metrics(
        &self,
        skill_id: &str,
        success: bool,
        elapsed_ms: u64,
        mode: MetricsMode,
    ) -> Result<Skill, StoreError> {
        let slot = self
            .slot(skill_id)?
            .ok_or_else(|| StoreError::NotFound(skill_id.to_string()))?;

        let mut skill = slot.lock().await;
        skill.record_invocation(success, elapsed_ms, mode);
        debug!(
            "Metrics for {}: usage={} success_rate={:.2}",
            skill_id, skill.metrics.usage_count, skill.metrics.success_rate
        );
        Ok(skill.clone())
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, StoreError> {
        let mut skills = Vec::new();
        for slot in self.slots()? {
            skills.push(slot.lock().await.clone());
        }
        Ok(skills)
    }
}
