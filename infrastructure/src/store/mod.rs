//! In-memory adapters for the persistence ports.

mod context_store;
mod execution_store;
mod skill_registry;

pub use context_store::StaticContextStore;
pub use execution_store::InMemoryExecutionStore;
pub use skill_registry::InMemorySkillRegistry;

#[cfg(test)]
pub(crate) use execution_store::tests::new_execution;
