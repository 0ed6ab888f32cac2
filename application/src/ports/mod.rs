//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod code_generator;
pub mod code_validator;
pub mod completion;
pub mod context_store;
pub mod execution_store;
pub mod progress;
pub mod skill_executor;
pub mod skill_registry;
pub mod store_error;
