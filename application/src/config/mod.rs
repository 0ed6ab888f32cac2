//! Application-level configuration.
//!
//! - [`EngineConfig`]: everything the use cases need at construction
//!   (context lookup limits and timeout, review loop policy, metrics mode)

pub mod engine_config;

pub use engine_config::{ContextConfig, EngineConfig, ReviewConfig};
