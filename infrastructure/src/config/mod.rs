//! Configuration file loading for skillgate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SKILLGATE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./skillgate.toml` or `./.skillgate.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/skillgate/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAuditConfig, FileConfig, FileContextConfig, FileEngineConfig,
    FileReviewConfig, FileSkillConfig,
};
pub use loader::ConfigLoader;
