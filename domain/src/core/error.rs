//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Command text is empty")]
    EmptyCommand,

    #[error("Invalid rule set: {0}")]
    InvalidRules(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(DomainError::EmptyCommand.to_string(), "Command text is empty");
        assert_eq!(
            DomainError::InvalidRules("no families".to_string()).to_string(),
            "Invalid rule set: no families"
        );
    }
}
