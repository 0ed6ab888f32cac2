//! Approval tiers and the gate's verdict.

use serde::{Deserialize, Serialize};

/// Approval strength required before a solution may execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalTier {
    /// Executes without a human in the loop.
    Auto,
    /// A draft is produced for review before anything is sent.
    Draft,
    /// Needs explicit confirmation.
    Confirm,
    /// Never executed by the engine.
    Block,
}

impl ApprovalTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalTier::Auto => "auto",
            ApprovalTier::Draft => "draft",
            ApprovalTier::Confirm => "confirm",
            ApprovalTier::Block => "block",
        }
    }

    /// Human-readable explanation of what the tier means for the caller.
    pub fn description(&self) -> &'static str {
        match self {
            ApprovalTier::Auto => "Automatically executed - safe operation",
            ApprovalTier::Draft => "Draft created for your review before sending",
            ApprovalTier::Confirm => "Requires your explicit confirmation to proceed",
            ApprovalTier::Block => "Blocked - must be handled manually",
        }
    }
}

impl std::str::FromStr for ApprovalTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ApprovalTier::Auto),
            "draft" => Ok(ApprovalTier::Draft),
            "confirm" => Ok(ApprovalTier::Confirm),
            "block" => Ok(ApprovalTier::Block),
            _ => Err(format!("Invalid ApprovalTier: {}", s)),
        }
    }
}

impl std::fmt::Display for ApprovalTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verdict of the approval gate.
///
/// `requires_approval` and `auto_approved` are derived from the tier so the
/// two flags can never disagree with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalCheck {
    pub requires_approval: bool,
    pub auto_approved: bool,
    pub tier: ApprovalTier,
    pub reason: String,
}

impl ApprovalCheck {
    pub fn new(tier: ApprovalTier, reason: impl Into<String>) -> Self {
        let auto = tier == ApprovalTier::Auto;
        Self {
            requires_approval: !auto,
            auto_approved: auto,
            tier,
            reason: reason.into(),
        }
    }

    /// True when a human must act before the solution runs.
    pub fn is_gated(&self) -> bool {
        self.requires_approval && !self.auto_approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_follow_tier() {
        let auto = ApprovalCheck::new(ApprovalTier::Auto, "safe");
        assert!(!auto.requires_approval);
        assert!(auto.auto_approved);
        assert!(!auto.is_gated());

        for tier in [ApprovalTier::Draft, ApprovalTier::Confirm, ApprovalTier::Block] {
            let check = ApprovalCheck::new(tier, "gated");
            assert!(check.requires_approval);
            assert!(!check.auto_approved);
            assert!(check.is_gated());
        }
    }

    #[test]
    fn test_tier_parse_and_describe() {
        assert_eq!("Block".parse::<ApprovalTier>().unwrap(), ApprovalTier::Block);
        assert!("maybe".parse::<ApprovalTier>().is_err());
        assert!(ApprovalTier::Draft.description().contains("review"));
    }
}
