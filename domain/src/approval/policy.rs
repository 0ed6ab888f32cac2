//! Versioned approval policy.

use super::tier::{ApprovalCheck, ApprovalTier};
use crate::core::error::DomainError;
use crate::core::string::{contains_keyword, contains_word_prefix};
use serde::{Deserialize, Serialize};

/// One tier's allow-list and approach keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRule {
    pub tier: ApprovalTier,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Matched as substrings of the lowercased approach.
    #[serde(default)]
    pub keywords: Vec<String>,
    pub reason: String,
}

impl TierRule {
    fn matches(&self, skill_id: &str, approach_lower: &str) -> bool {
        self.skills.iter().any(|s| s == skill_id)
            || self
                .keywords
                .iter()
                .any(|k| contains_keyword(approach_lower, k))
    }
}

/// Ordered approval rules.
///
/// Evaluation order:
/// 1. `blocked_phrases` (matched from a word start, so plurals and other
///    suffixed forms count) always win and yield
///    [`ApprovalTier::Block`], whatever else the approach mentions.
/// 2. `tiers` in declaration order; the first match wins.
/// 3. `default_tier` with `default_reason`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalPolicy {
    pub version: u32,
    pub tiers: Vec<TierRule>,
    pub blocked_phrases: Vec<String>,
    pub block_reason: String,
    pub default_tier: ApprovalTier,
    pub default_reason: String,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            version: 1,
            tiers: vec![
                TierRule {
                    tier: ApprovalTier::Auto,
                    skills: strings(&["03-marketing-growth", "18-legacy-keeper"]),
                    keywords: strings(&["query", "search", "analyze"]),
                    reason: "Safe read-only or query operation".to_string(),
                },
                TierRule {
                    tier: ApprovalTier::Draft,
                    skills: strings(&[
                        "14-internal-comms",
                        "03-marketing-growth",
                        "07-avatar-comic-scriptwriter",
                        "15-gratitude-department",
                    ]),
                    keywords: strings(&["create", "write", "draft"]),
                    reason: "Content creation requires review before sending".to_string(),
                },
                TierRule {
                    tier: ApprovalTier::Confirm,
                    skills: strings(&[
                        "01-deployment-devops",
                        "05-finance-ops",
                        "04-fundraising-investor",
                        "06-client-delivery",
                    ]),
                    keywords: strings(&["deploy", "delete", "modify database", "payment"]),
                    reason: "High-impact operation requires explicit confirmation".to_string(),
                },
            ],
            blocked_phrases: strings(&[
                "contract",
                "legal agreement",
                "sign document",
                "irreversible",
                "irreversibly",
                "delete all",
                "drop database",
                "format",
                "sudo",
            ]),
            block_reason: "Critical operation blocked - requires manual handling".to_string(),
            default_tier: ApprovalTier::Confirm,
            default_reason: "Unknown operation - requires confirmation".to_string(),
        }
    }
}

impl ApprovalPolicy {
    /// Lowercase every keyword and reject an auto-approving default.
    pub fn validated(mut self) -> Result<Self, DomainError> {
        if self.default_tier == ApprovalTier::Auto {
            return Err(DomainError::InvalidRules(
                "default approval tier must not be auto".to_string(),
            ));
        }
        for rule in &mut self.tiers {
            rule.keywords = normalize(&rule.keywords);
        }
        self.blocked_phrases = normalize(&self.blocked_phrases);
        Ok(self)
    }

    /// Classify a solution. Total and deterministic.
    pub fn classify(&self, skill_id: &str, approach: &str) -> ApprovalCheck {
        let approach_lower = approach.to_lowercase();

        if self
            .blocked_phrases
            .iter()
            .any(|p| contains_word_prefix(&approach_lower, p))
        {
            return ApprovalCheck::new(ApprovalTier::Block, self.block_reason.clone());
        }

        self.tiers
            .iter()
            .find(|rule| rule.matches(skill_id, &approach_lower))
            .map(|rule| ApprovalCheck::new(rule.tier, rule.reason.clone()))
            .unwrap_or_else(|| ApprovalCheck::new(self.default_tier, self.default_reason.clone()))
    }
}

fn normalize(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}
