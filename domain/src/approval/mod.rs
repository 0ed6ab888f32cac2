//! Tiered approval gate.
//!
//! [`ApprovalPolicy::classify`] maps a (skill id, approach text) pair to
//! exactly one [`ApprovalTier`]. The policy is plain data so rule sets can be
//! versioned, swapped from configuration and tested in isolation.

pub mod policy;
pub mod tier;

pub use policy::{ApprovalPolicy, TierRule};
pub use tier::{ApprovalCheck, ApprovalTier};
