//! Adversarial review loop domain.
//!
//! Value types exchanged between the generator, the validator and the loop,
//! plus the pure pieces of the loop's policy: the improvement directive and
//! the human-readable summary.

pub mod directive;
pub mod entities;
pub mod summary;

pub use directive::improvement_directive;
pub use entities::{
    CodeGenerationRequest, CodeGenerationResult, CodeMetadata, GeneratedFile, IssueSeverity,
    ReviewIssue, ReviewIteration, ReviewLoopPolicy, ReviewLoopResult, ReviewLoopStatus,
    ReviewResult,
};
pub use summary::summarize;
