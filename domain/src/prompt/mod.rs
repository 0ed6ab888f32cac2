//! Prompt templates and response parsing for completion-backed review agents.

pub mod parsing;
pub mod template;

pub use parsing::{extract_json_block, parse_generation_response, parse_review_response};
pub use template::ReviewPromptTemplate;
