//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: text helpers used by keyword matching and summaries

pub mod error;
pub mod string;
