//! Incoming commands.

pub mod input;

pub use input::{CommandInput, CommandSource};
