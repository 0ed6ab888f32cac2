//! Progress reporting implementations of the application's notifier port

pub mod reporter;
