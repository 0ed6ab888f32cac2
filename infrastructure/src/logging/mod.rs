//! Logging infrastructure: structured audit logging.
//!
//! Provides [`JsonlAuditStore`], a JSONL mirror that decorates any
//! [`ExecutionStore`](skillgate_application::ExecutionStore).

mod jsonl_audit;

pub use jsonl_audit::JsonlAuditStore;
