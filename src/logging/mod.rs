//! Structured logging and assessment audit lines.

mod format;

pub use format::{AuditEvent, StructuredLogger};
