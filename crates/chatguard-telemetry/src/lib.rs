//! ChatGuard Telemetry
//!
//! Metrics and audit trail functionality for ChatGuard.
//!
//! Provides:
//! - Hash-chained audit trail of moderation events
//! - Moderation counters, mirrored to the `metrics` facade

pub mod audit;
pub mod metrics;

pub use audit::{AuditEvent, AuditEventKind, AuditSeverity, AuditTrail};
pub use metrics::{MetricsCollector, MetricsSnapshot};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::audit::{AuditEvent, AuditEventKind, AuditTrail};
    pub use crate::metrics::MetricsCollector;
}
