//! Audit sink trait.

use crate::events::AuditEvent;

/// Fire-and-forget sink for audit events.
///
/// Lifecycle operations notify the sink *after* a successful commit.
/// Implementations must never block and must never fail the operation;
/// a lost audit event is acceptable, a blocked mutation is not.
pub trait AuditSink: Send + Sync + std::fmt::Debug + 'static {
    /// Record an event. Must return promptly.
    fn record(&self, event: &AuditEvent);
}
