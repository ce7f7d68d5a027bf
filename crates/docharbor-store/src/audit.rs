//! Audit sink implementations.

use tracing::{info, warn};

use docharbor_core::events::AuditEvent;
use docharbor_core::traits::AuditSink;

/// Audit sink emitting events as structured tracing records.
#[derive(Debug, Default, Clone)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    /// Create a new tracing audit sink.
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        match serde_json::to_string(event) {
            Ok(json) => info!(target: "docharbor::audit", event = %json, "Audit event"),
            Err(e) => warn!(target: "docharbor::audit", error = %e, "Unserializable audit event"),
        }
    }
}

/// Audit sink that discards all events.
#[derive(Debug, Default, Clone)]
pub struct NullAuditSink;

impl NullAuditSink {
    /// Create a new discarding audit sink.
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for NullAuditSink {
    fn record(&self, _event: &AuditEvent) {}
}
