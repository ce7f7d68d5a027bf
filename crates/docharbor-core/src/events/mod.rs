//! Domain events emitted to the audit sink after successful mutations.

pub mod document;
pub mod folder;

pub use document::DocumentEvent;
pub use folder::FolderEvent;

use serde::{Deserialize, Serialize};

/// Any auditable store event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "resource", rename_all = "lowercase")]
pub enum AuditEvent {
    /// A folder event.
    Folder(FolderEvent),
    /// A document event.
    Document(DocumentEvent),
}

impl From<FolderEvent> for AuditEvent {
    fn from(event: FolderEvent) -> Self {
        Self::Folder(event)
    }
}

impl From<DocumentEvent> for AuditEvent {
    fn from(event: DocumentEvent) -> Self {
        Self::Document(event)
    }
}
