//! Document lifecycle operations.
//!
//! Upload is the one operation here that mixes catalog state with slow
//! blob I/O, so it runs in three steps: validate and reserve under the
//! tree write lock, write bytes with no lock held, then re-acquire the
//! lock to commit the record. Every failure path releases its
//! reservations, and a blob written for a record that never committed
//! is removed best-effort.

use std::collections::BTreeSet;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use docharbor_core::digest::sha256_hex;
use docharbor_core::events::DocumentEvent;
use docharbor_core::traits::{AuditSink, BlobStore, ByteStream};
use docharbor_core::{AppError, AppResult};
use docharbor_entity::document::{CreateDocument, Document};
use docharbor_entity::folder::Folder;
use docharbor_entity::permission::AccessLevel;
use docharbor_records::{DocumentRepository, FolderRepository};

use crate::access;
use crate::context::RequestContext;
use crate::locks::TreeLock;
use crate::reservations::UploadReservations;
use crate::validate;

/// The blob key for a document, derived from its ID.
///
/// Keys are sharded by the first two hex characters so filesystem
/// backends never accumulate every blob in a single directory. Keys are
/// never derived from checksums: two uploaders may store identical
/// bytes, and each copy must be independently deletable.
pub(crate) fn blob_key(id: Uuid) -> String {
    let simple = id.simple().to_string();
    format!("{}/{}", &simple[..2], simple)
}

/// Parameters for uploading a document.
#[derive(Debug, Clone)]
pub struct UploadDocument {
    /// The destination folder.
    pub folder_id: Uuid,
    /// The declared document name.
    pub name: String,
    /// MIME type, if the transport knows it.
    pub mime_type: Option<String>,
    /// The document content.
    pub bytes: Bytes,
    /// Initial tag set.
    pub tags: BTreeSet<String>,
    /// Arbitrary metadata.
    pub metadata: serde_json::Value,
}

impl UploadDocument {
    /// An upload with no MIME type, tags, or metadata.
    pub fn new(folder_id: Uuid, name: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            folder_id,
            name: name.into(),
            mime_type: None,
            bytes,
            tags: BTreeSet::new(),
            metadata: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Reservations held by an in-flight upload, released on every exit
/// path.
struct HeldReservations<'a> {
    reservations: &'a UploadReservations,
    folder_id: Uuid,
    name: String,
    uploaded_by: Uuid,
    checksum: String,
}

impl HeldReservations<'_> {
    fn release(self) {
        self.reservations.release_name(self.folder_id, &self.name);
        self.reservations
            .release_checksum(self.uploaded_by, &self.checksum);
    }
}

/// Service for document catalog operations.
#[derive(Clone)]
pub struct DocumentService {
    folders: Arc<dyn FolderRepository>,
    documents: Arc<dyn DocumentRepository>,
    blobs: Arc<dyn BlobStore>,
    lock: TreeLock,
    reservations: Arc<UploadReservations>,
    audit: Arc<dyn AuditSink>,
    max_upload_size_bytes: u64,
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("max_upload_size_bytes", &self.max_upload_size_bytes)
            .finish_non_exhaustive()
    }
}

impl DocumentService {
    /// Create a new document service.
    pub fn new(
        folders: Arc<dyn FolderRepository>,
        documents: Arc<dyn DocumentRepository>,
        blobs: Arc<dyn BlobStore>,
        lock: TreeLock,
        reservations: Arc<UploadReservations>,
        audit: Arc<dyn AuditSink>,
        max_upload_size_bytes: u64,
    ) -> Self {
        Self {
            folders,
            documents,
            blobs,
            lock,
            reservations,
            audit,
            max_upload_size_bytes,
        }
    }

    async fn require_folder(&self, id: Uuid) -> AppResult<Folder> {
        self.folders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    async fn require_document(&self, id: Uuid) -> AppResult<Document> {
        self.documents
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))
    }

    /// The capability union for mutating an existing document: admin,
    /// the original uploader, or edit access on its folder.
    fn can_modify(ctx: &RequestContext, document: &Document, folder: &Folder) -> AppResult<()> {
        if access::document_delete_allowed(ctx, document, folder) {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Not permitted to modify this document",
            ))
        }
    }

    /// Upload a document into a folder.
    ///
    /// Rejects with `Duplicate` if this uploader already stores
    /// identical content anywhere in the tree, and with `Conflict` on a
    /// name collision within the folder. Bytes are persisted before the
    /// record is committed, so the catalog never points at missing
    /// blobs.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        request: UploadDocument,
    ) -> AppResult<Document> {
        validate::name(&request.name, "Document")?;
        if request.bytes.len() as u64 > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "Upload of {} bytes exceeds the {} byte limit",
                request.bytes.len(),
                self.max_upload_size_bytes
            )));
        }

        let checksum = sha256_hex(&request.bytes);

        // Step 1: validate and reserve under the write lock.
        let held = {
            let _guard = self.lock.write().await;

            let folder = self.require_folder(request.folder_id).await?;
            access::authorize(ctx, &folder, AccessLevel::Edit)?;

            if self
                .documents
                .find_by_uploader_and_checksum(ctx.user_id, &checksum)
                .await?
                .is_some()
            {
                return Err(AppError::duplicate(
                    "Identical content was already uploaded by this user",
                ));
            }
            if self
                .documents
                .find_by_folder_and_name(folder.id, &request.name)
                .await?
                .is_some()
            {
                return Err(AppError::conflict(format!(
                    "A document named '{}' already exists in this folder",
                    request.name
                )));
            }

            if !self.reservations.reserve_checksum(ctx.user_id, &checksum) {
                return Err(AppError::duplicate(
                    "An upload of identical content by this user is in flight",
                ));
            }
            if !self.reservations.reserve_name(folder.id, &request.name) {
                self.reservations.release_checksum(ctx.user_id, &checksum);
                return Err(AppError::conflict(format!(
                    "An upload named '{}' into this folder is in flight",
                    request.name
                )));
            }

            HeldReservations {
                reservations: self.reservations.as_ref(),
                folder_id: folder.id,
                name: request.name.clone(),
                uploaded_by: ctx.user_id,
                checksum: checksum.clone(),
            }
        };

        // Step 2: write bytes with no lock held.
        let document = Document::from(CreateDocument {
            folder_id: request.folder_id,
            name: request.name,
            original_name: held.name.clone(),
            mime_type: request.mime_type,
            size_bytes: request.bytes.len() as i64,
            checksum_sha256: checksum,
            uploaded_by: ctx.user_id,
            tags: request.tags,
            metadata: request.metadata,
        });
        let key = blob_key(document.id);

        if let Err(e) = self.blobs.put(&key, request.bytes).await {
            held.release();
            return Err(e);
        }

        // Step 3: re-acquire the lock and commit the record.
        let commit = {
            let _guard = self.lock.write().await;

            match self.folders.find_by_id(document.folder_id).await {
                Ok(Some(_)) => self.documents.insert(&document).await,
                Ok(None) => Err(AppError::not_found("Folder was deleted during the upload")),
                Err(e) => Err(e),
            }
        };
        held.release();

        if let Err(e) = commit {
            if let Err(cleanup) = self.blobs.delete(&key).await {
                warn!(key = %key, error = %cleanup, "Failed to delete blob for uncommitted upload");
            }
            return Err(e);
        }

        info!(
            document_id = %document.id,
            folder_id = %document.folder_id,
            size_bytes = document.size_bytes,
            "Document uploaded"
        );
        self.audit.record(
            &DocumentEvent::Uploaded {
                document_id: document.id,
                folder_id: document.folder_id,
                name: document.name.clone(),
                size_bytes: document.size_bytes as u64,
                uploaded_by: ctx.user_id,
            }
            .into(),
        );

        Ok(document)
    }

    /// Move a document to another folder.
    ///
    /// Dedup is scoped per uploader, not per folder, so a move can
    /// never create a checksum duplicate; only the destination name is
    /// checked.
    pub async fn move_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
        target_folder_id: Uuid,
    ) -> AppResult<Document> {
        let _guard = self.lock.write().await;

        let mut document = self.require_document(document_id).await?;
        let source = self.require_folder(document.folder_id).await?;
        let target = self.require_folder(target_folder_id).await?;

        Self::can_modify(ctx, &document, &source)?;
        access::authorize(ctx, &target, AccessLevel::Edit)?;

        if self
            .documents
            .find_by_folder_and_name(target.id, &document.name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A document named '{}' already exists in the destination folder",
                document.name
            )));
        }
        // An upload that validated but has not committed yet holds a
        // name reservation; moving past it would break sibling
        // uniqueness the moment that upload commits.
        if self.reservations.name_reserved(target.id, &document.name) {
            return Err(AppError::conflict(format!(
                "An upload named '{}' into the destination folder is in flight",
                document.name
            )));
        }

        let from_folder_id = document.folder_id;
        document.folder_id = target.id;
        document.updated_at = chrono::Utc::now();
        self.documents.update(&document).await?;

        info!(document_id = %document.id, to_folder_id = %target.id, "Document moved");
        self.audit.record(
            &DocumentEvent::Moved {
                document_id: document.id,
                from_folder_id,
                to_folder_id: target.id,
            }
            .into(),
        );

        Ok(document)
    }

    /// Delete a document.
    ///
    /// The catalog record goes first; the blob is removed best-effort
    /// afterwards, since a dangling blob is reclaimable disk space
    /// while a record pointing at missing bytes is corruption.
    pub async fn delete_document(&self, ctx: &RequestContext, document_id: Uuid) -> AppResult<()> {
        let guard = self.lock.write().await;

        let document = self.require_document(document_id).await?;
        let folder = self.require_folder(document.folder_id).await?;
        Self::can_modify(ctx, &document, &folder)?;

        self.documents.delete(document.id).await?;
        drop(guard);

        let key = blob_key(document.id);
        if let Err(e) = self.blobs.delete(&key).await {
            warn!(key = %key, error = %e, "Failed to delete blob for removed document");
        }

        info!(document_id = %document.id, "Document deleted");
        self.audit.record(
            &DocumentEvent::Deleted {
                document_id: document.id,
                name: document.name.clone(),
                folder_id: document.folder_id,
            }
            .into(),
        );

        Ok(())
    }

    /// Rename a document within its folder.
    pub async fn rename_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
        new_name: &str,
    ) -> AppResult<Document> {
        validate::name(new_name, "Document")?;

        let _guard = self.lock.write().await;

        let mut document = self.require_document(document_id).await?;
        let folder = self.require_folder(document.folder_id).await?;
        Self::can_modify(ctx, &document, &folder)?;

        if let Some(existing) = self
            .documents
            .find_by_folder_and_name(folder.id, new_name)
            .await?
            && existing.id != document.id
        {
            return Err(AppError::conflict(format!(
                "A document named '{new_name}' already exists in this folder"
            )));
        }
        if self.reservations.name_reserved(folder.id, new_name) {
            return Err(AppError::conflict(format!(
                "An upload named '{new_name}' into this folder is in flight"
            )));
        }

        let old_name = std::mem::replace(&mut document.name, new_name.to_string());
        document.updated_at = chrono::Utc::now();
        self.documents.update(&document).await?;

        info!(document_id = %document.id, old_name = %old_name, new_name = %document.name, "Document renamed");
        self.audit.record(
            &DocumentEvent::Renamed {
                document_id: document.id,
                old_name,
                new_name: document.name.clone(),
            }
            .into(),
        );

        Ok(document)
    }

    /// Replace a document's tag set.
    pub async fn set_document_tags(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
        tags: BTreeSet<String>,
    ) -> AppResult<Document> {
        let _guard = self.lock.write().await;

        let mut document = self.require_document(document_id).await?;
        let folder = self.require_folder(document.folder_id).await?;
        Self::can_modify(ctx, &document, &folder)?;

        document.tags = tags;
        document.updated_at = chrono::Utc::now();
        self.documents.update(&document).await?;

        self.audit.record(
            &DocumentEvent::Retagged {
                document_id: document.id,
                tags: document.tags.iter().cloned().collect(),
            }
            .into(),
        );

        Ok(document)
    }

    /// List the documents in a folder visible to the caller.
    ///
    /// Mirrors folder listing: a caller with no access gets an empty
    /// list, a missing folder is `NotFound`.
    pub async fn list_documents(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<Vec<Document>> {
        let _guard = self.lock.read().await;

        let folder = self.require_folder(folder_id).await?;
        if !ctx.is_admin() && !access::resolve(&folder, ctx.user_id).can_read() {
            return Ok(Vec::new());
        }

        self.documents.find_by_folder(folder.id).await
    }

    /// Fetch a document record together with its content.
    pub async fn get_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
    ) -> AppResult<(Document, Bytes)> {
        let document = self.authorize_read(ctx, document_id).await?;
        let bytes = self.blobs.get(&blob_key(document.id)).await?;
        Ok((document, bytes))
    }

    /// Fetch a document record together with a content stream, for
    /// transports that forward bytes without buffering.
    pub async fn download_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
    ) -> AppResult<(Document, ByteStream)> {
        let document = self.authorize_read(ctx, document_id).await?;
        let stream = self.blobs.get_stream(&blob_key(document.id)).await?;
        Ok((document, stream))
    }

    /// Catalog lookup plus view authorization; blob I/O happens after
    /// the lock is released.
    async fn authorize_read(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
    ) -> AppResult<Document> {
        let _guard = self.lock.read().await;

        let document = self.require_document(document_id).await?;
        let folder = self.require_folder(document.folder_id).await?;
        access::authorize(ctx, &folder, AccessLevel::View)?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use docharbor_blob::MemoryBlobStore;
    use docharbor_core::error::ErrorKind;
    use docharbor_entity::folder::{FolderPermissions, Visibility};
    use docharbor_records::memory::{MemoryDocumentRepository, MemoryFolderRepository};

    use crate::audit::NullAuditSink;

    struct Fixture {
        service: DocumentService,
        reservations: Arc<UploadReservations>,
        folders: Arc<MemoryFolderRepository>,
        documents: Arc<MemoryDocumentRepository>,
    }

    fn fixture() -> Fixture {
        let folders = Arc::new(MemoryFolderRepository::new());
        let documents = Arc::new(MemoryDocumentRepository::new());
        let reservations = Arc::new(UploadReservations::new());
        let service = DocumentService::new(
            folders.clone(),
            documents.clone(),
            Arc::new(MemoryBlobStore::new()),
            TreeLock::new(),
            reservations.clone(),
            Arc::new(NullAuditSink::new()),
            u64::MAX,
        );
        Fixture {
            service,
            reservations,
            folders,
            documents,
        }
    }

    async fn seed_folder(fx: &Fixture, parent: &Folder, name: &str, owner: Uuid) -> Folder {
        let folder = Folder::new(
            parent,
            name,
            Visibility::Private,
            FolderPermissions::owned_by(owner),
        );
        fx.folders.insert(&folder).await.unwrap();
        folder
    }

    async fn seed_document(fx: &Fixture, folder: &Folder, name: &str, owner: Uuid) -> Document {
        let document = Document::from(CreateDocument {
            folder_id: folder.id,
            name: name.to_string(),
            original_name: name.to_string(),
            mime_type: None,
            size_bytes: 4,
            checksum_sha256: format!("h-{name}"),
            uploaded_by: owner,
            tags: BTreeSet::new(),
            metadata: serde_json::json!({}),
        });
        fx.documents.insert(&document).await.unwrap();
        document
    }

    // A validated-but-uncommitted upload holds a name reservation on
    // its destination folder. Moving or renaming another document onto
    // that name must conflict, or the folder ends up with duplicate
    // sibling names once the upload commits.
    #[tokio::test]
    async fn test_move_document_respects_in_flight_name_reservation() {
        let fx = fixture();
        let user = Uuid::new_v4();
        let ctx = RequestContext::member(user);

        let root = Folder::root();
        fx.folders.insert(&root).await.unwrap();
        let source = seed_folder(&fx, &root, "source", user).await;
        let target = seed_folder(&fx, &root, "target", user).await;
        let document = seed_document(&fx, &source, "x.txt", user).await;

        assert!(fx.reservations.reserve_name(target.id, "x.txt"));
        let err = fx
            .service
            .move_document(&ctx, document.id, target.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        fx.reservations.release_name(target.id, "x.txt");
        let moved = fx
            .service
            .move_document(&ctx, document.id, target.id)
            .await
            .unwrap();
        assert_eq!(moved.folder_id, target.id);
    }

    #[tokio::test]
    async fn test_rename_document_respects_in_flight_name_reservation() {
        let fx = fixture();
        let user = Uuid::new_v4();
        let ctx = RequestContext::member(user);

        let root = Folder::root();
        fx.folders.insert(&root).await.unwrap();
        let folder = seed_folder(&fx, &root, "docs", user).await;
        let document = seed_document(&fx, &folder, "x.txt", user).await;

        // Reservation lookups are case-insensitive, like sibling names.
        assert!(fx.reservations.reserve_name(folder.id, "Y.TXT"));
        let err = fx
            .service
            .rename_document(&ctx, document.id, "y.txt")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        fx.reservations.release_name(folder.id, "Y.TXT");
        let renamed = fx
            .service
            .rename_document(&ctx, document.id, "y.txt")
            .await
            .unwrap();
        assert_eq!(renamed.name, "y.txt");
    }

    #[test]
    fn test_blob_key_is_sharded_by_prefix() {
        let id = Uuid::new_v4();
        let key = blob_key(id);
        let simple = id.simple().to_string();
        assert_eq!(key, format!("{}/{}", &simple[..2], simple));
        assert_eq!(key.len(), 2 + 1 + 32);
    }

    #[test]
    fn test_blob_key_differs_per_document() {
        assert_ne!(blob_key(Uuid::new_v4()), blob_key(Uuid::new_v4()));
    }
}
