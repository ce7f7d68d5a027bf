//! The [`DocStore`] facade.
//!
//! Wires the record repositories, the blob backend, the tree lock, the
//! upload reservations, and the audit sink into a single
//! operation-oriented contract for the transport layer. All methods
//! delegate to the folder and document services, which share one lock
//! and one reservation table.

use std::collections::BTreeSet;
use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use docharbor_blob::{LocalBlobStore, MemoryBlobStore};
use docharbor_core::config::AppConfig;
use docharbor_core::traits::{AuditSink, BlobStore, ByteStream};
use docharbor_core::{AppError, AppResult};
use docharbor_entity::document::Document;
use docharbor_entity::folder::Folder;
use docharbor_entity::permission::AccessLevel;
use docharbor_records::flatfile::{FlatFileDocumentRepository, FlatFileFolderRepository};
use docharbor_records::memory::{MemoryDocumentRepository, MemoryFolderRepository};
use docharbor_records::{DocumentRepository, FolderRepository};

use crate::access;
use crate::audit::TracingAuditSink;
use crate::context::RequestContext;
use crate::document::{DocumentService, UploadDocument};
use crate::folder::{
    CopyFolderOutcome, CreateFolderRequest, DeleteFolderOutcome, FolderService,
    SetPermissionsRequest,
};
use crate::locks::TreeLock;
use crate::reservations::UploadReservations;

/// The folder and document store.
#[derive(Debug, Clone)]
pub struct DocStore {
    folders: Arc<dyn FolderRepository>,
    folder_service: FolderService,
    document_service: DocumentService,
}

impl DocStore {
    /// Build a store over the given backends.
    ///
    /// Inserts the well-known root folder if the repository does not
    /// hold it yet.
    pub async fn new(
        folders: Arc<dyn FolderRepository>,
        documents: Arc<dyn DocumentRepository>,
        blobs: Arc<dyn BlobStore>,
        audit: Arc<dyn AuditSink>,
        max_upload_size_bytes: u64,
    ) -> AppResult<Self> {
        let lock = TreeLock::new();
        let reservations = Arc::new(UploadReservations::new());

        let folder_service = FolderService::new(
            folders.clone(),
            documents.clone(),
            blobs.clone(),
            lock.clone(),
            reservations.clone(),
            audit.clone(),
        );
        let document_service = DocumentService::new(
            folders.clone(),
            documents,
            blobs,
            lock,
            reservations,
            audit,
            max_upload_size_bytes,
        );

        let store = Self {
            folders,
            folder_service,
            document_service,
        };
        store.ensure_root().await?;
        Ok(store)
    }

    /// A fully in-memory store, for tests and embedding.
    pub async fn in_memory() -> AppResult<Self> {
        Self::new(
            Arc::new(MemoryFolderRepository::new()),
            Arc::new(MemoryDocumentRepository::new()),
            Arc::new(MemoryBlobStore::new()),
            Arc::new(TracingAuditSink::new()),
            u64::MAX,
        )
        .await
    }

    /// Build a store from configuration, selecting the record and blob
    /// backends by name.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let (folders, documents): (Arc<dyn FolderRepository>, Arc<dyn DocumentRepository>) =
            match config.records.backend.as_str() {
                "memory" => (
                    Arc::new(MemoryFolderRepository::new()),
                    Arc::new(MemoryDocumentRepository::new()),
                ),
                "flatfile" => (
                    Arc::new(FlatFileFolderRepository::new(&config.records.root_path).await?),
                    Arc::new(FlatFileDocumentRepository::new(&config.records.root_path).await?),
                ),
                other => {
                    return Err(AppError::configuration(format!(
                        "Unknown records backend: '{other}'. Expected one of: memory, flatfile"
                    )));
                }
            };

        let blobs: Arc<dyn BlobStore> = match config.blob.provider.as_str() {
            "memory" => Arc::new(MemoryBlobStore::new()),
            "local" => Arc::new(LocalBlobStore::new(&config.blob.local.root_path).await?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown blob provider: '{other}'. Expected one of: memory, local"
                )));
            }
        };

        info!(
            records_backend = %config.records.backend,
            blob_provider = %blobs.provider_type(),
            "DocStore initialized"
        );

        Self::new(
            folders,
            documents,
            blobs,
            Arc::new(TracingAuditSink::new()),
            config.limits.max_upload_size_bytes,
        )
        .await
    }

    /// Insert the root folder record if missing. Idempotent.
    async fn ensure_root(&self) -> AppResult<()> {
        let root = Folder::root();
        if self.folders.find_by_id(root.id).await?.is_none() {
            self.folders.insert(&root).await?;
        }
        Ok(())
    }

    // Folder operations.

    /// Create a folder; the caller becomes its owner.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        request: CreateFolderRequest,
    ) -> AppResult<Folder> {
        self.folder_service.create_folder(ctx, request).await
    }

    /// Rename a folder, cascading the path recompute to descendants.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_name: &str,
    ) -> AppResult<Folder> {
        self.folder_service
            .rename_folder(ctx, folder_id, new_name)
            .await
    }

    /// Move a folder under a new parent, rejecting cycles.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_parent_id: Uuid,
    ) -> AppResult<Folder> {
        self.folder_service
            .move_folder(ctx, folder_id, new_parent_id)
            .await
    }

    /// Change a folder's visibility or permission sets (owner/admin
    /// only).
    pub async fn set_folder_permissions(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        request: SetPermissionsRequest,
    ) -> AppResult<Folder> {
        self.folder_service
            .set_folder_permissions(ctx, folder_id, request)
            .await
    }

    /// List the direct child folders visible to the caller.
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<Vec<Folder>> {
        self.folder_service.list_children(ctx, folder_id).await
    }

    /// The breadcrumb chain from the root to the folder, inclusive.
    pub async fn get_folder_path(&self, folder_id: Uuid) -> AppResult<Vec<Folder>> {
        self.folder_service.folder_path(folder_id).await
    }

    /// Recursively delete a folder subtree, returning aggregate counts.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<DeleteFolderOutcome> {
        self.folder_service.delete_folder(ctx, folder_id).await
    }

    /// Recursively copy a folder subtree under a new parent.
    pub async fn copy_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        target_parent_id: Uuid,
        new_name: Option<String>,
    ) -> AppResult<CopyFolderOutcome> {
        self.folder_service
            .copy_folder(ctx, folder_id, target_parent_id, new_name)
            .await
    }

    /// Resolve the caller's nominal access level on a folder.
    pub async fn resolve_access(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<AccessLevel> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        Ok(access::resolve(&folder, ctx.user_id))
    }

    // Document operations.

    /// Upload a document into a folder.
    pub async fn upload_document(
        &self,
        ctx: &RequestContext,
        request: UploadDocument,
    ) -> AppResult<Document> {
        self.document_service.upload(ctx, request).await
    }

    /// Move a document to another folder.
    pub async fn move_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
        target_folder_id: Uuid,
    ) -> AppResult<Document> {
        self.document_service
            .move_document(ctx, document_id, target_folder_id)
            .await
    }

    /// Delete a document.
    pub async fn delete_document(&self, ctx: &RequestContext, document_id: Uuid) -> AppResult<()> {
        self.document_service.delete_document(ctx, document_id).await
    }

    /// Rename a document within its folder.
    pub async fn rename_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
        new_name: &str,
    ) -> AppResult<Document> {
        self.document_service
            .rename_document(ctx, document_id, new_name)
            .await
    }

    /// Replace a document's tag set.
    pub async fn set_document_tags(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
        tags: BTreeSet<String>,
    ) -> AppResult<Document> {
        self.document_service
            .set_document_tags(ctx, document_id, tags)
            .await
    }

    /// List the documents in a folder visible to the caller.
    pub async fn list_documents(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<Vec<Document>> {
        self.document_service.list_documents(ctx, folder_id).await
    }

    /// Fetch a document record together with its content.
    pub async fn get_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
    ) -> AppResult<(Document, Bytes)> {
        self.document_service.get_document(ctx, document_id).await
    }

    /// Fetch a document record together with a content stream.
    pub async fn download_document(
        &self,
        ctx: &RequestContext,
        document_id: Uuid,
    ) -> AppResult<(Document, ByteStream)> {
        self.document_service
            .download_document(ctx, document_id)
            .await
    }
}
