//! In-memory document repository.

use std::collections::BTreeSet;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use docharbor_core::{AppError, AppResult};
use docharbor_entity::document::Document;

use crate::repository::DocumentRepository;

/// In-memory document repository backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryDocumentRepository {
    /// Document records keyed by id.
    documents: DashMap<Uuid, Document>,
}

impl MemoryDocumentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for MemoryDocumentRepository {
    async fn insert(&self, document: &Document) -> AppResult<()> {
        if self.documents.contains_key(&document.id) {
            return Err(AppError::internal(format!(
                "Document record {} already exists",
                document.id
            )));
        }
        self.documents.insert(document.id, document.clone());
        Ok(())
    }

    async fn update(&self, document: &Document) -> AppResult<()> {
        match self.documents.get_mut(&document.id) {
            Some(mut entry) => {
                *entry = document.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!(
                "Document record {} not found",
                document.id
            ))),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.documents.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        Ok(self.documents.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_folder(&self, folder_id: Uuid) -> AppResult<Vec<Document>> {
        let mut documents: Vec<Document> = self
            .documents
            .iter()
            .filter(|entry| entry.folder_id == folder_id)
            .map(|entry| entry.value().clone())
            .collect();
        documents.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(documents)
    }

    async fn find_by_folder_and_name(
        &self,
        folder_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Document>> {
        let lower = name.to_lowercase();
        Ok(self
            .documents
            .iter()
            .find(|entry| entry.folder_id == folder_id && entry.name.to_lowercase() == lower)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_uploader_and_checksum(
        &self,
        uploaded_by: Uuid,
        checksum: &str,
    ) -> AppResult<Option<Document>> {
        Ok(self
            .documents
            .iter()
            .find(|entry| {
                entry.uploaded_by == uploaded_by && entry.checksum_sha256 == checksum
            })
            .map(|entry| entry.value().clone()))
    }

    async fn checksums_by_uploader(&self, uploaded_by: Uuid) -> AppResult<BTreeSet<String>> {
        Ok(self
            .documents
            .iter()
            .filter(|entry| entry.uploaded_by == uploaded_by)
            .map(|entry| entry.checksum_sha256.clone())
            .collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.documents.len() as u64)
    }
}
