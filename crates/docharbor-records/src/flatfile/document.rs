//! Flat-file document repository.

use std::collections::BTreeSet;
use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use docharbor_core::{AppError, AppResult};
use docharbor_entity::document::Document;

use crate::repository::DocumentRepository;

use super::{delete_record, ensure_dir, load_all, read_record, record_exists, write_record};

/// Document repository writing one JSON file per document record.
#[derive(Debug, Clone)]
pub struct FlatFileDocumentRepository {
    /// Directory holding the document record files.
    dir: PathBuf,
}

impl FlatFileDocumentRepository {
    /// Create a repository rooted at `<records_root>/documents`.
    pub async fn new(records_root: &str) -> AppResult<Self> {
        let dir = PathBuf::from(records_root).join("documents");
        ensure_dir(&dir).await?;
        Ok(Self { dir })
    }
}

#[async_trait]
impl DocumentRepository for FlatFileDocumentRepository {
    async fn insert(&self, document: &Document) -> AppResult<()> {
        if record_exists(&self.dir, document.id).await {
            return Err(AppError::internal(format!(
                "Document record {} already exists",
                document.id
            )));
        }
        write_record(&self.dir, document.id, document).await
    }

    async fn update(&self, document: &Document) -> AppResult<()> {
        if !record_exists(&self.dir, document.id).await {
            return Err(AppError::not_found(format!(
                "Document record {} not found",
                document.id
            )));
        }
        write_record(&self.dir, document.id, document).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        delete_record(&self.dir, id).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        read_record(&self.dir, id).await
    }

    async fn find_by_folder(&self, folder_id: Uuid) -> AppResult<Vec<Document>> {
        let mut documents: Vec<Document> = load_all::<Document>(&self.dir)
            .await?
            .into_iter()
            .filter(|document| document.folder_id == folder_id)
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
        Ok(load_all::<Document>(&self.dir)
            .await?
            .into_iter()
            .find(|document| {
                document.folder_id == folder_id && document.name.to_lowercase() == lower
            }))
    }

    async fn find_by_uploader_and_checksum(
        &self,
        uploaded_by: Uuid,
        checksum: &str,
    ) -> AppResult<Option<Document>> {
        Ok(load_all::<Document>(&self.dir)
            .await?
            .into_iter()
            .find(|document| {
                document.uploaded_by == uploaded_by && document.checksum_sha256 == checksum
            }))
    }

    async fn checksums_by_uploader(&self, uploaded_by: Uuid) -> AppResult<BTreeSet<String>> {
        Ok(load_all::<Document>(&self.dir)
            .await?
            .into_iter()
            .filter(|document| document.uploaded_by == uploaded_by)
            .map(|document| document.checksum_sha256)
            .collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(load_all::<Document>(&self.dir).await?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docharbor_entity::document::CreateDocument;

    fn make_document(folder_id: Uuid, uploader: Uuid, name: &str, checksum: &str) -> Document {
        Document::from(CreateDocument {
            folder_id,
            name: name.to_string(),
            original_name: name.to_string(),
            mime_type: None,
            size_bytes: 5,
            checksum_sha256: checksum.to_string(),
            uploaded_by: uploader,
            tags: BTreeSet::new(),
            metadata: serde_json::json!({}),
        })
    }

    #[tokio::test]
    async fn test_roundtrip_and_queries() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FlatFileDocumentRepository::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        let folder = Uuid::new_v4();
        let uploader = Uuid::new_v4();
        let doc = make_document(folder, uploader, "x.txt", "h1");
        repo.insert(&doc).await.unwrap();

        assert!(
            repo.find_by_folder_and_name(folder, "X.TXT")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            repo.find_by_uploader_and_checksum(uploader, "h1")
                .await
                .unwrap()
                .is_some()
        );
        assert_eq!(repo.find_by_folder(folder).await.unwrap().len(), 1);

        assert!(repo.delete(doc.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
