//! End-to-end tests for the store facade: tree invariants, access
//! control, upload dedup, cascading delete, and subtree copy.

use std::collections::BTreeSet;

use bytes::Bytes;
use uuid::Uuid;

use docharbor_core::config::AppConfig;
use docharbor_core::error::ErrorKind;
use docharbor_entity::folder::{ROOT_FOLDER_ID, Visibility};
use docharbor_entity::permission::AccessLevel;
use docharbor_store::folder::{CreateFolderRequest, SetPermissionsRequest};
use docharbor_store::document::UploadDocument;
use docharbor_store::{DocStore, RequestContext};

fn folder_req(parent_id: Uuid, name: &str, visibility: Visibility) -> CreateFolderRequest {
    CreateFolderRequest {
        parent_id,
        name: name.to_string(),
        visibility,
        viewers: BTreeSet::new(),
        editors: BTreeSet::new(),
    }
}

fn upload_req(folder_id: Uuid, name: &str, content: &'static [u8]) -> UploadDocument {
    UploadDocument::new(folder_id, name, Bytes::from_static(content))
}

#[tokio::test]
async fn test_create_folder_under_root() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    let folder = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "reports", Visibility::Public))
        .await
        .unwrap();

    assert_eq!(folder.path, "/reports");
    assert_eq!(folder.depth, 1);
    assert_eq!(folder.owner_id(), u1.user_id);

    let children = store.list_children(&u1, ROOT_FOLDER_ID).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, folder.id);
}

#[tokio::test]
async fn test_sibling_names_unique_case_insensitive() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "Reports", Visibility::Public))
        .await
        .unwrap();
    let err = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "reports", Visibility::Public))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_create_under_missing_parent_is_not_found() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    let err = store
        .create_folder(&u1, folder_req(Uuid::new_v4(), "orphan", Visibility::Public))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_move_into_own_subtree_is_a_cycle() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "a", Visibility::Public))
        .await
        .unwrap();
    let b = store
        .create_folder(&u1, folder_req(a.id, "b", Visibility::Public))
        .await
        .unwrap();

    let err = store.move_folder(&u1, a.id, b.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOperation);

    let err = store.move_folder(&u1, a.id, a.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOperation);
}

#[tokio::test]
async fn test_rename_cascades_paths_to_descendants() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "a", Visibility::Public))
        .await
        .unwrap();
    let b = store
        .create_folder(&u1, folder_req(a.id, "b", Visibility::Public))
        .await
        .unwrap();
    let c = store
        .create_folder(&u1, folder_req(b.id, "c", Visibility::Public))
        .await
        .unwrap();

    let renamed = store.rename_folder(&u1, a.id, "archive").await.unwrap();
    assert_eq!(renamed.path, "/archive");

    let chain = store.get_folder_path(c.id).await.unwrap();
    let paths: Vec<&str> = chain.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["/", "/archive", "/archive/b", "/archive/b/c"]);
}

#[tokio::test]
async fn test_move_cascades_paths_to_descendants() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "a", Visibility::Public))
        .await
        .unwrap();
    let b = store
        .create_folder(&u1, folder_req(a.id, "b", Visibility::Public))
        .await
        .unwrap();
    let other = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "other", Visibility::Public))
        .await
        .unwrap();

    let moved = store.move_folder(&u1, a.id, other.id).await.unwrap();
    assert_eq!(moved.path, "/other/a");
    assert_eq!(moved.depth, 2);

    let chain = store.get_folder_path(b.id).await.unwrap();
    assert_eq!(chain.last().unwrap().path, "/other/a/b");
    assert_eq!(chain.last().unwrap().depth, 3);
}

#[tokio::test]
async fn test_root_cannot_be_renamed_moved_or_deleted() {
    let store = DocStore::in_memory().await.unwrap();
    let admin = RequestContext::admin(Uuid::new_v4());

    let target = store
        .create_folder(&admin, folder_req(ROOT_FOLDER_ID, "t", Visibility::Public))
        .await
        .unwrap();

    let err = store
        .rename_folder(&admin, ROOT_FOLDER_ID, "renamed")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOperation);

    let err = store
        .move_folder(&admin, ROOT_FOLDER_ID, target.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOperation);

    let err = store.delete_folder(&admin, ROOT_FOLDER_ID).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOperation);
}

#[tokio::test]
async fn test_upload_dedup_is_scoped_per_uploader() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());
    let u2 = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "a", Visibility::Public))
        .await
        .unwrap();
    let mut b_req = folder_req(a.id, "b", Visibility::Public);
    b_req.editors.insert(u2.user_id);
    let b = store.create_folder(&u1, b_req).await.unwrap();

    store
        .upload_document(&u1, upload_req(a.id, "x.txt", b"same bytes"))
        .await
        .unwrap();

    // Same uploader, identical bytes, different folder and name.
    let err = store
        .upload_document(&u1, upload_req(b.id, "y.txt", b"same bytes"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Duplicate);

    // A different uploader stores identical bytes freely.
    store
        .upload_document(&u2, upload_req(b.id, "y.txt", b"same bytes"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upload_name_conflict_case_insensitive() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "a", Visibility::Public))
        .await
        .unwrap();

    store
        .upload_document(&u1, upload_req(a.id, "Report.pdf", b"one"))
        .await
        .unwrap();
    let err = store
        .upload_document(&u1, upload_req(a.id, "report.PDF", b"two"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_upload_requires_edit_access() {
    let store = DocStore::in_memory().await.unwrap();
    let owner = RequestContext::member(Uuid::new_v4());
    let stranger = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&owner, folder_req(ROOT_FOLDER_ID, "a", Visibility::Public))
        .await
        .unwrap();

    // Public grants view, not edit.
    let err = store
        .upload_document(&stranger, upload_req(a.id, "x.txt", b"hi"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_delete_folder_cascades_and_counts() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());
    let u2 = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "a", Visibility::Public))
        .await
        .unwrap();
    let mut b_req = folder_req(a.id, "b", Visibility::Public);
    b_req.editors.insert(u2.user_id);
    let b = store.create_folder(&u1, b_req).await.unwrap();

    let doc1 = store
        .upload_document(&u1, upload_req(a.id, "x.txt", b"content one"))
        .await
        .unwrap();
    store
        .upload_document(&u2, upload_req(b.id, "y.txt", b"content two"))
        .await
        .unwrap();

    let outcome = store.delete_folder(&u1, a.id).await.unwrap();
    assert_eq!(outcome.folders_deleted, 2);
    assert_eq!(outcome.documents_deleted, 2);

    let err = store.list_children(&u1, a.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = store.list_documents(&u1, b.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = store.get_document(&u1, doc1.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_folder_requires_owner() {
    let store = DocStore::in_memory().await.unwrap();
    let owner = RequestContext::member(Uuid::new_v4());
    let editor = RequestContext::member(Uuid::new_v4());

    let mut req = folder_req(ROOT_FOLDER_ID, "a", Visibility::Private);
    req.editors.insert(editor.user_id);
    let a = store.create_folder(&owner, req).await.unwrap();

    let err = store.delete_folder(&editor, a.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // Admins are owner-equivalent.
    let admin = RequestContext::admin(Uuid::new_v4());
    store.delete_folder(&admin, a.id).await.unwrap();
}

#[tokio::test]
async fn test_list_children_hides_private_contents() {
    let store = DocStore::in_memory().await.unwrap();
    let owner = RequestContext::member(Uuid::new_v4());
    let stranger = RequestContext::member(Uuid::new_v4());

    let secret = store
        .create_folder(&owner, folder_req(ROOT_FOLDER_ID, "secret", Visibility::Private))
        .await
        .unwrap();
    store
        .create_folder(&owner, folder_req(secret.id, "inner", Visibility::Private))
        .await
        .unwrap();
    store
        .upload_document(&owner, upload_req(secret.id, "x.txt", b"hidden"))
        .await
        .unwrap();

    // Existence is not an error, contents are simply empty.
    assert!(store.list_children(&stranger, secret.id).await.unwrap().is_empty());
    assert!(store.list_documents(&stranger, secret.id).await.unwrap().is_empty());

    assert_eq!(store.list_children(&owner, secret.id).await.unwrap().len(), 1);
    assert_eq!(store.list_documents(&owner, secret.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_permissions_owner_only() {
    let store = DocStore::in_memory().await.unwrap();
    let owner = RequestContext::member(Uuid::new_v4());
    let editor = RequestContext::member(Uuid::new_v4());

    let mut req = folder_req(ROOT_FOLDER_ID, "a", Visibility::Private);
    req.editors.insert(editor.user_id);
    let a = store.create_folder(&owner, req).await.unwrap();

    let err = store
        .set_folder_permissions(
            &editor,
            a.id,
            SetPermissionsRequest {
                visibility: Some(Visibility::Public),
                permissions: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let updated = store
        .set_folder_permissions(
            &owner,
            a.id,
            SetPermissionsRequest {
                visibility: Some(Visibility::Public),
                permissions: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.visibility, Visibility::Public);
}

#[tokio::test]
async fn test_resolve_access_reports_nominal_level() {
    let store = DocStore::in_memory().await.unwrap();
    let owner = RequestContext::member(Uuid::new_v4());
    let viewer = RequestContext::member(Uuid::new_v4());
    let admin = RequestContext::admin(Uuid::new_v4());

    let mut req = folder_req(ROOT_FOLDER_ID, "a", Visibility::Private);
    req.viewers.insert(viewer.user_id);
    let a = store.create_folder(&owner, req).await.unwrap();

    assert_eq!(store.resolve_access(&owner, a.id).await.unwrap(), AccessLevel::Owner);
    assert_eq!(store.resolve_access(&viewer, a.id).await.unwrap(), AccessLevel::View);
    // The resolver reports the nominal level even for admins; the
    // bypass applies to authorization, not display.
    assert_eq!(store.resolve_access(&admin, a.id).await.unwrap(), AccessLevel::None);
}

#[tokio::test]
async fn test_document_roundtrip_and_view_access() {
    let store = DocStore::in_memory().await.unwrap();
    let owner = RequestContext::member(Uuid::new_v4());
    let stranger = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&owner, folder_req(ROOT_FOLDER_ID, "a", Visibility::Private))
        .await
        .unwrap();
    let doc = store
        .upload_document(&owner, upload_req(a.id, "x.txt", b"hello world"))
        .await
        .unwrap();
    assert_eq!(
        doc.checksum_sha256,
        "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
    );
    assert_eq!(doc.size_bytes, 11);

    let (fetched, bytes) = store.get_document(&owner, doc.id).await.unwrap();
    assert_eq!(fetched.id, doc.id);
    assert_eq!(&bytes[..], b"hello world");

    let err = store.get_document(&stranger, doc.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_move_document_checks_destination() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "a", Visibility::Public))
        .await
        .unwrap();
    let b = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "b", Visibility::Public))
        .await
        .unwrap();

    let doc = store
        .upload_document(&u1, upload_req(a.id, "x.txt", b"one"))
        .await
        .unwrap();
    store
        .upload_document(&u1, upload_req(b.id, "x.txt", b"two"))
        .await
        .unwrap();

    // Destination already has a document with this name.
    let err = store.move_document(&u1, doc.id, b.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let c = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "c", Visibility::Public))
        .await
        .unwrap();
    let moved = store.move_document(&u1, doc.id, c.id).await.unwrap();
    assert_eq!(moved.folder_id, c.id);
    assert_eq!(store.list_documents(&u1, a.id).await.unwrap().len(), 0);
    assert_eq!(store.list_documents(&u1, c.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_document_capability_union() {
    let store = DocStore::in_memory().await.unwrap();
    let owner = RequestContext::member(Uuid::new_v4());
    let uploader = RequestContext::member(Uuid::new_v4());
    let stranger = RequestContext::member(Uuid::new_v4());

    let mut req = folder_req(ROOT_FOLDER_ID, "a", Visibility::Public);
    req.editors.insert(uploader.user_id);
    let a = store.create_folder(&owner, req).await.unwrap();

    let doc = store
        .upload_document(&uploader, upload_req(a.id, "x.txt", b"bytes"))
        .await
        .unwrap();

    // View access alone cannot delete.
    let err = store.delete_document(&stranger, doc.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // The uploader always can.
    store.delete_document(&uploader, doc.id).await.unwrap();
    let err = store.get_document(&uploader, doc.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_rename_document_and_tags() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "a", Visibility::Public))
        .await
        .unwrap();
    let doc = store
        .upload_document(&u1, upload_req(a.id, "draft.txt", b"v1"))
        .await
        .unwrap();
    store
        .upload_document(&u1, upload_req(a.id, "final.txt", b"v2"))
        .await
        .unwrap();

    let err = store
        .rename_document(&u1, doc.id, "FINAL.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let renamed = store.rename_document(&u1, doc.id, "draft-v1.txt").await.unwrap();
    assert_eq!(renamed.name, "draft-v1.txt");
    assert_eq!(renamed.original_name, "draft.txt");

    let tags: BTreeSet<String> = ["draft", "2026"].iter().map(|s| s.to_string()).collect();
    let tagged = store.set_document_tags(&u1, doc.id, tags.clone()).await.unwrap();
    assert_eq!(tagged.tags, tags);
}

#[tokio::test]
async fn test_copy_folder_duplicates_subtree_for_new_owner() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());
    let u2 = RequestContext::member(Uuid::new_v4());

    let source = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "source", Visibility::Public))
        .await
        .unwrap();
    let inner = store
        .create_folder(&u1, folder_req(source.id, "inner", Visibility::Public))
        .await
        .unwrap();
    store
        .upload_document(&u1, upload_req(source.id, "top.txt", b"top bytes"))
        .await
        .unwrap();
    store
        .upload_document(&u1, upload_req(inner.id, "deep.txt", b"deep bytes"))
        .await
        .unwrap();

    let target = store
        .create_folder(&u2, folder_req(ROOT_FOLDER_ID, "target", Visibility::Private))
        .await
        .unwrap();

    let outcome = store
        .copy_folder(&u2, source.id, target.id, None)
        .await
        .unwrap();
    assert_eq!(outcome.folders_copied, 2);
    assert_eq!(outcome.documents_copied, 2);
    assert_eq!(outcome.documents_skipped, 0);
    assert_eq!(outcome.new_folder.owner_id(), u2.user_id);
    assert_eq!(outcome.new_folder.path, "/target/source");

    // The copies are independent records owned by the caller.
    let copied_docs = store
        .list_documents(&u2, outcome.new_folder.id)
        .await
        .unwrap();
    assert_eq!(copied_docs.len(), 1);
    assert_eq!(copied_docs[0].uploaded_by, u2.user_id);
    let (_, bytes) = store.get_document(&u2, copied_docs[0].id).await.unwrap();
    assert_eq!(&bytes[..], b"top bytes");

    // The source is untouched.
    assert_eq!(store.list_documents(&u1, source.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_copy_folder_skips_content_the_caller_owns() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    let source = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "source", Visibility::Public))
        .await
        .unwrap();
    store
        .upload_document(&u1, upload_req(source.id, "x.txt", b"mine already"))
        .await
        .unwrap();
    let target = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "target", Visibility::Public))
        .await
        .unwrap();

    // Copying one's own folder would re-upload content the caller
    // already stores; dedup skips it.
    let outcome = store
        .copy_folder(&u1, source.id, target.id, Some("copy".to_string()))
        .await
        .unwrap();
    assert_eq!(outcome.folders_copied, 1);
    assert_eq!(outcome.documents_copied, 0);
    assert_eq!(outcome.documents_skipped, 1);
    assert_eq!(outcome.new_folder.name, "copy");
}

#[tokio::test]
async fn test_copy_into_own_subtree_rejected() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "a", Visibility::Public))
        .await
        .unwrap();
    let b = store
        .create_folder(&u1, folder_req(a.id, "b", Visibility::Public))
        .await
        .unwrap();

    let err = store.copy_folder(&u1, a.id, b.id, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOperation);
}

#[tokio::test]
async fn test_upload_size_limit() {
    let mut config = AppConfig::default();
    config.limits.max_upload_size_bytes = 4;
    let store = DocStore::from_config(&config).await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());

    let a = store
        .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "a", Visibility::Public))
        .await
        .unwrap();

    let err = store
        .upload_document(&u1, upload_req(a.id, "big.bin", b"five!"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    store
        .upload_document(&u1, upload_req(a.id, "ok.bin", b"four"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_from_config_rejects_unknown_backends() {
    let mut config = AppConfig::default();
    config.records.backend = "postgres".to_string();
    let err = DocStore::from_config(&config).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);

    let mut config = AppConfig::default();
    config.blob.provider = "s3".to_string();
    let err = DocStore::from_config(&config).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
}

#[tokio::test]
async fn test_flatfile_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.records.backend = "flatfile".to_string();
    config.records.root_path = dir.path().join("records").to_string_lossy().into_owned();
    config.blob.provider = "local".to_string();
    config.blob.local.root_path = dir.path().join("blobs").to_string_lossy().into_owned();

    let u1 = RequestContext::member(Uuid::new_v4());
    let (folder_id, doc_id) = {
        let store = DocStore::from_config(&config).await.unwrap();
        let folder = store
            .create_folder(&u1, folder_req(ROOT_FOLDER_ID, "kept", Visibility::Public))
            .await
            .unwrap();
        let doc = store
            .upload_document(&u1, upload_req(folder.id, "x.txt", b"durable"))
            .await
            .unwrap();
        (folder.id, doc.id)
    };

    let store = DocStore::from_config(&config).await.unwrap();
    let children = store.list_children(&u1, ROOT_FOLDER_ID).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, folder_id);

    let (doc, bytes) = store.get_document(&u1, doc_id).await.unwrap();
    assert_eq!(doc.name, "x.txt");
    assert_eq!(&bytes[..], b"durable");
}

#[tokio::test]
async fn test_concurrent_uploads_same_name_one_wins() {
    let store = DocStore::in_memory().await.unwrap();
    let u1 = RequestContext::member(Uuid::new_v4());
    let u2 = RequestContext::member(Uuid::new_v4());

    let mut req = folder_req(ROOT_FOLDER_ID, "a", Visibility::Public);
    req.editors.insert(u2.user_id);
    let a = store.create_folder(&u1, req).await.unwrap();

    let s1 = store.clone();
    let s2 = store.clone();
    let id = a.id;
    let (r1, r2) = tokio::join!(
        async move { s1.upload_document(&u1, upload_req(id, "x.txt", b"first")).await },
        async move { s2.upload_document(&u2, upload_req(id, "X.TXT", b"second")).await },
    );

    assert_eq!(r1.is_ok() as u8 + r2.is_ok() as u8, 1);
    let loser = if r1.is_ok() { r2 } else { r1 };
    assert_eq!(loser.unwrap_err().kind, ErrorKind::Conflict);
}
