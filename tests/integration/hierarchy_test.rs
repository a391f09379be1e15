//! Hierarchy Manager integration tests over both blob store variants.

mod helpers;

use avenue_core::error::ErrorKind;
use avenue_core::types::{FolderId, FolderRef};

use helpers::{TestApp, payload, read_all};

#[tokio::test]
async fn test_upload_then_download_round_trips() {
    for (store, app) in TestApp::all().await {
        let ctx = app.user("alice@example.com").await;
        let bytes = payload(10 * 1024);

        let file = app
            .upload(&ctx, "report", "pdf", None, &bytes)
            .await
            .expect("Upload failed");
        assert_eq!(file.size_bytes, 10240, "{store}");
        assert_eq!(file.file_name(), "report.pdf");
        assert!(file.parent().is_root());

        let download = app.hierarchy.download(&ctx, file.id).await.expect("Download failed");
        assert_eq!(download.file.id, file.id);
        assert_eq!(read_all(download).await, bytes, "{store}");

        let files = app.hierarchy.list_files(&ctx).await.expect("List failed");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].size_bytes, 10240);
    }
}

#[tokio::test]
async fn test_empty_and_chunk_aligned_uploads() {
    for (store, app) in TestApp::all().await {
        let ctx = app.user("bob@example.com").await;

        for len in [0, helpers::CHUNK, helpers::CHUNK * 3 + 1] {
            let bytes = payload(len);
            let file = app
                .upload(&ctx, "blob", "bin", None, &bytes)
                .await
                .expect("Upload failed");
            assert_eq!(file.size_bytes, len as i64, "{store}");

            let download = app.hierarchy.download(&ctx, file.id).await.expect("Download failed");
            assert_eq!(read_all(download).await.len(), len, "{store}");
        }
    }
}

#[tokio::test]
async fn test_every_listed_file_has_readable_bytes() {
    for (store, app) in TestApp::all().await {
        let ctx = app.user("carol@example.com").await;
        let folder = app
            .hierarchy
            .create_folder(&ctx, "Docs", None)
            .await
            .expect("Create folder failed");
        let parent = folder.id.to_string();

        for i in 0..5 {
            let parent = (i % 2 == 0).then_some(parent.as_str());
            app.upload(&ctx, &format!("f{i}"), "txt", parent, &payload(100 * i))
                .await
                .expect("Upload failed");
        }

        let files = app.hierarchy.list_files(&ctx).await.expect("List failed");
        assert_eq!(files.len(), 5);
        for file in &files {
            assert!(app.blob_readable(file).await, "{store}: {} has no bytes", file.id);
        }
    }
}

#[tokio::test]
async fn test_delete_removes_row_and_bytes() {
    for (store, app) in TestApp::all().await {
        let ctx = app.user("dave@example.com").await;
        let file = app
            .upload(&ctx, "notes", "md", None, b"# notes")
            .await
            .expect("Upload failed");

        app.hierarchy.delete(&ctx, file.id).await.expect("Delete failed");

        let err = app.hierarchy.download(&ctx, file.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound, "{store}");
        assert!(!app.blob_readable(&file).await, "{store}");
    }
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    for (store, app) in TestApp::all().await {
        let ctx = app.user("erin@example.com").await;
        let file = app
            .upload(&ctx, "once", "txt", None, b"x")
            .await
            .expect("Upload failed");

        assert!(app.hierarchy.delete(&ctx, file.id).await.is_ok());
        let err = app.hierarchy.delete(&ctx, file.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound, "{store}");
    }
}

#[tokio::test]
async fn test_folder_tree_and_invalid_parent() {
    let app = TestApp::memory();
    let ctx = app.user("frank@example.com").await;

    let docs = app
        .hierarchy
        .create_folder(&ctx, "Docs", None)
        .await
        .expect("Create failed");
    assert!(docs.is_top_level());

    let year = app
        .hierarchy
        .create_folder(&ctx, "2024", Some(&docs.id.to_string()))
        .await
        .expect("Create nested failed");
    assert_eq!(year.parent(), FolderRef::Folder(docs.id));

    let err = app
        .hierarchy
        .create_folder(&ctx, "X", Some("nonexistent"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidParent);

    let missing = FolderId::generate().to_string();
    let err = app
        .hierarchy
        .create_folder(&ctx, "Y", Some(&missing))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidParent);

    let top = app
        .hierarchy
        .list_children(&ctx, FolderRef::Root)
        .await
        .expect("List failed");
    assert_eq!(top.folders.len(), 1, "rejected folders must not create rows");
    assert_eq!(top.folders[0].id, docs.id);
}

#[tokio::test]
async fn test_list_children_is_not_recursive() {
    for (store, app) in TestApp::all().await {
        let ctx = app.user("grace@example.com").await;
        let docs = app
            .hierarchy
            .create_folder(&ctx, "Docs", None)
            .await
            .expect("Create failed");
        let docs_id = docs.id.to_string();

        let file = app
            .upload(&ctx, "plan", "txt", Some(&docs_id), b"plan")
            .await
            .expect("Upload failed");

        let contents = app
            .hierarchy
            .list_children(&ctx, FolderRef::Folder(docs.id))
            .await
            .expect("List failed");
        assert!(contents.folders.is_empty(), "{store}");
        assert_eq!(contents.files.len(), 1);
        assert_eq!(contents.files[0].id, file.id);

        app.hierarchy
            .create_folder(&ctx, "Sub", Some(&docs_id))
            .await
            .expect("Create nested failed");

        let top = app
            .hierarchy
            .list_children(&ctx, FolderRef::Root)
            .await
            .expect("List failed");
        assert_eq!(top.folders.len(), 1);
        assert!(top.files.is_empty(), "{store}");
    }
}

#[tokio::test]
async fn test_delete_folder_requires_empty() {
    let app = TestApp::memory();
    let ctx = app.user("heidi@example.com").await;
    let docs = app
        .hierarchy
        .create_folder(&ctx, "Docs", None)
        .await
        .expect("Create failed");
    let file = app
        .upload(&ctx, "a", "txt", Some(&docs.id.to_string()), b"a")
        .await
        .expect("Upload failed");

    let err = app.hierarchy.delete_folder(&ctx, docs.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    app.hierarchy.delete(&ctx, file.id).await.expect("Delete failed");
    app.hierarchy
        .delete_folder(&ctx, docs.id)
        .await
        .expect("Delete folder failed");

    let err = app
        .hierarchy
        .list_children(&ctx, FolderRef::Folder(docs.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_storage_full_rolls_back_upload() {
    let app = TestApp::memory_with_capacity(8 * 1024);
    let ctx = app.user("ivan@example.com").await;

    let err = app
        .upload(&ctx, "huge", "iso", None, &payload(64 * 1024))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BlobWrite);

    let files = app.hierarchy.list_files(&ctx).await.expect("List failed");
    assert!(files.is_empty(), "compensating delete must remove the row");

    // Capacity is released, so a small upload still fits.
    let file = app
        .upload(&ctx, "small", "txt", None, &payload(1024))
        .await
        .expect("Upload failed");
    let download = app.hierarchy.download(&ctx, file.id).await.expect("Download failed");
    assert_eq!(read_all(download).await.len(), 1024);
}

#[tokio::test]
async fn test_upload_with_missing_parent_writes_nothing() {
    for (store, app) in TestApp::all().await {
        let ctx = app.user("judy@example.com").await;
        let missing = FolderId::generate().to_string();

        let err = app
            .upload(&ctx, "orphan", "txt", Some(&missing), b"orphan")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::CatalogWrite, "{store}");

        let files = app.hierarchy.list_files(&ctx).await.expect("List failed");
        assert!(files.is_empty(), "{store}");
    }
}

#[tokio::test]
async fn test_users_cannot_see_each_other() {
    for (store, app) in TestApp::all().await {
        let alice = app.user("alice@example.com").await;
        let mallory = app.user("mallory@example.com").await;

        let file = app
            .upload(&alice, "secret", "txt", None, b"secret")
            .await
            .expect("Upload failed");
        let folder = app
            .hierarchy
            .create_folder(&alice, "Private", None)
            .await
            .expect("Create failed");

        let err = app.hierarchy.download(&mallory, file.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound, "{store}");
        let err = app.hierarchy.delete(&mallory, file.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound, "{store}");
        assert!(app.blob_readable(&file).await, "{store}");

        let err = app
            .hierarchy
            .create_folder(&mallory, "Inside", Some(&folder.id.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParent);

        assert!(app.hierarchy.list_files(&mallory).await.expect("List failed").is_empty());
        let top = app
            .hierarchy
            .list_children(&mallory, FolderRef::Root)
            .await
            .expect("List failed");
        assert!(top.is_empty(), "{store}");
    }
}

#[tokio::test]
async fn test_foreign_folder_delete_is_not_found() {
    let app = TestApp::memory();
    let alice = app.user("alice@example.com").await;
    let mallory = app.user("mallory@example.com").await;

    let docs = app
        .hierarchy
        .create_folder(&alice, "Docs", None)
        .await
        .expect("Create failed");
    app.hierarchy
        .create_folder(&alice, "Sub", Some(&docs.id.to_string()))
        .await
        .expect("Create nested failed");

    let err = app.hierarchy.delete_folder(&mallory, docs.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let contents = app
        .hierarchy
        .list_children(&alice, FolderRef::Folder(docs.id))
        .await
        .expect("List failed");
    assert_eq!(contents.folders.len(), 1);
}

#[tokio::test]
async fn test_concurrent_uploads_get_distinct_ids() {
    let app = TestApp::local().await;
    let ctx = app.user("ken@example.com").await;

    let uploads = (0..16).map(|i| {
        let bytes = payload(512 + i);
        let ctx = &ctx;
        let app = &app;
        async move { app.upload(ctx, &format!("c{i}"), "bin", None, &bytes).await }
    });
    let files: Vec<_> = futures::future::join_all(uploads)
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .expect("Concurrent upload failed");

    let mut ids: Vec<_> = files.iter().map(|f| f.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);

    for file in &files {
        let download = app.hierarchy.download(&ctx, file.id).await.expect("Download failed");
        assert_eq!(read_all(download).await.len() as i64, file.size_bytes);
    }
}
