// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::create_test_file;
use crate::{LocalObjectStore, ObjectStore, StorageError, delete_file, upload_file};

fn create_local_store(dir: &tempfile::TempDir) -> LocalObjectStore {
    LocalObjectStore::new(dir.path(), "http://localhost:3000/files/")
}

#[tokio::test]
async fn test_put_writes_object_under_root() {
    let dir = tempfile::tempdir().unwrap();
    let store = create_local_store(&dir);
    let mut calls: Vec<(u64, u64)> = Vec::new();

    store
        .put("sub-1/poster/1_a.png", "image/png", b"png-bytes", &mut |sent, total| {
            calls.push((sent, total));
        })
        .await
        .unwrap();

    let written = std::fs::read(dir.path().join("sub-1/poster/1_a.png")).unwrap();
    assert_eq!(written, b"png-bytes");
    assert_eq!(calls, vec![(9, 9)]);
}

#[tokio::test]
async fn test_download_url_uses_public_base_without_double_slash() {
    let dir = tempfile::tempdir().unwrap();
    let store = create_local_store(&dir);
    store
        .put("sub-1/proof/1_p.pdf", "application/pdf", b"%PDF", &mut |_, _| {})
        .await
        .unwrap();

    let url: String = store.download_url("sub-1/proof/1_p.pdf").await.unwrap();
    assert_eq!(url, "http://localhost:3000/files/sub-1/proof/1_p.pdf");
}

#[tokio::test]
async fn test_download_url_of_missing_object_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = create_local_store(&dir);
    let err = store.download_url("sub-1/film/1_x.mp4").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn test_traversal_paths_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = create_local_store(&dir);
    let err = store
        .put("../escape.txt", "text/plain", b"x", &mut |_, _| {})
        .await
        .unwrap_err();
    assert_eq!(err, StorageError::InvalidPath(String::from("../escape.txt")));
}

#[tokio::test]
async fn test_upload_and_delete_through_local_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = create_local_store(&dir);
    let file = create_test_file("poster.png", "image/png", 600 * 1024);
    let path = "sub-2/poster/5_poster.png";

    let mut percents: Vec<f64> = Vec::new();
    let metadata = upload_file(&store, &file, path, &mut |p| percents.push(p))
        .await
        .unwrap();

    assert_eq!(metadata.file_size, 600 * 1024);
    assert_eq!(metadata.storage_path, path);
    assert_eq!(percents.last().copied(), Some(100.0));
    assert!(percents.len() >= 3);

    delete_file(&store, path).await;
    assert!(!dir.path().join(path).exists());
}
