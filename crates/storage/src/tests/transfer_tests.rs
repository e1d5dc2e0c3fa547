// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_chunked_store, create_test_file};
use crate::{
    InjectedFailure, MemoryObjectStore, UploadErrorCode, delete_file, transfer_percent,
    upload_file,
};

#[test]
fn test_transfer_percent() {
    assert!((transfer_percent(0, 10) - 0.0).abs() < f64::EPSILON);
    assert!((transfer_percent(5, 10) - 50.0).abs() < f64::EPSILON);
    assert!((transfer_percent(10, 10) - 100.0).abs() < f64::EPSILON);
    assert!((transfer_percent(0, 0) - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_upload_returns_metadata() {
    let store = create_chunked_store();
    let file = create_test_file("My Film (final).mp4", "video/mp4", 5000);
    let path = "sub/film/42_My_Film__final_.mp4";

    let metadata = upload_file(&store, &file, path, &mut |_| {}).await.unwrap();

    assert_eq!(metadata.file_name, "My Film (final).mp4");
    assert_eq!(metadata.file_size, 5000);
    assert_eq!(metadata.file_type, "video/mp4");
    assert_eq!(metadata.storage_path, path);
    assert_eq!(metadata.download_url, format!("memory://objects/{path}"));
    assert!(store.object(path).await.is_some());
}

#[tokio::test]
async fn test_upload_progress_is_non_decreasing_and_ends_at_100() {
    let store = create_chunked_store();
    let file = create_test_file("poster.png", "image/png", 10 * 1024 + 7);

    let mut percents: Vec<f64> = Vec::new();
    upload_file(&store, &file, "s/poster/1_poster.png", &mut |p| percents.push(p))
        .await
        .unwrap();

    assert_eq!(percents.len(), 11);
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(percents.last().copied(), Some(100.0));
    assert_eq!(percents.iter().filter(|p| **p >= 100.0).count(), 1);
}

#[tokio::test]
async fn test_empty_file_still_reports_100() {
    let store = MemoryObjectStore::new();
    let file = create_test_file("empty.pdf", "application/pdf", 0);

    let mut percents: Vec<f64> = Vec::new();
    upload_file(&store, &file, "s/proof/1_empty.pdf", &mut |p| percents.push(p))
        .await
        .unwrap();

    assert_eq!(percents, vec![100.0]);
}

#[tokio::test]
async fn test_permission_denied_upload_code() {
    let store = create_chunked_store();
    store
        .fail_writes_containing("film", InjectedFailure::PermissionDenied)
        .await;
    let file = create_test_file("film.mp4", "video/mp4", 2048);

    let err = upload_file(&store, &file, "s/film/1_film.mp4", &mut |_| {})
        .await
        .unwrap_err();

    assert_eq!(err.code, UploadErrorCode::PermissionDenied);
    assert_eq!(err.code.as_str(), "permission-denied");
    assert_eq!(err.file_name, "film.mp4");
}

#[tokio::test]
async fn test_transport_upload_code() {
    let store = create_chunked_store();
    store
        .fail_writes_containing("poster", InjectedFailure::Transport)
        .await;
    let file = create_test_file("poster.png", "image/png", 4096);

    let err = upload_file(&store, &file, "s/poster/1_poster.png", &mut |_| {})
        .await
        .unwrap_err();

    assert_eq!(err.code, UploadErrorCode::Transport);
}

#[tokio::test]
async fn test_url_resolution_failure_code() {
    let store = create_chunked_store();
    store.fail_url_resolution().await;
    let file = create_test_file("proof.pdf", "application/pdf", 100);

    let err = upload_file(&store, &file, "s/proof/1_proof.pdf", &mut |_| {})
        .await
        .unwrap_err();

    assert_eq!(err.code, UploadErrorCode::UrlResolution);
    assert_eq!(err.code.as_str(), "url-resolution");
}

#[tokio::test]
async fn test_delete_file_swallows_failures() {
    let store = MemoryObjectStore::new();
    store.fail_deletes().await;

    delete_file(&store, "s/film/missing.mp4").await;

    assert_eq!(store.deleted_paths().await, vec![String::from("s/film/missing.mp4")]);
}
