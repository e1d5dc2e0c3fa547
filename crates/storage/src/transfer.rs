// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Single-file upload and delete.
//!
//! Uploads never retry. Deletes are always a cleanup side effect of some
//! other operation, so their failures are logged and swallowed.

use filmfest_domain::{FileMetadata, LocalFile};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::object_store::ObjectStore;

/// Why an upload failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorCode {
    /// The backend refused the write or the URL lookup.
    PermissionDenied,
    /// The transfer itself failed.
    Transport,
    /// The object landed but its download URL could not be resolved.
    UrlResolution,
}

impl UploadErrorCode {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission-denied",
            Self::Transport => "transport",
            Self::UrlResolution => "url-resolution",
        }
    }
}

impl std::fmt::Display for UploadErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failed single-file upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to upload {file_name} ({code}): {source}")]
pub struct UploadError {
    pub code: UploadErrorCode,
    pub file_name: String,
    pub source: StorageError,
}

/// Converts transferred bytes to a percentage in `0.0..=100.0`.
///
/// An empty object counts as fully transferred.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn transfer_percent(transferred: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (transferred as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Uploads `file` to `path` and returns its metadata.
///
/// `on_progress` receives the percentage transferred after every chunk.
/// The reported values never decrease and the last call is exactly 100.
///
/// # Arguments
///
/// * `store` - The object store to write to
/// * `file` - The local file to upload
/// * `path` - Storage path, see `filmfest_domain::generate_file_path`
/// * `on_progress` - Per-chunk progress callback
///
/// # Errors
///
/// Returns an `UploadError` whose code distinguishes a refused write, a
/// failed transfer and a failed URL lookup.
pub async fn upload_file<S: ObjectStore>(
    store: &S,
    file: &LocalFile,
    path: &str,
    on_progress: &mut (dyn FnMut(f64) + Send),
) -> Result<FileMetadata, UploadError> {
    debug!(path, file_name = %file.file_name, bytes = file.size(), "Starting upload");

    let mut reported: f64 = 0.0;
    let mut report = |transferred: u64, total: u64| {
        let percent: f64 = transfer_percent(transferred, total);
        if percent > reported {
            reported = percent;
            on_progress(percent);
        }
    };

    store
        .put(path, &file.content_type, &file.data, &mut report)
        .await
        .map_err(|source| {
            let code: UploadErrorCode = if source.is_permission_denied() {
                UploadErrorCode::PermissionDenied
            } else {
                UploadErrorCode::Transport
            };
            warn!(path, file_name = %file.file_name, %code, error = %source, "Upload failed");
            UploadError {
                code,
                file_name: file.file_name.clone(),
                source,
            }
        })?;

    // Ensures the final report is exactly 100 even when the backend
    // reported nothing for an empty object.
    if reported < 100.0 {
        on_progress(100.0);
    }

    let download_url: String = store.download_url(path).await.map_err(|source| {
        let code: UploadErrorCode = if source.is_permission_denied() {
            UploadErrorCode::PermissionDenied
        } else {
            UploadErrorCode::UrlResolution
        };
        warn!(path, file_name = %file.file_name, %code, error = %source, "Download URL resolution failed");
        UploadError {
            code,
            file_name: file.file_name.clone(),
            source,
        }
    })?;

    info!(path, file_name = %file.file_name, bytes = file.size(), "Upload complete");

    Ok(FileMetadata {
        file_name: file.file_name.clone(),
        file_size: file.size(),
        file_type: file.content_type.clone(),
        storage_path: path.to_string(),
        download_url,
        uploaded_at: OffsetDateTime::now_utc(),
    })
}

/// Removes the object at `path`, logging and swallowing any failure.
pub async fn delete_file<S: ObjectStore>(store: &S, path: &str) {
    match store.delete(path).await {
        Ok(()) => debug!(path, "Deleted file"),
        Err(e) => warn!(path, error = %e, "Failed to delete file; continuing"),
    }
}
