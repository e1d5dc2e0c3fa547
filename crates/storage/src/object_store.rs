// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Object store contract.
//!
//! Objects are addressed by caller-chosen paths such as
//! `{submission_id}/poster/{millis}_{name}`. The store never picks a
//! path itself.

use std::future::Future;

use crate::error::StorageError;

/// Bytes written per chunk when streaming an object.
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Storage backend for uploaded files.
pub trait ObjectStore: Send + Sync {
    /// Writes `data` at `path`, replacing any existing object.
    ///
    /// `progress` is called after every chunk with the bytes written so
    /// far and the total byte count.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::PermissionDenied` when the backend refuses
    /// the write and `StorageError::Transport` for any other failure.
    fn put(
        &self,
        path: &str,
        content_type: &str,
        data: &[u8],
        progress: &mut (dyn FnMut(u64, u64) + Send),
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Resolves a durable public URL for the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when no object is stored there.
    fn download_url(&self, path: &str) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Removes the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when no object is stored there.
    fn delete(&self, path: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Checks that `path` is a relative key made of non-empty segments.
///
/// # Errors
///
/// Returns `StorageError::InvalidPath` for absolute paths, empty or
/// dot segments, and backslashes.
pub fn validate_object_path(path: &str) -> Result<(), StorageError> {
    let valid: bool = !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidPath(path.to_string()))
    }
}
