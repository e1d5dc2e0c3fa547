// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::object_store::{DEFAULT_CHUNK_SIZE, ObjectStore, validate_object_path};

/// Object store backed by a directory on the local filesystem.
///
/// Objects live at `{root}/{path}` and are served publicly under
/// `{public_base_url}/{path}`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let public_base_url: String = public_base_url.into().trim_end_matches('/').to_string();
        let root: PathBuf = root.into();
        info!(root = %root.display(), %public_base_url, "Local object store initialized");
        Self {
            root,
            public_base_url,
        }
    }

    /// The directory objects are written under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        validate_object_path(path)?;
        Ok(self.root.join(path))
    }
}

impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        path: &str,
        content_type: &str,
        data: &[u8],
        progress: &mut (dyn FnMut(u64, u64) + Send),
    ) -> Result<(), StorageError> {
        let target: PathBuf = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::from_io(path, &e))?;
        }

        let mut file: fs::File = fs::File::create(&target)
            .await
            .map_err(|e| StorageError::from_io(path, &e))?;

        let total: u64 = data.len() as u64;
        let mut written: u64 = 0;
        if data.is_empty() {
            progress(0, 0);
        }
        for chunk in data.chunks(DEFAULT_CHUNK_SIZE) {
            file.write_all(chunk)
                .await
                .map_err(|e| StorageError::from_io(path, &e))?;
            written += chunk.len() as u64;
            progress(written, total);
        }
        file.sync_all()
            .await
            .map_err(|e| StorageError::from_io(path, &e))?;

        debug!(path, content_type, bytes = total, "Object written");
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String, StorageError> {
        let target: PathBuf = self.resolve(path)?;
        let exists: bool = fs::try_exists(&target)
            .await
            .map_err(|e| StorageError::from_io(path, &e))?;
        if !exists {
            return Err(StorageError::NotFound {
                path: path.to_string(),
            });
        }
        Ok(format!("{}/{path}", self.public_base_url))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let target: PathBuf = self.resolve(path)?;
        fs::remove_file(&target)
            .await
            .map_err(|e| StorageError::from_io(path, &e))?;
        debug!(path, "Object deleted");
        Ok(())
    }
}
