// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process object store with failure injection.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::object_store::{DEFAULT_CHUNK_SIZE, ObjectStore, validate_object_path};

/// Kind of failure to inject into a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    /// The backend refuses the write.
    PermissionDenied,
    /// The connection drops mid-transfer.
    Transport,
}

/// An object held by [`MemoryObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
struct FailurePlan {
    /// Writes whose path contains the fragment fail.
    writes: Vec<(String, InjectedFailure)>,
    urls: bool,
    deletes: bool,
}

/// Object store that keeps everything in memory.
///
/// Every chunk yields to the runtime so concurrent uploads interleave
/// the way network transfers do.
#[derive(Debug)]
pub struct MemoryObjectStore {
    base_url: String,
    chunk_size: usize,
    objects: Mutex<BTreeMap<String, StoredObject>>,
    failures: Mutex<FailurePlan>,
    deleted: Mutex<Vec<String>>,
    put_calls: AtomicUsize,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryObjectStore {
    /// Creates an empty store serving URLs under `memory://objects`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: String::from("memory://objects"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            objects: Mutex::new(BTreeMap::new()),
            failures: Mutex::new(FailurePlan::default()),
            deleted: Mutex::new(Vec::new()),
            put_calls: AtomicUsize::new(0),
        }
    }

    /// Sets the chunk size used to report progress.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Makes writes to any path containing `fragment` fail.
    pub async fn fail_writes_containing(&self, fragment: impl Into<String>, failure: InjectedFailure) {
        self.failures
            .lock()
            .await
            .writes
            .push((fragment.into(), failure));
    }

    /// Makes every `download_url` call fail.
    pub async fn fail_url_resolution(&self) {
        self.failures.lock().await.urls = true;
    }

    /// Makes every `delete` call fail.
    pub async fn fail_deletes(&self) {
        self.failures.lock().await.deletes = true;
    }

    /// Number of `put` calls, successful or not.
    #[must_use]
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Paths of every stored object, sorted.
    pub async fn stored_paths(&self) -> Vec<String> {
        self.objects.lock().await.keys().cloned().collect()
    }

    /// The object stored at `path`, if any.
    pub async fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.lock().await.get(path).cloned()
    }

    /// Paths passed to `delete`, in call order, including failed calls.
    pub async fn deleted_paths(&self) -> Vec<String> {
        self.deleted.lock().await.clone()
    }

    async fn injected_write_failure(&self, path: &str) -> Option<InjectedFailure> {
        self.failures
            .lock()
            .await
            .writes
            .iter()
            .find(|(fragment, _)| path.contains(fragment.as_str()))
            .map(|(_, failure)| *failure)
    }
}

impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        path: &str,
        content_type: &str,
        data: &[u8],
        progress: &mut (dyn FnMut(u64, u64) + Send),
    ) -> Result<(), StorageError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        validate_object_path(path)?;
        let failure: Option<InjectedFailure> = self.injected_write_failure(path).await;

        let total: u64 = data.len() as u64;
        let chunks: Vec<&[u8]> = data.chunks(self.chunk_size).collect();
        // A dropped transfer fails on the second chunk, or the only one.
        let drop_at: usize = chunks.len().saturating_sub(1).min(1);
        let mut written: u64 = 0;

        if chunks.is_empty() {
            tokio::task::yield_now().await;
            if failure.is_none() {
                progress(0, 0);
            }
        }
        for (index, chunk) in chunks.into_iter().enumerate() {
            tokio::task::yield_now().await;
            match failure {
                Some(InjectedFailure::PermissionDenied) => {
                    warn!(path, "Memory object store denying write");
                    return Err(StorageError::PermissionDenied {
                        path: path.to_string(),
                    });
                }
                Some(InjectedFailure::Transport) if index == drop_at => {
                    warn!(path, written, "Memory object store dropping transfer");
                    return Err(StorageError::Transport {
                        path: path.to_string(),
                        reason: String::from("connection reset"),
                    });
                }
                Some(InjectedFailure::Transport) | None => {}
            }
            written += chunk.len() as u64;
            progress(written, total);
        }

        if let Some(injected) = failure {
            return Err(match injected {
                InjectedFailure::PermissionDenied => StorageError::PermissionDenied {
                    path: path.to_string(),
                },
                InjectedFailure::Transport => StorageError::Transport {
                    path: path.to_string(),
                    reason: String::from("connection reset"),
                },
            });
        }

        self.objects.lock().await.insert(
            path.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                data: data.to_vec(),
            },
        );
        debug!(path, bytes = total, "Memory object stored");
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String, StorageError> {
        let fail_urls: bool = self.failures.lock().await.urls;
        if fail_urls {
            return Err(StorageError::Transport {
                path: path.to_string(),
                reason: String::from("download URL could not be resolved"),
            });
        }
        let exists: bool = self.objects.lock().await.contains_key(path);
        if !exists {
            return Err(StorageError::NotFound {
                path: path.to_string(),
            });
        }
        Ok(format!("{}/{path}", self.base_url))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.deleted.lock().await.push(path.to_string());
        let fail_deletes: bool = self.failures.lock().await.deletes;
        if fail_deletes {
            return Err(StorageError::Transport {
                path: path.to_string(),
                reason: String::from("delete rejected"),
            });
        }
        let removed: Option<StoredObject> = self.objects.lock().await.remove(path);
        if removed.is_none() {
            return Err(StorageError::NotFound {
                path: path.to_string(),
            });
        }
        debug!(path, "Memory object deleted");
        Ok(())
    }
}
