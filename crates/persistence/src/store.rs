// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! [`DocumentStore`] implementations.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::Persistence;
use crate::document::{
    Document, DocumentStore, Fields, Patch, SUBMISSIONS_COLLECTION, apply_patch,
    generate_document_id,
};
use crate::error::PersistenceError;

/// Document store over the shared `SQLite` adapter.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    persistence: Arc<Mutex<Persistence>>,
    collection: String,
}

impl SqliteDocumentStore {
    /// Creates a store over `collection`.
    #[must_use]
    pub fn new(persistence: Arc<Mutex<Persistence>>, collection: impl Into<String>) -> Self {
        Self {
            persistence,
            collection: collection.into(),
        }
    }

    /// Creates a store over the `submissions` collection.
    #[must_use]
    pub fn submissions(persistence: Arc<Mutex<Persistence>>) -> Self {
        Self::new(persistence, SUBMISSIONS_COLLECTION)
    }
}

impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, id: &str) -> Result<Option<Document>, PersistenceError> {
        let mut persistence = self.persistence.lock().await;
        persistence.get_document(&self.collection, id)
    }

    async fn create(&self, patch: Patch) -> Result<String, PersistenceError> {
        let mut persistence = self.persistence.lock().await;
        persistence.create_document(&self.collection, &patch)
    }

    async fn update(&self, id: &str, patch: Patch) -> Result<(), PersistenceError> {
        let mut persistence = self.persistence.lock().await;
        persistence.update_document(&self.collection, id, &patch)
    }

    async fn list(&self) -> Result<Vec<Document>, PersistenceError> {
        let mut persistence = self.persistence.lock().await;
        persistence.list_documents(&self.collection)
    }
}

/// In-process document store.
///
/// Writes can be made to fail with a backend-style message to exercise
/// the caller's failure handling. Reads always succeed.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<Vec<Document>>,
    reject_writes: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `create` and `update` fail with `message`.
    pub async fn reject_writes_with(&self, message: impl Into<String>) {
        *self.reject_writes.lock().await = Some(message.into());
    }

    /// Lets writes succeed again.
    pub async fn accept_writes(&self) {
        *self.reject_writes.lock().await = None;
    }

    /// Number of successful `create` and `update` calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Inserts raw fields without going through a patch. Returns the id.
    ///
    /// Used to seed documents in shapes the service itself never writes.
    pub async fn insert_raw(&self, fields: Fields) -> String {
        let id: String = generate_document_id();
        self.documents.lock().await.push(Document {
            id: id.clone(),
            fields,
        });
        id
    }

    async fn check_writable(&self) -> Result<(), PersistenceError> {
        let rejection: Option<String> = self.reject_writes.lock().await.clone();
        match rejection {
            Some(reason) => {
                warn!(%reason, "Memory document store rejecting write");
                Err(PersistenceError::Rejected(reason))
            }
            None => Ok(()),
        }
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, id: &str) -> Result<Option<Document>, PersistenceError> {
        Ok(self
            .documents
            .lock()
            .await
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn create(&self, patch: Patch) -> Result<String, PersistenceError> {
        self.check_writable().await?;

        let mut fields: Fields = Fields::new();
        apply_patch(&mut fields, &patch, OffsetDateTime::now_utc())?;
        let id: String = generate_document_id();

        self.documents.lock().await.push(Document {
            id: id.clone(),
            fields,
        });
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(document_id = %id, "Memory document created");
        Ok(id)
    }

    async fn update(&self, id: &str, patch: Patch) -> Result<(), PersistenceError> {
        self.check_writable().await?;

        let mut documents = self.documents.lock().await;
        let document: &mut Document = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| PersistenceError::DocumentNotFound(id.to_string()))?;

        let mut fields: Fields = document.fields.clone();
        apply_patch(&mut fields, &patch, OffsetDateTime::now_utc())?;
        document.fields = fields;
        drop(documents);

        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(document_id = id, "Memory document updated");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Document>, PersistenceError> {
        Ok(self.documents.lock().await.clone())
    }
}
