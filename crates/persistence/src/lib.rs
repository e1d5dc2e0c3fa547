// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the film festival submission service.
//!
//! This crate provides the schema-less document store that holds
//! applications, and the identity tables (accounts, sessions, email
//! verification tokens). It is built on Diesel with `SQLite`.
//!
//! ## Document Store
//!
//! Documents are JSON field bags stored per collection. The
//! [`DocumentStore`] trait is the async contract the pipeline consumes;
//! [`SqliteDocumentStore`] implements it over [`Persistence`], and
//! [`MemoryDocumentStore`] is an in-process store with write rejection
//! for exercising failure paths.
//!
//! ## Testing
//!
//! In-memory databases are named from an atomic counter so every test
//! gets its own isolated shared-cache database.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod document;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use data_models::{AccountData, SessionData};
pub use document::{
    Document, DocumentStore, FieldValue, Fields, Patch, SUBMISSIONS_COLLECTION, apply_patch,
    generate_document_id, get_path,
};
pub use error::PersistenceError;
pub use store::{MemoryDocumentStore, SqliteDocumentStore};

use queries::DocumentRow;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `SQLite` persistence adapter.
///
/// All methods are synchronous; async callers share one adapter behind a
/// `tokio::sync::Mutex`.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Creates a document from `patch` and returns its new id.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection name
    /// * `patch` - The initial field writes
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is invalid or the insert fails.
    pub fn create_document(
        &mut self,
        collection: &str,
        patch: &Patch,
    ) -> Result<String, PersistenceError> {
        let mut fields: Fields = Fields::new();
        apply_patch(&mut fields, patch, OffsetDateTime::now_utc())?;
        let fields_json: String = serde_json::to_string(&fields)?;

        let document_id: String = generate_document_id();
        mutations::insert_document(&mut self.conn, collection, &document_id, &fields_json)?;

        info!(collection, document_id, "Document created");
        Ok(document_id)
    }

    /// Retrieves a document by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored fields are not a
    /// JSON object.
    pub fn get_document(
        &mut self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<Document>, PersistenceError> {
        queries::get_document(&mut self.conn, collection, document_id)?
            .map(Self::document_from_row)
            .transpose()
    }

    /// Merges `patch` into an existing document.
    ///
    /// The read and the write run in one immediate transaction, so a
    /// single update is atomic.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DocumentNotFound` if the document does
    /// not exist, or another error if the patch cannot be applied.
    pub fn update_document(
        &mut self,
        collection: &str,
        document_id: &str,
        patch: &Patch,
    ) -> Result<(), PersistenceError> {
        self.conn
            .immediate_transaction::<(), PersistenceError, _>(|conn| {
                let row: DocumentRow = queries::get_document(conn, collection, document_id)?
                    .ok_or_else(|| PersistenceError::DocumentNotFound(document_id.to_string()))?;
                let mut fields: Fields = serde_json::from_str(&row.fields)?;
                apply_patch(&mut fields, patch, OffsetDateTime::now_utc())?;
                let fields_json: String = serde_json::to_string(&fields)?;
                mutations::replace_document_fields(conn, collection, document_id, &fields_json)
            })?;

        info!(collection, document_id, "Document updated");
        Ok(())
    }

    /// Lists every document in a collection in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or stored fields are malformed.
    pub fn list_documents(&mut self, collection: &str) -> Result<Vec<Document>, PersistenceError> {
        queries::list_documents(&mut self.conn, collection)?
            .into_iter()
            .map(Self::document_from_row)
            .collect()
    }

    fn document_from_row(row: DocumentRow) -> Result<Document, PersistenceError> {
        let fields: Fields = serde_json::from_str(&row.fields)?;
        Ok(Document {
            id: row.document_id,
            fields,
        })
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Creates a new account and returns its row id.
    ///
    /// # Arguments
    ///
    /// * `uid` - The public account identifier
    /// * `email` - The email address
    /// * `password` - The plain-text password (will be hashed)
    /// * `role` - The role (`Applicant` or `Admin`)
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateAccount` if the email is taken.
    pub fn create_account(
        &mut self,
        uid: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::create_account(&mut self.conn, uid, email, password, role)
    }

    /// Retrieves an account by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::get_account_by_email(&mut self.conn, email)
    }

    /// Retrieves an account by row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account_by_id(
        &mut self,
        account_id: i64,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::get_account_by_id(&mut self.conn, account_id)
    }

    /// Retrieves an account by public uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account_by_uid(&mut self, uid: &str) -> Result<Option<AccountData>, PersistenceError> {
        queries::get_account_by_uid(&mut self.conn, uid)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash cannot be parsed.
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
        queries::verify_password(password, password_hash)
    }

    /// Records a successful sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_sign_in(&mut self, account_id: i64) -> Result<(), PersistenceError> {
        mutations::update_last_sign_in(&mut self.conn, account_id)
    }

    /// Marks an account's email as verified.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the update fails.
    pub fn mark_email_verified(&mut self, account_id: i64) -> Result<(), PersistenceError> {
        mutations::mark_email_verified(&mut self.conn, account_id)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        account_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::create_session(&mut self.conn, session_token, account_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates a session's last activity timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session. Returns whether a session existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<bool, PersistenceError> {
        mutations::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all sessions whose expiry is in the past.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        let now: String = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))?;
        mutations::delete_expired_sessions(&mut self.conn, &now)
    }

    /// Deletes all sessions of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_sessions_for_account(&mut self, account_id: i64) -> Result<usize, PersistenceError> {
        mutations::delete_sessions_for_account(&mut self.conn, account_id)
    }

    // ========================================================================
    // Email verification
    // ========================================================================

    /// Stores a one-time verification token for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_verification_token(
        &mut self,
        token: &str,
        account_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::create_verification_token(&mut self.conn, token, account_id)
    }

    /// Consumes a verification token, returning the owning account id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or update fails.
    pub fn consume_verification_token(
        &mut self,
        token: &str,
    ) -> Result<Option<i64>, PersistenceError> {
        mutations::consume_verification_token(&mut self.conn, token)
    }
}
