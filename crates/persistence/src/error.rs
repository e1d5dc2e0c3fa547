// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors raised by the document and identity stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    // Setup
    /// The database could not be opened.
    DatabaseConnectionFailed(String),
    /// Embedded migrations failed to apply.
    MigrationFailed(String),
    /// The database path or URL is unusable.
    InitializationError(String),
    /// `SQLite` was opened without foreign key enforcement.
    ForeignKeyEnforcementNotEnabled,

    // Documents
    /// No submission document has this id.
    DocumentNotFound(String),
    /// A dotted patch path ran into a non-object field.
    InvalidPatch(String),
    /// Stored fields are not valid JSON.
    SerializationError(String),

    // Identity
    /// An account with this email already exists.
    DuplicateAccount(String),
    /// No account matches the lookup.
    AccountNotFound(String),

    // Backend
    /// The database refused the statement.
    ///
    /// Carries the backend's own text; permission failures are told
    /// apart by inspecting it.
    Rejected(String),
    /// A statement failed for a reason other than a refusal.
    QueryFailed(String),
    /// A row expected by the query was missing.
    NotFound(String),
    /// Anything else.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Could not open the submissions database: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::DocumentNotFound(id) => write!(f, "Document not found: {id}"),
            Self::InvalidPatch(msg) => write!(f, "Invalid patch: {msg}"),
            Self::SerializationError(msg) => write!(f, "Stored fields are not valid JSON: {msg}"),
            Self::DuplicateAccount(email) => {
                write!(f, "An account with email '{email}' already exists")
            }
            Self::AccountNotFound(msg) => write!(f, "Account not found: {msg}"),
            Self::Rejected(msg) | Self::Other(msg) => write!(f, "{msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound(String::from("Record not found")),
            // SQLite reports read-only and locked databases here; keep its text intact.
            diesel::result::Error::DatabaseError(_, info) => {
                Self::Rejected(info.message().to_string())
            }
            _ => Self::QueryFailed(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
