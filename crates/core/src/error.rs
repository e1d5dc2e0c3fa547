// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use filmfest_domain::{DomainError, FileRejection, FileSlot};
use filmfest_persistence::PersistenceError;
use filmfest_storage::{UploadError, UploadErrorCode};

use crate::progress::Stage;

/// Backend error text that marks a rejection by access rules.
///
/// The document store reports refusals only as free text, so the text is
/// the only signal available.
const PERMISSION_DENIED_MARKERS: [&str; 6] = [
    "permission_denied",
    "permission-denied",
    "permission denied",
    "insufficient permissions",
    "readonly",
    "read-only",
];

/// Returns true when a backend error message reads as an access-rule rejection.
#[must_use]
pub fn is_permission_denied_message(message: &str) -> bool {
    let lowered: String = message.to_lowercase();
    PERMISSION_DENIED_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Machine-readable failure codes of the submission pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionErrorCode {
    /// The form carries no user id.
    MissingUserId,
    /// The form carries no application id.
    MissingApplicationId,
    /// The application id cannot root a storage path.
    InvalidApplicationId,
    /// A required file slot is empty.
    MissingFile(FileSlot),
    /// A file breaks the rules of its slot.
    InvalidFile(FileSlot),
    /// Field-level rules failed on final submission.
    ValidationFailed,
    /// A file upload failed.
    UploadFailed,
    /// The document store refused the write.
    PermissionDenied,
    /// The document write failed for another reason.
    SaveFailed,
    /// The target document is no longer a draft.
    NotEditable,
    /// The target document does not exist.
    DocumentNotFound,
}

impl SubmissionErrorCode {
    /// Stable code string, e.g. `missing-poster-file`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingUserId => "missing-user-id",
            Self::MissingApplicationId => "missing-application-id",
            Self::InvalidApplicationId => "invalid-application-id",
            Self::MissingFile(FileSlot::Film) => "missing-film-file",
            Self::MissingFile(FileSlot::Poster) => "missing-poster-file",
            Self::MissingFile(FileSlot::Proof) => "missing-proof-file",
            Self::InvalidFile(FileSlot::Film) => "invalid-film-file",
            Self::InvalidFile(FileSlot::Poster) => "invalid-poster-file",
            Self::InvalidFile(FileSlot::Proof) => "invalid-proof-file",
            Self::ValidationFailed => "validation-failed",
            Self::UploadFailed => "upload-failed",
            Self::PermissionDenied => "permission-denied",
            Self::SaveFailed => "save-failed",
            Self::NotEditable => "not-editable",
            Self::DocumentNotFound => "document-not-found",
        }
    }
}

impl std::fmt::Display for SubmissionErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failure of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionError {
    pub code: SubmissionErrorCode,
    /// The stage that failed.
    pub stage: Stage,
    /// Untranslated detail.
    pub message: String,
    /// The storage or document backend refused access.
    pub permission_denied: bool,
}

impl SubmissionError {
    /// Creates an error raised before any I/O.
    #[must_use]
    pub fn validation(code: SubmissionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            stage: Stage::Validating,
            message: message.into(),
            permission_denied: false,
        }
    }

    /// Maps a slot rule failure.
    #[must_use]
    pub fn invalid_file(slot: FileSlot, rejection: &FileRejection) -> Self {
        Self::validation(
            SubmissionErrorCode::InvalidFile(slot),
            format!("{} file is invalid: {rejection}", slot.label()),
        )
    }

    /// Maps a failed upload. The batch fails as a whole.
    #[must_use]
    pub fn upload_failed(error: &UploadError) -> Self {
        Self {
            code: SubmissionErrorCode::UploadFailed,
            stage: Stage::Uploading,
            message: error.to_string(),
            permission_denied: error.code == UploadErrorCode::PermissionDenied,
        }
    }

    /// Maps a document store failure, sniffing the text for access-rule rejections.
    #[must_use]
    pub fn save_failed(error: &PersistenceError) -> Self {
        let message: String = error.to_string();
        if let PersistenceError::DocumentNotFound(id) = error {
            return Self {
                code: SubmissionErrorCode::DocumentNotFound,
                stage: Stage::Saving,
                message: format!("Application {id} not found"),
                permission_denied: false,
            };
        }
        let permission_denied: bool = is_permission_denied_message(&message);
        Self {
            code: if permission_denied {
                SubmissionErrorCode::PermissionDenied
            } else {
                SubmissionErrorCode::SaveFailed
            },
            stage: Stage::Saving,
            message,
            permission_denied,
        }
    }

    /// Maps a lifecycle violation on an existing document.
    #[must_use]
    pub fn not_editable(error: &DomainError) -> Self {
        Self {
            code: SubmissionErrorCode::NotEditable,
            stage: Stage::Saving,
            message: error.to_string(),
            permission_denied: false,
        }
    }

    /// Creates the error for a document id that resolves to nothing.
    #[must_use]
    pub fn document_not_found(id: &str) -> Self {
        Self {
            code: SubmissionErrorCode::DocumentNotFound,
            stage: Stage::Saving,
            message: format!("Application {id} not found"),
            permission_denied: false,
        }
    }
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SubmissionError {}

/// A stored document whose shape cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedDocument {
    pub document_id: String,
    pub reason: String,
}

impl std::fmt::Display for MalformedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Document {} is malformed: {}",
            self.document_id, self.reason
        )
    }
}

impl std::error::Error for MalformedDocument {}
