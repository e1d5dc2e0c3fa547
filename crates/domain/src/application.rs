// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::application_status::{ApplicationOperation, ApplicationStatus, ReviewStatus};
use crate::error::DomainError;
use crate::files::{FileMetadata, FileSlots, LocalFile};
use crate::scoring::{ScoreEntry, average_total};
use crate::types::{ApplicationContent, Category};
use time::OffsetDateTime;

/// A form as held by the client before (or between) saves.
///
/// `document_id` is set when the form edits an already persisted draft,
/// in which case saves mutate that document in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    pub user_id: String,
    /// Client-generated opaque token.
    pub application_id: String,
    pub document_id: Option<String>,
    pub content: ApplicationContent,
    pub files: FileSlots<LocalFile>,
}

impl FormDraft {
    /// Creates a new form with no files attached.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        application_id: impl Into<String>,
        content: ApplicationContent,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            application_id: application_id.into(),
            document_id: None,
            content,
            files: FileSlots::default(),
        }
    }

    /// Returns the competition category of this form.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.content.category()
    }
}

/// Admin-only fields layered onto a persisted application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewRecord {
    /// At most one entry per grader.
    pub scores: Vec<ScoreEntry>,
    pub admin_notes: Option<String>,
    pub review_status: ReviewStatus,
    pub flagged: bool,
    pub flag_reason: Option<String>,
    pub assigned_reviewers: Vec<String>,
}

impl ReviewRecord {
    /// Mean total score over all graders.
    #[must_use]
    pub fn average_score(&self) -> Option<f64> {
        average_total(&self.scores)
    }
}

/// A persisted application, normalized from the stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    /// Document id in the store.
    pub id: String,
    pub user_id: String,
    pub application_id: String,
    pub content: ApplicationContent,
    pub files: FileSlots<FileMetadata>,
    pub status: ApplicationStatus,
    pub created_at: Option<OffsetDateTime>,
    pub last_modified: Option<OffsetDateTime>,
    pub submitted_at: Option<OffsetDateTime>,
    pub withdrawn_at: Option<OffsetDateTime>,
    pub deleted_at: Option<OffsetDateTime>,
    pub review: ReviewRecord,
}

impl Application {
    /// Returns the competition category of this application.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.content.category()
    }

    /// Ensures the applicant may still change fields, crew and files.
    ///
    /// # Errors
    ///
    /// Returns an error such as "Cannot edit submitted applications"
    /// when the application is no longer a draft.
    pub fn ensure_editable(&self) -> Result<(), DomainError> {
        self.status.ensure_permits(ApplicationOperation::Edit)
    }

    /// Returns true if `user_id` owns this application.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
