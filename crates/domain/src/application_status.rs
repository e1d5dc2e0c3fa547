// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application status tracking and transition logic.
//!
//! An application moves forward only:
//! `draft -> submitted -> withdrawn` or `draft -> deleted`.
//! Withdrawn and deleted are terminal, and nothing except the
//! withdrawal leaves `submitted`.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of a persisted application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Saved but not submitted. Freely editable, may have missing files.
    #[default]
    Draft,
    /// Submitted for review. Frozen for the applicant.
    Submitted,
    /// Withdrawn by the applicant after submission.
    Withdrawn,
    /// Deleted while still a draft (soft delete).
    Deleted,
}

/// Operations that depend on the application status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationOperation {
    /// Editing form fields or crew.
    Edit,
    /// Promoting a draft to submitted.
    Submit,
    /// Replacing an uploaded file.
    ReplaceFile,
    /// Soft-deleting a draft.
    Delete,
    /// Withdrawing a submitted application.
    Withdraw,
    /// Admin review actions (scores, flags, notes, review status).
    Review,
}

impl ApplicationStatus {
    /// Returns the string representation used in persisted documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Withdrawn => "withdrawn",
            Self::Deleted => "deleted",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "withdrawn" => Ok(Self::Withdrawn),
            "deleted" => Ok(Self::Deleted),
            _ => Err(DomainError::InvalidApplicationStatus(s.to_string())),
        }
    }

    /// Returns true if no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Withdrawn | Self::Deleted)
    }

    /// Returns true if the applicant may still change fields and files.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Checks whether a transition to `target` is an edge of the lifecycle.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Submitted | Self::Deleted) | (Self::Submitted, Self::Withdrawn)
        )
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not an edge of the lifecycle.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: "transition not permitted by application lifecycle rules".to_string(),
            })
        }
    }

    /// Returns whether `operation` is legal in this status.
    #[must_use]
    pub const fn permits(&self, operation: ApplicationOperation) -> bool {
        match operation {
            ApplicationOperation::Edit
            | ApplicationOperation::Submit
            | ApplicationOperation::ReplaceFile
            | ApplicationOperation::Delete => matches!(self, Self::Draft),
            ApplicationOperation::Withdraw | ApplicationOperation::Review => {
                matches!(self, Self::Submitted)
            }
        }
    }

    /// Ensures `operation` is legal in this status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OperationNotPermitted` carrying a descriptive
    /// message such as "Cannot edit submitted applications".
    pub fn ensure_permits(&self, operation: ApplicationOperation) -> Result<(), DomainError> {
        if self.permits(operation) {
            Ok(())
        } else {
            Err(DomainError::OperationNotPermitted {
                operation,
                status: *self,
            })
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Admin review progress, independent of the applicant-facing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    InProgress,
    Reviewed,
    Approved,
    Rejected,
}

impl ReviewStatus {
    /// Returns the string representation used in persisted documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Reviewed => "reviewed",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" | "in_progress" => Ok(Self::InProgress),
            "reviewed" => Ok(Self::Reviewed),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidReviewStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
