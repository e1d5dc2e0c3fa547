// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::application_status::{ApplicationOperation, ApplicationStatus};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A status transition is not permitted by the application lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// An operation was attempted on an application in the wrong status.
    OperationNotPermitted {
        /// The attempted operation.
        operation: ApplicationOperation,
        /// The status the application is in.
        status: ApplicationStatus,
    },
    /// A score criterion is outside the allowed range.
    InvalidScore {
        /// The criterion name.
        criterion: &'static str,
        /// The rejected value.
        value: u8,
    },
    /// Unknown competition category.
    InvalidCategory(String),
    /// Unknown application status.
    InvalidApplicationStatus(String),
    /// Unknown review status.
    InvalidReviewStatus(String),
    /// Unknown file slot.
    InvalidFileSlot(String),
    /// Unknown film format.
    InvalidFilmFormat(String),
    /// Unknown participant role.
    InvalidParticipantRole(String),
    /// Grader identity is empty.
    MissingGrader,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition from {from} to {to}: {reason}")
            }
            Self::OperationNotPermitted { operation, status } => match operation {
                ApplicationOperation::Edit => {
                    write!(f, "Cannot edit {} applications", status.as_str())
                }
                ApplicationOperation::Submit => {
                    write!(f, "Cannot submit {} applications", status.as_str())
                }
                ApplicationOperation::ReplaceFile => {
                    write!(f, "Cannot replace files in {} applications", status.as_str())
                }
                ApplicationOperation::Delete => {
                    write!(f, "Cannot delete {} applications", status.as_str())
                }
                ApplicationOperation::Withdraw => {
                    write!(
                        f,
                        "Cannot withdraw {} applications: only submitted applications can be withdrawn",
                        status.as_str()
                    )
                }
                ApplicationOperation::Review => {
                    write!(f, "Cannot review {} applications", status.as_str())
                }
            },
            Self::InvalidScore { criterion, value } => {
                write!(
                    f,
                    "Invalid {criterion} score: {value}. Must be between 0 and 10"
                )
            }
            Self::InvalidCategory(value) => write!(f, "Invalid competition category: {value}"),
            Self::InvalidApplicationStatus(value) => {
                write!(f, "Invalid application status: {value}")
            }
            Self::InvalidReviewStatus(value) => write!(f, "Invalid review status: {value}"),
            Self::InvalidFileSlot(value) => write!(f, "Invalid file slot: {value}"),
            Self::InvalidFilmFormat(value) => write!(f, "Invalid film format: {value}"),
            Self::InvalidParticipantRole(value) => write!(f, "Invalid participant role: {value}"),
            Self::MissingGrader => write!(f, "Grader identity is required"),
        }
    }
}

impl std::error::Error for DomainError {}
