// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use filmfest::{SubmissionError, SubmissionErrorCode, is_permission_denied_message};
use filmfest_domain::{DomainError, FileRejection, FileSlot};
use filmfest_persistence::PersistenceError;
use filmfest_storage::{UploadError, UploadErrorCode};

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// Field-level validation of a persisted application failed.
    ValidationFailed {
        /// Every failure, in rule order.
        errors: Vec<String>,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The object or document store refused or failed an operation.
    StorageFailure {
        /// Machine-readable code, e.g. `permission-denied`.
        code: String,
        /// A human-readable description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { message, .. } => write!(f, "{message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ValidationFailed { errors } => {
                write!(f, "Validation failed: {}", errors.join("; "))
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::StorageFailure { code, message } => write!(f, "{message} ({code})"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::OperationNotPermitted { .. } => ApiError::DomainRuleViolation {
            rule: String::from("application_lifecycle"),
            message: err.to_string(),
        },
        DomainError::InvalidStatusTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("status_transition"),
            message: err.to_string(),
        },
        DomainError::InvalidScore { criterion, .. } => ApiError::InvalidInput {
            field: criterion.to_string(),
            message: err.to_string(),
        },
        DomainError::InvalidCategory(_) => ApiError::InvalidInput {
            field: String::from("category"),
            message: err.to_string(),
        },
        DomainError::InvalidApplicationStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message: err.to_string(),
        },
        DomainError::InvalidReviewStatus(_) => ApiError::InvalidInput {
            field: String::from("review_status"),
            message: err.to_string(),
        },
        DomainError::InvalidFileSlot(_) => ApiError::InvalidInput {
            field: String::from("slot"),
            message: err.to_string(),
        },
        DomainError::InvalidFilmFormat(_) => ApiError::InvalidInput {
            field: String::from("film.format"),
            message: err.to_string(),
        },
        DomainError::InvalidParticipantRole(_) => ApiError::InvalidInput {
            field: String::from("role"),
            message: err.to_string(),
        },
        DomainError::MissingGrader => ApiError::InvalidInput {
            field: String::from("grader_id"),
            message: err.to_string(),
        },
    }
}

/// Translates a failed submission pipeline run into an API error.
#[must_use]
pub fn translate_submission_error(err: SubmissionError) -> ApiError {
    match err.code {
        SubmissionErrorCode::MissingUserId => ApiError::AuthenticationFailed {
            reason: err.message,
        },
        SubmissionErrorCode::MissingApplicationId | SubmissionErrorCode::InvalidApplicationId => {
            ApiError::InvalidInput {
                field: String::from("application_id"),
                message: err.message,
            }
        }
        SubmissionErrorCode::MissingFile(slot) | SubmissionErrorCode::InvalidFile(slot) => {
            ApiError::InvalidInput {
                field: file_field(slot),
                message: err.message,
            }
        }
        SubmissionErrorCode::ValidationFailed => ApiError::ValidationFailed {
            errors: vec![
                err.message
                    .strip_prefix("Validation failed: ")
                    .unwrap_or(&err.message)
                    .to_string(),
            ],
        },
        SubmissionErrorCode::NotEditable => ApiError::DomainRuleViolation {
            rule: String::from("application_lifecycle"),
            message: err.message,
        },
        SubmissionErrorCode::DocumentNotFound => ApiError::ResourceNotFound {
            resource_type: String::from("Application"),
            message: err.message,
        },
        SubmissionErrorCode::UploadFailed
        | SubmissionErrorCode::PermissionDenied
        | SubmissionErrorCode::SaveFailed => ApiError::StorageFailure {
            code: err.code.as_str().to_string(),
            message: err.message,
        },
    }
}

/// Translates a document store error into an API error.
///
/// Rejections whose text reads as an access-rule failure keep the
/// `permission-denied` code so callers can show the remediation hint.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DocumentNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Application"),
            message: format!("Application {id} not found"),
        },
        PersistenceError::AccountNotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Account"),
            message: msg,
        },
        PersistenceError::DuplicateAccount(email) => ApiError::DomainRuleViolation {
            rule: String::from("unique_email"),
            message: format!("An account with email '{email}' already exists"),
        },
        PersistenceError::Rejected(msg) if is_permission_denied_message(&msg) => {
            ApiError::StorageFailure {
                code: String::from("permission-denied"),
                message: msg,
            }
        }
        PersistenceError::Rejected(msg) => ApiError::StorageFailure {
            code: String::from("save-failed"),
            message: msg,
        },
        _ => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a failed single-file upload into an API error.
#[must_use]
pub fn translate_upload_error(err: &UploadError) -> ApiError {
    let code: &str = match err.code {
        UploadErrorCode::PermissionDenied => "permission-denied",
        UploadErrorCode::Transport | UploadErrorCode::UrlResolution => "upload-failed",
    };
    ApiError::StorageFailure {
        code: code.to_string(),
        message: err.to_string(),
    }
}

/// Translates a file rule rejection for `slot` into an API error.
#[must_use]
pub fn translate_file_rejection(slot: FileSlot, rejection: &FileRejection) -> ApiError {
    ApiError::InvalidInput {
        field: file_field(slot),
        message: rejection.to_string(),
    }
}

fn file_field(slot: FileSlot) -> String {
    format!("files.{}", slot.document_key())
}
