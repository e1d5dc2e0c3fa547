// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors raised by an object store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backend refused access to the object.
    #[error("storage/unauthorized: permission denied for '{path}'")]
    PermissionDenied { path: String },

    /// The transfer failed part way or never started.
    #[error("Transfer of '{path}' failed: {reason}")]
    Transport { path: String, reason: String },

    /// No object is stored at the path.
    #[error("Object '{path}' does not exist")]
    NotFound { path: String },

    /// The path is not a valid object key.
    #[error("Invalid object path '{0}'")]
    InvalidPath(String),
}

impl StorageError {
    /// Returns true when the backend rejected the caller's access rights.
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    pub(crate) fn from_io(path: &str, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_string(),
            },
            std::io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_string(),
            },
            _ => Self::Transport {
                path: path.to_string(),
                reason: error.to_string(),
            },
        }
    }
}
