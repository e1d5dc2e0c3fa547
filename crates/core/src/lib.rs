// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod config;
mod document;
mod error;
mod messages;
mod orchestrator;
mod persist;
mod progress;
mod upload;
mod validate;

#[cfg(test)]
mod tests;

pub use config::ServiceConfig;
pub use document::{
    draft_document_patch, draft_update_patch, file_value, read_application, scores_value,
    submitted_document_patch,
};
pub use error::{
    MalformedDocument, SubmissionError, SubmissionErrorCode, is_permission_denied_message,
};
pub use messages::{Locale, error_message, permission_hint, stage_message};
pub use orchestrator::{ProgressCallback, SubmissionOrchestrator, SubmissionResult};
pub use persist::{
    save_draft_document, save_submitted_document, submit_draft_document, update_draft_document,
};
pub use progress::{
    BatchProgress, ProgressEvent, ProgressTracker, SAVE_WITHOUT_UPLOAD_PERCENT, Stage,
    UPLOAD_END_PERCENT, UPLOAD_START_PERCENT,
};
pub use upload::{UploadBatch, UploadRequest, upload_files, upload_files_for_draft};
pub use validate::{validate_form_against, validate_form_data};
