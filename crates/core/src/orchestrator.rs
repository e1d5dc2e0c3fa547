// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Top-level submission pipeline.
//!
//! One orchestrator runs one save: validate, upload, persist, report.
//! Any failure emits an error event, removes every file this run
//! uploaded, and is returned as a failed [`SubmissionResult`].

use filmfest_domain::{FileMetadata, FileSlots, FormDraft};
use filmfest_persistence::{Document, DocumentStore};
use filmfest_storage::{ObjectStore, delete_file};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::ServiceConfig;
use crate::document::read_application;
use crate::error::{SubmissionError, SubmissionErrorCode};
use crate::messages::{Locale, error_message, stage_message};
use crate::persist::{
    save_draft_document, save_submitted_document, submit_draft_document, update_draft_document,
};
use crate::progress::{
    BatchProgress, ProgressEvent, SAVE_WITHOUT_UPLOAD_PERCENT, Stage, UPLOAD_END_PERCENT,
    UPLOAD_START_PERCENT,
};
use crate::upload::{upload_files, upload_files_for_draft};
use crate::validate::validate_form_against;

/// Outcome of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub success: bool,
    pub submission_id: Option<String>,
    /// Localized failure message.
    pub error: Option<String>,
    pub error_code: Option<String>,
    pub is_draft: bool,
}

impl SubmissionResult {
    fn succeeded(submission_id: String, is_draft: bool) -> Self {
        Self {
            success: true,
            submission_id: Some(submission_id),
            error: None,
            error_code: None,
            is_draft,
        }
    }

    fn failed(error: &SubmissionError, locale: Locale, is_draft: bool) -> Self {
        Self {
            success: false,
            submission_id: None,
            error: Some(error_message(error, locale)),
            error_code: Some(error.code.as_str().to_string()),
            is_draft,
        }
    }
}

/// Callback receiving progress events.
pub type ProgressCallback<'a> = Box<dyn FnMut(&ProgressEvent) + Send + 'a>;

/// Sequences one save of one form.
///
/// Consumed by [`save_draft`](Self::save_draft) or
/// [`submit`](Self::submit); build a fresh one per save.
pub struct SubmissionOrchestrator<'a, D: DocumentStore, S: ObjectStore> {
    documents: &'a D,
    objects: &'a S,
    config: &'a ServiceConfig,
    on_progress: ProgressCallback<'a>,
    uploaded: Vec<String>,
}

impl<'a, D: DocumentStore, S: ObjectStore> SubmissionOrchestrator<'a, D, S> {
    /// Creates an orchestrator reporting through `on_progress`.
    pub fn new(
        documents: &'a D,
        objects: &'a S,
        config: &'a ServiceConfig,
        on_progress: impl FnMut(&ProgressEvent) + Send + 'a,
    ) -> Self {
        Self {
            documents,
            objects,
            config,
            on_progress: Box::new(on_progress),
            uploaded: Vec::new(),
        }
    }

    /// Saves the form as a draft.
    ///
    /// Only the files the form carries are uploaded. A form with a
    /// `document_id` updates that draft in place.
    pub async fn save_draft(self, form: &FormDraft) -> SubmissionResult {
        self.run(form, true).await
    }

    /// Submits the form.
    ///
    /// A form with a `document_id` submits that draft, counting its
    /// stored files as present.
    pub async fn submit(self, form: &FormDraft) -> SubmissionResult {
        self.run(form, false).await
    }

    async fn run(mut self, form: &FormDraft, is_draft: bool) -> SubmissionResult {
        let locale: Locale = self.config.locale;
        match self.execute(form, is_draft).await {
            Ok(submission_id) => {
                self.emit(Stage::Complete, 100, stage_message(Stage::Complete, is_draft, locale));
                SubmissionResult::succeeded(submission_id, is_draft)
            }
            Err(failure) => {
                let message: String = error_message(&failure, locale);
                error!(
                    application_id = %form.application_id,
                    code = %failure.code,
                    stage = %failure.stage,
                    error = %failure.message,
                    is_draft,
                    "Submission failed"
                );
                self.emit(Stage::Error, 0, &message);
                self.cleanup().await;
                SubmissionResult::failed(&failure, locale, is_draft)
            }
        }
    }

    async fn execute(
        &mut self,
        form: &FormDraft,
        is_draft: bool,
    ) -> Result<String, SubmissionError> {
        let locale: Locale = self.config.locale;
        self.emit(Stage::Validating, 0, stage_message(Stage::Validating, is_draft, locale));

        let stored: FileSlots<FileMetadata> = match form.document_id.as_deref() {
            Some(id) if !is_draft => stored_files(self.documents, id).await?,
            _ => FileSlots::default(),
        };
        validate_form_against(form, is_draft, &self.config.file_rules, &stored)?;

        let uploaded: FileSlots<FileMetadata> = self.upload(form, is_draft).await?;

        let (submission_id, superseded): (String, Vec<String>) =
            match (form.document_id.as_deref(), is_draft) {
                (None, true) => (
                    save_draft_document(self.documents, form, &uploaded).await?,
                    Vec::new(),
                ),
                (None, false) => (
                    save_submitted_document(self.documents, form, &uploaded).await?,
                    Vec::new(),
                ),
                (Some(id), true) => (
                    id.to_string(),
                    update_draft_document(self.documents, id, form, &uploaded).await?,
                ),
                (Some(id), false) => (
                    id.to_string(),
                    submit_draft_document(self.documents, id, form, &uploaded).await?,
                ),
            };

        // The document now points at the new files; the uploads are no
        // longer orphans if anything below fails.
        self.uploaded.clear();
        for path in superseded {
            delete_file(self.objects, &path).await;
        }

        info!(
            submission_id = %submission_id,
            application_id = %form.application_id,
            is_draft,
            "Submission complete"
        );
        Ok(submission_id)
    }

    async fn upload(
        &mut self,
        form: &FormDraft,
        is_draft: bool,
    ) -> Result<FileSlots<FileMetadata>, SubmissionError> {
        let locale: Locale = self.config.locale;
        let saving: &str = stage_message(Stage::Saving, is_draft, locale);

        // Drafts and resubmitted drafts upload only what the form carries.
        let sparse: bool = is_draft || form.document_id.is_some();
        if sparse && form.files.count() == 0 {
            self.emit(Stage::Saving, SAVE_WITHOUT_UPLOAD_PERCENT, saving);
            return Ok(FileSlots::default());
        }

        let uploading: &str = stage_message(Stage::Uploading, is_draft, locale);
        self.emit(Stage::Uploading, UPLOAD_START_PERCENT, uploading);

        let on_progress = &mut self.on_progress;
        let mut on_batch = |batch: &BatchProgress| {
            on_progress(&ProgressEvent {
                stage: Stage::Uploading,
                progress: batch.overall_percent(),
                message: uploading.to_string(),
                file_progress: Some(batch.file_percents()),
            });
        };

        let application_id: &str = &form.application_id;
        let files: FileSlots<FileMetadata> = if sparse {
            upload_files_for_draft(
                self.objects,
                form,
                application_id,
                &mut self.uploaded,
                &mut on_batch,
            )
            .await?
        } else {
            upload_files(
                self.objects,
                form,
                application_id,
                &mut self.uploaded,
                &mut on_batch,
            )
            .await?
        };

        self.emit(Stage::Saving, UPLOAD_END_PERCENT, saving);
        Ok(files)
    }

    fn emit(&mut self, stage: Stage, progress: u8, message: &str) {
        (self.on_progress)(&ProgressEvent {
            stage,
            progress,
            message: message.to_string(),
            file_progress: None,
        });
    }

    async fn cleanup(&mut self) {
        if self.uploaded.is_empty() {
            return;
        }
        warn!(files = self.uploaded.len(), "Removing files uploaded by the failed run");
        for path in std::mem::take(&mut self.uploaded) {
            delete_file(self.objects, &path).await;
        }
    }
}

/// Files already attached to a persisted draft.
async fn stored_files<D: DocumentStore>(
    documents: &D,
    document_id: &str,
) -> Result<FileSlots<FileMetadata>, SubmissionError> {
    let document: Document = documents
        .get(document_id)
        .await
        .map_err(|e| SubmissionError::save_failed(&e))?
        .ok_or_else(|| SubmissionError::document_not_found(document_id))?;
    read_application(&document)
        .map(|application| application.files)
        .map_err(|e| SubmissionError {
            code: SubmissionErrorCode::SaveFailed,
            stage: Stage::Validating,
            message: e.to_string(),
            permission_denied: false,
        })
}
