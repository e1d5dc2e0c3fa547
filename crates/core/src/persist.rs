// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Document writes for new and existing applications.

use filmfest_domain::{
    Application, ApplicationOperation, FileMetadata, FileSlot, FileSlots, FormDraft,
};
use filmfest_persistence::{Document, DocumentStore, Patch};
use tracing::{debug, info};

use crate::document::{
    draft_document_patch, draft_update_patch, read_application, submitted_document_patch,
};
use crate::error::{SubmissionError, SubmissionErrorCode};
use crate::progress::Stage;

/// Creates a draft document. Missing files are stored as `null`.
///
/// # Errors
///
/// Returns `permission-denied` or `save-failed` when the store rejects
/// the write.
pub async fn save_draft_document<D: DocumentStore>(
    store: &D,
    form: &FormDraft,
    files: &FileSlots<FileMetadata>,
) -> Result<String, SubmissionError> {
    let id: String = store
        .create(draft_document_patch(form, files))
        .await
        .map_err(|e| SubmissionError::save_failed(&e))?;
    info!(
        document_id = %id,
        user_id = %form.user_id,
        category = %form.category(),
        files = files.count(),
        "Draft saved"
    );
    Ok(id)
}

/// Creates a submitted document. Every file slot must be populated.
///
/// # Errors
///
/// Returns a `missing-{slot}-file` error when a slot is empty, or
/// `permission-denied` / `save-failed` when the store rejects the write.
pub async fn save_submitted_document<D: DocumentStore>(
    store: &D,
    form: &FormDraft,
    files: &FileSlots<FileMetadata>,
) -> Result<String, SubmissionError> {
    ensure_complete(files)?;
    let id: String = store
        .create(submitted_document_patch(form, files))
        .await
        .map_err(|e| SubmissionError::save_failed(&e))?;
    info!(
        document_id = %id,
        user_id = %form.user_id,
        category = %form.category(),
        "Application submitted"
    );
    Ok(id)
}

/// Writes a form over an existing draft.
///
/// Returns the storage paths of files the newly uploaded ones replace;
/// the caller removes them once the write has landed.
///
/// # Errors
///
/// Returns `not-editable` when the document is no longer a draft,
/// `document-not-found` when it does not exist, or a store failure.
pub async fn update_draft_document<D: DocumentStore>(
    store: &D,
    document_id: &str,
    form: &FormDraft,
    uploaded: &FileSlots<FileMetadata>,
) -> Result<Vec<String>, SubmissionError> {
    let existing: Application = load_for(store, document_id, ApplicationOperation::Edit).await?;
    store
        .update(document_id, draft_update_patch(form, uploaded))
        .await
        .map_err(|e| SubmissionError::save_failed(&e))?;
    debug!(document_id, files = uploaded.count(), "Draft updated");
    Ok(superseded_paths(&existing.files, uploaded))
}

/// Writes a form over an existing draft and submits it in the same write.
///
/// Stored files count towards completeness; uploaded ones take their
/// slot's place.
///
/// # Errors
///
/// As [`update_draft_document`], plus `missing-{slot}-file` when a slot
/// is still empty after merging.
pub async fn submit_draft_document<D: DocumentStore>(
    store: &D,
    document_id: &str,
    form: &FormDraft,
    uploaded: &FileSlots<FileMetadata>,
) -> Result<Vec<String>, SubmissionError> {
    let existing: Application = load_for(store, document_id, ApplicationOperation::Submit).await?;

    let mut merged: FileSlots<FileMetadata> = existing.files.clone();
    for (slot, metadata) in uploaded.iter() {
        merged.set(slot, Some(metadata.clone()));
    }
    ensure_complete(&merged).map_err(|mut e| {
        e.stage = Stage::Saving;
        e
    })?;

    let patch: Patch = draft_update_patch(form, uploaded)
        .set("status", "submitted")
        .server_timestamp("submittedAt");
    store
        .update(document_id, patch)
        .await
        .map_err(|e| SubmissionError::save_failed(&e))?;
    info!(document_id, user_id = %form.user_id, "Draft submitted");
    Ok(superseded_paths(&existing.files, uploaded))
}

/// Reads and normalizes a document, checking `operation` is allowed.
async fn load_for<D: DocumentStore>(
    store: &D,
    document_id: &str,
    operation: ApplicationOperation,
) -> Result<Application, SubmissionError> {
    let document: Document = store
        .get(document_id)
        .await
        .map_err(|e| SubmissionError::save_failed(&e))?
        .ok_or_else(|| SubmissionError::document_not_found(document_id))?;
    let application: Application = read_application(&document).map_err(|e| SubmissionError {
        code: SubmissionErrorCode::SaveFailed,
        stage: Stage::Saving,
        message: e.to_string(),
        permission_denied: false,
    })?;
    application
        .status
        .ensure_permits(operation)
        .map_err(|e| SubmissionError::not_editable(&e))?;
    Ok(application)
}

fn ensure_complete(files: &FileSlots<FileMetadata>) -> Result<(), SubmissionError> {
    match files.missing().into_iter().next() {
        Some(slot) => Err(SubmissionError::validation(
            SubmissionErrorCode::MissingFile(slot),
            format!("{} file is required", slot.label()),
        )),
        None => Ok(()),
    }
}

fn superseded_paths(
    stored: &FileSlots<FileMetadata>,
    uploaded: &FileSlots<FileMetadata>,
) -> Vec<String> {
    FileSlot::ALL
        .into_iter()
        .filter_map(|slot| match (stored.get(slot), uploaded.get(slot)) {
            (Some(old), Some(new)) if old.storage_path != new.storage_path => {
                Some(old.storage_path.clone())
            }
            _ => None,
        })
        .collect()
}
