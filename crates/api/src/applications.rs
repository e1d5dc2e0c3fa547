// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Applicant operations on persisted applications.
//!
//! Every operation loads the document, checks ownership and the status
//! guard, and only then touches storage. A refused operation performs
//! no write of any kind.

use filmfest::{
    ProgressEvent, ServiceConfig, SubmissionOrchestrator, SubmissionResult, file_value,
    read_application,
};
use filmfest_domain::{
    Application, ApplicationOperation, ApplicationStatus, FieldError, FileMetadata, FileRuleSet,
    FileSlot, FormDraft, LocalFile, ValidationMode, ValidationReport, generate_file_path,
    required_file_errors, stored_file_errors, validate_content, validate_file,
};
use filmfest_persistence::{Document, DocumentStore, Patch};
use filmfest_storage::{ObjectStore, delete_file, upload_file};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_domain_error, translate_file_rejection, translate_persistence_error,
    translate_upload_error,
};

/// Loads and normalizes one application without any access check.
///
/// # Errors
///
/// Returns `ResourceNotFound` for unknown ids and `Internal` for
/// documents that cannot be normalized.
pub async fn load_application<D: DocumentStore>(
    store: &D,
    id: &str,
) -> Result<Application, ApiError> {
    let document: Document = store
        .get(id)
        .await
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Application"),
            message: format!("Application {id} not found"),
        })?;
    read_application(&document).map_err(|e| ApiError::Internal {
        message: e.to_string(),
    })
}

/// Reads one application as its owner or an admin.
///
/// # Errors
///
/// Returns `Unauthorized` for other applicants.
pub async fn get_application<D: DocumentStore>(
    store: &D,
    actor: &AuthenticatedActor,
    id: &str,
) -> Result<Application, ApiError> {
    let application: Application = load_application(store, id).await?;
    AuthorizationService::authorize_view(actor, &application)?;
    Ok(application)
}

/// Lists the actor's applications in creation order. Deleted ones are hidden.
///
/// Documents that cannot be normalized are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the store cannot be listed.
pub async fn list_my_applications<D: DocumentStore>(
    store: &D,
    actor: &AuthenticatedActor,
) -> Result<Vec<Application>, ApiError> {
    let mut applications: Vec<Application> = read_all(store)
        .await?
        .into_iter()
        .filter(|a| a.is_owned_by(&actor.uid) && a.status != ApplicationStatus::Deleted)
        .collect();
    applications.sort_by_key(|a| a.created_at);
    Ok(applications)
}

/// Every normalizable application in the store.
pub(crate) async fn read_all<D: DocumentStore>(store: &D) -> Result<Vec<Application>, ApiError> {
    let documents: Vec<Document> = store.list().await.map_err(translate_persistence_error)?;
    Ok(documents
        .iter()
        .filter_map(|document| match read_application(document) {
            Ok(application) => Some(application),
            Err(e) => {
                warn!(document_id = %document.id, error = %e, "Skipping malformed application");
                None
            }
        })
        .collect())
}

/// Runs the submission pipeline for the actor's form.
///
/// The form is stamped with the actor's uid. A form that targets an
/// existing document must belong to the actor. Pipeline failures are
/// reported in the returned result, not as an error.
///
/// # Errors
///
/// Returns an error only when the targeted document cannot be read or
/// belongs to someone else.
pub async fn save_form<D: DocumentStore, S: ObjectStore>(
    documents: &D,
    objects: &S,
    config: &ServiceConfig,
    actor: &AuthenticatedActor,
    mut form: FormDraft,
    is_draft: bool,
    on_progress: impl FnMut(&ProgressEvent) + Send,
) -> Result<SubmissionResult, ApiError> {
    form.user_id.clone_from(&actor.uid);
    if let Some(id) = form.document_id.as_deref() {
        let existing: Application = load_application(documents, id).await?;
        AuthorizationService::authorize_owner(actor, &existing)?;
    }

    let orchestrator = SubmissionOrchestrator::new(documents, objects, config, on_progress);
    let result: SubmissionResult = if is_draft {
        orchestrator.save_draft(&form).await
    } else {
        orchestrator.submit(&form).await
    };
    Ok(result)
}

/// Submits a persisted draft after re-validating its stored state.
///
/// The file checks and the field rules both run against what is
/// stored, not against any client copy: every slot must be filled and
/// each stored file's size and type must still fit its slot rules. On
/// failure nothing is written.
///
/// # Errors
///
/// Returns `ValidationFailed` with every failure, or a lifecycle error
/// when the application is not a draft.
pub async fn submit_application<D: DocumentStore>(
    store: &D,
    rules: &FileRuleSet,
    actor: &AuthenticatedActor,
    id: &str,
) -> Result<Application, ApiError> {
    let application: Application = load_application(store, id).await?;
    AuthorizationService::authorize_owner(actor, &application)?;
    application
        .status
        .ensure_permits(ApplicationOperation::Submit)
        .map_err(translate_domain_error)?;

    let mut errors: Vec<FieldError> = required_file_errors(&application.files);
    errors.extend(stored_file_errors(&application.files, rules));
    let report: ValidationReport = validate_content(&application.content, ValidationMode::Final);
    errors.extend(report.errors);
    if !errors.is_empty() {
        warn!(application = id, errors = errors.len(), "Submission rejected by validation");
        return Err(ApiError::ValidationFailed {
            errors: errors.into_iter().map(|e| e.message).collect(),
        });
    }

    store
        .update(
            id,
            Patch::new()
                .set("status", ApplicationStatus::Submitted.as_str())
                .server_timestamp("submittedAt")
                .server_timestamp("lastModified"),
        )
        .await
        .map_err(translate_persistence_error)?;

    info!(application = id, uid = %actor.uid, "Application submitted");
    load_application(store, id).await
}

/// Replaces the file in one slot of a draft.
///
/// The new object lands first, then the document points at it, then
/// the old object is removed best-effort. When the document write
/// fails the new object is removed and the old one stays referenced.
///
/// # Errors
///
/// Returns a lifecycle error for non-drafts before any I/O, an
/// `InvalidInput` error when the file breaks the slot rules, or a
/// storage failure.
#[allow(clippy::too_many_arguments)]
pub async fn replace_file<D: DocumentStore, S: ObjectStore>(
    documents: &D,
    objects: &S,
    rules: &FileRuleSet,
    actor: &AuthenticatedActor,
    id: &str,
    slot: FileSlot,
    file: &LocalFile,
    on_progress: &mut (dyn FnMut(f64) + Send),
) -> Result<FileMetadata, ApiError> {
    let application: Application = load_application(documents, id).await?;
    AuthorizationService::authorize_owner(actor, &application)?;
    application
        .status
        .ensure_permits(ApplicationOperation::ReplaceFile)
        .map_err(translate_domain_error)?;
    validate_file(file, rules.for_slot(slot)).map_err(|e| translate_file_rejection(slot, &e))?;

    let root: &str = if application.application_id.is_empty() {
        &application.id
    } else {
        &application.application_id
    };
    let path: String = generate_file_path(root, slot, &file.file_name, OffsetDateTime::now_utc());
    let metadata: FileMetadata = upload_file(objects, file, &path, on_progress)
        .await
        .map_err(|e| translate_upload_error(&e))?;

    let patch: Patch = Patch::new()
        .set(
            format!("files.{}", slot.document_key()),
            file_value(Some(&metadata)),
        )
        .server_timestamp("lastModified");
    if let Err(e) = documents.update(id, patch).await {
        delete_file(objects, &path).await;
        return Err(translate_persistence_error(e));
    }

    let superseded: Option<&str> = application
        .files
        .get(slot)
        .map(|old| old.storage_path.as_str())
        .filter(|old_path| *old_path != metadata.storage_path);
    if let Some(old_path) = superseded {
        delete_file(objects, old_path).await;
    }

    info!(application = id, slot = %slot, path = %metadata.storage_path, "File replaced");
    Ok(metadata)
}

/// Soft-deletes a draft. Its files are removed best-effort first.
///
/// # Errors
///
/// Returns a lifecycle error when the application is not a draft.
pub async fn delete_application<D: DocumentStore, S: ObjectStore>(
    documents: &D,
    objects: &S,
    actor: &AuthenticatedActor,
    id: &str,
) -> Result<(), ApiError> {
    let application: Application = load_application(documents, id).await?;
    AuthorizationService::authorize_owner(actor, &application)?;
    application
        .status
        .ensure_permits(ApplicationOperation::Delete)
        .map_err(translate_domain_error)?;

    for (_, metadata) in application.files.iter() {
        delete_file(objects, &metadata.storage_path).await;
    }

    documents
        .update(
            id,
            Patch::new()
                .set("status", ApplicationStatus::Deleted.as_str())
                .server_timestamp("deletedAt")
                .server_timestamp("lastModified"),
        )
        .await
        .map_err(translate_persistence_error)?;

    info!(application = id, uid = %actor.uid, "Application deleted");
    Ok(())
}

/// Withdraws a submitted application. Files are kept.
///
/// # Errors
///
/// Returns a lifecycle error when the application is not submitted.
pub async fn withdraw_application<D: DocumentStore>(
    store: &D,
    actor: &AuthenticatedActor,
    id: &str,
) -> Result<Application, ApiError> {
    let application: Application = load_application(store, id).await?;
    AuthorizationService::authorize_owner(actor, &application)?;
    application
        .status
        .ensure_permits(ApplicationOperation::Withdraw)
        .map_err(translate_domain_error)?;

    store
        .update(
            id,
            Patch::new()
                .set("status", ApplicationStatus::Withdrawn.as_str())
                .server_timestamp("withdrawnAt")
                .server_timestamp("lastModified"),
        )
        .await
        .map_err(translate_persistence_error)?;

    info!(application = id, uid = %actor.uid, "Application withdrawn");
    load_application(store, id).await
}
