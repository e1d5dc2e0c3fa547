// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pre-flight checks run before any I/O.

use filmfest_domain::{
    FileMetadata, FileRuleSet, FileSlot, FileSlots, FormDraft, ValidationMode, ValidationReport,
    validate_content, validate_file, validate_stored_file,
};
use filmfest_storage::validate_object_path;

use crate::error::{SubmissionError, SubmissionErrorCode};

/// Validates a form before saving it.
///
/// The user id and a usable application id are always required. Drafts stop there: they may be
/// incomplete in every other respect. Final submissions additionally
/// need all three files, each passing its slot rules, and content that
/// passes every field rule.
///
/// # Errors
///
/// Returns the first failure, e.g. `missing-user-id`,
/// `missing-poster-file` or `invalid-film-file`.
pub fn validate_form_data(
    form: &FormDraft,
    is_draft: bool,
    rules: &FileRuleSet,
) -> Result<(), SubmissionError> {
    validate_form_against(form, is_draft, rules, &FileSlots::default())
}

/// Like [`validate_form_data`], counting files already attached to a
/// persisted draft as present.
///
/// A local file in the form supersedes the stored one for its slot and
/// is the one checked against the rules. Otherwise the stored file's
/// recorded size and type are checked.
///
/// # Errors
///
/// As [`validate_form_data`].
pub fn validate_form_against(
    form: &FormDraft,
    is_draft: bool,
    rules: &FileRuleSet,
    stored: &FileSlots<FileMetadata>,
) -> Result<(), SubmissionError> {
    if form.user_id.trim().is_empty() {
        return Err(SubmissionError::validation(
            SubmissionErrorCode::MissingUserId,
            "User ID is required",
        ));
    }

    validate_application_id(&form.application_id)?;

    if is_draft {
        return Ok(());
    }

    for slot in FileSlot::ALL {
        match form.files.get(slot) {
            Some(file) => validate_file(file, rules.for_slot(slot))
                .map_err(|rejection| SubmissionError::invalid_file(slot, &rejection))?,
            None => match stored.get(slot) {
                Some(file) => validate_stored_file(file, rules.for_slot(slot))
                    .map_err(|rejection| SubmissionError::invalid_file(slot, &rejection))?,
                None => {
                    return Err(SubmissionError::validation(
                        SubmissionErrorCode::MissingFile(slot),
                        format!("{} file is required", slot.label()),
                    ));
                }
            },
        }
    }

    let report: ValidationReport = validate_content(&form.content, ValidationMode::Final);
    if !report.is_valid() {
        return Err(SubmissionError::validation(
            SubmissionErrorCode::ValidationFailed,
            format!("Validation failed: {}", report.joined_errors()),
        ));
    }

    Ok(())
}

/// The application id roots every storage path of the form, so it must be
/// exactly one path segment.
fn validate_application_id(application_id: &str) -> Result<(), SubmissionError> {
    if application_id.trim().is_empty() {
        return Err(SubmissionError::validation(
            SubmissionErrorCode::MissingApplicationId,
            "Application ID is required",
        ));
    }
    if application_id.contains('/') || validate_object_path(application_id).is_err() {
        return Err(SubmissionError::validation(
            SubmissionErrorCode::InvalidApplicationId,
            format!("Application ID '{application_id}' is not a valid storage segment"),
        ));
    }
    Ok(())
}
