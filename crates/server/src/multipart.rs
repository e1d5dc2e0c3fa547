// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Multipart bodies of the form and file replacement routes.

use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use filmfest_api::FormPayload;
use filmfest_domain::{FileSlot, FormDraft, LocalFile};
use tracing::debug;

use crate::HttpError;

/// Name of the JSON part carrying the form fields.
pub const FORM_PART: &str = "form";

/// Reads a `form` JSON part plus optional `film`, `poster` and `proof`
/// file parts into a form.
///
/// The owner is left empty; the API stamps it from the session.
///
/// # Errors
///
/// Returns 400 for a missing or unparsable `form` part or an unknown
/// part name.
pub async fn read_form(mut multipart: Multipart) -> Result<FormDraft, HttpError> {
    let mut payload: Option<FormPayload> = None;
    let mut files: Vec<(FileSlot, LocalFile)> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name: String = field.name().unwrap_or_default().to_string();
        if name == FORM_PART {
            let text: String = field.text().await.map_err(multipart_error)?;
            let parsed: FormPayload = serde_json::from_str(&text).map_err(|e| {
                HttpError::bad_request(format!("Invalid '{FORM_PART}' part: {e}"))
            })?;
            payload = Some(parsed);
            continue;
        }

        let slot: FileSlot = name
            .parse()
            .map_err(|_| HttpError::bad_request(format!("Unexpected multipart part '{name}'")))?;
        if let Some(file) = read_file(field).await? {
            files.push((slot, file));
        }
    }

    let payload: FormPayload = payload.ok_or_else(|| {
        HttpError::bad_request(format!("Missing '{FORM_PART}' part"))
    })?;
    let mut form: FormDraft = FormDraft::new("", payload.application_id, payload.content);
    form.document_id = payload.document_id;
    for (slot, file) in files {
        debug!(%slot, file_name = %file.file_name, size = file.size(), "Received file part");
        form.files.set(slot, Some(file));
    }
    Ok(form)
}

/// Reads the first file part of a replacement upload.
///
/// # Errors
///
/// Returns 400 if the body carries no file.
pub async fn read_single_file(mut multipart: Multipart) -> Result<LocalFile, HttpError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if let Some(file) = read_file(field).await? {
            return Ok(file);
        }
    }
    Err(HttpError::bad_request(String::from("Missing file part")))
}

/// Browsers send an empty, unnamed part for an untouched file input.
async fn read_file(field: Field<'_>) -> Result<Option<LocalFile>, HttpError> {
    let file_name: String = field.file_name().unwrap_or_default().to_string();
    let content_type: String = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data: Vec<u8> = field.bytes().await.map_err(multipart_error)?.to_vec();

    if file_name.is_empty() && data.is_empty() {
        return Ok(None);
    }
    Ok(Some(LocalFile::new(file_name, content_type, data)))
}

fn multipart_error(err: MultipartError) -> HttpError {
    HttpError::bad_request(format!("Malformed multipart body: {}", err.body_text()))
}
