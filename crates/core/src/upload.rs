// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Concurrent multi-file upload with aggregate progress.

use filmfest_domain::{
    FileMetadata, FileSlot, FileSlots, FormDraft, LocalFile, generate_file_path,
};
use filmfest_storage::{ObjectStore, upload_file};
use futures::future::try_join_all;
use std::sync::{Mutex, PoisonError};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::{SubmissionError, SubmissionErrorCode};
use crate::progress::{BatchProgress, ProgressTracker};

/// One file to upload and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest<'a> {
    pub slot: FileSlot,
    pub path: String,
    pub file: &'a LocalFile,
}

/// The upload requests of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch<'a> {
    requests: Vec<UploadRequest<'a>>,
}

struct ProgressSink<'s> {
    tracker: ProgressTracker,
    on_progress: &'s mut (dyn FnMut(&BatchProgress) + Send),
}

impl<'a> UploadBatch<'a> {
    /// One request per populated slot. An empty form yields an empty batch.
    #[must_use]
    pub fn sparse(files: &'a FileSlots<LocalFile>, submission_id: &str, at: OffsetDateTime) -> Self {
        Self {
            requests: files
                .iter()
                .map(|(slot, file)| UploadRequest {
                    slot,
                    path: generate_file_path(submission_id, slot, &file.file_name, at),
                    file,
                })
                .collect(),
        }
    }

    /// Exactly one request per slot.
    ///
    /// # Errors
    ///
    /// Returns a `missing-{slot}-file` error for the first empty slot.
    pub fn complete(
        files: &'a FileSlots<LocalFile>,
        submission_id: &str,
        at: OffsetDateTime,
    ) -> Result<Self, SubmissionError> {
        if let Some(slot) = files.missing().into_iter().next() {
            return Err(SubmissionError::validation(
                SubmissionErrorCode::MissingFile(slot),
                format!("{} file is required", slot.label()),
            ));
        }
        Ok(Self::sparse(files, submission_id, at))
    }

    /// Returns true when there is nothing to upload.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Number of requests.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.requests.len()
    }

    /// The requests in slot order.
    #[must_use]
    pub fn requests(&self) -> &[UploadRequest<'a>] {
        &self.requests
    }

    /// Storage paths of every request.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.requests.iter().map(|r| r.path.clone()).collect()
    }

    /// Runs every request concurrently.
    ///
    /// `on_progress` receives the batch state after every chunk of any
    /// file. The first failure aborts the batch; no partial result is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an `upload-failed` error carrying the failed file's detail.
    pub async fn run<S: ObjectStore>(
        self,
        store: &S,
        on_progress: &mut (dyn FnMut(&BatchProgress) + Send),
    ) -> Result<FileSlots<FileMetadata>, SubmissionError> {
        let sink: Mutex<ProgressSink<'_>> = Mutex::new(ProgressSink {
            tracker: ProgressTracker::new(self.requests.iter().map(|r| r.slot)),
            on_progress,
        });

        let uploads = self.requests.iter().map(|request| {
            let sink: &Mutex<ProgressSink<'_>> = &sink;
            async move {
                let mut on_file = |percent: f64| report_file_progress(sink, request.slot, percent);
                upload_file(store, request.file, &request.path, &mut on_file)
                    .await
                    .map(|metadata| (request.slot, metadata))
            }
        });

        let uploaded: Vec<(FileSlot, FileMetadata)> = try_join_all(uploads)
            .await
            .map_err(|e| SubmissionError::upload_failed(&e))?;

        let mut files: FileSlots<FileMetadata> = FileSlots::default();
        for (slot, metadata) in uploaded {
            files.set(slot, Some(metadata));
        }
        Ok(files)
    }
}

fn report_file_progress(sink: &Mutex<ProgressSink<'_>>, slot: FileSlot, percent: f64) {
    let mut guard = sink.lock().unwrap_or_else(PoisonError::into_inner);
    let ProgressSink {
        tracker,
        on_progress,
    } = &mut *guard;
    if let Some(progress) = tracker.update(slot, percent) {
        on_progress(&progress);
    }
}

/// Uploads whichever files a draft carries.
///
/// Paths of every upload that is started are appended to `started`
/// before the batch runs, so the caller can clean up after a failure.
/// A draft without files makes no upload call and yields empty slots.
///
/// # Errors
///
/// Returns an `upload-failed` error when any file fails.
pub async fn upload_files_for_draft<S: ObjectStore>(
    store: &S,
    form: &FormDraft,
    submission_id: &str,
    started: &mut Vec<String>,
    on_progress: &mut (dyn FnMut(&BatchProgress) + Send),
) -> Result<FileSlots<FileMetadata>, SubmissionError> {
    let batch: UploadBatch<'_> =
        UploadBatch::sparse(&form.files, submission_id, OffsetDateTime::now_utc());
    if batch.is_empty() {
        debug!(submission_id, "Draft carries no files; nothing to upload");
        return Ok(FileSlots::default());
    }
    run_batch(store, batch, submission_id, started, on_progress).await
}

/// Uploads all three files of a final submission.
///
/// # Errors
///
/// Returns a `missing-{slot}-file` error when a slot is empty, or an
/// `upload-failed` error when any file fails.
pub async fn upload_files<S: ObjectStore>(
    store: &S,
    form: &FormDraft,
    submission_id: &str,
    started: &mut Vec<String>,
    on_progress: &mut (dyn FnMut(&BatchProgress) + Send),
) -> Result<FileSlots<FileMetadata>, SubmissionError> {
    let batch: UploadBatch<'_> =
        UploadBatch::complete(&form.files, submission_id, OffsetDateTime::now_utc())?;
    run_batch(store, batch, submission_id, started, on_progress).await
}

async fn run_batch<S: ObjectStore>(
    store: &S,
    batch: UploadBatch<'_>,
    submission_id: &str,
    started: &mut Vec<String>,
    on_progress: &mut (dyn FnMut(&BatchProgress) + Send),
) -> Result<FileSlots<FileMetadata>, SubmissionError> {
    info!(submission_id, files = batch.len(), "Uploading files");
    started.extend(batch.paths());
    let files: FileSlots<FileMetadata> = batch.run(store, on_progress).await?;
    info!(submission_id, files = files.count(), "Files uploaded");
    Ok(files)
}
