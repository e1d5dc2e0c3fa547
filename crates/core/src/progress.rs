// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Progress events and upload progress aggregation.

use filmfest_domain::{FileSlot, FileSlots};
use serde::Serialize;

/// Percentage at which the upload stage starts.
pub const UPLOAD_START_PERCENT: u8 = 20;
/// Percentage at which the upload stage ends and saving starts.
pub const UPLOAD_END_PERCENT: u8 = 70;
/// Percentage reported for saving when nothing had to be uploaded.
pub const SAVE_WITHOUT_UPLOAD_PERCENT: u8 = 50;

/// Pipeline stage reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    Uploading,
    Saving,
    Complete,
    Error,
}

impl Stage {
    /// Converts this stage to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Uploading => "uploading",
            Self::Saving => "saving",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub stage: Stage,
    /// Overall completion, 0 to 100.
    pub progress: u8,
    pub message: String,
    /// Per-slot upload completion, only while uploading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_progress: Option<FileSlots<u8>>,
}

/// Aggregate state of an upload batch after one file reported progress.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    /// Unweighted mean over every slot in the batch, 0.0 to 100.0.
    pub aggregate: f64,
    pub files: FileSlots<f64>,
}

impl BatchProgress {
    /// Aggregate as a whole percentage. Only a fully complete batch reads 100.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u8 {
        self.aggregate.clamp(0.0, 100.0).floor() as u8
    }

    /// Per-slot whole percentages.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn file_percents(&self) -> FileSlots<u8> {
        let floor = |value: Option<f64>| value.map(|v| v.clamp(0.0, 100.0).floor() as u8);
        FileSlots {
            film: floor(self.files.film),
            poster: floor(self.files.poster),
            proof: floor(self.files.proof),
        }
    }

    /// Maps the aggregate into the upload stage window of the overall bar.
    #[must_use]
    pub fn overall_percent(&self) -> u8 {
        let span: u16 = u16::from(UPLOAD_END_PERCENT - UPLOAD_START_PERCENT);
        let scaled: u16 = u16::from(self.percent()) * span / 100;
        UPLOAD_START_PERCENT + u8::try_from(scaled).unwrap_or(0)
    }
}

/// Tracks per-slot progress of one upload batch.
///
/// Every slot in the batch is registered at 0 when the tracker is built,
/// so the aggregate reflects the whole batch from the first report on.
/// The aggregate never decreases.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTracker {
    files: FileSlots<f64>,
    emitted: f64,
}

impl ProgressTracker {
    /// Registers `slots` at 0%.
    pub fn new(slots: impl IntoIterator<Item = FileSlot>) -> Self {
        let mut files: FileSlots<f64> = FileSlots::default();
        for slot in slots {
            files.set(slot, Some(0.0));
        }
        Self {
            files,
            emitted: 0.0,
        }
    }

    /// Records `percent` for `slot` and returns the new batch state.
    ///
    /// Returns `None` for slots outside the batch. A slot's value never
    /// goes backwards.
    pub fn update(&mut self, slot: FileSlot, percent: f64) -> Option<BatchProgress> {
        let previous: f64 = *self.files.get(slot)?;
        let percent: f64 = percent.clamp(0.0, 100.0).max(previous);
        self.files.set(slot, Some(percent));

        let aggregate: f64 = self.aggregate().max(self.emitted);
        self.emitted = aggregate;
        Some(BatchProgress {
            aggregate,
            files: self.files.clone(),
        })
    }

    /// Unweighted mean of every registered slot. An empty batch is complete.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aggregate(&self) -> f64 {
        let count: usize = self.files.count();
        if count == 0 {
            return 100.0;
        }
        self.files.iter().map(|(_, p)| *p).sum::<f64>() / count as f64
    }

    /// Returns true when every registered slot reached 100%.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.files.iter().all(|(_, p)| *p >= 100.0)
    }
}
