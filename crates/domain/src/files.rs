// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! File slots, upload rules and storage path generation.

use crate::error::DomainError;
use crate::media::probe_duration_seconds;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

const MEGABYTE: u64 = 1024 * 1024;

/// One of the three named file roles on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSlot {
    Film,
    Poster,
    Proof,
}

impl FileSlot {
    /// All slots, in form order.
    pub const ALL: [Self; 3] = [Self::Film, Self::Poster, Self::Proof];

    /// Short name, also used as the storage path segment.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Film => "film",
            Self::Poster => "poster",
            Self::Proof => "proof",
        }
    }

    /// Key of this slot inside the persisted `files` object.
    #[must_use]
    pub const fn document_key(&self) -> &'static str {
        match self {
            Self::Film => "filmFile",
            Self::Poster => "posterFile",
            Self::Proof => "proofFile",
        }
    }

    /// Human readable label used in validation messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Film => "Film",
            Self::Poster => "Poster",
            Self::Proof => "Proof",
        }
    }

    /// The kind of content this slot accepts.
    #[must_use]
    pub const fn kind(&self) -> FileKind {
        match self {
            Self::Film => FileKind::Video,
            Self::Poster => FileKind::Image,
            Self::Proof => FileKind::Document,
        }
    }
}

impl FromStr for FileSlot {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "film" | "filmFile" => Ok(Self::Film),
            "poster" | "posterFile" => Ok(Self::Poster),
            "proof" | "proofFile" => Ok(Self::Proof),
            _ => Err(DomainError::InvalidFileSlot(s.to_string())),
        }
    }
}

impl std::fmt::Display for FileSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Broad content class a slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Video,
    Image,
    Document,
}

/// One optional value per file slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSlots<T> {
    pub film: Option<T>,
    pub poster: Option<T>,
    pub proof: Option<T>,
}

impl<T> Default for FileSlots<T> {
    fn default() -> Self {
        Self {
            film: None,
            poster: None,
            proof: None,
        }
    }
}

impl<T> FileSlots<T> {
    /// Returns the value in `slot`, if any.
    #[must_use]
    pub const fn get(&self, slot: FileSlot) -> Option<&T> {
        match slot {
            FileSlot::Film => self.film.as_ref(),
            FileSlot::Poster => self.poster.as_ref(),
            FileSlot::Proof => self.proof.as_ref(),
        }
    }

    /// Replaces the value in `slot`, returning the previous one.
    pub fn set(&mut self, slot: FileSlot, value: Option<T>) -> Option<T> {
        let target: &mut Option<T> = match slot {
            FileSlot::Film => &mut self.film,
            FileSlot::Poster => &mut self.poster,
            FileSlot::Proof => &mut self.proof,
        };
        std::mem::replace(target, value)
    }

    /// Iterates over the populated slots in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FileSlot, &T)> {
        FileSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|value| (slot, value)))
    }

    /// Slots that have no value.
    #[must_use]
    pub fn missing(&self) -> Vec<FileSlot> {
        FileSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).is_none())
            .collect()
    }

    /// Returns true when every slot is populated.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.film.is_some() && self.poster.is_some() && self.proof.is_some()
    }

    /// Number of populated slots.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

/// A file handle on the client side, before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub file_name: String,
    /// MIME type as reported by the client.
    pub content_type: String,
    pub data: Vec<u8>,
}

impl LocalFile {
    /// Creates a new local file handle.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Size of the file in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Returns true when the MIME type is a video type.
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.content_type.starts_with("video/")
    }
}

/// Metadata of a file after it has been uploaded.
///
/// `storage_path` is authoritative for deletion and replacement;
/// `download_url` is derived from it and may be re-resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub storage_path: String,
    pub download_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

/// Accepted duration window for video files, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationBounds {
    pub min_seconds: f64,
    pub max_seconds: f64,
}

/// Size, type and duration rules for one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRules {
    pub max_size: u64,
    pub allowed_types: Vec<String>,
    pub duration: Option<DurationBounds>,
}

impl FileRules {
    /// Video rule: at most 500 MB, MP4 or QuickTime.
    #[must_use]
    pub fn video() -> Self {
        Self {
            max_size: 500 * MEGABYTE,
            allowed_types: vec![String::from("video/mp4"), String::from("video/quicktime")],
            duration: None,
        }
    }

    /// Image rule: at most 10 MB, JPEG or PNG.
    #[must_use]
    pub fn image() -> Self {
        Self {
            max_size: 10 * MEGABYTE,
            allowed_types: vec![String::from("image/jpeg"), String::from("image/png")],
            duration: None,
        }
    }

    /// Document rule: at most 5 MB, PDF, JPEG or PNG.
    #[must_use]
    pub fn document() -> Self {
        Self {
            max_size: 5 * MEGABYTE,
            allowed_types: vec![
                String::from("application/pdf"),
                String::from("image/jpeg"),
                String::from("image/png"),
            ],
            duration: None,
        }
    }

    /// Returns a copy of these rules with a duration window.
    #[must_use]
    pub fn with_duration(mut self, bounds: DurationBounds) -> Self {
        self.duration = Some(bounds);
        self
    }
}

/// Rules for all three slots.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRuleSet {
    pub film: FileRules,
    pub poster: FileRules,
    pub proof: FileRules,
}

impl Default for FileRuleSet {
    fn default() -> Self {
        Self {
            film: FileRules::video(),
            poster: FileRules::image(),
            proof: FileRules::document(),
        }
    }
}

impl FileRuleSet {
    /// Rules that apply to `slot`.
    #[must_use]
    pub const fn for_slot(&self, slot: FileSlot) -> &FileRules {
        match slot {
            FileSlot::Film => &self.film,
            FileSlot::Poster => &self.poster,
            FileSlot::Proof => &self.proof,
        }
    }
}

/// Why a file failed its slot rules.
#[derive(Debug, Clone, PartialEq)]
pub enum FileRejection {
    /// The file is larger than the slot allows.
    TooLarge { size: u64, max_size: u64 },
    /// The MIME type is not in the allowed list.
    UnsupportedType {
        content_type: String,
        allowed: Vec<String>,
    },
    /// The video duration is outside the configured window.
    DurationOutOfRange {
        seconds: f64,
        bounds: DurationBounds,
    },
    /// The video container carries no readable duration.
    DurationUnreadable,
}

impl std::fmt::Display for FileRejection {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLarge { size, max_size } => write!(
                f,
                "File size {:.1} MB exceeds the {:.0} MB limit",
                *size as f64 / MEGABYTE as f64,
                *max_size as f64 / MEGABYTE as f64
            ),
            Self::UnsupportedType {
                content_type,
                allowed,
            } => write!(
                f,
                "File type '{content_type}' is not allowed (allowed: {})",
                allowed.join(", ")
            ),
            Self::DurationOutOfRange { seconds, bounds } => write!(
                f,
                "Video duration {seconds:.0}s is outside the allowed range {:.0}s-{:.0}s",
                bounds.min_seconds, bounds.max_seconds
            ),
            Self::DurationUnreadable => write!(f, "Video duration could not be determined"),
        }
    }
}

impl std::error::Error for FileRejection {}

/// Validates a file against the rules of its slot.
///
/// Rules are checked in order (size, type, duration) and the first
/// failing rule is returned. Duration is only probed for video files
/// when bounds are configured, and only the container header is read.
///
/// # Errors
///
/// Returns the first rule the file violates.
pub fn validate_file(file: &LocalFile, rules: &FileRules) -> Result<(), FileRejection> {
    check_size_and_type(file.size(), &file.content_type, rules)?;

    if let Some(bounds) = rules.duration
        && file.is_video()
    {
        let seconds: f64 =
            probe_duration_seconds(&file.data).ok_or(FileRejection::DurationUnreadable)?;
        if seconds < bounds.min_seconds || seconds > bounds.max_seconds {
            return Err(FileRejection::DurationOutOfRange { seconds, bounds });
        }
    }

    Ok(())
}

/// Re-checks an already uploaded file against the rules of its slot.
///
/// Only the recorded size and type can be checked; the duration needs
/// the bytes and was checked when the file was uploaded.
///
/// # Errors
///
/// Returns the first rule the recorded metadata violates.
pub fn validate_stored_file(file: &FileMetadata, rules: &FileRules) -> Result<(), FileRejection> {
    check_size_and_type(file.file_size, &file.file_type, rules)
}

fn check_size_and_type(
    size: u64,
    content_type: &str,
    rules: &FileRules,
) -> Result<(), FileRejection> {
    if size > rules.max_size {
        return Err(FileRejection::TooLarge {
            size,
            max_size: rules.max_size,
        });
    }

    if !rules.allowed_types.iter().any(|allowed| allowed == content_type) {
        return Err(FileRejection::UnsupportedType {
            content_type: content_type.to_string(),
            allowed: rules.allowed_types.clone(),
        });
    }

    Ok(())
}

/// Replaces every character outside `[A-Za-z0-9.-]` with `_`.
#[must_use]
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Builds the storage path `{submission_id}/{slot}/{millis}_{sanitized_name}`.
///
/// The millisecond timestamp keeps repeated uploads of the same file
/// name into the same slot from colliding.
#[must_use]
pub fn generate_file_path(
    submission_id: &str,
    slot: FileSlot,
    file_name: &str,
    at: OffsetDateTime,
) -> String {
    let millis: i128 = at.unix_timestamp_nanos() / 1_000_000;
    format!(
        "{submission_id}/{}/{millis}_{}",
        slot.as_str(),
        sanitize_file_name(file_name)
    )
}
