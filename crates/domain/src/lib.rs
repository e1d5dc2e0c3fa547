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

mod application;
mod application_status;
mod error;
mod files;
mod media;
mod scoring;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use application::{Application, FormDraft, ReviewRecord};
pub use application_status::{ApplicationOperation, ApplicationStatus, ReviewStatus};
pub use error::DomainError;
pub use files::{
    DurationBounds, FileKind, FileMetadata, FileRejection, FileRuleSet, FileRules, FileSlot,
    FileSlots, LocalFile, generate_file_path, sanitize_file_name, validate_file,
    validate_stored_file,
};
pub use media::probe_duration_seconds;
pub use scoring::{MAX_CRITERION_SCORE, ScoreCriteria, ScoreEntry, average_total, upsert_score};
pub use types::{
    Agreements, ApplicationContent, Category, CrewMember, FilmDetails, FilmFormat, Participant,
    ParticipantRole, Person, SchoolAffiliation, UniversityAffiliation,
};
pub use validation::{
    FieldError, FieldWarning, RECOMMENDED_DURATION_MINUTES, ValidationMode, ValidationReport,
    is_valid_email, required_file_errors, stored_file_errors, validate_content,
};
