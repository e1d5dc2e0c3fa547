// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation of application content.
//!
//! Drafts are save-anytime: in [`ValidationMode::Draft`] no rule is
//! enforced and only warnings are produced. Final submission runs every
//! rule and collects all failures instead of stopping at the first.

use crate::files::{FileMetadata, FileRuleSet, FileSlot, FileSlots, validate_stored_file};
use crate::types::{
    Agreements, ApplicationContent, Category, CrewMember, FilmDetails, Participant,
    ParticipantRole, Person,
};
use std::ops::RangeInclusive;

/// Recommended film length in minutes. Outside this band is a warning only.
pub const RECOMMENDED_DURATION_MINUTES: RangeInclusive<u32> = 5..=10;

/// Whether rules are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Nothing is enforced.
    Draft,
    /// Every rule is enforced.
    Final,
}

/// A rule violation on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted field path, e.g. `crew[1].email`.
    pub field: String,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human readable message.
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// An advisory finding that never blocks a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWarning {
    pub field: String,
    pub message: String,
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
    pub warnings: Vec<FieldWarning>,
}

impl ValidationReport {
    /// Returns true when no errors were found. Warnings do not count.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All error messages joined with `"; "`.
    #[must_use]
    pub fn joined_errors(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn error(&mut self, field: impl Into<String>, code: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, code, message));
    }

    fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(FieldWarning {
            field: field.into(),
            message: message.into(),
        });
    }

    fn require(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.error(field, "required", format!("{label} is required"));
        }
    }
}

/// Checks an email address has the shape `local@domain.tld`.
///
/// This is a shape check only: one `@`, a non-empty local part, and a
/// domain with a dot that neither starts nor ends the domain.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let email: &str = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

/// Validates application content.
///
/// In draft mode the duration warning is still reported so the form can
/// show it, but nothing is enforced.
#[must_use]
pub fn validate_content(content: &ApplicationContent, mode: ValidationMode) -> ValidationReport {
    let mut report = ValidationReport::default();
    let category: Category = content.category();

    validate_film(&content.film, &mut report);
    validate_participant(&content.participant, &mut report);
    for (index, member) in content.crew.iter().enumerate() {
        validate_crew_member(index, member, category, &mut report);
    }
    validate_agreements(&content.agreements, &mut report);

    if mode == ValidationMode::Draft {
        report.errors.clear();
    }
    report
}

/// One error per missing file slot, e.g. "Poster file is required".
#[must_use]
pub fn required_file_errors<T>(files: &FileSlots<T>) -> Vec<FieldError> {
    files
        .missing()
        .into_iter()
        .map(|slot: FileSlot| {
            FieldError::new(
                format!("files.{}", slot.document_key()),
                "required",
                format!("{} file is required", slot.label()),
            )
        })
        .collect()
}

/// One error per stored file that breaks the rules of its slot.
#[must_use]
pub fn stored_file_errors(
    files: &FileSlots<FileMetadata>,
    rules: &FileRuleSet,
) -> Vec<FieldError> {
    files
        .iter()
        .filter_map(|(slot, file)| {
            validate_stored_file(file, rules.for_slot(slot))
                .err()
                .map(|rejection| {
                    FieldError::new(
                        format!("files.{}", slot.document_key()),
                        "invalid",
                        format!("{} file is invalid: {rejection}", slot.label()),
                    )
                })
        })
        .collect()
}

fn validate_film(film: &FilmDetails, report: &mut ValidationReport) {
    report.require("film.title", &film.title, "Film title");
    report.require("film.synopsis", &film.synopsis, "Synopsis");

    if film.genres.is_empty() {
        report.error(
            "film.genres",
            "required",
            "At least one genre must be selected",
        );
    }
    if film.format.is_none() {
        report.error("film.format", "required", "Film format is required");
    }

    match film.duration_minutes {
        None | Some(0) => report.error(
            "film.duration_minutes",
            "invalid-duration",
            "Duration must be a positive number of minutes",
        ),
        Some(minutes) if !RECOMMENDED_DURATION_MINUTES.contains(&minutes) => report.warn(
            "film.duration_minutes",
            format!(
                "Recommended duration is {}-{} minutes",
                RECOMMENDED_DURATION_MINUTES.start(),
                RECOMMENDED_DURATION_MINUTES.end()
            ),
        ),
        Some(_) => {}
    }
}

fn validate_participant(participant: &Participant, report: &mut ValidationReport) {
    let category: Category = participant.category();
    let prefix: &str = match participant {
        Participant::World { .. } => "director",
        Participant::Youth { .. } | Participant::Future { .. } => "submitter",
    };
    validate_person(prefix, participant.role_holder(), category, report);

    match participant {
        Participant::Youth { school, .. } => {
            report.require("school.school_name", &school.school_name, "School name");
            report.require("school.student_id", &school.student_id, "Student ID");
        }
        Participant::Future { university, .. } => {
            report.require(
                "university.university_name",
                &university.university_name,
                "University name",
            );
            report.require("university.faculty", &university.faculty, "Faculty");
            report.require(
                "university.university_id",
                &university.university_id,
                "University ID",
            );
        }
        Participant::World { .. } => {}
    }
}

fn validate_person(prefix: &str, person: &Person, category: Category, report: &mut ValidationReport) {
    report.require(&format!("{prefix}.name"), &person.name, "Name");
    report.require(&format!("{prefix}.phone"), &person.phone, "Phone");

    if person.email.trim().is_empty() {
        report.error(format!("{prefix}.email"), "required", "Email is required");
    } else if !is_valid_email(&person.email) {
        report.error(
            format!("{prefix}.email"),
            "invalid-email",
            "Email address is not valid",
        );
    }

    validate_role(prefix, person.role, person.role_other.as_deref(), report);

    let range: RangeInclusive<u8> = category.participant_age_range();
    match person.age {
        None => report.error(format!("{prefix}.age"), "required", "Age is required"),
        Some(age) if !range.contains(&age) => report.error(
            format!("{prefix}.age"),
            "invalid-age",
            format!(
                "Age must be between {} and {} for the {category} category",
                range.start(),
                range.end()
            ),
        ),
        Some(_) => {}
    }
}

fn validate_role(
    prefix: &str,
    role: Option<ParticipantRole>,
    role_other: Option<&str>,
    report: &mut ValidationReport,
) {
    match role {
        None => report.error(format!("{prefix}.role"), "required", "Role is required"),
        Some(ParticipantRole::Other) if role_other.is_none_or(|r| r.trim().is_empty()) => {
            report.error(
                format!("{prefix}.role_other"),
                "required",
                "Please specify the role",
            );
        }
        Some(_) => {}
    }
}

fn validate_crew_member(
    index: usize,
    member: &CrewMember,
    category: Category,
    report: &mut ValidationReport,
) {
    let prefix: String = format!("crew[{index}]");
    report.require(&format!("{prefix}.name"), &member.name, "Crew member name");
    validate_role(&prefix, member.role, member.role_other.as_deref(), report);

    if let Some(email) = member.email.as_deref()
        && !email.trim().is_empty()
        && !is_valid_email(email)
    {
        report.error(
            format!("{prefix}.email"),
            "invalid-email",
            "Crew member email address is not valid",
        );
    }

    if let (Some(age), Some(limit)) = (member.age, category.crew_age_limit())
        && age > limit
    {
        report.error(
            format!("{prefix}.age"),
            "invalid-age",
            format!("Crew members must be at most {limit} years old for the {category} category"),
        );
    }
}

fn validate_agreements(agreements: &Agreements, report: &mut ValidationReport) {
    if !agreements.all_accepted() {
        report.error(
            "agreements",
            "agreements-required",
            "All agreements must be accepted",
        );
    }
}
