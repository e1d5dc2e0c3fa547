// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export and printable summaries of applications.

use filmfest::Locale;
use filmfest_domain::{Application, FileSlot, Participant, Person};
use std::fmt::Write as _;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::ApiError;

/// Column header of [`export_csv`].
pub const EXPORT_HEADER: [&str; 14] = [
    "id",
    "category",
    "title",
    "participant",
    "email",
    "status",
    "review_status",
    "flagged",
    "average_total",
    "score_count",
    "submitted_at",
    "film_url",
    "poster_url",
    "proof_url",
];

/// Renders one CSV row per application under [`EXPORT_HEADER`].
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn export_csv(applications: &[Application]) -> Result<String, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER).map_err(csv_error)?;

    for application in applications {
        let holder: &Person = application.content.participant.role_holder();
        let average: String = application
            .review
            .average_score()
            .map_or_else(String::new, |avg| format!("{avg:.2}"));
        let file_url = |slot: FileSlot| {
            application
                .files
                .get(slot)
                .map_or_else(String::new, |m| m.download_url.clone())
        };

        writer
            .write_record([
                application.id.clone(),
                application.category().as_str().to_string(),
                application.content.film.title.clone(),
                holder.name.clone(),
                holder.email.clone(),
                application.status.as_str().to_string(),
                application.review.review_status.as_str().to_string(),
                application.review.flagged.to_string(),
                average,
                application.review.scores.len().to_string(),
                format_timestamp(application.submitted_at),
                file_url(FileSlot::Film),
                file_url(FileSlot::Poster),
                file_url(FileSlot::Proof),
            ])
            .map_err(csv_error)?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("Failed to flush CSV export: {e}"),
    })?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal {
        message: format!("CSV export is not valid UTF-8: {e}"),
    })
}

fn csv_error(err: csv::Error) -> ApiError {
    ApiError::Internal {
        message: format!("Failed to write CSV export: {err}"),
    }
}

fn format_timestamp(at: Option<OffsetDateTime>) -> String {
    at.and_then(|t| t.format(&Rfc3339).ok()).unwrap_or_default()
}

struct SummaryLabels {
    heading: &'static str,
    title: &'static str,
    category: &'static str,
    status: &'static str,
    genres: &'static str,
    duration: &'static str,
    minutes: &'static str,
    synopsis: &'static str,
    participant: &'static str,
    affiliation: &'static str,
    crew: &'static str,
    files: &'static str,
    missing: &'static str,
    submitted: &'static str,
}

const fn labels(locale: Locale) -> SummaryLabels {
    match locale {
        Locale::En => SummaryLabels {
            heading: "Film Festival Application",
            title: "Title",
            category: "Category",
            status: "Status",
            genres: "Genres",
            duration: "Duration",
            minutes: "min",
            synopsis: "Synopsis",
            participant: "Applicant",
            affiliation: "Affiliation",
            crew: "Crew",
            files: "Files",
            missing: "not uploaded",
            submitted: "Submitted",
        },
        Locale::Th => SummaryLabels {
            heading: "ใบสมัครเทศกาลภาพยนตร์",
            title: "ชื่อเรื่อง",
            category: "ประเภท",
            status: "สถานะ",
            genres: "แนว",
            duration: "ความยาว",
            minutes: "นาที",
            synopsis: "เรื่องย่อ",
            participant: "ผู้สมัคร",
            affiliation: "สังกัด",
            crew: "ทีมงาน",
            files: "ไฟล์",
            missing: "ยังไม่อัปโหลด",
            submitted: "ส่งเมื่อ",
        },
    }
}

/// Renders a plain-text summary of one application for printing.
#[must_use]
pub fn print_summary(application: &Application, locale: Locale) -> String {
    let l: SummaryLabels = labels(locale);
    let film = &application.content.film;
    let holder: &Person = application.content.participant.role_holder();

    // Writing to a String cannot fail.
    let mut out: String = String::new();
    let _ = writeln!(out, "{}", l.heading);
    let _ = writeln!(out, "{}", "=".repeat(l.heading.chars().count()));
    match &film.title_th {
        Some(title_th) => {
            let _ = writeln!(out, "{}: {} ({title_th})", l.title, film.title);
        }
        None => {
            let _ = writeln!(out, "{}: {}", l.title, film.title);
        }
    }
    let _ = writeln!(out, "{}: {}", l.category, application.category());
    let _ = writeln!(out, "{}: {}", l.status, application.status);
    if let Some(submitted_at) = application.submitted_at {
        let _ = writeln!(out, "{}: {}", l.submitted, format_timestamp(Some(submitted_at)));
    }
    if !film.genres.is_empty() {
        let genres: Vec<&str> = film.genres.iter().map(String::as_str).collect();
        let _ = writeln!(out, "{}: {}", l.genres, genres.join(", "));
    }
    if let Some(minutes) = film.duration_minutes {
        let _ = writeln!(out, "{}: {minutes} {}", l.duration, l.minutes);
    }
    let _ = writeln!(out, "{}: {}", l.synopsis, film.synopsis);

    let _ = writeln!(out);
    let _ = writeln!(out, "{}: {} <{}> {}", l.participant, holder.name, holder.email, holder.phone);
    match &application.content.participant {
        Participant::Youth { school, .. } => {
            let _ = writeln!(
                out,
                "{}: {} ({})",
                l.affiliation, school.school_name, school.student_id
            );
        }
        Participant::Future { university, .. } => {
            let _ = writeln!(
                out,
                "{}: {}, {} ({})",
                l.affiliation, university.university_name, university.faculty, university.university_id
            );
        }
        Participant::World { .. } => {}
    }

    if !application.content.crew.is_empty() {
        let _ = writeln!(out, "{}:", l.crew);
        for member in &application.content.crew {
            let role: &str = match (&member.role_other, member.role) {
                (Some(other), _) if !other.trim().is_empty() => other.as_str(),
                (_, Some(role)) => role.as_str(),
                _ => "-",
            };
            let _ = writeln!(out, "  - {} ({role})", member.name);
        }
    }

    let _ = writeln!(out, "{}:", l.files);
    for slot in FileSlot::ALL {
        match application.files.get(slot) {
            Some(metadata) => {
                let _ = writeln!(out, "  {}: {}", slot.label(), metadata.file_name);
            }
            None => {
                let _ = writeln!(out, "  {}: {}", slot.label(), l.missing);
            }
        }
    }
    out
}
