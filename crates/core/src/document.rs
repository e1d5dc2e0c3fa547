// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mapping between forms and stored documents.
//!
//! Writes always produce the current shape, with an explicit `null` for
//! every absent optional field. Reads go through [`read_application`],
//! the one place that tolerates older shapes: legacy flat field names
//! and alternative key spellings are resolved there and nowhere else.

use filmfest_domain::{
    Agreements, Application, ApplicationContent, ApplicationStatus, Category, CrewMember,
    FileMetadata, FileSlot, FileSlots, FilmDetails, FilmFormat, FormDraft, Participant,
    ParticipantRole, Person, ReviewRecord, ReviewStatus, SchoolAffiliation, ScoreCriteria,
    ScoreEntry, UniversityAffiliation,
};
use filmfest_persistence::{Document, Fields, Patch};
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

use crate::error::MalformedDocument;

fn rfc3339(at: OffsetDateTime) -> Value {
    at.format(&Rfc3339).map_or(Value::Null, Value::String)
}

fn person_value(person: &Person) -> Value {
    json!({
        "name": person.name,
        "nameTh": person.name_th,
        "age": person.age,
        "phone": person.phone,
        "email": person.email,
        "role": person.role.map(|r| r.as_str()),
        "roleOther": person.role_other,
    })
}

fn crew_value(member: &CrewMember) -> Value {
    json!({
        "name": member.name,
        "nameTh": member.name_th,
        "role": member.role.map(|r| r.as_str()),
        "roleOther": member.role_other,
        "age": member.age,
        "phone": member.phone,
        "email": member.email,
        "schoolName": member.school_name,
        "studentId": member.student_id,
    })
}

fn film_value(film: &FilmDetails) -> Value {
    json!({
        "title": film.title,
        "titleTh": film.title_th,
        "genres": film.genres,
        "format": film.format.map(|f| f.as_str()),
        "durationMinutes": film.duration_minutes,
        "synopsis": film.synopsis,
        "localConnection": film.local_connection,
    })
}

fn agreements_value(agreements: &Agreements) -> Value {
    json!({
        "rulesAccepted": agreements.rules_accepted,
        "rightsConfirmed": agreements.rights_confirmed,
        "originalityConfirmed": agreements.originality_confirmed,
        "privacyConsent": agreements.privacy_consent,
    })
}

/// Stored shape of one file slot, or `null`.
#[must_use]
pub fn file_value(metadata: Option<&FileMetadata>) -> Value {
    metadata.map_or(Value::Null, |m| {
        json!({
            "fileName": m.file_name,
            "fileSize": m.file_size,
            "fileType": m.file_type,
            "storagePath": m.storage_path,
            "downloadURL": m.download_url,
            "uploadedAt": rfc3339(m.uploaded_at),
        })
    })
}

/// Stored shape of a score list. `totalScore` is written from the criteria.
#[must_use]
pub fn scores_value(scores: &[ScoreEntry]) -> Value {
    Value::Array(
        scores
            .iter()
            .map(|s| {
                json!({
                    "graderId": s.grader_id,
                    "graderName": s.grader_name,
                    "technical": s.criteria.technical,
                    "story": s.criteria.story,
                    "creativity": s.criteria.creativity,
                    "overall": s.criteria.overall,
                    "totalScore": s.total(),
                    "comment": s.comment,
                    "scoredAt": rfc3339(s.scored_at),
                })
            })
            .collect(),
    )
}

/// Writes every content field of the form, fanned out by category.
fn with_content(mut patch: Patch, content: &ApplicationContent) -> Patch {
    patch = patch
        .set("category", content.category().as_str())
        .set("film", film_value(&content.film));

    patch = match &content.participant {
        Participant::Youth { submitter, school } => patch
            .set("submitter", person_value(submitter))
            .set(
                "school",
                json!({
                    "schoolName": school.school_name,
                    "studentId": school.student_id,
                }),
            ),
        Participant::Future {
            submitter,
            university,
        } => patch.set("submitter", person_value(submitter)).set(
            "university",
            json!({
                "universityName": university.university_name,
                "faculty": university.faculty,
                "universityId": university.university_id,
            }),
        ),
        Participant::World { director } => patch.set("director", person_value(director)),
    };

    patch
        .set(
            "crew",
            Value::Array(content.crew.iter().map(crew_value).collect()),
        )
        .set("agreements", agreements_value(&content.agreements))
}

fn with_review_defaults(patch: Patch) -> Patch {
    patch
        .set("scores", Value::Array(Vec::new()))
        .set("reviewStatus", ReviewStatus::Pending.as_str())
        .set("flagged", false)
        .set_null("flagReason")
        .set_null("adminNotes")
        .set("assignedReviewers", Value::Array(Vec::new()))
}

fn new_document_patch(form: &FormDraft, files: &FileSlots<FileMetadata>) -> Patch {
    let mut patch: Patch = Patch::new()
        .set("userId", form.user_id.clone())
        .set("applicationId", form.application_id.clone());
    patch = with_content(patch, &form.content);
    for slot in FileSlot::ALL {
        patch = patch.set(
            format!("files.{}", slot.document_key()),
            file_value(files.get(slot)),
        );
    }
    with_review_defaults(patch)
        .set_null("withdrawnAt")
        .set_null("deletedAt")
        .server_timestamp("createdAt")
        .server_timestamp("lastModified")
}

/// Patch creating a new draft document.
///
/// Missing files are written as `null`.
#[must_use]
pub fn draft_document_patch(form: &FormDraft, files: &FileSlots<FileMetadata>) -> Patch {
    new_document_patch(form, files)
        .set("status", ApplicationStatus::Draft.as_str())
        .set_null("submittedAt")
}

/// Patch creating a new submitted document.
#[must_use]
pub fn submitted_document_patch(form: &FormDraft, files: &FileSlots<FileMetadata>) -> Patch {
    new_document_patch(form, files)
        .set("status", ApplicationStatus::Submitted.as_str())
        .server_timestamp("submittedAt")
}

/// Patch writing the form's content over an existing draft.
///
/// Only slots present in `uploaded` are written; other stored files are
/// left untouched.
#[must_use]
pub fn draft_update_patch(form: &FormDraft, uploaded: &FileSlots<FileMetadata>) -> Patch {
    let mut patch: Patch = with_content(Patch::new(), &form.content);
    for (slot, metadata) in uploaded.iter() {
        patch = patch.set(
            format!("files.{}", slot.document_key()),
            file_value(Some(metadata)),
        );
    }
    patch.server_timestamp("lastModified")
}

/// Looks up the first non-null value among `keys`.
fn first<'a>(fields: &'a Fields, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

fn as_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_u8(value: Option<&Value>) -> Option<u8> {
    as_u64(value).and_then(|n| u8::try_from(n).ok())
}

fn as_u32(value: Option<&Value>) -> Option<u32> {
    as_u64(value).and_then(|n| u32::try_from(n).ok())
}

fn as_bool(value: Option<&Value>) -> bool {
    value.and_then(Value::as_bool).unwrap_or(false)
}

fn as_timestamp(value: Option<&Value>) -> Option<OffsetDateTime> {
    value
        .and_then(Value::as_str)
        .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok())
}

fn as_strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| as_string(Some(item)))
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// A block that is either a nested object or legacy flat fields.
struct Block<'a> {
    nested: Option<&'a Fields>,
    root: &'a Fields,
    legacy_prefix: &'a str,
}

impl<'a> Block<'a> {
    fn new(root: &'a Fields, key: &str, legacy_prefix: &'a str) -> Self {
        Self {
            nested: root.get(key).and_then(Value::as_object),
            root,
            legacy_prefix,
        }
    }

    /// Reads `keys` from the nested object, falling back to the flat
    /// `{legacy_prefix}{Suffix}` field at the root.
    fn value(&self, keys: &[&str], legacy_suffix: &str) -> Option<&'a Value> {
        self.nested.and_then(|o| first(o, keys)).or_else(|| {
            let legacy: String = format!("{}{legacy_suffix}", self.legacy_prefix);
            first(self.root, &[legacy.as_str()])
        })
    }

    fn string(&self, keys: &[&str], legacy_suffix: &str) -> String {
        as_string(self.value(keys, legacy_suffix)).unwrap_or_default()
    }

    fn optional(&self, keys: &[&str], legacy_suffix: &str) -> Option<String> {
        as_string(self.value(keys, legacy_suffix))
    }
}

fn read_role(value: Option<&Value>) -> Option<ParticipantRole> {
    value
        .and_then(Value::as_str)
        .and_then(|s| ParticipantRole::from_str(s).ok())
}

fn read_person(fields: &Fields, key: &str) -> Person {
    let block: Block<'_> = Block::new(fields, key, key);
    Person {
        name: block.string(&["name", "fullName"], "Name"),
        name_th: block.optional(&["nameTh", "fullNameTh"], "NameTh"),
        age: as_u8(block.value(&["age"], "Age")),
        phone: block.string(&["phone", "phoneNumber"], "Phone"),
        email: block.string(&["email"], "Email"),
        role: read_role(block.value(&["role"], "Role")),
        role_other: block.optional(&["roleOther", "customRole"], "RoleOther"),
    }
}

fn read_crew_member(fields: &Fields) -> CrewMember {
    CrewMember {
        name: as_string(first(fields, &["name", "fullName"])).unwrap_or_default(),
        name_th: as_string(first(fields, &["nameTh", "fullNameTh"])),
        role: read_role(first(fields, &["role"])),
        role_other: as_string(first(fields, &["roleOther", "customRole"])),
        age: as_u8(first(fields, &["age"])),
        phone: as_string(first(fields, &["phone", "phoneNumber"])),
        email: as_string(first(fields, &["email"])),
        school_name: as_string(first(fields, &["schoolName"])),
        student_id: as_string(first(fields, &["studentId"])),
    }
}

fn read_film(fields: &Fields) -> FilmDetails {
    let block: Block<'_> = Block::new(fields, "film", "film");
    let genres: BTreeSet<String> = as_strings(
        block
            .value(&["genres", "genre"], "Genres")
            .or_else(|| first(fields, &["genres", "genre"])),
    )
    .into_iter()
    .collect();

    FilmDetails {
        title: block.string(&["title"], "Title"),
        title_th: block.optional(&["titleTh"], "TitleTh"),
        genres,
        format: block
            .value(&["format"], "Format")
            .or_else(|| first(fields, &["format"]))
            .and_then(Value::as_str)
            .and_then(|s| FilmFormat::from_str(s).ok()),
        duration_minutes: as_u32(
            block
                .value(&["durationMinutes", "duration"], "Duration")
                .or_else(|| first(fields, &["duration"])),
        ),
        synopsis: block
            .optional(&["synopsis"], "Synopsis")
            .or_else(|| as_string(first(fields, &["synopsis"])))
            .unwrap_or_default(),
        local_connection: block
            .optional(&["localConnection"], "LocalConnection")
            .or_else(|| as_string(first(fields, &["localConnection"]))),
    }
}

fn read_category(document: &Document) -> Result<Category, MalformedDocument> {
    let fields: &Fields = &document.fields;
    if let Some(raw) = first(fields, &["category", "competitionCategory"]).and_then(Value::as_str)
    {
        return Category::from_str(raw).map_err(|e| MalformedDocument {
            document_id: document.id.clone(),
            reason: e.to_string(),
        });
    }

    // Documents predating the category field are recognised by shape.
    if fields.contains_key("director") || fields.contains_key("directorName") {
        Ok(Category::World)
    } else if fields.contains_key("university") || fields.contains_key("universityName") {
        Ok(Category::Future)
    } else if fields.contains_key("school") || fields.contains_key("schoolName") {
        Ok(Category::Youth)
    } else {
        Err(MalformedDocument {
            document_id: document.id.clone(),
            reason: String::from("competition category is missing"),
        })
    }
}

fn read_participant(fields: &Fields, category: Category) -> Participant {
    match category {
        Category::Youth => {
            let school: Block<'_> = Block::new(fields, "school", "");
            Participant::Youth {
                submitter: read_person(fields, "submitter"),
                school: SchoolAffiliation {
                    school_name: school.string(&["schoolName"], "schoolName"),
                    student_id: school.string(&["studentId"], "studentId"),
                },
            }
        }
        Category::Future => {
            let university: Block<'_> = Block::new(fields, "university", "");
            Participant::Future {
                submitter: read_person(fields, "submitter"),
                university: UniversityAffiliation {
                    university_name: university.string(&["universityName"], "universityName"),
                    faculty: university.string(&["faculty"], "faculty"),
                    university_id: university.string(&["universityId"], "universityId"),
                },
            }
        }
        Category::World => Participant::World {
            director: read_person(fields, "director"),
        },
    }
}

fn read_agreements(fields: &Fields) -> Agreements {
    let block: Block<'_> = Block::new(fields, "agreements", "");
    Agreements {
        rules_accepted: as_bool(block.value(&["rulesAccepted"], "rulesAccepted")),
        rights_confirmed: as_bool(block.value(&["rightsConfirmed"], "rightsConfirmed")),
        originality_confirmed: as_bool(
            block.value(&["originalityConfirmed"], "originalityConfirmed"),
        ),
        privacy_consent: as_bool(block.value(&["privacyConsent"], "privacyConsent")),
    }
}

fn read_file(value: Option<&Value>) -> Option<FileMetadata> {
    let fields: &Fields = value?.as_object()?;
    let storage_path: String = as_string(first(fields, &["storagePath", "path"]))?;
    Some(FileMetadata {
        file_name: as_string(first(fields, &["fileName", "name"])).unwrap_or_default(),
        file_size: as_u64(first(fields, &["fileSize", "size"])).unwrap_or(0),
        file_type: as_string(first(fields, &["fileType", "type", "contentType"]))
            .unwrap_or_default(),
        storage_path,
        download_url: as_string(first(fields, &["downloadURL", "downloadUrl", "url"]))
            .unwrap_or_default(),
        uploaded_at: as_timestamp(first(fields, &["uploadedAt"]))
            .unwrap_or(OffsetDateTime::UNIX_EPOCH),
    })
}

fn read_files(fields: &Fields) -> FileSlots<FileMetadata> {
    let block: Block<'_> = Block::new(fields, "files", "");
    let mut files: FileSlots<FileMetadata> = FileSlots::default();
    for slot in FileSlot::ALL {
        let key: &str = slot.document_key();
        files.set(slot, read_file(block.value(&[key], key)));
    }
    files
}

fn read_score(document_id: &str, value: &Value) -> Option<ScoreEntry> {
    let fields: &Fields = value.as_object()?;
    let grader_id: String = as_string(first(fields, &["graderId", "adminId", "reviewerId"]))?;
    let criteria = ScoreCriteria::new(
        as_u8(first(fields, &["technical"])).unwrap_or(0),
        as_u8(first(fields, &["story"])).unwrap_or(0),
        as_u8(first(fields, &["creativity"])).unwrap_or(0),
        as_u8(first(fields, &["overall"])).unwrap_or(0),
    );
    match criteria {
        Ok(criteria) => Some(ScoreEntry {
            grader_id,
            grader_name: as_string(first(fields, &["graderName", "adminName"])),
            criteria,
            comment: as_string(first(fields, &["comment"])),
            scored_at: as_timestamp(first(fields, &["scoredAt", "createdAt", "timestamp"]))
                .unwrap_or(OffsetDateTime::UNIX_EPOCH),
        }),
        Err(e) => {
            warn!(document_id, grader_id, error = %e, "Skipping stored score out of range");
            None
        }
    }
}

fn read_review(document_id: &str, fields: &Fields) -> ReviewRecord {
    let scores: Vec<ScoreEntry> = match first(fields, &["scores"]) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| read_score(document_id, item))
            .collect(),
        _ => Vec::new(),
    };

    ReviewRecord {
        scores,
        admin_notes: as_string(first(fields, &["adminNotes", "notes"])),
        review_status: first(fields, &["reviewStatus"])
            .and_then(Value::as_str)
            .and_then(|s| ReviewStatus::from_str(s).ok())
            .unwrap_or_default(),
        flagged: as_bool(first(fields, &["flagged"])),
        flag_reason: as_string(first(fields, &["flagReason"])),
        assigned_reviewers: as_strings(first(fields, &["assignedReviewers"])),
    }
}

/// Normalizes a stored document into an [`Application`].
///
/// Absent fields take their defaults; a missing status reads as draft.
///
/// # Errors
///
/// Returns an error when the category cannot be determined or the
/// status is not a known value.
pub fn read_application(document: &Document) -> Result<Application, MalformedDocument> {
    let fields: &Fields = &document.fields;
    let category: Category = read_category(document)?;

    let status: ApplicationStatus = match first(fields, &["status"]).and_then(Value::as_str) {
        Some(raw) => ApplicationStatus::from_str(raw).map_err(|e| MalformedDocument {
            document_id: document.id.clone(),
            reason: e.to_string(),
        })?,
        None => ApplicationStatus::Draft,
    };

    let crew: Vec<CrewMember> = match first(fields, &["crew", "crewMembers"]) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(read_crew_member)
            .collect(),
        _ => Vec::new(),
    };

    Ok(Application {
        id: document.id.clone(),
        user_id: as_string(first(fields, &["userId", "uid"])).unwrap_or_default(),
        application_id: as_string(first(fields, &["applicationId"])).unwrap_or_default(),
        content: ApplicationContent {
            film: read_film(fields),
            participant: read_participant(fields, category),
            crew,
            agreements: read_agreements(fields),
        },
        files: read_files(fields),
        status,
        created_at: as_timestamp(first(fields, &["createdAt"])),
        last_modified: as_timestamp(first(fields, &["lastModified", "updatedAt"])),
        submitted_at: as_timestamp(first(fields, &["submittedAt"])),
        withdrawn_at: as_timestamp(first(fields, &["withdrawnAt"])),
        deleted_at: as_timestamp(first(fields, &["deletedAt"])),
        review: read_review(&document.id, fields),
    })
}
