// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use filmfest_domain::{
    Application, ApplicationContent, Category, FileMetadata, FileSlot, ReviewStatus, ScoreCriteria,
    ScoreEntry,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{ApiError, translate_domain_error};
use crate::review::ApplicationFilter;

/// API request to create an applicant account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// API request to sign in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// API response for a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignInResponse {
    /// The session token (opaque). Sent back as a bearer token.
    pub session_token: String,
    pub uid: String,
    pub email: String,
    pub role: String,
}

/// API request to confirm an email address.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// API response after a verification email is issued.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VerificationIssuedResponse {
    /// The one-time token. Delivered by mail in production setups.
    pub token: String,
}

/// The JSON `form` part of a draft or submit request.
///
/// The owner is always the signed-in account, never a payload field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct FormPayload {
    /// Client-generated token; the storage root for this form's files.
    pub application_id: String,
    /// Set when the form edits an existing draft.
    #[serde(default)]
    pub document_id: Option<String>,
    pub content: ApplicationContent,
}

/// File metadata of every slot; missing files are `null`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FilesView {
    pub film: Option<FileMetadata>,
    pub poster: Option<FileMetadata>,
    pub proof: Option<FileMetadata>,
}

/// One grader's score as shown to admins.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScoreView {
    pub grader_id: String,
    pub grader_name: Option<String>,
    pub technical: u8,
    pub story: u8,
    pub creativity: u8,
    pub overall: u8,
    pub total_score: u8,
    pub comment: Option<String>,
    pub scored_at: String,
}

impl From<&ScoreEntry> for ScoreView {
    fn from(entry: &ScoreEntry) -> Self {
        Self {
            grader_id: entry.grader_id.clone(),
            grader_name: entry.grader_name.clone(),
            technical: entry.criteria.technical,
            story: entry.criteria.story,
            creativity: entry.criteria.creativity,
            overall: entry.criteria.overall,
            total_score: entry.total(),
            comment: entry.comment.clone(),
            scored_at: timestamp(Some(entry.scored_at)).unwrap_or_default(),
        }
    }
}

/// Review fields, only included for admins.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReviewView {
    pub review_status: String,
    pub scores: Vec<ScoreView>,
    pub average_score: Option<f64>,
    pub flagged: bool,
    pub flag_reason: Option<String>,
    pub admin_notes: Option<String>,
    pub assigned_reviewers: Vec<String>,
}

/// An application as returned by the API.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ApplicationView {
    pub id: String,
    pub application_id: String,
    pub user_id: String,
    pub category: String,
    pub status: String,
    pub content: ApplicationContent,
    pub files: FilesView,
    pub created_at: Option<String>,
    pub last_modified: Option<String>,
    pub submitted_at: Option<String>,
    pub withdrawn_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewView>,
    pub capabilities: ApplicationCapabilities,
}

impl ApplicationView {
    /// Builds the view. Review fields are attached only when `include_review` is set.
    #[must_use]
    pub fn new(
        application: &Application,
        capabilities: ApplicationCapabilities,
        include_review: bool,
    ) -> Self {
        let file = |slot: FileSlot| application.files.get(slot).cloned();
        let review: Option<ReviewView> = include_review.then(|| ReviewView {
            review_status: application.review.review_status.as_str().to_string(),
            scores: application.review.scores.iter().map(ScoreView::from).collect(),
            average_score: application.review.average_score(),
            flagged: application.review.flagged,
            flag_reason: application.review.flag_reason.clone(),
            admin_notes: application.review.admin_notes.clone(),
            assigned_reviewers: application.review.assigned_reviewers.clone(),
        });

        Self {
            id: application.id.clone(),
            application_id: application.application_id.clone(),
            user_id: application.user_id.clone(),
            category: application.category().as_str().to_string(),
            status: application.status.as_str().to_string(),
            content: application.content.clone(),
            files: FilesView {
                film: file(FileSlot::Film),
                poster: file(FileSlot::Poster),
                proof: file(FileSlot::Proof),
            },
            created_at: timestamp(application.created_at),
            last_modified: timestamp(application.last_modified),
            submitted_at: timestamp(application.submitted_at),
            withdrawn_at: timestamp(application.withdrawn_at),
            review,
            capabilities,
        }
    }
}

fn timestamp(at: Option<OffsetDateTime>) -> Option<String> {
    at.and_then(|t| t.format(&Rfc3339).ok())
}

/// API request to score an application. Each criterion is 0 to 10.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ScoreRequest {
    pub technical: u8,
    pub story: u8,
    pub creativity: u8,
    pub overall: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ScoreRequest {
    /// Validates the criteria.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first criterion out of range.
    pub fn criteria(&self) -> Result<ScoreCriteria, ApiError> {
        ScoreCriteria::new(self.technical, self.story, self.creativity, self.overall)
            .map_err(translate_domain_error)
    }
}

/// API response for a saved score.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScoreResponse {
    pub score: ScoreView,
    pub message: String,
}

/// API request to set the review status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ReviewStatusRequest {
    pub review_status: String,
}

impl ReviewStatusRequest {
    /// Parses the requested status.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for unknown statuses.
    pub fn parse(&self) -> Result<ReviewStatus, ApiError> {
        self.review_status
            .parse::<ReviewStatus>()
            .map_err(translate_domain_error)
    }
}

/// API request to replace the admin notes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct NotesRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request to flag or unflag an application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct FlagRequest {
    pub flagged: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// API request to replace the assigned reviewers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ReviewersRequest {
    pub reviewers: Vec<String>,
}

/// Query string of the admin listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ListApplicationsQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub review_status: Option<String>,
    pub flagged: Option<bool>,
}

impl ListApplicationsQuery {
    /// Parses the query into a filter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for unknown category or status values.
    pub fn to_filter(&self) -> Result<ApplicationFilter, ApiError> {
        Ok(ApplicationFilter {
            category: self
                .category
                .as_deref()
                .map(str::parse::<Category>)
                .transpose()
                .map_err(translate_domain_error)?,
            status: self
                .status
                .as_deref()
                .map(str::parse)
                .transpose()
                .map_err(translate_domain_error)?,
            review_status: self
                .review_status
                .as_deref()
                .map(str::parse)
                .transpose()
                .map_err(translate_domain_error)?,
            flagged: self.flagged,
        })
    }
}

/// API response listing applications.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ListApplicationsResponse {
    pub applications: Vec<ApplicationView>,
    pub capabilities: GlobalCapabilities,
}

/// Generic acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Represents whether a specific action is permitted.
///
/// This enum provides better type safety than raw booleans and serializes
/// to JSON as true/false for API compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

/// What the signed-in account may do in general.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GlobalCapabilities {
    pub can_create_application: Capability,
    pub can_review: Capability,
    pub can_export: Capability,
}

/// What the signed-in account may do with one application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApplicationCapabilities {
    pub can_edit: Capability,
    pub can_submit: Capability,
    pub can_replace_files: Capability,
    pub can_delete: Capability,
    pub can_withdraw: Capability,
    pub can_review: Capability,
}
