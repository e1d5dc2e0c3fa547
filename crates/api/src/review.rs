// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin review of submitted applications.
//!
//! Review fields live beside the applicant content in the same document
//! and are written only through these operations.

use filmfest::scores_value;
use filmfest_domain::{
    Application, ApplicationOperation, ApplicationStatus, Category, ReviewStatus, ScoreCriteria,
    ScoreEntry, upsert_score,
};
use filmfest_persistence::{DocumentStore, Patch};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::info;

use crate::applications::{load_application, read_all};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};

/// Narrows an admin listing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub category: Option<Category>,
    pub status: Option<ApplicationStatus>,
    pub review_status: Option<ReviewStatus>,
    pub flagged: Option<bool>,
}

impl ApplicationFilter {
    /// Returns true if `application` passes every set criterion.
    ///
    /// Deleted applications only pass a filter that asks for them.
    #[must_use]
    pub fn matches(&self, application: &Application) -> bool {
        let status_ok: bool = self.status.map_or(
            application.status != ApplicationStatus::Deleted,
            |status| application.status == status,
        );
        status_ok
            && self
                .category
                .is_none_or(|category| application.category() == category)
            && self
                .review_status
                .is_none_or(|review| application.review.review_status == review)
            && self
                .flagged
                .is_none_or(|flagged| application.review.flagged == flagged)
    }
}

/// Lists applications matching `filter` in creation order.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins.
pub async fn list_applications<D: DocumentStore>(
    store: &D,
    actor: &AuthenticatedActor,
    filter: &ApplicationFilter,
) -> Result<Vec<Application>, ApiError> {
    AuthorizationService::authorize_review(actor)?;
    let mut applications: Vec<Application> = read_all(store)
        .await?
        .into_iter()
        .filter(|a| filter.matches(a))
        .collect();
    applications.sort_by_key(|a| a.created_at);
    Ok(applications)
}

/// Mean total score of an application, or `None` before anyone scored it.
#[must_use]
pub fn average_score(application: &Application) -> Option<f64> {
    application.review.average_score()
}

/// Records the actor's score, replacing any earlier score by the same grader.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins, a lifecycle error when the
/// application is not submitted, or `InvalidInput` for a criterion
/// outside 0 to 10.
pub async fn save_score<D: DocumentStore>(
    store: &D,
    actor: &AuthenticatedActor,
    id: &str,
    criteria: ScoreCriteria,
    comment: Option<String>,
) -> Result<ScoreEntry, ApiError> {
    let mut application: Application = load_reviewable(store, actor, id).await?;

    let entry: ScoreEntry = ScoreEntry {
        grader_id: actor.uid.clone(),
        grader_name: Some(actor.email.clone()),
        criteria,
        comment: non_blank(comment),
        scored_at: OffsetDateTime::now_utc(),
    };
    upsert_score(&mut application.review.scores, entry.clone()).map_err(translate_domain_error)?;

    write(
        store,
        id,
        Patch::new().set("scores", scores_value(&application.review.scores)),
    )
    .await?;
    info!(
        application = id,
        grader = %actor.uid,
        total = entry.total(),
        graders = application.review.scores.len(),
        "Score saved"
    );
    Ok(entry)
}

/// Sets the review status.
///
/// # Errors
///
/// As [`save_score`].
pub async fn set_review_status<D: DocumentStore>(
    store: &D,
    actor: &AuthenticatedActor,
    id: &str,
    review_status: ReviewStatus,
) -> Result<(), ApiError> {
    load_reviewable(store, actor, id).await?;
    write(
        store,
        id,
        Patch::new().set("reviewStatus", review_status.as_str()),
    )
    .await?;
    info!(application = id, review_status = %review_status, "Review status set");
    Ok(())
}

/// Replaces the admin notes. Blank notes clear them.
///
/// # Errors
///
/// As [`save_score`].
pub async fn set_admin_notes<D: DocumentStore>(
    store: &D,
    actor: &AuthenticatedActor,
    id: &str,
    notes: Option<String>,
) -> Result<(), ApiError> {
    load_reviewable(store, actor, id).await?;
    write(store, id, Patch::new().set("adminNotes", optional(non_blank(notes)))).await
}

/// Flags or unflags an application. Unflagging clears the reason.
///
/// # Errors
///
/// As [`save_score`].
pub async fn set_flag<D: DocumentStore>(
    store: &D,
    actor: &AuthenticatedActor,
    id: &str,
    flagged: bool,
    reason: Option<String>,
) -> Result<(), ApiError> {
    load_reviewable(store, actor, id).await?;
    let reason: Option<String> = if flagged { non_blank(reason) } else { None };
    write(
        store,
        id,
        Patch::new()
            .set("flagged", flagged)
            .set("flagReason", optional(reason)),
    )
    .await?;
    info!(application = id, flagged, "Flag set");
    Ok(())
}

/// Replaces the assigned reviewers. Blank and repeated ids are dropped.
///
/// # Errors
///
/// As [`save_score`].
pub async fn assign_reviewers<D: DocumentStore>(
    store: &D,
    actor: &AuthenticatedActor,
    id: &str,
    reviewers: Vec<String>,
) -> Result<Vec<String>, ApiError> {
    load_reviewable(store, actor, id).await?;

    let mut assigned: Vec<String> = Vec::with_capacity(reviewers.len());
    for reviewer in reviewers {
        let reviewer: String = reviewer.trim().to_string();
        if !reviewer.is_empty() && !assigned.contains(&reviewer) {
            assigned.push(reviewer);
        }
    }

    write(
        store,
        id,
        Patch::new().set(
            "assignedReviewers",
            Value::Array(assigned.iter().cloned().map(Value::String).collect()),
        ),
    )
    .await?;
    Ok(assigned)
}

async fn load_reviewable<D: DocumentStore>(
    store: &D,
    actor: &AuthenticatedActor,
    id: &str,
) -> Result<Application, ApiError> {
    AuthorizationService::authorize_review(actor)?;
    let application: Application = load_application(store, id).await?;
    application
        .status
        .ensure_permits(ApplicationOperation::Review)
        .map_err(translate_domain_error)?;
    Ok(application)
}

async fn write<D: DocumentStore>(store: &D, id: &str, patch: Patch) -> Result<(), ApiError> {
    store
        .update(id, patch)
        .await
        .map_err(translate_persistence_error)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn optional(value: Option<String>) -> Value {
    value.map_or(Value::Null, Value::String)
}
