// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use filmfest::{SubmissionError, SubmissionErrorCode};
use filmfest_domain::{Application, ApplicationOperation, ApplicationStatus, DomainError, FileSlot};
use filmfest_persistence::PersistenceError;

use super::helpers::{Fixture, create_admin, create_applicant};
use crate::applications::load_application;
use crate::auth::{AuthenticatedActor, AuthorizationService, Role};
use crate::capabilities::{compute_application_capabilities, compute_global_capabilities};
use crate::error::{
    ApiError, AuthError, translate_domain_error, translate_persistence_error,
    translate_submission_error,
};
use crate::request_response::{ApplicationCapabilities, Capability, GlobalCapabilities};

async fn seeded(fx: &Fixture, owner: &AuthenticatedActor, status: &str) -> Application {
    let id: String = fx.seed_with_status(owner, status).await;
    load_application(&fx.documents, &id).await.unwrap()
}

#[test]
fn test_role_parse_accepts_stored_names_only() {
    assert_eq!(Role::parse("Admin").unwrap(), Role::Admin);
    assert_eq!(Role::parse("Applicant").unwrap(), Role::Applicant);
    assert!(matches!(
        Role::parse("admin"),
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_review_and_export_are_admin_only() {
    let admin: AuthenticatedActor = create_admin();
    let applicant: AuthenticatedActor = create_applicant("user-1");

    assert!(AuthorizationService::authorize_review(&admin).is_ok());
    assert!(AuthorizationService::authorize_export(&admin).is_ok());

    let err: AuthError = AuthorizationService::authorize_review(&applicant).unwrap_err();
    assert_eq!(
        err,
        AuthError::Unauthorized {
            action: String::from("review"),
            required_role: String::from("Admin"),
        }
    );
    assert!(AuthorizationService::authorize_export(&applicant).is_err());
}

#[tokio::test]
async fn test_only_the_owner_passes_the_owner_check() {
    let fx = Fixture::new();
    let owner: AuthenticatedActor = create_applicant("user-1");
    let application: Application = seeded(&fx, &owner, "submitted").await;

    assert!(AuthorizationService::authorize_owner(&owner, &application).is_ok());
    assert!(AuthorizationService::authorize_owner(&create_applicant("user-2"), &application).is_err());
    // Admins read but do not act for the applicant
    assert!(AuthorizationService::authorize_owner(&create_admin(), &application).is_err());
    assert!(AuthorizationService::authorize_view(&create_admin(), &application).is_ok());
    assert!(AuthorizationService::authorize_view(&owner, &application).is_ok());
    assert!(AuthorizationService::authorize_view(&create_applicant("user-2"), &application).is_err());
}

#[test]
fn test_global_capabilities_by_role() {
    assert_eq!(
        compute_global_capabilities(&create_admin()),
        GlobalCapabilities {
            can_create_application: Capability::Denied,
            can_review: Capability::Allowed,
            can_export: Capability::Allowed,
        }
    );
    assert_eq!(
        compute_global_capabilities(&create_applicant("user-1")),
        GlobalCapabilities {
            can_create_application: Capability::Allowed,
            can_review: Capability::Denied,
            can_export: Capability::Denied,
        }
    );
}

#[tokio::test]
async fn test_owner_capabilities_follow_the_status_guard() {
    let fx = Fixture::new();
    let owner: AuthenticatedActor = create_applicant("user-1");

    let draft_id: String = fx.seed_draft(&owner, &FileSlot::ALL).await;
    let draft: Application = load_application(&fx.documents, &draft_id).await.unwrap();
    let submitted: Application = seeded(&fx, &owner, "submitted").await;
    let withdrawn: Application = seeded(&fx, &owner, "withdrawn").await;

    for application in [&draft, &submitted, &withdrawn] {
        let caps: ApplicationCapabilities = compute_application_capabilities(&owner, application);
        let status: ApplicationStatus = application.status;
        assert_eq!(
            caps.can_edit.is_allowed(),
            status.permits(ApplicationOperation::Edit)
        );
        assert_eq!(
            caps.can_withdraw.is_allowed(),
            status.permits(ApplicationOperation::Withdraw)
        );
        assert_eq!(caps.can_review, Capability::Denied);
    }

    let draft_caps: ApplicationCapabilities = compute_application_capabilities(&owner, &draft);
    assert!(draft_caps.can_submit.is_allowed());
    assert!(draft_caps.can_replace_files.is_allowed());
    assert!(draft_caps.can_delete.is_allowed());

    let submitted_caps: ApplicationCapabilities =
        compute_application_capabilities(&owner, &submitted);
    assert!(!submitted_caps.can_edit.is_allowed());
    assert!(submitted_caps.can_withdraw.is_allowed());
}

#[tokio::test]
async fn test_non_owners_get_no_lifecycle_capabilities() {
    let fx = Fixture::new();
    let draft_id: String = fx
        .seed_draft(&create_applicant("user-1"), &FileSlot::ALL)
        .await;
    let draft: Application = load_application(&fx.documents, &draft_id).await.unwrap();

    let other: ApplicationCapabilities =
        compute_application_capabilities(&create_applicant("user-2"), &draft);
    assert!(!other.can_edit.is_allowed());
    assert!(!other.can_delete.is_allowed());

    let admin: ApplicationCapabilities = compute_application_capabilities(&create_admin(), &draft);
    assert!(!admin.can_edit.is_allowed());
    assert!(!admin.can_review.is_allowed());

    let submitted: Application = seeded(&fx, &create_applicant("user-1"), "submitted").await;
    assert!(
        compute_application_capabilities(&create_admin(), &submitted)
            .can_review
            .is_allowed()
    );
}

#[test]
fn test_capability_serializes_as_bool() {
    let json: serde_json::Value = serde_json::to_value(GlobalCapabilities {
        can_create_application: Capability::Allowed,
        can_review: Capability::Denied,
        can_export: Capability::Denied,
    })
    .unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "can_create_application": true,
            "can_review": false,
            "can_export": false,
        })
    );
}

#[test]
fn test_domain_errors_translate_by_kind() {
    let locked: ApiError = translate_domain_error(DomainError::OperationNotPermitted {
        operation: ApplicationOperation::Edit,
        status: ApplicationStatus::Submitted,
    });
    assert_eq!(
        locked,
        ApiError::DomainRuleViolation {
            rule: String::from("application_lifecycle"),
            message: String::from("Cannot edit submitted applications"),
        }
    );

    let category: ApiError =
        translate_domain_error(DomainError::InvalidCategory(String::from("shorts")));
    assert!(matches!(category, ApiError::InvalidInput { ref field, .. } if field == "category"));
}

#[test]
fn test_persistence_rejections_keep_permission_denied() {
    let denied: ApiError = translate_persistence_error(PersistenceError::Rejected(String::from(
        "attempt to write a readonly database",
    )));
    let other: ApiError =
        translate_persistence_error(PersistenceError::Rejected(String::from("disk full")));
    let missing: ApiError =
        translate_persistence_error(PersistenceError::DocumentNotFound(String::from("doc-9")));

    assert!(matches!(denied, ApiError::StorageFailure { ref code, .. } if code == "permission-denied"));
    assert!(matches!(other, ApiError::StorageFailure { ref code, .. } if code == "save-failed"));
    assert!(matches!(missing, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_submission_errors_translate_by_code() {
    let missing: ApiError = translate_submission_error(SubmissionError::validation(
        SubmissionErrorCode::MissingFile(FileSlot::Poster),
        "Poster file is required",
    ));
    let no_user: ApiError = translate_submission_error(SubmissionError::validation(
        SubmissionErrorCode::MissingUserId,
        "Missing user id",
    ));

    assert_eq!(
        missing,
        ApiError::InvalidInput {
            field: String::from("files.posterFile"),
            message: String::from("Poster file is required"),
        }
    );
    assert!(matches!(no_user, ApiError::AuthenticationFailed { .. }));
}
