// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use filmfest::SubmissionResult;
use filmfest_domain::{Application, ApplicationStatus, FileMetadata, FileSlot, LocalFile};

use super::helpers::{Fixture, create_admin, create_applicant, create_file, create_form};
use crate::applications::{
    delete_application, get_application, list_my_applications, load_application, replace_file,
    save_form, submit_application, withdraw_application,
};
use crate::auth::AuthenticatedActor;
use crate::error::ApiError;

async fn replace(
    fx: &Fixture,
    actor: &AuthenticatedActor,
    id: &str,
    slot: FileSlot,
    file: &LocalFile,
) -> Result<FileMetadata, ApiError> {
    replace_file(
        &fx.documents,
        &fx.objects,
        &fx.config.file_rules,
        actor,
        id,
        slot,
        file,
        &mut |_| {},
    )
    .await
}

#[tokio::test]
async fn test_submit_application_without_poster_fails_and_stays_draft() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx
        .seed_draft(&owner, &[FileSlot::Film, FileSlot::Proof])
        .await;
    let writes: usize = fx.documents.write_count();

    let err: ApiError = submit_application(&fx.documents, &fx.config.file_rules, &owner, &id)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Validation failed: Poster file is required");
    assert_eq!(fx.documents.write_count(), writes);
    let stored: Application = load_application(&fx.documents, &id).await.unwrap();
    assert_eq!(stored.status, ApplicationStatus::Draft);
    assert_eq!(stored.submitted_at, None);
}

#[tokio::test]
async fn test_submit_application_reports_every_failure() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let mut form = create_form(&[]);
    form.content.film.title = String::new();
    let id: String = fx.seed_form(&owner, form, true).await;

    let err: ApiError = submit_application(&fx.documents, &fx.config.file_rules, &owner, &id)
        .await
        .unwrap_err();

    let ApiError::ValidationFailed { errors } = &err else {
        panic!("expected validation failure, got {err:?}");
    };
    assert_eq!(errors[0], "Film file is required");
    assert!(errors.contains(&String::from("Poster file is required")));
    assert!(errors.contains(&String::from("Proof file is required")));
    assert!(errors.contains(&String::from("Film title is required")));
}

#[tokio::test]
async fn test_submit_application_complete_draft_becomes_submitted() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_draft(&owner, &FileSlot::ALL).await;

    let submitted: Application =
        submit_application(&fx.documents, &fx.config.file_rules, &owner, &id)
            .await
            .unwrap();

    assert_eq!(submitted.status, ApplicationStatus::Submitted);
    assert!(submitted.submitted_at.is_some());
    assert!(submitted.files.is_complete());
}

async fn seed_draft_with_gif_poster(fx: &Fixture, owner: &AuthenticatedActor) -> String {
    let mut form = create_form(&FileSlot::ALL);
    form.files.poster = Some(LocalFile::new("p.gif", "image/gif", vec![7; 64]));
    fx.seed_form(owner, form, true).await
}

#[tokio::test]
async fn test_submit_application_rechecks_stored_file_rules() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = seed_draft_with_gif_poster(&fx, &owner).await;
    let writes: usize = fx.documents.write_count();

    let err: ApiError = submit_application(&fx.documents, &fx.config.file_rules, &owner, &id)
        .await
        .unwrap_err();

    let ApiError::ValidationFailed { errors } = &err else {
        panic!("expected validation failure, got {err:?}");
    };
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Poster file is invalid"), "{}", errors[0]);
    assert_eq!(fx.documents.write_count(), writes);
    let stored: Application = load_application(&fx.documents, &id).await.unwrap();
    assert_eq!(stored.status, ApplicationStatus::Draft);
}

#[tokio::test]
async fn test_submitting_stored_draft_by_form_rechecks_stored_file_rules() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = seed_draft_with_gif_poster(&fx, &owner).await;
    let mut form = create_form(&[]);
    form.document_id = Some(id.clone());

    let result: SubmissionResult = save_form(
        &fx.documents,
        &fx.objects,
        &fx.config,
        &owner,
        form,
        false,
        |_| {},
    )
    .await
    .unwrap();

    assert!(!result.success);
    assert_eq!(result.error_code.as_deref(), Some("invalid-poster-file"));
    let stored: Application = load_application(&fx.documents, &id).await.unwrap();
    assert_eq!(stored.status, ApplicationStatus::Draft);
}

#[tokio::test]
async fn test_submit_application_by_another_applicant_is_unauthorized() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_draft(&owner, &FileSlot::ALL).await;
    let writes: usize = fx.documents.write_count();

    let err: ApiError = submit_application(
        &fx.documents,
        &fx.config.file_rules,
        &create_applicant("user-2"),
        &id,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(fx.documents.write_count(), writes);
}

#[tokio::test]
async fn test_replace_file_on_submitted_application_is_refused() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_submitted(&owner).await;
    let puts: usize = fx.objects.put_calls();
    let writes: usize = fx.documents.write_count();
    let stored_before: Vec<String> = fx.objects.stored_paths().await;

    let err: ApiError = replace(&fx, &owner, &id, FileSlot::Poster, &create_file(FileSlot::Poster))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Cannot replace files in submitted applications"
    );
    assert_eq!(fx.objects.put_calls(), puts);
    assert_eq!(fx.documents.write_count(), writes);
    assert_eq!(fx.objects.stored_paths().await, stored_before);
    assert!(fx.objects.deleted_paths().await.is_empty());
}

#[tokio::test]
async fn test_replace_file_lands_new_file_before_removing_old() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_draft(&owner, &[FileSlot::Poster]).await;
    let old_path: String = load_application(&fx.documents, &id)
        .await
        .unwrap()
        .files
        .get(FileSlot::Poster)
        .unwrap()
        .storage_path
        .clone();
    let new_poster: LocalFile = LocalFile::new("poster-v2.png", "image/png", vec![7; 1500]);
    let mut seen: Vec<f64> = Vec::new();

    let metadata: FileMetadata = replace_file(
        &fx.documents,
        &fx.objects,
        &fx.config.file_rules,
        &owner,
        &id,
        FileSlot::Poster,
        &new_poster,
        &mut |percent| seen.push(percent),
    )
    .await
    .unwrap();

    assert!(metadata.storage_path.starts_with("app-1/poster/"));
    assert!(metadata.storage_path.ends_with("_poster-v2.png"));
    assert_eq!(seen.last(), Some(&100.0));
    let stored: Application = load_application(&fx.documents, &id).await.unwrap();
    assert_eq!(stored.files.get(FileSlot::Poster), Some(&metadata));
    assert_eq!(stored.files.get(FileSlot::Film), None);
    assert_eq!(fx.objects.deleted_paths().await, vec![old_path.clone()]);
    let stored_paths: Vec<String> = fx.objects.stored_paths().await;
    assert!(stored_paths.contains(&metadata.storage_path));
    assert!(!stored_paths.contains(&old_path));
}

#[tokio::test]
async fn test_replace_file_into_empty_slot_deletes_nothing() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_draft(&owner, &[]).await;

    let metadata: FileMetadata = replace(&fx, &owner, &id, FileSlot::Proof, &create_file(FileSlot::Proof))
        .await
        .unwrap();

    assert!(metadata.storage_path.starts_with("app-1/proof/"));
    assert!(fx.objects.deleted_paths().await.is_empty());
}

#[tokio::test]
async fn test_replace_file_rejects_disallowed_type_before_upload() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_draft(&owner, &[FileSlot::Poster]).await;
    let puts: usize = fx.objects.put_calls();
    let gif: LocalFile = LocalFile::new("poster.gif", "image/gif", vec![1; 100]);

    let err: ApiError = replace(&fx, &owner, &id, FileSlot::Poster, &gif)
        .await
        .unwrap_err();

    let ApiError::InvalidInput { field, message } = &err else {
        panic!("expected invalid input, got {err:?}");
    };
    assert_eq!(field, "files.posterFile");
    assert!(message.contains("image/gif"));
    assert_eq!(fx.objects.put_calls(), puts);
}

#[tokio::test]
async fn test_replace_file_removes_new_object_when_document_write_fails() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_draft(&owner, &[FileSlot::Poster]).await;
    let stored_before: Vec<String> = fx.objects.stored_paths().await;
    fx.documents.reject_writes_with("deadline exceeded").await;
    let new_poster: LocalFile = LocalFile::new("poster-v2.png", "image/png", vec![7; 1500]);

    let err: ApiError = replace(&fx, &owner, &id, FileSlot::Poster, &new_poster)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::StorageFailure { ref code, .. } if code == "save-failed"));
    assert_eq!(fx.objects.stored_paths().await, stored_before);
}

#[tokio::test]
async fn test_delete_application_removes_files_and_soft_deletes() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_draft(&owner, &FileSlot::ALL).await;
    assert_eq!(fx.objects.stored_paths().await.len(), 3);

    delete_application(&fx.documents, &fx.objects, &owner, &id)
        .await
        .unwrap();

    assert!(fx.objects.stored_paths().await.is_empty());
    assert_eq!(fx.objects.deleted_paths().await.len(), 3);
    let stored: Application = load_application(&fx.documents, &id).await.unwrap();
    assert_eq!(stored.status, ApplicationStatus::Deleted);
    assert!(stored.deleted_at.is_some());
    assert!(
        list_my_applications(&fx.documents, &owner)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_delete_application_survives_failing_file_deletes() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_draft(&owner, &[FileSlot::Film]).await;
    fx.objects.fail_deletes().await;

    delete_application(&fx.documents, &fx.objects, &owner, &id)
        .await
        .unwrap();

    let stored: Application = load_application(&fx.documents, &id).await.unwrap();
    assert_eq!(stored.status, ApplicationStatus::Deleted);
}

#[tokio::test]
async fn test_withdraw_application_keeps_files() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_submitted(&owner).await;

    let withdrawn: Application = withdraw_application(&fx.documents, &owner, &id)
        .await
        .unwrap();

    assert_eq!(withdrawn.status, ApplicationStatus::Withdrawn);
    assert!(withdrawn.withdrawn_at.is_some());
    assert!(withdrawn.files.is_complete());
    assert_eq!(fx.objects.stored_paths().await.len(), 3);
    assert!(fx.objects.deleted_paths().await.is_empty());
}

#[tokio::test]
async fn test_withdraw_draft_is_refused() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_draft(&owner, &[]).await;

    let err: ApiError = withdraw_application(&fx.documents, &owner, &id)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Cannot withdraw draft applications: only submitted applications can be withdrawn"
    );
}

#[tokio::test]
async fn test_operations_outside_draft_perform_no_writes() {
    for status in ["submitted", "withdrawn", "deleted"] {
        let fx = Fixture::new();
        let owner = create_applicant("user-1");
        let id: String = fx.seed_with_status(&owner, status).await;
        let writes: usize = fx.documents.write_count();
        let puts: usize = fx.objects.put_calls();

        assert!(
            submit_application(&fx.documents, &fx.config.file_rules, &owner, &id)
                .await
                .is_err(),
            "submit allowed on {status}"
        );
        assert!(
            replace(&fx, &owner, &id, FileSlot::Film, &create_file(FileSlot::Film))
                .await
                .is_err(),
            "replace allowed on {status}"
        );
        assert!(
            delete_application(&fx.documents, &fx.objects, &owner, &id)
                .await
                .is_err(),
            "delete allowed on {status}"
        );
        if status != "submitted" {
            assert!(
                withdraw_application(&fx.documents, &owner, &id)
                    .await
                    .is_err(),
                "withdraw allowed on {status}"
            );
        }

        assert_eq!(fx.documents.write_count(), writes, "write on {status}");
        assert_eq!(fx.objects.put_calls(), puts, "upload on {status}");
        assert!(fx.objects.deleted_paths().await.is_empty());
    }
}

#[tokio::test]
async fn test_get_application_is_limited_to_owner_and_admin() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let id: String = fx.seed_draft(&owner, &[]).await;

    assert!(get_application(&fx.documents, &owner, &id).await.is_ok());
    assert!(get_application(&fx.documents, &create_admin(), &id).await.is_ok());
    let err: ApiError = get_application(&fx.documents, &create_applicant("user-2"), &id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[tokio::test]
async fn test_get_unknown_application_is_not_found() {
    let fx = Fixture::new();

    let err: ApiError = get_application(&fx.documents, &create_admin(), "missing")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[tokio::test]
async fn test_save_form_stamps_the_signed_in_owner() {
    let fx = Fixture::new();
    let owner = create_applicant("user-7");
    let mut form = create_form(&[FileSlot::Poster]);
    form.user_id = String::from("someone-else");

    let id: String = fx.seed_form(&owner, form, true).await;

    let stored: Application = load_application(&fx.documents, &id).await.unwrap();
    assert_eq!(stored.user_id, "user-7");
}

#[tokio::test]
async fn test_save_form_refuses_another_applicants_draft() {
    let fx = Fixture::new();
    let id: String = fx.seed_draft(&create_applicant("user-1"), &[]).await;
    let writes: usize = fx.documents.write_count();
    let mut form = create_form(&[]);
    form.document_id = Some(id);

    let err: ApiError = save_form(
        &fx.documents,
        &fx.objects,
        &fx.config,
        &create_applicant("user-2"),
        form,
        true,
        |_| {},
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(fx.documents.write_count(), writes);
}

#[tokio::test]
async fn test_save_form_reports_pipeline_failures_in_result() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");

    let result: SubmissionResult = save_form(
        &fx.documents,
        &fx.objects,
        &fx.config,
        &owner,
        create_form(&[FileSlot::Film]),
        false,
        |_| {},
    )
    .await
    .unwrap();

    assert!(!result.success);
    assert_eq!(result.error_code.as_deref(), Some("missing-poster-file"));
}

#[tokio::test]
async fn test_list_my_applications_returns_own_in_creation_order() {
    let fx = Fixture::new();
    let owner = create_applicant("user-1");
    let first: String = fx.seed_draft(&owner, &[]).await;
    fx.seed_draft(&create_applicant("user-2"), &[]).await;
    let second: String = fx.seed_submitted(&owner).await;

    let ids: Vec<String> = list_my_applications(&fx.documents, &owner)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();

    assert_eq!(ids, vec![first, second]);
}
