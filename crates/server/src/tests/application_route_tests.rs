// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::{StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::helpers::{
    Part, TestServer, create_content, create_test_server, file_part, form_part, get_request,
    json_request, multipart_request, send, send_json, sign_up_and_sign_in, submit_complete_form,
};

#[tokio::test]
async fn test_draft_round_trip() {
    let server: TestServer = create_test_server();
    let token: String = sign_up_and_sign_in(&server.app, "naree@example.com").await;

    let parts: Vec<Part> = vec![form_part(None), file_part("film")];
    let (status, saved) = send_json(
        &server.app,
        multipart_request("POST", "/applications/draft", &token, &parts),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(saved["result"]["success"], true);
    assert_eq!(saved["result"]["isDraft"], true);
    let progress: &Vec<Value> = saved["progress"].as_array().unwrap();
    assert_eq!(progress.first().unwrap()["stage"], "validating");
    assert_eq!(progress.last().unwrap()["stage"], "complete");
    assert_eq!(progress.last().unwrap()["progress"], 100);

    let (status, listed) = send_json(&server.app, get_request("/applications", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let applications: &Vec<Value> = listed["applications"].as_array().unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["status"], "draft");
    assert_eq!(applications[0]["category"], "youth");
    assert_eq!(applications[0]["files"]["film"]["file_name"], "Paper Boats.mp4");
    assert_eq!(applications[0]["files"]["poster"], Value::Null);
    assert_eq!(applications[0]["capabilities"]["can_edit"], true);
    assert_eq!(applications[0]["capabilities"]["can_withdraw"], false);
    assert!(applications[0].get("review").is_none());
    assert_eq!(listed["capabilities"]["can_create_application"], true);
}

#[tokio::test]
async fn test_submission_without_poster_reports_the_slot() {
    let server: TestServer = create_test_server();
    let token: String = sign_up_and_sign_in(&server.app, "naree@example.com").await;

    let parts: Vec<Part> = vec![form_part(None), file_part("film"), file_part("proof")];
    let (status, body) = send_json(
        &server.app,
        multipart_request("POST", "/applications/submit", &token, &parts),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["result"]["success"], false);
    assert_eq!(body["result"]["errorCode"], "missing-poster-file");
    assert_eq!(body["progress"].as_array().unwrap().last().unwrap()["stage"], "error");
}

#[tokio::test]
async fn test_form_without_form_part_is_a_bad_request() {
    let server: TestServer = create_test_server();
    let token: String = sign_up_and_sign_in(&server.app, "naree@example.com").await;

    let (status, body) = send_json(
        &server.app,
        multipart_request("POST", "/applications/draft", &token, &[file_part("film")]),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing 'form' part");
}

#[tokio::test]
async fn test_submitted_application_can_be_withdrawn_once() {
    let server: TestServer = create_test_server();
    let token: String = sign_up_and_sign_in(&server.app, "naree@example.com").await;
    let id: String = submit_complete_form(&server.app, &token).await;
    let uri: String = format!("/applications/{id}/withdraw");

    let (status, withdrawn) = send_json(
        &server.app,
        json_request("POST", &uri, Some(&token), &Value::Null),
    )
    .await;
    let (again, refused) = send_json(
        &server.app,
        json_request("POST", &uri, Some(&token), &Value::Null),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(withdrawn["status"], "withdrawn");
    assert_eq!(again, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(refused["code"], "application_lifecycle");
}

#[tokio::test]
async fn test_other_applicants_cannot_read_or_withdraw() {
    let server: TestServer = create_test_server();
    let owner: String = sign_up_and_sign_in(&server.app, "naree@example.com").await;
    let other: String = sign_up_and_sign_in(&server.app, "krit@example.com").await;
    let id: String = submit_complete_form(&server.app, &owner).await;

    let (read, _) = send(
        &server.app,
        get_request(&format!("/applications/{id}"), Some(&other)),
    )
    .await;
    let (withdraw, _) = send(
        &server.app,
        json_request(
            "POST",
            &format!("/applications/{id}/withdraw"),
            Some(&other),
            &Value::Null,
        ),
    )
    .await;

    assert_eq!(read, StatusCode::FORBIDDEN);
    assert_eq!(withdraw, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_stored_draft_submits_by_id() {
    let server: TestServer = create_test_server();
    let token: String = sign_up_and_sign_in(&server.app, "naree@example.com").await;
    let parts: Vec<Part> = vec![
        form_part(None),
        file_part("film"),
        file_part("poster"),
        file_part("proof"),
    ];
    let (_, saved) = send_json(
        &server.app,
        multipart_request("POST", "/applications/draft", &token, &parts),
    )
    .await;
    let id: &str = saved["result"]["submissionId"].as_str().unwrap();

    let (status, submitted) = send_json(
        &server.app,
        json_request(
            "POST",
            &format!("/applications/{id}/submit"),
            Some(&token),
            &Value::Null,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{submitted}");
    assert_eq!(submitted["status"], "submitted");
    assert!(submitted["submitted_at"].is_string());
}

#[tokio::test]
async fn test_replaced_poster_is_served_from_the_file_route() {
    let server: TestServer = create_test_server();
    let token: String = sign_up_and_sign_in(&server.app, "naree@example.com").await;
    let parts: Vec<Part> = vec![form_part(None), file_part("film"), file_part("poster")];
    let (_, saved) = send_json(
        &server.app,
        multipart_request("POST", "/applications/draft", &token, &parts),
    )
    .await;
    let id: &str = saved["result"]["submissionId"].as_str().unwrap();

    let replacement: Part = Part {
        name: "file",
        file_name: Some("poster-v2.png"),
        content_type: Some("image/png"),
        data: vec![42; 1500],
    };
    let (status, replaced) = send_json(
        &server.app,
        multipart_request(
            "PUT",
            &format!("/applications/{id}/files/poster"),
            &token,
            &[replacement],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{replaced}");
    assert_eq!(replaced["slot"], "poster");
    assert_eq!(replaced["file"]["file_name"], "poster-v2.png");

    let storage_path: &str = replaced["file"]["storage_path"].as_str().unwrap();
    let (status, served) = send(
        &server.app,
        get_request(&format!("/files/{storage_path}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, vec![42; 1500]);
}

#[tokio::test]
async fn test_replacing_with_a_gif_is_rejected() {
    let server: TestServer = create_test_server();
    let token: String = sign_up_and_sign_in(&server.app, "naree@example.com").await;
    let (_, saved) = send_json(
        &server.app,
        multipart_request("POST", "/applications/draft", &token, &[form_part(None)]),
    )
    .await;
    let id: &str = saved["result"]["submissionId"].as_str().unwrap();

    let gif: Part = Part {
        name: "file",
        file_name: Some("poster.gif"),
        content_type: Some("image/gif"),
        data: vec![1; 100],
    };
    let (status, _) = send(
        &server.app,
        multipart_request("PUT", &format!("/applications/{id}/files/poster"), &token, &[gif]),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleted_draft_disappears_from_the_listing() {
    let server: TestServer = create_test_server();
    let token: String = sign_up_and_sign_in(&server.app, "naree@example.com").await;
    let (_, saved) = send_json(
        &server.app,
        multipart_request(
            "POST",
            "/applications/draft",
            &token,
            &[form_part(None), file_part("film")],
        ),
    )
    .await;
    let id: &str = saved["result"]["submissionId"].as_str().unwrap();

    let (status, _) = send(
        &server.app,
        json_request(
            "POST",
            &format!("/applications/{id}/delete"),
            Some(&token),
            &Value::Null,
        ),
    )
    .await;
    let (_, listed) = send_json(&server.app, get_request("/applications", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["applications"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_file_route_rejects_traversal() {
    let server: TestServer = create_test_server();

    let (traversal, _) = send(&server.app, get_request("/files/app-1/../../secret", None)).await;
    let (missing, _) = send(&server.app, get_request("/files/app-1/film/nothing.mp4", None)).await;

    assert_eq!(traversal, StatusCode::BAD_REQUEST);
    assert_eq!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_route_streams_objects_but_not_folders() {
    let server: TestServer = create_test_server();
    let token: String = sign_up_and_sign_in(&server.app, "naree@example.com").await;
    let (_, saved) = send_json(
        &server.app,
        multipart_request(
            "POST",
            "/applications/draft",
            &token,
            &[form_part(None), file_part("film")],
        ),
    )
    .await;
    let id: &str = saved["result"]["submissionId"].as_str().unwrap();
    let (_, application) =
        send_json(&server.app, get_request(&format!("/applications/{id}"), Some(&token))).await;
    let storage_path: &str = application["files"]["film"]["storage_path"].as_str().unwrap();

    let response = server
        .app
        .clone()
        .oneshot(get_request(&format!("/files/{storage_path}"), None))
        .await
        .unwrap();
    let (folder, _) = send(&server.app, get_request("/files/app-1/film", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "3000");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "video/mp4");
    assert_eq!(folder, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_form_without_application_id_is_rejected_before_upload() {
    let server: TestServer = create_test_server();
    let token: String = sign_up_and_sign_in(&server.app, "naree@example.com").await;
    let payload: Value = json!({ "application_id": " ", "content": create_content() });
    let form: Part = Part {
        name: "form",
        file_name: None,
        content_type: Some("application/json"),
        data: payload.to_string().into_bytes(),
    };

    let (status, body) = send_json(
        &server.app,
        multipart_request("POST", "/applications/draft", &token, &[form, file_part("film")]),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["result"]["errorCode"], "missing-application-id");
    assert_eq!(body["progress"].as_array().unwrap().last().unwrap()["stage"], "error");
}
