// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use filmfest::ServiceConfig;
use filmfest_domain::{
    Agreements, ApplicationContent, FilmDetails, FilmFormat, Participant, ParticipantRole,
    Person, SchoolAffiliation,
};
use filmfest_persistence::Persistence;
use filmfest_storage::LocalObjectStore;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const PASSWORD: &str = "Festival2026!";
pub const ADMIN_EMAIL: &str = "jury@example.com";
const BOUNDARY: &str = "filmfest-test-boundary";

/// Router over in-memory `SQLite` and a temporary upload directory.
pub struct TestServer {
    pub app: Router,
    pub state: AppState,
    _storage: TempDir,
}

pub fn create_test_server() -> TestServer {
    let storage: TempDir = tempfile::tempdir().unwrap();
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    let state: AppState = AppState::new(
        Arc::new(Mutex::new(persistence)),
        LocalObjectStore::new(storage.path(), "http://127.0.0.1:3000/files"),
        ServiceConfig::default(),
    );
    TestServer {
        app: build_router(state.clone()),
        state,
        _storage: storage,
    }
}

pub fn create_content() -> ApplicationContent {
    ApplicationContent {
        film: FilmDetails {
            title: String::from("Paper Boats"),
            title_th: Some(String::from("เรือกระดาษ")),
            genres: BTreeSet::from([String::from("drama")]),
            format: Some(FilmFormat::LiveAction),
            duration_minutes: Some(7),
            synopsis: String::from("Two friends race boats down a flooded soi."),
            local_connection: None,
        },
        participant: Participant::Youth {
            submitter: Person {
                name: String::from("Naree Wongsa"),
                name_th: None,
                age: Some(16),
                phone: String::from("0891112222"),
                email: String::from("naree@example.com"),
                role: Some(ParticipantRole::Director),
                role_other: None,
            },
            school: SchoolAffiliation {
                school_name: String::from("Yupparaj Wittayalai"),
                student_id: String::from("Y-3301"),
            },
        },
        crew: Vec::new(),
        agreements: Agreements {
            rules_accepted: true,
            rights_confirmed: true,
            originality_confirmed: true,
            privacy_consent: true,
        },
    }
}

/// One part of a multipart body.
pub struct Part {
    pub name: &'static str,
    pub file_name: Option<&'static str>,
    pub content_type: Option<&'static str>,
    pub data: Vec<u8>,
}

/// The `form` JSON part.
pub fn form_part(document_id: Option<&str>) -> Part {
    let payload: Value = json!({
        "application_id": "app-1",
        "document_id": document_id,
        "content": create_content(),
    });
    Part {
        name: "form",
        file_name: None,
        content_type: Some("application/json"),
        data: payload.to_string().into_bytes(),
    }
}

/// A valid file part for `slot`.
pub fn file_part(slot: &'static str) -> Part {
    let (file_name, content_type, size): (&'static str, &'static str, usize) = match slot {
        "film" => ("Paper Boats.mp4", "video/mp4", 3000),
        "poster" => ("poster.png", "image/png", 2000),
        _ => ("student card.pdf", "application/pdf", 1000),
    };
    Part {
        name: slot,
        file_name: Some(file_name),
        content_type: Some(content_type),
        data: vec![7; size],
    }
}

pub fn multipart_request(method: &str, uri: &str, token: &str, parts: &[Part]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition: String = part.file_name.map_or_else(
            || format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
            |file_name| {
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\n",
                    part.name
                )
            },
        );
        body.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Sends a request and returns the status and raw body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// Sends a request and parses the body as JSON.
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let value: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&body).into_owned())
        })
    };
    (status, value)
}

/// Signs up `email` through the routes and returns a session token.
pub async fn sign_up_and_sign_in(app: &Router, email: &str) -> String {
    let credentials: Value = json!({ "email": email, "password": PASSWORD });
    let (status, _) = send_json(app, json_request("POST", "/auth/sign_up", None, &credentials)).await;
    assert_eq!(status, StatusCode::CREATED);
    sign_in(app, email).await
}

pub async fn sign_in(app: &Router, email: &str) -> String {
    let credentials: Value = json!({ "email": email, "password": PASSWORD });
    let (status, body) = send_json(app, json_request("POST", "/auth/sign_in", None, &credentials)).await;
    assert_eq!(status, StatusCode::OK, "sign-in failed: {body}");
    body["session_token"].as_str().unwrap().to_string()
}

/// Bootstraps the admin account and signs it in.
pub async fn admin_token(server: &TestServer) -> String {
    server
        .state
        .identity
        .ensure_admin(ADMIN_EMAIL, PASSWORD)
        .await
        .unwrap();
    sign_in(&server.app, ADMIN_EMAIL).await
}

/// Submits a complete application through the form route and returns its id.
pub async fn submit_complete_form(app: &Router, token: &str) -> String {
    let parts: Vec<Part> = vec![
        form_part(None),
        file_part("film"),
        file_part("poster"),
        file_part("proof"),
    ];
    let (status, body) = send_json(
        app,
        multipart_request("POST", "/applications/submit", token, &parts),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "submission failed: {body}");
    body["result"]["submissionId"].as_str().unwrap().to_string()
}
