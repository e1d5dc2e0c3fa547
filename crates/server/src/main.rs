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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod multipart;
mod session;

use axum::{
    Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use filmfest::{Locale, ProgressEvent, ServiceConfig, SubmissionResult};
use filmfest_api::{
    ApiError, ApplicationView, AuthenticatedActor, AuthorizationService, FlagRequest, Identity,
    IdentityService, ListApplicationsQuery, ListApplicationsResponse, MessageResponse,
    NotesRequest, ReviewStatusRequest, ReviewersRequest, Role, ScoreRequest, ScoreResponse,
    ScoreView, SignInRequest, SignInResponse, SignUpRequest, VerificationIssuedResponse,
    VerifyEmailRequest, assign_reviewers, compute_application_capabilities,
    compute_global_capabilities, delete_application, export_csv, get_application,
    list_applications, list_my_applications, print_summary, replace_file, save_form,
    save_score, set_admin_notes, set_flag, set_review_status, submit_application,
    translate_domain_error, withdraw_application,
};
use filmfest_domain::{Application, FileMetadata, FileSlot, FormDraft, LocalFile, ScoreEntry};
use filmfest_persistence::{Persistence, SqliteDocumentStore};
use filmfest_storage::{LocalObjectStore, validate_object_path};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info, warn};

use crate::multipart::{read_form, read_single_file};
use crate::session::SessionActor;

/// Largest accepted request body: one film, one poster and one proof at
/// their size limits, plus multipart overhead.
const MAX_BODY_BYTES: usize = 600 * 1024 * 1024;

/// Film festival server - HTTP server for submissions and jury review
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Directory uploaded files are stored under
    #[arg(long, default_value = "uploads")]
    storage_dir: PathBuf,

    /// Public URL prefix of stored files. Defaults to this server's `/files` route.
    #[arg(long)]
    public_base_url: Option<String>,

    /// Shortest accepted film, in seconds
    #[arg(long)]
    min_film_seconds: Option<f64>,

    /// Longest accepted film, in seconds
    #[arg(long)]
    max_film_seconds: Option<f64>,

    /// Language of pipeline messages (`en` or `th`)
    #[arg(long, default_value = "en")]
    locale: String,

    /// Tracing filter, e.g. `filmfest=debug`. Overrides `RUST_LOG`.
    #[arg(long)]
    log_filter: Option<String>,

    /// Email of the admin account created at startup
    #[arg(long, env = "FILMFEST_ADMIN_EMAIL")]
    admin_email: Option<String>,

    /// Password of the admin account created at startup
    #[arg(long, env = "FILMFEST_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The `submissions` collection.
    documents: SqliteDocumentStore,
    objects: LocalObjectStore,
    config: Arc<ServiceConfig>,
    identity: IdentityService,
}

impl AppState {
    fn new(
        persistence: Arc<Mutex<Persistence>>,
        objects: LocalObjectStore,
        config: ServiceConfig,
    ) -> Self {
        Self {
            documents: SqliteDocumentStore::submissions(Arc::clone(&persistence)),
            objects,
            config: Arc::new(config),
            identity: IdentityService::new(persistence),
        }
    }
}

/// Result of a draft save or final submission, with every progress
/// event the pipeline emitted.
#[derive(Debug, Clone, Serialize)]
struct FormResponse {
    result: SubmissionResult,
    progress: Vec<ProgressEvent>,
}

/// API response after a file replacement.
#[derive(Debug, Clone, Serialize)]
struct FileReplacedResponse {
    slot: String,
    file: FileMetadata,
}

/// API response after assigning reviewers.
#[derive(Debug, Clone, Serialize)]
struct ReviewersResponse {
    reviewers: Vec<String>,
}

/// Query parameters of the print route.
#[derive(Debug, Deserialize)]
struct PrintQuery {
    locale: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// Machine-readable code, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
    code: Option<String>,
}

impl HttpError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            code: None,
        }
    }

    const fn not_found(message: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
            code: None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            code: self.code,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let (status, code): (StatusCode, Option<String>) = match &err {
            ApiError::AuthenticationFailed { .. } => (StatusCode::UNAUTHORIZED, None),
            ApiError::Unauthorized { .. } => (StatusCode::FORBIDDEN, None),
            ApiError::DomainRuleViolation { rule, .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, Some(rule.clone()))
            }
            ApiError::ValidationFailed { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Some(String::from("validation-failed")),
            ),
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                (StatusCode::BAD_REQUEST, None)
            }
            ApiError::ResourceNotFound { .. } => (StatusCode::NOT_FOUND, None),
            ApiError::StorageFailure { code, .. } if code == "permission-denied" => {
                warn!(error = %err, "Storage access rules rejected a request");
                (StatusCode::FORBIDDEN, Some(code.clone()))
            }
            ApiError::StorageFailure { code, .. } => {
                error!(error = %err, "Storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, Some(code.clone()))
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };
        Self {
            status,
            message: err.to_string(),
            code,
        }
    }
}

/// Maps a pipeline outcome to an HTTP status.
fn pipeline_status(result: &SubmissionResult) -> StatusCode {
    match result.error_code.as_deref() {
        None => StatusCode::OK,
        Some("missing-user-id") => StatusCode::UNAUTHORIZED,
        Some("permission-denied") => StatusCode::FORBIDDEN,
        Some("document-not-found") => StatusCode::NOT_FOUND,
        Some("upload-failed" | "save-failed") => StatusCode::INTERNAL_SERVER_ERROR,
        Some(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Builds the view of `application` for `actor`. Admins see review fields.
fn to_view(actor: &AuthenticatedActor, application: &Application) -> ApplicationView {
    ApplicationView::new(
        application,
        compute_application_capabilities(actor, application),
        actor.role == Role::Admin,
    )
}

/// Content type of a stored object, from its extension.
fn content_type_for(path: &str) -> &'static str {
    let extension: String = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Handler for POST `/auth/sign_up` endpoint.
async fn handle_sign_up(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<Identity>), HttpError> {
    info!("Handling sign_up request");
    let identity: Identity = app_state.identity.sign_up(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(identity)))
}

/// Handler for POST `/auth/sign_in` endpoint.
async fn handle_sign_in(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, HttpError> {
    info!("Handling sign_in request");
    let (session_token, actor) = app_state.identity.sign_in(&req.email, &req.password).await?;
    Ok(Json(SignInResponse {
        session_token,
        uid: actor.uid,
        email: actor.email,
        role: actor.role.as_str().to_string(),
    }))
}

/// Handler for POST `/auth/sign_out` endpoint.
async fn handle_sign_out(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_, token): SessionActor,
) -> Result<Json<MessageResponse>, HttpError> {
    app_state.identity.sign_out(&token).await?;
    Ok(Json(MessageResponse {
        message: String::from("Signed out"),
    }))
}

/// Handler for POST `/auth/sign_out_all` endpoint.
async fn handle_sign_out_all(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_, token): SessionActor,
) -> Result<Json<MessageResponse>, HttpError> {
    let ended: usize = app_state.identity.sign_out_everywhere(&token).await?;
    Ok(Json(MessageResponse {
        message: format!("Ended {ended} sessions"),
    }))
}

/// Handler for GET `/auth/me` endpoint.
async fn handle_me(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_, token): SessionActor,
) -> Result<Json<Identity>, HttpError> {
    Ok(Json(app_state.identity.current_identity(&token).await?))
}

/// Handler for POST `/auth/verification` endpoint.
///
/// Issues a verification token for the signed-in account.
async fn handle_send_verification(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
) -> Result<Json<VerificationIssuedResponse>, HttpError> {
    let token: String = app_state.identity.send_verification_email(&actor.uid).await?;
    Ok(Json(VerificationIssuedResponse { token }))
}

/// Handler for POST `/auth/verify` endpoint.
async fn handle_verify_email(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<Identity>, HttpError> {
    Ok(Json(app_state.identity.verify_email(&req.token).await?))
}

async fn run_form(
    app_state: &AppState,
    actor: &AuthenticatedActor,
    multipart: Multipart,
    is_draft: bool,
) -> Result<(StatusCode, Json<FormResponse>), HttpError> {
    let form: FormDraft = read_form(multipart).await?;
    info!(
        uid = %actor.uid,
        application_id = %form.application_id,
        document_id = ?form.document_id,
        is_draft,
        "Handling form save"
    );

    let mut progress: Vec<ProgressEvent> = Vec::new();
    let result: SubmissionResult = save_form(
        &app_state.documents,
        &app_state.objects,
        &app_state.config,
        actor,
        form,
        is_draft,
        |event| progress.push(event.clone()),
    )
    .await?;

    Ok((pipeline_status(&result), Json(FormResponse { result, progress })))
}

/// Handler for POST `/applications/draft` endpoint.
async fn handle_save_draft(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    multipart: Multipart,
) -> Result<(StatusCode, Json<FormResponse>), HttpError> {
    run_form(&app_state, &actor, multipart, true).await
}

/// Handler for POST `/applications/submit` endpoint.
async fn handle_submit_form(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    multipart: Multipart,
) -> Result<(StatusCode, Json<FormResponse>), HttpError> {
    run_form(&app_state, &actor, multipart, false).await
}

/// Handler for GET `/applications` endpoint.
///
/// Lists the signed-in applicant's applications.
async fn handle_list_my_applications(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
) -> Result<Json<ListApplicationsResponse>, HttpError> {
    let applications: Vec<Application> =
        list_my_applications(&app_state.documents, &actor).await?;
    Ok(Json(ListApplicationsResponse {
        applications: applications.iter().map(|a| to_view(&actor, a)).collect(),
        capabilities: compute_global_capabilities(&actor),
    }))
}

/// Handler for GET `/applications/{id}` endpoint.
async fn handle_get_application(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<ApplicationView>, HttpError> {
    let application: Application = get_application(&app_state.documents, &actor, &id).await?;
    Ok(Json(to_view(&actor, &application)))
}

/// Handler for POST `/applications/{id}/submit` endpoint.
///
/// Submits a stored draft without re-uploading its files.
async fn handle_submit_draft(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<ApplicationView>, HttpError> {
    info!(uid = %actor.uid, id = %id, "Handling submit_application request");
    let application: Application =
        submit_application(
            &app_state.documents,
            &app_state.config.file_rules,
            &actor,
            &id,
        )
        .await?;
    Ok(Json(to_view(&actor, &application)))
}

/// Handler for POST `/applications/{id}/withdraw` endpoint.
async fn handle_withdraw(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<ApplicationView>, HttpError> {
    info!(uid = %actor.uid, id = %id, "Handling withdraw_application request");
    let application: Application =
        withdraw_application(&app_state.documents, &actor, &id).await?;
    Ok(Json(to_view(&actor, &application)))
}

/// Handler for POST `/applications/{id}/delete` endpoint.
async fn handle_delete(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(uid = %actor.uid, id = %id, "Handling delete_application request");
    delete_application(&app_state.documents, &app_state.objects, &actor, &id).await?;
    Ok(Json(MessageResponse {
        message: format!("Application {id} deleted"),
    }))
}

/// Handler for PUT `/applications/{id}/files/{slot}` endpoint.
async fn handle_replace_file(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path((id, slot)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<Json<FileReplacedResponse>, HttpError> {
    let slot: FileSlot = slot.parse().map_err(translate_domain_error)?;
    let file: LocalFile = read_single_file(multipart).await?;
    info!(
        uid = %actor.uid,
        id = %id,
        %slot,
        file_name = %file.file_name,
        "Handling replace_file request"
    );

    let file: FileMetadata = replace_file(
        &app_state.documents,
        &app_state.objects,
        &app_state.config.file_rules,
        &actor,
        &id,
        slot,
        &file,
        &mut |percent| debug!(percent, "Replacement upload progress"),
    )
    .await?;

    Ok(Json(FileReplacedResponse {
        slot: slot.as_str().to_string(),
        file,
    }))
}

/// Handler for GET `/admin/applications` endpoint.
async fn handle_admin_list(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Query(query): Query<ListApplicationsQuery>,
) -> Result<Json<ListApplicationsResponse>, HttpError> {
    let applications: Vec<Application> =
        list_applications(&app_state.documents, &actor, &query.to_filter()?).await?;
    Ok(Json(ListApplicationsResponse {
        applications: applications.iter().map(|a| to_view(&actor, a)).collect(),
        capabilities: compute_global_capabilities(&actor),
    }))
}

/// Handler for POST `/admin/applications/{id}/score` endpoint.
async fn handle_score(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(id): Path<String>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, HttpError> {
    let entry: ScoreEntry = save_score(
        &app_state.documents,
        &actor,
        &id,
        req.criteria()?,
        req.comment.clone(),
    )
    .await?;
    Ok(Json(ScoreResponse {
        score: ScoreView::from(&entry),
        message: format!("Score saved for application {id}"),
    }))
}

/// Handler for POST `/admin/applications/{id}/status` endpoint.
async fn handle_review_status(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(id): Path<String>,
    Json(req): Json<ReviewStatusRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let review_status = req.parse()?;
    set_review_status(&app_state.documents, &actor, &id, review_status).await?;
    Ok(Json(MessageResponse {
        message: format!("Review status set to {review_status}"),
    }))
}

/// Handler for POST `/admin/applications/{id}/notes` endpoint.
async fn handle_notes(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(id): Path<String>,
    Json(req): Json<NotesRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    set_admin_notes(&app_state.documents, &actor, &id, req.notes).await?;
    Ok(Json(MessageResponse {
        message: String::from("Notes saved"),
    }))
}

/// Handler for POST `/admin/applications/{id}/flag` endpoint.
async fn handle_flag(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(id): Path<String>,
    Json(req): Json<FlagRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    set_flag(&app_state.documents, &actor, &id, req.flagged, req.reason).await?;
    let message: &str = if req.flagged { "Flagged" } else { "Unflagged" };
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

/// Handler for POST `/admin/applications/{id}/reviewers` endpoint.
async fn handle_reviewers(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(id): Path<String>,
    Json(req): Json<ReviewersRequest>,
) -> Result<Json<ReviewersResponse>, HttpError> {
    let reviewers: Vec<String> =
        assign_reviewers(&app_state.documents, &actor, &id, req.reviewers).await?;
    Ok(Json(ReviewersResponse { reviewers }))
}

/// Handler for GET `/admin/export.csv` endpoint.
///
/// Accepts the same filters as the admin listing.
async fn handle_export(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Query(query): Query<ListApplicationsQuery>,
) -> Result<Response, HttpError> {
    AuthorizationService::authorize_export(&actor).map_err(ApiError::from)?;
    let applications: Vec<Application> =
        list_applications(&app_state.documents, &actor, &query.to_filter()?).await?;
    let csv: String = export_csv(&applications)?;
    info!(uid = %actor.uid, rows = applications.len(), "Exported applications");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"applications.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// Handler for GET `/admin/applications/{id}/print` endpoint.
async fn handle_print(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(id): Path<String>,
    Query(query): Query<PrintQuery>,
) -> Result<Response, HttpError> {
    AuthorizationService::authorize_review(&actor).map_err(ApiError::from)?;
    let locale: Locale = match query.locale.as_deref() {
        Some(value) => value.parse().map_err(HttpError::bad_request)?,
        None => app_state.config.locale,
    };
    let application: Application = get_application(&app_state.documents, &actor, &id).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        print_summary(&application, locale),
    )
        .into_response())
}

/// Handler for GET `/files/{*path}` endpoint.
///
/// Serves objects of the local store under the public base URL.
async fn handle_file(
    AxumState(app_state): AxumState<AppState>,
    Path(path): Path<String>,
) -> Result<Response, HttpError> {
    validate_object_path(&path).map_err(|e| HttpError::bad_request(e.to_string()))?;
    let missing = || HttpError::not_found(format!("Object '{path}' does not exist"));
    let file: tokio::fs::File = tokio::fs::File::open(app_state.objects.root().join(&path))
        .await
        .map_err(|_| missing())?;
    let metadata = file.metadata().await.map_err(|_| missing())?;
    if !metadata.is_file() {
        return Err(missing());
    }

    // Films can be large; stream rather than buffering the object
    let body: Body = Body::from_stream(ReaderStream::new(file));
    let mut response: Response =
        ([(header::CONTENT_TYPE, content_type_for(&path))], body).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_LENGTH, metadata.len().into());
    Ok(response)
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/sign_up", post(handle_sign_up))
        .route("/auth/sign_in", post(handle_sign_in))
        .route("/auth/sign_out", post(handle_sign_out))
        .route("/auth/sign_out_all", post(handle_sign_out_all))
        .route("/auth/me", get(handle_me))
        .route("/auth/verification", post(handle_send_verification))
        .route("/auth/verify", post(handle_verify_email))
        .route("/applications", get(handle_list_my_applications))
        .route("/applications/draft", post(handle_save_draft))
        .route("/applications/submit", post(handle_submit_form))
        .route("/applications/{id}", get(handle_get_application))
        .route("/applications/{id}/submit", post(handle_submit_draft))
        .route("/applications/{id}/withdraw", post(handle_withdraw))
        .route("/applications/{id}/delete", post(handle_delete))
        .route("/applications/{id}/files/{slot}", put(handle_replace_file))
        .route("/admin/applications", get(handle_admin_list))
        .route("/admin/applications/{id}/score", post(handle_score))
        .route("/admin/applications/{id}/status", post(handle_review_status))
        .route("/admin/applications/{id}/notes", post(handle_notes))
        .route("/admin/applications/{id}/flag", post(handle_flag))
        .route("/admin/applications/{id}/reviewers", post(handle_reviewers))
        .route("/admin/applications/{id}/print", get(handle_print))
        .route("/admin/export.csv", get(handle_export))
        .route("/files/{*path}", get(handle_file))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state)
}

/// Pipeline configuration from the command line.
fn build_config(args: &Args) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    let locale: Locale = args.locale.parse()?;
    let config: ServiceConfig = ServiceConfig::default().with_locale(locale);
    if args.min_film_seconds.is_none() && args.max_film_seconds.is_none() {
        return Ok(config);
    }
    Ok(config.with_film_duration(
        args.min_film_seconds.unwrap_or(0.0),
        args.max_film_seconds.unwrap_or(f64::MAX),
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    let filter: tracing_subscriber::EnvFilter = match &args.log_filter {
        Some(directives) => tracing_subscriber::EnvFilter::new(directives),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Initializing film festival server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    tokio::fs::create_dir_all(&args.storage_dir).await?;
    let public_base_url: String = args
        .public_base_url
        .clone()
        .unwrap_or_else(|| format!("http://127.0.0.1:{}/files", args.port));
    let objects: LocalObjectStore = LocalObjectStore::new(args.storage_dir.clone(), public_base_url);

    let app_state: AppState = AppState::new(
        Arc::new(Mutex::new(persistence)),
        objects,
        build_config(&args)?,
    );

    if let (Some(email), Some(password)) = (&args.admin_email, &args.admin_password) {
        let admin: Identity = app_state.identity.ensure_admin(email, password).await?;
        info!(uid = %admin.uid, email = %admin.email, "Admin account ready");
    }

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
