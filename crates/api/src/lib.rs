// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application, review and identity services of the submission service.
//!
//! Every operation takes the authenticated actor explicitly and checks
//! role, ownership and the application status guard before any I/O.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod applications;
mod auth;
mod capabilities;
mod error;
mod export;
mod identity;
mod password_policy;
mod request_response;
mod review;

#[cfg(test)]
mod tests;

pub use applications::{
    delete_application, get_application, list_my_applications, load_application, replace_file,
    save_form, submit_application, withdraw_application,
};
pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use capabilities::{compute_application_capabilities, compute_global_capabilities};
pub use error::{
    ApiError, AuthError, translate_domain_error, translate_file_rejection,
    translate_persistence_error, translate_submission_error, translate_upload_error,
};
pub use export::{EXPORT_HEADER, export_csv, print_summary};
pub use identity::{AuthStateChange, Identity, IdentityService};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    ApplicationCapabilities, ApplicationView, Capability, FilesView, FlagRequest, FormPayload,
    GlobalCapabilities, ListApplicationsQuery, ListApplicationsResponse, MessageResponse,
    NotesRequest, ReviewStatusRequest, ReviewView, ReviewersRequest, ScoreRequest, ScoreResponse,
    ScoreView, SignInRequest, SignInResponse, SignUpRequest, VerificationIssuedResponse,
    VerifyEmailRequest,
};
pub use review::{
    ApplicationFilter, assign_reviewers, average_score, list_applications, save_score,
    set_admin_notes, set_flag, set_review_status,
};
