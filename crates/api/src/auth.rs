// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use filmfest_domain::Application;
use filmfest_persistence::{AccountData, Persistence, PersistenceError, SessionData};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::error::AuthError;

/// Account roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Applicants create, edit and submit their own applications.
    Applicant,
    /// Admins review, score and export every submitted application.
    ///
    /// Admins never edit application content.
    Admin,
}

impl Role {
    /// The role name as stored on the account.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applicant => "Applicant",
            Self::Admin => "Admin",
        }
    }

    /// Parses a stored role name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known role.
    pub fn parse(value: &str) -> Result<Self, AuthError> {
        match value {
            "Applicant" => Ok(Self::Applicant),
            "Admin" => Ok(Self::Admin),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {value}"),
            }),
        }
    }
}

/// An authenticated account with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The public account identifier, stored as `userId` on applications.
    pub uid: String,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(uid: String, email: String, role: Role) -> Self {
        Self { uid, email, role }
    }

    /// Builds the actor for a stored account.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored role is unknown.
    pub fn from_account(account: &AccountData) -> Result<Self, AuthError> {
        Ok(Self::new(
            account.uid.clone(),
            account.email.clone(),
            Role::parse(&account.role)?,
        ))
    }
}

/// Authorization service for enforcing role-based access control.
///
/// This service determines whether an authenticated actor has permission
/// to perform a specific action based on their role and, for applicant
/// actions, on ownership of the application.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor is authorized to review applications.
    ///
    /// Only Admin actors may score, flag, annotate or assign reviewers.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_review(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Applicant => Err(AuthError::Unauthorized {
                action: String::from("review"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor is authorized to list or export every application.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_export(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Applicant => Err(AuthError::Unauthorized {
                action: String::from("export"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor owns an application.
    ///
    /// Lifecycle actions (submit, replace a file, delete, withdraw) are
    /// reserved to the owner; admins do not act on an applicant's behalf.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not the application's owner.
    pub fn authorize_owner(
        actor: &AuthenticatedActor,
        application: &Application,
    ) -> Result<(), AuthError> {
        if application.is_owned_by(&actor.uid) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("modify_application"),
                required_role: String::from("Owner"),
            })
        }
    }

    /// Checks if an actor may read an application.
    ///
    /// Owners and admins may read.
    ///
    /// # Errors
    ///
    /// Returns an error otherwise.
    pub fn authorize_view(
        actor: &AuthenticatedActor,
        application: &Application,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Applicant if application.is_owned_by(&actor.uid) => Ok(()),
            Role::Applicant => Err(AuthError::Unauthorized {
                action: String::from("view_application"),
                required_role: String::from("Owner or Admin"),
            }),
        }
    }
}

/// Authentication service for password sign-in and bearer sessions.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Checks credentials and creates a session.
    ///
    /// Unknown emails and wrong passwords fail with the same reason.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The account email
    /// * `password` - The plain-text password
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`)
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails.
    pub fn sign_in(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor), AuthError> {
        let account: AccountData = persistence
            .get_account_by_email(email)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(Self::invalid_credentials)?;

        let matches: bool = Persistence::verify_password(password, &account.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !matches {
            return Err(Self::invalid_credentials());
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_account(&account)?;
        let session_token: String = Self::generate_session_token();

        let expires_at: OffsetDateTime =
            OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at_str: String =
            expires_at
                .format(&Rfc3339)
                .map_err(|e| AuthError::AuthenticationFailed {
                    reason: format!("Failed to format expiration time: {e}"),
                })?;

        persistence
            .create_session(&session_token, account.account_id, &expires_at_str)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;
        persistence
            .update_last_sign_in(account.account_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last sign-in: {e}"),
            })?;

        Ok((session_token, actor))
    }

    /// Validates a session token and returns the session's account.
    ///
    /// The account is re-read on every call, so role and verification
    /// changes apply immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, AccountData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            OffsetDateTime::parse(&session.expires_at, &Rfc3339).map_err(|e| {
                AuthError::AuthenticationFailed {
                    reason: format!("Failed to parse session expiration: {e}"),
                }
            })?;
        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let account: AccountData = persistence
            .get_account_by_id(session.account_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;
        let actor: AuthenticatedActor = AuthenticatedActor::from_account(&account)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok((actor, account))
    }

    /// Deletes a session. Returns whether the session existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn sign_out(persistence: &mut Persistence, session_token: &str) -> Result<bool, AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    /// Generates a session token.
    pub(crate) fn generate_session_token() -> String {
        let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        format!("session_{timestamp}_{}", rand::random::<u64>())
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        }
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::AccountNotFound(msg) => {
                AuthError::AuthenticationFailed { reason: msg }
            }
            _ => AuthError::AuthenticationFailed {
                reason: format!("Database error: {err}"),
            },
        }
    }
}
