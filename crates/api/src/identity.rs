// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account identity: sign-up, sessions, email verification and
//! auth state notifications.

use filmfest_domain::is_valid_email;
use filmfest_persistence::{AccountData, Persistence};
use serde::Serialize;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService, Role};
use crate::error::{ApiError, translate_persistence_error};
use crate::password_policy::PasswordPolicy;

/// Buffered auth state notifications per subscriber.
const AUTH_EVENT_CAPACITY: usize = 64;

/// A sign-in state change pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStateChange {
    SignedIn { uid: String },
    SignedOut { uid: String },
}

/// The identity behind a session, re-read from the account on each call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
    pub role: String,
}

impl From<&AccountData> for Identity {
    fn from(account: &AccountData) -> Self {
        Self {
            uid: account.uid.clone(),
            email: account.email.clone(),
            email_verified: account.email_verified,
            role: account.role.clone(),
        }
    }
}

/// Identity operations over the shared persistence adapter.
#[derive(Clone)]
pub struct IdentityService {
    persistence: Arc<Mutex<Persistence>>,
    events: broadcast::Sender<AuthStateChange>,
    policy: Arc<PasswordPolicy>,
}

impl IdentityService {
    /// Creates the service with the default password policy.
    #[must_use]
    pub fn new(persistence: Arc<Mutex<Persistence>>) -> Self {
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Self {
            persistence,
            events,
            policy: Arc::new(PasswordPolicy::default()),
        }
    }

    /// Creates an applicant account.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is malformed or taken, or the
    /// password breaks the policy.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        self.register(email, password, Role::Applicant).await
    }

    /// Creates an account with `role`.
    ///
    /// # Errors
    ///
    /// As [`sign_up`](Self::sign_up).
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Identity, ApiError> {
        let email: String = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::InvalidInput {
                field: String::from("email"),
                message: format!("'{email}' is not a valid email address"),
            });
        }
        self.policy.validate(password, &email)?;

        let uid: String = generate_uid();
        let mut persistence = self.persistence.lock().await;
        let account_id: i64 = persistence
            .create_account(&uid, &email, password, role.as_str())
            .map_err(translate_persistence_error)?;
        let account: AccountData = persistence
            .get_account_by_id(account_id)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| ApiError::Internal {
                message: format!("Account {account_id} vanished after creation"),
            })?;

        info!(uid = %account.uid, role = role.as_str(), "Account registered");
        Ok(Identity::from(&account))
    }

    /// Creates an admin account unless one with `email` already exists.
    ///
    /// # Errors
    ///
    /// As [`register`](Self::register).
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        let existing: Option<AccountData> = self
            .persistence
            .lock()
            .await
            .get_account_by_email(&email.trim().to_lowercase())
            .map_err(translate_persistence_error)?;
        match existing {
            Some(account) => {
                if account.role != Role::Admin.as_str() {
                    warn!(uid = %account.uid, "Bootstrap admin email belongs to a non-admin account");
                }
                Ok(Identity::from(&account))
            }
            None => self.register(email, password, Role::Admin).await,
        }
    }

    /// Signs in and returns a bearer session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for unknown emails or wrong passwords.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor), ApiError> {
        let (token, actor) = {
            let mut persistence = self.persistence.lock().await;
            match persistence.delete_expired_sessions() {
                Ok(0) => {}
                Ok(purged) => debug!(purged, "Purged expired sessions"),
                Err(e) => warn!(error = %e, "Failed to purge expired sessions"),
            }
            AuthenticationService::sign_in(&mut persistence, &email.trim().to_lowercase(), password)?
        };
        info!(uid = %actor.uid, "Signed in");
        self.notify(AuthStateChange::SignedIn {
            uid: actor.uid.clone(),
        });
        Ok((token, actor))
    }

    /// Ends a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the token is not a live session.
    pub async fn sign_out(&self, token: &str) -> Result<(), ApiError> {
        let mut persistence = self.persistence.lock().await;
        let (actor, _) = AuthenticationService::validate_session(&mut persistence, token)?;
        AuthenticationService::sign_out(&mut persistence, token)?;
        drop(persistence);

        info!(uid = %actor.uid, "Signed out");
        self.notify(AuthStateChange::SignedOut { uid: actor.uid });
        Ok(())
    }

    /// Ends every session of the token's account. Returns how many were ended.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the token is not a live session.
    pub async fn sign_out_everywhere(&self, token: &str) -> Result<usize, ApiError> {
        let mut persistence = self.persistence.lock().await;
        let (actor, account) = AuthenticationService::validate_session(&mut persistence, token)?;
        let ended: usize = persistence
            .delete_sessions_for_account(account.account_id)
            .map_err(translate_persistence_error)?;
        drop(persistence);

        info!(uid = %actor.uid, sessions = ended, "Signed out everywhere");
        self.notify(AuthStateChange::SignedOut { uid: actor.uid });
        Ok(ended)
    }

    /// Resolves a bearer token to its actor.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the session is unknown or expired.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedActor, ApiError> {
        let mut persistence = self.persistence.lock().await;
        let (actor, _) = AuthenticationService::validate_session(&mut persistence, token)?;
        Ok(actor)
    }

    /// The current identity behind a token, reloaded from the account.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the session is unknown or expired.
    pub async fn current_identity(&self, token: &str) -> Result<Identity, ApiError> {
        let mut persistence = self.persistence.lock().await;
        let (_, account) = AuthenticationService::validate_session(&mut persistence, token)?;
        Ok(Identity::from(&account))
    }

    /// Issues a one-time verification token for an account.
    ///
    /// Mail delivery is outside this service; the token is logged and
    /// returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown uid.
    pub async fn send_verification_email(&self, uid: &str) -> Result<String, ApiError> {
        let mut persistence = self.persistence.lock().await;
        let account: AccountData = persistence
            .get_account_by_uid(uid)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Account"),
                message: format!("No account with uid {uid}"),
            })?;

        let token: String = format!(
            "verify_{}_{}",
            OffsetDateTime::now_utc().unix_timestamp(),
            rand::random::<u64>()
        );
        persistence
            .create_verification_token(&token, account.account_id)
            .map_err(translate_persistence_error)?;

        info!(uid, email = %account.email, token = %token, "Verification email issued");
        Ok(token)
    }

    /// Marks the token's account as verified. Tokens are single-use.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for unknown or used tokens.
    pub async fn verify_email(&self, token: &str) -> Result<Identity, ApiError> {
        let mut persistence = self.persistence.lock().await;
        let account_id: i64 = persistence
            .consume_verification_token(token)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| ApiError::AuthenticationFailed {
                reason: String::from("Invalid or already used verification token"),
            })?;
        persistence
            .mark_email_verified(account_id)
            .map_err(translate_persistence_error)?;
        let account: AccountData = persistence
            .get_account_by_id(account_id)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Account"),
                message: format!("Account {account_id} not found"),
            })?;

        info!(uid = %account.uid, "Email verified");
        Ok(Identity::from(&account))
    }

    /// Subscribes to sign-in and sign-out notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthStateChange> {
        self.events.subscribe()
    }

    fn notify(&self, change: AuthStateChange) {
        // No receivers is not an error.
        if self.events.send(change).is_err() {
            debug!("No auth state subscribers");
        }
    }
}

fn generate_uid() -> String {
    format!("uid_{:016x}", rand::random::<u64>())
}
