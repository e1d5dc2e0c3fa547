// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account, session and verification token mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{accounts, sessions, verification_tokens};
use crate::error::PersistenceError;

/// Creates a new account.
///
/// The email is normalized to lowercase for case-insensitive uniqueness.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `uid` - The public account identifier
/// * `email` - The email address (will be normalized)
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The role (`Applicant` or `Admin`)
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateAccount` if the email is taken, or
/// another error if the password cannot be hashed or the insert fails.
pub fn create_account(
    conn: &mut SqliteConnection,
    uid: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Result<i64, PersistenceError> {
    let normalized_email: String = email.trim().to_lowercase();

    info!(email = %normalized_email, role, "Creating account");

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let result: Result<usize, diesel::result::Error> = diesel::insert_into(accounts::table)
        .values((
            accounts::uid.eq(uid),
            accounts::email.eq(&normalized_email),
            accounts::password_hash.eq(&password_hash),
            accounts::role.eq(role),
        ))
        .execute(conn);

    match result {
        Ok(_) => {}
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => return Err(PersistenceError::DuplicateAccount(normalized_email)),
        Err(e) => return Err(e.into()),
    }

    let account_id: i64 = get_last_insert_rowid(conn)?;
    info!(account_id, "Account created");
    Ok(account_id)
}

/// Records a successful sign-in.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_sign_in(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> Result<(), PersistenceError> {
    debug!(account_id, "Updating last_sign_in_at");

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::last_sign_in_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}

/// Marks an account's email address as verified.
///
/// # Errors
///
/// Returns `PersistenceError::AccountNotFound` if the account does not exist.
pub fn mark_email_verified(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> Result<(), PersistenceError> {
    info!(account_id, "Marking email verified");

    let rows_affected: usize = diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::email_verified.eq(1))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::AccountNotFound(account_id.to_string()));
    }
    Ok(())
}

/// Creates a new session.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The session token
/// * `account_id` - The account this session belongs to
/// * `expires_at` - RFC 3339 expiration timestamp
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    account_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(account_id, expires_at, "Creating session");

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::account_id.eq(account_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;
    debug!(session_id, account_id, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    debug!(session_id, "Updating last_activity_at");

    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token. Returns whether a session was removed.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<bool, PersistenceError> {
    debug!("Deleting session by token");

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(rows_affected > 0)
}

/// Deletes every session that expired before `now`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `now` - RFC 3339 timestamp to compare against
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(now))
        .execute(conn)?;

    info!(rows_affected, "Deleted expired sessions");
    Ok(rows_affected)
}

/// Deletes all sessions of an account.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_sessions_for_account(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::account_id.eq(account_id))
        .execute(conn)?;

    info!(account_id, rows_affected, "Deleted sessions for account");
    Ok(rows_affected)
}

/// Stores a one-time email verification token.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_verification_token(
    conn: &mut SqliteConnection,
    token: &str,
    account_id: i64,
) -> Result<(), PersistenceError> {
    debug!(account_id, "Creating verification token");

    diesel::insert_into(verification_tokens::table)
        .values((
            verification_tokens::token.eq(token),
            verification_tokens::account_id.eq(account_id),
        ))
        .execute(conn)?;

    Ok(())
}

/// Consumes a verification token.
///
/// Returns the owning account id, or `None` when the token does not
/// exist or was already used.
///
/// # Errors
///
/// Returns an error if the database query or update fails.
pub fn consume_verification_token(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<Option<i64>, PersistenceError> {
    let account_id: Option<i64> = verification_tokens::table
        .filter(verification_tokens::token.eq(token))
        .filter(verification_tokens::consumed_at.is_null())
        .select(verification_tokens::account_id)
        .first::<i64>(conn)
        .optional()?;

    let Some(account_id) = account_id else {
        debug!("Verification token unknown or already consumed");
        return Ok(None);
    };

    diesel::update(verification_tokens::table)
        .filter(verification_tokens::token.eq(token))
        .set(verification_tokens::consumed_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(Some(account_id))
}
