// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! - `documents` - Document creation and field replacement
//! - `accounts` - Accounts, sessions and verification tokens

pub mod accounts;
pub mod documents;

pub use accounts::{
    consume_verification_token, create_account, create_session, create_verification_token,
    delete_expired_sessions, delete_session, delete_sessions_for_account, mark_email_verified,
    update_last_sign_in, update_session_activity,
};
pub use documents::{insert_document, replace_document_fields};
