// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! - `documents` - Document lookup and listing
//! - `accounts` - Account and session lookup, password verification

pub mod accounts;
pub mod documents;

pub use accounts::{
    get_account_by_email, get_account_by_id, get_account_by_uid, get_session_by_token,
    verify_password,
};
pub use documents::{DocumentRow, get_document, list_documents};
