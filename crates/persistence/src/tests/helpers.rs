// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{Persistence, SqliteDocumentStore};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_store() -> SqliteDocumentStore {
    SqliteDocumentStore::submissions(Arc::new(Mutex::new(create_test_persistence())))
}
