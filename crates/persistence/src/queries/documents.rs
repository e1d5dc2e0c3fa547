// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::diesel_schema::documents;
use crate::error::PersistenceError;

/// Diesel Queryable struct for document rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = documents)]
pub struct DocumentRow {
    pub seq: i64,
    pub document_id: String,
    pub collection: String,
    pub fields: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Retrieves a document by id within a collection.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the document is not found.
pub fn get_document(
    conn: &mut SqliteConnection,
    collection: &str,
    document_id: &str,
) -> Result<Option<DocumentRow>, PersistenceError> {
    debug!(collection, document_id, "Looking up document");

    documents::table
        .filter(documents::collection.eq(collection))
        .filter(documents::document_id.eq(document_id))
        .select(DocumentRow::as_select())
        .first(conn)
        .optional()
        .map_err(PersistenceError::from)
}

/// Lists every document in a collection in insertion order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_documents(
    conn: &mut SqliteConnection,
    collection: &str,
) -> Result<Vec<DocumentRow>, PersistenceError> {
    debug!(collection, "Listing documents");

    documents::table
        .filter(documents::collection.eq(collection))
        .order(documents::seq.asc())
        .select(DocumentRow::as_select())
        .load(conn)
        .map_err(PersistenceError::from)
}
