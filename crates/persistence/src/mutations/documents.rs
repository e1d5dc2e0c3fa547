// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::diesel_schema::documents;
use crate::error::PersistenceError;

/// Inserts a new document.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `collection` - The collection name
/// * `document_id` - The opaque document id
/// * `fields_json` - The serialized field bag
///
/// # Errors
///
/// Returns an error if the insert fails, including on a duplicate id.
pub fn insert_document(
    conn: &mut SqliteConnection,
    collection: &str,
    document_id: &str,
    fields_json: &str,
) -> Result<(), PersistenceError> {
    debug!(collection, document_id, "Inserting document");

    diesel::insert_into(documents::table)
        .values((
            documents::document_id.eq(document_id),
            documents::collection.eq(collection),
            documents::fields.eq(fields_json),
        ))
        .execute(conn)?;

    Ok(())
}

/// Replaces the stored fields of a document.
///
/// # Errors
///
/// Returns `PersistenceError::DocumentNotFound` if no row was updated.
pub fn replace_document_fields(
    conn: &mut SqliteConnection,
    collection: &str,
    document_id: &str,
    fields_json: &str,
) -> Result<(), PersistenceError> {
    debug!(collection, document_id, "Replacing document fields");

    let rows_affected: usize = diesel::update(documents::table)
        .filter(documents::collection.eq(collection))
        .filter(documents::document_id.eq(document_id))
        .set((
            documents::fields.eq(fields_json),
            documents::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::DocumentNotFound(document_id.to_string()));
    }
    Ok(())
}
