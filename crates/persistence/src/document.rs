// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schema-less document model.
//!
//! A document is a loosely typed field bag keyed by an opaque id. Writes
//! are expressed as a [`Patch`]: an ordered list of dotted field paths and
//! values. A value may be a literal (including `null`) or a request for
//! the store's current time, resolved when the write is applied.

use serde_json::{Map, Value};
use std::future::Future;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PersistenceError;

/// Collection holding application documents.
pub const SUBMISSIONS_COLLECTION: &str = "submissions";

/// Stored fields of a document.
pub type Fields = Map<String, Value>;

/// A value to write at one field path.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A literal JSON value. `Value::Null` writes an explicit null.
    Value(Value),
    /// The store's current time, as an RFC 3339 string.
    ServerTimestamp,
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// An ordered set of field writes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Patch {
    entries: Vec<(String, FieldValue)>,
}

impl Patch {
    /// Creates an empty patch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Writes `value` at the dotted `path`.
    #[must_use]
    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries
            .push((path.into(), FieldValue::Value(value.into())));
        self
    }

    /// Writes an explicit `null` at the dotted `path`.
    #[must_use]
    pub fn set_null(self, path: impl Into<String>) -> Self {
        self.set(path, Value::Null)
    }

    /// Writes the store's current time at the dotted `path`.
    #[must_use]
    pub fn server_timestamp(mut self, path: impl Into<String>) -> Self {
        self.entries.push((path.into(), FieldValue::ServerTimestamp));
        self
    }

    /// Appends a write in place.
    pub fn push(&mut self, path: impl Into<String>, value: FieldValue) {
        self.entries.push((path.into(), value));
    }

    /// The writes in application order.
    #[must_use]
    pub fn entries(&self) -> &[(String, FieldValue)] {
        &self.entries
    }

    /// Returns true when the patch writes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A document read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Looks up a value by dotted path.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        get_path(&self.fields, path)
    }
}

/// Looks up a value by dotted path inside a field bag.
#[must_use]
pub fn get_path<'a>(fields: &'a Fields, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first: &str = segments.next()?;
    let mut current: &Value = fields.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Applies `patch` to `fields`.
///
/// Intermediate objects are created as needed. Writing through a path
/// whose prefix holds a non-object value is an error and leaves `fields`
/// partially patched; callers apply patches to a copy.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidPatch` for empty path segments or
/// when a path prefix is not an object.
pub fn apply_patch(
    fields: &mut Fields,
    patch: &Patch,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let timestamp: String = now
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))?;

    for (path, value) in patch.entries() {
        let resolved: Value = match value {
            FieldValue::Value(v) => v.clone(),
            FieldValue::ServerTimestamp => Value::String(timestamp.clone()),
        };
        set_path(fields, path, resolved)?;
    }
    Ok(())
}

fn set_path(fields: &mut Fields, path: &str, value: Value) -> Result<(), PersistenceError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(PersistenceError::InvalidPatch(format!(
            "empty segment in path '{path}'"
        )));
    }
    let Some((last, parents)) = segments.split_last() else {
        return Err(PersistenceError::InvalidPatch(String::from("empty path")));
    };

    let mut current: &mut Fields = fields;
    for segment in parents {
        let entry: &mut Value = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = entry.as_object_mut().ok_or_else(|| {
            PersistenceError::InvalidPatch(format!(
                "'{segment}' in path '{path}' is not an object"
            ))
        })?;
    }
    current.insert((*last).to_string(), value);
    Ok(())
}

/// Document store contract for one collection.
///
/// Each call is atomic on its own; a read followed by a write is not.
pub trait DocumentStore: Send + Sync {
    /// Reads a document by id. Missing documents are `Ok(None)`.
    fn get(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Document>, PersistenceError>> + Send;

    /// Creates a document with a store-assigned id and returns the id.
    fn create(&self, patch: Patch) -> impl Future<Output = Result<String, PersistenceError>> + Send;

    /// Merges `patch` into an existing document.
    ///
    /// Fails with `PersistenceError::DocumentNotFound` when `id` does not exist.
    fn update(
        &self,
        id: &str,
        patch: Patch,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Lists every document in the collection, oldest first.
    fn list(&self) -> impl Future<Output = Result<Vec<Document>, PersistenceError>> + Send;
}

/// Generates an opaque document id.
#[must_use]
pub fn generate_document_id() -> String {
    format!("{:016x}{:08x}", rand::random::<u64>(), rand::random::<u32>())
}
