// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod local;
mod memory;
mod object_store;
mod transfer;

#[cfg(test)]
mod tests;

pub use error::StorageError;
pub use local::LocalObjectStore;
pub use memory::{InjectedFailure, MemoryObjectStore, StoredObject};
pub use object_store::{DEFAULT_CHUNK_SIZE, ObjectStore, validate_object_path};
pub use transfer::{
    UploadError, UploadErrorCode, delete_file, transfer_percent, upload_file,
};
