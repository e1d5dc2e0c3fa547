// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use filmfest_domain::LocalFile;

use crate::MemoryObjectStore;

pub fn create_test_file(name: &str, content_type: &str, size: usize) -> LocalFile {
    let data: Vec<u8> = (0..size).map(|i| u8::try_from(i % 251).unwrap_or(0)).collect();
    LocalFile::new(name, content_type, data)
}

/// A memory store with 1 KiB chunks so small files report several steps.
pub fn create_chunked_store() -> MemoryObjectStore {
    MemoryObjectStore::new().with_chunk_size(1024)
}
