// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use filmfest_domain::{
    Agreements, ApplicationContent, FileSlot, FilmDetails, FilmFormat, FormDraft, LocalFile,
    Participant, ParticipantRole, Person, SchoolAffiliation,
};
use filmfest_storage::MemoryObjectStore;
use std::collections::BTreeSet;

pub fn create_test_person(age: u8) -> Person {
    Person {
        name: String::from("Naree Wongsa"),
        name_th: Some(String::from("นารี วงศ์ษา")),
        age: Some(age),
        phone: String::from("0891112222"),
        email: String::from("naree@example.com"),
        role: Some(ParticipantRole::Director),
        role_other: None,
    }
}

pub fn create_youth_content() -> ApplicationContent {
    ApplicationContent {
        film: FilmDetails {
            title: String::from("Paper Boats"),
            title_th: Some(String::from("เรือกระดาษ")),
            genres: BTreeSet::from([String::from("drama"), String::from("family")]),
            format: Some(FilmFormat::LiveAction),
            duration_minutes: Some(7),
            synopsis: String::from("Two friends race boats down a flooded soi."),
            local_connection: None,
        },
        participant: Participant::Youth {
            submitter: create_test_person(16),
            school: SchoolAffiliation {
                school_name: String::from("Yupparaj Wittayalai"),
                student_id: String::from("Y-3301"),
            },
        },
        crew: Vec::new(),
        agreements: Agreements {
            rules_accepted: true,
            rights_confirmed: true,
            originality_confirmed: true,
            privacy_consent: true,
        },
    }
}

pub fn create_youth_form() -> FormDraft {
    FormDraft::new("user-1", "app-1", create_youth_content())
}

fn bytes(size: usize) -> Vec<u8> {
    (0..size).map(|i| u8::try_from(i % 241).unwrap_or(0)).collect()
}

pub fn create_film_file() -> LocalFile {
    LocalFile::new("Paper Boats.mp4", "video/mp4", bytes(3000))
}

pub fn create_poster_file() -> LocalFile {
    LocalFile::new("poster.png", "image/png", bytes(2000))
}

pub fn create_proof_file() -> LocalFile {
    LocalFile::new("student card.pdf", "application/pdf", bytes(1000))
}

pub fn create_file(slot: FileSlot) -> LocalFile {
    match slot {
        FileSlot::Film => create_film_file(),
        FileSlot::Poster => create_poster_file(),
        FileSlot::Proof => create_proof_file(),
    }
}

pub fn with_files(mut form: FormDraft, slots: &[FileSlot]) -> FormDraft {
    for slot in slots {
        form.files.set(*slot, Some(create_file(*slot)));
    }
    form
}

pub fn create_complete_form() -> FormDraft {
    with_files(create_youth_form(), &FileSlot::ALL)
}

fn mp4_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let len = u32::try_from(payload.len() + 8).unwrap();
    let mut out = len.to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

/// A minimal MP4 carrying only a movie header of the given length.
pub fn create_mp4_with_duration(seconds: u32) -> LocalFile {
    let mut mvhd = vec![0, 0, 0, 0];
    mvhd.extend_from_slice(&[0; 8]);
    mvhd.extend_from_slice(&1000_u32.to_be_bytes());
    mvhd.extend_from_slice(&(seconds * 1000).to_be_bytes());
    mvhd.extend_from_slice(&[0; 80]);

    let mut data = mp4_box(b"ftyp", b"isom\0\0\0\0");
    data.extend(mp4_box(b"moov", &mp4_box(b"mvhd", &mvhd)));
    LocalFile::new("film.mp4", "video/mp4", data)
}

/// A memory object store with 1 KiB chunks so test files report several steps.
pub fn create_object_store() -> MemoryObjectStore {
    MemoryObjectStore::new().with_chunk_size(1024)
}
