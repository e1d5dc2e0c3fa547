// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use filmfest::{ServiceConfig, SubmissionResult};
use filmfest_domain::{
    Agreements, ApplicationContent, FileSlot, FilmDetails, FilmFormat, FormDraft, LocalFile,
    Participant, ParticipantRole, Person, SchoolAffiliation,
};
use filmfest_persistence::{DocumentStore, MemoryDocumentStore, Patch, Persistence};
use filmfest_storage::MemoryObjectStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::applications::save_form;
use crate::auth::{AuthenticatedActor, Role};
use crate::identity::IdentityService;

pub fn create_applicant(uid: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(uid.to_string(), format!("{uid}@example.com"), Role::Applicant)
}

pub fn create_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(
        String::from("admin-1"),
        String::from("jury@example.com"),
        Role::Admin,
    )
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
            submitter: Person {
                name: String::from("Naree Wongsa"),
                name_th: None,
                age: Some(16),
                phone: String::from("0891112222"),
                email: String::from("naree@example.com"),
                role: Some(ParticipantRole::Director),
                role_other: None,
            },
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

fn bytes(size: usize) -> Vec<u8> {
    (0..size).map(|i| u8::try_from(i % 241).unwrap_or(0)).collect()
}

pub fn create_file(slot: FileSlot) -> LocalFile {
    match slot {
        FileSlot::Film => LocalFile::new("Paper Boats.mp4", "video/mp4", bytes(3000)),
        FileSlot::Poster => LocalFile::new("poster.png", "image/png", bytes(2000)),
        FileSlot::Proof => LocalFile::new("student card.pdf", "application/pdf", bytes(1000)),
    }
}

pub fn create_form(slots: &[FileSlot]) -> FormDraft {
    let mut form: FormDraft = FormDraft::new("", "app-1", create_youth_content());
    for slot in slots {
        form.files.set(*slot, Some(create_file(*slot)));
    }
    form
}

/// Stores and object store shared by one test.
pub struct Fixture {
    pub documents: MemoryDocumentStore,
    pub objects: MemoryObjectStore,
    pub config: ServiceConfig,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            documents: MemoryDocumentStore::new(),
            objects: MemoryObjectStore::new().with_chunk_size(1024),
            config: ServiceConfig::default(),
        }
    }

    /// Runs the pipeline for `form` and returns the new document id.
    pub async fn seed_form(
        &self,
        actor: &AuthenticatedActor,
        form: FormDraft,
        is_draft: bool,
    ) -> String {
        let result: SubmissionResult = save_form(
            &self.documents,
            &self.objects,
            &self.config,
            actor,
            form,
            is_draft,
            |_| {},
        )
        .await
        .unwrap();
        assert!(result.success, "seeding failed: {:?}", result.error);
        result.submission_id.unwrap()
    }

    /// A draft owned by `actor` carrying the given files.
    pub async fn seed_draft(&self, actor: &AuthenticatedActor, slots: &[FileSlot]) -> String {
        self.seed_form(actor, create_form(slots), true).await
    }

    /// A submitted application owned by `actor`.
    pub async fn seed_submitted(&self, actor: &AuthenticatedActor) -> String {
        self.seed_form(actor, create_form(&FileSlot::ALL), false).await
    }

    /// A submitted application of `actor` forced into `status`.
    pub async fn seed_with_status(&self, actor: &AuthenticatedActor, status: &str) -> String {
        let id: String = self.seed_submitted(actor).await;
        self.documents
            .update(&id, Patch::new().set("status", status))
            .await
            .unwrap();
        id
    }
}

pub fn create_identity_service() -> IdentityService {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    IdentityService::new(Arc::new(Mutex::new(persistence)))
}
