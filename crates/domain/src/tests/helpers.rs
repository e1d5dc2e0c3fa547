// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Agreements, ApplicationContent, CrewMember, FilmDetails, FilmFormat, Participant,
    ParticipantRole, Person, SchoolAffiliation, UniversityAffiliation,
};
use std::collections::BTreeSet;

pub fn create_test_person(age: u8) -> Person {
    Person {
        name: String::from("Somchai Jaidee"),
        name_th: Some(String::from("สมชาย ใจดี")),
        age: Some(age),
        phone: String::from("0812345678"),
        email: String::from("somchai@example.com"),
        role: Some(ParticipantRole::Director),
        role_other: None,
    }
}

pub fn create_test_film() -> FilmDetails {
    FilmDetails {
        title: String::from("River Lights"),
        title_th: None,
        genres: BTreeSet::from([String::from("drama")]),
        format: Some(FilmFormat::LiveAction),
        duration_minutes: Some(8),
        synopsis: String::from("A night on the river."),
        local_connection: None,
    }
}

pub const fn all_agreements() -> Agreements {
    Agreements {
        rules_accepted: true,
        rights_confirmed: true,
        originality_confirmed: true,
        privacy_consent: true,
    }
}

pub fn create_youth_content() -> ApplicationContent {
    ApplicationContent {
        film: create_test_film(),
        participant: Participant::Youth {
            submitter: create_test_person(16),
            school: SchoolAffiliation {
                school_name: String::from("Chiang Mai High School"),
                student_id: String::from("S-1001"),
            },
        },
        crew: Vec::new(),
        agreements: all_agreements(),
    }
}

pub fn create_future_content() -> ApplicationContent {
    ApplicationContent {
        film: create_test_film(),
        participant: Participant::Future {
            submitter: create_test_person(21),
            university: UniversityAffiliation {
                university_name: String::from("Chiang Mai University"),
                faculty: String::from("Mass Communication"),
                university_id: String::from("U-2002"),
            },
        },
        crew: Vec::new(),
        agreements: all_agreements(),
    }
}

pub fn create_world_content() -> ApplicationContent {
    ApplicationContent {
        film: create_test_film(),
        participant: Participant::World {
            director: create_test_person(34),
        },
        crew: Vec::new(),
        agreements: all_agreements(),
    }
}

pub fn create_crew_member(age: Option<u8>) -> CrewMember {
    CrewMember {
        name: String::from("Malee Srisuk"),
        role: Some(ParticipantRole::Editor),
        age,
        ..CrewMember::default()
    }
}
