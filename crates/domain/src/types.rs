// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Competition category.
///
/// Each category carries its own role-holder and affiliation schema,
/// see [`Participant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// High-school students.
    Youth,
    /// University students.
    Future,
    /// Open international competition.
    World,
}

impl Category {
    /// Converts this category to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Youth => "youth",
            Self::Future => "future",
            Self::World => "world",
        }
    }

    /// Allowed age of the submitter (or director for World) on final submission.
    #[must_use]
    pub const fn participant_age_range(&self) -> RangeInclusive<u8> {
        match self {
            Self::Youth => 12..=18,
            Self::Future => 17..=25,
            Self::World => 18..=99,
        }
    }

    /// Upper age bound for crew members, where the category has one.
    #[must_use]
    pub const fn crew_age_limit(&self) -> Option<u8> {
        match self {
            Self::Youth => Some(18),
            Self::Future => Some(25),
            Self::World => None,
        }
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youth" => Ok(Self::Youth),
            "future" => Ok(Self::Future),
            "world" => Ok(Self::World),
            _ => Err(DomainError::InvalidCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Production format of a film.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilmFormat {
    LiveAction,
    Animation,
}

impl FilmFormat {
    /// Converts this format to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LiveAction => "live-action",
            Self::Animation => "animation",
        }
    }
}

impl FromStr for FilmFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live-action" | "live_action" => Ok(Self::LiveAction),
            "animation" => Ok(Self::Animation),
            _ => Err(DomainError::InvalidFilmFormat(s.to_string())),
        }
    }
}

/// Role a person played in the production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantRole {
    Director,
    Producer,
    Screenwriter,
    Cinematographer,
    Editor,
    SoundDesigner,
    ProductionDesigner,
    Actor,
    /// Free-text role; the text lives in `role_other`.
    Other,
}

impl ParticipantRole {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::Producer => "producer",
            Self::Screenwriter => "screenwriter",
            Self::Cinematographer => "cinematographer",
            Self::Editor => "editor",
            Self::SoundDesigner => "sound-designer",
            Self::ProductionDesigner => "production-designer",
            Self::Actor => "actor",
            Self::Other => "other",
        }
    }
}

impl FromStr for ParticipantRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "director" => Ok(Self::Director),
            "producer" => Ok(Self::Producer),
            "screenwriter" => Ok(Self::Screenwriter),
            "cinematographer" => Ok(Self::Cinematographer),
            "editor" => Ok(Self::Editor),
            "sound-designer" => Ok(Self::SoundDesigner),
            "production-designer" => Ok(Self::ProductionDesigner),
            "actor" => Ok(Self::Actor),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidParticipantRole(s.to_string())),
        }
    }
}

/// Film-level fields of an application.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilmDetails {
    pub title: String,
    pub title_th: Option<String>,
    pub genres: BTreeSet<String>,
    pub format: Option<FilmFormat>,
    pub duration_minutes: Option<u32>,
    pub synopsis: String,
    /// How the film relates to the host region, if at all.
    pub local_connection: Option<String>,
}

/// The person responsible for a submission (submitter or director).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub name_th: Option<String>,
    pub age: Option<u8>,
    pub phone: String,
    pub email: String,
    pub role: Option<ParticipantRole>,
    pub role_other: Option<String>,
}

/// High-school affiliation of a Youth submitter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchoolAffiliation {
    pub school_name: String,
    pub student_id: String,
}

/// University affiliation of a Future submitter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UniversityAffiliation {
    pub university_name: String,
    pub faculty: String,
    pub university_id: String,
}

/// Category-specific role holder.
///
/// The variant *is* the competition category: there is no separate
/// category field that could disagree with the payload shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Participant {
    Youth {
        submitter: Person,
        school: SchoolAffiliation,
    },
    Future {
        submitter: Person,
        university: UniversityAffiliation,
    },
    World {
        director: Person,
    },
}

impl Participant {
    /// Returns the competition category of this participant.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Youth { .. } => Category::Youth,
            Self::Future { .. } => Category::Future,
            Self::World { .. } => Category::World,
        }
    }

    /// Returns the role holder regardless of category.
    #[must_use]
    pub const fn role_holder(&self) -> &Person {
        match self {
            Self::Youth { submitter, .. } | Self::Future { submitter, .. } => submitter,
            Self::World { director } => director,
        }
    }
}

/// A crew member. Same shape as a role holder, with optional age and
/// optional school affiliation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub name_th: Option<String>,
    pub role: Option<ParticipantRole>,
    pub role_other: Option<String>,
    pub age: Option<u8>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub school_name: Option<String>,
    pub student_id: Option<String>,
}

/// The four consent checkboxes of the submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Agreements {
    pub rules_accepted: bool,
    pub rights_confirmed: bool,
    pub originality_confirmed: bool,
    pub privacy_consent: bool,
}

impl Agreements {
    /// Returns true when every checkbox is ticked.
    #[must_use]
    pub const fn all_accepted(&self) -> bool {
        self.rules_accepted
            && self.rights_confirmed
            && self.originality_confirmed
            && self.privacy_consent
    }
}

/// Everything the applicant types into the form, minus files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationContent {
    pub film: FilmDetails,
    pub participant: Participant,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    #[serde(default)]
    pub agreements: Agreements,
}

impl ApplicationContent {
    /// Returns the competition category of this content.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.participant.category()
    }
}
