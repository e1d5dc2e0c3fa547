// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Review scores.
//!
//! The total of a score entry is always derived from its four criteria.
//! An application holds at most one entry per grader.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Highest score a single criterion can receive.
pub const MAX_CRITERION_SCORE: u8 = 10;

/// The four judging criteria, each scored 0 to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreCriteria {
    pub technical: u8,
    pub story: u8,
    pub creativity: u8,
    pub overall: u8,
}

impl ScoreCriteria {
    /// Creates criteria after checking every value is within 0 to 10.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScore` naming the first criterion out of range.
    pub fn new(technical: u8, story: u8, creativity: u8, overall: u8) -> Result<Self, DomainError> {
        let criteria = Self {
            technical,
            story,
            creativity,
            overall,
        };
        criteria.validate()?;
        Ok(criteria)
    }

    /// Checks every criterion is within 0 to 10.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScore` naming the first criterion out of range.
    pub fn validate(&self) -> Result<(), DomainError> {
        [
            ("technical", self.technical),
            ("story", self.story),
            ("creativity", self.creativity),
            ("overall", self.overall),
        ]
        .into_iter()
        .find(|(_, value)| *value > MAX_CRITERION_SCORE)
        .map_or(Ok(()), |(criterion, value)| {
            Err(DomainError::InvalidScore { criterion, value })
        })
    }

    /// Sum of the four criteria (0 to 40).
    #[must_use]
    pub const fn total(&self) -> u8 {
        self.technical + self.story + self.creativity + self.overall
    }
}

/// One grader's score for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub grader_id: String,
    pub grader_name: Option<String>,
    pub criteria: ScoreCriteria,
    pub comment: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub scored_at: OffsetDateTime,
}

impl ScoreEntry {
    /// Total score, always derived from the criteria.
    #[must_use]
    pub const fn total(&self) -> u8 {
        self.criteria.total()
    }
}

/// Inserts `entry`, replacing any existing entry from the same grader.
///
/// The replaced entry keeps its position in the list.
///
/// # Errors
///
/// Returns an error if the grader identity is empty or a criterion is out of range.
pub fn upsert_score(scores: &mut Vec<ScoreEntry>, entry: ScoreEntry) -> Result<(), DomainError> {
    if entry.grader_id.trim().is_empty() {
        return Err(DomainError::MissingGrader);
    }
    entry.criteria.validate()?;

    match scores
        .iter_mut()
        .find(|existing| existing.grader_id == entry.grader_id)
    {
        Some(existing) => *existing = entry,
        None => scores.push(entry),
    }
    Ok(())
}

/// Mean total over all entries, or `None` when nobody has scored yet.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_total(scores: &[ScoreEntry]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: u32 = scores.iter().map(|s| u32::from(s.total())).sum();
    Some(f64::from(sum) / scores.len() as f64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(grader: &str, technical: u8, story: u8, creativity: u8, overall: u8) -> ScoreEntry {
        ScoreEntry {
            grader_id: grader.to_string(),
            grader_name: None,
            criteria: ScoreCriteria::new(technical, story, creativity, overall).unwrap(),
            comment: None,
            scored_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_total_is_sum_of_criteria() {
        let e = entry("a", 7, 8, 9, 8);
        assert_eq!(e.total(), 32);
        assert_eq!(entry("a", 10, 10, 10, 10).total(), 40);
        assert_eq!(entry("a", 0, 0, 0, 0).total(), 0);
    }

    #[test]
    fn test_criterion_above_ten_is_rejected() {
        let result = ScoreCriteria::new(5, 11, 5, 5);
        assert_eq!(
            result,
            Err(DomainError::InvalidScore {
                criterion: "story",
                value: 11
            })
        );
    }

    #[test]
    fn test_rescoring_replaces_existing_entry() {
        let mut scores = Vec::new();
        upsert_score(&mut scores, entry("grader-a", 8, 8, 8, 8)).unwrap();
        upsert_score(&mut scores, entry("grader-b", 5, 5, 5, 5)).unwrap();
        upsert_score(&mut scores, entry("grader-a", 7, 7, 7, 7)).unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].grader_id, "grader-a");
        assert_eq!(scores[0].total(), 28);
        assert_eq!(scores[1].total(), 20);
    }

    #[test]
    fn test_empty_grader_is_rejected() {
        let mut scores = Vec::new();
        let result = upsert_score(&mut scores, entry("  ", 1, 1, 1, 1));
        assert_eq!(result, Err(DomainError::MissingGrader));
        assert!(scores.is_empty());
    }

    #[test]
    fn test_average_total() {
        assert_eq!(average_total(&[]), None);
        let scores = vec![entry("a", 8, 8, 8, 8), entry("b", 6, 6, 6, 6)];
        assert_eq!(average_total(&scores), Some(28.0));
    }
}
