// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use filmfest_domain::{DurationBounds, FileRuleSet};

use crate::messages::Locale;

/// Library-level configuration of the submission pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceConfig {
    /// Size, type and duration rules per file slot.
    pub file_rules: FileRuleSet,
    /// Language of progress and error messages.
    pub locale: Locale,
}

impl ServiceConfig {
    /// Returns a copy that also enforces a film duration window.
    #[must_use]
    pub fn with_film_duration(mut self, min_seconds: f64, max_seconds: f64) -> Self {
        self.file_rules.film = self.file_rules.film.with_duration(DurationBounds {
            min_seconds,
            max_seconds,
        });
        self
    }

    /// Returns a copy using `locale` for messages.
    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}
