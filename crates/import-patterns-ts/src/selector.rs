//! Rule selection: maps a file path to the configuration entry that governs it.

use std::path::Path;

use import_patterns_core::{normalize_path, GlobMatcher, PatternMatcher};

use crate::config::PatternEntry;

/// Picks the configuration entry that applies to a file.
///
/// Selection is first-match-wins over the configured order: later entries
/// whose target also matches are ignored, so more specific targets must be
/// listed first.
pub struct RuleSelector<'a, M = GlobMatcher> {
    entries: &'a [PatternEntry],
    matcher: M,
}

impl<'a> RuleSelector<'a> {
    /// Build a selector over `entries` using the default glob matcher.
    #[must_use]
    pub fn new(entries: &'a [PatternEntry]) -> Self {
        Self::with_matcher(entries, GlobMatcher)
    }
}

impl<'a, M: PatternMatcher> RuleSelector<'a, M> {
    /// Build a selector with a custom matcher.
    #[must_use]
    pub fn with_matcher(entries: &'a [PatternEntry], matcher: M) -> Self {
        Self { entries, matcher }
    }

    /// Which entry governs this file, if any?
    #[must_use]
    pub fn select(&self, file_path: &Path) -> Option<&'a PatternEntry> {
        let path = normalize_path(file_path);
        self.entries
            .iter()
            .find(|e| self.matcher.matches(&path, e.target()))
    }
}
