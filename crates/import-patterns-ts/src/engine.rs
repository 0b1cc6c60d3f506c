//! Import pattern rule engine.
//!
//! Selects the configuration entry for a file with [`RuleSelector`], then
//! walks the file's imports with an [`ImportWalker`], producing
//! [`Violation`]s from import-patterns-core.

use std::path::Path;

use import_patterns_core::{
    GlobMatcher, Location, PatternMatcher, Severity, Suggestion, Violation,
};

use crate::config::{ImportPatternsConfig, PatternEntry};
use crate::extractor::{FileImports, ImportRef};
use crate::selector::RuleSelector;

/// Rule name attached to every violation.
pub const RULE_NAME: &str = "import-patterns";

/// Code for an import that satisfies none of the restrictions.
pub const RESTRICTION_CODE: &str = "IMP001";

/// Code for a module specifier that is not a quoted string literal.
pub const MALFORMED_SPECIFIER_CODE: &str = "IMP002";

/// Strips the surrounding quotes from a module specifier literal.
///
/// Returns `None` unless the literal starts and ends with the same
/// `'`, `"` or `` ` `` character.
#[must_use]
pub fn strip_quotes(literal: &str) -> Option<&str> {
    let first = literal.chars().next()?;
    if !matches!(first, '\'' | '"' | '`') || literal.len() < 2 {
        return None;
    }
    literal.strip_prefix(first)?.strip_suffix(first)
}

/// Relative specifiers (`./x`, `../x`, `.`) are never restricted.
#[must_use]
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with('.')
}

/// Message for an import violating `restrictions`.
#[must_use]
pub fn restriction_message(entry: &PatternEntry) -> String {
    let joined = entry
        .restrictions()
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(" or ");
    format!("Imports violates '{joined}' restrictions.")
}

/// Checks the imports of one file against a selected entry.
///
/// [`visit_import`](Self::visit_import) is called once per import statement,
/// in source order. It carries no state between imports apart from the
/// violations collected so far.
pub struct ImportWalker<'a, M> {
    entry: &'a PatternEntry,
    matcher: &'a M,
    file: &'a Path,
    severity: Severity,
    violations: Vec<Violation>,
}

impl<'a, M: PatternMatcher> ImportWalker<'a, M> {
    /// Creates a walker for `file` governed by `entry`.
    #[must_use]
    pub fn new(entry: &'a PatternEntry, matcher: &'a M, file: &'a Path, severity: Severity) -> Self {
        Self {
            entry,
            matcher,
            file,
            severity,
            violations: Vec::new(),
        }
    }

    /// Visit a single import statement.
    pub fn visit_import(&mut self, import: &ImportRef) {
        let Some(specifier) = strip_quotes(&import.specifier) else {
            self.report(
                import,
                MALFORMED_SPECIFIER_CODE,
                format!(
                    "Module specifier {} is not a quoted string literal.",
                    import.specifier
                ),
                Some(Suggestion::new(
                    "write the module specifier as a quoted string literal",
                )),
            );
            return;
        };

        if is_relative(specifier) {
            return;
        }

        let matched = self
            .entry
            .restrictions()
            .iter()
            .any(|p| self.matcher.matches(specifier, p));

        if !matched {
            self.report(
                import,
                RESTRICTION_CODE,
                restriction_message(self.entry),
                None,
            );
        }
    }

    fn report(
        &mut self,
        import: &ImportRef,
        code: &str,
        message: String,
        suggestion: Option<Suggestion>,
    ) {
        let location = Location::new(self.file.to_path_buf(), import.line, import.column + 1)
            .with_span(import.offset, import.width);
        let mut violation = Violation::new(code, RULE_NAME, self.severity, location, message);
        if let Some(s) = suggestion {
            violation = violation.with_suggestion(s);
        }
        if let Some(doc) = self.entry.doc_ref() {
            violation = violation.with_doc_ref(doc);
        }
        self.violations.push(violation);
    }

    /// Consumes the walker, returning violations in source order.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// Evaluates the import-patterns rule against extracted files.
pub struct ImportPatternsEngine<M = GlobMatcher> {
    config: ImportPatternsConfig,
    matcher: M,
}

impl ImportPatternsEngine {
    /// Create a new engine from config.
    #[must_use]
    pub fn new(config: ImportPatternsConfig) -> Self {
        Self::with_matcher(config, GlobMatcher)
    }
}

impl<M: PatternMatcher> ImportPatternsEngine<M> {
    /// Create an engine with a custom pattern matcher.
    #[must_use]
    pub fn with_matcher(config: ImportPatternsConfig, matcher: M) -> Self {
        Self { config, matcher }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ImportPatternsConfig {
        &self.config
    }

    /// Returns the entry governing `file_path`, if any.
    #[must_use]
    pub fn select(&self, file_path: &Path) -> Option<&PatternEntry> {
        RuleSelector::with_matcher(&self.config.entries, &self.matcher).select(file_path)
    }

    /// Check a single file for import pattern violations.
    #[must_use]
    pub fn check(&self, analysis: &FileImports) -> Vec<Violation> {
        let Some(entry) = self.select(&analysis.file_path) else {
            tracing::debug!("{}: no target matched", analysis.file_path.display());
            return Vec::new();
        };
        self.check_entry(entry, analysis)
    }

    /// Check a file against an entry already chosen with [`select`](Self::select).
    #[must_use]
    pub fn check_entry(&self, entry: &PatternEntry, analysis: &FileImports) -> Vec<Violation> {
        tracing::debug!(
            "{}: checking {} import(s) against target '{}'",
            analysis.file_path.display(),
            analysis.imports.len(),
            entry.target()
        );

        let mut walker =
            ImportWalker::new(entry, &self.matcher, &analysis.file_path, self.config.severity);
        for import in &analysis.imports {
            walker.visit_import(import);
        }
        walker.into_violations()
    }
}
