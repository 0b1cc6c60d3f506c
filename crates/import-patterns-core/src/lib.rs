//! # import-patterns-core
//!
//! Core types shared by the import-patterns engine and CLI:
//!
//! - [`Violation`], [`Location`], [`Severity`] for reporting findings
//! - [`LintResult`] for aggregating a run
//! - [`GlobPattern`] and the [`PatternMatcher`] capability used to match
//!   file paths and module specifiers

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pattern;
mod types;

pub use pattern::{normalize_path, GlobMatcher, GlobPattern, PatternError, PatternMatcher};
pub use types::{LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic};
