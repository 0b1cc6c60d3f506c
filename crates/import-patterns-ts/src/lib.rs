//! # import-patterns-ts
//!
//! Tree-sitter based `import-patterns` rule for TypeScript and JavaScript.
//!
//! For every file, the first `[[import-patterns]]` entry whose `target` glob
//! matches the file path selects a list of `restrictions` globs. Each
//! non-relative import in the file must match one of them. The crate reuses
//! `import-patterns-core` types (`Violation`, `Severity`, `Location`) and adds:
//!
//! - [`LanguageExtractor`] trait for pluggable language support
//! - [`TypeScriptExtractor`] for ES import extraction
//! - [`RuleSelector`] for first-match target selection
//! - [`ImportPatternsEngine`] and [`ImportWalker`] for restriction checks
//! - [`Analyzer`] for running the rule over a directory tree
//! - [`ImportPatternsConfig`] for TOML/JSON configuration
//!
//! ## Example
//!
//! ```ignore
//! use import_patterns_ts::{Analyzer, ImportPatternsConfig};
//!
//! let config = ImportPatternsConfig::from_file("import-patterns.toml".as_ref())?;
//! let result = Analyzer::builder().root(".").config(config).build()?.analyze()?;
//! for v in &result.violations {
//!     println!("{v}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analyzer;
pub mod config;
pub mod engine;
pub mod extractor;
pub mod selector;
pub mod typescript;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{ConfigError, ImportPatternsConfig, PatternEntry, Restrictions};
pub use engine::{ImportPatternsEngine, ImportWalker};
pub use extractor::{ExtractError, FileImports, ImportRef, LanguageExtractor};
pub use selector::RuleSelector;
pub use typescript::TypeScriptExtractor;
