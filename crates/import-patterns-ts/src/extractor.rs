//! Language-agnostic extraction types and trait.
//!
//! `LanguageExtractor` is the extension point for adding new languages.
//! Implement it to teach import-patterns how to find import statements in a
//! new language via Tree-sitter.

use std::path::PathBuf;

/// A single import statement extracted from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    /// Module specifier as written, quotes included (e.g. `"vs/base/common/path"`).
    pub specifier: String,
    /// Byte offset of the start of the import statement.
    pub offset: usize,
    /// Byte width of the whole import statement.
    pub width: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed byte offset within line).
    pub column: usize,
}

/// Result of extracting imports from a single source file.
#[derive(Debug, Clone, Default)]
pub struct FileImports {
    /// Path relative to project root.
    pub file_path: PathBuf,
    /// Import statements in source order.
    pub imports: Vec<ImportRef>,
    /// Whether the parser had to recover from syntax errors.
    pub has_syntax_errors: bool,
}

/// Errors raised by an extractor.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The Tree-sitter grammar could not be loaded.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Loader message.
        message: String,
    },

    /// The parser produced no tree.
    #[error("failed to parse {language} source")]
    Parse {
        /// Language identifier.
        language: &'static str,
    },
}

/// Trait for language-specific Tree-sitter extraction.
///
/// The extractor receives raw source text and the file extension, and
/// returns the import statements it found.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g., `"typescript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".ts", ".tsx"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extract import statements from source code.
    ///
    /// `extension` is one of [`Self::extensions`] and may select a dialect.
    ///
    /// # Errors
    ///
    /// Returns error if the grammar cannot be loaded or parsing fails.
    fn analyze(&self, source: &str, extension: &str) -> Result<FileImports, ExtractError>;

    /// Whether this extractor handles files with the given extension.
    fn supports(&self, extension: &str) -> bool {
        self.extensions().contains(&extension)
    }
}
