//! Analyzer for orchestrating a lint run over a directory tree.

use std::path::{Path, PathBuf};

use import_patterns_core::{normalize_path, GlobPattern, LintResult, PatternError, Violation};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ImportPatternsConfig, PatternEntry};
use crate::engine::ImportPatternsEngine;
use crate::extractor::{ExtractError, LanguageExtractor};
use crate::typescript::TypeScriptExtractor;

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while walking the directory tree.
    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Invalid exclude pattern.
    #[error("invalid exclude pattern: {0}")]
    Exclude(#[from] PatternError),

    /// No extractor handles this file type.
    #[error("unsupported file type: {path}")]
    Unsupported {
        /// File that was rejected.
        path: PathBuf,
    },

    /// Error extracting imports from a source file.
    #[error("failed to analyze {path}: {source}")]
    Extract {
        /// File that failed.
        path: PathBuf,
        /// Extractor error.
        source: ExtractError,
    },
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    config: Option<ImportPatternsConfig>,
    extractors: Vec<Box<dyn LanguageExtractor>>,
    exclude_patterns: Vec<String>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    ///
    /// A relative `root` from the configuration is resolved against it.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: ImportPatternsConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds a language extractor. Defaults to [`TypeScriptExtractor`] when none is added.
    #[must_use]
    pub fn extractor<E: LanguageExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets whether a failed extraction aborts the run (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved or an
    /// exclude pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let base = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = if config.root.is_absolute() {
            config.root.clone()
        } else {
            base.join(&config.root)
        };
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let exclude = self
            .exclude_patterns
            .iter()
            .chain(&config.exclude)
            .map(|p| GlobPattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut extractors = self.extractors;
        if extractors.is_empty() {
            extractors.push(Box::new(TypeScriptExtractor::new()));
        }

        Ok(Analyzer {
            root,
            respect_gitignore: config.respect_gitignore,
            engine: ImportPatternsEngine::new(config),
            extractors,
            exclude,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// Walks a project and runs the import-patterns rule on every supported file.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    respect_gitignore: bool,
    engine: ImportPatternsEngine,
    extractors: Vec<Box<dyn LanguageExtractor>>,
    exclude: Vec<GlobPattern>,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the rule engine.
    #[must_use]
    pub fn engine(&self) -> &ImportPatternsEngine {
        &self.engine
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails, or if extraction
    /// fails while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {}", self.root.display());

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let mut result = LintResult::new();
        for file_path in &files {
            match self.analyze_file(file_path) {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Extract { path, source }) => {
                    warn!("Failed to analyze {}: {}", path.display(), source);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Extract { path, source });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Analyzes one file given as a path under the root.
    ///
    /// Returns no violations for files no extractor supports.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or extraction fails.
    pub fn analyze_file(&self, path: &Path) -> Result<Vec<Violation>, AnalyzerError> {
        let Some((extractor, ext)) = self.extractor_for(path) else {
            return Ok(Vec::new());
        };

        let rel = self.relative(path);
        let Some(entry) = self.engine.select(&rel) else {
            debug!("Skipping {}: no target matched", rel.display());
            return Ok(Vec::new());
        };
        debug!("Analyzing: {}", rel.display());

        let content = std::fs::read_to_string(path)?;
        self.check_source(&rel, &content, extractor, &ext, entry)
    }

    /// Runs the rule on in-memory source, `rel_path` being relative to the root.
    ///
    /// # Errors
    ///
    /// Returns an error if no extractor supports the file or extraction fails.
    pub fn analyze_source(
        &self,
        rel_path: &Path,
        source: &str,
    ) -> Result<Vec<Violation>, AnalyzerError> {
        let Some((extractor, ext)) = self.extractor_for(rel_path) else {
            return Err(AnalyzerError::Unsupported {
                path: rel_path.to_path_buf(),
            });
        };
        // Files no target selects need no parse.
        let Some(entry) = self.engine.select(rel_path) else {
            return Ok(Vec::new());
        };
        self.check_source(rel_path, source, extractor, &ext, entry)
    }

    fn check_source(
        &self,
        rel: &Path,
        source: &str,
        extractor: &dyn LanguageExtractor,
        ext: &str,
        entry: &PatternEntry,
    ) -> Result<Vec<Violation>, AnalyzerError> {
        let mut analysis = extractor
            .analyze(source, ext)
            .map_err(|e| AnalyzerError::Extract {
                path: rel.to_path_buf(),
                source: e,
            })?;
        if analysis.has_syntax_errors {
            warn!(
                "{}: syntax errors, results may be incomplete",
                rel.display()
            );
        }
        analysis.file_path = rel.to_path_buf();

        Ok(self.engine.check_entry(entry, &analysis))
    }

    fn extractor_for(&self, path: &Path) -> Option<(&dyn LanguageExtractor, String)> {
        let ext = extension_of(path)?;
        self.extractors
            .iter()
            .find(|e| e.supports(&ext))
            .map(|e| (e.as_ref(), ext))
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_path_buf()
    }

    /// Discovers all supported source files to analyze.
    ///
    /// Excluded directories are pruned during the walk, not filtered after.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let root = self.root.clone();
        let exclude = self.exclude.clone();

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .filter_entry(move |entry| {
                if entry.file_name() == ".git" {
                    return false;
                }
                let path = entry.path();
                let rel = normalize_path(path.strip_prefix(&root).unwrap_or(path));
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                if is_excluded(&exclude, &rel, is_dir) {
                    debug!("Excluding: {}", path.display());
                    return false;
                }
                true
            });

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && self.extractor_for(path).is_some() {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Whether the root-relative `rel` is excluded.
///
/// A directory is excluded when a pattern covers everything below it, so
/// `**/node_modules/**` prunes `src/node_modules` itself.
fn is_excluded(exclude: &[GlobPattern], rel: &str, is_dir: bool) -> bool {
    if rel.is_empty() {
        return false;
    }
    let below = is_dir.then(|| format!("{rel}/"));
    exclude
        .iter()
        .any(|p| p.matches(rel) || below.as_deref().is_some_and(|b| p.matches(b)))
}

/// `.ts` for `foo.ts`, also `.ts` for `foo.d.ts`.
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
}
