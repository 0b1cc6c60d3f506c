//! Configuration for the import-patterns rule.
//!
//! Entries live in `[[import-patterns]]` tables of a TOML file, or in a JSON
//! file holding either the bare array of rule arguments
//! (`[{ "target": ..., "restrictions": ... }]`) or the same object layout as
//! the TOML file.
//!
//! ```text
//! TOML / JSON text
//!   ↓ serde (DTO layer: Restrictions = string | string[])
//! PatternEntryDto
//!   ↓ validate + compile globs
//! PatternEntry (restrictions always a non-empty list)
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use import_patterns_core::{GlobPattern, PatternError, Severity};

/// `restrictions` as written: one glob or a list of globs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Restrictions {
    /// `restrictions = "vs/**"`
    One(String),
    /// `restrictions = ["vs/base/**", "vs/platform/**"]`
    Many(Vec<String>),
}

impl Restrictions {
    /// Normalizes to an ordered list.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(p) => vec![p],
            Self::Many(ps) => ps,
        }
    }
}

/// Raw configuration entry, as deserialized.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternEntryDto {
    /// Glob matched against the file path.
    pub target: String,
    /// Globs the module specifiers must satisfy.
    pub restrictions: Restrictions,
    /// Design document reference attached to violations.
    #[serde(default)]
    pub doc: Option<String>,
}

/// A validated configuration entry: files matching `target` may only import
/// non-relative modules matching one of `restrictions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    target: GlobPattern,
    restrictions: Vec<GlobPattern>,
    doc_ref: Option<String>,
}

impl PatternEntry {
    /// Creates an entry from compiled patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyRestrictions`] if `restrictions` is empty.
    pub fn new(target: GlobPattern, restrictions: Vec<GlobPattern>) -> Result<Self, ConfigError> {
        if restrictions.is_empty() {
            return Err(ConfigError::EmptyRestrictions {
                context: format!("target '{target}'"),
            });
        }
        Ok(Self {
            target,
            restrictions,
            doc_ref: None,
        })
    }

    /// Attaches a design document reference.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }

    /// Returns the target pattern.
    #[must_use]
    pub fn target(&self) -> &GlobPattern {
        &self.target
    }

    /// Returns the restriction patterns, in configuration order.
    #[must_use]
    pub fn restrictions(&self) -> &[GlobPattern] {
        &self.restrictions
    }

    /// Returns the document reference.
    #[must_use]
    pub fn doc_ref(&self) -> Option<&str> {
        self.doc_ref.as_deref()
    }
}

/// Top-level import-patterns configuration.
#[derive(Debug, Clone)]
pub struct ImportPatternsConfig {
    /// Project root directory.
    pub root: PathBuf,
    /// Glob patterns to exclude from analysis.
    pub exclude: Vec<String>,
    /// Whether to respect `.gitignore` files.
    pub respect_gitignore: bool,
    /// Severity assigned to violations.
    pub severity: Severity,
    /// Violations at or above this severity fail the run.
    pub fail_on: Severity,
    /// Ordered entries; the first whose target matches a file wins.
    pub entries: Vec<PatternEntry>,
}

impl Default for ImportPatternsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_exclude(),
            respect_gitignore: true,
            severity: Severity::Error,
            fail_on: Severity::Error,
            entries: Vec::new(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_true() -> bool {
    true
}

/// Errors when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },

    /// Failed to parse TOML or JSON.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },

    /// A glob in the configuration is invalid.
    #[error("{context}: {source}")]
    Pattern {
        /// Where the error occurred (e.g., "import-patterns[2].restrictions[0]").
        context: String,
        /// The underlying pattern error.
        source: PatternError,
    },

    /// An entry lists no restrictions.
    #[error("{context}: restrictions must not be empty")]
    EmptyRestrictions {
        /// Which entry.
        context: String,
    },
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    analyzer: AnalyzerSection,
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    fail_on: Severity,
    #[serde(rename = "import-patterns", default)]
    entries: Vec<PatternEntryDto>,
}

#[derive(Deserialize)]
struct AnalyzerSection {
    #[serde(default = "default_root")]
    root: PathBuf,
    #[serde(default = "default_exclude")]
    exclude: Vec<String>,
    #[serde(default = "default_true")]
    respect_gitignore: bool,
}

impl Default for AnalyzerSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_exclude(),
            respect_gitignore: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    RuleArguments(Vec<PatternEntryDto>),
    Full(RawConfig),
}

impl ImportPatternsConfig {
    /// Builds a configuration holding only `entries`, with default analyzer settings.
    #[must_use]
    pub fn from_entries(entries: Vec<PatternEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    /// Load from a TOML or JSON file (chosen by extension).
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if path.extension().is_some_and(|e| e == "json") {
            Self::parse_json(&content)
        } else {
            Self::parse(&content)
        }
    }

    /// Parse from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if TOML is invalid or an entry fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        Self::from_raw(raw)
    }

    /// Parse from JSON: a bare array of entries or a full config object.
    ///
    /// # Errors
    ///
    /// Returns error if JSON is invalid or an entry fails validation.
    pub fn parse_json(content: &str) -> Result<Self, ConfigError> {
        let doc: JsonDocument = serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        match doc {
            JsonDocument::RuleArguments(entries) => Ok(Self::from_entries(convert_entries(entries)?)),
            JsonDocument::Full(raw) => Self::from_raw(raw),
        }
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            root: raw.analyzer.root,
            exclude: raw.analyzer.exclude,
            respect_gitignore: raw.analyzer.respect_gitignore,
            severity: raw.severity,
            fail_on: raw.fail_on,
            entries: convert_entries(raw.entries)?,
        })
    }
}

fn convert_entries(dtos: Vec<PatternEntryDto>) -> Result<Vec<PatternEntry>, ConfigError> {
    dtos.into_iter()
        .enumerate()
        .map(|(i, dto)| convert_entry(dto, i))
        .collect()
}

fn convert_entry(dto: PatternEntryDto, index: usize) -> Result<PatternEntry, ConfigError> {
    let ctx = format!("import-patterns[{index}]");

    let target = GlobPattern::new(&dto.target).map_err(|e| ConfigError::Pattern {
        context: format!("{ctx}.target"),
        source: e,
    })?;

    let restrictions = dto
        .restrictions
        .into_vec()
        .iter()
        .enumerate()
        .map(|(j, p)| {
            GlobPattern::new(p).map_err(|e| ConfigError::Pattern {
                context: format!("{ctx}.restrictions[{j}]"),
                source: e,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if restrictions.is_empty() {
        return Err(ConfigError::EmptyRestrictions { context: ctx });
    }

    Ok(PatternEntry {
        target,
        restrictions,
        doc_ref: dto.doc,
    })
}
