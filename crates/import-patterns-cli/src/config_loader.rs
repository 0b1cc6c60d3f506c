//! Finding and loading the configuration for a `check` run.
//!
//! The first of these wins:
//!
//! 1. `--config <path>` (or `$IMPORT_PATTERNS_CONFIG`)
//! 2. `import-patterns.toml`, `.import-patterns.toml`, `import-patterns.json`
//!    in the checked directory
//! 3. `config.toml` in `$IMPORT_PATTERNS_CONFIG_DIR`, else `~/.import-patterns/`
//!
//! Targets are matched against paths relative to `analyzer.root`. For a
//! config passed with `--config` a relative root is taken from the config
//! file's own directory, so the same file gives the same answers wherever
//! the tool is started.

use anyhow::{Context, Result};
use import_patterns_ts::ImportPatternsConfig;
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 3] = [
    "import-patterns.toml",
    ".import-patterns.toml",
    "import-patterns.json",
];

const GLOBAL_FILE: &str = "config.toml";

const CONFIG_DIR_ENV: &str = "IMPORT_PATTERNS_CONFIG_DIR";

/// How a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Named on the command line.
    Flag,
    /// Sits in the checked directory.
    Project,
    /// Shared per-user configuration.
    Global,
}

/// A configuration file chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Path to the file (TOML, or JSON by extension).
    pub path: PathBuf,
    /// Where it came from.
    pub origin: Origin,
}

impl Located {
    /// Directory that a relative `analyzer.root` is joined onto.
    #[must_use]
    pub fn analysis_base(&self, checked_dir: &Path) -> PathBuf {
        match self.origin {
            Origin::Flag => match self.path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
                _ => PathBuf::from("."),
            },
            Origin::Project | Origin::Global => checked_dir.to_path_buf(),
        }
    }

    /// Reads and validates the file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not a valid config.
    pub fn load(&self) -> Result<ImportPatternsConfig> {
        if self.origin == Origin::Global {
            tracing::info!("Using global config: {}", self.path.display());
        }
        ImportPatternsConfig::from_file(&self.path)
            .with_context(|| format!("Failed to load config: {}", self.path.display()))
    }
}

/// Finds the configuration for checking `checked_dir`.
#[must_use]
pub fn locate(checked_dir: &Path, flag: Option<&Path>) -> Option<Located> {
    locate_in(checked_dir, flag, global_dir().as_deref())
}

fn locate_in(checked_dir: &Path, flag: Option<&Path>, global: Option<&Path>) -> Option<Located> {
    if let Some(path) = flag {
        return Some(Located {
            path: path.to_path_buf(),
            origin: Origin::Flag,
        });
    }

    let project = PROJECT_FILES
        .iter()
        .map(|name| checked_dir.join(name))
        .find(|p| p.is_file())
        .map(|path| Located {
            path,
            origin: Origin::Project,
        });
    if project.is_some() {
        return project;
    }

    let path = global?.join(GLOBAL_FILE);
    path.is_file().then_some(Located {
        path,
        origin: Origin::Global,
    })
}

fn global_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".import-patterns")))
}
