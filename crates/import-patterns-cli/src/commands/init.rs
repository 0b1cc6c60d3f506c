//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# import-patterns configuration
#
# Each [[import-patterns]] entry pairs a `target` glob, matched against file
# paths relative to the project root, with `restrictions`: one glob or a list
# of globs that every non-relative import in those files must match.
# The first entry whose target matches a file is the only one applied, so
# list more specific targets first. Relative imports ("./x", "../y") are
# never restricted.

# Severity of reported violations: "error", "warning" or "info".
severity = "error"

# Exit with status 1 when a violation at or above this severity is found.
fail_on = "error"

[analyzer]
root = "."
exclude = ["**/node_modules/**", "**/dist/**", "**/out/**"]
respect_gitignore = true

[[import-patterns]]
target = "src/vs/base/common/**"
restrictions = "vs/base/common/**"

[[import-patterns]]
target = "src/vs/workbench/**"
restrictions = ["vs/base/**", "vs/platform/**", "vs/workbench/**"]
# doc = "ARCHITECTURE.md#layers"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("import-patterns.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created import-patterns.toml");
    println!("\nNext steps:");
    println!("  1. Edit the [[import-patterns]] entries for your project");
    println!("  2. Run: import-patterns check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use import_patterns_ts::ImportPatternsConfig;

    #[test]
    fn template_is_a_valid_config() {
        let config = ImportPatternsConfig::parse(DEFAULT_CONFIG).expect("template should parse");
        assert_eq!(config.entries.len(), 2);
        assert_eq!(config.exclude.len(), 3);
        assert_eq!(config.severity, import_patterns_core::Severity::Error);
    }
}
