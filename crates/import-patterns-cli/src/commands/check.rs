//! Check command implementation.

use anyhow::{Context, Result};
use import_patterns_ts::Analyzer;
use std::path::Path;

use crate::config_loader;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    exclude: Vec<String>,
    config_flag: Option<&Path>,
) -> Result<()> {
    let Some(located) = config_loader::locate(path, config_flag) else {
        anyhow::bail!("No import-patterns.toml found. Run `import-patterns init` to create one.");
    };
    let config = located.load()?;
    let fail_on = config.fail_on;

    tracing::info!(
        "Loaded {} import pattern entr{} from {}",
        config.entries.len(),
        if config.entries.len() == 1 { "y" } else { "ies" },
        located.path.display()
    );

    let analyzer = Analyzer::builder()
        .root(located.analysis_base(path))
        .config(config)
        .excludes(exclude)
        .build()
        .context("Failed to build analyzer")?;

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format, analyzer.root())?;

    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}
