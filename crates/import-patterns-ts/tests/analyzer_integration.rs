//! Integration test: import-patterns end-to-end via Analyzer.
//!
//! Builds a small TypeScript project in a temp directory and verifies that
//! the full TOML → config → extractor → selector → checker pipeline reports
//! the expected violations.

use import_patterns_core::Severity;
use import_patterns_ts::{Analyzer, AnalyzerError, ImportPatternsConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIG: &str = r#"
[[import-patterns]]
target = "src/workbench/**"
restrictions = "vs/**"

[[import-patterns]]
target = "src/**"
restrictions = ["vs/base/**", "lodash"]
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "src/workbench/foo.ts",
        "import * as path from 'vs/base/common/path';\n\
         import { debounce } from 'lodash';\n\
         import { sibling } from './sibling';\n",
    );
    write(root, "src/workbench/sibling.ts", "export const sibling = 1;\n");
    write(
        root,
        "src/other/bar.ts",
        "import { x } from 'vs/base/common/strings';\n\
         import { y } from 'rxjs';\n",
    );
    write(root, "scripts/build.ts", "import * as fs from 'fs';\n");
    write(root, "README.md", "import 'nothing';\n");
    tmp
}

fn analyze(root: &Path, toml: &str) -> import_patterns_core::LintResult {
    let config = ImportPatternsConfig::parse(toml).expect("fixture config should parse");
    Analyzer::builder()
        .root(root)
        .config(config)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed")
}

// ── Happy path ──

#[test]
fn reports_expected_violations() {
    let tmp = project();
    let result = analyze(tmp.path(), CONFIG);

    // foo.ts, sibling.ts, bar.ts, build.ts (README.md is not a source file)
    assert_eq!(result.files_checked, 4);

    let found: Vec<(PathBuf, usize, &str)> = result
        .violations
        .iter()
        .map(|v| (v.location.file.clone(), v.location.line, v.message.as_str()))
        .collect();

    assert_eq!(
        found,
        vec![
            (
                PathBuf::from("src/other/bar.ts"),
                2,
                "Imports violates 'vs/base/** or lodash' restrictions."
            ),
            (
                PathBuf::from("src/workbench/foo.ts"),
                2,
                "Imports violates 'vs/**' restrictions."
            ),
        ]
    );
    assert!(result.has_errors());
}

#[test]
fn violation_span_points_at_statement() {
    let tmp = project();
    let result = analyze(tmp.path(), CONFIG);
    let v = result
        .violations
        .iter()
        .find(|v| v.location.file == Path::new("src/workbench/foo.ts"))
        .unwrap();

    let source = fs::read_to_string(tmp.path().join("src/workbench/foo.ts")).unwrap();
    let span = &source[v.location.offset..v.location.offset + v.location.length];
    assert_eq!(span, "import { debounce } from 'lodash';");
    assert_eq!(v.location.column, 1);
}

// ── Configuration knobs ──

#[test]
fn empty_config_reports_nothing() {
    let tmp = project();
    let result = analyze(tmp.path(), "");
    assert!(result.violations.is_empty());
}

#[test]
fn severity_override_applies() {
    let tmp = project();
    let toml = format!("severity = \"warning\"\n{CONFIG}");
    let result = analyze(tmp.path(), &toml);
    assert_eq!(result.violations.len(), 2);
    assert!(result.violations.iter().all(|v| v.severity == Severity::Warning));
    assert!(!result.has_errors());
}

#[test]
fn exclude_patterns_skip_files() {
    let tmp = project();
    let config = ImportPatternsConfig::parse(CONFIG).unwrap();
    let result = Analyzer::builder()
        .root(tmp.path())
        .config(config)
        .exclude("src/other/**")
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(result.files_checked, 3);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(
        result.violations[0].location.file,
        PathBuf::from("src/workbench/foo.ts")
    );
}

#[test]
fn node_modules_excluded_by_default() {
    let tmp = project();
    write(
        tmp.path(),
        "src/node_modules/pkg/index.js",
        "import 'anything';\n",
    );
    let result = analyze(tmp.path(), CONFIG);
    assert_eq!(result.files_checked, 4);
}

#[test]
fn config_root_is_relative_to_project() {
    let tmp = project();
    let toml = r#"
[analyzer]
root = "src"

[[import-patterns]]
target = "workbench/**"
restrictions = "vs/**"
"#;
    let result = analyze(tmp.path(), toml);
    assert_eq!(result.files_checked, 3);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(
        result.violations[0].location.file,
        PathBuf::from("workbench/foo.ts")
    );
}

#[test]
fn json_rule_arguments_work_end_to_end() {
    let tmp = project();
    let json = r#"[{ "target": "src/workbench/**", "restrictions": ["vs/**"] }]"#;
    let config = ImportPatternsConfig::parse_json(json).unwrap();
    let result = Analyzer::builder()
        .root(tmp.path())
        .config(config)
        .build()
        .unwrap()
        .analyze()
        .unwrap();
    assert_eq!(result.violations.len(), 1);
}

#[test]
fn wildcard_targets_skip_dot_directories() {
    let tmp = project();
    write(tmp.path(), ".vscode/extension.ts", "import 'rxjs';\n");
    write(tmp.path(), "src/.build/gen.ts", "import 'rxjs';\n");
    let toml = r#"
[[import-patterns]]
target = "**"
restrictions = "vs/**"
"#;
    let result = analyze(tmp.path(), toml);
    let files: Vec<&Path> = result
        .violations
        .iter()
        .map(|v| v.location.file.as_path())
        .collect();
    assert!(!files.contains(&Path::new(".vscode/extension.ts")));
    assert!(!files.contains(&Path::new("src/.build/gen.ts")));
    assert!(files.contains(&Path::new("src/other/bar.ts")));
}

#[test]
fn dot_directory_target_must_be_spelled_out() {
    let tmp = project();
    write(tmp.path(), ".vscode/extension.ts", "import 'rxjs';\n");
    let toml = r#"
[[import-patterns]]
target = ".vscode/**"
restrictions = "vs/**"
"#;
    let result = analyze(tmp.path(), toml);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(
        result.violations[0].location.file,
        PathBuf::from(".vscode/extension.ts")
    );
}

#[test]
fn restriction_with_partial_globstar_loads_and_matches() {
    let tmp = project();
    let toml = r#"
[[import-patterns]]
target = "src/other/**"
restrictions = ["vs/base**", "rxjs"]
"#;
    let result = analyze(tmp.path(), toml);
    // `vs/base**` stays within one segment, so `vs/base/common/strings` fails
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].location.line, 1);
    assert_eq!(
        result.violations[0].message,
        "Imports violates 'vs/base** or rxjs' restrictions."
    );
}

// ── Error paths ──

#[test]
fn invalid_exclude_pattern_fails_build() {
    let err = Analyzer::builder()
        .exclude("src/[oops")
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, AnalyzerError::Exclude(_)));
}

#[test]
fn analyze_source_rejects_unknown_extension() {
    let analyzer = Analyzer::builder()
        .config(ImportPatternsConfig::parse(CONFIG).unwrap())
        .build()
        .unwrap();
    let err = analyzer
        .analyze_source(Path::new("src/main.rs"), "use std::fs;")
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::Unsupported { .. }));

    let v = analyzer
        .analyze_source(Path::new("src/workbench/a.tsx"), "import 'react';\n")
        .unwrap();
    assert_eq!(v.len(), 1);
}
