//! Glob patterns and the matching capability used by the rule.
//!
//! Patterns are validated and compiled once when configuration is loaded.
//! The dialect follows minimatch defaults rather than `glob::Pattern`'s:
//!
//! - brace alternation (`{a,b}`) is expanded at construction into several
//!   compiled alternatives; a `{` with no partner, or inside `[...]`, is literal
//! - a `**` that is not a whole path segment behaves like `*`
//! - wildcards never match a segment that starts with `.`

use std::fmt;
use std::path::Path;

/// Errors from building a [`GlobPattern`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// Pattern string is empty.
    #[error("glob pattern must not be empty")]
    Empty,

    /// The glob crate rejected the pattern.
    #[error("invalid glob pattern `{pattern}`: {reason}")]
    Invalid {
        /// The offending pattern.
        pattern: String,
        /// Parser message.
        reason: String,
    },
}

const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

#[derive(Debug, Clone)]
struct Alternative {
    raw: String,
    compiled: glob::Pattern,
}

impl Alternative {
    fn matches(&self, text: &str) -> bool {
        if self.compiled.matches_with(text, MATCH_OPTIONS) {
            return true;
        }
        // `dir/**` also covers everything below `dir/`, whatever the glob
        // crate decides about the trailing component.
        if let Some(prefix) = self.raw.strip_suffix("/**") {
            let normalized = prefix.trim_end_matches('/');
            if !normalized.contains(['*', '?', '[']) {
                return text
                    .strip_prefix(normalized)
                    .and_then(|rest| rest.strip_prefix('/'))
                    .is_some_and(|rest| !rest.split('/').any(|seg| seg.starts_with('.')));
            }
        }
        false
    }
}

/// A validated glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    raw: String,
    alternatives: Vec<Alternative>,
}

impl GlobPattern {
    /// Creates a new glob pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty or has invalid glob syntax in
    /// any of its expanded alternatives (an unclosed `[`, for instance).
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let alternatives = expand_braces(pattern)
            .iter()
            .map(|alt| {
                let raw = collapse_partial_globstars(alt);
                let compiled = glob::Pattern::new(&raw).map_err(|e| PatternError::Invalid {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Alternative { raw, compiled })
            })
            .collect::<Result<Vec<_>, PatternError>>()?;

        Ok(Self {
            raw: pattern.to_string(),
            alternatives,
        })
    }

    /// Tests whether `text` matches any alternative of this pattern.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.alternatives.iter().any(|a| a.matches(text))
    }

    /// Tests whether a file path matches, after [`normalize_path`].
    #[must_use]
    pub fn matches_path(&self, path: &Path) -> bool {
        self.matches(&normalize_path(path))
    }

    /// Returns the pattern as written in configuration.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for GlobPattern {}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Renders a path with `/` separators and without a leading `./`.
#[must_use]
pub fn normalize_path(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    match s.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => s,
    }
}

/// Expands `{a,b}` alternation into the list of plain glob strings.
///
/// Braces inside a `[...]` class and groups without a comma stay literal, as
/// does a `{` that is never closed.
fn expand_braces(pattern: &str) -> Vec<String> {
    let bytes = pattern.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'[' => i = skip_class(bytes, i),
            b'{' => match brace_group(bytes, i) {
                Some((close, commas)) if !commas.is_empty() => {
                    let prefix = &pattern[..i];
                    let suffix = &pattern[close + 1..];

                    let mut bounds = Vec::with_capacity(commas.len() + 2);
                    bounds.push(i);
                    bounds.extend(commas);
                    bounds.push(close);

                    return bounds
                        .windows(2)
                        .flat_map(|pair| {
                            let alt = &pattern[pair[0] + 1..pair[1]];
                            expand_braces(&format!("{prefix}{alt}{suffix}"))
                        })
                        .collect();
                }
                _ => i += 1,
            },
            _ => i += 1,
        }
    }
    vec![pattern.to_string()]
}

/// Index just past the `[...]` class opening at `open`, or `open + 1` when
/// the class is never closed and the `[` is literal.
fn skip_class(bytes: &[u8], open: usize) -> usize {
    let mut j = open + 1;
    if bytes.get(j) == Some(&b'!') {
        j += 1;
    }
    // `]` right after the opening is a member, not the end.
    if bytes.get(j) == Some(&b']') {
        j += 1;
    }
    match bytes[j.min(bytes.len())..].iter().position(|&b| b == b']') {
        Some(pos) => j + pos + 1,
        None => open + 1,
    }
}

/// Finds the `}` closing the group at `open` and the top-level commas in it.
fn brace_group(bytes: &[u8], open: usize) -> Option<(usize, Vec<usize>)> {
    let mut depth = 0usize;
    let mut commas = Vec::new();
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'[' => {
                i = skip_class(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((i, commas));
                }
            }
            b',' if depth == 1 => commas.push(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Rewrites every `**` that is not a whole path segment to `*`.
fn collapse_partial_globstars(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| {
            if segment.len() >= 2 && segment.bytes().all(|b| b == b'*') {
                return "**".to_string();
            }
            let mut out = String::with_capacity(segment.len());
            for c in segment.chars() {
                if !(c == '*' && out.ends_with('*')) {
                    out.push(c);
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// The glob matching capability the checker depends on.
///
/// The engine is generic over this trait so selection and checking logic can
/// be exercised with a simpler matcher.
pub trait PatternMatcher: Send + Sync {
    /// Does `text` satisfy `pattern`?
    fn matches(&self, text: &str, pattern: &GlobPattern) -> bool;
}

impl<T: PatternMatcher + ?Sized> PatternMatcher for &T {
    fn matches(&self, text: &str, pattern: &GlobPattern) -> bool {
        (**self).matches(text, pattern)
    }
}

/// Default matcher backed by the compiled [`GlobPattern`].
///
/// `*` and `?` stay within one path segment, `**` spans directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobMatcher;

impl PatternMatcher for GlobMatcher {
    fn matches(&self, text: &str, pattern: &GlobPattern) -> bool {
        pattern.matches(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(p: &str) -> GlobPattern {
        GlobPattern::new(p).unwrap()
    }

    #[test]
    fn globstar_spans_segments() {
        let p = glob("vs/**");
        assert!(p.matches("vs/base/common/path"));
        assert!(p.matches("vs/base"));
        assert!(!p.matches("lodash"));
        assert!(!p.matches("vsx/base"));
    }

    #[test]
    fn single_star_stays_in_segment() {
        let p = glob("vs/*");
        assert!(p.matches("vs/base"));
        assert!(!p.matches("vs/base/common"));
    }

    #[test]
    fn literal_matches_exactly() {
        let p = glob("lodash");
        assert!(p.matches("lodash"));
        assert!(!p.matches("lodash/fp"));
    }

    #[test]
    fn question_mark_and_class() {
        assert!(glob("v?").matches("vs"));
        assert!(glob("[ab]cd").matches("bcd"));
        assert!(!glob("[ab]cd").matches("ccd"));
    }

    #[test]
    fn leading_globstar_matches_file_paths() {
        let p = glob("**/vs/base/common/**");
        assert!(p.matches("src/vs/base/common/strings.ts"));
        assert!(!p.matches("src/vs/base/browser/dom.ts"));
    }

    #[test]
    fn braces_expand_to_alternatives() {
        let p = glob("{vs/base/**,vs/platform/**}");
        assert!(p.matches("vs/base/common/uri"));
        assert!(p.matches("vs/platform/files/common/files"));
        assert!(!p.matches("vs/workbench/foo"));
        assert_eq!(p.as_str(), "{vs/base/**,vs/platform/**}");
    }

    #[test]
    fn nested_braces_expand() {
        let got = expand_braces("a/{b,c{d,e}}/f");
        assert_eq!(got, vec!["a/b/f", "a/cd/f", "a/ce/f"]);
    }

    #[test]
    fn brace_without_comma_is_literal() {
        assert_eq!(expand_braces("a/{b}/c"), vec!["a/{b}/c"]);
        assert_eq!(expand_braces("{x}/{a,b}"), vec!["{x}/a", "{x}/b"]);
    }

    #[test]
    fn unclosed_brace_is_literal() {
        assert_eq!(expand_braces("vs/{base"), vec!["vs/{base"]);
        let p = glob("vs/{base");
        assert!(p.matches("vs/{base"));
        assert!(!p.matches("vs/base"));
    }

    #[test]
    fn brace_inside_class_is_literal() {
        assert_eq!(expand_braces("a[{]b"), vec!["a[{]b"]);
        assert_eq!(expand_braces("[,{]/{x,y}"), vec!["[,{]/x", "[,{]/y"]);
        let p = glob("a[{]b");
        assert!(p.matches("a{b"));
        assert!(!p.matches("ab"));
    }

    #[test]
    fn partial_globstar_acts_as_star() {
        let p = glob("vs/base**");
        assert!(p.matches("vs/base"));
        assert!(p.matches("vs/basecommon"));
        assert!(!p.matches("vs/base/common"));

        assert!(glob("**.ts").matches("foo.ts"));
        assert!(!glob("**.ts").matches("src/foo.ts"));
        assert_eq!(collapse_partial_globstars("a/***/b***c"), "a/**/b*c");
    }

    #[test]
    fn wildcards_skip_dot_segments() {
        assert!(!glob("vs/**").matches("vs/.hidden"));
        assert!(!glob("vs/**").matches("vs/base/.cache/x"));
        assert!(!glob("**").matches(".vscode/x.ts"));
        assert!(!glob("src/**").matches("src/.build/x.ts"));
        assert!(!glob("src/*").matches("src/.eslintrc"));
    }

    #[test]
    fn literal_dot_segments_still_match() {
        assert!(glob(".vscode/**").matches(".vscode/settings.ts"));
        assert!(glob("src/.build/**").matches("src/.build/x.ts"));
        assert!(glob("**/.*").matches("src/.eslintrc"));
    }

    #[test]
    fn rejects_empty_pattern() {
        assert_eq!(GlobPattern::new(""), Err(PatternError::Empty));
    }

    #[test]
    fn rejects_invalid_glob() {
        assert!(matches!(
            GlobPattern::new("vs/[abc"),
            Err(PatternError::Invalid { .. })
        ));
    }

    #[test]
    fn normalize_strips_dot_slash() {
        assert_eq!(
            normalize_path(Path::new("./src/workbench/foo.ts")),
            "src/workbench/foo.ts"
        );
    }

    #[test]
    fn glob_matcher_delegates() {
        let m = GlobMatcher;
        assert!(m.matches("vs/base/common/path", &glob("vs/**")));
        assert!(!m.matches("lodash", &glob("vs/**")));
    }
}
