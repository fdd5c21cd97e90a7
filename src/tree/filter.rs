//! Include/exclude filtering for tree walking
//!
//! Patterns follow `fnmatch`: `*` and `?` match any character including `/`,
//! `[...]` is a character class, and every string is a usable pattern.

use glob::{MatchOptions, Pattern};
use log::warn;

// Shell-style matching: `*` may cross `/` and leading dots need no literal.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Entry filter built from exclude and include glob patterns.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    excludes: Vec<Pattern>,
    includes: Vec<Pattern>,
}

/// Index of the `]` closing the class opened at `start`, using fnmatch's
/// rules: a leading `!` and then a leading `]` belong to the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() && chars[j] != ']' {
        j += 1;
    }
    (j < chars.len()).then_some(j)
}

/// Rewrite an fnmatch pattern into `glob` syntax with the same meaning.
///
/// Runs of `*` collapse to one `*` (it already crosses `/`), and a `[` with
/// no closing `]` becomes a literal `[`.
fn to_glob_syntax(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..=end]);
                    i = end;
                }
                None => out.push_str("[[]"),
            },
            ch => out.push(ch),
        }
        i += 1;
    }
    out
}

fn compile_pattern(source: &str) -> Pattern {
    match Pattern::new(&to_glob_syntax(source)) {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!("pattern '{}' matched literally: {}", source, e.msg);
            Pattern::new(&Pattern::escape(source)).unwrap_or_default()
        }
    }
}

fn compile(patterns: &[String]) -> Vec<Pattern> {
    patterns.iter().map(|p| compile_pattern(p)).collect()
}

impl EntryFilter {
    pub fn new(excludes: &[String], includes: &[String]) -> Self {
        Self {
            excludes: compile(excludes),
            includes: compile(includes),
        }
    }

    /// Check if a path takes part in the walk.
    ///
    /// Excludes win over includes; with no includes configured everything
    /// not excluded is included.
    pub fn is_included(&self, path: &str) -> bool {
        if self
            .excludes
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS))
        {
            return false;
        }
        self.includes.is_empty()
            || self
                .includes
                .iter()
                .any(|p| p.matches_with(path, MATCH_OPTIONS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(excludes: &[&str], includes: &[&str]) -> EntryFilter {
        let ex: Vec<String> = excludes.iter().map(|s| s.to_string()).collect();
        let inc: Vec<String> = includes.iter().map(|s| s.to_string()).collect();
        EntryFilter::new(&ex, &inc)
    }

    #[test]
    fn test_no_patterns_includes_everything() {
        let f = EntryFilter::default();
        assert!(f.is_included("a.txt"));
        assert!(f.is_included("deep/nested/.hidden"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let f = filter(&["*.log"], &["*.log", "*.rs"]);
        assert!(!f.is_included("debug.log"));
        assert!(f.is_included("main.rs"));
        assert!(!f.is_included("notes.md"));
    }

    #[test]
    fn test_star_crosses_separator() {
        let f = filter(&["*.pyc"], &[]);
        assert!(!f.is_included("pkg/mod/cache.pyc"));
        assert!(f.is_included("pkg/mod/cache.py"));
    }

    #[test]
    fn test_hidden_patterns() {
        let f = filter(&[".*", "**/.*"], &[]);
        assert!(!f.is_included(".git"));
        assert!(!f.is_included("src/.cache"));
        assert!(f.is_included("src/main.rs"));
    }

    #[test]
    fn test_question_mark_and_classes() {
        let f = filter(&[], &["file?.[ch]"]);
        assert!(f.is_included("file1.c"));
        assert!(f.is_included("fileX.h"));
        assert!(!f.is_included("file10.c"));
        assert!(!f.is_included("file1.rs"));
    }

    #[test]
    fn test_pattern_matching_nothing_is_silent() {
        let f = filter(&["nothing-matches-this"], &[]);
        assert!(f.is_included("a"));
    }

    #[test]
    fn test_double_star_inside_component() {
        let f = filter(&["**.pyc"], &[]);
        assert!(!f.is_included("a/b.pyc"));
        assert!(!f.is_included("b.pyc"));
        assert!(f.is_included("a/b.py"));

        let f = filter(&["foo**"], &[]);
        assert!(!f.is_included("foo"));
        assert!(!f.is_included("foobar/baz"));
        assert!(f.is_included("bar/foo"));
    }

    #[test]
    fn test_double_star_slash_needs_a_parent() {
        let f = filter(&["**/__pycache__"], &[]);
        assert!(!f.is_included("pkg/__pycache__"));
        assert!(!f.is_included("a/b/__pycache__"));
        assert!(f.is_included("__pycache__"));
    }

    #[test]
    fn test_unclosed_bracket_is_literal() {
        let f = filter(&["[unclosed"], &[]);
        assert!(!f.is_included("[unclosed"));
        assert!(f.is_included("u"));

        let f = filter(&["a[]"], &[]);
        assert!(!f.is_included("a[]"));
        assert!(f.is_included("a"));
    }

    #[test]
    fn test_leading_bracket_in_class() {
        let f = filter(&["x[]]", "y[!]]"], &[]);
        assert!(!f.is_included("x]"));
        assert!(!f.is_included("ya"));
        assert!(f.is_included("y]"));
    }

    #[test]
    fn test_to_glob_syntax() {
        assert_eq!(to_glob_syntax("**.pyc"), "*.pyc");
        assert_eq!(to_glob_syntax("a/***/b"), "a/*/b");
        assert_eq!(to_glob_syntax("[unclosed"), "[[]unclosed");
        assert_eq!(to_glob_syntax("a[]"), "a[[]]");
        assert_eq!(to_glob_syntax("[!a-c]x"), "[!a-c]x");
    }
}
