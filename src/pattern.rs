//! Simplified glob matching for file names.
//!
//! Only two wildcards are recognised: `*` matches any run of characters
//! (including none) and `?` matches exactly one character. Everything else,
//! including `[`, `{` and `.`, is a literal. Patterns always match the whole
//! name.
//!
//! # Examples
//!
//! ```
//! use filextract::pattern::GlobMatcher;
//!
//! let matcher = GlobMatcher::compile(Some("*.txt")).unwrap();
//! assert!(matcher.matches("notes.txt"));
//! assert!(!matcher.matches("notes.txt.bak"));
//! ```

use regex::{Regex, RegexBuilder};

/// Errors raised while compiling a glob pattern.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// The translated expression was rejected by the regex engine.
    #[error("Invalid pattern '{pattern}': {reason}")]
    Invalid {
        /// The glob pattern as given by the caller.
        pattern: String,
        /// The reason reported by the regex engine.
        reason: String,
    },
}

/// A compiled file-name predicate.
///
/// Compile once per traversal and reuse it for every entry.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    regex: Option<Regex>,
}

impl GlobMatcher {
    /// Compiles `pattern`; `None` yields a matcher that accepts every name.
    pub fn compile(pattern: Option<&str>) -> Result<Self, PatternError> {
        let Some(pattern) = pattern else {
            return Ok(Self::any());
        };

        let regex = RegexBuilder::new(&glob_to_regex(pattern))
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| PatternError::Invalid {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { regex: Some(regex) })
    }

    /// A matcher that accepts every name.
    pub fn any() -> Self {
        Self { regex: None }
    }

    /// Returns true if `name` matches the whole pattern.
    pub fn matches(&self, name: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(name),
            None => true,
        }
    }
}

/// Translates a glob into an anchored regular expression.
fn glob_to_regex(pattern: &str) -> String {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    expr.push('$');
    expr
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(pattern: &str) -> GlobMatcher {
        GlobMatcher::compile(Some(pattern)).expect("Pattern should compile")
    }

    #[test]
    fn test_absent_pattern_matches_everything() {
        let m = GlobMatcher::compile(None).unwrap();
        assert!(m.matches(""));
        assert!(m.matches("anything.at.all"));
    }

    #[test]
    fn test_star_matches_any_run() {
        let m = matcher("*.txt");
        assert!(m.matches("a.txt"));
        assert!(m.matches(".txt"));
        assert!(m.matches("long name.txt"));
        assert!(!m.matches("a.txt.bak"));
        assert!(!m.matches("a.TXT"));
    }

    #[test]
    fn test_question_mark_matches_exactly_one() {
        let m = matcher("file?.log");
        assert!(m.matches("file1.log"));
        assert!(m.matches("fileé.log"));
        assert!(!m.matches("file.log"));
        assert!(!m.matches("file12.log"));
    }

    #[test]
    fn test_dot_is_literal() {
        let m = matcher("a.b");
        assert!(m.matches("a.b"));
        assert!(!m.matches("axb"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matcher("a+b(1).txt").matches("a+b(1).txt"));
        assert!(!matcher("a+b").matches("aab"));
        assert!(matcher("[ab]").matches("[ab]"));
        assert!(!matcher("[ab]").matches("a"));
        assert!(matcher("{x,y}").matches("{x,y}"));
        assert!(matcher("^$|\\").matches("^$|\\"));
    }

    #[test]
    fn test_match_is_anchored_both_ends() {
        let m = matcher("log");
        assert!(m.matches("log"));
        assert!(!m.matches("catalog"));
        assert!(!m.matches("logs"));
    }

    #[test]
    fn test_double_star_is_plain_star() {
        let m = matcher("**.jpg");
        assert!(m.matches("x.jpg"));
        assert!(m.matches(".jpg"));
    }

    #[test]
    fn test_wildcards_match_newlines() {
        assert!(matcher("a*b").matches("a\nb"));
        assert!(matcher("a?b").matches("a\nb"));
    }
}
