//! # Pattern Matcher
//!
//! Wraps a compiled regular expression behind a single `matches` check.
//! Schema patterns are compiled once, when the owning node is compiled.
//!
//! Matching is a search, not an anchored match: `"^a"` must be written to
//! anchor at the start, as JSON Schema patterns require.

use std::fmt;

use regex::Regex;

/// A compiled `pattern` / `patternProperties` expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex engine's error if `source` is not a valid expression.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(source)?,
        })
    }

    /// Whether `text` contains a match.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The source expression.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
