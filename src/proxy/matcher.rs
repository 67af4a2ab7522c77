//! Name matching used by the filter engine
//!
//! The engine only needs "does this pattern occur anywhere in this name", so
//! the dialect is a pluggable [`NameMatcher`]. [`RegexMatcher`] is the default
//! and [`LiteralMatcher`] treats patterns as plain substrings.

use regex::Regex;
use std::collections::HashMap;

use crate::errors::{PatternError, PatternResult};

pub trait NameMatcher {
    /// Check that `pattern` is valid in this dialect
    fn validate(&mut self, pattern: &str) -> PatternResult<()>;

    /// Unanchored search for `pattern` within `name`
    fn find(&mut self, pattern: &str, name: &str) -> PatternResult<bool>;
}

/// Regular-expression matching backed by the `regex` crate
#[derive(Debug, Default)]
pub struct RegexMatcher {
    // Cache compiled regexes by pattern text
    regex_cache: HashMap<String, Regex>,
}

impl RegexMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_compile_regex(&mut self, pattern: &str) -> PatternResult<&Regex> {
        if !self.regex_cache.contains_key(pattern) {
            let regex =
                Regex::new(pattern).map_err(|e| PatternError::new(pattern, e.to_string()))?;
            self.regex_cache.insert(pattern.to_string(), regex);
        }

        self.regex_cache
            .get(pattern)
            .ok_or_else(|| PatternError::new(pattern, "regex cache lookup failed"))
    }
}

impl NameMatcher for RegexMatcher {
    fn validate(&mut self, pattern: &str) -> PatternResult<()> {
        self.get_or_compile_regex(pattern).map(|_| ())
    }

    fn find(&mut self, pattern: &str, name: &str) -> PatternResult<bool> {
        Ok(self.get_or_compile_regex(pattern)?.is_match(name))
    }
}

/// Case-sensitive substring matching. Every pattern is valid.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralMatcher;

impl NameMatcher for LiteralMatcher {
    fn validate(&mut self, _pattern: &str) -> PatternResult<()> {
        Ok(())
    }

    fn find(&mut self, pattern: &str, name: &str) -> PatternResult<bool> {
        Ok(name.contains(pattern))
    }
}
