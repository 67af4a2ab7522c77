use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::matcher::{NameMatcher, RegexMatcher};
use crate::errors::{PatternError, PatternResult};
use crate::models::*;

/// Applies filter specs to parsed playlists.
///
/// Rules of a spec are tried in order and the first rule accepting an entry
/// wins. Every accepted entry is copied with its group replaced by the spec's
/// `new_group_name`.
pub struct FilterEngine<M = RegexMatcher> {
    matcher: M,
}

/// A spec that could not be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFailure {
    /// Position of the spec in the list passed to [`FilterEngine::apply_filters`]
    pub index: usize,
    pub error: PatternError,
}

/// Result of applying several specs: the concatenated matches of every spec
/// that applied cleanly plus the failures of those that did not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub entries: Playlist,
    pub failures: Vec<SpecFailure>,
}

impl FilterOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl FilterEngine<RegexMatcher> {
    pub fn new() -> Self {
        Self::with_matcher(RegexMatcher::new())
    }
}

impl Default for FilterEngine<RegexMatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: NameMatcher> FilterEngine<M> {
    pub fn with_matcher(matcher: M) -> Self {
        Self { matcher }
    }

    /// Apply several specs to the same unfiltered playlist and concatenate the
    /// results in spec order.
    ///
    /// An entry selected by two specs appears twice, once per spec. A spec
    /// with an invalid pattern contributes nothing and is reported in
    /// [`FilterOutcome::failures`]; the remaining specs are still applied.
    pub fn apply_filters(&mut self, entries: &[Entry], specs: &[FilterSpec]) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for (index, spec) in specs.iter().enumerate() {
            match self.apply_filter(entries, spec) {
                Ok(selected) => outcome.entries.extend(selected),
                Err(error) => {
                    warn!("Skipping filter spec #{}: {}", index, error);
                    outcome.failures.push(SpecFailure { index, error });
                }
            }
        }

        info!(
            "Applied {} filter specs: {} entries selected, {} specs failed",
            specs.len(),
            outcome.entries.len(),
            outcome.failures.len()
        );
        outcome
    }

    /// Select the entries accepted by `spec`, renamed into its new group.
    ///
    /// Every pattern in the spec is validated before any entry is examined, so
    /// an invalid pattern fails the spec regardless of the playlist contents.
    pub fn apply_filter(&mut self, entries: &[Entry], spec: &FilterSpec) -> PatternResult<Playlist> {
        self.validate_spec(spec)?;

        let mut matches = Vec::new();
        for entry in entries {
            if self.entry_matches(entry, spec)? {
                matches.push(entry.with_group(&spec.new_group_name));
            }
        }

        debug!(
            "Filter spec '{}' selected {} of {} entries",
            spec.new_group_name,
            matches.len(),
            entries.len()
        );
        Ok(matches)
    }

    /// Whether any rule of `spec` accepts `entry`
    pub fn entry_matches(&mut self, entry: &Entry, spec: &FilterSpec) -> PatternResult<bool> {
        for rule in &spec.groups {
            if rule.matches_group(&entry.group) && self.name_matches(entry, rule)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn name_matches(&mut self, entry: &Entry, rule: &GroupRule) -> PatternResult<bool> {
        let Some(patterns) = &rule.name_matches else {
            return Ok(true);
        };

        for pattern in patterns {
            if self.matcher.find(pattern, &entry.name)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn validate_spec(&mut self, spec: &FilterSpec) -> PatternResult<()> {
        for pattern in spec.groups.iter().filter_map(|rule| rule.name_matches.as_ref()).flatten() {
            self.matcher.validate(pattern)?;
        }
        Ok(())
    }
}

/// Entries whose group is exactly one of `groups`. Groups are left unchanged.
pub fn filter_by_groups<S: AsRef<str>>(entries: &[Entry], groups: &[S]) -> Playlist {
    let wanted: HashSet<&str> = groups.iter().map(AsRef::as_ref).collect();
    let filtered: Playlist = entries
        .iter()
        .filter(|entry| wanted.contains(entry.group.as_str()))
        .cloned()
        .collect();

    debug!(
        "Group list filter kept {} of {} entries",
        filtered.len(),
        entries.len()
    );
    filtered
}

/// Entries belonging to `group`
pub fn entries_in_group(entries: &[Entry], group: &str) -> Playlist {
    entries
        .iter()
        .filter(|entry| entry.group == group)
        .cloned()
        .collect()
}
