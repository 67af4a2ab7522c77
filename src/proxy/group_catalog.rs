use std::collections::{HashMap, HashSet};

use crate::models::Entry;

/// Distinct group names in first-seen order.
pub fn list_groups(entries: &[Entry]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert(entry.group.as_str()))
        .map(|entry| entry.group.clone())
        .collect()
}

/// Distinct group names sorted case-insensitively
pub fn list_groups_sorted(entries: &[Entry]) -> Vec<String> {
    let mut groups = list_groups(entries);
    groups.sort_by_key(|group| group.to_lowercase());
    groups
}

/// Number of entries per group, in first-seen group order
pub fn group_counts(entries: &[Entry]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.group.as_str()).or_default() += 1;
    }

    list_groups(entries)
        .into_iter()
        .map(|group| {
            let count = counts.get(group.as_str()).copied().unwrap_or_default();
            (group, count)
        })
        .collect()
}
