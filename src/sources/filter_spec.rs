//! Loading filter specifications and group lists from disk

use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::models::FilterSpec;

/// Read and decode a JSON filter spec, failing on any problem
pub fn load_filter_spec(path: impl AsRef<Path>) -> AppResult<FilterSpec> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::missing_source(path.display().to_string(), e.to_string()))?;
    let spec: FilterSpec = serde_json::from_str(&contents)?;

    debug!(
        "Loaded filter spec {} ('{}', {} rules)",
        path.display(),
        spec.new_group_name,
        spec.groups.len()
    );
    Ok(spec)
}

/// Like [`load_filter_spec`], but a missing or undecodable file yields an
/// empty spec that selects nothing
pub fn load_filter_spec_lenient(path: impl AsRef<Path>) -> FilterSpec {
    let path = path.as_ref();
    load_filter_spec(path).unwrap_or_else(|e| {
        warn!(
            "Using empty filter spec for {}: {}",
            path.display(),
            e
        );
        FilterSpec::default()
    })
}

/// Split a comma-separated group list, as passed in a `groups=` parameter
pub fn parse_group_list(groups: &str) -> Vec<String> {
    groups.split(',').map(str::to_string).collect()
}

/// Read allowed group names, one per line. Blank lines and `#` comments are
/// skipped. A file that cannot be read yields `None`.
pub fn load_allowed_groups(path: impl AsRef<Path>) -> Option<HashSet<String>> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let groups = parse_allowed_groups(&contents);
            debug!("Loaded {} allowed groups from {}", groups.len(), path.display());
            Some(groups)
        }
        Err(e) => {
            warn!("Groups filter file {} not readable: {}", path.display(), e);
            None
        }
    }
}

pub fn parse_allowed_groups(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
