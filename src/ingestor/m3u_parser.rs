use tracing::{debug, info};

use super::tags::{extract_tag, TAG_GROUP_TITLE, TAG_TVG_ID, TAG_TVG_LOGO, TAG_TVG_NAME};
use crate::models::{Entry, Playlist};

pub const EXTINF_PREFIX: &str = "#EXTINF:";
pub const M3U_HEADER: &str = "#EXTM3U";

/// Whether a line is a stream URL line
pub fn is_url_line(line: &str) -> bool {
    line.starts_with("http://") || line.starts_with("https://")
}

/// Parse playlist text into entries with their tag fields populated.
///
/// Parsing never fails: the `#EXTM3U` header, comments and any other
/// unrecognised lines are skipped.
pub fn parse(content: &str) -> Playlist {
    let mut entries = split_entries(content);
    for entry in entries.iter_mut() {
        populate_tags(entry);
    }

    info!("M3U parsing completed: {} entries parsed", entries.len());
    entries
}

/// Pair every URL line with the most recent `#EXTINF` line seen before it.
///
/// The pending descriptor is not consumed by a URL, so consecutive URL lines
/// share one descriptor. A URL before any descriptor gets an empty one.
pub fn split_entries(content: &str) -> Playlist {
    let mut entries = Vec::new();
    let mut extinf = "";
    let mut skipped = 0usize;

    for line in content.lines() {
        if line.starts_with(EXTINF_PREFIX) {
            extinf = line;
        } else if is_url_line(line) {
            entries.push(Entry::new(extinf, line));
        } else {
            skipped += 1;
        }
    }

    debug!(
        "Split M3U content into {} entries ({} other lines skipped)",
        entries.len(),
        skipped
    );
    entries
}

/// Derive `group`, `name`, `id` and `logo` from the entry's descriptor line
pub fn populate_tags(entry: &mut Entry) {
    let line = entry.metadata_line.as_str();
    entry.group = extract_tag(line, TAG_GROUP_TITLE).to_string();
    entry.name = extract_tag(line, TAG_TVG_NAME).to_string();
    entry.id = extract_tag(line, TAG_TVG_ID).to_string();
    entry.logo = extract_tag(line, TAG_TVG_LOGO).to_string();
}
