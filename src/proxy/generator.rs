use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::ingestor::m3u_parser::M3U_HEADER;
use crate::models::*;

/// How descriptor lines are written back out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Rebuild the descriptor from the four tracked tags with duration `-1`.
    /// Any other source attribute is dropped.
    #[default]
    Reconstructed,
    /// Emit the source descriptor verbatim, falling back to the rebuilt line
    /// when an entry has none
    Original,
}

impl std::str::FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reconstructed" => Ok(Self::Reconstructed),
            "original" => Ok(Self::Original),
            other => Err(format!("unknown render mode '{}'", other)),
        }
    }
}

/// Rebuilt `#EXTINF` line for an entry
pub fn render_extinf(entry: &Entry) -> String {
    format!(
        "#EXTINF:-1 tvg-id=\"{}\" tvg-name=\"{}\" tvg-logo=\"{}\" group-title=\"{}\",{}",
        entry.id, entry.name, entry.logo, entry.group, entry.name
    )
}

/// Serialize entries as an M3U playlist with rebuilt descriptors
pub fn render(entries: &[Entry]) -> String {
    render_with_mode(entries, RenderMode::Reconstructed)
}

pub fn render_with_mode(entries: &[Entry], mode: RenderMode) -> String {
    let mut m3u = String::with_capacity(16 + entries.len() * 160);
    m3u.push_str(M3U_HEADER);
    m3u.push('\n');

    for entry in entries {
        match mode {
            RenderMode::Original if !entry.metadata_line.is_empty() => {
                m3u.push_str(&entry.metadata_line)
            }
            _ => m3u.push_str(&render_extinf(entry)),
        }
        m3u.push('\n');
        m3u.push_str(&entry.url);
        m3u.push('\n');
    }

    m3u
}

/// `group - name` per entry
pub fn debug_listing(entries: &[Entry]) -> String {
    entries.iter().fold(String::new(), |mut out, entry| {
        let _ = writeln!(out, "{} - {}", entry.group, entry.name);
        out
    })
}

/// `group <--> name` per entry
pub fn list_all(entries: &[Entry]) -> String {
    entries.iter().fold(String::new(), |mut out, entry| {
        let _ = writeln!(out, "{} <--> {}", entry.group, entry.name);
        out
    })
}

/// Diagnostic block for a group-list filter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFilterReport {
    pub requested_groups: Vec<String>,
    pub source: String,
    pub initial_count: usize,
    pub filtered_count: usize,
    pub available_groups: Vec<String>,
}

impl std::fmt::Display for GroupFilterReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Requested groups: {}", self.requested_groups.join(", "))?;
        writeln!(f, "m3u was read from {}", self.source)?;
        writeln!(f, "Initial count={}", self.initial_count)?;
        writeln!(f, "Filtered count={}", self.filtered_count)?;
        writeln!(f, "Available groups:")?;
        for group in &self.available_groups {
            writeln!(f, "  {}", group)?;
        }
        Ok(())
    }
}
