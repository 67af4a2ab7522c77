//! Filtering and rendering of parsed playlists

pub mod filter_engine;
pub mod generator;
pub mod group_catalog;
pub mod live_filter;
pub mod matcher;

pub use filter_engine::{FilterEngine, FilterOutcome, SpecFailure};
pub use generator::{render, RenderMode};
pub use group_catalog::list_groups;
pub use live_filter::{filter_live, LiveClassifier, LiveFilterStats};
pub use matcher::{LiteralMatcher, NameMatcher, RegexMatcher};

use crate::models::{FilterSpec, Playlist};

/// Parse, filter with every spec and render in one call.
///
/// Returns the rendered playlist along with the outcome so callers can
/// report specs that failed.
pub fn filter_playlist(content: &str, specs: &[FilterSpec]) -> (String, FilterOutcome) {
    let entries: Playlist = crate::ingestor::parse(content);
    let outcome = FilterEngine::new().apply_filters(&entries, specs);
    (render(&outcome.entries), outcome)
}
