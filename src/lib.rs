//! Parse M3U playlists, select and regroup channels with JSON filter specs,
//! and render the result back to M3U text.
//!
//! The pipeline is `ingestor::parse` → `proxy::FilterEngine` →
//! `proxy::render`. Fetching, caching and spec loading live in `sources`.

pub mod config;
pub mod errors;
pub mod ingestor;
pub mod logging;
pub mod models;
pub mod proxy;
pub mod sources;
