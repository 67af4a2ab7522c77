//! Playlist ingestion: tag extraction and M3U parsing

pub mod m3u_parser;
pub mod tags;

pub use m3u_parser::parse;
pub use tags::extract_tag;
