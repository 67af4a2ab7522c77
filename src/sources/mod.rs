//! Input boundary: playlist fetching, the source cache, spec loading and
//! panel-generated playlists

pub mod cache;
pub mod filter_spec;
pub mod m3u;
pub mod panel;

pub use cache::{CacheMode, SourceCache};
pub use filter_spec::{
    load_allowed_groups, load_filter_spec, load_filter_spec_lenient, parse_group_list,
};
pub use m3u::{load_playlist, M3uSourceFetcher, SourceFetcher};
pub use panel::{PanelData, PanelFilter};
