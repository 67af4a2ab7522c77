//! Playlists generated from an Xtream-style panel dump
//!
//! The panel JSON carries server and account details, the category lists and
//! every available channel keyed by stream id. A panel filter names the live
//! categories to keep; each channel in one of them becomes an [`Entry`] whose
//! URL is `<protocol>://<host>:<port>/<user>/<pass>/<stream_id>.ts`.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::models::{Entry, Playlist};
use crate::proxy::generator::render_extinf;

#[derive(Debug, Clone, Deserialize)]
pub struct PanelData {
    pub server_info: ServerInfo,
    pub user_info: UserInfo,
    pub categories: PanelCategories,
    /// Channels in panel order
    #[serde(deserialize_with = "channels_in_order")]
    pub available_channels: Vec<PanelChannel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub port: String,
    pub server_protocol: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelCategories {
    #[serde(default)]
    pub live: Vec<PanelCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelCategory {
    #[serde(deserialize_with = "string_or_number")]
    pub category_id: String,
    pub category_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelChannel {
    #[serde(deserialize_with = "string_or_number")]
    pub stream_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub stream_icon: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub category_id: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub category_name: String,
}

/// Live categories to keep, by exact name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelFilter {
    #[serde(default)]
    pub included_categories: Vec<String>,
}

impl PanelData {
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let panel: Self = load_json(path.as_ref())?;
        debug!(
            "Loaded panel with {} live categories and {} channels",
            panel.categories.live.len(),
            panel.available_channels.len()
        );
        Ok(panel)
    }

    /// `<protocol>://<host>:<port>/<user>/<pass>`
    pub fn base_stream_url(&self) -> String {
        format!(
            "{}://{}:{}/{}/{}",
            self.server_info.server_protocol,
            self.server_info.url,
            self.server_info.port,
            self.user_info.username,
            self.user_info.password
        )
    }

    /// Names of every live category, in panel order
    pub fn live_category_names(&self) -> Vec<String> {
        self.categories
            .live
            .iter()
            .map(|category| category.category_name.clone())
            .collect()
    }

    /// Live categories whose name the filter includes
    pub fn active_categories(&self, filter: &PanelFilter) -> Vec<&PanelCategory> {
        let included: HashSet<&str> = filter
            .included_categories
            .iter()
            .map(String::as_str)
            .collect();
        self.categories
            .live
            .iter()
            .filter(|category| included.contains(category.category_name.as_str()))
            .collect()
    }

    /// Channels in an active category, converted to playlist entries
    pub fn entries(&self, filter: &PanelFilter) -> Playlist {
        let active: HashMap<&str, &PanelCategory> = self
            .active_categories(filter)
            .into_iter()
            .map(|category| (category.category_id.as_str(), category))
            .collect();
        let base_url = self.base_stream_url();

        let entries: Playlist = self
            .available_channels
            .iter()
            .filter_map(|channel| {
                active
                    .get(channel.category_id.as_str())
                    .map(|category| channel_entry(&base_url, channel, category))
            })
            .collect();

        info!(
            "Panel filter kept {} of {} channels from {} categories",
            entries.len(),
            self.available_channels.len(),
            active.len()
        );
        entries
    }
}

impl PanelFilter {
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        load_json(path.as_ref())
    }
}

fn channel_entry(base_url: &str, channel: &PanelChannel, category: &PanelCategory) -> Entry {
    let group = if channel.category_name.is_empty() {
        &category.category_name
    } else {
        &channel.category_name
    };

    let mut entry = Entry::new(String::new(), format!("{}/{}.ts", base_url, channel.stream_id));
    entry.id = channel.stream_id.clone();
    entry.name = channel.name.clone();
    entry.logo = channel.stream_icon.clone();
    entry.group = group.clone();
    entry.metadata_line = render_extinf(&entry);
    entry
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::missing_source(path.display().to_string(), e.to_string()))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Panels are inconsistent about quoting ids and ports
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `available_channels` is an object keyed by stream id; keep its order
fn channels_in_order<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<PanelChannel>, D::Error> {
    struct ChannelsVisitor;

    impl<'de> Visitor<'de> for ChannelsVisitor {
        type Value = Vec<PanelChannel>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of channels keyed by stream id")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut channels = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((_, channel)) = map.next_entry::<String, PanelChannel>()? {
                channels.push(channel);
            }
            Ok(channels)
        }
    }

    deserializer.deserialize_map(ChannelsVisitor)
}
