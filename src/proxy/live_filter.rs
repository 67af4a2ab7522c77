//! Live-channel filter
//!
//! Provider playlists mix live channels with series episodes and movies. An
//! entry is classified from its group (category), URL and display title; the
//! first matching class wins in the order group restriction, series, movie,
//! other on-demand content.

use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::errors::{PatternError, PatternResult};
use crate::models::{Entry, Playlist};

const SERIES_EPISODE_PATTERN: &str = r"S\d+\s*E\d+";
const RELEASE_YEAR_PATTERN: &str = r"\b(19|20)\d{2}\b";

const SERIES_TITLE_MARKERS: [&str; 4] = ["S0", "E0", "SEASON", "EPISODE"];
const MOVIE_CATEGORY_MARKERS: [&str; 4] = ["VOD", "MOVIE", "FILM", "CINEMA"];
const OTHER_VOD_CATEGORY_MARKERS: [&str; 3] = ["DOWNLOAD", "ON DEMAND", "RENTAL"];

/// Why the live filter dropped an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveRejection {
    GroupNotAllowed,
    Series,
    Movie,
    /// Downloads, rentals and other on-demand categories
    Other,
}

/// Counters reported by [`filter_live`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveFilterStats {
    pub total: usize,
    pub kept: usize,
    pub series: usize,
    pub movies: usize,
    pub other: usize,
    pub group_filtered: usize,
}

impl LiveFilterStats {
    fn record(&mut self, rejection: Option<LiveRejection>) {
        self.total += 1;
        match rejection {
            None => self.kept += 1,
            Some(LiveRejection::Series) => self.series += 1,
            Some(LiveRejection::Movie) => self.movies += 1,
            Some(LiveRejection::Other) => self.other += 1,
            Some(LiveRejection::GroupNotAllowed) => self.group_filtered += 1,
        }
    }

    pub fn filtered(&self) -> usize {
        self.total - self.kept
    }
}

impl std::fmt::Display for LiveFilterStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total entries:   {}", self.total)?;
        writeln!(f, "Live channels:   {}", self.kept)?;
        writeln!(f, "Series removed:  {}", self.series)?;
        writeln!(f, "Movies removed:  {}", self.movies)?;
        writeln!(f, "Other removed:   {}", self.other)?;
        writeln!(f, "Group filtered:  {}", self.group_filtered)?;
        write!(f, "Total filtered:  {}", self.filtered())
    }
}

/// VOD URLs carry a `/series/` or `/movie/` path segment
pub fn is_live_url(url: &str) -> bool {
    !url.contains("/series/") && !url.contains("/movie/")
}

/// Display title of an entry: the text after the first comma of its
/// descriptor line, or the `tvg-name` when the line has none.
fn display_title(entry: &Entry) -> &str {
    match entry.metadata_line.split_once(',') {
        Some((_, title)) if !title.is_empty() => title,
        _ => entry.name.as_str(),
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Series / movie / on-demand classifier with its title patterns compiled once
#[derive(Debug, Clone)]
pub struct LiveClassifier {
    series_episode: Regex,
    release_year: Regex,
}

impl LiveClassifier {
    pub fn new() -> PatternResult<Self> {
        Ok(Self {
            series_episode: compile(SERIES_EPISODE_PATTERN)?,
            release_year: compile(RELEASE_YEAR_PATTERN)?,
        })
    }

    /// `None` keeps the entry
    pub fn classify(
        &self,
        entry: &Entry,
        allowed_groups: Option<&HashSet<String>>,
    ) -> Option<LiveRejection> {
        let category = entry.group.as_str();
        if let Some(allowed) = allowed_groups {
            if category.is_empty() || !allowed.contains(category) {
                return Some(LiveRejection::GroupNotAllowed);
            }
        }

        let category = category.to_uppercase();
        let title = display_title(entry);
        let upper_title = title.to_uppercase();

        if category.contains("SRS")
            || entry.url.contains("/series/")
            || contains_any(&upper_title, &SERIES_TITLE_MARKERS)
            || self.series_episode.is_match(&upper_title)
        {
            Some(LiveRejection::Series)
        } else if contains_any(&category, &MOVIE_CATEGORY_MARKERS)
            || entry.url.contains("/movie/")
            || self.release_year.is_match(title)
        {
            Some(LiveRejection::Movie)
        } else if contains_any(&category, &OTHER_VOD_CATEGORY_MARKERS) {
            Some(LiveRejection::Other)
        } else {
            None
        }
    }

    /// Keep live channels only, optionally restricted to `allowed_groups`
    pub fn filter(
        &self,
        entries: &[Entry],
        allowed_groups: Option<&HashSet<String>>,
    ) -> (Playlist, LiveFilterStats) {
        let mut stats = LiveFilterStats::default();
        let mut kept = Vec::new();

        for entry in entries {
            let rejection = self.classify(entry, allowed_groups);
            match rejection {
                None => kept.push(entry.clone()),
                Some(reason) => debug!("Filtered ({:?}): {}", reason, entry.name),
            }
            stats.record(rejection);
        }

        info!(
            "Live filter kept {} of {} entries ({} series, {} movies, {} other, {} outside allowed groups)",
            stats.kept, stats.total, stats.series, stats.movies, stats.other, stats.group_filtered
        );
        (kept, stats)
    }
}

fn compile(pattern: &str) -> PatternResult<Regex> {
    Regex::new(pattern).map_err(|e| PatternError::new(pattern, e.to_string()))
}

/// Keep live channels only, optionally restricted to `allowed_groups`
pub fn filter_live(
    entries: &[Entry],
    allowed_groups: Option<&HashSet<String>>,
) -> PatternResult<(Playlist, LiveFilterStats)> {
    Ok(LiveClassifier::new()?.filter(entries, allowed_groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(group: &str, title: &str, url: &str) -> Entry {
        let mut entry = Entry::new(
            format!("#EXTINF:-1 tvg-name=\"{title}\" group-title=\"{group}\",{title}"),
            url,
        );
        entry.group = group.to_string();
        entry.name = title.to_string();
        entry
    }

    #[test]
    fn test_is_live_url() {
        assert!(is_live_url("http://host:80/user/pass/1234.ts"));
        assert!(!is_live_url("http://host:80/series/user/pass/1.mkv"));
        assert!(!is_live_url("http://host:80/movie/user/pass/2.mp4"));
    }

    #[rstest]
    #[case::live("UK | General", "BBC One HD", "http://x/live/1.ts", None)]
    #[case::series_category("UK | SRS Drama", "Line of Duty", "http://x/1.ts", Some(LiveRejection::Series))]
    #[case::series_url("UK | General", "Line of Duty", "http://x/series/1.mkv", Some(LiveRejection::Series))]
    #[case::series_marker("UK | General", "Show Season 2", "http://x/1.ts", Some(LiveRejection::Series))]
    #[case::episode_marker("UK | General", "Show episode 4", "http://x/1.ts", Some(LiveRejection::Series))]
    #[case::s0_marker("UK | General", "Show s01", "http://x/1.ts", Some(LiveRejection::Series))]
    #[case::season_episode("UK | General", "Show s12 e14", "http://x/1.ts", Some(LiveRejection::Series))]
    #[case::vod_category("VOD | Action", "Heat", "http://x/1.ts", Some(LiveRejection::Movie))]
    #[case::film_category("Films", "Heat", "http://x/1.ts", Some(LiveRejection::Movie))]
    #[case::cinema_category("Cinema Releases", "Heat", "http://x/1.ts", Some(LiveRejection::Movie))]
    #[case::movie_url("UK | General", "Heat", "http://x/movie/1.mp4", Some(LiveRejection::Movie))]
    #[case::release_year("UK | General", "Heat (1995)", "http://x/1.ts", Some(LiveRejection::Movie))]
    #[case::download_category("Downloads", "Box Set", "http://x/1.ts", Some(LiveRejection::Other))]
    #[case::on_demand_category("UK | On Demand", "Catch Up", "http://x/1.ts", Some(LiveRejection::Other))]
    #[case::rental_category("Rental", "Box Set", "http://x/1.ts", Some(LiveRejection::Other))]
    #[case::channel_number_not_a_year("UK | General", "Channel 5 HD", "http://x/1.ts", None)]
    fn test_classify(
        #[case] group: &str,
        #[case] title: &str,
        #[case] url: &str,
        #[case] expected: Option<LiveRejection>,
    ) {
        let classifier = LiveClassifier::new().unwrap();
        assert_eq!(classifier.classify(&entry(group, title, url), None), expected);
    }

    #[test]
    fn test_series_wins_over_movie() {
        let classifier = LiveClassifier::new().unwrap();
        let both = entry("VOD", "Show S01E02", "http://x/movie/1.mp4");
        assert_eq!(classifier.classify(&both, None), Some(LiveRejection::Series));
    }

    #[test]
    fn test_title_comes_from_descriptor_line() {
        let classifier = LiveClassifier::new().unwrap();
        let mut tagged = entry("UK | General", "BBC One", "http://x/1.ts");
        tagged.metadata_line = "#EXTINF:-1 tvg-name=\"BBC One\",Film of 2001".to_string();
        assert_eq!(classifier.classify(&tagged, None), Some(LiveRejection::Movie));

        tagged.metadata_line = "#EXTINF:-1 tvg-name=\"BBC One\"".to_string();
        assert_eq!(classifier.classify(&tagged, None), None);
    }

    #[test]
    fn test_filter_live_with_allowed_groups() {
        let entries = vec![
            entry("News", "A", "http://x/live/1.ts"),
            entry("News", "B", "http://x/series/2.mkv"),
            entry("Kids", "C", "http://x/movie/3.mp4"),
            entry("Adult", "D", "http://x/live/4.ts"),
            entry("", "E", "http://x/live/5.ts"),
            entry("Kids", "F", "http://x/live/6.ts"),
            entry("Kids On Demand", "G", "http://x/live/7.ts"),
        ];
        let allowed: HashSet<String> = ["News", "Kids", "Kids On Demand"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let (kept, stats) = filter_live(&entries, Some(&allowed)).unwrap();
        let names: Vec<_> = kept.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "F"]);
        assert_eq!(
            stats,
            LiveFilterStats {
                total: 7,
                kept: 2,
                series: 1,
                movies: 1,
                other: 1,
                group_filtered: 2,
            }
        );
        assert_eq!(stats.filtered(), 5);

        let (kept, stats) = filter_live(&entries, None).unwrap();
        assert_eq!(kept.len(), 4);
        assert_eq!(stats.group_filtered, 0);
    }

    #[test]
    fn test_stats_display_includes_other() {
        let stats = LiveFilterStats {
            total: 3,
            kept: 1,
            other: 2,
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.contains("Other removed:   2"));
        assert!(text.ends_with("Total filtered:  2"));
    }
}
