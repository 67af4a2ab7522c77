//! Playlist source loading
//!
//! A source location is either an `http://`/`https://` URL fetched with
//! `reqwest` or a path on the local file system. Loading goes through the
//! flat-file [`SourceCache`] according to the requested [`CacheMode`].

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::cache::{CacheMode, SourceCache};
use crate::config::SourceConfig;
use crate::errors::{AppError, AppResult};
use crate::ingestor::m3u_parser::is_url_line;

/// Reads raw playlist text from a location
#[async_trait]
pub trait SourceFetcher {
    async fn fetch_text(&self, location: &str) -> AppResult<String>;
}

/// Fetches URLs over HTTP and everything else from disk
pub struct M3uSourceFetcher {
    client: Client,
}

impl M3uSourceFetcher {
    pub fn new(config: &SourceConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    async fn fetch_url(&self, url: &str) -> AppResult<String> {
        info!("Fetching M3U source: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::missing_source(url, e.to_string()))?;

        let content = response
            .text()
            .await
            .map_err(|e| AppError::missing_source(url, e.to_string()))?;

        debug!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }

    async fn read_file(&self, path: &str) -> AppResult<String> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::missing_source(path, e.to_string()))?;

        debug!("Read {} bytes from {}", content.len(), path);
        Ok(content)
    }
}

#[async_trait]
impl SourceFetcher for M3uSourceFetcher {
    async fn fetch_text(&self, location: &str) -> AppResult<String> {
        if is_url_line(location) {
            self.fetch_url(location).await
        } else {
            self.read_file(location).await
        }
    }
}

/// Load playlist text for `location`, consulting the cache per `mode`
pub async fn load_playlist<F>(
    fetcher: &F,
    cache: &SourceCache,
    mode: CacheMode,
    location: &str,
) -> AppResult<String>
where
    F: SourceFetcher + Sync + ?Sized,
{
    match mode {
        CacheMode::No => return fetcher.fetch_text(location).await,
        CacheMode::ForceClear => {
            if let Err(e) = cache.clear(location) {
                warn!("Failed to clear cached copy of {}: {}", location, e);
            }
        }
        CacheMode::Use => {}
    }

    // Cache failures only cost a refetch; they never fail the load
    match cache.read(location) {
        Ok(Some(content)) => return Ok(content),
        Ok(None) => {}
        Err(e) => warn!("Ignoring unreadable cache for {}: {}", location, e),
    }

    let content = fetcher.fetch_text(location).await?;
    if let Err(e) = cache.write(location, &content) {
        warn!("Failed to cache {} in {}: {}", location, cache.directory().display(), e);
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SourceFetcher for CountingFetcher {
        async fn fetch_text(&self, location: &str) -> AppResult<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("#EXTM3U\n# {} fetch {}\n", location, n))
        }
    }

    fn fetcher() -> CountingFetcher {
        CountingFetcher {
            calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_use_mode_serves_cached_copy() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SourceCache::new(dir.path());
        let fetcher = fetcher();

        let first =
            tokio_test::block_on(load_playlist(&fetcher, &cache, CacheMode::Use, "src")).unwrap();
        let second =
            tokio_test::block_on(load_playlist(&fetcher, &cache, CacheMode::Use, "src")).unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_force_clear_refetches() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SourceCache::new(dir.path());
        let fetcher = fetcher();

        tokio_test::block_on(load_playlist(&fetcher, &cache, CacheMode::Use, "src")).unwrap();
        let refreshed =
            tokio_test::block_on(load_playlist(&fetcher, &cache, CacheMode::ForceClear, "src"))
                .unwrap();

        assert!(refreshed.contains("fetch 2"));
        assert_eq!(cache.read("src").unwrap(), Some(refreshed));
    }

    #[test]
    fn test_no_mode_bypasses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SourceCache::new(dir.path());
        let fetcher = fetcher();

        tokio_test::block_on(load_playlist(&fetcher, &cache, CacheMode::No, "src")).unwrap();
        tokio_test::block_on(load_playlist(&fetcher, &cache, CacheMode::No, "src")).unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.read("src").unwrap(), None);
    }

    #[test]
    fn test_unusable_cache_directory_still_returns_fetched_text() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let cache = SourceCache::new(blocker.join("cache"));
        let fetcher = fetcher();

        for mode in [CacheMode::Use, CacheMode::ForceClear] {
            let content =
                tokio_test::block_on(load_playlist(&fetcher, &cache, mode, "src")).unwrap();
            assert!(content.starts_with("#EXTM3U\n"));
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_file_is_missing_source() {
        let fetcher = M3uSourceFetcher::new(&SourceConfig::default()).unwrap();
        let err = tokio_test::block_on(fetcher.fetch_text("/nonexistent/playlist.m3u")).unwrap_err();
        assert!(err.is_missing_source());
    }

    #[test]
    fn test_reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.m3u");
        std::fs::write(&path, "#EXTM3U\n").unwrap();

        let fetcher = M3uSourceFetcher::new(&SourceConfig::default()).unwrap();
        let content =
            tokio_test::block_on(fetcher.fetch_text(path.to_str().unwrap())).unwrap();
        assert_eq!(content, "#EXTM3U\n");
    }
}
