//! Remote player-page cache
//!
//! The browser player page is hosted remotely and can change without a
//! QuestBridge release. A background task re-fetches it on a fixed
//! interval with a conditional request; the cache is only replaced when
//! the bytes actually changed, and a version counter lets connected
//! players detect that and reload themselves.

use anyhow::Result;
use bytes::Bytes;
use reqwest::header::{ETAG, IF_NONE_MATCH};
use reqwest::StatusCode;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Served until the first successful fetch (or when no page URL is
/// configured)
const PLACEHOLDER_HTML: &str = "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
<title>QuestBridge</title></head>\n<body style=\"font-family:sans-serif;background:#0d0d0f;\
color:#e8e8f0\">\n<h1>QuestBridge</h1>\n<p>The player page has not been loaded yet. \
Check the <code>player.page_url</code> configuration.</p>\n</body></html>\n";

#[derive(Debug, Default)]
struct Inner {
    bytes: Bytes,
    etag: Option<String>,
    /// Increments on every content change; 0 = never loaded
    version: u64,
}

/// Cache of the remote player page.
///
/// Cheap to clone; all clones share the cache. [`PageCache::bytes`] always
/// returns something servable.
#[derive(Debug, Clone)]
pub struct PageCache {
    inner: Arc<RwLock<Inner>>,
    client: reqwest::Client,
    url: Option<String>,
}

impl PageCache {
    /// Creates a cache for `url`; `None` pins the placeholder page.
    pub fn new(url: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Last good page bytes, or the placeholder if nothing ever loaded
    pub fn bytes(&self) -> Bytes {
        let inner = self.inner.read().unwrap();
        if inner.bytes.is_empty() {
            Bytes::from_static(PLACEHOLDER_HTML.as_bytes())
        } else {
            inner.bytes.clone()
        }
    }

    /// Current content version; 0 means "not yet loaded"
    pub fn version(&self) -> u64 {
        self.inner.read().unwrap().version
    }

    /// One refresh cycle. Failures leave the cache untouched and are
    /// logged; the next cycle simply tries again.
    pub async fn refresh_once(&self) {
        let Some(url) = self.url.clone() else {
            return;
        };
        match self.try_fetch(&url).await {
            Ok(Some((bytes, etag))) => {
                if self.store_fetched(bytes, etag) {
                    info!(version = self.version(), "✅ Player page updated");
                }
            }
            Ok(None) => debug!("Player page unchanged (304)"),
            Err(e) => warn!("❌ Player page refresh failed: {}", e),
        }
    }

    /// Conditional GET; `None` means the server reported "unchanged"
    async fn try_fetch(&self, url: &str) -> Result<Option<(Bytes, Option<String>)>> {
        let etag = self.inner.read().unwrap().etag.clone();

        let mut request = self.client.get(url).timeout(Duration::from_secs(10));
        if let Some(etag) = etag {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await?;
        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        Ok(Some((bytes, etag)))
    }

    /// Stores a fetched document, bumping the version only when the bytes
    /// differ from what is cached. Returns whether the cache was replaced.
    fn store_fetched(&self, bytes: Bytes, etag: Option<String>) -> bool {
        let mut inner = self.inner.write().unwrap();
        // Always keep the freshest validator for the next request
        inner.etag = etag;
        if inner.bytes == bytes {
            return false;
        }
        inner.bytes = bytes;
        inner.version += 1;
        true
    }

    /// Spawns the periodic refresh task
    pub fn spawn_refresh(&self, interval_secs: u64) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            if cache.url.is_none() {
                info!("No player page URL configured, serving placeholder only");
                return;
            }
            info!(interval_secs, "✅ Player page refresh task started");
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
            loop {
                ticker.tick().await;
                cache.refresh_once().await;
            }
        })
    }
}
