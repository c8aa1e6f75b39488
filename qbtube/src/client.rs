//! HTTP client shared by the resolver and the search client

use crate::error::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Default video-site base URL
pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// Default external-audio host base URL
pub const DEFAULT_AUDIO_BASE_URL: &str = "https://soundcloud.com";

/// Default timeout for page and metadata fetches (8 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 8;

/// Desktop User-Agent; the site serves a stripped page to unknown agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Client version sent with internal paging requests
pub(crate) const INNERTUBE_CLIENT_VERSION: &str = "2.20240101.00.00";

/// Scraping client for the video site and the external-audio host.
///
/// The client is stateless; the continuation tokens returned by
/// [`TubeClient::search`] carry all paging state.
#[derive(Debug, Clone)]
pub struct TubeClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) audio_base_url: String,
    pub(crate) timeout: Duration,
}

impl TubeClient {
    /// Creates a client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Creates a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Fetches a page as text
    pub(crate) async fn fetch_text(&self, url: &str) -> Result<String> {
        Ok(self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    /// Fetches a JSON document
    pub(crate) async fn fetch_json(&self, url: &str) -> Result<Value> {
        Ok(self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

/// Builder for [`TubeClient`]
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    audio_base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Overrides the video-site base URL (mainly for tests)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overrides the external-audio host base URL
    pub fn audio_base_url(mut self, url: impl Into<String>) -> Self {
        self.audio_base_url = Some(url.into());
        self
    }

    /// Overrides the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the User-Agent header
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client
    pub fn build(self) -> Result<TubeClient> {
        let mut headers = HeaderMap::new();
        let ua = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&ua).unwrap_or(HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(TubeClient {
            client,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            audio_base_url: self
                .audio_base_url
                .unwrap_or_else(|| DEFAULT_AUDIO_BASE_URL.to_string()),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        })
    }
}
