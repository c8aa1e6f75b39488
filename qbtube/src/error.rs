//! Error types for the scraping client

/// Result type alias for scraping operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching or parsing video-site pages.
///
/// None of these ever reach the HTTP API: the public `resolve`/`search`
/// entry points log them and return empty results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The embedded payload or an expected part of it is missing
    #[error("page payload error: {0}")]
    Payload(&'static str),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
