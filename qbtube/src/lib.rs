//! Video-site scraping client for QuestBridge
//!
//! This crate resolves user input (links, bare video ids, search queries)
//! into playable queue items without any API key, by scraping the embedded
//! `ytInitialData` payload the video site inlines into its pages and by
//! calling the public oEmbed endpoints.
//!
//! - **Resolver**: classifies a URL (playlist / single video / external
//!   audio) and produces zero or more [`qbstate::QueueItem`]s
//! - **Search**: returns one page of results plus an opaque continuation
//!   token for incremental paging
//!
//! Everything here degrades instead of failing: a network error, a page
//! whose structure drifted, or a result item missing fields all produce
//! empty results or empty fields, never an error surfaced to the player.
//! The navigation paths into the embedded payload are undocumented and
//! expected to drift; the behaviour to rely on is the defensive
//! extraction, not the literals.
//!
//! # Example
//!
//! ```no_run
//! use qbtube::TubeClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TubeClient::new()?;
//!
//!     let items = client.resolve("https://youtu.be/dQw4w9WgXcQ").await;
//!     println!("{} item(s)", items.len());
//!
//!     let page = client.search("lofi hip hop", "").await;
//!     println!("{} result(s)", page.results.len());
//!     if !page.continuation.is_empty() {
//!         let more = client.search("", &page.continuation).await;
//!         println!("{} more", more.results.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod resolve;
pub mod scan;
pub mod search;

pub use client::{ClientBuilder, TubeClient};
pub use error::{Error, Result};
pub use models::{SearchPage, SearchResultItem};
