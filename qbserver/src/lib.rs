//! HTTP synchronization server for QuestBridge
//!
//! Exposes the shared song state, the pending queue, search/resolve
//! proxies and the cached player page over a small JSON API, so the
//! desktop GUI and the browser player can stay in sync without sharing
//! memory.
//!
//! - [`api`]: route table and handlers (see [`api::create_router`])
//! - [`page_cache`]: periodically refreshed copy of the remote player page
//! - [`server`]: bind/serve/shutdown wrapper around axum

pub mod api;
pub mod page_cache;
pub mod server;

pub use api::{create_router, AppState};
pub use page_cache::PageCache;
pub use server::Server;
