//! Route table and handlers
//!
//! Everything is JSON except the player page itself. Handlers never fail:
//! resolver and search errors already degrade to empty results inside
//! [`qbtube`], so every route has a well-formed response for any input.

use crate::page_cache::PageCache;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use qbstate::{SongPatch, StateStore};
use qbtube::TubeClient;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: StateStore,
    pub tube: Arc<TubeClient>,
    pub pages: PageCache,
}

impl AppState {
    pub fn new(store: StateStore, tube: Arc<TubeClient>, pages: PageCache) -> Self {
        Self { store, tube, pages }
    }
}

/// Builds the full router.
///
/// CORS is wide open: the player page is served from here but the GUI may
/// talk to us from a file:// or dev-server origin.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_page))
        .route("/index.html", get(serve_page))
        .route("/api/song", get(get_song).post(patch_song))
        .route("/api/search", get(search))
        .route("/api/resolve", get(resolve))
        .route("/api/queue/push", post(queue_push))
        .route("/api/queue/poll", get(queue_poll))
        .route("/api/html-version", get(html_version))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The cached player page (placeholder until the first successful fetch)
async fn serve_page(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        state.pages.bytes(),
    )
}

async fn get_song(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.song())
}

/// Merges a partial update into the song state
async fn patch_song(
    State(state): State<AppState>,
    Json(patch): Json<SongPatch>,
) -> impl IntoResponse {
    debug!(?patch, "Song state patched");
    state.store.update_song(&patch);
    Json(json!({ "ok": true }))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    continuation: String,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    Json(state.tube.search(&params.q, &params.continuation).await)
}

#[derive(Debug, Deserialize)]
struct ResolveParams {
    #[serde(default)]
    url: String,
}

async fn resolve(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> impl IntoResponse {
    let items = state.tube.resolve(&params.url).await;
    Json(json!({ "items": items }))
}

#[derive(Debug, Deserialize)]
struct PushRequest {
    #[serde(default)]
    url: String,
}

/// Accepts a link for the queue and acknowledges immediately; resolution
/// runs in the background and the items land on the next poll
async fn queue_push(
    State(state): State<AppState>,
    Json(request): Json<PushRequest>,
) -> impl IntoResponse {
    info!(url = %request.url, "Queue push received");
    let tube = state.tube.clone();
    let store = state.store.clone();
    tokio::spawn(async move {
        let items = tube.resolve(&request.url).await;
        if items.is_empty() {
            debug!(url = %request.url, "Push resolved to nothing");
        } else {
            info!(count = items.len(), "Queue items ready");
            store.push_items(items);
        }
    });
    Json(json!({ "ok": true }))
}

/// Hands all pending items to the caller and clears the queue. Intended
/// for a single consuming player.
async fn queue_poll(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "items": state.store.drain_queue() }))
}

/// Lets the player detect a page update and reload itself
async fn html_version(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "version": state.pages.version() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let state = AppState::new(
            StateStore::default(),
            Arc::new(TubeClient::new().unwrap()),
            PageCache::new(None),
        );
        create_router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_song_roundtrip() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(Request::get("/api/song").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let song = body_json(response).await;
        assert_eq!(song["title"], "");
        assert_eq!(song["playing"], false);

        let patch = json!({"title": "Test Song", "duration": 180, "playing": true});
        let response = router
            .clone()
            .oneshot(
                Request::post("/api/song")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(patch.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ok"], true);

        let response = router
            .oneshot(Request::get("/api/song").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let song = body_json(response).await;
        assert_eq!(song["title"], "Test Song");
        assert_eq!(song["duration"], 180);
        assert_eq!(song["playing"], true);
    }

    #[tokio::test]
    async fn test_queue_push_and_poll() {
        let router = test_router();

        // Unresolvable input still acks; nothing lands in the queue
        let response = router
            .clone()
            .oneshot(
                Request::post("/api/queue/push")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"url": "not a url"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ok"], true);

        let response = router
            .oneshot(Request::get("/api/queue/poll").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["items"], json!([]));
    }

    #[tokio::test]
    async fn test_poll_drains() {
        let store = StateStore::default();
        store.push_items(vec![qbstate::QueueItem::video("abcdefghijk", "One", "C")]);
        let state = AppState::new(
            store,
            Arc::new(TubeClient::new().unwrap()),
            PageCache::new(None),
        );
        let router = create_router(state);

        let response = router
            .clone()
            .oneshot(Request::get("/api/queue/poll").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["items"][0]["id"], "abcdefghijk");

        // Second poll finds an emptied queue
        let response = router
            .oneshot(Request::get("/api/queue/poll").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["items"], json!([]));
    }

    #[tokio::test]
    async fn test_resolve_bad_input_is_empty() {
        let router = test_router();
        let response = router
            .oneshot(
                Request::get("/api/resolve?url=not%20a%20url")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["items"], json!([]));
    }

    #[tokio::test]
    async fn test_page_and_version() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );

        let response = router
            .oneshot(
                Request::get("/api/html-version")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["version"], 0);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let router = test_router();
        let response = router
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
