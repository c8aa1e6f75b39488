//! Media-URL resolver
//!
//! Turns arbitrary user input into playable queue items. Classification
//! order, first match wins:
//!
//! 1. playlist link on the video site → scrape the playlist page payload
//! 2. single-video link (watch / short-link / embed / shorts) or bare id
//!    → oEmbed metadata, falling back to the id as title
//! 3. external-audio host link → oEmbed metadata, falling back to the raw
//!    URL as title (a recognized host never comes back empty-handed)
//! 4. anything else → no items
//!
//! The public entry point never fails; unrecoverable errors are logged and
//! yield an empty sequence.

use crate::client::TubeClient;
use crate::error::{Error, Result};
use crate::models::runs_text;
use crate::scan::initial_data;
use qbstate::QueueItem;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Hosts recognized as the video site
fn is_video_host(host: &str) -> bool {
    let host = host.strip_prefix("www.").unwrap_or(host);
    host == "youtube.com" || host == "m.youtube.com" || host == "music.youtube.com"
}

/// Hosts recognized as the external-audio site
fn is_audio_host(host: &str) -> bool {
    let host = host.strip_prefix("www.").unwrap_or(host);
    host == "soundcloud.com" || host == "on.soundcloud.com"
}

/// Video ids are exactly 11 characters from the URL-safe base64 alphabet
fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Extracts a playlist id from a video-site URL carrying a `list` parameter
pub(crate) fn playlist_id(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    if !is_video_host(url.host_str()?) {
        return None;
    }
    url.query_pairs()
        .find(|(k, _)| k == "list")
        .map(|(_, v)| v.into_owned())
        .filter(|id| !id.is_empty())
}

/// Extracts a video id from any of the single-video link shapes, or from a
/// bare id
pub(crate) fn video_id(input: &str) -> Option<String> {
    if is_video_id(input) {
        return Some(input.to_string());
    }

    let url = Url::parse(input).ok()?;
    let host = url.host_str()?;
    let host_trimmed = host.strip_prefix("www.").unwrap_or(host);

    // Short link: youtu.be/<id>
    if host_trimmed == "youtu.be" {
        let id = url.path_segments()?.next()?.to_string();
        return is_video_id(&id).then_some(id);
    }

    if !is_video_host(host) {
        return None;
    }

    // Watch link: /watch?v=<id>
    if url.path() == "/watch" {
        let id = url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())?;
        return is_video_id(&id).then_some(id);
    }

    // Embed and shorts links: /embed/<id>, /shorts/<id>
    let mut segments = url.path_segments()?;
    if matches!(segments.next(), Some("embed") | Some("shorts")) {
        let id = segments.next()?.to_string();
        return is_video_id(&id).then_some(id);
    }

    None
}

/// True if the input is a link to the external-audio host
pub(crate) fn is_audio_link(input: &str) -> bool {
    Url::parse(input)
        .ok()
        .and_then(|u| u.host_str().map(is_audio_host))
        .unwrap_or(false)
}

impl TubeClient {
    /// Resolves arbitrary input into zero or more queue items.
    ///
    /// Never fails: network errors, unrecognized input and drifted page
    /// structure all produce an empty vector (logged).
    pub async fn resolve(&self, input: &str) -> Vec<QueueItem> {
        match self.try_resolve(input.trim()).await {
            Ok(items) => items,
            Err(e) => {
                warn!(input, "Resolve failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_resolve(&self, input: &str) -> Result<Vec<QueueItem>> {
        if let Some(list) = playlist_id(input) {
            return self.resolve_playlist(&list).await;
        }
        if let Some(id) = video_id(input) {
            return Ok(vec![self.resolve_video(&id).await]);
        }
        if is_audio_link(input) {
            return Ok(vec![self.resolve_external_audio(input).await]);
        }
        debug!(input, "Input matched no known media pattern");
        Ok(Vec::new())
    }

    /// Scrapes a playlist page into its video items.
    ///
    /// Items without an id are skipped; any other missing field becomes an
    /// empty string on an otherwise kept item.
    async fn resolve_playlist(&self, list: &str) -> Result<Vec<QueueItem>> {
        let url = Url::parse_with_params(
            &format!("{}/playlist", self.base_url),
            &[("list", list)],
        )?;
        let html = self.fetch_text(url.as_str()).await?;
        let data = initial_data(&html)?;

        let items = playlist_items(&data)
            .ok_or(Error::Payload("playlist item list not found"))?;

        let videos: Vec<QueueItem> = items
            .iter()
            .filter_map(|item| item.get("playlistVideoRenderer"))
            .filter_map(|v| {
                let id = v.get("videoId").and_then(Value::as_str)?;
                Some(QueueItem::video(
                    id,
                    runs_text(v.get("title")),
                    runs_text(v.get("shortBylineText")),
                ))
            })
            .collect();

        debug!(list, count = videos.len(), "Playlist resolved");
        Ok(videos)
    }

    /// Resolves a single video id via oEmbed, falling back to the id as
    /// title when the metadata endpoint is unreachable
    async fn resolve_video(&self, id: &str) -> QueueItem {
        let watch = format!("{}/watch?v={}", self.base_url, id);
        let oembed = format!("{}/oembed?url={}&format=json", self.base_url, watch);
        match self.fetch_json(&oembed).await {
            Ok(meta) => QueueItem::video(
                id,
                meta.get("title").and_then(Value::as_str).unwrap_or(id),
                meta.get("author_name")
                    .and_then(Value::as_str)
                    .unwrap_or_default(),
            ),
            Err(e) => {
                debug!(id, "oEmbed lookup failed, using id as title: {}", e);
                QueueItem::video(id, id, "")
            }
        }
    }

    /// Resolves an external-audio link via its oEmbed endpoint; a
    /// recognized host always yields one item, with the raw URL as title
    /// on failure
    async fn resolve_external_audio(&self, link: &str) -> QueueItem {
        let oembed = format!(
            "{}/oembed?format=json&url={}",
            self.audio_base_url, link
        );
        match self.fetch_json(&oembed).await {
            Ok(meta) => {
                let mut item = QueueItem::external_audio(
                    link,
                    meta.get("title").and_then(Value::as_str).unwrap_or(link),
                );
                item.channel = meta
                    .get("author_name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                item.thumbnail = meta
                    .get("thumbnail_url")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                item
            }
            Err(e) => {
                debug!(link, "Audio oEmbed lookup failed, using URL as title: {}", e);
                QueueItem::external_audio(link, link)
            }
        }
    }
}

/// Walks the playlist page payload down to its video array
fn playlist_items(data: &Value) -> Option<&Vec<Value>> {
    data.get("contents")?
        .get("twoColumnBrowseResultsRenderer")?
        .get("tabs")?
        .get(0)?
        .get("tabRenderer")?
        .get("content")?
        .get("sectionListRenderer")?
        .get("contents")?
        .get(0)?
        .get("itemSectionRenderer")?
        .get("contents")?
        .get(0)?
        .get("playlistVideoListRenderer")?
        .get("contents")?
        .as_array()
}
