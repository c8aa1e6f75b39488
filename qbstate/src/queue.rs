//! Playback queue items

use serde::{Deserialize, Serialize};

/// Where a queue item plays from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaSource {
    /// A video on the video site, playable in the embedded player
    #[serde(rename = "video")]
    Video,
    /// An external audio link (SoundCloud)
    #[serde(rename = "external-audio")]
    ExternalAudio,
}

/// One entry of the pending playback queue.
///
/// Produced by the resolver or the search client, immutable afterwards,
/// and consumed by the queue-drain endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: String,
    pub title: String,
    /// Channel or artist name; empty when the source page omitted it
    pub channel: String,
    /// Thumbnail URL; empty for sources without one
    pub thumbnail: String,
    pub source: MediaSource,
    /// Canonical playback URL
    pub url: String,
}

impl QueueItem {
    /// Builds a video item, deriving the canonical watch URL and the
    /// standard thumbnail from the id.
    pub fn video(id: impl Into<String>, title: impl Into<String>, channel: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: title.into(),
            channel: channel.into(),
            thumbnail: format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", id),
            url: format!("https://www.youtube.com/watch?v={}", id),
            source: MediaSource::Video,
            id,
        }
    }

    /// Builds an external-audio item from its link
    pub fn external_audio(url: impl Into<String>, title: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: url.clone(),
            title: title.into(),
            channel: String::new(),
            thumbnail: String::new(),
            source: MediaSource::ExternalAudio,
            url,
        }
    }
}
