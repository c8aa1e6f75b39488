//! Now-playing record and its partial update

use serde::{Deserialize, Serialize};

/// The "now playing" record shared between the GUI, the browser player and
/// the HTTP API.
///
/// Invariant: once `duration > 0`, `elapsed` stays within
/// `0..=duration`. The elapsed clock enforces it on ticks and
/// [`SongState::apply`] enforces it on duration changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongState {
    pub title: String,
    pub url: String,
    /// Track length in seconds; 0 = unknown
    pub duration: u64,
    /// Seconds played so far
    pub elapsed: u64,
    pub playing: bool,
}

/// Partial update for [`SongState`].
///
/// Every field is optional; merging is per-field last-writer-wins. This is
/// what `POST /api/song` deserializes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub duration: Option<u64>,
    pub elapsed: Option<u64>,
    pub playing: Option<bool>,
}

impl SongState {
    /// Merges a partial update into this record.
    ///
    /// Fields absent from the patch keep their current value. When the
    /// patch yields a positive duration, `elapsed` is clamped so the state
    /// never reports a position past the end of the track.
    pub fn apply(&mut self, patch: &SongPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(elapsed) = patch.elapsed {
            self.elapsed = elapsed;
        }
        if self.duration > 0 {
            self.elapsed = self.elapsed.min(self.duration);
        }
        if let Some(playing) = patch.playing {
            self.playing = playing;
        }
    }

    /// Advances the elapsed counter by one second, clamped at `duration`.
    ///
    /// Only moves while the song is playing and the duration is known;
    /// never touches `playing` itself.
    pub fn tick(&mut self) {
        if self.playing && self.duration > 0 {
            self.elapsed = (self.elapsed + 1).min(self.duration);
        }
    }
}
