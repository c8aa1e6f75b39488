//! Shared playback state for QuestBridge
//!
//! One process-wide [`StateStore`] holds the "now playing" record and the
//! pending playback queue. It is the only piece of state touched from
//! several tasks at once (HTTP handlers, the elapsed clock, background
//! resolve tasks), so every operation takes the lock for a short,
//! I/O-free critical section.
//!
//! The [`clock`] module provides the 1 Hz background task that advances
//! `elapsed` while a song is playing.

pub mod clock;
pub mod queue;
pub mod song;
pub mod store;

pub use clock::spawn_elapsed_clock;
pub use queue::{MediaSource, QueueItem};
pub use song::{SongPatch, SongState};
pub use store::StateStore;
