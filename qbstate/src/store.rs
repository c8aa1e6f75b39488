//! Shared state store
//!
//! Cloneable handle over the song state and the pending queue. All
//! operations lock, mutate and release; nothing network-bound ever runs
//! under the lock.

use crate::queue::QueueItem;
use crate::song::{SongPatch, SongState};
use std::sync::{Arc, RwLock};
use tracing::debug;

#[derive(Debug, Default)]
struct Inner {
    song: SongState,
    queue: Vec<QueueItem>,
}

/// Thread-safe store for the song state and the pending queue.
///
/// Cheap to clone; all clones share the same underlying state.
///
/// # Drain contract
///
/// [`StateStore::drain_queue`] atomically returns and empties the queue.
/// Items are delivered at most once: with several concurrent pollers each
/// item goes to exactly one of them, but which one is unspecified. The
/// sync API assumes a single polling consumer (the browser player).
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    inner: Arc<RwLock<Inner>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current song state
    pub fn song(&self) -> SongState {
        self.inner.read().unwrap().song.clone()
    }

    /// Merges a partial update into the song state
    pub fn update_song(&self, patch: &SongPatch) {
        self.inner.write().unwrap().song.apply(patch);
    }

    /// Resets the song state to its zeroed defaults (explicit stop)
    pub fn reset_song(&self) {
        self.inner.write().unwrap().song = SongState::default();
    }

    /// One elapsed-clock tick; see [`SongState::tick`]
    pub fn tick_elapsed(&self) {
        self.inner.write().unwrap().song.tick();
    }

    /// Appends resolved items to the pending queue
    pub fn push_items(&self, items: Vec<QueueItem>) {
        if items.is_empty() {
            return;
        }
        let mut inner = self.inner.write().unwrap();
        debug!(count = items.len(), "Queueing resolved items");
        inner.queue.extend(items);
    }

    /// Atomically returns all pending items and empties the queue
    pub fn drain_queue(&self) -> Vec<QueueItem> {
        std::mem::take(&mut self.inner.write().unwrap().queue)
    }

    /// Discards all pending items
    pub fn clear_queue(&self) {
        self.inner.write().unwrap().queue.clear();
    }

    /// Number of items currently pending
    pub fn queue_len(&self) -> usize {
        self.inner.read().unwrap().queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QueueItem;

    fn item(id: &str) -> QueueItem {
        QueueItem::video(id, format!("title {id}"), "channel")
    }

    #[test]
    fn test_drain_returns_everything_once() {
        let store = StateStore::new();
        store.push_items(vec![item("a"), item("b")]);
        store.push_items(vec![item("c")]);
        assert_eq!(store.queue_len(), 3);

        let drained = store.drain_queue();
        assert_eq!(
            drained.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert!(store.drain_queue().is_empty());
        assert_eq!(store.queue_len(), 0);
    }

    #[test]
    fn test_concurrent_drains_never_duplicate() {
        let store = StateStore::new();
        let items: Vec<_> = (0..100).map(|i| item(&format!("v{i}"))).collect();
        store.push_items(items);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.drain_queue())
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap().len()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_update_and_reset_song() {
        let store = StateStore::new();
        store.update_song(&SongPatch {
            title: Some("song".into()),
            duration: Some(90),
            playing: Some(true),
            ..Default::default()
        });
        assert_eq!(store.song().title, "song");

        store.reset_song();
        assert_eq!(store.song(), SongState::default());
    }

    #[test]
    fn test_clear_queue() {
        let store = StateStore::new();
        store.push_items(vec![item("x")]);
        store.clear_queue();
        assert!(store.drain_queue().is_empty());
    }
}
