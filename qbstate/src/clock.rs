//! Elapsed clock
//!
//! A 1 Hz background task advancing the song's `elapsed` counter while it
//! is playing. The task runs for the whole process lifetime; aborting the
//! returned handle is only done at shutdown.

use crate::store::StateStore;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

/// Spawns the 1 Hz elapsed clock over `store`.
pub fn spawn_elapsed_clock(store: StateStore) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("✅ Elapsed clock started");
        let mut ticker = interval(Duration::from_secs(1));
        // Catching up after a stall would fast-forward the song position
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            store.tick_elapsed();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::SongPatch;

    #[tokio::test(start_paused = true)]
    async fn test_clock_advances_only_while_playing() {
        let store = StateStore::new();
        store.update_song(&SongPatch {
            duration: Some(10),
            elapsed: Some(9),
            playing: Some(true),
            ..Default::default()
        });

        let clock = spawn_elapsed_clock(store.clone());

        // Three virtual seconds: 9 -> 10, then clamped
        tokio::time::sleep(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.song().elapsed, 10);

        store.update_song(&SongPatch {
            playing: Some(false),
            elapsed: Some(5),
            ..Default::default()
        });
        tokio::time::sleep(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.song().elapsed, 5);

        clock.abort();
    }
}
