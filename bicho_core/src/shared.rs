use std::cell::Cell;

use futures::lock::{Mutex, MutexGuard};
use tracing::debug;

use crate::outcome::OutcomeSource;
use crate::slot::{RoundReport, Slot};
use crate::surface::{ReelSurface, SlotDisplay, Timer};

/// A [`Slot`] shared between UI callbacks on one thread.
///
/// The lock is held for one round at a time, so bet changes made between
/// autoplay rounds apply to the next round. Only one autoplay chain runs at
/// a time.
pub struct SharedSlot<O, D, S, T> {
    slot: Mutex<Slot<O, D, S, T>>,
    playing: Cell<bool>,
}

struct PlayingFlag<'a>(&'a Cell<bool>);

impl Drop for PlayingFlag<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<O, D, S, T> SharedSlot<O, D, S, T>
where
    O: OutcomeSource,
    D: SlotDisplay,
    S: ReelSurface,
    T: Timer,
{
    pub fn new(slot: Slot<O, D, S, T>) -> Self {
        Self {
            slot: Mutex::new(slot),
            playing: Cell::new(false),
        }
    }

    /// Waits for any running round, then borrows the slot.
    pub async fn lock(&self) -> MutexGuard<'_, Slot<O, D, S, T>> {
        self.slot.lock().await
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    /// Same rounds as [`Slot::play`], releasing the lock during the pause
    /// between them. Returns `None` when a chain is already running.
    pub async fn play(&self) -> Option<Vec<RoundReport>> {
        if self.playing.replace(true) {
            debug!("spin ignored, autoplay chain already running");
            return None;
        }
        let _flag = PlayingFlag(&self.playing);

        let mut rounds = Vec::new();
        loop {
            let pause = {
                let mut slot = self.slot.lock().await;
                let Some(report) = slot.spin().await else {
                    break;
                };
                rounds.push(report);
                if !slot.display().autoplay_enabled() {
                    break;
                }
                slot.timer().sleep(slot.config().autoplay_delay())
            };
            pause.await;
        }
        Some(rounds)
    }
}
