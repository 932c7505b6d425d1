use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{task::JoinHandle, time::sleep};

use crate::state::SharedStore;

/// Debounced celebration flag.
///
/// Each trigger opens the window and cancels the pending end timer, so the
/// window always closes `window` after the latest trigger.
pub struct Celebration {
    store: SharedStore,
    window: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Celebration {
    /// Build a celebration helper writing into `store`.
    pub fn new(store: SharedStore, window: Duration) -> Self {
        Self {
            store,
            window,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    /// Open (or reopen) the celebration window. Must run inside a Tokio runtime.
    pub fn trigger(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.store.set_celebrating(true);

        let store = self.store.clone();
        let latest = self.generation.clone();
        let window = self.window;
        *pending = Some(tokio::spawn(async move {
            sleep(window).await;
            // Only the latest trigger may close the window.
            if latest.load(Ordering::Acquire) == generation {
                store.set_celebrating(false);
            }
        }));
    }
}

impl Drop for Celebration {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }
    }
}
