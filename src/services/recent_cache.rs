use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;

pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(30);

#[derive(Default)]
struct Slot {
    message: Option<String>,
    // bumped on every set so a stale timer never clears a newer message
    generation: u64,
}

/// Single-slot memory of the last dispatched message, cleared by a timer.
#[derive(Clone)]
pub struct RecentMessageCache {
    slot: Arc<Mutex<Slot>>,
    window: Duration,
}

impl Default for RecentMessageCache {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

impl RecentMessageCache {
    pub fn new(window: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            window,
        }
    }

    pub fn current(&self) -> Option<String> {
        self.slot.lock().message.clone()
    }

    /// Stores `message` unless it is already the cached one.
    ///
    /// Returns `false` for a duplicate. Must be called inside a tokio runtime.
    pub fn claim(&self, message: &str) -> bool {
        let generation = {
            let mut slot = self.slot.lock();
            if slot.message.as_deref() == Some(message) {
                return false;
            }
            slot.generation += 1;
            slot.message = Some(message.to_string());
            slot.generation
        };

        let slot = self.slot.clone();
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;

            let mut slot = slot.lock();
            if slot.generation == generation {
                slot.message = None;
            }
        });

        true
    }
}
