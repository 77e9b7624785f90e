use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Single-slot hand-off between the transport's delivery callback and the
/// receive loop.
///
/// Holds at most one payload. A send while the slot is occupied overwrites
/// it, so a fast producer can drop messages the loop has not processed yet.
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    slot: Arc<Mutex<Option<String>>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `payload`, returning the unprocessed payload it displaced.
    pub fn try_send(&self, payload: String) -> Option<String> {
        self.lock().replace(payload)
    }

    /// Empties the slot.
    pub fn try_take(&self) -> Option<String> {
        self.lock().take()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        // The slot is a plain Option, a panic mid-update cannot corrupt it.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
