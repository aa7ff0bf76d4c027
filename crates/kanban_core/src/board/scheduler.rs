//! End-of-turn recapture scheduling.
//!
//! # Invariants
//! - Any number of requests within one turn yield at most one recapture.
//! - Taking the pending recapture clears the dirty flag.

use log::trace;

/// Dirty flag plus the number of requests folded into it.
#[derive(Debug, Default)]
pub struct RecaptureScheduler {
    dirty: bool,
    pending: u32,
}

impl RecaptureScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the tree dirty.
    pub fn request(&mut self, reason: &'static str) {
        self.dirty = true;
        self.pending = self.pending.saturating_add(1);
        trace!(
            "event=recapture_request module=board reason={reason} pending={}",
            self.pending
        );
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Requests folded into the pending recapture.
    pub fn pending_requests(&self) -> u32 {
        self.pending
    }

    /// Consumes the pending recapture, returning how many requests it covers.
    pub fn take(&mut self) -> Option<u32> {
        if !self.dirty {
            return None;
        }
        let folded = self.pending;
        self.clear();
        Some(folded)
    }

    pub(crate) fn clear(&mut self) {
        self.dirty = false;
        self.pending = 0;
    }
}
