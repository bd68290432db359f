//! Duplicate-submission guard.
//!
//! While a checkout submission is in flight, the same session may not
//! start another - the server-side equivalent of disabling the submit
//! control. The permit releases on drop, so the gate resets on every exit
//! path: success, failure, early validation rejection, or panic.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Tracks sessions with an in-flight submission.
#[derive(Debug, Clone, Default)]
pub struct SubmitGate {
    inflight: Arc<Mutex<HashSet<String>>>,
}

impl SubmitGate {
    /// Create an empty gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to start a submission for the given session key.
    ///
    /// Returns `None` when a submission for the key is already in flight.
    #[must_use]
    pub fn try_acquire(&self, key: &str) -> Option<SubmitPermit> {
        let mut inflight = self
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if inflight.insert(key.to_owned()) {
            Some(SubmitPermit {
                gate: self.clone(),
                key: key.to_owned(),
            })
        } else {
            None
        }
    }

    fn release(&self, key: &str) {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Permit for one in-flight submission. Releases the gate on drop.
#[derive(Debug)]
pub struct SubmitPermit {
    gate: SubmitGate,
    key: String,
}

impl Drop for SubmitPermit {
    fn drop(&mut self) {
        self.gate.release(&self.key);
    }
}
