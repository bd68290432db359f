//! Cancellation for in-flight submissions.
//!
//! A submission runs as a spawned task so the platform and gateway calls
//! are not torn down mid-flight when the client disconnects. The task holds
//! a [`CancelToken`] and checks it before applying any completed call's
//! side effects; the handler holds the matching [`CancelHandle`], which
//! cancels on drop unless the handler reaches completion and disarms it.

use tokio::sync::watch;

/// Create a linked handle/token pair.
#[must_use]
pub fn pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Some(tx) }, CancelToken { rx })
}

/// Owner side of a cancellation pair. Cancels on drop unless disarmed.
#[derive(Debug)]
pub struct CancelHandle {
    tx: Option<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Cancel the linked token immediately.
    pub fn cancel(mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(true);
        }
    }

    /// Consume the handle without cancelling.
    pub fn disarm(mut self) {
        self.tx = None;
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(true);
        }
    }
}

/// Task side of a cancellation pair.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Whether the handle has cancelled (or been dropped while armed).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// A token that never reports cancellation.
    ///
    /// For call sites that run a flow inline and fully own its lifetime.
    #[must_use]
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        // Dropping the sender without sending leaves the value false forever.
        drop(tx);
        Self { rx }
    }
}
