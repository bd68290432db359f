//! Data-change notifications for dependent views.
//!
//! After a successful checkout, views showing orders or cart contents must
//! refetch. Rather than a process-global boolean that views poll, the shop
//! carries an explicit publish/subscribe hub scoped to the application
//! state: a monotonically increasing version published over a watch
//! channel. Subscribers compare versions or await a change.

use tokio::sync::watch;

/// Publisher half of the refetch signal.
///
/// Clone-cheap; one hub lives in the application state.
#[derive(Debug, Clone)]
pub struct RefetchHub {
    tx: watch::Sender<u64>,
}

impl RefetchHub {
    /// Create a hub at version 0.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Publish a data change, bumping the version.
    pub fn publish(&self) {
        self.tx.send_modify(|version| *version += 1);
    }

    /// Current version.
    #[must_use]
    pub fn version(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Subscribe to future changes.
    #[must_use]
    pub fn subscribe(&self) -> RefetchListener {
        RefetchListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for RefetchHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber half of the refetch signal.
#[derive(Debug, Clone)]
pub struct RefetchListener {
    rx: watch::Receiver<u64>,
}

impl RefetchListener {
    /// Version as of the last observation.
    #[must_use]
    pub fn version(&self) -> u64 {
        *self.rx.borrow()
    }

    /// Wait until the version changes from the last observed value.
    ///
    /// Returns the new version, or `None` if the hub has been dropped.
    pub async fn changed(&mut self) -> Option<u64> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_bumps_version() {
        let hub = RefetchHub::new();
        assert_eq!(hub.version(), 0);
        hub.publish();
        hub.publish();
        assert_eq!(hub.version(), 2);
    }

    #[tokio::test]
    async fn test_listener_observes_change() {
        let hub = RefetchHub::new();
        let mut listener = hub.subscribe();
        assert_eq!(listener.version(), 0);

        hub.publish();
        assert_eq!(listener.changed().await, Some(1));
    }

    #[tokio::test]
    async fn test_listener_sees_none_after_hub_drop() {
        let hub = RefetchHub::new();
        let mut listener = hub.subscribe();
        drop(hub);
        assert_eq!(listener.changed().await, None);
    }
}
