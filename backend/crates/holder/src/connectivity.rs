//! Online/offline signal
//!
//! The platform layer reports connectivity changes with `set_online`;
//! network-dependent paths read `is_online` and fail fast when it is false.

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct ConnectivitySignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ConnectivitySignal {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn set_online(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            tracing::info!(online, "Connectivity changed");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivitySignal {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_state() {
        let signal = ConnectivitySignal::default();
        let other = signal.clone();
        let mut rx = signal.subscribe();

        other.set_online(false);
        assert!(!signal.is_online());
        rx.changed().await.unwrap();
        assert!(!*rx.borrow());

        // Same value is not a change
        other.set_online(false);
        assert!(!rx.has_changed().unwrap());
    }
}
