//! Periodic removal of expired sessions.
//!
//! Expired sessions are already refused and evicted on lookup; the sweep
//! only keeps the persisted document from accumulating tokens nobody
//! presents again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use gatehouse_core::error::AppError;

use super::store::SessionStore;

/// Sweeps expired sessions on a fixed interval.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    session_store: Arc<SessionStore>,
    interval: Duration,
}

impl SessionCleanup {
    /// Creates a sweeper running every `interval`.
    pub fn new(session_store: Arc<SessionStore>, interval: Duration) -> Self {
        Self {
            session_store,
            interval,
        }
    }

    /// Runs one sweep. Returns the number of sessions removed.
    pub async fn run_cleanup(&self) -> Result<usize, AppError> {
        let purged = self.session_store.purge_expired().await?;
        if purged > 0 {
            info!(purged = purged, "Session cleanup completed");
        } else {
            debug!("Session cleanup found nothing to remove");
        }
        Ok(purged)
    }

    /// Spawns the sweep loop. It stops when `shutdown` flips to `true`
    /// or its sender is dropped.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.run_cleanup().await {
                            error!(error = %e, "Session cleanup failed");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            debug!("Session cleanup stopped");
                            break;
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::traits::ManualClock;
    use gatehouse_entity::account::UserRole;
    use gatehouse_entity::session::Session;
    use gatehouse_store::MemoryStore;

    #[tokio::test]
    async fn test_run_cleanup_removes_expired() {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(
            SessionStore::open(Arc::new(MemoryStore::<Session>::new()), clock.clone())
                .await
                .unwrap(),
        );
        store
            .create("alice", UserRole::Viewer, Duration::from_secs(5))
            .await
            .unwrap();
        store
            .create("bob", UserRole::Viewer, Duration::from_secs(500))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(6));
        let cleanup = SessionCleanup::new(Arc::clone(&store), Duration::from_secs(60));
        assert_eq!(cleanup.run_cleanup().await.unwrap(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_loop_sweeps_and_stops() {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(
            SessionStore::open(Arc::new(MemoryStore::<Session>::new()), clock.clone())
                .await
                .unwrap(),
        );
        store
            .create("alice", UserRole::Viewer, Duration::from_secs(5))
            .await
            .unwrap();
        clock.advance(chrono::Duration::seconds(6));

        let (tx, rx) = watch::channel(false);
        let handle = SessionCleanup::new(Arc::clone(&store), Duration::from_secs(60)).spawn(rx);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(store.is_empty().await);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
