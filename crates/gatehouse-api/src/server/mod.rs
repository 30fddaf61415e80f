//! Listeners: TLS termination and the plaintext redirect.

pub mod redirect;
pub mod tls;

use tokio::sync::watch;

/// Resolves once `shutdown` holds `true` or its sender is gone.
pub async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }
}
