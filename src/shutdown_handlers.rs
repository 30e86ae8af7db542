use tracing::info;

use ratestorm::shutdown::CancelToken;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Cancel `cancel` on Ctrl+C or SIGTERM.
///
/// The task also exits once the token is cancelled by anything else.
pub fn setup_signal_cancel_handler(cancel: &CancelToken) -> tokio::task::JoinHandle<()> {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                eprintln!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = cancel.cancelled() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl+C received, stopping new requests.");
                    cancel.cancel();
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    info!("SIGTERM received, stopping new requests.");
                    cancel.cancel();
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = cancel.cancelled() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl+C received, stopping new requests.");
                    cancel.cancel();
                }
            }
        }
    })
}
