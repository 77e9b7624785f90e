use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels `token` on the first SIGINT or SIGTERM. Nothing else is touched.
///
/// The handlers are installed before this returns, so a signal sent right
/// afterwards is already observed. Must be called from within a runtime.
#[cfg(unix)]
pub fn cancel_on_signal(token: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.recv() => log::info!("SIGINT received, shutting down..."),
            _ = terminate.recv() => log::info!("SIGTERM received, shutting down..."),
        }
        token.cancel();
    }))
}

#[cfg(not(unix))]
pub fn cancel_on_signal(token: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => log::info!("Signal received, shutting down..."),
            Err(e) => log::error!("Unable to listen for shutdown signals: {}", e),
        }
        token.cancel();
    }))
}
