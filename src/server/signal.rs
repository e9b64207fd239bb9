// Signal handling module (nginx-style)
//
// Supported signals:
// - SIGHUP:  Reload the redirect rule table
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

use crate::config;
use crate::logger;

/// Start signal handlers (Unix only)
///
/// Spawns a background task that listens for Unix signals. SIGHUP rebuilds
/// the rule table from disk and swaps it in; a failed reload keeps the
/// current table. SIGTERM and SIGINT notify the accept loop to stop.
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<config::AppState>, shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sighup = signal(SignalKind::hangup()).expect("Failed to register SIGHUP handler");
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        logger::log_signal_handlers_registered();

        loop {
            tokio::select! {
                // SIGHUP: rebuild and swap the rule table (like nginx -s reload)
                _ = sighup.recv() => {
                    logger::log_reload_started();
                    match state.rules.reload().await {
                        Ok(count) => logger::log_reload_success(count),
                        Err(e) => logger::log_reload_failed(&e),
                    }
                }

                // SIGTERM: graceful shutdown
                _ = sigterm.recv() => {
                    shutdown.notify_one();
                    break;
                }

                // SIGINT: graceful shutdown (Ctrl+C)
                _ = sigint.recv() => {
                    shutdown.notify_one();
                    break;
                }
            }
        }
    });
}

/// Fallback for platforms without Unix signals - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(_state: Arc<config::AppState>, shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            shutdown.notify_one();
        }
    });
}
