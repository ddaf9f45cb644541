//! Signal handling for graceful server shutdown

use crate::logging::*;

/// Resolves once SIGTERM or SIGINT arrives
///
/// Handed to `axum::serve(..).with_graceful_shutdown(..)` so in-flight
/// requests finish before the process exits. If a handler cannot be
/// installed, the other signal still works.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			warn!("Failed to listen for SIGINT: {}. Ctrl-C will not stop the server gracefully.", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		use tokio::signal::unix::{signal, SignalKind};

		match signal(SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				warn!("Failed to setup SIGTERM handler: {}. Process will not handle SIGTERM gracefully.", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => debug!("Received SIGINT, shutting down..."),
		_ = terminate => debug!("Received SIGTERM, shutting down..."),
	}
}

// vim: ts=4
