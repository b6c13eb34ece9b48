//! Axum server setup.
//!
//! - One SQLite connection per request, opened inside the blocking pool
//! - Flash session store shared across requests
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use contacts_core::db::open_db;
use log::{info, warn};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::routes;
use crate::session::SessionStore;

/// Shared application state
pub struct AppState {
    /// Database file opened by every request.
    pub db_path: PathBuf,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            sessions: SessionStore::default(),
        }
    }
}

/// Builds the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    routes::router().with_state(state)
}

/// Runs the HTTP server until a shutdown signal arrives.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    // Migrate once up front so a broken database fails the start, not the
    // first request.
    drop(open_db(&config.database_path)?);

    let state = Arc::new(AppState::new(config.database_path.clone()));
    let listener = TcpListener::bind(config.bind).await?;
    info!(
        "event=server_start module=web status=ok bind={} database={}",
        config.bind,
        config.database_path.display()
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=web status=ok");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("event=signal_install module=web status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("event=signal_install module=web status=error signal=sigterm error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("event=shutdown_signal module=web status=ok");
}
