#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod storage;
pub mod telemetry;

use crate::api::AppState;
use crate::config::Config;
use crate::domain::clock::{Clock, SystemClock};
use crate::services::user_service::UserService;
use crate::storage::DbPool;
use crate::storage::user_repo::{SqliteUserRepository, UserRepository};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Applies the embedded migrations, creating the `user` table when absent.
///
/// # Errors
/// Returns `MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}

/// Routes panics through `tracing` so they land in the structured log.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(ToString::to_string).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("unknown panic");
        tracing::error!(panic = %payload, location = %location, "Panic occurred");
    }));
}

/// Flips `shutdown_tx` to `true` on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {},
            () = terminate => {},
        }

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}

/// Wires storage, clock, and services into the router state.
#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    pool: Option<DbPool>,
    repo: Option<Arc<dyn UserRepository>>,
    clock: Option<Arc<dyn Clock>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, pool: None, repo: None, clock: None }
    }

    #[must_use]
    pub fn with_database(mut self, pool: DbPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Overrides the storage layer; takes precedence over `with_database`.
    #[must_use]
    pub fn with_user_repository(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.repo = Some(repo);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// # Errors
    /// Returns an error if neither a database nor a user repository was provided.
    pub fn build(self) -> anyhow::Result<App> {
        let repo: Arc<dyn UserRepository> = match (self.repo, self.pool) {
            (Some(repo), _) => repo,
            (None, Some(pool)) => Arc::new(SqliteUserRepository::new(pool)),
            (None, None) => anyhow::bail!("AppBuilder requires a database or a user repository"),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        Ok(App { config: self.config, state: AppState { user_service: UserService::new(repo, clock) } })
    }
}

#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub state: AppState,
}

impl App {
    #[must_use]
    pub fn router(&self) -> axum::Router {
        api::app_router(self.state.clone())
    }

    /// Serves until `shutdown_rx` turns `true`, then drains in-flight requests
    /// for at most the configured shutdown timeout.
    ///
    /// # Errors
    /// Returns an I/O error if the server fails while accepting connections.
    pub async fn serve(self, listener: TcpListener, shutdown_rx: watch::Receiver<bool>) -> std::io::Result<()> {
        let drain_timeout = Duration::from_secs(self.config.server.shutdown_timeout_secs);

        let mut server_rx = shutdown_rx.clone();
        let server = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = server_rx.wait_for(|&s| s).await;
            })
            .into_future();

        let mut deadline_rx = shutdown_rx;
        let deadline = async move {
            let signalled = deadline_rx.wait_for(|&s| s).await.is_ok();
            if !signalled {
                std::future::pending::<()>().await;
            }
            tokio::time::sleep(drain_timeout).await;
        };

        tokio::select! {
            res = server => res,
            () = deadline => {
                tracing::warn!("Timeout waiting for in-flight requests to finish.");
                Ok(())
            }
        }
    }
}
