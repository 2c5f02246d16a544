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

use identity_server::config::Config;
use identity_server::domain::clock::SystemClock;
use identity_server::{AppBuilder, storage, telemetry};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    telemetry::init_telemetry(&config.telemetry)?;

    identity_server::setup_panic_hook();

    let boot_span = tracing::info_span!("boot_server");
    let (listener, app, pool, shutdown_rx) = async {
        // Phase 1: Infrastructure Setup (Resources)
        let pool = storage::init_pool(&config.database).await?;
        identity_server::run_migrations(&pool).await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        identity_server::spawn_signal_handler(shutdown_tx);

        // Phase 2: Component Wiring
        let app = AppBuilder::new(config.clone())
            .with_database(pool.clone())
            .with_clock(Arc::new(SystemClock))
            .build()?;

        // Phase 3: Listener
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(address = %addr, "listening");

        Ok::<_, anyhow::Error>((listener, app, pool, shutdown_rx))
    }
    .instrument(boot_span)
    .await?;

    // Phase 4: Serve until a signal arrives, then drain
    if let Err(e) = app.serve(listener, shutdown_rx).await {
        tracing::error!(error = %e, "Server error");
    }

    tracing::info!("closing database pool");
    pool.close().await;

    Ok(())
}
