#![allow(dead_code)]

use identity_server::config::{Config, DatabaseConfig, LogFormat, ServerConfig, TelemetryConfig};
use identity_server::domain::clock::MockClock;
use identity_server::storage::{self, DbPool};
use identity_server::{App, AppBuilder};
use std::sync::{Arc, Once};
use tempfile::TempDir;
use time::OffsetDateTime;
use time::macros::datetime;
use tokio::sync::watch;
use tokio::task::JoinHandle;

static INIT: Once = Once::new();

pub const NOW: OffsetDateTime = datetime!(2021-01-02 03:04:05.000006 UTC);

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("identity_server=debug".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

pub fn get_test_config(database_url: &str) -> Config {
    Config {
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 0, shutdown_timeout_secs: 5 },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
            min_connections: 1,
            max_lifetime_secs: 600,
            idle_timeout_secs: 5,
            acquire_timeout_secs: 10,
        },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, log_level: "debug".to_string() },
    }
}

pub struct RunningServer {
    pub url: String,
    pub shutdown_tx: watch::Sender<bool>,
    pub handle: JoinHandle<std::io::Result<()>>,
}

/// Binds an ephemeral port and runs `app` on it until `shutdown_tx` fires.
pub async fn spawn_server(app: App) -> RunningServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(app.serve(listener, shutdown_rx));

    RunningServer { url: format!("http://{addr}"), shutdown_tx, handle }
}

pub struct TestApp {
    pub server_url: String,
    pub client: reqwest::Client,
    pub pool: DbPool,
    pub clock: Arc<MockClock>,
    shutdown_tx: watch::Sender<bool>,
    _data_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        setup_tracing();

        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let database_url = format!("sqlite://{}", data_dir.path().join("identity.db").display());
        let config = get_test_config(&database_url);

        let pool = storage::init_pool(&config.database).await.expect("Failed to open SQLite");
        identity_server::run_migrations(&pool).await.expect("Failed to run migrations");

        let clock = Arc::new(MockClock::new(NOW));
        let app = AppBuilder::new(config)
            .with_database(pool.clone())
            .with_clock(Arc::<MockClock>::clone(&clock))
            .build()
            .expect("Failed to build app");

        let server = spawn_server(app).await;

        Self {
            server_url: server.url,
            client: reqwest::Client::new(),
            pool,
            clock,
            shutdown_tx: server.shutdown_tx,
            _data_dir: data_dir,
        }
    }

    pub async fn sign_up(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client.post(format!("{}/users/sign-up", self.server_url)).json(body).send().await.unwrap()
    }

    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM "user""#).fetch_one(&self.pool).await.unwrap()
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}
