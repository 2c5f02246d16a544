use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "IDENTITY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long = "http-port", env = "IDENTITY_HTTP_PORT", default_value_t = 3000)]
    pub port: u16,

    /// How long in-flight requests may take to drain after a shutdown signal
    #[arg(long, env = "IDENTITY_GRACEFUL_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct DatabaseConfig {
    /// SQLite connection URL; the file is created if it does not exist
    #[arg(long = "database-url", env = "IDENTITY_DATABASE_URL", default_value = "sqlite://identity.db")]
    pub url: String,

    /// Maximum number of open connections in the pool
    #[arg(long = "db-max-connections", env = "IDENTITY_DB_MAX_CONNECTIONS", default_value_t = 20)]
    pub max_connections: u32,

    /// Number of idle connections the pool keeps open
    #[arg(long = "db-min-connections", env = "IDENTITY_DB_MIN_CONNECTIONS", default_value_t = 10)]
    pub min_connections: u32,

    /// Maximum lifetime of a pooled connection in seconds
    #[arg(long = "db-max-lifetime-secs", env = "IDENTITY_DB_MAX_LIFETIME_SECS", default_value_t = 600)]
    pub max_lifetime_secs: u64,

    /// How long a connection may sit idle before it is closed, in seconds
    #[arg(long = "db-idle-timeout-secs", env = "IDENTITY_DB_IDLE_TIMEOUT_SECS", default_value_t = 5)]
    pub idle_timeout_secs: u64,

    /// How long to wait for a connection before giving up, in seconds
    #[arg(long = "db-acquire-timeout-secs", env = "IDENTITY_DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 10)]
    pub acquire_timeout_secs: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    #[default]
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "IDENTITY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Default log filter, used when RUST_LOG is not set
    #[arg(long, env = "IDENTITY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
