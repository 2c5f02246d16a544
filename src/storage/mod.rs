use crate::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;

pub mod user_repo;

pub type DbPool = Pool<Sqlite>;

/// Initializes the database connection pool.
///
/// The database file is created when missing. A first connection is opened
/// before returning, so an unreachable store fails here instead of on the
/// first request.
///
/// An in-memory database lives only as long as its connection, so for
/// `:memory:` URLs the pool holds exactly one connection that never expires.
///
/// # Errors
/// Returns `sqlx::Error` if the URL is invalid or the connection fails.
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
    let pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));

    let pool_options = if is_in_memory(&config.url) {
        pool_options.max_connections(1).min_connections(1).idle_timeout(None).max_lifetime(None)
    } else {
        pool_options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections.min(config.max_connections))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
    };

    pool_options.connect_with(options).await
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database_config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: 20,
            min_connections: 10,
            max_lifetime_secs: 600,
            idle_timeout_secs: 5,
            acquire_timeout_secs: 10,
        }
    }

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:identity?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://identity.db"));
    }

    #[tokio::test]
    async fn test_memory_pool_shares_one_database() {
        let pool = init_pool(&database_config("sqlite::memory:")).await.unwrap();
        crate::run_migrations(&pool).await.unwrap();

        assert_eq!(pool.options().get_max_connections(), 1);

        // Every checkout sees the migrated table.
        for _ in 0..5 {
            let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "user""#).fetch_one(&pool).await.unwrap();
            assert_eq!(count, 0);
        }
    }

    #[tokio::test]
    async fn test_file_pool_uses_configured_size() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("identity.db").display());

        let pool = init_pool(&database_config(&url)).await.unwrap();

        assert_eq!(pool.options().get_max_connections(), 20);
        assert!(dir.path().join("identity.db").exists());
    }
}
