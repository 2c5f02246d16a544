use crate::domain::user::NewUser;
use crate::storage::DbPool;
use async_trait::async_trait;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreateUserError {
    #[error("duplicate username")]
    DuplicateUsername,
    #[error("insert user: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for CreateUserError {
    fn from(err: sqlx::Error) -> Self {
        // `ux_username` is the only unique index on the table besides the rowid.
        match &err {
            sqlx::Error::Database(db_err) if db_err.kind() == ErrorKind::UniqueViolation => Self::DuplicateUsername,
            _ => Self::Database(err),
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Inserts a user and returns the generated id.
    ///
    /// # Errors
    /// Returns `CreateUserError::DuplicateUsername` if the username is taken.
    async fn create(&self, user: &NewUser) -> Result<i64, CreateUserError>;
}

#[derive(Clone, Debug)]
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &NewUser) -> Result<i64, CreateUserError> {
        let result = sqlx::query(
            r#"
            INSERT INTO "user" (nickname, username, password, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
        )
        .bind(&user.nickname)
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
