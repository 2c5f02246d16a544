use crate::domain::clock::Clock;
use crate::domain::user::{NewUser, validate_sign_up};
use crate::error::Result;
use crate::storage::user_repo::UserRepository;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    #[must_use]
    pub fn new(repo: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Validates the sign-up fields and inserts the user, returning its id.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` for invalid input or a taken username,
    /// and `AppError::Database` for any other storage failure.
    #[tracing::instrument(
        skip(self, nickname, password),
        fields(user_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn sign_up(&self, nickname: String, username: String, password: String) -> Result<i64> {
        validate_sign_up(&nickname, &username, &password)?;

        let user = NewUser { nickname, username, password, created_at: self.clock.now() };
        let user_id = self.repo.create(&user).await?;

        tracing::Span::current().record("user_id", user_id);
        tracing::info!("User signed up successfully");

        Ok(user_id)
    }
}
