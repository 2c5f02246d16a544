use thiserror::Error;
use time::OffsetDateTime;

pub const NICKNAME_MAX_CHARS: usize = 12;
pub const USERNAME_MAX_CHARS: usize = 20;
pub const PASSWORD_MAX_CHARS: usize = 50;

/// Reasons a sign-up payload is rejected before anything touches storage.
/// The `Display` text is returned to the client verbatim.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("bad request")]
    MissingField,
    #[error("nickname cannot exceed 12 characters")]
    NicknameTooLong,
    #[error("username cannot exceed 20 characters")]
    UsernameTooLong,
    #[error("password cannot exceed 50 characters")]
    PasswordTooLong,
}

/// A user row that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub nickname: String,
    pub username: String,
    pub password: String,
    pub created_at: OffsetDateTime,
}

/// Checks sign-up fields in a fixed order and reports the first rule broken.
///
/// Lengths are counted in characters, so multi-byte nicknames get the same
/// budget as ASCII ones.
///
/// # Errors
/// Returns the first [`ValidationError`] that applies.
pub fn validate_sign_up(nickname: &str, username: &str, password: &str) -> Result<(), ValidationError> {
    if nickname.is_empty() || username.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingField);
    }
    if nickname.chars().count() > NICKNAME_MAX_CHARS {
        return Err(ValidationError::NicknameTooLong);
    }
    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(ValidationError::UsernameTooLong);
    }
    if password.chars().count() > PASSWORD_MAX_CHARS {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}
