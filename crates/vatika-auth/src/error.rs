//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),

    /// Password too weak.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// Name or email failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] vatika_cache::CacheError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Check if this is an authentication failure the user can correct.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::UserAlreadyExists(_)
                | AuthError::WeakPassword(_)
                | AuthError::Validation(_)
        )
    }
}
