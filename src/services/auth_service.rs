//! Domain service for account registration and credential verification.
//!
//! Passwords are stored as a salted keyed hash; the plaintext never leaves
//! this boundary.

use thiserror::Error;

use crate::db::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already exists!")]
    UsernameTaken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a new account with a freshly salted credential.
    ///
    /// The username is case-normalized to lowercase before the uniqueness
    /// check and before storage.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] if the username is already
    /// registered.
    async fn register(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Verifies a username/password pair.
    ///
    /// Returns `Ok(None)` both for an unknown username and for a wrong
    /// password, so callers cannot tell which part was rejected.
    async fn login(&self, username: &str, password: &str) -> Result<Option<User>, AuthError>;

    /// Case-insensitive existence check.
    async fn user_exists(&self, username: &str) -> Result<bool, AuthError>;
}
