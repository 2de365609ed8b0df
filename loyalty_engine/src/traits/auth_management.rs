use async_trait::async_trait;
use lps_common::Secret;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("The session is not bound to any user")]
    NoAuthorization,
    #[error("The login {0} is already taken")]
    LoginTaken(String),
    #[error("Login and password do not match")]
    WrongData,
    #[error("Malformed credentials: {0}")]
    MalformedCredentials(String),
    #[error("Could not hash the password: {0}")]
    HashingError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}

/// User credentials and session bindings.
///
/// A session token is bound to at most one user at a time.
#[async_trait]
pub trait AuthManagement: Send + Sync {
    /// Creates a new user with a zero balance and binds `token` to it.
    async fn register_user(&self, login: &str, password: &Secret<String>, token: &str) -> Result<(), AuthApiError>;

    /// Verifies the credentials and rebinds `token` to the user.
    async fn login_user(&self, login: &str, password: &Secret<String>, token: &str) -> Result<(), AuthApiError>;

    /// Returns the login bound to `token`, if any.
    async fn fetch_login_for_session(&self, token: &str) -> Result<Option<String>, AuthApiError>;
}
