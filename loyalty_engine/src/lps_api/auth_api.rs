use std::fmt::Debug;

use log::*;
use lps_common::Secret;

use crate::{
    helpers::validate_credentials,
    lps_api::resolve_session,
    traits::{AuthApiError, AuthManagement},
};

/// Accounts and session bindings.
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    /// Creates a user with a zero balance, and binds `token` to the new user. If `token` was bound to anyone else, that
    /// binding is removed.
    pub async fn register(&self, login: &str, password: &Secret<String>, token: &str) -> Result<(), AuthApiError> {
        validate_credentials(login, password)?;
        self.db.register_user(login, password, token).await?;
        info!("🔑️ {login} has registered");
        Ok(())
    }

    /// Checks the credentials, and (re)binds `token` to the user.
    pub async fn login(&self, login: &str, password: &Secret<String>, token: &str) -> Result<(), AuthApiError> {
        validate_credentials(login, password)?;
        self.db.login_user(login, password, token).await?;
        debug!("🔑️ {login} has logged in");
        Ok(())
    }

    /// The login bound to `token`. Fails with [`AuthApiError::NoAuthorization`] if the token is not bound.
    pub async fn resolve_session(&self, token: &str) -> Result<String, AuthApiError> {
        resolve_session(&self.db, token).await
    }
}
