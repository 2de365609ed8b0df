//! # Loyalty engine public API
//!
//! The `lps_api` module exposes the programmatic API that request handlers use.
//!
//! * [`auth_api`] registers users, logs them in, and resolves session tokens to logins.
//! * [`order_flow_api`] accepts order submissions and feeds them to the reconciliation queue.
//! * [`ledger_api`] reports balances and processes withdrawals.
//!
//! The pattern for using all the APIs is the same. An API instance is created by supplying a database backend that
//! implements the backend traits the API needs. Every operation takes the caller's session token, and resolves it to a
//! login before doing anything else.
//!
//! ```rust,ignore
//! use loyalty_engine::{LedgerApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = LedgerApi::new(db);
//! let balance = api.balance_for_session(&token).await?;
//! ```
pub mod auth_api;
mod errors;
pub mod ledger_api;
pub mod order_flow_api;

use crate::traits::{AuthApiError, AuthManagement};

/// Resolves `token` to the login it is bound to.
pub(crate) async fn resolve_session<B: AuthManagement>(db: &B, token: &str) -> Result<String, AuthApiError> {
    if token.is_empty() {
        return Err(AuthApiError::NoAuthorization);
    }
    db.fetch_login_for_session(token).await?.ok_or(AuthApiError::NoAuthorization)
}
