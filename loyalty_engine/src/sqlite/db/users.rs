use chrono::Utc;
use log::{debug, trace};
use sqlx::{FromRow, SqliteConnection};

use crate::traits::AuthApiError;

#[derive(Debug, Clone, FromRow)]
pub struct StoredCredentials {
    pub password_hash: String,
}

/// Creates the user with a zero balance. Returns `false` if the login is already taken.
pub async fn insert_user(
    login: &str,
    password_hash: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, AuthApiError> {
    let now = Utc::now();
    let id: Option<i64> = sqlx::query_scalar(
        r#"
            INSERT INTO users (login, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (login) DO NOTHING
            RETURNING id;
        "#,
    )
    .bind(login)
    .bind(password_hash)
    .bind(now)
    .fetch_optional(conn)
    .await?;
    if let Some(id) = id {
        debug!("🗃️ Created user {login} with id {id}");
    }
    Ok(id.is_some())
}

pub async fn fetch_credentials(
    login: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<StoredCredentials>, AuthApiError> {
    let creds = sqlx::query_as("SELECT password_hash FROM users WHERE login = $1")
        .bind(login)
        .fetch_optional(conn)
        .await?;
    Ok(creds)
}

/// Detaches `token` from whichever user it is bound to, if any.
pub async fn unbind_session(token: &str, conn: &mut SqliteConnection) -> Result<(), AuthApiError> {
    let result = sqlx::query("UPDATE users SET session_token = NULL WHERE session_token = $1")
        .bind(token)
        .execute(conn)
        .await?;
    if result.rows_affected() > 0 {
        trace!("🗃️ Session token unbound from its previous user");
    }
    Ok(())
}

pub async fn bind_session(login: &str, token: &str, conn: &mut SqliteConnection) -> Result<bool, AuthApiError> {
    let result = sqlx::query("UPDATE users SET session_token = $1, updated_at = $2 WHERE login = $3")
        .bind(token)
        .bind(Utc::now())
        .bind(login)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn fetch_login_for_session(token: &str, conn: &mut SqliteConnection) -> Result<Option<String>, AuthApiError> {
    let login = sqlx::query_scalar("SELECT login FROM users WHERE session_token = $1")
        .bind(token)
        .fetch_optional(conn)
        .await?;
    Ok(login)
}
