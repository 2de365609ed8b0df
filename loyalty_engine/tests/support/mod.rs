#![allow(dead_code)]
pub mod prepare_env;
pub mod scripted_accrual;

use loyalty_engine::{AuthManagement, LedgerManagement, SqliteDatabase};
use lps_common::{Points, Secret};

/// Registers `login` with a throwaway password and binds it to the session token `{login}-session`.
pub async fn new_user(db: &SqliteDatabase, login: &str) -> String {
    let token = format!("{login}-session");
    let password = Secret::new(format!("{login}-password"));
    db.register_user(login, &password, &token).await.expect("Error registering user");
    token
}

pub async fn fund(db: &SqliteDatabase, login: &str, points: i64) {
    db.credit(login, Points::from_points(points)).await.expect("Error crediting user");
}
