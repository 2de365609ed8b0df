use chrono::Utc;
use log::{debug, trace};
use lps_common::Points;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Balance, NewWithdrawal, OrderNumber, Withdrawal},
    traits::LedgerApiError,
};

pub async fn fetch_balance(owner: &str, conn: &mut SqliteConnection) -> Result<Option<Balance>, LedgerApiError> {
    let balance = sqlx::query_as("SELECT available, withdrawn FROM users WHERE login = $1")
        .bind(owner)
        .fetch_optional(conn)
        .await?;
    Ok(balance)
}

/// Deducts `sum` from the available balance and adds it to the withdrawn total, but only if the available balance
/// covers it. Returns `None` (and changes nothing) if it does not, or if the user does not exist.
pub async fn debit(owner: &str, sum: Points, conn: &mut SqliteConnection) -> Result<Option<Balance>, LedgerApiError> {
    let balance: Option<Balance> = sqlx::query_as(
        r#"
            UPDATE users
            SET available = available - $1, withdrawn = withdrawn + $1, updated_at = $2
            WHERE login = $3 AND available >= $1
            RETURNING available, withdrawn;
        "#,
    )
    .bind(sum)
    .bind(Utc::now())
    .bind(owner)
    .fetch_optional(conn)
    .await?;
    if let Some(b) = &balance {
        debug!("🗃️ Debited {sum} from {owner}. Available: {}, withdrawn: {}", b.available, b.withdrawn);
    }
    Ok(balance)
}

pub async fn credit(owner: &str, sum: Points, conn: &mut SqliteConnection) -> Result<Option<Balance>, LedgerApiError> {
    let balance: Option<Balance> = sqlx::query_as(
        r#"
            UPDATE users
            SET available = available + $1, updated_at = $2
            WHERE login = $3
            RETURNING available, withdrawn;
        "#,
    )
    .bind(sum)
    .bind(Utc::now())
    .bind(owner)
    .fetch_optional(conn)
    .await?;
    if let Some(b) = &balance {
        debug!("🗃️ Credited {sum} to {owner}. Available: {}", b.available);
    }
    Ok(balance)
}

/// Appends the withdrawal to the log. If the order id has been recorded before, nothing is written and `None` is
/// returned.
pub async fn insert_withdrawal(
    withdrawal: NewWithdrawal,
    conn: &mut SqliteConnection,
) -> Result<Option<Withdrawal>, LedgerApiError> {
    let inserted: Option<Withdrawal> = sqlx::query_as(
        r#"
            INSERT INTO withdrawals (order_id, owner, sum, processed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (order_id) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(&withdrawal.order_id)
    .bind(&withdrawal.owner)
    .bind(withdrawal.sum)
    .bind(withdrawal.processed_at)
    .fetch_optional(conn)
    .await?;
    if inserted.is_none() {
        trace!("🗃️ Withdrawal {} has already been recorded", withdrawal.order_id);
    }
    Ok(inserted)
}

pub async fn fetch_withdrawal(
    order_id: &OrderNumber,
    conn: &mut SqliteConnection,
) -> Result<Option<Withdrawal>, LedgerApiError> {
    let withdrawal = sqlx::query_as("SELECT * FROM withdrawals WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    Ok(withdrawal)
}

pub async fn fetch_withdrawals_for_owner(
    owner: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Withdrawal>, LedgerApiError> {
    let withdrawals =
        sqlx::query_as("SELECT * FROM withdrawals WHERE owner = $1 ORDER BY processed_at DESC, rowid DESC")
            .bind(owner)
            .fetch_all(conn)
            .await?;
    Ok(withdrawals)
}
