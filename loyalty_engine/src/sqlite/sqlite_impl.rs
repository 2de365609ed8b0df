//! `SqliteDatabase` is the concrete storage backend of the loyalty engine.
//!
//! It uses SQLite and implements all the traits defined in the [`crate::traits`] module.
//!
//! Every multi-statement operation runs in a transaction whose first statement is a write. SQLite then takes the write
//! lock up front, instead of having to upgrade a read lock half-way through (which fails with `SQLITE_BUSY` under
//! contention).
use std::fmt::Debug;

use async_trait::async_trait;
use log::*;
use lps_common::{Points, Secret};
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{db_url, ledger, new_pool, orders, users};
use crate::{
    db_types::{Balance, NewOrder, NewWithdrawal, Order, OrderNumber, OrderStatusType, Withdrawal},
    helpers::{hash_password, verify_password},
    traits::{
        AuthApiError,
        AuthManagement,
        InsertOrderResult,
        LedgerApiError,
        LedgerManagement,
        OrderFlowError,
        OrderManagement,
        WithdrawalResult,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({})", self.url)
    }
}

#[async_trait]
impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, OrderFlowError> {
        // The insert returns rows, so it must be committed explicitly before other connections can see it
        let mut tx = self.pool.begin().await?;
        let result = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn update_order_status(
        &self,
        number: &OrderNumber,
        status: OrderStatusType,
        accrual: Option<Points>,
        credit_owner: bool,
    ) -> Result<Option<Order>, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let updated = orders::update_status(number, status, accrual, &mut tx).await?;
        if let Some(order) = &updated {
            let credit = order.accrual.filter(|a| a.is_positive());
            if let (true, OrderStatusType::Processed, Some(amount)) = (credit_owner, order.status, credit) {
                let balance = ledger::credit(&order.owner, amount, &mut tx)
                    .await
                    .map_err(|e| OrderFlowError::DatabaseError(e.to_string()))?;
                if balance.is_none() {
                    return Err(OrderFlowError::DatabaseError(format!(
                        "Cannot credit {amount} for order {number}. {} has no account",
                        order.owner
                    )));
                }
                info!("🗃️ {} credited with {amount} for order {number}", order.owner);
            }
        }
        tx.commit().await?;
        Ok(updated)
    }

    async fn fetch_order(&self, number: &OrderNumber) -> Result<Option<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order(number, &mut conn).await
    }

    async fn fetch_orders_for_owner(&self, owner: &str) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_for_owner(owner, &mut conn).await
    }

    async fn fetch_unsettled_orders(&self) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_unsettled_orders(&mut conn).await
    }
}

#[async_trait]
impl LedgerManagement for SqliteDatabase {
    async fn fetch_balance(&self, owner: &str) -> Result<Balance, LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        ledger::fetch_balance(owner, &mut conn).await?.ok_or_else(|| LedgerApiError::AccountNotFound(owner.into()))
    }

    async fn debit(&self, owner: &str, sum: Points) -> Result<Balance, LedgerApiError> {
        if !sum.is_positive() {
            return Err(LedgerApiError::InvalidAmount(sum));
        }
        let mut tx = self.pool.begin().await?;
        if let Some(balance) = ledger::debit(owner, sum, &mut tx).await? {
            tx.commit().await?;
            return Ok(balance);
        }
        let balance = ledger::fetch_balance(owner, &mut tx).await?;
        tx.rollback().await?;
        match balance {
            Some(b) => Err(LedgerApiError::InsufficientFunds { available: b.available, requested: sum }),
            None => Err(LedgerApiError::AccountNotFound(owner.into())),
        }
    }

    async fn credit(&self, owner: &str, sum: Points) -> Result<Balance, LedgerApiError> {
        if !sum.is_positive() {
            return Err(LedgerApiError::InvalidAmount(sum));
        }
        let mut tx = self.pool.begin().await?;
        let balance = ledger::credit(owner, sum, &mut tx).await?;
        tx.commit().await?;
        balance.ok_or_else(|| LedgerApiError::AccountNotFound(owner.into()))
    }

    async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<bool, LedgerApiError> {
        let mut tx = self.pool.begin().await?;
        let inserted = ledger::insert_withdrawal(withdrawal, &mut tx).await?;
        tx.commit().await?;
        Ok(inserted.is_some())
    }

    async fn process_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<WithdrawalResult, LedgerApiError> {
        if !withdrawal.sum.is_positive() {
            return Err(LedgerApiError::InvalidAmount(withdrawal.sum));
        }
        let owner = withdrawal.owner.clone();
        let sum = withdrawal.sum;
        let order_id = withdrawal.order_id.clone();
        let mut tx = self.pool.begin().await?;
        let recorded = match ledger::insert_withdrawal(withdrawal, &mut tx).await? {
            Some(w) => w,
            None => {
                let existing = ledger::fetch_withdrawal(&order_id, &mut tx).await?;
                tx.rollback().await?;
                return match existing {
                    Some(w) if w.owner == owner && w.sum == sum => {
                        debug!("🗃️ Withdrawal {order_id} replayed by {owner}. Not debiting again.");
                        Ok(WithdrawalResult::AlreadyRecorded(w))
                    },
                    _ => Err(LedgerApiError::Used(order_id.as_str().to_string())),
                };
            },
        };
        if ledger::debit(&owner, sum, &mut tx).await?.is_none() {
            let balance = ledger::fetch_balance(&owner, &mut tx).await?;
            tx.rollback().await?;
            return match balance {
                Some(b) => Err(LedgerApiError::InsufficientFunds { available: b.available, requested: sum }),
                None => Err(LedgerApiError::AccountNotFound(owner)),
            };
        }
        tx.commit().await?;
        info!("🗃️ {owner} withdrew {sum} towards order {order_id}");
        Ok(WithdrawalResult::Processed(recorded))
    }

    async fn fetch_withdrawals(&self, owner: &str) -> Result<Vec<Withdrawal>, LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        ledger::fetch_withdrawals_for_owner(owner, &mut conn).await
    }
}

#[async_trait]
impl AuthManagement for SqliteDatabase {
    async fn register_user(&self, login: &str, password: &Secret<String>, token: &str) -> Result<(), AuthApiError> {
        let hash = hash_password(password)?;
        let mut tx = self.pool.begin().await?;
        if !users::insert_user(login, &hash, &mut tx).await? {
            tx.rollback().await?;
            return Err(AuthApiError::LoginTaken(login.into()));
        }
        users::unbind_session(token, &mut tx).await?;
        users::bind_session(login, token, &mut tx).await?;
        tx.commit().await?;
        info!("🗃️ New user registered: {login}");
        Ok(())
    }

    async fn login_user(&self, login: &str, password: &Secret<String>, token: &str) -> Result<(), AuthApiError> {
        let mut tx = self.pool.begin().await?;
        // Clearing the token first makes a write the first statement of the transaction
        users::unbind_session(token, &mut tx).await?;
        let creds = users::fetch_credentials(login, &mut tx).await?;
        let valid = creds.map(|c| verify_password(password, &c.password_hash)).unwrap_or(false);
        if !valid {
            tx.rollback().await?;
            debug!("🗃️ Failed login attempt for {login}");
            return Err(AuthApiError::WrongData);
        }
        users::bind_session(login, token, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ {login} logged in");
        Ok(())
    }

    async fn fetch_login_for_session(&self, token: &str) -> Result<Option<String>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_login_for_session(token, &mut conn).await
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `LPS_DATABASE_URL`
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        debug!("🗃️ Migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
