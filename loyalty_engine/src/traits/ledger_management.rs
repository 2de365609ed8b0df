use async_trait::async_trait;
use lps_common::Points;
use thiserror::Error;

use crate::{
    db_types::{Balance, NewWithdrawal, Withdrawal},
    traits::WithdrawalResult,
};

#[derive(Debug, Clone, Error)]
pub enum LedgerApiError {
    #[error("The session is not bound to any user")]
    NoAuthorization,
    #[error("Insufficient funds. {available} is available, but {requested} was requested")]
    InsufficientFunds { available: Points, requested: Points },
    #[error("Withdrawal amounts must be positive. {0} is not")]
    InvalidAmount(Points),
    #[error("Invalid withdrawal order id: {0}")]
    InvalidOrderNumber(String),
    #[error("Withdrawal order id {0} has already been used")]
    Used(String),
    #[error("There are no withdrawals to report")]
    Empty,
    #[error("No account exists for {0}")]
    AccountNotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for LedgerApiError {
    fn from(e: sqlx::Error) -> Self {
        LedgerApiError::DatabaseError(e.to_string())
    }
}

/// The Ledger Store.
///
/// `available` may never become negative, and `withdrawn` never decreases.
#[async_trait]
pub trait LedgerManagement: Send + Sync {
    async fn fetch_balance(&self, owner: &str) -> Result<Balance, LedgerApiError>;

    /// Check-and-deduct `sum` from the available balance of `owner` in a single statement. The deducted amount is
    /// added to the withdrawn total.
    async fn debit(&self, owner: &str, sum: Points) -> Result<Balance, LedgerApiError>;

    /// Adds `sum` to the available balance of `owner`.
    async fn credit(&self, owner: &str, sum: Points) -> Result<Balance, LedgerApiError>;

    /// Appends a withdrawal to the log. Recording the same order id twice is a silent no-op. Returns `true` if a new
    /// record was written.
    async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<bool, LedgerApiError>;

    /// Debits the owner's balance and records the withdrawal in a single transaction.
    ///
    /// Replaying a withdrawal (same order id, owner and sum) succeeds without debiting twice. Any other reuse of the
    /// order id fails with [`LedgerApiError::Used`].
    async fn process_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<WithdrawalResult, LedgerApiError>;

    /// All withdrawals made by `owner`, most recent first.
    async fn fetch_withdrawals(&self, owner: &str) -> Result<Vec<Withdrawal>, LedgerApiError>;
}
