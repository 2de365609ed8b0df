use std::fmt::Debug;

use log::*;
use lps_common::Points;

use crate::{
    db_types::{Balance, NewWithdrawal, OrderNumber, Withdrawal},
    lps_api::resolve_session,
    traits::{AuthManagement, LedgerApiError, LedgerManagement, WithdrawalResult},
};

/// Balances and withdrawals.
pub struct LedgerApi<B> {
    db: B,
}

impl<B: Debug> Debug for LedgerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LedgerApi ({:?})", self.db)
    }
}

impl<B> LedgerApi<B>
where B: LedgerManagement + AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub async fn balance_for_session(&self, session: &str) -> Result<Balance, LedgerApiError> {
        let owner = resolve_session(&self.db, session).await?;
        self.db.fetch_balance(&owner).await
    }

    /// Spends `sum` points towards a new order, `order_id`.
    ///
    /// The debit and the withdrawal record are written in one transaction. Replaying an identical request returns the
    /// original withdrawal without debiting the balance again.
    pub async fn withdraw(&self, session: &str, order_id: &str, sum: Points) -> Result<Withdrawal, LedgerApiError> {
        let owner = resolve_session(&self.db, session).await?;
        let order_id = order_id
            .parse::<OrderNumber>()
            .map_err(|_| LedgerApiError::InvalidOrderNumber(order_id.trim().to_string()))?;
        if !sum.is_positive() {
            return Err(LedgerApiError::InvalidAmount(sum));
        }
        let withdrawal = NewWithdrawal::new(order_id, owner, sum);
        match self.db.process_withdrawal(withdrawal).await? {
            WithdrawalResult::Processed(w) => {
                info!("💸️ {} withdrew {} towards order {}", w.owner, w.sum, w.order_id);
                Ok(w)
            },
            WithdrawalResult::AlreadyRecorded(w) => {
                debug!("💸️ Withdrawal {} was replayed", w.order_id);
                Ok(w)
            },
        }
    }

    /// All withdrawals made by the user bound to `session`, most recent first. An empty history is reported as
    /// [`LedgerApiError::Empty`].
    pub async fn withdrawals_for_session(&self, session: &str) -> Result<Vec<Withdrawal>, LedgerApiError> {
        let owner = resolve_session(&self.db, session).await?;
        let withdrawals = self.db.fetch_withdrawals(&owner).await?;
        if withdrawals.is_empty() {
            return Err(LedgerApiError::Empty);
        }
        Ok(withdrawals)
    }
}
