use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderNumber},
    lps_api::resolve_session,
    reconciliation::ReconciliationQueue,
    traits::{AuthManagement, InsertOrderResult, OrderFlowError, OrderManagement},
};

/// `OrderFlowApi` is the entry point for order submissions.
///
/// Accepted orders are handed to the reconciliation queue, which is the only link between this API and the
/// reconciliation workers.
pub struct OrderFlowApi<B> {
    db: B,
    queue: ReconciliationQueue,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.queue)
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, queue: ReconciliationQueue) -> Self {
        Self { db, queue }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn queue(&self) -> &ReconciliationQueue {
        &self.queue
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement + AuthManagement
{
    /// Submits an order number on behalf of the user bound to `session`.
    ///
    /// The order is stored as `NEW` and queued for reconciliation. Submitting a number that was already submitted
    /// fails with [`OrderFlowError::Duplicate`] if it belongs to the same user, or [`OrderFlowError::Used`] if it
    /// belongs to someone else.
    pub async fn submit_order(&self, session: &str, number: &str) -> Result<Order, OrderFlowError> {
        let owner = resolve_session(&self.db, session).await?;
        let number =
            number.parse::<OrderNumber>().map_err(|_| OrderFlowError::InvalidOrderNumber(number.trim().to_string()))?;
        let order = NewOrder::new(number.clone(), owner.as_str());
        match self.db.insert_order(order).await? {
            InsertOrderResult::Inserted(order) => {
                self.queue.push(number);
                info!("📦️ Order {} accepted from {owner}", order.number);
                Ok(order)
            },
            InsertOrderResult::AlreadyExists { owner: existing } if existing == owner => {
                debug!("📦️ {owner} resubmitted order {number}");
                Err(OrderFlowError::Duplicate(number))
            },
            InsertOrderResult::AlreadyExists { .. } => {
                debug!("📦️ {owner} tried to submit order {number}, which belongs to another user");
                Err(OrderFlowError::Used(number))
            },
        }
    }

    /// All orders submitted by the user bound to `session`, most recent first. An empty history is reported as
    /// [`OrderFlowError::Empty`].
    pub async fn orders_for_session(&self, session: &str) -> Result<Vec<Order>, OrderFlowError> {
        let owner = resolve_session(&self.db, session).await?;
        let orders = self.db.fetch_orders_for_owner(&owner).await?;
        if orders.is_empty() {
            return Err(OrderFlowError::Empty);
        }
        trace!("📦️ {} orders found for {owner}", orders.len());
        Ok(orders)
    }

    /// Puts every order that has not settled yet back on the reconciliation queue. Call this once at start-up, so that
    /// pending orders survive a restart.
    pub async fn resume_unsettled_orders(&self) -> Result<usize, OrderFlowError> {
        let orders = self.db.fetch_unsettled_orders().await?;
        let count = orders.len();
        for order in orders {
            self.queue.push(order.number);
        }
        info!("📦️ {count} unsettled orders queued for reconciliation");
        Ok(count)
    }
}
