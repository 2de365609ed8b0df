use std::{sync::Arc, time::Duration};

use log::*;
use lps_common::Points;

use crate::{
    accrual::{AccrualResult, AccrualService},
    db_types::{OrderNumber, OrderStatusType},
    events::{EventProducers, OrderSettledEvent},
    reconciliation::{ReconciliationConfig, ReconciliationError, ReconciliationQueue},
    traits::OrderManagement,
};

/// What a worker does with an order number once it has been reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The order is settled (or no longer needs checking). It is not requeued.
    Finished,
    /// The order goes back on the queue. The worker sleeps for `delay`, if given, before it pops its next entry.
    Requeue(Option<Duration>),
}

/// A single long-lived polling task. See the module documentation.
pub struct ReconciliationWorker<B, A> {
    id: usize,
    db: Arc<B>,
    accrual: Arc<A>,
    queue: ReconciliationQueue,
    config: ReconciliationConfig,
    producers: EventProducers,
}

impl<B, A> ReconciliationWorker<B, A>
where
    B: OrderManagement,
    A: AccrualService,
{
    pub fn new(
        id: usize,
        db: Arc<B>,
        accrual: Arc<A>,
        queue: ReconciliationQueue,
        config: ReconciliationConfig,
        producers: EventProducers,
    ) -> Self {
        Self { id, db, accrual, queue, config, producers }
    }

    /// Drains the queue until it is closed, or a fatal error occurs.
    ///
    /// If the worker dies while it holds an order number (a fatal error, or a panic), the number is pushed back onto
    /// the queue as the stack unwinds.
    pub async fn run(self) -> Result<(), ReconciliationError> {
        debug!("🔁️ Worker {} started", self.id);
        while let Some(number) = self.queue.pop().await {
            let in_flight = InFlight::new(&self.queue, number);
            let outcome = self.reconcile(in_flight.number()).await.map_err(|e| {
                error!("🔁️ Worker {} hit a fatal error reconciling order {}. {e}", self.id, in_flight.number());
                e
            })?;
            let number = in_flight.release();
            if let ReconcileOutcome::Requeue(delay) = outcome {
                self.queue.push(number);
                if let Some(delay) = delay {
                    trace!("🔁️ Worker {} backing off for {}ms", self.id, delay.as_millis());
                    tokio::time::sleep(delay).await;
                }
            }
        }
        info!("🔁️ Worker {} has no more work. The reconciliation queue is closed.", self.id);
        Ok(())
    }

    /// Queries the accrual service once for `number`, and applies the answer to the Order Store.
    pub async fn reconcile(&self, number: &OrderNumber) -> Result<ReconcileOutcome, ReconciliationError> {
        let result = self.accrual.query(number).await?;
        trace!("🔁️ Worker {} got {result:?} for order {number}", self.id);
        let outcome = match result {
            AccrualResult::Settled { status, accrual } => self.apply(number, status.into(), accrual).await,
            AccrualResult::StillProcessing(_) => self.apply(number, OrderStatusType::Processing, None).await,
            AccrualResult::NotRegistered => {
                debug!("🔁️ The accrual service does not know order {number}. Marking it as invalid.");
                self.apply(number, OrderStatusType::Invalid, None).await
            },
            AccrualResult::Unknown(status) => {
                warn!("🔁️ The accrual service reported an unknown status, {status}, for order {number}");
                ReconcileOutcome::Requeue(None)
            },
            AccrualResult::RateLimited(retry_after) => {
                let delay = retry_after
                    .map(Duration::from_secs)
                    .unwrap_or(self.config.default_retry_after)
                    .min(self.config.max_retry_after);
                info!("🔁️ Accrual service rate limit hit. Worker {} pausing for {}s", self.id, delay.as_secs());
                ReconcileOutcome::Requeue(Some(delay))
            },
            AccrualResult::Unavailable(reason) => {
                warn!("🔁️ The accrual service is unavailable. {reason}");
                ReconcileOutcome::Requeue(Some(self.config.unavailable_backoff))
            },
        };
        Ok(outcome)
    }

    async fn apply(&self, number: &OrderNumber, status: OrderStatusType, accrual: Option<Points>) -> ReconcileOutcome {
        let credit = self.config.credit_on_settlement;
        match self.db.update_order_status(number, status, accrual, credit).await {
            Ok(Some(order)) if order.status.is_terminal() => {
                info!("🔁️ Order {number} settled as {}", order.status);
                self.producers.publish_order_settled(OrderSettledEvent::new(order)).await;
                ReconcileOutcome::Finished
            },
            Ok(Some(_)) => ReconcileOutcome::Requeue(None),
            Ok(None) => self.outcome_for_rejected_transition(number, status).await,
            Err(e) => {
                error!("🔁️ Could not update order {number} to {status}. It will be retried. {e}");
                ReconcileOutcome::Requeue(Some(self.config.unavailable_backoff))
            },
        }
    }

    /// The store refused the transition. That is expected when the order is already in `status` or has moved past it.
    async fn outcome_for_rejected_transition(&self, number: &OrderNumber, status: OrderStatusType) -> ReconcileOutcome {
        match self.db.fetch_order(number).await {
            Ok(Some(order)) if order.status.is_terminal() => {
                trace!("🔁️ Order {number} is already {}. Nothing to do.", order.status);
                ReconcileOutcome::Finished
            },
            Ok(Some(_)) => ReconcileOutcome::Requeue(None),
            Ok(None) => {
                warn!("🔁️ Order {number} is not in the store. Dropping it from reconciliation.");
                ReconcileOutcome::Finished
            },
            Err(e) => {
                error!("🔁️ Could not fetch order {number} after it refused to move to {status}. {e}");
                ReconcileOutcome::Requeue(Some(self.config.unavailable_backoff))
            },
        }
    }
}

/// Holds the order number a worker is busy with. Unless it is released, the number goes back on the queue when the
/// guard is dropped.
struct InFlight<'a> {
    queue: &'a ReconciliationQueue,
    number: OrderNumber,
    released: bool,
}

impl<'a> InFlight<'a> {
    fn new(queue: &'a ReconciliationQueue, number: OrderNumber) -> Self {
        Self { queue, number, released: false }
    }

    fn number(&self) -> &OrderNumber {
        &self.number
    }

    fn release(mut self) -> OrderNumber {
        self.released = true;
        self.number.clone()
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.released {
            warn!("🔁️ Returning order {} to the reconciliation queue", self.number);
            self.queue.push(self.number.clone());
        }
    }
}
