//! # Accrual reconciliation
//!
//! Submitted orders are settled asynchronously. Their numbers are pushed onto a [`ReconciliationQueue`], and a
//! [`ReconciliationPool`] of long-lived workers drains the queue. Each worker asks the accrual service about the order,
//! applies the answer to the Order Store, and pushes the number back onto the queue if the order has not reached a
//! terminal status yet.
//!
//! The pool is supervised: a worker that panics or fails is replaced immediately, and the order it was working on is
//! put back on the queue.
mod config;
mod pool;
mod queue;
mod worker;

pub use config::ReconciliationConfig;
pub use pool::{PoolHandle, ReconciliationPool};
pub use queue::ReconciliationQueue;
use thiserror::Error;
pub use worker::{ReconcileOutcome, ReconciliationWorker};

use crate::accrual::AccrualClientError;

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    #[error("Accrual client error: {0}")]
    AccrualClientError(#[from] AccrualClientError),
    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),
    #[error("Worker was cancelled")]
    WorkerCancelled,
}
