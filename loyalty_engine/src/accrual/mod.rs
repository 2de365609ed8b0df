//! # Accrual client
//!
//! The accrual service is the external system that decides how many points an order earns. It is queried one order at
//! a time with `GET <base>/api/orders/{number}`.
//!
//! [`AccrualService`] is the seam the reconciliation workers use. [`AccrualClient`] is the HTTP implementation. Its
//! responses are mapped onto the small [`AccrualResult`] taxonomy by [`classify_response`], which is a pure function so
//! that the mapping can be tested without a network.
mod client;
mod config;
mod result;

use async_trait::async_trait;
pub use client::AccrualClient;
pub use config::AccrualClientConfig;
pub use result::{classify_response, AccrualResponse, AccrualResult, FinalStatus};
use thiserror::Error;

use crate::db_types::OrderNumber;

/// Errors that prevent a query from being made at all. These are fatal to the worker that hits them. Everything that
/// can go wrong *after* a request has been built is reported as an [`AccrualResult`] instead.
#[derive(Debug, Clone, Error)]
pub enum AccrualClientError {
    #[error("Could not initialize the accrual client: {0}")]
    Initialization(String),
    #[error("Could not build a request for the accrual service: {0}")]
    InvalidRequest(String),
}

#[async_trait]
pub trait AccrualService: Send + Sync {
    /// Asks the accrual service for the settlement status of a single order. Implementations must not retry
    /// internally.
    async fn query(&self, number: &OrderNumber) -> Result<AccrualResult, AccrualClientError>;
}
