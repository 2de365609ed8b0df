use async_trait::async_trait;
use lps_common::Points;
use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderNumber, OrderStatusType},
    traits::InsertOrderResult,
};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("The session is not bound to any user")]
    NoAuthorization,
    #[error("Order {0} has already been submitted by this user")]
    Duplicate(OrderNumber),
    #[error("Order {0} has already been submitted by another user")]
    Used(OrderNumber),
    #[error("Invalid order number: {0}")]
    InvalidOrderNumber(String),
    #[error("There are no orders to report")]
    Empty,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}

/// The Order Store.
///
/// An order number belongs to exactly one owner for its lifetime, and its status only ever moves forward.
#[async_trait]
pub trait OrderManagement: Send + Sync {
    /// Stores a brand-new order with status `NEW`.
    ///
    /// The insert must be atomic with respect to concurrent submissions of the same number. If the number is already
    /// taken, nothing is changed and the existing owner is returned.
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, OrderFlowError>;

    /// Moves the order into `status`, setting the accrual amount if one is given.
    ///
    /// The update is conditional on the current status being one of the legal predecessors of `status`. If it is not
    /// (including the case where the order is already terminal) nothing is changed and `None` is returned.
    ///
    /// If `credit_owner` is set and the order moves into `PROCESSED` with a positive accrual, the owner's available
    /// balance is credited with the accrual in the same transaction.
    async fn update_order_status(
        &self,
        number: &OrderNumber,
        status: OrderStatusType,
        accrual: Option<Points>,
        credit_owner: bool,
    ) -> Result<Option<Order>, OrderFlowError>;

    async fn fetch_order(&self, number: &OrderNumber) -> Result<Option<Order>, OrderFlowError>;

    /// All orders belonging to `owner`, most recently submitted first.
    async fn fetch_orders_for_owner(&self, owner: &str) -> Result<Vec<Order>, OrderFlowError>;

    /// Every order that has not reached a terminal status, oldest first.
    async fn fetch_unsettled_orders(&self) -> Result<Vec<Order>, OrderFlowError>;
}
