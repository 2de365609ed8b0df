//! Loyalty Engine
//!
//! The loyalty engine is the order-ledger core of a loyalty points service. Users submit the numbers of their purchase
//! orders, an external accrual service decides how many points each order earns, and the engine keeps a consistent
//! balance of available and withdrawn points for every user.
//!
//! The library is divided into these main sections:
//! 1. Storage ([`mod@traits`] and [`SqliteDatabase`]). The traits define what a backend must provide: an Order Store,
//!    a Ledger Store, and credential storage. The data types shared by all backends live in [`mod@db_types`].
//! 2. The accrual client ([`mod@accrual`]), which queries the external accrual service one order at a time.
//! 3. Reconciliation ([`mod@reconciliation`]). A queue of pending order numbers, drained by a self-healing pool of
//!    workers that poll the accrual service and settle orders.
//! 4. The public API ([`mod@lps_api`]), used by request handlers to submit orders, report balances and make
//!    withdrawals.
//!
//! Settlement events can be subscribed to through [`mod@events`].
pub mod accrual;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod lps_api;
pub mod reconciliation;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use accrual::{AccrualClient, AccrualClientConfig, AccrualService};
pub use lps_api::{auth_api::AuthApi, ledger_api::LedgerApi, order_flow_api::OrderFlowApi};
pub use reconciliation::{PoolHandle, ReconciliationConfig, ReconciliationPool, ReconciliationQueue};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    AuthApiError,
    AuthManagement,
    InsertOrderResult,
    LedgerApiError,
    LedgerManagement,
    OrderFlowError,
    OrderManagement,
    WithdrawalResult,
};
