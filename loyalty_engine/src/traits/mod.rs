//! #  Backend contracts
//!
//! This module defines the interfaces that storage *backends* of the loyalty engine must implement.
//!
//! * [`OrderManagement`] is the Order Store. It owns the mapping of order numbers to owners and settlement status.
//! * [`LedgerManagement`] is the Ledger Store. It owns user balances and the append-only withdrawal log.
//! * [`AuthManagement`] stores user credentials and resolves session tokens to logins.
//!
//! Backends are shared between request handlers and the reconciliation workers, so every trait requires `Send + Sync`
//! and returns `Send` futures.
mod auth_management;
mod data_objects;
mod ledger_management;
mod order_management;

pub use auth_management::{AuthApiError, AuthManagement};
pub use data_objects::{InsertOrderResult, WithdrawalResult};
pub use ledger_management::{LedgerApiError, LedgerManagement};
pub use order_management::{OrderFlowError, OrderManagement};
