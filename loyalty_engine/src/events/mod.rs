//! Settlement notifications.
//!
//! Reconciliation workers publish an [`OrderSettledEvent`] whenever an order reaches a terminal status. Other parts of
//! the system can react to these by registering a hook with [`EventHooks::on_order_settled`].
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::OrderSettledEvent;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
