//! # Loyalty points server
//! This crate hosts the HTTP front end of the loyalty points service. It is responsible for:
//! * Registering users and logging them in. Sessions are carried in a cookie.
//! * Accepting order numbers and handing them to the reconciliation engine.
//! * Reporting orders, balances and withdrawals, and accepting new withdrawals.
//!
//! All the business logic lives in [`loyalty_engine`]. The handlers here only translate between HTTP and the engine's
//! APIs.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `POST /api/user/register`, `POST /api/user/login`: create an account, or log in to one.
//! * `POST /api/user/orders`, `GET /api/user/orders`: submit an order number, or list submitted orders.
//! * `GET /api/user/balance`: the current and withdrawn points of the user.
//! * `POST /api/user/balance/withdraw`, `GET /api/user/withdrawals`: spend points, or list past withdrawals.
//! * `/health`: A health check route that returns a 200 OK response.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
pub mod session;

#[cfg(test)]
mod endpoint_tests;
