//! Common value types for the loyalty points service.
//!
//! * [`Points`] is the fixed-point amount used for accruals, balances and withdrawals.
//! * [`Secret`] wraps credentials so that they never leak into logs.
mod points;

pub mod helpers;
pub mod op;
mod secret;

pub use points::{Points, PointsConversionError, POINTS_SCALE};
pub use secret::Secret;
