use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use lps_common::Points;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------     OrderNumber       ---------------------------------------------------------
/// The number of a purchase order, as submitted by a user. Order numbers are globally unique: once submitted, a number
/// belongs to a single user forever.
///
/// The same type is used for the (distinct) namespace of withdrawal order ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderNumber(pub String);

impl OrderNumber {
    pub fn new<S: Into<String>>(number: S) -> Self {
        Self(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Order numbers must be non-empty strings of ASCII digits. No checksum is applied.
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl FromStr for OrderNumber {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = Self(s.trim().to_string());
        if number.is_well_formed() {
            Ok(number)
        } else {
            Err(ConversionError(format!("'{s}' is not a valid order number")))
        }
    }
}

impl From<String> for OrderNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// The settlement status of an order.
///
/// Transitions only ever move forward: `New` -> `Processing` -> (`Invalid` | `Processed`). The last two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatusType {
    /// The order has been submitted, but the accrual service has not reported on it yet.
    New,
    /// The accrual service has registered the order and is calculating the reward.
    Processing,
    /// The accrual service has refused to calculate a reward for this order. Terminal.
    Invalid,
    /// The reward calculation is complete. Terminal.
    Processed,
}

impl OrderStatusType {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Invalid | Self::Processed)
    }

    /// The statuses from which an order may move into this status.
    pub fn predecessors(&self) -> &'static [OrderStatusType] {
        use OrderStatusType::*;
        match self {
            New => &[],
            Processing => &[New],
            Invalid | Processed => &[New, Processing],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatusType) -> bool {
        next.predecessors().contains(self)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::New => write!(f, "NEW"),
            OrderStatusType::Processing => write!(f, "PROCESSING"),
            OrderStatusType::Invalid => write!(f, "INVALID"),
            OrderStatusType::Processed => write!(f, "PROCESSED"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(pub String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "PROCESSING" => Ok(Self::Processing),
            "INVALID" => Ok(Self::Invalid),
            "PROCESSED" => Ok(Self::Processed),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub number: OrderNumber,
    #[serde(skip_serializing)]
    pub owner: String,
    pub status: OrderStatusType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accrual: Option<Points>,
    #[serde(rename = "uploaded_at")]
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub number: OrderNumber,
    pub owner: String,
    pub submitted_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new<S: Into<String>>(number: OrderNumber, owner: S) -> Self {
        Self { number, owner: owner.into(), submitted_at: Utc::now() }
    }

    pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }
}

//--------------------------------------     Withdrawal        ---------------------------------------------------------
/// A withdrawal of points from a user's balance, towards a new order identified by `order_id`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Withdrawal {
    #[serde(rename = "order")]
    pub order_id: OrderNumber,
    #[serde(skip_serializing)]
    pub owner: String,
    pub sum: Points,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub order_id: OrderNumber,
    pub owner: String,
    pub sum: Points,
    pub processed_at: DateTime<Utc>,
}

impl NewWithdrawal {
    pub fn new<S: Into<String>>(order_id: OrderNumber, owner: S, sum: Points) -> Self {
        Self { order_id, owner: owner.into(), sum, processed_at: Utc::now() }
    }
}

//--------------------------------------       Balance         ---------------------------------------------------------
/// The ledger position of a single user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Balance {
    #[serde(rename = "current")]
    pub available: Points,
    pub withdrawn: Points,
}
