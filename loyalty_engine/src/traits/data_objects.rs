use serde::{Deserialize, Serialize};

use crate::db_types::{Order, Withdrawal};

/// The outcome of an attempt to store a brand-new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertOrderResult {
    Inserted(Order),
    /// The order number was already taken. `owner` is the login it belongs to.
    AlreadyExists { owner: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalResult {
    /// The balance was debited and the withdrawal recorded.
    Processed(Withdrawal),
    /// The identical withdrawal had already been recorded. The balance was not debited again.
    AlreadyRecorded(Withdrawal),
}
