use lps_common::Points;
use serde::Deserialize;

use crate::db_types::OrderStatusType;

/// A terminal settlement status reported by the accrual service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalStatus {
    Invalid,
    Processed,
}

impl From<FinalStatus> for OrderStatusType {
    fn from(status: FinalStatus) -> Self {
        match status {
            FinalStatus::Invalid => OrderStatusType::Invalid,
            FinalStatus::Processed => OrderStatusType::Processed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccrualResult {
    /// The order has reached a terminal status. `accrual` is only ever present for processed orders.
    Settled { status: FinalStatus, accrual: Option<Points> },
    /// The accrual service knows the order, but has not finished with it. Carries the remote status.
    StillProcessing(String),
    /// The accrual service reported a status outside the documented set.
    Unknown(String),
    /// HTTP 204: the accrual service has no record of the order.
    NotRegistered,
    /// HTTP 429. Carries the `Retry-After` value in seconds, if the header was present and parseable.
    RateLimited(Option<u64>),
    /// The service could not be reached, or gave an answer that cannot be used.
    Unavailable(String),
}

/// The body of a 200 response from the accrual service.
#[derive(Debug, Clone, Deserialize)]
pub struct AccrualResponse {
    #[serde(alias = "number")]
    pub order: String,
    pub status: String,
    #[serde(default)]
    pub accrual: Option<Points>,
}

impl From<AccrualResponse> for AccrualResult {
    fn from(response: AccrualResponse) -> Self {
        match response.status.as_str() {
            "REGISTERED" | "PROCESSING" => AccrualResult::StillProcessing(response.status),
            "INVALID" => AccrualResult::Settled { status: FinalStatus::Invalid, accrual: None },
            "PROCESSED" => AccrualResult::Settled { status: FinalStatus::Processed, accrual: response.accrual },
            _ => AccrualResult::Unknown(response.status),
        }
    }
}

/// Maps a raw accrual service response onto an [`AccrualResult`].
///
/// Every documented status code is listed explicitly. Anything else is treated as the service being unavailable.
pub fn classify_response(status: u16, retry_after: Option<&str>, body: &[u8]) -> AccrualResult {
    match status {
        200 => match serde_json::from_slice::<AccrualResponse>(body) {
            Ok(response) => response.into(),
            Err(e) => AccrualResult::Unavailable(format!("Malformed response body: {e}")),
        },
        204 => AccrualResult::NotRegistered,
        429 => AccrualResult::RateLimited(retry_after.and_then(|s| s.trim().parse::<u64>().ok())),
        500..=599 => AccrualResult::Unavailable(format!("Accrual service error {status}")),
        _ => AccrualResult::Unavailable(format!("Undocumented status code {status}")),
    }
}
