use lps_common::{Points, Secret};
use serde::Deserialize;

/// The body of the register and login requests.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: Secret<String>,
}

/// The body of a withdrawal request. `order` is the number of the new order the points are spent on.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalRequest {
    pub order: String,
    pub sum: Points,
}
