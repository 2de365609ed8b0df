//! Session failures surface as the error type of whichever API resolved the session.
use crate::traits::{AuthApiError, LedgerApiError, OrderFlowError};

impl From<AuthApiError> for OrderFlowError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::DatabaseError(s) => OrderFlowError::DatabaseError(s),
            _ => OrderFlowError::NoAuthorization,
        }
    }
}

impl From<AuthApiError> for LedgerApiError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::DatabaseError(s) => LedgerApiError::DatabaseError(s),
            _ => LedgerApiError::NoAuthorization,
        }
    }
}
