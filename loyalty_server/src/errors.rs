use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use loyalty_engine::{AuthApiError, LedgerApiError, OrderFlowError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    AuthError(#[from] AuthApiError),
    #[error("{0}")]
    OrderError(#[from] OrderFlowError),
    #[error("{0}")]
    LedgerError(#[from] LedgerApiError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::AuthError(e) => match e {
                AuthApiError::NoAuthorization => StatusCode::UNAUTHORIZED,
                AuthApiError::WrongData => StatusCode::UNAUTHORIZED,
                AuthApiError::LoginTaken(_) => StatusCode::CONFLICT,
                AuthApiError::MalformedCredentials(_) => StatusCode::BAD_REQUEST,
                AuthApiError::HashingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::OrderError(e) => match e {
                OrderFlowError::NoAuthorization => StatusCode::UNAUTHORIZED,
                // Handlers answer duplicates and empty lists themselves; these arms only apply if one slips through
                OrderFlowError::Duplicate(_) => StatusCode::OK,
                OrderFlowError::Empty => StatusCode::NO_CONTENT,
                OrderFlowError::Used(_) => StatusCode::CONFLICT,
                OrderFlowError::InvalidOrderNumber(_) => StatusCode::UNPROCESSABLE_ENTITY,
                OrderFlowError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::LedgerError(e) => match e {
                LedgerApiError::NoAuthorization => StatusCode::UNAUTHORIZED,
                LedgerApiError::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
                LedgerApiError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
                LedgerApiError::InvalidOrderNumber(_) => StatusCode::UNPROCESSABLE_ENTITY,
                LedgerApiError::Used(_) => StatusCode::CONFLICT,
                LedgerApiError::Empty => StatusCode::NO_CONTENT,
                LedgerApiError::AccountNotFound(_) => StatusCode::NOT_FOUND,
                LedgerApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        }
        if status == StatusCode::NO_CONTENT {
            return HttpResponse::NoContent().finish();
        }
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}
