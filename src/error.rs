use crate::models::ErrorResponse;
use crate::services::{AccountStoreError, AuthError, RateLimitExceeded, RATE_LIMIT_MESSAGE};
use actix_web::{error, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Message for both unknown-email and wrong-password logins
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Errors surfaced by the HTTP API
///
/// Every variant renders as a JSON [`ErrorResponse`]. Internal failures are
/// logged and replaced with a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_credentials() -> Self {
        ApiError::Auth(INVALID_CREDENTIALS.to_string())
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(ErrorResponse::new(message, status.as_u16()))
    }
}

impl From<AccountStoreError> for ApiError {
    fn from(err: AccountStoreError) -> Self {
        match err {
            AccountStoreError::DuplicateEmail(_) => {
                ApiError::Conflict("Email already registered.".to_string())
            }
            other => ApiError::Internal(format!("account store: {}", other)),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Jwt(e) => {
                tracing::debug!("Token rejected: {}", e);
                ApiError::Auth("Not authorized, token failed".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<RateLimitExceeded> for ApiError {
    fn from(_: RateLimitExceeded) -> Self {
        ApiError::RateLimited
    }
}

impl From<error::BlockingError> for ApiError {
    fn from(err: error::BlockingError) -> Self {
        ApiError::Internal(format!("blocking task failed: {}", err))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::Validation(format!("Invalid JSON: {}", err)).into()
}
