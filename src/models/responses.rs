use serde::{Deserialize, Serialize};
use crate::models::domain::AccountProfile;

/// Response for register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub status: String,
    pub token: String,
    pub data: AccountProfile,
}

impl AuthResponse {
    pub fn success(token: String, data: AccountProfile) -> Self {
        Self {
            status: "success".to_string(),
            token,
            data,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            status_code,
        }
    }
}
