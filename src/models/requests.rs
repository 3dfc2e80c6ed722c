use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register an account
///
/// Every field defaults to empty so a missing field surfaces as the
/// "All fields are required." validation error rather than a JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 120))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

impl RegisterRequest {
    pub fn has_missing_fields(&self) -> bool {
        [&self.name, &self.email, &self.password, &self.role]
            .iter()
            .any(|field| field.trim().is_empty())
    }
}

/// Request to log in with email and password
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn has_missing_fields(&self) -> bool {
        self.email.trim().is_empty() || self.password.is_empty()
    }
}
