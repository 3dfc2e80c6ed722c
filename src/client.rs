use crate::models::{AccountProfile, AuthResponse, LoginRequest, RegisterRequest, Role};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the DealMatch API
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("No authentication token found. Please log in again.")]
    NotAuthenticated,
}

/// Token and profile held after a successful register or login
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub profile: AccountProfile,
}

/// Typed client for the account API
///
/// Keeps the session from the last successful register/login and sends its
/// token as a bearer credential on authenticated calls.
pub struct ApiClient {
    base_url: String,
    client: Client,
    session: Option<Session>,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api`
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            session: None,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn profile(&self) -> Option<&AccountProfile> {
        self.session.as_ref().map(|s| &s.profile)
    }

    /// Forget the stored session
    pub fn clear_auth(&mut self) {
        self.session = None;
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<AuthResponse, ClientError> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.as_str().to_string(),
        };

        let response = self
            .client
            .post(format!("{}/auth/register", self.base_url))
            .json(&body)
            .send()
            .await?;

        self.store_session(response).await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .json(&body)
            .send()
            .await?;

        self.store_session(response).await
    }

    /// Delete the logged-in account and clear the session
    pub async fn delete_profile(&mut self) -> Result<(), ClientError> {
        let token = self.token().ok_or(ClientError::NotAuthenticated)?;

        let response = self
            .client
            .delete(format!("{}/users/profile", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        tracing::debug!("Profile deleted");
        self.clear_auth();
        Ok(())
    }

    async fn store_session(&mut self, response: Response) -> Result<AuthResponse, ClientError> {
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let auth: AuthResponse = response.json().await?;
        self.session = Some(Session {
            token: auth.token.clone(),
            profile: auth.data.clone(),
        });

        Ok(auth)
    }
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| fallback_message(status));

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

fn fallback_message(status: StatusCode) -> String {
    format!("HTTP error! status: {}", status.as_u16())
}
