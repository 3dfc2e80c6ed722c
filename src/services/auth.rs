use crate::models::Role;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors from password hashing and token handling
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Invalid token lifetime '{0}'")]
    InvalidLifetime(String),

    #[error("JWT secret must not be empty")]
    EmptySecret,
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Password hashing and stateless token issuing
///
/// Tokens are HS256 JWTs. Nothing is stored server-side: a token is valid
/// while its signature checks out and `exp` has not passed.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    bcrypt_cost: u32,
    // verified against when the email is unknown, so both login paths cost one bcrypt run
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(secret: &str, token_ttl: Duration, bcrypt_cost: u32) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }

        let dummy_hash = bcrypt::hash(uuid::Uuid::new_v4().to_string(), bcrypt_cost)?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
            bcrypt_cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hash a password with bcrypt (salted)
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    /// Verify a password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(bcrypt::verify(password, hash)?)
    }

    /// Verify a login attempt against the stored hash, if there is one
    ///
    /// Without a hash the password is checked against a throwaway hash of the
    /// same cost and the result is always `false`.
    pub fn verify_login(&self, password: &str, hash: Option<&str>) -> Result<bool, AuthError> {
        match hash {
            Some(hash) => self.verify_password(password, hash),
            None => {
                bcrypt::verify(password, &self.dummy_hash)?;
                Ok(false)
            }
        }
    }

    /// Issue a token for an account
    pub fn issue_token(&self, account_id: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

/// Parse a token lifetime such as `7d`, `12h`, `30m`, `45s` or `3600`
pub fn parse_token_lifetime(value: &str) -> Result<Duration, AuthError> {
    let value = value.trim();
    let invalid = || AuthError::InvalidLifetime(value.to_string());

    let (digits, unit) = match value.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&value[..idx], Some(c.to_ascii_lowercase())),
        Some(_) => (value, None),
        None => return Err(invalid()),
    };

    let amount: i64 = digits.trim().parse().map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }

    match unit {
        None | Some('s') => Ok(Duration::seconds(amount)),
        Some('m') => Ok(Duration::minutes(amount)),
        Some('h') => Ok(Duration::hours(amount)),
        Some('d') => Ok(Duration::days(amount)),
        Some(_) => Err(invalid()),
    }
}
