// Service exports
pub mod accounts;
pub mod auth;
pub mod rate_limit;

pub use accounts::{AccountStore, AccountStoreError, InMemoryAccountStore, PostgresAccountStore};
pub use auth::{parse_token_lifetime, AuthError, AuthService, Claims};
pub use rate_limit::{RateLimitConfig, RateLimitExceeded, RateLimiter, RATE_LIMIT_MESSAGE};
