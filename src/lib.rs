//! DealMatch - account and swipe/match service for the DealMatch acquisition marketplace
//!
//! The HTTP side registers buyers and sellers, logs them in with signed,
//! time-limited tokens and deletes accounts on request. The `core` module holds
//! the swipe bookkeeping the dashboards use: a registry of accepted and
//! declined candidates that never lets one id sit in both.

pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{GestureResolver, MatchRegistry, SwipeDecision, SwipeOutcome};
pub use error::ApiError;
pub use models::{AccountProfile, Membership, Role, SwipeCandidate};
pub use routes::AppState;
