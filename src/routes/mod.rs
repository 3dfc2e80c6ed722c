// Route exports
pub mod auth;
pub mod health;
pub mod users;

use crate::services::{AccountStore, AuthService, RateLimiter};
use actix_web::{web, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub auth: AuthService,
    pub limiter: Arc<RateLimiter>,
    /// Key the rate limiter on the first `X-Forwarded-For` hop
    pub trust_forwarded_for: bool,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index)).service(
        web::scope("/api")
            .configure(health::configure)
            .configure(auth::configure)
            .configure(users::configure),
    );
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().body("API is running...")
}
