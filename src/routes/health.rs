use crate::models::HealthResponse;
use crate::routes::AppState;
use actix_web::{web, HttpResponse, Responder};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.accounts.health_check().await.unwrap_or(false);

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.accounts.backend().to_string(),
        timestamp: chrono::Utc::now(),
    })
}
