use crate::error::ApiError;
use crate::models::Role;
use crate::routes::AppState;
use actix_web::dev::Payload;
use actix_web::{http::header, web, FromRequest, HttpRequest, HttpResponse};
use std::future::{ready, Ready};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/profile", web::delete().to(delete_profile));
}

/// Account identified by a valid bearer token
///
/// Use as a handler argument; extraction fails with a 401 when the
/// `Authorization` header is missing, malformed, or carries a token whose
/// signature or expiry does not check out.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub id: String,
    pub role: Role,
}

impl AuthenticatedAccount {
    fn from_http_request(req: &HttpRequest) -> Result<Self, ApiError> {
        let state = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| ApiError::Internal("application state not configured".to_string()))?;

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Auth("Not authorized, no token".to_string()))?;

        let claims = state.auth.verify_token(token)?;

        Ok(Self {
            id: claims.sub,
            role: claims.role,
        })
    }
}

impl FromRequest for AuthenticatedAccount {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}

/// Delete the caller's account
///
/// DELETE /api/users/profile
///
/// Returns 204 with no body, or 404 if the account was already removed.
async fn delete_profile(
    state: web::Data<AppState>,
    account: AuthenticatedAccount,
) -> Result<HttpResponse, ApiError> {
    if !state.accounts.delete(&account.id).await? {
        tracing::info!("Delete requested for missing account {}", account.id);
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!("Deleted account {} ({})", account.id, account.role);

    Ok(HttpResponse::NoContent().finish())
}
