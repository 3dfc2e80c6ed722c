use crate::error::ApiError;
use crate::models::{normalize_email, AuthResponse, LoginRequest, NewAccount, RegisterRequest, Role};
use crate::routes::AppState;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::{from_fn, Next};
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use std::net::{IpAddr, Ipv4Addr};
use validator::Validate;

/// Configure register/login routes, both behind the shared rate limiter
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .wrap(from_fn(rate_limit))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login)),
    );
}

/// Source address used as the rate limit key
pub fn client_ip(req: &HttpRequest, trust_forwarded_for: bool) -> IpAddr {
    if trust_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|hop| hop.trim().parse::<IpAddr>().ok());
        if let Some(ip) = forwarded {
            return ip;
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Reject requests over quota before the body is read
async fn rate_limit<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, actix_web::Error> {
    let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
        let response = ApiError::Internal("application state not configured".to_string())
            .error_response();
        return Ok(req.into_response(response).map_into_right_body());
    };

    let ip = client_ip(req.request(), state.trust_forwarded_for);
    if let Err(exceeded) = state.limiter.check(ip).await {
        let response = ApiError::from(exceeded).error_response();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}

/// Register endpoint
///
/// POST /api/auth/register
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "email": "string",
///   "password": "string",
///   "role": "buyer|seller"
/// }
/// ```
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    if req.has_missing_fields() {
        return Err(ApiError::Validation("All fields are required.".to_string()));
    }

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for register request: field_errors={:?}", errors);
        return Err(ApiError::Validation(
            "Please provide a valid name and email address.".to_string(),
        ));
    }

    let role: Role = req.role.parse().map_err(ApiError::Validation)?;

    let auth = state.auth.clone();
    let password = req.password;
    let password_hash = web::block(move || auth.hash_password(&password)).await??;

    let account = state
        .accounts
        .create(NewAccount {
            name: req.name.trim().to_string(),
            email: normalize_email(&req.email),
            password_hash,
            role,
        })
        .await?;

    let token = state.auth.issue_token(&account.id, account.role)?;

    tracing::info!("Registered account {} as {}", account.id, account.role);

    Ok(HttpResponse::Created().json(AuthResponse::success(token, account.profile())))
}

/// Login endpoint
///
/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same 401 body.
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    if req.has_missing_fields() {
        return Err(ApiError::Validation(
            "Please provide email and password.".to_string(),
        ));
    }

    let email = normalize_email(&req.email);
    let account = state.accounts.find_by_email(&email).await?;

    // unknown emails still pay for one bcrypt verification
    let auth = state.auth.clone();
    let password = req.password;
    let hash = account.as_ref().map(|a| a.password_hash.clone());
    let verified = web::block(move || auth.verify_login(&password, hash.as_deref())).await??;

    let Some(account) = account.filter(|_| verified) else {
        tracing::debug!("Login attempt rejected");
        return Err(ApiError::invalid_credentials());
    };

    let token = state.auth.issue_token(&account.id, account.role)?;

    tracing::info!("Account {} logged in", account.id);

    Ok(HttpResponse::Ok().json(AuthResponse::success(token, account.profile())))
}
