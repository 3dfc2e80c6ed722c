// Integration tests for the DealMatch HTTP API

use actix_web::{http::StatusCode, test, web, App};
use dealmatch::error::handle_json_payload_error;
use dealmatch::routes::{self, AppState};
use dealmatch::services::{AuthService, InMemoryAccountStore, RateLimitConfig, RateLimiter};
use dealmatch::Role;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const SECRET: &str = "integration-secret";

fn create_test_state(max_requests: u32) -> AppState {
    AppState {
        accounts: Arc::new(InMemoryAccountStore::new()),
        auth: AuthService::new(SECRET, chrono::Duration::days(7), 4).unwrap(),
        limiter: Arc::new(RateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(15 * 60),
            max_tracked_addresses: 1_000,
        })),
        trust_forwarded_for: false,
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn peer(n: u8) -> SocketAddr {
    SocketAddr::from(([10, 0, 0, n], 40000))
}

fn register_request(from: SocketAddr, name: &str, email: &str, password: &str, role: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/register")
        .peer_addr(from)
        .set_json(json!({ "name": name, "email": email, "password": password, "role": role }))
}

fn login_request(from: SocketAddr, email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/login")
        .peer_addr(from)
        .set_json(json!({ "email": email, "password": password }))
}

#[actix_web::test]
async fn test_register_returns_token_and_profile() {
    let state = create_test_state(100);
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        register_request(peer(1), "A", "a@x.com", "secret1", "buyer").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["name"], "A");
    assert_eq!(body["data"]["email"], "a@x.com");
    assert_eq!(body["data"]["role"], "buyer");
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());

    let claims = state.auth.verify_token(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, body["data"]["id"].as_str().unwrap());
    assert_eq!(claims.role, Role::Buyer);
}

#[actix_web::test]
async fn test_duplicate_email_conflicts_regardless_of_password() {
    let state = create_test_state(100);
    let app = test_app!(state);

    let first = test::call_service(
        &app,
        register_request(peer(1), "A", "a@x.com", "secret1", "buyer").to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let mut bodies = Vec::new();
    for (password, email) in [("secret2", "a@x.com"), ("secret1", "A@X.COM")] {
        let resp = test::call_service(
            &app,
            register_request(peer(1), "B", email, password, "seller").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        bodies.push(body);
    }

    assert_eq!(bodies[0]["message"], "Email already registered.");
    assert_eq!(bodies[0], bodies[1]);
}

#[actix_web::test]
async fn test_register_validation() {
    let state = create_test_state(100);
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .peer_addr(peer(1))
            .set_json(json!({ "name": "A", "email": "a@x.com", "password": "secret1" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "All fields are required.");

    let resp = test::call_service(
        &app,
        register_request(peer(1), "A", "a@x.com", "secret1", "broker").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        register_request(peer(1), "A", "not-an-email", "secret1", "buyer").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_json_is_rejected_with_json_body() {
    let state = create_test_state(100);
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(peer(1))
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[actix_web::test]
async fn test_login_success_and_indistinguishable_failures() {
    let state = create_test_state(100);
    let app = test_app!(state);

    test::call_service(
        &app,
        register_request(peer(1), "Sam", "sam@x.com", "secret1", "seller").to_request(),
    )
    .await;

    let resp = test::call_service(&app, login_request(peer(1), "Sam@X.com", "secret1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["role"], "seller");
    assert!(state.auth.verify_token(body["token"].as_str().unwrap()).is_ok());

    let wrong_password =
        test::call_service(&app, login_request(peer(1), "sam@x.com", "nope").to_request()).await;
    let unknown_email =
        test::call_service(&app, login_request(peer(1), "ghost@x.com", "secret1").to_request()).await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let wrong_password: Value = test::read_body_json(wrong_password).await;
    let unknown_email: Value = test::read_body_json(unknown_email).await;
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["message"], "Invalid email or password.");
}

#[actix_web::test]
async fn test_login_missing_fields() {
    let state = create_test_state(100);
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(peer(1))
            .set_json(json!({ "email": "a@x.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Please provide email and password.");
}

#[actix_web::test]
async fn test_eleventh_attempt_is_rate_limited() {
    let state = create_test_state(10);
    let app = test_app!(state);

    // registered from a different address so it does not use the quota
    let resp = test::call_service(
        &app,
        register_request(peer(9), "A", "a@x.com", "secret1", "buyer").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    for _ in 0..10 {
        let resp =
            test::call_service(&app, login_request(peer(2), "a@x.com", "wrong").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    // correct credentials do not bypass the limit
    let resp = test::call_service(&app, login_request(peer(2), "a@x.com", "secret1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Too many attempts, try again later.");

    // register shares the same quota
    let resp = test::call_service(
        &app,
        register_request(peer(2), "C", "c@x.com", "secret1", "buyer").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    // another address is unaffected
    let resp = test::call_service(&app, login_request(peer(3), "a@x.com", "secret1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_delete_account_flow() {
    let state = create_test_state(100);
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        register_request(peer(1), "A", "a@x.com", "secret1", "buyer").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();

    // no token
    let resp = test::call_service(
        &app,
        test::TestRequest::delete().uri("/api/users/profile").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // tampered token
    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/users/profile")
            .insert_header(("Authorization", format!("Bearer {}x", token)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/users/profile")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let bytes = test::read_body(resp).await;
    assert!(bytes.is_empty());

    // token still verifies but the account is gone
    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/users/profile")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User not found");

    let resp = test::call_service(&app, login_request(peer(1), "a@x.com", "secret1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_expired_token_rejected() {
    let state = create_test_state(100);
    let app = test_app!(state);

    let expired = AuthService::new(SECRET, chrono::Duration::seconds(-120), 4)
        .unwrap()
        .issue_token("whoever", Role::Seller)
        .unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/users/profile")
            .insert_header(("Authorization", format!("Bearer {}", expired)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_health_and_index() {
    let state = create_test_state(100);
    let app = test_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = test::read_body(resp).await;
    assert_eq!(bytes, "API is running...");
}
