use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpServer};
use dealmatch::config::{LoggingSettings, Settings};
use dealmatch::error::handle_json_payload_error;
use dealmatch::routes::{self, AppState};
use dealmatch::services::{
    parse_token_lifetime, AccountStore, AuthService, InMemoryAccountStore, PostgresAccountStore,
    RateLimitConfig, RateLimiter,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&logging.level))
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Failed to load configuration: {}", e),
        )
    })?;

    init_logging(&settings.logging);

    info!("Starting DealMatch API...");
    info!("Configuration loaded successfully");

    let token_ttl = parse_token_lifetime(&settings.auth.token_ttl).map_err(|e| {
        error!("Invalid token lifetime: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let auth = AuthService::new(&settings.auth.jwt_secret, token_ttl, settings.auth.bcrypt_cost)
        .map_err(|e| {
            error!("Failed to initialize auth service: {}", e);
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
        })?;

    info!("Auth service initialized (token lifetime: {}s)", token_ttl.num_seconds());

    let accounts: Arc<dyn AccountStore> = match settings.database.url.as_deref() {
        Some(url) => {
            let db_max_conn = settings.database.max_connections.unwrap_or(10);
            let store = PostgresAccountStore::new(
                url,
                db_max_conn,
                settings.database.min_connections.unwrap_or(1),
                settings.database.acquire_timeout_secs.unwrap_or(5),
                settings.database.idle_timeout_secs.unwrap_or(600),
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;

            info!("PostgreSQL account store initialized (max: {} connections)", db_max_conn);
            Arc::new(store)
        }
        None => {
            warn!("No database URL configured, accounts are kept in memory and lost on restart");
            Arc::new(InMemoryAccountStore::new())
        }
    };

    let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: settings.rate_limit.max_requests,
        window: Duration::from_secs(settings.rate_limit.window_secs),
        max_tracked_addresses: settings.rate_limit.max_tracked_addresses,
    }));

    info!(
        "Rate limiter initialized ({} requests / {}s per address)",
        settings.rate_limit.max_requests, settings.rate_limit.window_secs
    );

    let app_state = AppState {
        accounts,
        auth,
        limiter,
        trust_forwarded_for: settings.rate_limit.trust_forwarded_for,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let allowed_origins = settings.cors.allowed_origins.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(build_cors(&allowed_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
