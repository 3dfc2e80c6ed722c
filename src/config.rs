use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

/// Database settings; without a URL the in-memory account store is used
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl: String,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_token_ttl() -> String { "7d".to_string() }
fn default_bcrypt_cost() -> u32 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_max_tracked_addresses")]
    pub max_tracked_addresses: u64,
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            max_tracked_addresses: default_max_tracked_addresses(),
            trust_forwarded_for: false,
        }
    }
}

fn default_max_requests() -> u32 { 10 }
fn default_window_secs() -> u64 { 15 * 60 }
fn default_max_tracked_addresses() -> u64 { 10_000 }

/// Allowed cross-origin sources; empty means any origin
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsSettings {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with DEALMATCH__)
    /// 5. Conventional variables: DATABASE_URL, JWT_SECRET, JWT_EXPIRES_IN, PORT,
    ///    CORS_ORIGINS, LOG_LEVEL, LOG_FORMAT
    ///
    /// Fails when no JWT secret is configured.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., DEALMATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        let settings: Settings = apply_env_overrides(settings, lookup)?.try_deserialize()?;

        if settings.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret is empty; set JWT_SECRET".to_string(),
            ));
        }

        Ok(settings)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("DEALMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the unprefixed variables the deployment environment sets
fn apply_env_overrides<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = lookup("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Some(secret) = lookup("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }
    if let Some(ttl) = lookup("JWT_EXPIRES_IN") {
        builder = builder.set_override("auth.token_ttl", ttl)?;
    }
    if let Some(port) = lookup("PORT") {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Message(format!("PORT must be a port number, got '{}'", port)))?;
        builder = builder.set_override("server.port", i64::from(port))?;
    }
    if let Some(origins) = lookup("CORS_ORIGINS") {
        let origins: Vec<String> = origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        builder = builder.set_override("cors.allowed_origins", origins)?;
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_config() -> Config {
        Config::builder()
            .set_override("auth.jwt_secret", "from-file")
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings: Settings = base_config().try_deserialize().unwrap();

        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.auth.token_ttl, "7d");
        assert_eq!(settings.rate_limit.max_requests, 10);
        assert_eq!(settings.rate_limit.window_secs, 900);
        assert!(settings.database.url.is_none());
        assert!(settings.cors.allowed_origins.is_empty());
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "json");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://localhost/dealmatch"),
            ("JWT_SECRET", "from-env"),
            ("JWT_EXPIRES_IN", "12h"),
            ("PORT", "5000"),
            ("CORS_ORIGINS", "http://localhost:3000, https://app.example.com"),
        ]
        .into_iter()
        .collect();

        let config = apply_env_overrides(base_config(), |k| env.get(k).map(|v| v.to_string())).unwrap();
        let settings: Settings = config.try_deserialize().unwrap();

        assert_eq!(settings.database.url.as_deref(), Some("postgres://localhost/dealmatch"));
        assert_eq!(settings.auth.jwt_secret, "from-env");
        assert_eq!(settings.auth.token_ttl, "12h");
        assert_eq!(settings.server.port, 5000);
        assert_eq!(
            settings.cors.allowed_origins,
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn test_bad_port_rejected() {
        let result = apply_env_overrides(base_config(), |k| {
            (k == "PORT").then(|| "eighty".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_load_without_jwt_secret_fails() {
        let result = Settings::load_with(|_| None);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("jwt_secret"), "unexpected error: {}", err);
    }

    #[test]
    fn test_load_with_jwt_secret() {
        let settings = Settings::load_with(|k| match k {
            "JWT_SECRET" => Some("from-env".to_string()),
            "LOG_FORMAT" => Some("pretty".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(settings.auth.jwt_secret, "from-env");
        assert_eq!(settings.auth.bcrypt_cost, 10);
        assert_eq!(settings.logging.format, "pretty");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_blank_jwt_secret_rejected() {
        let result = Settings::load_with(|k| (k == "JWT_SECRET").then(|| "   ".to_string()));
        assert!(result.is_err());
    }
}
