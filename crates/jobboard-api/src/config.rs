//! API configuration.

use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use jobboard_db::DatabaseConfig;

/// Secret used outside production when `JWT_SECRET` is unset.
const DEV_JWT_SECRET: &str = "jobboard-dev-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),
}

/// Token signing settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime
    pub expires_in: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_JWT_SECRET.to_string(),
            expires_in: Duration::from_secs(168 * 3600),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Requests per second per client IP on `/api/auth/*`
    pub rate_limit_rps: u32,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            request_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024, // 1MB
            environment: "development".to_string(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            metrics_enabled: true,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl ApiConfig {
    /// Create config from environment variables.
    ///
    /// Fails only when a production deployment lacks `JWT_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| defaults.environment.clone());
        let is_production = environment.eq_ignore_ascii_case("production");

        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if is_production => return Err(ConfigError::Missing("JWT_SECRET")),
            _ => {
                warn!("JWT_SECRET not set, using an insecure development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        Ok(Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: env_parse("RATE_LIMIT_RPS").unwrap_or(defaults.rate_limit_rps),
            request_timeout: env_parse("REQUEST_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_body_size: env_parse("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            environment,
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: env_parse("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(defaults.database.max_connections),
                acquire_timeout: defaults.database.acquire_timeout,
                busy_timeout: defaults.database.busy_timeout,
            },
            jwt: JwtConfig {
                secret,
                expires_in: env_parse::<u64>("JWT_EXPIRES_IN_HOURS")
                    .and_then(token_lifetime)
                    .unwrap_or(defaults.jwt.expires_in),
            },
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
        })
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Token lifetime for `hours`, or `None` when it does not fit in seconds.
fn token_lifetime(hours: u64) -> Option<Duration> {
    hours.checked_mul(3600).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 5000);
        assert!(!config.is_production());
        assert_eq!(config.jwt.expires_in, Duration::from_secs(7 * 24 * 3600));
    }

    #[test]
    fn test_production_detection_is_case_insensitive() {
        let config = ApiConfig {
            environment: "Production".to_string(),
            ..Default::default()
        };
        assert!(config.is_production());
    }

    #[test]
    fn test_token_lifetime_overflow_is_rejected() {
        assert_eq!(token_lifetime(2), Some(Duration::from_secs(7200)));
        assert_eq!(token_lifetime(u64::MAX), None);
    }
}
