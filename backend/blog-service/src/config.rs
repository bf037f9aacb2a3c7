/// Configuration management for blog-service
///
/// This module handles loading and managing configuration from environment
/// variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Identity token validation settings
    pub auth: AuthConfig,
    /// Feed composition settings
    pub feed: FeedConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Identity token validation settings
///
/// Tokens are issued by the external identity provider; this service only
/// validates them. `login_url` is where unauthenticated mutation attempts are
/// redirected, with a `next` parameter pointing back at the original path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub login_url: String,
}

/// Feed composition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Number of posts per feed page
    pub page_size: i64,
}

const DEFAULT_JWT_SECRET: &str = "dev-secret";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("BLOG_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("BLOG_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/quill".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            auth: {
                let jwt_secret = std::env::var("JWT_SECRET")
                    .unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());
                if app_env.eq_ignore_ascii_case("production")
                    && (jwt_secret.trim().is_empty() || jwt_secret == DEFAULT_JWT_SECRET)
                {
                    return Err(
                        "JWT_SECRET must be set to a non-default value in production".to_string()
                    );
                }

                AuthConfig {
                    jwt_secret,
                    login_url: std::env::var("AUTH_LOGIN_URL")
                        .unwrap_or_else(|_| "/auth/login/".to_string()),
                }
            },
            feed: FeedConfig {
                page_size: std::env::var("FEED_PAGE_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            },
        })
    }
}
