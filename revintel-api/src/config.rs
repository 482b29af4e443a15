/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct. A `.env` file is read first when present.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `PUBLIC_BASE_URL`: Base of onboarding links (default: https://app.revintel.io)
/// - `JWT_SECRET`: Secret key for JWT signing, at least 32 characters (required)
/// - `JWT_EXPIRATION_HOURS`: Token lifetime (default: 24)
/// - `INSIGHT_DELAY_MS`: Delay before an insight job runs (default: 2000)
/// - `INSIGHT_ETA_SECONDS`: Completion estimate returned to callers (default: 5)
/// - `SEED_DEMO_DATA`: Seeds a demo tenant at startup (default: false)
/// - `LOG_FORMAT`: `json` for JSON logs, anything else for text (default: text)
///
/// # Example
///
/// ```no_run
/// use revintel_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Minimum accepted JWT secret length
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Insight worker configuration
    pub insights: InsightConfig,

    /// Seed demo data on startup
    pub seed_demo_data: bool,

    /// Emit JSON logs
    pub json_logs: bool,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` allows any)
    pub cors_origins: Vec<String>,

    /// Production mode (adds HSTS)
    pub production: bool,

    /// Public URL of the web app, without trailing slash
    pub public_base_url: String,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be kept secret and be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    #[serde(skip_serializing)]
    pub secret: String,

    /// Token lifetime in hours
    pub expiration_hours: i64,
}

/// Insight generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Delay before a queued job runs
    pub delay_ms: u64,

    /// Completion estimate reported on enqueue
    pub eta_seconds: u64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is missing or shorter than 32 characters
    /// - A numeric or boolean variable cannot be parsed
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LENGTH);
        }

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "https://app.revintel.io".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api: ApiConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("API_PORT", 8080)?,
                cors_origins,
                production: parse_var("PRODUCTION", false)?,
                public_base_url,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_hours: parse_var("JWT_EXPIRATION_HOURS", 24)?,
            },
            insights: InsightConfig {
                delay_ms: parse_var("INSIGHT_DELAY_MS", 2000)?,
                eta_seconds: parse_var("INSIGHT_ETA_SECONDS", 5)?,
            },
            seed_demo_data: parse_var("SEED_DEMO_DATA", false)?,
            json_logs: env::var("LOG_FORMAT")
                .map(|format| format.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// Configuration for tests and local tooling
    pub fn for_testing(jwt_secret: &str) -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
                public_base_url: "https://app.revintel.io".to_string(),
            },
            jwt: JwtConfig {
                secret: jwt_secret.to_string(),
                expiration_hours: 24,
            },
            insights: InsightConfig {
                delay_ms: 2000,
                eta_seconds: 5,
            },
            seed_demo_data: false,
            json_logs: false,
        }
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}
