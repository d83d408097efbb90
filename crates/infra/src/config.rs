//! Runtime configuration read from the environment (and `.env` when present).

use std::env;
use std::fmt::{self, Display};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            message: message.into(),
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    /// Storage-error detail is only ever shown in development.
    pub fn exposes_error_detail(self) -> bool {
        self == Environment::Development
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Per-client request allowance on the `/api` surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(900_000),
            max_requests: 100,
        }
    }
}

/// Origins allowed by CORS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl FromStr for CorsOrigins {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "*" {
            return Ok(CorsOrigins::Any);
        }
        let origins: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if origins.is_empty() {
            return Err("no origins given".to_string());
        }
        Ok(CorsOrigins::List(origins))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    /// Postgres URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub rate_limit: RateLimitConfig,
    pub cors_origins: CorsOrigins,
    pub static_dir: PathBuf,
    pub seed_on_startup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            environment: Environment::Development,
            database_url: None,
            rate_limit: RateLimitConfig::default(),
            cors_origins: CorsOrigins::List(vec!["http://localhost:3000".to_string()]),
            static_dir: PathBuf::from("client/build"),
            seed_on_startup: false,
        }
    }
}

impl Config {
    /// Load `.env` (if any), then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case outside local development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let window_ms: u64 = try_load(&get, "RATE_LIMIT_WINDOW_MS", "900000")?;
        let max_requests: u32 = try_load(&get, "RATE_LIMIT_MAX_REQUESTS", "100")?;
        if window_ms == 0 {
            return Err(ConfigError::invalid("RATE_LIMIT_WINDOW_MS", "must be greater than zero"));
        }
        if max_requests == 0 {
            return Err(ConfigError::invalid(
                "RATE_LIMIT_MAX_REQUESTS",
                "must be greater than zero",
            ));
        }

        Ok(Self {
            port: try_load(&get, "PORT", "5000")?,
            environment: try_load(&get, "APP_ENV", "development")?,
            database_url: get("DATABASE_URL").map(|v| v.trim().to_string()),
            rate_limit: RateLimitConfig {
                window: Duration::from_millis(window_ms),
                max_requests,
            },
            cors_origins: try_load(&get, "CORS_ORIGIN", "http://localhost:3000")?,
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("client/build")),
            seed_on_startup: get("SEED_ON_STARTUP")
                .map(|v| parse_bool("SEED_ON_STARTUP", &v))
                .transpose()?
                .unwrap_or(false),
        })
    }
}

fn try_load<T, F>(get: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = get(key).unwrap_or_else(|| {
        debug!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim()
        .parse()
        .map_err(|e| ConfigError::invalid(key, format!("{e}")))
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::invalid(key, format!("expected a boolean, got '{other}'"))),
    }
}
