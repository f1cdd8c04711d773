use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    BCRYPT_COST, CORS_ALLOWED_ORIGINS, DATABASE_URL, DEFAULT_PORT, ENV, HOSPITAL_API_PORT,
    MAX_BODY_SIZE_BYTES, RATE_LIMIT_BURST, RATE_LIMIT_PER_MINUTE, REQUEST_TIMEOUT_SECS,
    SEED_ON_STARTUP, SHUTDOWN_TIMEOUT_SECS,
};

/// Parses `name` with `lookup`, falling back to `default` when the variable is
/// absent or unparsable.
fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(env_var = name, value = %raw, "ignoring unparsable configuration value");
            default
        }),
        None => default,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    pub rate_limit_per_minute: u32,
    pub rate_limit_burst: u32,
    pub request_timeout: Duration,
    pub max_body_size: usize,
    pub shutdown_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 100,
            rate_limit_burst: 150,
            request_timeout: Duration::from_secs(30),
            max_body_size: 1_048_576, // 1MB
            shutdown_timeout: Duration::from_secs(30),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl MiddlewareConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let rate_limit_per_minute: u32 =
            parse_or(&lookup, RATE_LIMIT_PER_MINUTE, default.rate_limit_per_minute);
        let rate_limit_burst: u32 = parse_or(&lookup, RATE_LIMIT_BURST, default.rate_limit_burst);
        let request_timeout_secs: u64 = parse_or(&lookup, REQUEST_TIMEOUT_SECS, 30);
        let max_body_size = parse_or(&lookup, MAX_BODY_SIZE_BYTES, default.max_body_size);
        let shutdown_timeout_secs: u64 = parse_or(&lookup, SHUTDOWN_TIMEOUT_SECS, 30);

        let cors_allowed_origins = lookup(CORS_ALLOWED_ORIGINS)
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(default.cors_allowed_origins);

        Self {
            // The governor needs a non-zero replenish rate.
            rate_limit_per_minute: rate_limit_per_minute.max(1),
            rate_limit_burst: rate_limit_burst.max(1),
            request_timeout: Duration::from_secs(request_timeout_secs),
            max_body_size,
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
            cors_allowed_origins,
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == "*")
    }

    /// Milliseconds between two replenished rate limit permits.
    pub fn replenish_interval_ms(&self) -> u64 {
        (60_000 / u64::from(self.rate_limit_per_minute)).max(1)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub port: u16,
    /// In-memory stores are used when unset.
    pub database_url: Option<String>,
    pub bcrypt_cost: u32,
    pub seed_on_startup: bool,
    pub middleware: MiddlewareConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = lookup(ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| format!("{ENV} environment variable must be set"))?;

        let database_url = lookup(DATABASE_URL).filter(|v| !v.trim().is_empty());

        Ok(Self {
            env,
            port: parse_or(&lookup, HOSPITAL_API_PORT, DEFAULT_PORT),
            database_url,
            bcrypt_cost: parse_or(&lookup, BCRYPT_COST, hospital_lib::password::DEFAULT_BCRYPT_COST),
            seed_on_startup: lookup(SEED_ON_STARTUP).is_some_and(|v| parse_flag(&v)),
            middleware: MiddlewareConfig::from_lookup(&lookup),
        })
    }
}
