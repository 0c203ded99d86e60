//! Runtime configuration read from environment variables.

use crate::payment::domain::PaymentAmount;
use crate::telemetry::LogFormat;
use camino::Utf8PathBuf;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;
const DEFAULT_RESUME_DIR: &str = "uploads/resumes";
const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_GATEWAY_TIMEOUT_MS: u64 = 10_000;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable holds an unusable value.
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Server configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum pooled connections.
    pub database_pool_size: u32,
    /// HMAC secret for bearer tokens.
    pub jwt_secret: String,
    /// Lifetime of issued tokens, in seconds.
    pub token_ttl_secs: i64,
    /// Directory receiving uploaded resumes.
    pub resume_dir: Utf8PathBuf,
    /// Largest accepted resume upload.
    pub max_resume_bytes: usize,
    /// Bound on each payment gateway call.
    pub gateway_timeout: Duration,
    /// Fee charged per application.
    pub application_fee: PaymentAmount,
    /// Log output format.
    pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &"<redacted>")
            .field("database_pool_size", &self.database_pool_size)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("resume_dir", &self.resume_dir)
            .field("max_resume_bytes", &self.max_resume_bytes)
            .field("gateway_timeout", &self.gateway_timeout)
            .field("application_fee", &self.application_fee)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let fee_units: u32 = parse_or(
            &read,
            "APPLICATION_FEE",
            PaymentAmount::APPLICATION_FEE.units(),
        )?;
        let application_fee = PaymentAmount::new(fee_units).map_err(|err| ConfigError::Invalid {
            key: "APPLICATION_FEE",
            value: fee_units.to_string(),
            reason: err.to_string(),
        })?;

        let log_format = match read("LOG_FORMAT") {
            Some(value) => LogFormat::try_from(value.as_str()).map_err(|err| {
                ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value,
                    reason: err.to_string(),
                }
            })?,
            None => LogFormat::default(),
        };

        let token_ttl_secs = parse_or(&read, "TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_SECS",
                value: token_ttl_secs.to_string(),
                reason: "must be positive".to_owned(),
            });
        }

        Ok(Self {
            host: read("HIREME_HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: parse_or(&read, "HIREME_PORT", DEFAULT_PORT)?,
            database_url: read("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            database_pool_size: parse_or(&read, "DATABASE_POOL_SIZE", DEFAULT_POOL_SIZE)?,
            jwt_secret: read("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            token_ttl_secs,
            resume_dir: read("RESUME_DIR")
                .map_or_else(|| Utf8PathBuf::from(DEFAULT_RESUME_DIR), Utf8PathBuf::from),
            max_resume_bytes: parse_or(&read, "MAX_RESUME_BYTES", DEFAULT_MAX_RESUME_BYTES)?,
            gateway_timeout: Duration::from_millis(parse_or(
                &read,
                "GATEWAY_TIMEOUT_MS",
                DEFAULT_GATEWAY_TIMEOUT_MS,
            )?),
            application_fee,
            log_format,
        })
    }

    /// Returns the `host:port` bind address.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(
    read: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    read(key).map_or(Ok(default), |value| {
        value.parse().map_err(|err: T::Err| ConfigError::Invalid {
            key,
            reason: err.to_string(),
            value,
        })
    })
}
