//! Structured logging setup.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt as fmt_layer, prelude::*};

const DEFAULT_FILTER: &str = "hireme=info,tower_http=info";

/// Output format for log records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable, coloured output.
    #[default]
    Pretty,
    /// One JSON object per record.
    Json,
}

/// Error returned while parsing a log format name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown log format: {0} (expected pretty or json)")]
pub struct ParseLogFormatError(pub String);

impl LogFormat {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LogFormat {
    type Error = ParseLogFormatError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ParseLogFormatError(value.to_owned())),
        }
    }
}

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to info-level output for
/// this crate and the HTTP trace layer. Calling this twice is harmless; the
/// second installation is ignored.
pub fn init(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Json => registry
            .with(fmt_layer::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt_layer::layer().with_target(true))
            .try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
