//! Error types for the crate.
//!
//! Exchange fetch failures are classified as transient or fatal so the
//! detector can decide between retrying and cooling a symbol down. None of
//! them ever reach the presentation layer; they are absorbed into the cycle
//! report instead.

use std::time::Duration;

use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Whether a fetch failure is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorClass {
    /// Network trouble, timeouts, rate limits, server hiccups.
    Transient,
    /// Bad credentials or a symbol the exchange does not list.
    Fatal,
}

/// Failure to obtain a quote from an exchange.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("rate limited by exchange")]
    RateLimited,

    #[error("network error: {0}")]
    Network(String),

    #[error("server error: status {status}")]
    Server { status: u16 },

    #[error("request rejected: status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid quote: {0}")]
    InvalidQuote(#[from] DomainError),

    #[error("unsupported symbol: {0}")]
    UnsupportedSymbol(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl FetchError {
    /// Classify the failure.
    #[must_use]
    pub const fn class(&self) -> FetchErrorClass {
        match self {
            Self::UnsupportedSymbol(_) | Self::Unauthorized(_) => FetchErrorClass::Fatal,
            _ => FetchErrorClass::Transient,
        }
    }

    /// Returns true if the caller may retry with backoff.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.class(), FetchErrorClass::Transient)
    }

    /// Returns true if the symbol should be dropped for a cool-down period.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.class(), FetchErrorClass::Fatal)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(Duration::ZERO);
        }
        if err.is_decode() {
            return Self::Malformed(err.to_string());
        }
        match err.status() {
            Some(status) => Self::from_status(status.as_u16(), err.to_string()),
            None => Self::Network(err.to_string()),
        }
    }
}

impl FetchError {
    /// Map a non-success HTTP status to a fetch error.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(message.into()),
            418 | 429 => Self::RateLimited,
            500..=599 => Self::Server { status },
            _ => Self::Rejected {
                status,
                message: message.into(),
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("scoring unavailable: {0}")]
    Scoring(String),

    #[error("explanation unavailable: {0}")]
    Explain(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
