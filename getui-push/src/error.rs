//! GeTui client error types.

use thiserror::Error;

use crate::ResultCode;

/// Result type for GeTui operations.
pub type Result<T> = std::result::Result<T, PushError>;

/// GeTui client errors.
///
/// Transport and decode failures surface here. A provider answer that
/// decoded fine but carries a non-`ok` result code is *not* an error unless
/// the caller opts in through [`ApiResponse::ok_or_rejected`](crate::ApiResponse::ok_or_rejected).
#[derive(Debug, Error)]
pub enum PushError {
    /// `auth_sign` answered with a non-`ok` result.
    #[error("Authentication failed: {code}")]
    Auth {
        /// Result code returned by the provider.
        code: ResultCode,
        /// Optional description.
        desc: Option<String>,
    },

    /// The provider rejected a request with an application-level code.
    #[error("Request rejected by provider: {code}{}", describe(.desc))]
    Rejected {
        /// Result code returned by the provider.
        code: ResultCode,
        /// Optional description.
        desc: Option<String>,
    },

    /// Non-success HTTP status with a body that is not a provider result.
    #[error("HTTP error {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout error.
    #[error("Operation timed out")]
    Timeout,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Caller input rejected before anything was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other HTTP client failure.
    #[error("Provider error: {0}")]
    Provider(String),
}

fn describe(desc: &Option<String>) -> String {
    desc.as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!(" ({})", d))
        .unwrap_or_default()
}

impl PushError {
    /// Check if this error came from authentication.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Provider result code carried by this error, if any.
    pub fn result_code(&self) -> Option<&ResultCode> {
        match self {
            Self::Auth { code, .. } | Self::Rejected { code, .. } => Some(code),
            _ => None,
        }
    }

    /// HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PushError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Network(err.to_string())
        } else if err.is_decode() {
            Self::Serialization(err.to_string())
        } else {
            Self::Provider(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PushError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for PushError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("Invalid URL: {}", err))
    }
}
