use thiserror::Error;

/// Top-level error type for the `wems-api` crate.
///
/// Covers every failure mode across the client: parameter validation,
/// token acquisition, transport, and upstream API responses.
/// `wems-datasource` maps these into host-facing status codes.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or blank required parameters. Raised before any network
    /// call is made.
    #[error("Invalid request: {message}")]
    Validation { message: String },

    /// Token endpoint unreachable or returned non-200. Blocks all
    /// dependent operations.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Non-200 from a data or list endpoint this crate must parse.
    /// Carries the upstream status and body verbatim so the caller can
    /// surface the upstream's own error text.
    #[error("WEMS API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error came from token acquisition.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The upstream HTTP status, if this error preserves one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Validation error naming the missing parameter(s).
    pub(crate) fn missing_params(fields: &[&str]) -> Self {
        Self::Validation {
            message: format!("missing required parameter(s): {}", fields.join(", ")),
        }
    }
}
