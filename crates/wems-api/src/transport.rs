// Shared transport configuration for building reqwest::Client instances.
//
// The token manager and the API client share timeout settings through
// this module. Individual call sites layer tighter per-request timeouts
// on top of the shared client.

use std::time::Duration;

use crate::error::Error;

/// Timeout for token endpoint calls.
pub const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for primary list and series calls.
pub const LIST_TIMEOUT: Duration = Duration::from_secs(20);

/// Timeout for secondary appliance-model lookups.
pub const MODEL_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: LIST_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("wems-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)
    }
}
