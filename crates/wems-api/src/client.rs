// WEMS API HTTP client
//
// Wraps `reqwest::Client` with WEMS-specific URL construction and
// bearer-token injection. The series and resource endpoints are
// implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use std::time::Duration;

use reqwest::header::ACCEPT;
use secrecy::SecretString;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::token::TokenManager;
use crate::transport::TransportConfig;

/// Async client for the WEMS cloud API.
///
/// Holds the shared HTTP client and the token manager for one set of
/// credentials. All request-scoped state lives in the individual calls.
pub struct WemsClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: TokenManager,
}

impl WemsClient {
    /// Build a client for the given base URL and credentials.
    ///
    /// The `base_url` should be the API root without a trailing slash
    /// (e.g. `https://c1.api.wago.com/wems`); settings loading takes
    /// care of normalization.
    pub fn new(
        base_url: Url,
        client_id: String,
        client_secret: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let tokens = TokenManager::new(base_url.clone(), client_id, client_secret, transport)?;
        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The token manager (for health checks that only need a token).
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Build a full URL for an API path relative to the base URL.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(Error::InvalidUrl)
    }

    /// Send a bearer-authorized GET with the given per-request timeout.
    ///
    /// Obtains a valid token first; token failures propagate as
    /// [`Error::Authentication`]. The response is returned unread so
    /// callers decide between parsing and verbatim passthrough.
    pub(crate) async fn authorized_get(
        &self,
        url: Url,
        timeout: Duration,
    ) -> Result<reqwest::Response, Error> {
        let token = self.tokens.ensure_valid_token().await?;
        debug!("GET {url}");

        self.http
            .get(url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(Error::Transport)
    }
}
