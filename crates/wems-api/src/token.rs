// Bearer-token lifecycle management
//
// The WEMS token endpoint returns the bearer token as the raw response
// body (not JSON). Exactly one token is live per datasource instance;
// a tokio Mutex serializes the check-then-refresh critical section so
// concurrent callers never issue duplicate token requests.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::TokenRequest;
use crate::transport::{TOKEN_TIMEOUT, TransportConfig};

/// Assumed validity of a freshly issued token. WEMS tokens are valid
/// for 20 minutes.
pub const TOKEN_VALIDITY: Duration = Duration::from_secs(20 * 60);

/// A token within this margin of expiry is treated as expired and
/// refreshed before being handed out.
pub const SAFETY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Default)]
struct TokenState {
    token: String,
    expires_at: Option<Instant>,
}

/// Owns the cached bearer token and its expiry for one set of
/// credentials.
pub struct TokenManager {
    http: reqwest::Client,
    base_url: Url,
    client_id: String,
    client_secret: SecretString,
    state: Mutex<TokenState>,
}

impl TokenManager {
    /// Create a manager for the given credentials. No token is fetched
    /// until the first [`ensure_valid_token`](Self::ensure_valid_token).
    pub fn new(
        base_url: Url,
        client_id: String,
        client_secret: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            client_id,
            client_secret,
            state: Mutex::new(TokenState::default()),
        })
    }

    /// Return a bearer token valid for at least [`SAFETY_MARGIN`].
    ///
    /// The common path returns the cached token without any network
    /// call. On expiry (or cold start) the token is refreshed under the
    /// lock; a failed refresh leaves the cached state untouched and
    /// surfaces [`Error::Authentication`]. No retries.
    pub async fn ensure_valid_token(&self) -> Result<String, Error> {
        let mut state = self.state.lock().await;

        if let Some(expires_at) = state.expires_at {
            if !state.token.is_empty() && Instant::now() + SAFETY_MARGIN < expires_at {
                return Ok(state.token.clone());
            }
        }

        let url = self.token_url()?;
        debug!("refreshing WEMS token at {url}");

        let payload =
            TokenRequest::super_token(&self.client_id, self.client_secret.expose_secret());
        let resp = self
            .http
            .post(url)
            .json(&payload)
            .timeout(TOKEN_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::Authentication {
                message: format!("token request failed: {e}"),
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("token request failed (HTTP {status}): {body}"),
            });
        }

        // The response body, verbatim, IS the bearer token.
        let token = resp.text().await.map_err(|e| Error::Authentication {
            message: format!("failed to read token response: {e}"),
        })?;

        state.token = token.clone();
        state.expires_at = Some(Instant::now() + TOKEN_VALIDITY);
        debug!("WEMS token refreshed");

        Ok(token)
    }

    fn token_url(&self) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/v1/token")).map_err(Error::InvalidUrl)
    }
}
