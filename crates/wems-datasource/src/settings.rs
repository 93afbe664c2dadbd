// Datasource settings
//
// The host delivers settings as a JSON blob plus a separately-decrypted
// secure map. The client secret is taken from the secure map when
// present; the base URL falls back to the production WEMS cloud and is
// normalized to have no trailing slash.

use std::collections::HashMap;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Production WEMS API root, used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://c1.api.wago.com/wems";

/// Settings-loading failures.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not parse datasource settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    client_secret: String,
    #[serde(default)]
    base_url: String,
}

/// Parsed, normalized datasource configuration. Immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct DatasourceSettings {
    pub client_id: String,
    pub client_secret: SecretString,
    pub base_url: Url,
}

impl DatasourceSettings {
    /// Load settings from the host's JSON blob and decrypted secure map.
    ///
    /// `secure_data["client_secret"]`, when present, overrides any
    /// secret in the plain blob.
    pub fn load(
        json_data: &[u8],
        secure_data: &HashMap<String, String>,
    ) -> Result<Self, SettingsError> {
        let mut raw: RawSettings = serde_json::from_slice(json_data)?;

        if let Some(secret) = secure_data.get("client_secret") {
            raw.client_secret.clone_from(secret);
        }

        let base = if raw.base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            raw.base_url.trim_end_matches('/')
        };
        let base_url = Url::parse(base).map_err(|e| SettingsError::InvalidBaseUrl {
            url: base.to_owned(),
            source: e,
        })?;

        Ok(Self {
            client_id: raw.client_id,
            client_secret: raw.client_secret.into(),
            base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_base_url_when_blank() {
        let settings =
            DatasourceSettings::load(br#"{"client_id":"cid"}"#, &HashMap::new()).unwrap();
        assert_eq!(settings.base_url.as_str(), "https://c1.api.wago.com/wems");
        assert_eq!(settings.client_id, "cid");
    }

    #[test]
    fn strips_trailing_slash() {
        let settings = DatasourceSettings::load(
            br#"{"client_id":"cid","base_url":"https://example.com/wems/"}"#,
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(settings.base_url.as_str(), "https://example.com/wems");
    }

    #[test]
    fn secure_secret_overrides_plain() {
        let secure = HashMap::from([("client_secret".to_owned(), "from-secure".to_owned())]);
        let settings = DatasourceSettings::load(
            br#"{"client_id":"cid","client_secret":"from-plain"}"#,
            &secure,
        )
        .unwrap();
        assert_eq!(settings.client_secret.expose_secret(), "from-secure");
    }

    #[test]
    fn plain_secret_kept_without_secure_entry() {
        let settings = DatasourceSettings::load(
            br#"{"client_id":"cid","client_secret":"from-plain"}"#,
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(settings.client_secret.expose_secret(), "from-plain");
    }

    #[test]
    fn rejects_malformed_blob() {
        let result = DatasourceSettings::load(b"not json", &HashMap::new());
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = DatasourceSettings::load(
            br#"{"client_id":"cid","base_url":"::not a url::"}"#,
            &HashMap::new(),
        );
        assert!(matches!(result, Err(SettingsError::InvalidBaseUrl { .. })));
    }
}
