// WEMS API wire types
//
// Models for the WEMS cloud JSON API. Fields use `#[serde(default)]`
// liberally because the API is inconsistent about field presence.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

// ── Token endpoint ───────────────────────────────────────────────────

/// Payload for `POST /v1/token`.
///
/// Only the fields required for a super token are populated; the
/// mappings and scope list are always empty.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub application_components: HashMap<String, Vec<String>>,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub endpoints: HashMap<String, Vec<String>>,
    pub platform_scopes: Vec<String>,
    pub super_token: bool,
}

impl<'a> TokenRequest<'a> {
    /// Build the fixed super-token request for the given credentials.
    pub fn super_token(client_id: &'a str, client_secret: &'a str) -> Self {
        Self {
            application_components: HashMap::new(),
            client_id,
            client_secret,
            endpoints: HashMap::new(),
            platform_scopes: Vec::new(),
            super_token: true,
        }
    }
}

// ── Time series ──────────────────────────────────────────────────────

/// One `{time, value}` pair from the series endpoint.
#[derive(Debug, Deserialize)]
pub struct TimeSeriesPoint {
    pub time: i64,
    #[serde(default)]
    pub value: SampleValue,
}

/// A dynamically-typed upstream sample value, resolved once at the
/// parsing boundary.
///
/// The coercion table is deliberately lossy for compatibility with the
/// dashboard's established behavior: unparseable strings and unknown
/// shapes become `0.0`, never an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Other(serde_json::Value),
}

impl Default for SampleValue {
    fn default() -> Self {
        Self::Other(serde_json::Value::Null)
    }
}

impl SampleValue {
    /// Coerce to a numeric sample: numbers pass through (integers are
    /// widened by serde), booleans map to 1.0/0.0, strings are parsed
    /// with a 0.0 fallback, anything else is 0.0.
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Bool(true) => 1.0,
            Self::Bool(false) => 0.0,
            Self::Text(s) => s.parse().unwrap_or(0.0),
            Self::Other(_) => 0.0,
        }
    }
}

// ── Endpoint description ─────────────────────────────────────────────

/// Nested description from `GET /v1/endpoint/{id}/description`.
#[derive(Debug, Deserialize)]
pub struct EndpointDescription {
    #[serde(default)]
    pub processes: Vec<Process>,
}

/// A process grouping appliances within an endpoint.
#[derive(Debug, Deserialize)]
pub struct Process {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub appliances: Vec<Appliance>,
}

/// An appliance entry inside a process.
#[derive(Debug, Clone, Deserialize)]
pub struct Appliance {
    pub id: String,
    #[serde(default, rename = "friendlyName")]
    pub friendly_name: String,
    /// Internal model-reference number; 0/unset means no model lookup.
    #[serde(default, rename = "applianceReference")]
    pub appliance_reference: i64,
}

/// Model info from `GET /v1/component/appliance/{ref}`.
#[derive(Debug, Deserialize)]
pub struct ApplianceModel {
    #[serde(default, rename = "friendlyName")]
    pub friendly_name: String,
}

// ── Resource list output ─────────────────────────────────────────────

/// Generic `{id, label}` pair served to cascading dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: String,
    pub label: String,
}

/// A service entry: the key of the values mapping, labeled by itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceNode {
    pub uri: String,
    pub label: String,
}

/// A verbatim upstream response: status code plus raw body bytes.
///
/// Used by the passthrough list endpoints where this crate does not
/// transform the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}
