// Query descriptor model and per-query responses
//
// One inbound "run queries" request carries a list of descriptors, each
// keyed by a caller-supplied reference id. Each descriptor resolves to
// either frames or an error; failures are isolated per descriptor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Requested time range, unix seconds.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TimeRange {
    pub from: i64,
    pub to: i64,
}

/// One query descriptor from the host.
///
/// The four identifying fields mirror the query editor's cascading
/// dropdowns; validation of blanks happens downstream in `wems-api`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataQuery {
    #[serde(default)]
    pub ref_id: String,
    #[serde(default)]
    pub endpoint_id: String,
    #[serde(default)]
    pub appliance_id: String,
    #[serde(default)]
    pub service_uri: String,
    #[serde(default)]
    pub data_point: String,
    #[serde(default)]
    pub aggregate_function: Option<String>,
    #[serde(default)]
    pub create_empty_values: Option<bool>,
    #[serde(default)]
    pub time_range: TimeRange,
    #[serde(default)]
    pub max_data_points: i64,
    #[serde(default)]
    pub interval_ms: i64,
}

/// A batch of query descriptors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    pub queries: Vec<DataQuery>,
}

/// Host-facing status for a failed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseStatus {
    BadRequest,
    Internal,
}

/// Error attached to one query's response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseError {
    pub status: ResponseStatus,
    pub message: String,
}

/// Result for one query descriptor: frames on success, an error
/// otherwise.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Frame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl DataResponse {
    pub fn ok(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            error: None,
        }
    }

    pub fn error(status: ResponseStatus, message: impl Into<String>) -> Self {
        Self {
            frames: Vec::new(),
            error: Some(ResponseError {
                status,
                message: message.into(),
            }),
        }
    }
}

/// Responses keyed by the caller-supplied reference id.
#[derive(Debug, Default, Serialize)]
pub struct QueryDataResponse {
    pub responses: BTreeMap<String, DataResponse>,
}
