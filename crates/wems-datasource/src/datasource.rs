// Datasource adapter
//
// The three operations the host calls: run queries, list resources,
// check health. Maps `wems_api::Error` values onto host-facing status
// codes; upstream non-200s on the resource paths are forwarded
// verbatim so the UI can show the upstream's own error text.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};
use wems_api::{Error, RawResponse, SeriesQuery, TransportConfig, WemsClient};

use crate::frame::Frame;
use crate::query::{DataQuery, DataResponse, QueryDataResponse, QueryRequest, ResponseStatus};
use crate::settings::DatasourceSettings;

/// Response to one resource-list call: a status code plus body, either
/// locally produced or forwarded verbatim from upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Health check outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Health check result reported to the host.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResult {
    pub status: HealthStatus,
    pub message: String,
}

/// One datasource instance: one set of credentials, one cached token.
pub struct Datasource {
    client: WemsClient,
}

impl Datasource {
    /// Build a datasource from loaded settings.
    pub fn new(settings: DatasourceSettings) -> Result<Self, Error> {
        let client = WemsClient::new(
            settings.base_url,
            settings.client_id,
            settings.client_secret,
            &TransportConfig::default(),
        )?;
        Ok(Self { client })
    }

    /// The underlying API client.
    pub fn client(&self) -> &WemsClient {
        &self.client
    }

    /// Run a batch of queries, producing one result-or-error per
    /// descriptor keyed by its reference id. A failing query never
    /// affects its siblings.
    pub async fn query_data(&self, request: QueryRequest) -> QueryDataResponse {
        let mut responses = BTreeMap::new();
        for query in request.queries {
            let ref_id = query.ref_id.clone();
            responses.insert(ref_id, self.run_query(query).await);
        }
        QueryDataResponse { responses }
    }

    async fn run_query(&self, query: DataQuery) -> DataResponse {
        let series_query = SeriesQuery {
            endpoint_id: query.endpoint_id,
            appliance_id: query.appliance_id,
            service_uri: query.service_uri,
            data_point: query.data_point,
            aggregate_function: query.aggregate_function.filter(|f| !f.is_empty()),
            create_empty_values: query.create_empty_values,
            from: query.time_range.from,
            to: query.time_range.to,
            max_data_points: query.max_data_points,
            interval: Duration::from_millis(u64::try_from(query.interval_ms).unwrap_or(0)),
        };

        match self.client.get_series(&series_query).await {
            Ok(series) => DataResponse::ok(vec![Frame::from_series(series)]),
            Err(e @ Error::Validation { .. }) => {
                DataResponse::error(ResponseStatus::BadRequest, e.to_string())
            }
            Err(e @ Error::Authentication { .. }) => {
                warn!("query blocked by token failure: {e}");
                DataResponse::error(ResponseStatus::Internal, format!("Token error: {e}"))
            }
            Err(e) => {
                warn!("query failed: {e}");
                DataResponse::error(ResponseStatus::Internal, e.to_string())
            }
        }
    }

    /// Serve one resource-list call for the cascading dropdown editors.
    ///
    /// Known paths: `endpoint-list`, `appliance-list`, `service-list`,
    /// `datapoint-list`. Unknown paths get 404. Upstream non-200s keep
    /// their original status code and body.
    pub async fn call_resource(
        &self,
        path: &str,
        params: &HashMap<String, String>,
    ) -> ResourceResponse {
        debug!(path, "resource call");

        let result = match path {
            "endpoint-list" => self.client.list_endpoints().await.map(forward_raw),
            "appliance-list" => {
                let endpoint_id = str_param(params, "endpointId");
                self.client
                    .list_appliances(endpoint_id)
                    .await
                    .map(|nodes| json_response(&nodes))
            }
            "service-list" => {
                let endpoint_id = str_param(params, "endpointId");
                let appliance_id = str_param(params, "applianceId");
                self.client
                    .list_services(endpoint_id, appliance_id)
                    .await
                    .map(|nodes| json_response(&nodes))
            }
            "datapoint-list" => {
                let endpoint_id = str_param(params, "endpointId");
                let appliance_id = str_param(params, "applianceId");
                let service_uri = str_param(params, "serviceUri");
                self.client
                    .list_data_points(endpoint_id, appliance_id, service_uri)
                    .await
                    .map(forward_raw)
            }
            _ => {
                return ResourceResponse {
                    status: 404,
                    body: Bytes::from_static(b"Not found"),
                };
            }
        };

        match result {
            Ok(resp) => resp,
            Err(e @ Error::Validation { .. }) => ResourceResponse {
                status: 400,
                body: Bytes::from(e.to_string()),
            },
            Err(e @ Error::Authentication { .. }) => ResourceResponse {
                status: 500,
                body: Bytes::from(format!("Token error: {e}")),
            },
            Err(Error::Api { status, body }) => ResourceResponse {
                status,
                body: Bytes::from(body),
            },
            Err(e) => ResourceResponse {
                status: 500,
                body: Bytes::from(e.to_string()),
            },
        }
    }

    /// Report reachability by attempting token acquisition.
    pub async fn check_health(&self) -> HealthResult {
        match self.client.tokens().ensure_valid_token().await {
            Ok(_) => HealthResult {
                status: HealthStatus::Ok,
                message: "Data source is working".to_owned(),
            },
            Err(e) => HealthResult {
                status: HealthStatus::Error,
                message: format!("Token error: {e}"),
            },
        }
    }
}

fn str_param<'a>(params: &'a HashMap<String, String>, name: &str) -> &'a str {
    params.get(name).map_or("", String::as_str)
}

fn forward_raw(raw: RawResponse) -> ResourceResponse {
    ResourceResponse {
        status: raw.status,
        body: raw.body,
    }
}

fn json_response<T: Serialize>(items: &T) -> ResourceResponse {
    match serde_json::to_vec(items) {
        Ok(body) => ResourceResponse {
            status: 200,
            body: Bytes::from(body),
        },
        Err(e) => ResourceResponse {
            status: 500,
            body: Bytes::from(format!("failed to encode resource list: {e}")),
        },
    }
}
