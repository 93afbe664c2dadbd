// Resource discovery endpoints
//
// The four list operations behind the dashboard's cascading dropdowns:
// endpoints, appliances (with concurrent per-appliance model
// enrichment), services, and data points. Passthrough endpoints return
// the upstream status and bytes verbatim; parsed endpoints surface
// non-200 responses as `Error::Api` so the adapter can forward the
// upstream's own status and text.

use futures_util::future::join_all;
use reqwest::StatusCode;
use tracing::debug;

use crate::client::WemsClient;
use crate::error::Error;
use crate::models::{
    Appliance, ApplianceModel, EndpointDescription, RawResponse, ResourceNode, ServiceNode,
};
use crate::transport::{LIST_TIMEOUT, MODEL_TIMEOUT};

impl WemsClient {
    /// List all endpoints: `GET /v1/endpoint/`.
    ///
    /// The upstream body is passed through unchanged, status and bytes.
    pub async fn list_endpoints(&self) -> Result<RawResponse, Error> {
        let url = self.api_url("v1/endpoint/")?;
        let resp = self.authorized_get(url, LIST_TIMEOUT).await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(Error::Transport)?;
        Ok(RawResponse { status, body })
    }

    /// List the appliances of one endpoint, flattened across processes
    /// and decorated with derived labels.
    ///
    /// Label rules: friendly name, or the appliance id if blank; if the
    /// owning process has a name, ` (processName)` is appended; if the
    /// appliance carries a non-zero model reference, a concurrent model
    /// lookup may append ` [modelName]`. Model lookup failures degrade
    /// gracefully to the unenriched label.
    ///
    /// All enrichment lookups run concurrently inside this request
    /// future, so caller cancellation reaches every secondary call. The
    /// result is returned only once every lookup has completed.
    pub async fn list_appliances(&self, endpoint_id: &str) -> Result<Vec<ResourceNode>, Error> {
        if endpoint_id.is_empty() {
            return Err(Error::missing_params(&["endpointId"]));
        }

        let url = self.api_url(&format!(
            "v1/endpoint/{endpoint_id}/description\
             ?includeApplianceConfiguration=false&draft=false"
        ))?;
        let resp = self.authorized_get(url, LIST_TIMEOUT).await?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        if status != StatusCode::OK {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let description: EndpointDescription = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("failed to parse appliances: {e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        let mut futures = Vec::new();
        for process in &description.processes {
            for appliance in &process.appliances {
                futures.push(self.appliance_node(appliance.clone(), process.name.clone()));
            }
        }
        debug!(appliances = futures.len(), "enriching appliance list");

        Ok(join_all(futures).await)
    }

    /// Build one labeled appliance node, enriching with the model name
    /// when a reference is set.
    async fn appliance_node(&self, appliance: Appliance, process_name: String) -> ResourceNode {
        let mut label = if appliance.friendly_name.is_empty() {
            appliance.id.clone()
        } else {
            appliance.friendly_name.clone()
        };
        if !process_name.is_empty() {
            label = format!("{label} ({process_name})");
        }
        if appliance.appliance_reference != 0 {
            if let Some(model) = self.lookup_model(appliance.appliance_reference).await {
                label = format!("{label} [{model}]");
            }
        }
        ResourceNode {
            id: appliance.id,
            label,
        }
    }

    /// Fetch an appliance model's friendly name.
    ///
    /// Any failure (transport, non-200, parse, empty name) yields
    /// `None`; the appliance is still listed without the suffix.
    async fn lookup_model(&self, reference: i64) -> Option<String> {
        let url = self
            .api_url(&format!("v1/component/appliance/{reference}"))
            .ok()?;
        let resp = match self.authorized_get(url, MODEL_TIMEOUT).await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(reference, "appliance model lookup failed: {e}");
                return None;
            }
        };
        if resp.status() != StatusCode::OK {
            debug!(reference, status = %resp.status(), "appliance model lookup returned non-200");
            return None;
        }
        let model: ApplianceModel = resp.json().await.ok()?;
        (!model.friendly_name.is_empty()).then_some(model.friendly_name)
    }

    /// List the services of one appliance:
    /// `GET /v1/endpoint/{endpointId}/values/{applianceId}`.
    ///
    /// Each key of the returned mapping becomes a `{uri, label}` node;
    /// iteration order is unspecified.
    pub async fn list_services(
        &self,
        endpoint_id: &str,
        appliance_id: &str,
    ) -> Result<Vec<ServiceNode>, Error> {
        let mut missing = Vec::new();
        if endpoint_id.is_empty() {
            missing.push("endpointId");
        }
        if appliance_id.is_empty() {
            missing.push("applianceId");
        }
        if !missing.is_empty() {
            return Err(Error::missing_params(&missing));
        }

        let url = self.api_url(&format!("v1/endpoint/{endpoint_id}/values/{appliance_id}"))?;
        let resp = self.authorized_get(url, LIST_TIMEOUT).await?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        if status != StatusCode::OK {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&body)
            .map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!(
                        "failed to parse service list: {e} (body preview: {preview:?})"
                    ),
                    body: body.clone(),
                }
            })?;

        Ok(raw
            .into_iter()
            .map(|(uri, _)| ServiceNode {
                label: uri.clone(),
                uri,
            })
            .collect())
    }

    /// List the data points of one service:
    /// `GET /v1/endpoint/{endpointId}/values/{applianceId}/{serviceUri}`.
    ///
    /// The upstream body is passed through unchanged, status and bytes.
    pub async fn list_data_points(
        &self,
        endpoint_id: &str,
        appliance_id: &str,
        service_uri: &str,
    ) -> Result<RawResponse, Error> {
        let mut missing = Vec::new();
        if endpoint_id.is_empty() {
            missing.push("endpointId");
        }
        if appliance_id.is_empty() {
            missing.push("applianceId");
        }
        if service_uri.is_empty() {
            missing.push("serviceUri");
        }
        if !missing.is_empty() {
            return Err(Error::missing_params(&missing));
        }

        let url = self.api_url(&format!(
            "v1/endpoint/{endpoint_id}/values/{appliance_id}/{service_uri}"
        ))?;
        let resp = self.authorized_get(url, LIST_TIMEOUT).await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(Error::Transport)?;
        Ok(RawResponse { status, body })
    }
}
