// Time-series fetch
//
// Turns one dashboard query into one upstream series call:
// `GET /v1/endpoint/{e}/series/{a}/{s}/{d}` with conditional query
// parameters, then resolves the dynamically-typed sample values into a
// numeric series.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use tracing::debug;

use crate::client::WemsClient;
use crate::error::Error;
use crate::models::TimeSeriesPoint;
use crate::transport::LIST_TIMEOUT;

/// One dashboard query against the series endpoint.
///
/// The four identifying fields are mandatory; a blank one rejects the
/// query before any network call. The remaining fields are optional
/// refinements mapped to query parameters.
#[derive(Debug, Clone, Default)]
pub struct SeriesQuery {
    pub endpoint_id: String,
    pub appliance_id: String,
    pub service_uri: String,
    pub data_point: String,
    pub aggregate_function: Option<String>,
    pub create_empty_values: Option<bool>,
    /// Time range start, unix seconds.
    pub from: i64,
    /// Time range end, unix seconds.
    pub to: i64,
    /// Maximum number of points; 0 means no limit parameter.
    pub max_data_points: i64,
    /// Server-side aggregation interval; zero means none.
    pub interval: Duration,
}

/// Two parallel sequences of equal length, order preserved from the
/// upstream response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    pub times: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

impl WemsClient {
    /// Execute one series query.
    ///
    /// Value coercion policy, in priority order: float passes through,
    /// integers widen to float, booleans map to 1.0/0.0, strings parse
    /// as float with a 0.0 fallback, anything else is 0.0. This lossy
    /// table is kept bit-for-bit for compatibility with the dashboard's
    /// established behavior.
    pub async fn get_series(&self, query: &SeriesQuery) -> Result<TimeSeries, Error> {
        let mut missing = Vec::new();
        if query.endpoint_id.is_empty() {
            missing.push("endpoint_id");
        }
        if query.appliance_id.is_empty() {
            missing.push("appliance_id");
        }
        if query.service_uri.is_empty() {
            missing.push("service_uri");
        }
        if query.data_point.is_empty() {
            missing.push("data_point");
        }
        if !missing.is_empty() {
            return Err(Error::missing_params(&missing));
        }

        let mut url = self.api_url(&format!(
            "v1/endpoint/{}/series/{}/{}/{}",
            query.endpoint_id, query.appliance_id, query.service_uri, query.data_point
        ))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("from", &query.from.to_string());
            pairs.append_pair("to", &query.to.to_string());
            if query.max_data_points > 0 {
                pairs.append_pair("limit", &query.max_data_points.to_string());
            }
            let interval_secs = query.interval.as_secs();
            if interval_secs > 0 {
                pairs.append_pair("aggregateInterval", &format!("{interval_secs}s"));
            }
            if let Some(function) = query.aggregate_function.as_deref() {
                if !function.is_empty() {
                    pairs.append_pair("aggregateFunction", function);
                }
            }
            if let Some(fill) = query.create_empty_values {
                pairs.append_pair("createEmptyValues", &fill.to_string());
            }
        }

        let resp = self.authorized_get(url, LIST_TIMEOUT).await?;
        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let points: Vec<TimeSeriesPoint> = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        debug!(points = points.len(), "series fetched");

        let mut series = TimeSeries {
            times: Vec::with_capacity(points.len()),
            values: Vec::with_capacity(points.len()),
        };
        for point in points {
            series.times.push(
                DateTime::from_timestamp(point.time, 0).unwrap_or(DateTime::UNIX_EPOCH),
            );
            series.values.push(point.value.to_f64());
        }

        Ok(series)
    }
}
