// Series endpoint tests using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wems_api::{Error, SeriesQuery, TransportConfig, WemsClient};

async fn setup() -> (MockServer, WemsClient) {
    let server = MockServer::start().await;
    let client = WemsClient::new(
        Url::parse(&server.uri()).unwrap(),
        "cid".to_owned(),
        "sekret".to_owned().into(),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok"))
        .mount(server)
        .await;
}

fn base_query() -> SeriesQuery {
    SeriesQuery {
        endpoint_id: "e1".to_owned(),
        appliance_id: "a1".to_owned(),
        service_uri: "s1".to_owned(),
        data_point: "d1".to_owned(),
        from: 100,
        to: 200,
        ..SeriesQuery::default()
    }
}

#[tokio::test]
async fn blank_identifying_field_fails_without_network() {
    let (server, client) = setup().await;

    let mut query = base_query();
    query.service_uri = String::new();

    let err = client.get_series(&query).await.unwrap_err();
    match err {
        Error::Validation { ref message } => {
            assert!(message.contains("service_uri"), "got: {message}");
        }
        other => panic!("expected Validation, got: {other:?}"),
    }

    // No token request, no series request.
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn value_coercion_preserves_order() {
    let (server, client) = setup().await;
    mount_token(&server).await;

    let body = json!([
        { "time": 0, "value": "3.5" },
        { "time": 1, "value": true },
        { "time": 2, "value": "notanumber" },
        { "time": 3, "value": 42 },
    ]);
    Mock::given(method("GET"))
        .and(path("/v1/endpoint/e1/series/a1/s1/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let series = client.get_series(&base_query()).await.unwrap();

    assert_eq!(series.values, vec![3.5, 1.0, 0.0, 42.0]);
    assert_eq!(series.times.len(), 4);
    assert_eq!(series.times[3].timestamp(), 3);
}

#[tokio::test]
async fn minimal_query_emits_only_time_range_params() {
    let (server, client) = setup().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/endpoint/e1/series/a1/s1/d1"))
        .and(query_param("from", "100"))
        .and(query_param("to", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client.get_series(&base_query()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let series_request = requests
        .iter()
        .find(|r| r.url.path().contains("/series/"))
        .expect("series request not recorded");
    let query_string = series_request.url.query().unwrap_or("");
    assert!(!query_string.contains("limit"), "got: {query_string}");
    assert!(
        !query_string.contains("aggregateInterval"),
        "got: {query_string}"
    );
    assert!(
        !query_string.contains("aggregateFunction"),
        "got: {query_string}"
    );
    assert!(
        !query_string.contains("createEmptyValues"),
        "got: {query_string}"
    );
}

#[tokio::test]
async fn full_query_emits_all_params() {
    let (server, client) = setup().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/endpoint/e1/series/a1/s1/d1"))
        .and(query_param("from", "100"))
        .and(query_param("to", "200"))
        .and(query_param("limit", "500"))
        .and(query_param("aggregateInterval", "15s"))
        .and(query_param("aggregateFunction", "mean"))
        .and(query_param("createEmptyValues", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let query = SeriesQuery {
        aggregate_function: Some("mean".to_owned()),
        create_empty_values: Some(true),
        max_data_points: 500,
        interval: Duration::from_secs(15),
        ..base_query()
    };

    let series = client.get_series(&query).await.unwrap();
    assert!(series.values.is_empty());
}

#[tokio::test]
async fn upstream_error_carries_status_and_body() {
    let (server, client) = setup().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/endpoint/e1/series/a1/s1/d1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client.get_series(&base_query()).await.unwrap_err();
    match err {
        Error::Api { status, ref body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/endpoint/e1/series/a1/s1/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = client.get_series(&base_query()).await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { .. }),
        "got: {err:?}"
    );
}
