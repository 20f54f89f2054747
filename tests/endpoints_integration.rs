mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

use common::{build_app, get, load_test_config};

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body not UTF-8")
}

async fn send(app: &axum::Router, request: Request<Body>) -> Response {
    app.clone()
        .oneshot(request)
        .await
        .expect("request should complete")
}

#[tokio::test]
async fn home_page_lists_every_endpoint() {
    let (app, _state) = build_app(load_test_config());

    let response = send(&app, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = body_text(response).await;
    for endpoint in [
        "/metrics",
        "/generatemetrics",
        "/otelmetrics",
        "/generateotelmetrics",
        "/health",
    ] {
        assert!(body.contains(endpoint), "home page missing {endpoint}");
    }
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let (app, _state) = build_app(load_test_config());

    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn metrics_exposition_is_populated_after_startup() {
    let (app, _state) = build_app(load_test_config());

    let response = send(&app, get("/metrics")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/plain; version=0.0.4; charset=utf-8")
    );

    let body = body_text(response).await;
    for family in [
        "active_connections",
        "memory_usage_bytes",
        "queue_size",
        "cpu_usage_percent",
        "bytes_processed_total",
        "app_info",
    ] {
        assert!(body.contains(family), "exposition missing {family}");
        assert!(
            body.contains(&format!("# TYPE {family}")),
            "exposition missing TYPE line for {family}"
        );
    }
    assert!(body.contains("app_state{app_state=\"running\"} 1"));
    assert!(body.contains("version=\"0.0.1\""));
}

#[tokio::test]
async fn generating_prometheus_metrics_populates_all_kinds() {
    let (app, _state) = build_app(load_test_config());

    let response = send(&app, get("/generatemetrics")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_text(response).await;
    assert!(report.contains("Prometheus metrics generated successfully"));
    assert!(report.contains("40 HTTP request samples"));
    assert!(report.contains("15 database query samples"));

    let body = body_text(send(&app, get("/metrics")).await).await;
    assert!(body.contains("http_requests_total{"));
    assert!(body.contains("http_request_duration_seconds_bucket"));
    assert!(body.contains("db_query_duration_seconds_bucket"));
    assert!(body.contains("response_size_bytes_bucket"));
    assert!(body.contains("request_duration_seconds_summary_count"));
    assert!(body.contains("payload_size_bytes_summary_sum"));
    assert!(body.contains("quantile=\"0.9\""));
}

#[tokio::test]
async fn otel_snapshot_reports_resource_and_catalog() {
    let (app, _state) = build_app(load_test_config());

    let response = send(&app, get("/otelmetrics")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"));

    let snapshot: Value =
        serde_json::from_str(&body_text(response).await).expect("snapshot is not valid JSON");

    let attributes = &snapshot["resource"]["attributes"];
    assert_eq!(attributes["service.name"], "promsim-test");
    assert_eq!(attributes["service.version"], "0.0.1");
    assert_eq!(attributes["deployment.environment"], "test");
    assert!(attributes["service.instance.id"].is_string());

    let metrics = snapshot["scope_metrics"][0]["metrics"]
        .as_array()
        .expect("scope metrics missing");
    for name in [
        "http_requests_total",
        "active_connections",
        "cpu_usage_percent",
        "db_query_duration_seconds",
        "payload_size_bytes",
    ] {
        assert!(
            metrics.iter().any(|m| m["name"] == name),
            "snapshot missing instrument {name}"
        );
    }

    // Baseline already populated the observable gauges.
    let connections = metrics
        .iter()
        .find(|m| m["name"] == "active_connections")
        .unwrap();
    let values = connections["current_values"]
        .as_object()
        .expect("gauge values missing");
    assert_eq!(values.len(), 3);
    for value in values.values() {
        let v = value.as_f64().unwrap();
        assert!((10.0..=100.0).contains(&v));
    }

    let cpu = metrics
        .iter()
        .find(|m| m["name"] == "cpu_usage_percent")
        .unwrap();
    let cpu_value = cpu["current_value"].as_f64().expect("cpu value missing");
    assert!((10.0..90.0).contains(&cpu_value));
}

#[tokio::test]
async fn generation_endpoints_touch_only_their_own_sink() {
    let (app, state) = build_app(load_test_config());

    // A Prometheus pass must not create OTEL request series.
    send(&app, get("/generatemetrics")).await;
    let snapshot = serde_json::to_value(state.otel.snapshot()).unwrap();
    let requests = snapshot["scope_metrics"][0]["metrics"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["name"] == "http_requests_total")
        .unwrap()
        .clone();
    assert_eq!(requests["points"].as_array().unwrap().len(), 0);

    // And an OTEL pass fills them in.
    let response = send(&app, get("/generateotelmetrics")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("OTEL metrics generated successfully"));

    let snapshot = serde_json::to_value(state.otel.snapshot()).unwrap();
    let requests = snapshot["scope_metrics"][0]["metrics"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["name"] == "http_requests_total")
        .unwrap()
        .clone();
    assert!(!requests["points"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_path_returns_json_404() {
    let (app, _state) = build_app(load_test_config());

    let response = send(&app, get("/no/such/path")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value =
        serde_json::from_str(&body_text(response).await).expect("error body is not JSON");
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn repeated_generation_accumulates_counters() {
    let (app, state) = build_app(load_test_config());

    send(&app, get("/generatemetrics")).await;
    send(&app, get("/generatemetrics")).await;

    let body = state.metrics.render();
    let total: f64 = body
        .lines()
        .filter(|line| line.starts_with("http_requests_total{"))
        .filter_map(|line| line.rsplit(' ').next())
        .filter_map(|v| v.parse::<f64>().ok())
        .sum();
    // Two passes at 40 simulated requests each.
    assert!((total - 80.0).abs() < 1e-9, "expected 80 requests, got {total}");
}
