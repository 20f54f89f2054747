//! Landing page.

use crate::state::AppState;
use axum::{response::Html, routing::get, Router};

/// Registers the landing page route.
///
/// Deployment health probes poll `/`, so this handler must stay cheap:
/// it returns a static page and touches no shared state.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(home))
}

async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>promsim - synthetic metrics generator</title>
    <style>
        body { font-family: sans-serif; margin: 40px; background-color: #f5f5f5; }
        .container { background-color: white; padding: 30px; border-radius: 8px; max-width: 720px; margin: 0 auto; }
        h1 { color: #333; }
        h2 { color: #0066cc; border-bottom: 2px solid #0066cc; padding-bottom: 8px; }
        .endpoint { background-color: #e8f4f8; padding: 12px; margin: 10px 0; border-radius: 5px; }
        .endpoint code { color: #0066cc; font-weight: bold; }
    </style>
</head>
<body>
    <div class="container">
        <h1>promsim</h1>
        <p>Generates synthetic metrics in both Prometheus and OTEL form.</p>

        <h2>Prometheus</h2>
        <div class="endpoint">
            <code>GET /generatemetrics</code>
            <p>Runs a workload pass against the Prometheus registry.</p>
        </div>
        <div class="endpoint">
            <code>GET /metrics</code>
            <p>All Prometheus metrics in text exposition format.</p>
        </div>

        <h2>OpenTelemetry</h2>
        <div class="endpoint">
            <code>GET /generateotelmetrics</code>
            <p>Runs a workload pass against the OTEL meter.</p>
        </div>
        <div class="endpoint">
            <code>GET /otelmetrics</code>
            <p>OTEL instrument snapshot as JSON.</p>
        </div>

        <h2>Service</h2>
        <div class="endpoint">
            <code>GET /health</code>
            <p>Liveness probe target.</p>
        </div>
    </div>
</body>
</html>
"#;
