//! # Development Server
//!
//! Serves the embedded frontend and forwards backend-bound paths
//! (`/api/*`, `/skill.md`, `/skill/*.md`) to the skills backend.
//!
//! Anything else that is not a bundled file gets `index.html`, so the
//! client router can resolve history-mode URLs such as `/skill/pdf-toolkit`.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    Router,
};
use serde_json::json;
use skillhub_core::proxy::{ProxyRule, ProxyTable};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::assets;
use crate::config::ServeConfig;

/// Largest request body forwarded to the backend
const MAX_FORWARD_BODY: usize = 16 * 1024 * 1024;

/// Connection-scoped headers that must not be relayed
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Clone)]
pub struct DevState {
    proxy: Arc<ProxyTable>,
    http: reqwest::Client,
}

impl DevState {
    pub fn new(proxy: ProxyTable) -> anyhow::Result<Self> {
        // Redirects are relayed to the browser, not followed here
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            proxy: Arc::new(proxy),
            http,
        })
    }
}

pub fn router(state: DevState) -> Router {
    Router::new().fallback(handle).with_state(state)
}

pub async fn run(config: ServeConfig) -> anyhow::Result<()> {
    let state = DevState::new(config.proxy.clone())?;
    let app = router(state);

    let listener = TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "SkillHub dev server running at http://{}", config.addr);
    for rule in config.proxy.rules() {
        tracing::info!(rule = %rule.matcher.key(), target = %rule.target, "Proxying");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Dev server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn handle(State(state): State<DevState>, request: Request) -> Response {
    let path = request.uri().path().to_string();

    if let Some(rule) = state.proxy.find(&path) {
        return forward(&state.http, rule, request).await;
    }

    if path == "/api" || path.starts_with("/api/") {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response();
    }

    if request.method() != Method::GET && request.method() != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    serve_static(&path)
}

async fn forward(http: &reqwest::Client, rule: &ProxyRule, request: Request) -> Response {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let url = rule.upstream_url(&path_and_query);

    let (parts, body) = request.into_parts();
    let body = match to_bytes(body, MAX_FORWARD_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Failed to read request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let mut headers = strip_hop_by_hop(parts.headers);
    headers.remove(header::CONTENT_LENGTH);
    if rule.change_origin {
        match HeaderValue::from_str(&rule.target_authority()) {
            Ok(host) => {
                headers.insert(header::HOST, host);
            }
            Err(e) => tracing::warn!(error = %e, "Target authority is not a valid Host header"),
        }
    }

    tracing::debug!(method = %parts.method, url = %url, "Forwarding");

    let upstream = http
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await;

    match upstream {
        Ok(res) => {
            let status = res.status();
            let headers = strip_hop_by_hop(res.headers().clone());

            let mut response = Response::new(Body::from_stream(res.bytes_stream()));
            *response.status_mut() = status;
            *response.headers_mut() = headers;
            response
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Backend unreachable");
            (StatusCode::BAD_GATEWAY, "Backend server not reachable").into_response()
        }
    }
}

fn strip_hop_by_hop(mut headers: HeaderMap) -> HeaderMap {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
    headers
}

fn serve_static(path: &str) -> Response {
    if let Some(asset) = assets::lookup(path) {
        return ([(header::CONTENT_TYPE, asset.mime)], asset.data.into_owned()).into_response();
    }

    // Missing bundle files are real 404s, not client routes
    if path.starts_with("/assets/") {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }

    // SPA fallback
    match assets::index_html() {
        Some(index) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            index.into_owned(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
