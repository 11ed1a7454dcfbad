//! HTTP proxy behind the cyberfolio terminal.
//!
//! Two read-only endpoints front third-party sites the terminal cannot reach directly:
//! `GET /api/news` relays the CVE RSS feed verbatim inside `{ "data": ... }`, and
//! `GET /api/link-preview?url=` fetches a page and boils it down to its Open Graph
//! card. Both are stateless: no caching, no retries, no authentication. Failures are
//! reported as `{ "error": ... }` bodies and never take the server down.

pub mod error;
pub mod preview;

pub use error::{Result, ServerError};

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::Json;
use axum::routing::get;
use axum::{middleware, Router};
use cyberfolio_core::LinkPreview;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const DEFAULT_FEED_URL: &str = "https://cvefeed.io/rssfeed/latest.xml";
pub const FEED_ORIGIN: &str = "https://cvefeed.io";
pub const UPSTREAM_USER_AGENT: &str = "Mozilla/5.0";

pub const NEWS_FAILED: &str = "Failed to fetch news";
pub const PREVIEW_FAILED: &str = "Failed to fetch link preview";

type HandlerResult = std::result::Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Configuration for the proxy server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// RSS document relayed by `/api/news`
    pub feed_url: String,
    /// Enable permissive CORS
    pub enable_cors: bool,
    /// Timeout applied to every upstream request
    pub request_timeout: Duration,
    /// Enable request logging
    pub enable_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            feed_url: DEFAULT_FEED_URL.to_string(),
            enable_cors: true,
            request_timeout: Duration::from_secs(15),
            enable_logging: true,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Parse and set the bind address from a string.
    pub fn with_bind_addr_str(mut self, addr: &str) -> Result<Self> {
        self.bind_addr = addr
            .parse()
            .map_err(|e| ServerError::config_error(format!("Invalid bind address: {}", e)))?;
        Ok(self)
    }

    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = url.into();
        self
    }

    pub fn with_cors(mut self, enable: bool) -> Self {
        self.enable_cors = enable;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub config: ServerConfig,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub url: Option<String>,
}

fn error_response(err: &ServerError, message: &str) -> (StatusCode, Json<Value>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": message })))
}

async fn fetch_feed(state: &AppState) -> Result<String> {
    let response = state
        .client
        .get(&state.config.feed_url)
        .header(header::ORIGIN, FEED_ORIGIN)
        .header(header::USER_AGENT, UPSTREAM_USER_AGENT)
        .send()
        .await?
        .error_for_status()?;

    Ok(response.text().await?)
}

/// Handler for the /api/news GET endpoint.
async fn news_handler(State(state): State<AppState>) -> HandlerResult {
    match fetch_feed(&state).await {
        Ok(data) => {
            log::info!("Relayed news feed ({} bytes)", data.len());
            Ok(Json(json!({ "data": data })))
        }
        Err(e) => {
            log::error!("Error fetching security news: {}", e);
            Err(error_response(&e, NEWS_FAILED))
        }
    }
}

async fn fetch_preview(state: &AppState, url: &str) -> Result<LinkPreview> {
    let target = reqwest::Url::parse(url)
        .map_err(|e| ServerError::internal(format!("Unusable url '{}': {}", url, e)))?;

    let response = state
        .client
        .get(target)
        .header(header::USER_AGENT, UPSTREAM_USER_AGENT)
        .send()
        .await?
        .error_for_status()?;
    let page_url = response.url().clone();
    let html = response.text().await?;

    Ok(preview::extract_preview(&html, url, &page_url))
}

/// Handler for the /api/link-preview GET endpoint.
async fn link_preview_handler(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> HandlerResult {
    let url = match query.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            let err = ServerError::missing_parameter("url");
            log::warn!("Rejected link preview request: {}", err);
            return Err(error_response(&err, "Missing url parameter"));
        }
    };

    match fetch_preview(&state, &url).await {
        Ok(preview) => {
            log::info!("Built link preview for {}", url);
            Ok(Json(json!(preview)))
        }
        Err(e) => {
            log::error!("Error fetching link preview for {}: {}", url, e);
            Err(error_response(&e, PREVIEW_FAILED))
        }
    }
}

/// The proxy server.
pub struct ProxyServer {
    config: ServerConfig,
    client: reqwest::Client,
}

impl ProxyServer {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ServerError::config_error(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn build_router(&self) -> Router {
        let state = AppState {
            client: self.client.clone(),
            config: self.config.clone(),
        };

        let mut router = Router::new()
            .route(
                "/health",
                get(|| async {
                    Json(HealthResponse {
                        status: "healthy".to_string(),
                        timestamp: chrono::Utc::now(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    })
                }),
            )
            .route("/api/news", get(news_handler))
            .route("/api/link-preview", get(link_preview_handler))
            .with_state(state);

        if self.config.enable_logging {
            router = router.layer(middleware::from_fn(
                |request: axum::http::Request<axum::body::Body>,
                 next: axum::middleware::Next| async {
                    let request_id = uuid::Uuid::new_v4().to_string();
                    let method = request.method().clone();
                    let uri = request.uri().clone();

                    // Health probes are frequent and uninteresting.
                    if uri.path() == "/health" {
                        log::debug!("Request {} {} {}", request_id, method, uri);
                    } else {
                        log::info!("Request {} {} {}", request_id, method, uri);
                    }

                    let start = std::time::Instant::now();
                    let response = next.run(request).await;
                    log::info!(
                        "Response {} {} in {:?}",
                        request_id,
                        response.status(),
                        start.elapsed()
                    );

                    response
                },
            ));
        }

        router = router.layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Bind the configured address and serve until `shutdown_signal` resolves.
    pub async fn serve_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(|e| {
                ServerError::config_error(format!(
                    "Failed to bind to {}: {}",
                    self.config.bind_addr, e
                ))
            })?;
        self.serve_listener(listener, shutdown_signal).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_listener<F>(self, listener: TcpListener, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        let router = self.build_router();

        log::info!("cyberfolio proxy starting on {}", addr);
        log::info!("Health check: http://{}/health", addr);
        log::info!("News feed: http://{}/api/news -> {}", addr, self.config.feed_url);
        log::info!("Link preview: http://{}/api/link-preview?url=", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::internal(format!("Server error: {}", e)))?;

        log::info!("cyberfolio proxy shut down gracefully");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            log::info!("Received SIGTERM, shutting down...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use tower::ServiceExt; // for `oneshot`

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn router_for(feed_url: &str) -> Router {
        let config = ServerConfig::new()
            .with_feed_url(feed_url)
            .with_logging(false)
            .with_request_timeout(Duration::from_secs(5));
        ProxyServer::new(config).unwrap().build_router()
    }

    #[test]
    fn test_config_builder() {
        let config = ServerConfig::new()
            .with_bind_addr_str("0.0.0.0:8080")
            .unwrap()
            .with_cors(false)
            .with_feed_url("http://localhost/feed.xml");
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(!config.enable_cors);
        assert_eq!(config.feed_url, "http://localhost/feed.xml");

        let err = ServerConfig::new().with_bind_addr_str("nonsense").unwrap_err();
        assert_eq!(err.error_type(), "config_error");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = get_json(router_for(DEFAULT_FEED_URL), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_news_relays_feed_with_fixed_headers() {
        let mut upstream = mockito::Server::new_async().await;
        let mock = upstream
            .mock("GET", "/rssfeed/latest.xml")
            .match_header("origin", FEED_ORIGIN)
            .match_header("user-agent", UPSTREAM_USER_AGENT)
            .with_status(200)
            .with_header("content-type", "application/rss+xml")
            .with_body("<rss><channel></channel></rss>")
            .create_async()
            .await;

        let feed_url = format!("{}/rssfeed/latest.xml", upstream.url());
        let (status, body) = get_json(router_for(&feed_url), "/api/news").await;
        mock.assert_async().await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "data": "<rss><channel></channel></rss>" }));
    }

    #[tokio::test]
    async fn test_news_upstream_error_status_is_500() {
        let mut upstream = mockito::Server::new_async().await;
        let _mock = upstream
            .mock("GET", "/feed")
            .with_status(503)
            .create_async()
            .await;

        let feed_url = format!("{}/feed", upstream.url());
        let (status, body) = get_json(router_for(&feed_url), "/api/news").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": NEWS_FAILED }));
    }

    #[tokio::test]
    async fn test_link_preview_requires_url() {
        for uri in ["/api/link-preview", "/api/link-preview?url=", "/api/link-preview?url=%20"] {
            let (status, body) = get_json(router_for(DEFAULT_FEED_URL), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_link_preview_extracts_page_metadata() {
        let mut upstream = mockito::Server::new_async().await;
        let _mock = upstream
            .mock("GET", "/landing")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(
                r#"<html><head><title>Landing</title>
                   <meta property="og:description" content="Welcome">
                   <meta property="og:image" content="/og.png"></head></html>"#,
            )
            .create_async()
            .await;

        let page = format!("{}/landing", upstream.url());
        let uri = format!("/api/link-preview?url={}", urlencoding::encode(&page));
        let (status, body) = get_json(router_for(DEFAULT_FEED_URL), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Landing");
        assert_eq!(body["description"], "Welcome");
        assert_eq!(body["image"], format!("{}/og.png", upstream.url()));
        assert_eq!(body["favicon"], format!("{}/favicon.ico", upstream.url()));
        assert_eq!(body["url"], page);
    }

    #[tokio::test]
    async fn test_link_preview_failure_is_500() {
        let (status, body) = get_json(
            router_for(DEFAULT_FEED_URL),
            "/api/link-preview?url=not-a-url",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": PREVIEW_FAILED }));
    }
}
