//! Development server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use devex_render::{BuildConfig, BuildError, SiteBuilder};

use crate::rebuild::RebuildGuard;
use crate::security;
use crate::watcher::FileWatcher;
use crate::websocket::{hmr_client_script, HmrMessage, ReloadHub};

const HMR_PATH: &str = "/__hmr";
const HMR_SCRIPT_TAG: &str = r#"<script src="/__hmr.js"></script>"#;

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Open browser on start
    pub open: bool,

    /// How the site is generated on each change
    pub build: BuildConfig,

    /// Directory served under `/public`
    pub public_dir: PathBuf,

    /// Extra files or directories whose changes trigger a rebuild
    pub watch: Vec<PathBuf>,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            open: false,
            build: BuildConfig::default(),
            public_dir: PathBuf::from("public"),
            watch: Vec::new(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Server error: {0}")]
    Serve(String),
}

/// Shared server state.
pub(crate) struct AppState {
    config: DevServerConfig,
    builder: SiteBuilder,
    hub: ReloadHub,
    guard: Arc<RebuildGuard>,
    started: Instant,
}

impl AppState {
    pub(crate) fn new(config: DevServerConfig) -> Result<Self, ServerError> {
        let builder = SiteBuilder::new(config.build.clone())?;
        Ok(Self {
            config,
            builder,
            hub: ReloadHub::new(),
            guard: Arc::new(RebuildGuard::new()),
            started: Instant::now(),
        })
    }
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the development server.
    ///
    /// Generates the site in the background, watches the inputs and serves until
    /// Ctrl+C or SIGTERM.
    pub async fn start(self) -> Result<(), ServerError> {
        let host_port = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = host_port
            .parse()
            .map_err(|_| ServerError::InvalidAddress(host_port))?;

        let state = Arc::new(AppState::new(self.config.clone())?);

        let (watcher, mut rx) =
            FileWatcher::new(&self.config.build.data_file, &self.config.watch)
                .map_err(|e| ServerError::WatchError(e.to_string()))?;

        tracing::info!("Generating initial site...");
        tokio::spawn(trigger_rebuild(Arc::clone(&state)));

        let watch_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if !event.triggers_rebuild() {
                    tracing::debug!("Ignoring removal of {}", event.path().display());
                    continue;
                }
                tracing::info!("File changed: {}", event.path().display());
                tokio::spawn(trigger_rebuild(Arc::clone(&watch_state)));
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = create_router(state);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        let url = format!("http://{}", addr);
        tracing::info!("Dev server running at {}", url);
        tracing::info!("API endpoints: /api/stats, /api/data, /health");

        if self.config.open {
            if let Err(e) = open::that(&url) {
                tracing::warn!("Could not open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Server closed");
        Ok(())
    }
}

/// Regenerate the site unless a rebuild is already running.
///
/// On success every connected client is told to reload. Failures are logged and
/// the server keeps watching.
pub(crate) async fn trigger_rebuild(state: Arc<AppState>) {
    let Some(ticket) = state.guard.try_begin() else {
        tracing::debug!("Rebuild already in progress, skipping");
        return;
    };

    let build_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        let _ticket = ticket;
        build_state.builder.build_all()
    })
    .await;

    match result {
        Ok(Ok(built)) => {
            tracing::info!(
                "Rebuilt {} companies in {} categories ({}ms)",
                built.companies,
                built.categories,
                built.duration_ms
            );
            let clients = state.hub.broadcast(HmrMessage::Reload);
            tracing::info!("Sent reload signal to {} client(s)", clients);
        }
        Ok(Err(e)) => tracing::error!("Rebuild failed: {}", e),
        Err(e) => tracing::error!("Rebuild task failed: {}", e),
    }
}

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let dist = ServeDir::new(&state.config.build.output_dir);
    let public = ServeDir::new(&state.config.public_dir);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/data", get(data_handler))
        .route("/api/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .route("/readme", get(readme_handler))
        .route(HMR_PATH, get(ws_handler))
        .route("/__hmr.js", get(hmr_script_handler))
        .nest_service("/dist", dist)
        .nest_service("/public", public)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

/// Handler for the generated page.
async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    let html_path = state.config.build.output_dir.join("index.html");

    match tokio::fs::read_to_string(&html_path).await {
        Ok(html) => Html(inject_hmr_script(&html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, Html(BUILDING_PAGE)).into_response(),
    }
}

/// Handler for the raw data model.
async fn data_handler(State(state): State<Arc<AppState>>) -> Response {
    match read_json(&state.config.build.data_file).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            tracing::error!("Failed to load data: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load data")
        }
    }
}

/// Handler for the stats document written next to the page.
async fn stats_handler(State(state): State<Arc<AppState>>) -> Response {
    let stats_path = state.config.build.output_dir.join("stats.json");
    if !stats_path.exists() {
        return json_error(StatusCode::NOT_FOUND, "Stats not generated yet");
    }

    match read_json(&stats_path).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            tracing::error!("Failed to load stats: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load stats")
        }
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "uptime": state.started.elapsed().as_secs_f64(),
    }))
}

/// Handler for the README preview.
async fn readme_handler(State(state): State<Arc<AppState>>) -> Response {
    match tokio::fs::read_to_string(&state.config.build.readme_path).await {
        Ok(source) => Html(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>README Preview</title>
  <style>
    body {{ font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; line-height: 1.6; }}
    pre {{ background: #f5f5f5; padding: 1rem; border-radius: 0.5rem; overflow-x: auto; }}
  </style>
</head>
<body>
{}
{}
</body>
</html>"#,
            render_markdown(&source),
            HMR_SCRIPT_TAG
        ))
        .into_response(),
        Err(_) => json_error(StatusCode::NOT_FOUND, "README not generated yet"),
    }
}

/// Handler for the HMR WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let (id, mut rx) = state.hub.register();

    if send_message(&mut socket, &HmrMessage::Connected).await.is_ok() {
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => {
                        if send_message(&mut socket, &msg).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                incoming = socket.recv() => match incoming {
                    Some(Ok(_)) => {}
                    _ => break,
                },
            }
        }
    }

    state.hub.unregister(id);
}

async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

/// Handler for the HMR client script.
async fn hmr_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        hmr_client_script(HMR_PATH),
    )
}

async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found")
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn read_json(path: &std::path::Path) -> Result<serde_json::Value, String> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&source).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Insert the hot reload script before the closing body tag.
fn inject_hmr_script(html: &str) -> String {
    match html.rfind("</body>") {
        Some(at) => format!("{}{}\n{}", &html[..at], HMR_SCRIPT_TAG, &html[at..]),
        None => format!("{}{}", html, HMR_SCRIPT_TAG),
    }
}

/// Simple markdown to HTML renderer.
fn render_markdown(content: &str) -> String {
    use pulldown_cmark::{html, Options, Parser};

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(content, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received, stopping server...");
}

/// Served in place of the page until the first build has written it.
const BUILDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>DevEx Growth - Building...</title>
  <style>
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
      background: #f8fafc;
      color: #334155;
      display: flex;
      align-items: center;
      justify-content: center;
      height: 100vh;
      margin: 0;
    }
    .container { text-align: center; }
    .spinner {
      border: 4px solid #e2e8f0;
      border-top: 4px solid #3b82f6;
      border-radius: 50%;
      width: 40px;
      height: 40px;
      animation: spin 1s linear infinite;
      margin: 0 auto 1rem;
    }
    @keyframes spin { to { transform: rotate(360deg); } }
  </style>
  <script>setTimeout(function() { location.reload(); }, 2000);</script>
</head>
<body>
  <div class="container">
    <div class="spinner"></div>
    <h2>Building DevEx Growth Directory...</h2>
    <p>HTML is being generated. This page will refresh automatically.</p>
  </div>
</body>
</html>"#;
