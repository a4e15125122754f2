//! HTTP server for the report upload form.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                                   |
//! |--------|-------------------|-----------------------------------------------|
//! | GET    | `/`               | Upload form                                   |
//! | POST   | `/upload`         | Upload CSV, render and deliver the report     |
//! | POST   | `/api/summarize`  | Upload CSV, return the report rows as JSON    |
//! | GET    | `/health`         | Health check                                  |
//! | GET    | `/api/logs`       | SSE stream for real-time logs                 |

use axum::{
    extract::{Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Html, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, log_info_indent, log_success, LOG_BROADCASTER};
use super::types::{error_response, SummaryResponse};
use crate::config::Settings;
use crate::delivery::OutboxDelivery;
use crate::error::{PipelineError, ServerError, ServerResult};
use crate::render::TextRenderer;
use crate::transform::pipeline::{deliver_summary, summarize_csv_bytes, summarize_csv_file};

const UPLOAD_PAGE: &str = include_str!("../../templates/upload.html");

/// Shared handler state
pub struct AppState {
    pub settings: Settings,
    pub renderer: TextRenderer,
    pub delivery: OutboxDelivery,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let delivery = OutboxDelivery::new(&settings.outbox_dir);
        Self {
            settings,
            renderer: TextRenderer::default(),
            delivery,
        }
    }
}

/// Build the router (separate from [`start_server`] so it can be exercised in tests)
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(upload_page))
        .route("/health", get(health))
        .route("/upload", post(upload_report))
        .route("/api/summarize", post(summarize_upload))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let port = settings.port;
    let app = router(Arc::new(AppState::new(settings)));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Vault report server running on http://localhost:{}", port);
    println!("   GET  /               - Upload form");
    println!("   POST /upload         - Upload CSV, send report");
    println!("   POST /api/summarize  - Upload CSV, JSON preview");
    println!("   GET  /api/logs       - SSE log stream");
    println!("   GET  /health         - Health check");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn upload_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE)
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "vaultreport",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /upload",
            "summarize": "POST /api/summarize",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Pull the `file` field out of a multipart body.
async fn read_file_field(mut multipart: Multipart) -> ServerResult<(String, Vec<u8>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".into()))?;
    let name = file_name.unwrap_or_else(|| "upload.csv".to_string());

    log_info(format!("📄 NEW UPLOAD: {} ({} bytes)", name, bytes.len()));
    Ok((name, bytes))
}

/// Persist the upload to a temporary file, transform it, render and deliver.
fn run_report(state: &AppState, file_name: &str, bytes: &[u8]) -> Result<String, PipelineError> {
    let mut temp = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".csv")
        .tempfile()?;
    temp.write_all(bytes)?;
    temp.flush()?;
    log_info_indent(format!("saved to {}", temp.path().display()), 1);

    let sink = &*LOG_BROADCASTER;
    let summary = summarize_csv_file(temp.path(), &state.settings.formatting_file, sink);
    deliver_summary(
        &summary.table,
        Path::new(file_name),
        &state.settings,
        &state.renderer,
        &state.delivery,
        sink,
    )
}

/// Upload form target: responds with a plain-text outcome
async fn upload_report(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, String), ServerError> {
    let (file_name, bytes) = read_file_field(multipart).await?;

    let message = tokio::task::spawn_blocking(move || run_report(&state, &file_name, &bytes))
        .await
        .map_err(|e| {
            log_error(format!("Report task failed: {}", e));
            ServerError::Internal(e.to_string())
        })?
        .map_err(|e| {
            log_error(format!("Report failed: {}", e));
            ServerError::from(e)
        })?;

    log_success(&message);
    Ok((StatusCode::OK, format!("✅ {}", message)))
}

/// JSON preview: transform only
async fn summarize_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<SummaryResponse>, (StatusCode, Json<Value>)> {
    let (_, bytes) = read_file_field(multipart)
        .await
        .map_err(|e| (e.status(), Json(error_response(&e.to_string()))))?;

    let summary = tokio::task::spawn_blocking(move || {
        summarize_csv_bytes(&bytes, &state.settings.formatting_file, &*LOG_BROADCASTER)
    })
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response(&e.to_string())),
        )
    })?;

    Ok(Json(SummaryResponse::from(summary)))
}
