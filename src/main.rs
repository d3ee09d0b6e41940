mod analyzer;
mod config;
mod error;
mod intake;
mod models;
mod prompt;
mod state;
mod weather;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use config::Config;
use error::{AnalyzeError, WeatherError};
use intake::UploadCandidate;
use models::{PlantReport, WeatherSnapshot};
use state::{UiSession, PROGRESS_TICK_MS, RESULT_HOLD_MS};
use weather::Coordinates;

// Room for multipart framing on top of the image itself, so the intake
// check is what rejects oversized files, not the transport layer.
const UPLOAD_BODY_CAP: usize = intake::MAX_UPLOAD_BYTES + 64 * 1024;

struct AppState {
    config: Config,
    client: Client,
    candidate: RwLock<Option<UploadCandidate>>,
    session: RwLock<UiSession>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env();
    let port = config.port;

    let client = Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .expect("Failed to create HTTP client");

    let state = Arc::new(AppState {
        config,
        client,
        candidate: RwLock::new(None),
        session: RwLock::new(UiSession::new()),
    });

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/weather", get(weather_handler))
        .route("/upload", post(upload_handler))
        .route("/analyze", post(analyze_handler))
        .route("/status", get(status_handler))
        .route("/dismiss", post(dismiss_handler))
        .route("/reset", post(reset_handler))
        .nest_service("/static", ServeDir::new("static"))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_CAP))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server failed");
}

async fn index_handler() -> impl IntoResponse {
    let html = include_str!("../static/index.html");
    Html(html)
}

/// Optional device coordinates. The page omits them when geolocation is
/// denied, and the weather display falls back to "Unavailable".
#[derive(Debug, Deserialize)]
struct GeoQuery {
    lat: Option<f64>,
    lon: Option<f64>,
}

impl GeoQuery {
    fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
            _ => None,
        }
    }
}

/// Passive display fetch, independent of the fetch a later analysis makes.
async fn weather_handler(
    State(state): State<Arc<AppState>>,
    Query(geo): Query<GeoQuery>,
) -> Result<Json<WeatherSnapshot>, (StatusCode, String)> {
    let coords = geo
        .coordinates()
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "lat and lon are required".to_string()))?;

    match weather::fetch_forecast(&state.client, &state.config, coords).await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            warn!("Display weather fetch failed: {}", e);
            Err((StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadAck {
    preview: String,
    mime_type: String,
    size_bytes: usize,
}

async fn upload_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadAck>, (StatusCode, String)> {
    let mut upload: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("image") {
            let declared_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read image: {}", e)))?;
            upload = Some((bytes.to_vec(), declared_type));
        }
    }

    // No file selected is a no-op, not an error state: nothing is cleared.
    let Some((bytes, declared_type)) = upload else {
        return Err((StatusCode::BAD_REQUEST, "Please select an image".to_string()));
    };
    if bytes.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Please select an image".to_string()));
    }

    match intake::submit_file(bytes, &declared_type) {
        Ok(candidate) => {
            info!(
                "Accepted {} byte {} upload",
                candidate.size_bytes, candidate.mime_type
            );
            let ack = UploadAck {
                preview: candidate.preview.clone(),
                mime_type: candidate.mime_type.clone(),
                size_bytes: candidate.size_bytes,
            };
            *state.candidate.write().await = Some(candidate);
            state.session.write().await.preview();
            Ok(Json(ack))
        }
        Err(e) => {
            warn!("Upload rejected: {}", e);
            *state.candidate.write().await = None;
            state.session.write().await.reject_candidate(e.to_string());
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Query(geo): Query<GeoQuery>,
) -> Result<Json<PlantReport>, (StatusCode, String)> {
    let candidate = { state.candidate.read().await.clone() };
    let Some(candidate) = candidate else {
        let e = AnalyzeError::MissingImage;
        return Err((error_status(&e), e.to_string()));
    };

    {
        let mut session = state.session.write().await;
        if !session.begin_analysis() {
            return Err((
                StatusCode::CONFLICT,
                "an analysis is already in flight".to_string(),
            ));
        }
    }

    let ticker = spawn_progress_ticker(state.clone());
    let outcome = analyzer::analyze(
        &state.client,
        &state.config,
        &candidate,
        geo.coordinates(),
    )
    .await;
    ticker.abort();

    match outcome {
        Ok(report) => {
            state.session.write().await.set_progress(100);
            tokio::time::sleep(Duration::from_millis(RESULT_HOLD_MS)).await;
            state.session.write().await.finish(report.clone());
            info!(
                "Analysis complete: {}",
                report.name.as_deref().unwrap_or("unidentified")
            );
            Ok(Json(report))
        }
        Err(e) => {
            error!("Analysis cycle failed: {}", e);
            state.session.write().await.fail(e.to_string());
            Err((error_status(&e), e.to_string()))
        }
    }
}

/// Cosmetic progress only. Aborted as soon as the real request settles.
fn spawn_progress_ticker(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(PROGRESS_TICK_MS));
        interval.tick().await;
        loop {
            interval.tick().await;
            state.session.write().await.tick_progress();
        }
    })
}

async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(session.clone())
}

async fn dismiss_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.write().await.dismiss_notice();
    StatusCode::NO_CONTENT
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    *state.candidate.write().await = None;
    state.session.write().await.reset();
    StatusCode::NO_CONTENT
}

fn error_status(err: &AnalyzeError) -> StatusCode {
    match err {
        AnalyzeError::MissingImage => StatusCode::BAD_REQUEST,
        AnalyzeError::Weather(WeatherError::LocationUnavailable) => StatusCode::BAD_REQUEST,
        AnalyzeError::Weather(_) => StatusCode::BAD_GATEWAY,
        AnalyzeError::Request(_) | AnalyzeError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        AnalyzeError::Parse(_) => StatusCode::BAD_GATEWAY,
        AnalyzeError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}
