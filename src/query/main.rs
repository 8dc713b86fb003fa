//! HTTP server for reverse lookups.
//!
//! Loads the configured layers once at startup and answers
//! `GET /v1/reverse?point.lon=..&point.lat=..` from memory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use reversejp::pip::{LayerStats, DEFAULT_FALLBACK_OFFSETS};
use reversejp::{EngineConfig, Error, Region, ReverseJp};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "reversejp-server")]
#[command(about = "Reverse geocoding server for Japanese areas")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// TOML engine configuration (overrides --data-dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the JMA datasets
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Fail on malformed features instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Retry slightly shifted points when nothing matches
    #[arg(long)]
    nudge: bool,

    #[arg(long, default_value = "info")]
    log_level: Level,
}

/// Application state shared across handlers
struct AppState {
    engine: ReverseJp,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("reversejp server");

    let mut config = match &args.config {
        Some(path) => {
            info!("Using config {}", path.display());
            EngineConfig::load_from_file(path).context("Failed to load config")?
        }
        None => {
            info!("Using JMA datasets from {}", args.data_dir.display());
            EngineConfig::jma_defaults(&args.data_dir)
        }
    };
    if args.strict {
        config.engine.strict_mode = true;
    }
    if args.nudge && config.engine.fallback_offsets.is_empty() {
        config.engine.fallback_offsets = DEFAULT_FALLBACK_OFFSETS.to_vec();
    }

    // Parsing is CPU-bound; keep it off the async workers
    let engine = tokio::task::spawn_blocking(move || ReverseJp::from_config(&config))
        .await?
        .context("Failed to load datasets")?;

    let state = Arc::new(AppState { engine });
    let app = router(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/reverse", get(reverse_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = state.engine.stats();
    Json(HealthResponse {
        status: "ok",
        layers: stats.layers,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    layers: Vec<LayerStats>,
}

/// Reverse geocoding
async fn reverse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReverseQueryParams>,
) -> Result<Json<ReverseResponse>, (StatusCode, String)> {
    let layers: Option<Vec<&str>> = params
        .layers
        .as_deref()
        .map(|l| l.split(',').map(str::trim).filter(|s| !s.is_empty()).collect());

    let regions = match &layers {
        Some(ids) => state
            .engine
            .find_regions_in(params.point_lon, params.point_lat, ids),
        None => state.engine.find_regions(params.point_lon, params.point_lat),
    }
    .map_err(|e| match e {
        Error::InvalidCoordinate { .. } => (StatusCode::BAD_REQUEST, e.to_string()),
        other => {
            tracing::error!("Reverse lookup failed: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    })?;

    Ok(Json(ReverseResponse {
        features: regions.into_iter().map(ReverseFeature::from).collect(),
    }))
}

#[derive(Deserialize)]
struct ReverseQueryParams {
    /// Point longitude
    #[serde(rename = "point.lon")]
    point_lon: f64,
    /// Point latitude
    #[serde(rename = "point.lat")]
    point_lat: f64,
    /// Filter by layers (comma-separated)
    layers: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReverseResponse {
    features: Vec<ReverseFeature>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReverseFeature {
    code: String,
    name: String,
    #[serde(rename = "enName", skip_serializing_if = "Option::is_none", default)]
    en_name: Option<String>,
    layer: String,
    level: u8,
}

impl From<&Region> for ReverseFeature {
    fn from(region: &Region) -> Self {
        Self {
            code: region.code.clone(),
            name: region.name.clone(),
            en_name: region.en_name.clone(),
            layer: region.layer.clone(),
            level: region.hierarchy_level,
        }
    }
}
