//! HTTP front: router construction and process wiring.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tokio::{net::TcpListener, sync::Semaphore};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::AppError;
use crate::pipeline::MatchPipeline;
use crate::riot::{AccountRef, ApiRequest, HttpTransport, RankedStanding, RequestMetrics, RiotClient};

pub mod routes;

#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: Arc<MatchPipeline>,
}

impl AppState {
    pub fn new(pipeline: MatchPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Caches shared by every request, exposed so the sweepers can be spawned.
#[derive(Debug, Clone)]
pub struct SharedCaches {
    pub accounts: Arc<TtlCache<String, AccountRef>>,
    pub standings: Arc<TtlCache<String, RankedStanding>>,
}

impl SharedCaches {
    pub fn new(config: &Config) -> Self {
        Self {
            accounts: Arc::new(TtlCache::new("accounts", config.cache_ttl)),
            standings: Arc::new(TtlCache::new("standings", config.cache_ttl)),
        }
    }
}

/// Wire a pipeline on top of any transport.
pub fn build_pipeline(
    config: &Config,
    transport: Arc<dyn ApiRequest>,
    caches: &SharedCaches,
) -> MatchPipeline {
    MatchPipeline::new(
        RiotClient::new(transport),
        caches.accounts.clone(),
        caches.standings.clone(),
        Arc::new(Semaphore::new(config.max_concurrent_fetches)),
    )
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "🌐 ⚠️ Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health))
        .route("/search", post(routes::search))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the service until ctrl-c.
pub async fn serve(config: Config) -> Result<(), AppError> {
    let metrics = RequestMetrics::new("riot");
    let transport = HttpTransport::new(
        config.riot_api_key.clone(),
        config.request_timeout,
        metrics.clone(),
    )?;

    let caches = SharedCaches::new(&config);
    let pipeline = build_pipeline(&config, Arc::new(transport), &caches);

    tokio::spawn(metrics.log_loop());
    tokio::spawn(caches.accounts.clone().sweep_loop(config.cache_sweep_interval));
    tokio::spawn(caches.standings.clone().sweep_loop(config.cache_sweep_interval));

    let app = router(AppState::new(pipeline), &config.allowed_origins);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        permits = config.max_concurrent_fetches,
        ttl_secs = config.cache_ttl.as_secs(),
        "🌐 Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
