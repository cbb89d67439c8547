use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::pipeline::{Pagination, SearchOutcome};
use crate::riot::ParticipantRecord;

use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Account path under the platform host, e.g. `/riot/account/v1/accounts/by-riot-id/Name/TAG`.
    #[serde(default, alias = "url")]
    pub account_lookup: String,
    #[serde(default)]
    pub region: String,
    pub start: Option<u32>,
    pub count: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub data: Vec<ParticipantRecord>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// POST /search
pub async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    info!(region = %request.region, "🔎 Search requested");

    let pagination = Pagination::new(request.start, request.count);
    let outcome = state
        .pipeline
        .search(&request.account_lookup, &request.region, pagination)
        .await?;

    Ok(match outcome {
        SearchOutcome::NoMatches(account) => Json(account).into_response(),
        SearchOutcome::Matches(batch) => Json(SearchResponse {
            data: batch.participants,
        })
        .into_response(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
