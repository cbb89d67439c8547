use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::riot::RiotApiError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Account resolution failed: {0}")]
    AccountResolutionFailed(#[source] RiotApiError),

    #[error("Match list failed: {0}")]
    MatchListFailed(#[source] RiotApiError),

    #[error("Fetching match {match_id} failed: {source}")]
    MatchFetchFailed {
        match_id: String,
        #[source]
        source: RiotApiError,
    },

    #[error("Requester {puuid} is not part of match {match_id}")]
    RequesterNotFound { match_id: String, puuid: String },

    #[error("Malformed payload for match {match_id}: {reason}")]
    MalformedMatchPayload { match_id: String, reason: String },

    /// The task fetching the match did not run to completion.
    #[error("Task for match {match_id} did not complete: {reason}")]
    MatchTaskFailed { match_id: String, reason: String },

    #[error("Ranked standing lookup failed for summoner '{summoner_id}': {reason}")]
    StandingLookupFailed { summoner_id: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Machine readable code exposed to HTTP callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRegion(_) => "INVALID_REGION",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::AccountResolutionFailed(_) => "ACCOUNT_RESOLUTION_FAILED",
            Self::MatchListFailed(_) => "MATCH_LIST_FAILED",
            Self::MatchFetchFailed { .. } => "MATCH_FETCH_FAILED",
            Self::RequesterNotFound { .. } => "REQUESTER_NOT_FOUND",
            Self::MalformedMatchPayload { .. } => "MALFORMED_MATCH_PAYLOAD",
            Self::MatchTaskFailed { .. } => "MATCH_TASK_FAILED",
            Self::StandingLookupFailed { .. } => "STANDING_LOOKUP_FAILED",
            Self::Config(_) => "CONFIG",
            Self::Io(_) => "IO",
        }
    }

    /// Whether the error only affects one match of a batch.
    pub fn is_match_scoped(&self) -> bool {
        matches!(
            self,
            Self::MatchFetchFailed { .. }
                | Self::RequesterNotFound { .. }
                | Self::MalformedMatchPayload { .. }
                | Self::MatchTaskFailed { .. }
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRegion(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::AccountResolutionFailed(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                StatusCode::NOT_FOUND
            }
            Self::AccountResolutionFailed(_) | Self::MatchListFailed(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Upstream failures only expose the resource and status, never a body.
        let error = match &self {
            Self::AccountResolutionFailed(_) if status == StatusCode::NOT_FOUND => {
                "Account not found".to_string()
            }
            Self::AccountResolutionFailed(_) => "Account lookup failed upstream".to_string(),
            Self::MatchListFailed(_) => "Match listing failed upstream".to_string(),
            Self::InvalidRegion(_) | Self::InvalidRequest(_) => self.to_string(),
            _ => {
                tracing::error!(error = %self, "❌ Internal error");
                "An internal error occurred".to_string()
            }
        };

        let body = ErrorResponse {
            error,
            code: self.kind(),
        };

        (status, Json(body)).into_response()
    }
}
