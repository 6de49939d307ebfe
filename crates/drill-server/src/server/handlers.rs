//! API endpoint handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::Value;
use tracing::error;

use drill_core::{AnswerEvent, EngineError, NextQuestion};

use super::state::AppState;

/// Any engine failure is a server error; the last saved table stays valid
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] EngineError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Submit the previous answer (or `null` to start) and get the next question
pub async fn next_question(
    State(state): State<AppState>,
    Json(event): Json<Option<AnswerEvent>>,
) -> Result<Json<NextQuestion>, ApiError> {
    let mut engine = state.engine.lock().await;
    let next = engine.next(event.unwrap_or_default())?;
    Ok(Json(next))
}

/// Store counts and streak distribution
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let engine = state.engine.lock().await;
    let stats = engine.stats()?;

    Ok(Json(serde_json::json!({
        "totalItems": stats.total,
        "activeItems": stats.active,
        "masteredActive": stats.mastered_active,
        "masteredRatio": stats.mastered_ratio(),
        "activeRatio": stats.active_ratio(),
        "levels": stats.levels,
        "requiredStreak": engine.scheduler().config().required_streak,
        "historyLength": engine.session().history().len(),
        "storage": engine.storage_description(),
    })))
}

/// Liveness plus a coarse state of the table
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let engine = state.engine.lock().await;
    let stats = engine.stats()?;

    let status = if stats.total == 0 {
        "empty"
    } else if stats.active == 0 {
        "stalled"
    } else {
        "healthy"
    };

    Ok(Json(serde_json::json!({
        "status": status,
        "totalItems": stats.total,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
