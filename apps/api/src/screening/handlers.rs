//! Axum route handlers for the Screening API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::screening::analyzer::{analyze, AnalyzeRequest, AnalyzeResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub results: Vec<AnalyzeResult>,
}

/// POST /analyze
///
/// Scores every non-blank resume against the job description.
/// Per-candidate failures come back as degraded entries inside a 200.
/// A body that cannot be read as JSON is treated as an internal error.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::Internal(anyhow::anyhow!("Unreadable request body: {e}")))?;

    let results = analyze(&request, state.model.as_ref(), state.config.llm_timeout).await?;

    Ok(Json(AnalyzeResponse { results }))
}
