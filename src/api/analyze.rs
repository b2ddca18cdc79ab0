use crate::models::{AnalyzeRequest, AppState};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

// Caller-side cap; the orchestrator itself takes any batch
pub const MAX_BATCH_SIZE: usize = 50;

pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<AnalyzeRequest>,
) -> Response {
    if params.urls.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "no urls provided");
    }
    if params.urls.len() > MAX_BATCH_SIZE {
        return error_response(
            StatusCode::BAD_REQUEST,
            &format!(
                "batch too large: {} urls (max {})",
                params.urls.len(),
                MAX_BATCH_SIZE
            ),
        );
    }

    let api_key = match params.api_key.or_else(|| state.default_api_key.clone()) {
        Some(key) => key,
        None => return error_response(StatusCode::BAD_REQUEST, "no API key provided"),
    };

    info!(urls = params.urls.len(), "starting analysis batch");
    let records = state
        .pagespeed
        .run_batch(&params.urls, &api_key, params.strategy)
        .await;
    (StatusCode::OK, Json(records)).into_response()
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"status": "error", "message": message})),
    )
        .into_response()
}
