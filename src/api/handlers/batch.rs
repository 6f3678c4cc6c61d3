use axum::Json;
use axum::extract::{Query, State};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{BatchQuery, BatchRequest, validate_symbols};
use crate::chain::{BatchResult, expiry_filter};

/// Fetch many symbols at once. Per-symbol failures are reported inside a 200.
pub async fn batch(
    State(state): State<AppState>,
    Query(query): Query<BatchQuery>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResult>, ApiError> {
    let (symbols, body_expiry) = req.into_parts();
    let limits = state.service.batch_config();
    validate_symbols(&symbols, limits.max_symbols)?;

    let expiry =
        expiry_filter(body_expiry.as_deref()).or(expiry_filter(query.expiry.as_deref()));
    let concurrency = query.concurrency.unwrap_or(limits.default_concurrency);

    let results = state
        .service
        .batch_fetch(&symbols, expiry, concurrency)
        .await;
    Ok(Json(results))
}
