use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::ExpiryQuery;
use crate::chain::{ParsedChain, canonical_symbol, expiry_filter};
use crate::export::{chain_to_csv, download_filename};

/// Calls, puts, summary, underlying and expiry dates for one symbol.
pub async fn option_chain(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ExpiryQuery>,
) -> Result<Json<Arc<ParsedChain>>, ApiError> {
    let symbol = path_symbol(&symbol)?;
    let chain = state
        .service
        .get_parsed_chain(&symbol, expiry_filter(query.expiry.as_deref()), None)
        .await?;
    Ok(Json(chain))
}

/// CSV attachment with calls and puts side by side.
pub async fn download_csv(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ExpiryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let symbol = path_symbol(&symbol)?;
    let expiry = expiry_filter(query.expiry.as_deref());
    let chain = state.service.get_parsed_chain(&symbol, expiry, None).await?;
    let body = chain_to_csv(&chain)?;

    let disposition = format!("attachment; filename={}", download_filename(&symbol, expiry));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

fn path_symbol(raw: &str) -> Result<String, ApiError> {
    canonical_symbol(raw).ok_or_else(|| ApiError::BadRequest("symbol is blank".into()))
}
