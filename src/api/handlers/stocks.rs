use axum::Json;
use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{MatchesResponse, StockRequest, SuccessResponse, SymbolsResponse};

pub async fn list(State(state): State<AppState>) -> Json<SymbolsResponse> {
    let inner = state.inner.read().await;
    Json(SymbolsResponse {
        symbols: inner.watchlist.symbols().to_vec(),
    })
}

pub async fn add(
    State(state): State<AppState>,
    Json(req): Json<StockRequest>,
) -> Json<SuccessResponse> {
    let mut inner = state.inner.write().await;
    Json(SuccessResponse {
        success: inner.watchlist.add(&req.stock),
    })
}

pub async fn remove(
    State(state): State<AppState>,
    Json(req): Json<StockRequest>,
) -> Json<SuccessResponse> {
    let mut inner = state.inner.write().await;
    Json(SuccessResponse {
        success: inner.watchlist.remove(&req.stock),
    })
}

pub async fn search(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Json<MatchesResponse> {
    let inner = state.inner.read().await;
    Json(MatchesResponse {
        matches: inner.watchlist.search(&query),
    })
}
