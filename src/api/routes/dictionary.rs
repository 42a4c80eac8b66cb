//! Dictionary Routes
//!
//! - GET /api/dictionary - Route description for the dashboard router

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::BaseResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dictionary::PageDictionary;

/// GET /api/dictionary
///
/// Generates (or serves the cached) page dictionary. Template reads are
/// blocking file I/O, so generation runs on the blocking pool.
pub async fn get_dictionary(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BaseResponse<PageDictionary>>> {
    let source = state.dictionary.clone();

    let dictionary = tokio::task::spawn_blocking(move || source.generate())
        .await
        .map_err(|e| ApiError::Internal(format!("Dictionary task failed: {}", e)))??;

    Ok(Json(BaseResponse::ok(dictionary)))
}
