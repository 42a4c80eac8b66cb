//! Session Routes
//!
//! - GET /api/me - Identity and projects of the current visitor

use axum::Json;

use crate::api::dto::{BaseResponse, MeResponse};

/// GET /api/me
///
/// Sign-in is handled outside this service, so every visitor reaching it is
/// anonymous.
pub async fn get_me() -> Json<BaseResponse<MeResponse>> {
    Json(BaseResponse::ok(MeResponse::anonymous()))
}
