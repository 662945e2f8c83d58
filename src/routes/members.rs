use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::Value;

use crate::{
    dto::members::RegisterMemberRequest,
    error::AppResult,
    models::Member,
    response::{ApiResponse, Meta},
    services::member_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_member))
        .route("/register/success", get(register_success))
}

#[utoipa::path(post, path = "/api/members", tag = "Members")]
pub async fn register_member(
    State(state): State<AppState>,
    Json(payload): Json<RegisterMemberRequest>,
) -> AppResult<Json<ApiResponse<Member>>> {
    let response = member_service::register_member(&state, payload, Utc::now()).await?;
    Ok(Json(response))
}

/// Static landing payload shown after a successful registration.
#[utoipa::path(get, path = "/api/members/register/success", tag = "Members")]
pub async fn register_success() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(
        "Registration received",
        serde_json::json!({ "detail": "Your registration is awaiting approval." }),
        Some(Meta::empty()),
    ))
}
