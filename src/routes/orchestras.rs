use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::members::{ApproveMembersRequest, MemberList, OrchestraInvoiceData},
    error::AppResult,
    response::ApiResponse,
    services::member_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/members/approve", post(approve_members))
        .route("/{id}/invoice-data", get(invoice_data))
}

#[utoipa::path(post, path = "/api/orchestras/{id}/members/approve", tag = "Orchestras")]
pub async fn approve_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveMembersRequest>,
) -> AppResult<Json<ApiResponse<MemberList>>> {
    let response = member_service::approve_members(&state, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/api/orchestras/{id}/invoice-data", tag = "Orchestras")]
pub async fn invoice_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrchestraInvoiceData>>> {
    let response = member_service::orchestra_invoice_data(&state, id).await?;
    Ok(Json(response))
}
