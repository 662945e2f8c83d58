use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::Utc;

use crate::{
    dto::invoices::{GenerateInvoiceRequest, InvoiceList, InvoiceWithRows},
    error::AppResult,
    models::Invoice,
    response::ApiResponse,
    routes::params::InvoiceListQuery,
    services::invoice_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices).post(generate_invoice))
        .route("/{id}", get(get_invoice))
        .route("/{id}/send", post(send_invoice))
}

#[utoipa::path(get, path = "/api/invoices", tag = "Invoices")]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<InvoiceListQuery>,
) -> AppResult<Json<ApiResponse<InvoiceList>>> {
    let response = invoice_service::list_invoices(&state, query).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/invoices", tag = "Invoices")]
pub async fn generate_invoice(
    State(state): State<AppState>,
    Json(payload): Json<GenerateInvoiceRequest>,
) -> AppResult<Json<ApiResponse<InvoiceWithRows>>> {
    let response = invoice_service::generate_invoice(&state, payload, Utc::now()).await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/api/invoices/{id}", tag = "Invoices")]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<InvoiceWithRows>>> {
    let response = invoice_service::get_invoice(&state, id).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/invoices/{id}/send", tag = "Invoices")]
pub async fn send_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Invoice>>> {
    let response = invoice_service::send_invoice(&state, id, Utc::now()).await?;
    Ok(Json(response))
}
