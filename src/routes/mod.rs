use axum::Router;

use crate::state::AppState;

pub mod doc;
pub mod health;
pub mod invoices;
pub mod members;
pub mod orchestras;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/invoices", invoices::router())
        .nest("/members", members::router())
        .nest("/orchestras", orchestras::router())
}
