//! API endpoints.

mod admin;
mod auth;
mod categories;
mod enquiries;
mod highlights;
mod images;
mod listings;

use axum::Router;
use serde::Deserialize;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/listings", listings::router())
        .nest("/listings/images", images::router())
        .nest("/categories", categories::router())
        .nest("/highlights", highlights::router())
        .nest("/enquiries", enquiries::router())
        .nest("/admin", admin::router())
}

/// Pagination parameters shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageParams {
    page: Option<u64>,
    page_size: Option<u64>,
}
