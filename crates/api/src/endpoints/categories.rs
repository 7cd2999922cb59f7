//! Public category list.

use axum::{Router, extract::State, routing::post};
use bizlist_common::AppResult;

use crate::{middleware::AppState, response::ApiResponse, views::CategoryView};

async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<CategoryView>>> {
    let categories = state.category_service.list_active().await?;
    Ok(ApiResponse::ok(
        categories.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/list", post(list))
}
