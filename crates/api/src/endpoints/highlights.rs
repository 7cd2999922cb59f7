//! Public highlight list.

use axum::{Router, extract::State, routing::post};
use bizlist_common::AppResult;

use crate::{middleware::AppState, response::ApiResponse, views::HighlightView};

async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<HighlightView>>> {
    let highlights = state.highlight_service.list_active().await?;
    Ok(ApiResponse::ok(
        highlights.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/list", post(list))
}
