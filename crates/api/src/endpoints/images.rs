//! Listing image endpoints (broker).

use axum::{Json, Router, extract::State, routing::post};
use bizlist_common::AppResult;
use bizlist_core::AddImageInput;
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{Ack, ApiResponse, ack},
    views::ImageView,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListRequest {
    listing_id: String,
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<Vec<ImageView>>> {
    let images = state.image_service.list(&user, &req.listing_id).await?;
    Ok(ApiResponse::ok(images.into_iter().map(Into::into).collect()))
}

async fn add(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AddImageInput>,
) -> AppResult<ApiResponse<ImageView>> {
    let image = state.image_service.add(&user, input).await?;
    Ok(ApiResponse::ok(image.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest {
    image_id: String,
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> AppResult<ApiResponse<Ack>> {
    state.image_service.delete(&user, &req.image_id).await?;
    Ok(ack())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderRequest {
    listing_id: String,
    image_ids: Vec<String>,
}

async fn reorder(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> AppResult<ApiResponse<Vec<ImageView>>> {
    let images = state
        .image_service
        .reorder(&user, &req.listing_id, req.image_ids)
        .await?;
    Ok(ApiResponse::ok(images.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list))
        .route("/add", post(add))
        .route("/delete", post(delete))
        .route("/reorder", post(reorder))
}
