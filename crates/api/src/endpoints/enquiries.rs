//! Enquiry endpoints: public submission, broker inbox.

use axum::{Json, Router, extract::State, routing::post};
use bizlist_common::AppResult;
use bizlist_core::{Page, SubmitEnquiryInput};
use serde::{Deserialize, Serialize};

use super::PageParams;
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{Ack, ApiResponse, ack},
    views::EnquiryView,
};

/// What the buyer gets back; the broker's details stay private.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmittedEnquiry {
    id: String,
    listing_id: String,
    created_at: String,
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<SubmitEnquiryInput>,
) -> AppResult<ApiResponse<SubmittedEnquiry>> {
    let enquiry = state.enquiry_service.submit(input).await?;
    Ok(ApiResponse::ok(SubmittedEnquiry {
        id: enquiry.id,
        listing_id: enquiry.listing_id,
        created_at: enquiry.created_at.to_rfc3339(),
    }))
}

async fn mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(params): Json<PageParams>,
) -> AppResult<ApiResponse<Page<EnquiryView>>> {
    let page = state
        .enquiry_service
        .list_mine(&user, params.page, params.page_size)
        .await?;
    Ok(ApiResponse::ok(page.map(Into::into)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadRequest {
    enquiry_id: String,
}

async fn mark_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<MarkReadRequest>,
) -> AppResult<ApiResponse<Ack>> {
    state.enquiry_service.mark_read(&user, &req.enquiry_id).await?;
    Ok(ack())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/mine", post(mine))
        .route("/mark-read", post(mark_read))
}
