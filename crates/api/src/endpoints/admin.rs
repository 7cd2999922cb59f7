//! Admin endpoints: brokers, listing moderation, taxonomy and enquiries.
//!
//! Role checks happen in the services; every handler only needs a caller.

use axum::{Json, Router, extract::State, routing::post};
use bizlist_common::AppResult;
use bizlist_core::{CreateCategoryInput, Page, UpdateCategoryInput};
use serde::Deserialize;

use super::PageParams;
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{Ack, ApiResponse, ack},
    views::{CategoryView, EnquiryView, HighlightView, ListingView, UserView},
};

// === Brokers ===

async fn list_brokers(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(params): Json<PageParams>,
) -> AppResult<ApiResponse<Page<UserView>>> {
    let page = state
        .moderation_service
        .list_brokers(&admin, params.page, params.page_size)
        .await?;
    Ok(ApiResponse::ok(page.map(Into::into)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrokerRequest {
    user_id: String,
}

async fn suspend_broker(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BrokerRequest>,
) -> AppResult<ApiResponse<Ack>> {
    state
        .moderation_service
        .set_broker_suspended(&admin, &req.user_id, true)
        .await?;
    Ok(ack())
}

async fn unsuspend_broker(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BrokerRequest>,
) -> AppResult<ApiResponse<Ack>> {
    state
        .moderation_service
        .set_broker_suspended(&admin, &req.user_id, false)
        .await?;
    Ok(ack())
}

// === Listings ===

async fn list_listings(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(params): Json<PageParams>,
) -> AppResult<ApiResponse<Page<ListingView>>> {
    let page = state
        .moderation_service
        .list_listings(&admin, params.page, params.page_size)
        .await?;
    Ok(ApiResponse::ok(page.map(Into::into)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingRequest {
    listing_id: String,
}

async fn remove_listing(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListingRequest>,
) -> AppResult<ApiResponse<Ack>> {
    state
        .moderation_service
        .set_listing_removed(&admin, &req.listing_id, true)
        .await?;
    Ok(ack())
}

async fn restore_listing(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListingRequest>,
) -> AppResult<ApiResponse<Ack>> {
    state
        .moderation_service
        .set_listing_removed(&admin, &req.listing_id, false)
        .await?;
    Ok(ack())
}

// === Categories ===

async fn list_categories(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryView>>> {
    let categories = state.category_service.list_all(&admin).await?;
    Ok(ApiResponse::ok(categories.into_iter().map(Into::into).collect()))
}

async fn create_category(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<ApiResponse<CategoryView>> {
    let category = state.category_service.create(&admin, input).await?;
    Ok(ApiResponse::ok(category.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCategoryRequest {
    category_id: String,
    #[serde(flatten)]
    input: UpdateCategoryInput,
}

async fn update_category(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateCategoryRequest>,
) -> AppResult<ApiResponse<CategoryView>> {
    let category = state
        .category_service
        .update(&admin, &req.category_id, req.input)
        .await?;
    Ok(ApiResponse::ok(category.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetCategoryActiveRequest {
    category_id: String,
    is_active: bool,
}

async fn set_category_active(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SetCategoryActiveRequest>,
) -> AppResult<ApiResponse<CategoryView>> {
    let category = state
        .category_service
        .set_active(&admin, &req.category_id, req.is_active)
        .await?;
    Ok(ApiResponse::ok(category.into()))
}

// === Highlights ===

async fn list_highlights(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<HighlightView>>> {
    let highlights = state.highlight_service.list_all(&admin).await?;
    Ok(ApiResponse::ok(highlights.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
struct CreateHighlightRequest {
    label: String,
}

async fn create_highlight(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateHighlightRequest>,
) -> AppResult<ApiResponse<HighlightView>> {
    let highlight = state.highlight_service.create(&admin, &req.label).await?;
    Ok(ApiResponse::ok(highlight.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateHighlightRequest {
    highlight_id: String,
    label: String,
}

async fn update_highlight(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateHighlightRequest>,
) -> AppResult<ApiResponse<HighlightView>> {
    let highlight = state
        .highlight_service
        .update_label(&admin, &req.highlight_id, &req.label)
        .await?;
    Ok(ApiResponse::ok(highlight.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetHighlightActiveRequest {
    highlight_id: String,
    is_active: bool,
}

async fn set_highlight_active(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SetHighlightActiveRequest>,
) -> AppResult<ApiResponse<HighlightView>> {
    let highlight = state
        .highlight_service
        .set_active(&admin, &req.highlight_id, req.is_active)
        .await?;
    Ok(ApiResponse::ok(highlight.into()))
}

// === Enquiries ===

async fn list_enquiries(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(params): Json<PageParams>,
) -> AppResult<ApiResponse<Page<EnquiryView>>> {
    let page = state
        .enquiry_service
        .list_all(&admin, params.page, params.page_size)
        .await?;
    Ok(ApiResponse::ok(page.map(Into::into)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnquiryRequest {
    enquiry_id: String,
}

async fn delete_enquiry(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<EnquiryRequest>,
) -> AppResult<ApiResponse<Ack>> {
    state.enquiry_service.delete(&admin, &req.enquiry_id).await?;
    Ok(ack())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/brokers/list", post(list_brokers))
        .route("/brokers/suspend", post(suspend_broker))
        .route("/brokers/unsuspend", post(unsuspend_broker))
        .route("/listings/list", post(list_listings))
        .route("/listings/remove", post(remove_listing))
        .route("/listings/restore", post(restore_listing))
        .route("/categories/list", post(list_categories))
        .route("/categories/create", post(create_category))
        .route("/categories/update", post(update_category))
        .route("/categories/set-active", post(set_category_active))
        .route("/highlights/list", post(list_highlights))
        .route("/highlights/create", post(create_highlight))
        .route("/highlights/update", post(update_highlight))
        .route("/highlights/set-active", post(set_highlight_active))
        .route("/enquiries/list", post(list_enquiries))
        .route("/enquiries/delete", post(delete_enquiry))
}
