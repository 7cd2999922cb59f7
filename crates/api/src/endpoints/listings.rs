//! Listing endpoints: public search and detail, broker CRUD and status.

use axum::{Json, Router, extract::State, routing::post};
use bizlist_common::AppResult;
use bizlist_core::{
    CreateListingInput, ListingSort, Page, SearchListingsInput, UpdateListingInput,
};
use bizlist_db::entities::listing::ListingStatus;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::PageParams;
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{Ack, ApiResponse, ack},
    views::{ListingDetailView, ListingSummaryView, ListingView, SearchResultsView},
};

/// A numeric filter as typed by a buyer. Anything that is not an integer,
/// either as a JSON number or a numeric string, counts as absent.
fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    keyword: Option<String>,
    category: Option<String>,
    state: Option<String>,
    suburb: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    price_min: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    price_max: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    revenue_min: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    revenue_max: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    profit_min: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    profit_max: Option<i64>,
    sort: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    page: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    page_size: Option<u64>,
}

impl From<SearchRequest> for SearchListingsInput {
    fn from(req: SearchRequest) -> Self {
        Self {
            keyword: req.keyword,
            category: req.category,
            state: req.state,
            suburb: req.suburb,
            price_min: req.price_min,
            price_max: req.price_max,
            revenue_min: req.revenue_min,
            revenue_max: req.revenue_max,
            profit_min: req.profit_min,
            profit_max: req.profit_max,
            // Unknown sort keys fall back to newest.
            sort: req.sort.as_deref().and_then(ListingSort::parse),
            page: req.page,
            page_size: req.page_size,
        }
    }
}

async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> AppResult<ApiResponse<SearchResultsView>> {
    let page = state.listing_service.search(req.into()).await?;
    Ok(ApiResponse::ok(page.into()))
}

#[derive(Debug, Deserialize)]
struct ShowRequest {
    slug: String,
}

async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<ListingDetailView>> {
    let detail = state.listing_service.get_public_by_slug(&req.slug).await?;
    Ok(ApiResponse::ok(detail.into()))
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateListingInput>,
) -> AppResult<ApiResponse<ListingView>> {
    let listing = state.listing_service.create(&user, input).await?;
    Ok(ApiResponse::ok(listing.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest {
    listing_id: String,
    #[serde(flatten)]
    input: UpdateListingInput,
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> AppResult<ApiResponse<ListingView>> {
    let listing = state
        .listing_service
        .update(&user, &req.listing_id, req.input)
        .await?;
    Ok(ApiResponse::ok(listing.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingIdRequest {
    listing_id: String,
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListingIdRequest>,
) -> AppResult<ApiResponse<Ack>> {
    state.listing_service.delete(&user, &req.listing_id).await?;
    Ok(ack())
}

async fn mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(params): Json<PageParams>,
) -> AppResult<ApiResponse<Page<ListingSummaryView>>> {
    let page = state
        .listing_service
        .list_mine(&user, params.page, params.page_size)
        .await?;
    Ok(ApiResponse::ok(page.map(Into::into)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusRequest {
    listing_id: String,
    status: String,
}

async fn change_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<StatusRequest>,
) -> AppResult<ApiResponse<ListingView>> {
    let requested: ListingStatus = req.status.trim().parse()?;
    let listing = state
        .listing_service
        .change_status(&user, &req.listing_id, requested)
        .await?;
    Ok(ApiResponse::ok(listing.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", post(search))
        .route("/show", post(show))
        .route("/create", post(create))
        .route("/update", post(update))
        .route("/delete", post(delete))
        .route("/mine", post(mine))
        .route("/status", post(change_status))
}
