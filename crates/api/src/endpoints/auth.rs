//! Broker authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use bizlist_common::AppResult;
use bizlist_core::{RegisterBrokerInput, Session, UpdateProfileInput};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{Ack, ApiResponse, ack},
    views::UserView,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    user: UserView,
    token: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user.into(),
            token: session.token,
        }
    }
}

async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterBrokerInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let session = state.user_service.register_broker(input).await?;
    Ok(ApiResponse::ok(session.into()))
}

#[derive(Debug, Deserialize)]
struct SigninRequest {
    email: String,
    password: String,
}

async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let session = state.user_service.sign_in(&req.email, &req.password).await?;
    Ok(ApiResponse::ok(session.into()))
}

async fn signout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Ack>> {
    state.user_service.sign_out(&user).await?;
    Ok(ack())
}

async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserView> {
    ApiResponse::ok(user.into())
}

async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<UserView>> {
    let user = state.user_service.update_profile(&user, input).await?;
    Ok(ApiResponse::ok(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/signin", post(signin))
        .route("/signout", post(signout))
        .route("/me", post(me))
        .route("/update-profile", post(update_profile))
}
