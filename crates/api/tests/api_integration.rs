//! API integration tests.
//!
//! Requests go through the real router and auth middleware; the database is
//! a sea-orm mock primed per test.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    middleware,
};
use bizlist_api::{AppState, middleware::auth_middleware, router as api_router};
use bizlist_common::config::{Config, DatabaseConfig, SearchConfig, ServerConfig};
use bizlist_db::entities::{listing, user};
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            url: "https://bizlist.example".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        search: SearchConfig::default(),
        email: None,
    }
}

fn create_test_user(role: user::UserRole) -> user::Model {
    user::Model {
        id: "u1".to_string(),
        email: "u1@example.com".to_string(),
        password_hash: "hash".to_string(),
        token: Some("valid-token".to_string()),
        name: "Sam".to_string(),
        agency_name: None,
        phone: None,
        role,
        is_suspended: false,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Router with auth middleware over the given mock database.
fn create_test_router(db: MockDatabase) -> Router {
    let db = Arc::new(db.into_connection());
    let state = AppState::new(&db, &create_test_config());

    api_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn post_json(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(post_json("/nonexistent/endpoint", None, "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app.oneshot(post_json("/auth/me", None, "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_me_with_token() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user(user::UserRole::Broker)]]),
    );

    let response = app
        .oneshot(post_json("/auth/me", Some("valid-token"), "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["id"], "u1");
    assert_eq!(body["data"]["role"], "broker");
    assert!(body["data"].get("passwordHash").is_none());
    assert!(body["data"].get("token").is_none());
}

#[tokio::test]
async fn test_unknown_token_is_anonymous() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()]),
    );

    let response = app
        .oneshot(post_json("/listings/create", Some("stale-token"), "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_search_empty_result() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(0))
            }]])
            .append_query_results([Vec::<listing::Model>::new()]),
    );

    let response = app
        .oneshot(post_json(
            "/listings/search",
            None,
            r#"{"keyword":"cafe","priceMin":"not a number","sort":"price_asc","page":"1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["pageSize"], 12);
    assert_eq!(body["data"]["totalPages"], 1);
    assert!(body["data"]["listings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_status_change_rejects_unknown_status() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user(user::UserRole::Broker)]]),
    );

    let response = app
        .oneshot(post_json(
            "/listings/status",
            Some("valid-token"),
            r#"{"listingId":"l1","status":"archived"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_admin_route_forbidden_for_broker() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user(user::UserRole::Broker)]]),
    );

    let response = app
        .oneshot(post_json("/admin/brokers/list", Some("valid-token"), "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_enquiry_validation() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(post_json(
            "/enquiries/create",
            None,
            r#"{"listingId":"l1","name":"Jane","email":"not-an-email","message":"hi"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_with_invalid_json_returns_error() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(post_json("/auth/register", None, "invalid json"))
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_public_category_list() {
    let now = Utc::now();
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
        bizlist_db::entities::category::Model {
            id: "c1".to_string(),
            slug: "cafes".to_string(),
            name: "Cafes".to_string(),
            description: None,
            is_active: true,
            display_order: 0,
            created_at: now.into(),
            updated_at: None,
        },
    ]]));

    let response = app
        .oneshot(post_json("/categories/list", None, "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"][0]["slug"], "cafes");
    assert_eq!(body["data"][0]["displayOrder"], 0);
}
