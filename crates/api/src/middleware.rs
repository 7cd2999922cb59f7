//! Shared state and request middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use bizlist_common::Config;
use bizlist_core::{
    CategoryService, EmailService, EnquiryService, HighlightService, ListingImageService,
    ListingService, ModerationService, UserService,
};
use bizlist_db::repositories::{
    CategoryRepository, EnquiryRepository, HighlightRepository, ListingImageRepository,
    ListingRepository, UserRepository,
};
use sea_orm::DatabaseConnection;
use tracing::debug;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub listing_service: ListingService,
    pub image_service: ListingImageService,
    pub category_service: CategoryService,
    pub highlight_service: HighlightService,
    pub enquiry_service: EnquiryService,
    pub moderation_service: ModerationService,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: &Arc<DatabaseConnection>, config: &Config) -> Self {
        let user_repo = UserRepository::new(Arc::clone(db));
        let listing_repo = ListingRepository::new(Arc::clone(db));
        let image_repo = ListingImageRepository::new(Arc::clone(db));
        let category_repo = CategoryRepository::new(Arc::clone(db));
        let highlight_repo = HighlightRepository::new(Arc::clone(db));
        let enquiry_repo = EnquiryRepository::new(Arc::clone(db));

        let email_service = EmailService::new(config.email.clone(), config.server.url.clone());

        Self {
            user_service: UserService::new(user_repo.clone()),
            listing_service: ListingService::new(
                listing_repo.clone(),
                category_repo.clone(),
                highlight_repo.clone(),
                image_repo.clone(),
                config.search.clone(),
            ),
            image_service: ListingImageService::new(image_repo, listing_repo.clone()),
            category_service: CategoryService::new(category_repo),
            highlight_service: HighlightService::new(highlight_repo),
            enquiry_service: EnquiryService::new(
                enquiry_repo,
                listing_repo.clone(),
                user_repo.clone(),
                email_service,
            ),
            moderation_service: ModerationService::new(user_repo, listing_repo),
        }
    }
}

/// Resolve `Authorization: Bearer <token>` to a user.
///
/// Requests without a valid token pass through anonymously; handlers that
/// need a caller reject them through [`AuthUser`](crate::extractors::AuthUser).
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    if let Some(token) = token {
        match state.user_service.authenticate_by_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => debug!(error = %e, "Bearer token rejected"),
        }
    }

    next.run(req).await
}
