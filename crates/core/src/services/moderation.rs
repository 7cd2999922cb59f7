//! Admin moderation: brokers and listings.

use bizlist_common::{AppError, AppResult};
use bizlist_db::{
    entities::{listing, user},
    repositories::{ListingRepository, UserRepository},
};
use tracing::info;

use super::pagination::{Page, PageRequest};

const DEFAULT_PAGE_SIZE: u64 = 20;

/// Fail with `Forbidden` unless `user` is an admin.
pub fn require_admin(user: &user::Model) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}

/// Fail with `Forbidden` unless `user` is a broker.
pub fn require_broker(user: &user::Model) -> AppResult<()> {
    if user.is_broker() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Broker account required".to_string()))
    }
}

/// Moderation service.
#[derive(Clone)]
pub struct ModerationService {
    user_repo: UserRepository,
    listing_repo: ListingRepository,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, listing_repo: ListingRepository) -> Self {
        Self {
            user_repo,
            listing_repo,
        }
    }

    /// Registered brokers, newest first.
    pub async fn list_brokers(
        &self,
        admin: &user::Model,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> AppResult<Page<user::Model>> {
        require_admin(admin)?;
        let req = PageRequest::new(page, page_size, DEFAULT_PAGE_SIZE);

        let total = self.user_repo.count_brokers().await?;
        let items = self
            .user_repo
            .find_brokers(req.page_size, req.offset())
            .await?;

        Ok(req.into_page(items, total))
    }

    /// Suspend or reinstate a broker. Suspension also ends their session.
    pub async fn set_broker_suspended(
        &self,
        admin: &user::Model,
        broker_id: &str,
        suspended: bool,
    ) -> AppResult<()> {
        require_admin(admin)?;

        let target = self.user_repo.get_by_id(broker_id).await?;
        if target.is_admin() {
            return Err(AppError::BadRequest("Admins cannot be suspended".to_string()));
        }

        self.user_repo.set_suspended(&target.id, suspended).await?;
        info!(admin_id = %admin.id, broker_id = %target.id, suspended, "Changed broker suspension");
        Ok(())
    }

    /// Every listing regardless of status or moderation, newest first.
    pub async fn list_listings(
        &self,
        admin: &user::Model,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> AppResult<Page<listing::Model>> {
        require_admin(admin)?;
        let req = PageRequest::new(page, page_size, DEFAULT_PAGE_SIZE);

        let total = self.listing_repo.count_all().await?;
        let items = self
            .listing_repo
            .find_all(req.page_size, req.offset())
            .await?;

        Ok(req.into_page(items, total))
    }

    /// Hide a listing from every public surface, or restore it.
    ///
    /// The broker-controlled status is left as it is.
    pub async fn set_listing_removed(
        &self,
        admin: &user::Model,
        listing_id: &str,
        removed: bool,
    ) -> AppResult<()> {
        require_admin(admin)?;

        if !self.listing_repo.set_admin_removed(listing_id, removed).await? {
            return Err(AppError::NotFound(format!("Listing not found: {listing_id}")));
        }

        info!(admin_id = %admin.id, listing_id = %listing_id, removed, "Changed listing moderation");
        Ok(())
    }
}
