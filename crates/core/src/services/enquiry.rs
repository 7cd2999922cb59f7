//! Enquiry service.

use bizlist_common::{AppError, AppResult, IdGenerator};
use bizlist_db::{
    entities::{enquiry, listing, user},
    repositories::{EnquiryRepository, ListingRepository, UserRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

use super::email::EmailService;
use super::moderation::require_admin;
use super::pagination::{Page, PageRequest};

const DEFAULT_PAGE_SIZE: u64 = 20;

/// Input for a buyer enquiry.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEnquiryInput {
    pub listing_id: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(min = 10, max = 5000))]
    pub message: String,
}

/// Enquiry service.
#[derive(Clone)]
pub struct EnquiryService {
    enquiry_repo: EnquiryRepository,
    listing_repo: ListingRepository,
    user_repo: UserRepository,
    email: EmailService,
    id_gen: IdGenerator,
}

impl EnquiryService {
    /// Create a new enquiry service.
    #[must_use]
    pub const fn new(
        enquiry_repo: EnquiryRepository,
        listing_repo: ListingRepository,
        user_repo: UserRepository,
        email: EmailService,
    ) -> Self {
        Self {
            enquiry_repo,
            listing_repo,
            user_repo,
            email,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record a buyer enquiry and notify the listing's broker.
    ///
    /// Only publicly visible listings accept enquiries. A failed notification
    /// is logged and does not fail the enquiry.
    pub async fn submit(&self, mut input: SubmitEnquiryInput) -> AppResult<enquiry::Model> {
        input.name = input.name.trim().to_string();
        input.email = input.email.trim().to_string();
        input.message = input.message.trim().to_string();
        input.phone = input
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        input.validate()?;

        let listing = self
            .listing_repo
            .find_by_id(&input.listing_id)
            .await?
            .filter(listing::Model::is_publicly_visible)
            .ok_or_else(|| AppError::NotFound(format!("Listing not found: {}", input.listing_id)))?;

        let model = enquiry::ActiveModel {
            id: Set(self.id_gen.generate()),
            listing_id: Set(listing.id.clone()),
            broker_id: Set(listing.broker_id.clone()),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            message: Set(input.message),
            is_read: Set(false),
            created_at: Set(Utc::now().into()),
        };

        let enquiry = self.enquiry_repo.create(model).await?;
        info!(enquiry_id = %enquiry.id, listing_id = %listing.id, "Enquiry received");

        self.notify_broker(&listing, &enquiry).await;
        Ok(enquiry)
    }

    async fn notify_broker(&self, listing: &listing::Model, enquiry: &enquiry::Model) {
        if !self.email.is_enabled() {
            return;
        }

        let broker = match self.user_repo.find_by_id(&listing.broker_id).await {
            Ok(Some(broker)) => broker,
            Ok(None) => {
                warn!(broker_id = %listing.broker_id, "Broker missing for enquiry notification");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load broker for enquiry notification");
                return;
            }
        };

        match self.email.notify_enquiry(&broker, listing, enquiry).await {
            Ok(Some(result)) if !result.success => {
                warn!(enquiry_id = %enquiry.id, error = ?result.error, "Enquiry notification rejected");
            }
            Ok(_) => {}
            Err(e) => {
                warn!(enquiry_id = %enquiry.id, error = %e, "Enquiry notification failed");
            }
        }
    }

    /// The broker's enquiries, newest first.
    pub async fn list_mine(
        &self,
        broker: &user::Model,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> AppResult<Page<enquiry::Model>> {
        let req = PageRequest::new(page, page_size, DEFAULT_PAGE_SIZE);

        let total = self.enquiry_repo.count_by_broker(&broker.id).await?;
        let items = self
            .enquiry_repo
            .find_by_broker(&broker.id, req.page_size, req.offset())
            .await?;

        Ok(req.into_page(items, total))
    }

    /// Mark one of the broker's enquiries read.
    pub async fn mark_read(&self, broker: &user::Model, enquiry_id: &str) -> AppResult<()> {
        if self.enquiry_repo.mark_read(enquiry_id, &broker.id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Enquiry not found: {enquiry_id}")))
        }
    }

    /// Every enquiry (admin).
    pub async fn list_all(
        &self,
        admin: &user::Model,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> AppResult<Page<enquiry::Model>> {
        require_admin(admin)?;
        let req = PageRequest::new(page, page_size, DEFAULT_PAGE_SIZE);

        let total = self.enquiry_repo.count_all().await?;
        let items = self
            .enquiry_repo
            .find_all(req.page_size, req.offset())
            .await?;

        Ok(req.into_page(items, total))
    }

    /// Delete an enquiry (admin).
    pub async fn delete(&self, admin: &user::Model, enquiry_id: &str) -> AppResult<()> {
        require_admin(admin)?;

        if !self.enquiry_repo.delete(enquiry_id).await? {
            return Err(AppError::NotFound(format!("Enquiry not found: {enquiry_id}")));
        }

        info!(enquiry_id = %enquiry_id, admin_id = %admin.id, "Deleted enquiry");
        Ok(())
    }
}
