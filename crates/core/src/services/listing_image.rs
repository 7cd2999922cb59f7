//! Listing image service.
//!
//! Image bytes are uploaded straight to object storage by the client; this
//! service only records storage keys and public URLs against a listing.

use std::collections::HashSet;

use bizlist_common::{AppError, AppResult, IdGenerator};
use bizlist_db::{
    entities::{listing_image, user},
    repositories::{ListingImageRepository, ListingRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::moderation::require_broker;

/// Maximum number of images on one listing.
pub const MAX_IMAGES_PER_LISTING: u64 = 20;

/// Input for attaching an uploaded image.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddImageInput {
    pub listing_id: String,

    #[validate(length(min = 1, max = 512))]
    pub storage_key: String,

    #[validate(url, length(max = 2048))]
    pub url: String,
}

/// Service for listing images.
#[derive(Clone)]
pub struct ListingImageService {
    image_repo: ListingImageRepository,
    listing_repo: ListingRepository,
    id_gen: IdGenerator,
}

impl ListingImageService {
    /// Create a new listing image service.
    #[must_use]
    pub const fn new(image_repo: ListingImageRepository, listing_repo: ListingRepository) -> Self {
        Self {
            image_repo,
            listing_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn ensure_owned(&self, broker: &user::Model, listing_id: &str) -> AppResult<()> {
        require_broker(broker)?;
        self.listing_repo
            .find_owned(listing_id, &broker.id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Listing not found: {listing_id}")))
    }

    /// Images of a listing owned by `broker`, in display order.
    pub async fn list(
        &self,
        broker: &user::Model,
        listing_id: &str,
    ) -> AppResult<Vec<listing_image::Model>> {
        self.ensure_owned(broker, listing_id).await?;
        self.image_repo.find_by_listing(listing_id).await
    }

    /// Append an image after the listing's current last image.
    pub async fn add(
        &self,
        broker: &user::Model,
        input: AddImageInput,
    ) -> AppResult<listing_image::Model> {
        input.validate()?;
        self.ensure_owned(broker, &input.listing_id).await?;

        let count = self.image_repo.count_by_listing(&input.listing_id).await?;
        if count >= MAX_IMAGES_PER_LISTING {
            return Err(AppError::BadRequest(format!(
                "A listing can have at most {MAX_IMAGES_PER_LISTING} images"
            )));
        }

        let position = self
            .image_repo
            .max_position(&input.listing_id)
            .await?
            .map_or(0, |max| max + 1);

        let model = listing_image::ActiveModel {
            id: Set(self.id_gen.generate()),
            listing_id: Set(input.listing_id),
            storage_key: Set(input.storage_key),
            url: Set(input.url),
            position: Set(position),
            created_at: Set(Utc::now().into()),
        };

        let image = self.image_repo.create(model).await?;
        info!(image_id = %image.id, listing_id = %image.listing_id, position, "Added listing image");
        Ok(image)
    }

    /// Remove an image from a listing owned by `broker`.
    pub async fn delete(&self, broker: &user::Model, image_id: &str) -> AppResult<()> {
        require_broker(broker)?;
        let image = self
            .image_repo
            .find_by_id(image_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image not found: {image_id}")))?;

        // Someone else's image reads as missing, like someone else's listing
        if self
            .listing_repo
            .find_owned(&image.listing_id, &broker.id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!("Image not found: {image_id}")));
        }

        self.image_repo.delete(&image.id).await?;
        info!(image_id = %image.id, listing_id = %image.listing_id, "Deleted listing image");
        Ok(())
    }

    /// Rewrite image order. `image_ids` must list every image of the listing
    /// exactly once; nothing is written otherwise.
    pub async fn reorder(
        &self,
        broker: &user::Model,
        listing_id: &str,
        image_ids: Vec<String>,
    ) -> AppResult<Vec<listing_image::Model>> {
        self.ensure_owned(broker, listing_id).await?;

        let current = self.image_repo.find_by_listing(listing_id).await?;
        let existing: HashSet<&str> = current.iter().map(|i| i.id.as_str()).collect();
        let requested: HashSet<&str> = image_ids.iter().map(String::as_str).collect();

        if requested.len() != image_ids.len() {
            return Err(AppError::BadRequest(
                "Image order contains duplicates".to_string(),
            ));
        }
        if requested != existing {
            return Err(AppError::BadRequest(
                "Image order must list every image of the listing exactly once".to_string(),
            ));
        }

        self.image_repo.reorder(listing_id, &image_ids).await?;
        info!(listing_id = %listing_id, count = image_ids.len(), "Reordered listing images");

        let mut reordered = current;
        reordered.sort_by_key(|image| {
            image_ids
                .iter()
                .position(|id| *id == image.id)
                .unwrap_or(usize::MAX)
        });
        for (position, image) in reordered.iter_mut().enumerate() {
            image.position = i32::try_from(position).unwrap_or(i32::MAX);
        }
        Ok(reordered)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bizlist_db::entities::{listing, user::UserRole};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_broker(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            password_hash: "hash".to_string(),
            token: None,
            name: "Broker".to_string(),
            agency_name: None,
            phone: None,
            role: UserRole::Broker,
            is_suspended: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_listing(id: &str) -> listing::Model {
        let now = Utc::now();
        listing::Model {
            id: id.to_string(),
            slug: format!("shop-{id}"),
            broker_id: "broker1".to_string(),
            category_id: None,
            title: "Shop".to_string(),
            summary: String::new(),
            description: String::new(),
            price_type: listing::PriceType::Poa,
            asking_price: None,
            revenue: None,
            profit: None,
            lease_description: None,
            location: "Perth".to_string(),
            state: None,
            suburb: None,
            postcode: None,
            status: listing::ListingStatus::Draft,
            admin_removed_at: None,
            created_at: now.into(),
            updated_at: now.into(),
            published_at: None,
        }
    }

    fn create_test_image(id: &str, position: i32) -> listing_image::Model {
        listing_image::Model {
            id: id.to_string(),
            listing_id: "l1".to_string(),
            storage_key: format!("listings/l1/{id}"),
            url: format!("https://cdn.example.com/listings/l1/{id}"),
            position,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: DatabaseConnection) -> ListingImageService {
        let db = Arc::new(db);
        ListingImageService::new(
            ListingImageRepository::new(Arc::clone(&db)),
            ListingRepository::new(db),
        )
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_add_appends_after_last() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_listing("l1")]])
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(2))
            }]])
            .append_query_results([[maplit::btreemap! {
                "max_position" => sea_orm::Value::Int(Some(1))
            }]])
            .append_query_results([[create_test_image("i3", 2)]])
            .into_connection();

        let svc = service(db);
        let image = svc
            .add(
                &create_test_broker("broker1"),
                AddImageInput {
                    listing_id: "l1".to_string(),
                    storage_key: "listings/l1/i3".to_string(),
                    url: "https://cdn.example.com/listings/l1/i3".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(image.position, 2);
    }

    #[tokio::test]
    async fn test_add_rejects_when_full() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_listing("l1")]])
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(20))
            }]])
            .into_connection();

        let svc = service(db);
        let result = svc
            .add(
                &create_test_broker("broker1"),
                AddImageInput {
                    listing_id: "l1".to_string(),
                    storage_key: "k".to_string(),
                    url: "https://cdn.example.com/k".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_add_to_foreign_listing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<listing::Model>::new()])
            .into_connection();

        let svc = service(db);
        let result = svc
            .add(
                &create_test_broker("intruder"),
                AddImageInput {
                    listing_id: "l1".to_string(),
                    storage_key: "k".to_string(),
                    url: "https://cdn.example.com/k".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_admin_cannot_manage_images() {
        // No query results: the role check must fail before any lookup
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let mut admin = create_test_broker("admin");
        admin.role = UserRole::Admin;

        let added = svc
            .add(
                &admin,
                AddImageInput {
                    listing_id: "l1".to_string(),
                    storage_key: "k".to_string(),
                    url: "https://cdn.example.com/k".to_string(),
                },
            )
            .await;
        assert!(matches!(added, Err(AppError::Forbidden(_))));

        let reordered = svc.reorder(&admin, "l1", vec!["i1".to_string()]).await;
        assert!(matches!(reordered, Err(AppError::Forbidden(_))));

        let deleted = svc.delete(&admin, "i1").await;
        assert!(matches!(deleted, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_reorder_rejects_missing_id_before_writing() {
        // No exec results: any write would fail the test differently
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_listing("l1")]])
            .append_query_results([[create_test_image("i1", 0), create_test_image("i2", 1)]])
            .into_connection();

        let svc = service(db);
        let result = svc
            .reorder(&create_test_broker("broker1"), "l1", vec!["i2".to_string()])
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_reorder_rejects_foreign_and_duplicate_ids() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_listing("l1")]])
            .append_query_results([[create_test_image("i1", 0), create_test_image("i2", 1)]])
            .append_query_results([[create_test_listing("l1")]])
            .append_query_results([[create_test_image("i1", 0), create_test_image("i2", 1)]])
            .into_connection();

        let svc = service(db);
        let broker = create_test_broker("broker1");

        let foreign = svc
            .reorder(&broker, "l1", vec!["i1".to_string(), "other".to_string()])
            .await;
        assert!(matches!(foreign, Err(AppError::BadRequest(_))));

        let duplicate = svc
            .reorder(
                &broker,
                "l1",
                vec!["i1".to_string(), "i1".to_string(), "i2".to_string()],
            )
            .await;
        assert!(matches!(duplicate, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_reorder_returns_new_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_listing("l1")]])
            .append_query_results([[
                create_test_image("i1", 0),
                create_test_image("i2", 1),
                create_test_image("i3", 2),
            ]])
            .append_exec_results([exec(1), exec(1), exec(1)])
            .into_connection();

        let svc = service(db);
        let result = svc
            .reorder(
                &create_test_broker("broker1"),
                "l1",
                vec!["i3".to_string(), "i1".to_string(), "i2".to_string()],
            )
            .await
            .unwrap();

        let order: Vec<_> = result.iter().map(|i| (i.id.as_str(), i.position)).collect();
        assert_eq!(order, vec![("i3", 0), ("i1", 1), ("i2", 2)]);
    }
}
