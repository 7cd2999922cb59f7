//! Listing image repository.

use std::sync::Arc;

use bizlist_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};

use crate::entities::{ListingImage, listing_image};

/// Repository for listing images.
#[derive(Clone)]
pub struct ListingImageRepository {
    db: Arc<DatabaseConnection>,
}

impl ListingImageRepository {
    /// Create a new listing image repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find image by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<listing_image::Model>> {
        ListingImage::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Images of a listing in display order.
    pub async fn find_by_listing(&self, listing_id: &str) -> AppResult<Vec<listing_image::Model>> {
        ListingImage::find()
            .filter(listing_image::Column::ListingId.eq(listing_id))
            .order_by_asc(listing_image::Column::Position)
            .order_by_asc(listing_image::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Images of several listings, grouped by listing and in display order.
    pub async fn find_by_listings(
        &self,
        listing_ids: &[String],
    ) -> AppResult<Vec<listing_image::Model>> {
        if listing_ids.is_empty() {
            return Ok(vec![]);
        }

        ListingImage::find()
            .filter(listing_image::Column::ListingId.is_in(listing_ids.to_vec()))
            .order_by_asc(listing_image::Column::ListingId)
            .order_by_asc(listing_image::Column::Position)
            .order_by_asc(listing_image::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count images attached to a listing.
    pub async fn count_by_listing(&self, listing_id: &str) -> AppResult<u64> {
        ListingImage::find()
            .filter(listing_image::Column::ListingId.eq(listing_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Highest position currently used by the listing, if it has any images.
    pub async fn max_position(&self, listing_id: &str) -> AppResult<Option<i32>> {
        ListingImage::find()
            .select_only()
            .column_as(listing_image::Column::Position.max(), "max_position")
            .filter(listing_image::Column::ListingId.eq(listing_id))
            .into_tuple::<Option<i32>>()
            .one(self.db.as_ref())
            .await
            .map(Option::flatten)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new image row.
    pub async fn create(
        &self,
        model: listing_image::ActiveModel,
    ) -> AppResult<listing_image::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an image row.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = ListingImage::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Rewrite positions to `0..n` following `ordered_ids`, atomically.
    ///
    /// Any failed row update rolls the whole reorder back.
    pub async fn reorder(&self, listing_id: &str, ordered_ids: &[String]) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for (position, image_id) in ordered_ids.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| AppError::BadRequest("Too many images".to_string()))?;

            let result = ListingImage::update_many()
                .col_expr(listing_image::Column::Position, Expr::value(position))
                .filter(listing_image::Column::Id.eq(image_id.as_str()))
                .filter(listing_image::Column::ListingId.eq(listing_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            if result.rows_affected == 0 {
                // Dropping the transaction rolls it back
                return Err(AppError::Conflict(format!(
                    "Image {image_id} no longer belongs to listing {listing_id}"
                )));
            }
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(listing_id = %listing_id, count = ordered_ids.len(), "Reordered listing images");
        Ok(())
    }
}
