//! Highlight repository.

use std::sync::Arc;

use bizlist_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};

use crate::entities::{Highlight, highlight, listing_highlight};

/// Repository for highlight tags.
#[derive(Clone)]
pub struct HighlightRepository {
    db: Arc<DatabaseConnection>,
}

impl HighlightRepository {
    /// Create a new highlight repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find highlight by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<highlight::Model>> {
        Highlight::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find highlight by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<highlight::Model>> {
        Highlight::find()
            .filter(highlight::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the active highlights among the given IDs.
    pub async fn find_active_by_ids(&self, ids: &[String]) -> AppResult<Vec<highlight::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Highlight::find()
            .filter(highlight::Column::Id.is_in(ids.to_vec()))
            .filter(highlight::Column::IsActive.eq(true))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active highlights by label.
    pub async fn find_active(&self) -> AppResult<Vec<highlight::Model>> {
        Highlight::find()
            .filter(highlight::Column::IsActive.eq(true))
            .order_by_asc(highlight::Column::Label)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all highlights (admin view).
    pub async fn find_all(&self) -> AppResult<Vec<highlight::Model>> {
        Highlight::find()
            .order_by_asc(highlight::Column::Label)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Highlights attached to a listing.
    pub async fn find_by_listing(&self, listing_id: &str) -> AppResult<Vec<highlight::Model>> {
        Highlight::find()
            .join(
                JoinType::InnerJoin,
                highlight::Relation::ListingHighlights.def(),
            )
            .filter(listing_highlight::Column::ListingId.eq(listing_id))
            .order_by_asc(highlight::Column::Label)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new highlight.
    pub async fn create(&self, model: highlight::ActiveModel) -> AppResult<highlight::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a highlight.
    pub async fn update(&self, model: highlight::ActiveModel) -> AppResult<highlight::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
