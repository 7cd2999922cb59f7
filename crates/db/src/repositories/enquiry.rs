//! Enquiry repository.

use std::sync::Arc;

use bizlist_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

use crate::entities::{Enquiry, enquiry};

/// Repository for buyer enquiries.
#[derive(Clone)]
pub struct EnquiryRepository {
    db: Arc<DatabaseConnection>,
}

impl EnquiryRepository {
    /// Create a new enquiry repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find enquiry by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<enquiry::Model>> {
        Enquiry::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new enquiry.
    pub async fn create(&self, model: enquiry::ActiveModel) -> AppResult<enquiry::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A broker's inbox, newest first.
    pub async fn find_by_broker(
        &self,
        broker_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<enquiry::Model>> {
        Enquiry::find()
            .filter(enquiry::Column::BrokerId.eq(broker_id))
            .order_by_desc(enquiry::Column::CreatedAt)
            .order_by_desc(enquiry::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count enquiries addressed to a broker.
    pub async fn count_by_broker(&self, broker_id: &str) -> AppResult<u64> {
        Enquiry::find()
            .filter(enquiry::Column::BrokerId.eq(broker_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every enquiry, newest first.
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<Vec<enquiry::Model>> {
        Enquiry::find()
            .order_by_desc(enquiry::Column::CreatedAt)
            .order_by_desc(enquiry::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all enquiries.
    pub async fn count_all(&self) -> AppResult<u64> {
        Enquiry::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark an enquiry read, scoped to its broker.
    ///
    /// Returns `false` when nothing matched (missing or someone else's).
    pub async fn mark_read(&self, id: &str, broker_id: &str) -> AppResult<bool> {
        let result = Enquiry::update_many()
            .col_expr(enquiry::Column::IsRead, Expr::value(true))
            .filter(enquiry::Column::Id.eq(id))
            .filter(enquiry::Column::BrokerId.eq(broker_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Delete an enquiry.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Enquiry::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}
