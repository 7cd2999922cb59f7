//! Listing repository, including the public search query builder.

use std::sync::Arc;

use bizlist_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
    sea_query::{Expr, LikeExpr, NullOrdering, extension::postgres::PgExpr},
};

use crate::entities::{Listing, ListingHighlight, listing, listing_highlight};
use listing::ListingStatus;

/// Optional filters for the public listing search.
///
/// Every present field narrows the result; absent fields contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Case-insensitive substring over title, summary and description.
    pub keyword: Option<String>,
    /// Already-resolved category ID.
    pub category_id: Option<String>,
    pub state: Option<String>,
    pub suburb: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub revenue_min: Option<i64>,
    pub revenue_max: Option<i64>,
    pub profit_min: Option<i64>,
    pub profit_max: Option<i64>,
}

/// Result ordering for the public search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingSort {
    /// Most recently published first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl ListingSort {
    /// Parse a sort key; unknown keys yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "newest" => Some(Self::Newest),
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            _ => None,
        }
    }

    fn apply(self, query: Select<Listing>) -> Select<Listing> {
        let query = match self {
            Self::Newest => query.order_by_with_nulls(
                listing::Column::PublishedAt,
                Order::Desc,
                NullOrdering::Last,
            ),
            Self::PriceAsc => query.order_by_with_nulls(
                listing::Column::AskingPrice,
                Order::Asc,
                NullOrdering::First,
            ),
            Self::PriceDesc => query.order_by_with_nulls(
                listing::Column::AskingPrice,
                Order::Desc,
                NullOrdering::Last,
            ),
        };

        // Stable tiebreak so consecutive pages never overlap
        query.order_by(listing::Column::Id, Order::Asc)
    }
}

/// Escape `LIKE` metacharacters so the input matches literally.
#[must_use]
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_ci(column: listing::Column, term: &str) -> sea_orm::sea_query::SimpleExpr {
    let pattern = format!("%{}%", escape_like(term));
    Expr::col((listing::Entity, column)).ilike(LikeExpr::new(pattern).escape('\\'))
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Build the conjunctive search condition.
///
/// The publicly visible constraint is always present.
#[must_use]
pub fn build_search_condition(filter: &ListingFilter) -> Condition {
    let mut condition = Condition::all()
        .add(listing::Column::Status.eq(ListingStatus::Published))
        .add(listing::Column::AdminRemovedAt.is_null());

    if let Some(keyword) = non_blank(filter.keyword.as_ref()) {
        condition = condition.add(
            Condition::any()
                .add(contains_ci(listing::Column::Title, keyword))
                .add(contains_ci(listing::Column::Summary, keyword))
                .add(contains_ci(listing::Column::Description, keyword)),
        );
    }

    if let Some(category_id) = &filter.category_id {
        condition = condition.add(listing::Column::CategoryId.eq(category_id.as_str()));
    }

    if let Some(state) = non_blank(filter.state.as_ref()) {
        condition = condition.add(listing::Column::State.eq(state));
    }

    if let Some(suburb) = non_blank(filter.suburb.as_ref()) {
        condition = condition.add(contains_ci(listing::Column::Suburb, suburb));
    }

    let ranges = [
        (listing::Column::AskingPrice, filter.price_min, filter.price_max),
        (listing::Column::Revenue, filter.revenue_min, filter.revenue_max),
        (listing::Column::Profit, filter.profit_min, filter.profit_max),
    ];
    for (column, min, max) in ranges {
        condition = condition
            .add_option(min.map(|v| column.gte(v)))
            .add_option(max.map(|v| column.lte(v)));
    }

    condition
}

/// Repository for listing operations.
#[derive(Clone)]
pub struct ListingRepository {
    db: Arc<DatabaseConnection>,
}

impl ListingRepository {
    /// Create a new listing repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find listing by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<listing::Model>> {
        Listing::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a listing owned by the given broker.
    ///
    /// Listings owned by someone else resolve to `None`, like missing ones.
    pub async fn find_owned(
        &self,
        id: &str,
        broker_id: &str,
    ) -> AppResult<Option<listing::Model>> {
        Listing::find_by_id(id)
            .filter(listing::Column::BrokerId.eq(broker_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find listing by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<listing::Model>> {
        Listing::find()
            .filter(listing::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Listings owned by a broker, most recently updated first.
    pub async fn find_by_broker(
        &self,
        broker_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<listing::Model>> {
        Listing::find()
            .filter(listing::Column::BrokerId.eq(broker_id))
            .order_by_desc(listing::Column::UpdatedAt)
            .order_by_asc(listing::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count listings owned by a broker.
    pub async fn count_by_broker(&self, broker_id: &str) -> AppResult<u64> {
        Listing::find()
            .filter(listing::Column::BrokerId.eq(broker_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All listings for moderation, newest first.
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<Vec<listing::Model>> {
        Listing::find()
            .order_by_desc(listing::Column::CreatedAt)
            .order_by_asc(listing::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all listings.
    pub async fn count_all(&self) -> AppResult<u64> {
        Listing::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// One page of publicly visible listings matching the filter.
    pub async fn search(
        &self,
        filter: &ListingFilter,
        sort: ListingSort,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<listing::Model>> {
        let query = Listing::find().filter(build_search_condition(filter));

        sort.apply(query)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Total number of publicly visible listings matching the filter.
    pub async fn count(&self, filter: &ListingFilter) -> AppResult<u64> {
        Listing::find()
            .filter(build_search_condition(filter))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new listing.
    pub async fn create(&self, model: listing::ActiveModel) -> AppResult<listing::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a listing.
    pub async fn update(&self, model: listing::ActiveModel) -> AppResult<listing::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a listing. Images, highlights and enquiries cascade.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Listing::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Write a new status only if the row still carries `expected`.
    ///
    /// `published_at` is stamped when given. Returns the number of rows
    /// updated: zero means the listing changed (or vanished) since it was read.
    pub async fn update_status_if(
        &self,
        id: &str,
        broker_id: &str,
        expected: ListingStatus,
        new_status: ListingStatus,
        published_at: Option<chrono::DateTime<Utc>>,
    ) -> AppResult<u64> {
        let mut update = Listing::update_many()
            .col_expr(listing::Column::Status, Expr::value(new_status))
            .col_expr(listing::Column::UpdatedAt, Expr::value(Utc::now()));

        if let Some(at) = published_at {
            update = update.col_expr(listing::Column::PublishedAt, Expr::value(at));
        }

        let result = update
            .filter(listing::Column::Id.eq(id))
            .filter(listing::Column::BrokerId.eq(broker_id))
            .filter(listing::Column::Status.eq(expected))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Set or clear the moderation flag. Returns `false` when no listing matched.
    pub async fn set_admin_removed(&self, id: &str, removed: bool) -> AppResult<bool> {
        let removed_at = removed.then(Utc::now);

        let result = Listing::update_many()
            .col_expr(listing::Column::AdminRemovedAt, Expr::value(removed_at))
            .col_expr(listing::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(listing::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Replace the listing's highlight set.
    pub async fn replace_highlights(
        &self,
        listing_id: &str,
        highlight_ids: &[String],
    ) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        ListingHighlight::delete_many()
            .filter(listing_highlight::Column::ListingId.eq(listing_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !highlight_ids.is_empty() {
            let rows = highlight_ids
                .iter()
                .map(|highlight_id| listing_highlight::ActiveModel {
                    listing_id: sea_orm::Set(listing_id.to_string()),
                    highlight_id: sea_orm::Set(highlight_id.clone()),
                });

            ListingHighlight::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    fn create_test_listing(id: &str, status: ListingStatus) -> listing::Model {
        let now = Utc::now();
        listing::Model {
            id: id.to_string(),
            slug: format!("corner-cafe-{id}"),
            broker_id: "broker1".to_string(),
            category_id: None,
            title: "Corner Cafe".to_string(),
            summary: "Busy cafe".to_string(),
            description: "Long established".to_string(),
            price_type: listing::PriceType::Fixed,
            asking_price: Some(250_000),
            revenue: None,
            profit: None,
            lease_description: None,
            location: "Fitzroy VIC".to_string(),
            state: Some("VIC".to_string()),
            suburb: Some("Fitzroy".to_string()),
            postcode: None,
            status,
            admin_removed_at: None,
            created_at: now.into(),
            updated_at: now.into(),
            published_at: Some(now.into()),
        }
    }

    fn sql_for(filter: &ListingFilter) -> String {
        Listing::find()
            .filter(build_search_condition(filter))
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50% off"), "50\\% off");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_empty_filter_has_only_visibility_constraint() {
        let sql = sql_for(&ListingFilter::default());

        assert!(sql.contains(r#""listing"."status" = 'published'"#));
        assert!(sql.contains(r#""listing"."admin_removed_at" IS NULL"#));
        assert!(!sql.contains("ILIKE"));
        assert!(!sql.contains(">="));
    }

    #[test]
    fn test_keyword_matches_any_text_column() {
        let sql = sql_for(&ListingFilter {
            keyword: Some("cafe".to_string()),
            ..Default::default()
        });

        assert!(sql.contains(r#""listing"."title" ILIKE"#));
        assert!(sql.contains(r#""listing"."summary" ILIKE"#));
        assert!(sql.contains(r#""listing"."description" ILIKE"#));
        assert!(sql.contains(" OR "));
    }

    #[test]
    fn test_blank_keyword_is_ignored() {
        let sql = sql_for(&ListingFilter {
            keyword: Some("   ".to_string()),
            ..Default::default()
        });

        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn test_state_exact_and_suburb_substring() {
        let sql = sql_for(&ListingFilter {
            state: Some("NSW".to_string()),
            suburb: Some("surry".to_string()),
            ..Default::default()
        });

        assert!(sql.contains(r#""listing"."state" = 'NSW'"#));
        assert!(sql.contains(r#""listing"."suburb" ILIKE"#));
        assert!(sql.contains("surry"));
    }

    #[test]
    fn test_ranges_are_inclusive() {
        let sql = sql_for(&ListingFilter {
            price_min: Some(100_000),
            price_max: Some(500_000),
            profit_min: Some(50_000),
            ..Default::default()
        });

        assert!(sql.contains(r#""listing"."asking_price" >= 100000"#));
        assert!(sql.contains(r#""listing"."asking_price" <= 500000"#));
        assert!(sql.contains(r#""listing"."profit" >= 50000"#));
        assert!(!sql.contains(r#""listing"."revenue""#));
    }

    #[test]
    fn test_category_filter() {
        let sql = sql_for(&ListingFilter {
            category_id: Some("cat1".to_string()),
            ..Default::default()
        });

        assert!(sql.contains(r#""listing"."category_id" = 'cat1'"#));
    }

    #[test]
    fn test_sort_orders_break_ties_by_id() {
        let newest = ListingSort::Newest
            .apply(Listing::find())
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(newest.contains(r#"ORDER BY "listing"."published_at" DESC NULLS LAST, "listing"."id" ASC"#));

        let cheapest = ListingSort::PriceAsc
            .apply(Listing::find())
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(cheapest.contains(r#""listing"."asking_price" ASC NULLS FIRST"#));

        let dearest = ListingSort::PriceDesc
            .apply(Listing::find())
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(dearest.contains(r#""listing"."asking_price" DESC NULLS LAST"#));
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(ListingSort::parse("price_asc"), Some(ListingSort::PriceAsc));
        assert_eq!(ListingSort::parse("newest"), Some(ListingSort::Newest));
        assert_eq!(ListingSort::parse("cheapest"), None);
    }

    #[tokio::test]
    async fn test_search_returns_page() {
        let l1 = create_test_listing("l1", ListingStatus::Published);
        let l2 = create_test_listing("l2", ListingStatus::Published);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[l1, l2]])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let result = repo
            .search(&ListingFilter::default(), ListingSort::Newest, 12, 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(25))
                }]])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        assert_eq!(repo.count(&ListingFilter::default()).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_find_owned_other_broker_is_none() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<listing::Model>::new()])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let result = repo.find_owned("l1", "someone-else").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_status_if_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let updated = repo
            .update_status_if(
                "l1",
                "broker1",
                ListingStatus::Draft,
                ListingStatus::Published,
                Some(Utc::now()),
            )
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let stale = repo
            .update_status_if(
                "l1",
                "broker1",
                ListingStatus::Draft,
                ListingStatus::Published,
                None,
            )
            .await
            .unwrap();
        assert_eq!(stale, 0);
    }

    #[tokio::test]
    async fn test_set_admin_removed() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        assert!(repo.set_admin_removed("l1", true).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_highlights() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 3,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2,
                    },
                ])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        repo.replace_highlights("l1", &["h1".to_string(), "h2".to_string()])
            .await
            .unwrap();
    }
}
