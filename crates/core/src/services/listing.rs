//! Listing service.

use std::collections::{HashMap, HashSet};

use bizlist_common::{AppError, AppResult, IdGenerator, UnknownCategoryPolicy, config::SearchConfig};
use bizlist_db::{
    entities::{
        category, highlight,
        listing::{self, ListingStatus, PriceType},
        listing_image, user,
    },
    repositories::{
        CategoryRepository, HighlightRepository, ListingFilter, ListingImageRepository,
        ListingRepository, ListingSort,
    },
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};
use validator::Validate;

use super::listing_status::check_transition;
use super::moderation::require_broker;
use super::pagination::{Page, PageRequest};

/// Longest slug stem taken from the title.
const MAX_SLUG_STEM: usize = 80;

/// Attempts at finding an unused slug before giving up.
const SLUG_ATTEMPTS: usize = 3;

/// Content fields shared by create and update, validated as a whole.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingContent {
    #[validate(length(min = 3, max = 200))]
    pub title: String,

    #[validate(length(max = 500))]
    pub summary: String,

    #[validate(length(max = 20000))]
    pub description: String,

    #[serde(default)]
    pub category_id: Option<String>,

    #[serde(default)]
    pub price_type: PriceType,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub asking_price: Option<i64>,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub revenue: Option<i64>,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub profit: Option<i64>,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub lease_description: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub location: String,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub state: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub suburb: Option<String>,

    #[serde(default)]
    #[validate(length(max = 10))]
    pub postcode: Option<String>,
}

impl ListingContent {
    /// Trim text and drop blank optionals, then validate and apply the
    /// pricing rules. Length limits apply to the trimmed text.
    fn normalize(mut self) -> AppResult<Self> {
        self.title = self.title.trim().to_string();
        self.summary = self.summary.trim().to_string();
        self.description = self.description.trim().to_string();
        self.location = self.location.trim().to_string();
        self.category_id = blank_to_none(self.category_id);
        self.lease_description = blank_to_none(self.lease_description);
        self.state = blank_to_none(self.state);
        self.suburb = blank_to_none(self.suburb);
        self.postcode = blank_to_none(self.postcode);
        self.validate()?;

        match self.price_type {
            PriceType::Fixed if self.asking_price.is_none() => {
                return Err(AppError::Validation(
                    "A fixed-price listing needs an asking price".to_string(),
                ));
            }
            PriceType::Fixed => {}
            PriceType::Poa => self.asking_price = None,
        }

        Ok(self)
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Input for creating a listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingInput {
    #[serde(flatten)]
    pub content: ListingContent,

    /// `draft` (default) or `published`.
    #[serde(default)]
    pub status: Option<ListingStatus>,

    #[serde(default)]
    pub highlight_ids: Vec<String>,
}

/// Deserialize a field so that `null` and "absent" stay distinguishable.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update. `None` keeps the stored value; `Some(None)` clears a
/// nullable field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingInput {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub category_id: Option<Option<String>>,
    pub price_type: Option<PriceType>,
    #[serde(default, deserialize_with = "nullable")]
    pub asking_price: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub revenue: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub profit: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub lease_description: Option<Option<String>>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub suburb: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub postcode: Option<Option<String>>,
    /// Replaces the whole highlight set when present.
    pub highlight_ids: Option<Vec<String>>,
}

impl UpdateListingInput {
    fn merge_into(self, current: &listing::Model) -> ListingContent {
        ListingContent {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            summary: self.summary.unwrap_or_else(|| current.summary.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            category_id: self
                .category_id
                .unwrap_or_else(|| current.category_id.clone()),
            price_type: self.price_type.unwrap_or(current.price_type),
            asking_price: self.asking_price.unwrap_or(current.asking_price),
            revenue: self.revenue.unwrap_or(current.revenue),
            profit: self.profit.unwrap_or(current.profit),
            lease_description: self
                .lease_description
                .unwrap_or_else(|| current.lease_description.clone()),
            location: self.location.unwrap_or_else(|| current.location.clone()),
            state: self.state.unwrap_or_else(|| current.state.clone()),
            suburb: self.suburb.unwrap_or_else(|| current.suburb.clone()),
            postcode: self.postcode.unwrap_or_else(|| current.postcode.clone()),
        }
    }
}

/// Raw search parameters as received from a buyer.
#[derive(Debug, Clone, Default)]
pub struct SearchListingsInput {
    pub keyword: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    pub state: Option<String>,
    pub suburb: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub revenue_min: Option<i64>,
    pub revenue_max: Option<i64>,
    pub profit_min: Option<i64>,
    pub profit_max: Option<i64>,
    pub sort: Option<ListingSort>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// A listing with its category and ordered images, as shown in result lists.
#[derive(Debug, Clone)]
pub struct ListingSummary {
    pub listing: listing::Model,
    pub category: Option<category::Model>,
    pub images: Vec<listing_image::Model>,
}

/// A listing with everything its detail page shows.
#[derive(Debug, Clone)]
pub struct ListingDetail {
    pub listing: listing::Model,
    pub category: Option<category::Model>,
    pub images: Vec<listing_image::Model>,
    pub highlights: Vec<highlight::Model>,
}

/// Lowercase ASCII slug stem; runs of anything else collapse to one `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.truncate(MAX_SLUG_STEM);
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        "listing".to_string()
    } else {
        slug.to_string()
    }
}

/// Service for listings.
#[derive(Clone)]
pub struct ListingService {
    listing_repo: ListingRepository,
    category_repo: CategoryRepository,
    highlight_repo: HighlightRepository,
    image_repo: ListingImageRepository,
    search_config: SearchConfig,
    id_gen: IdGenerator,
}

impl ListingService {
    /// Create a new listing service.
    #[must_use]
    pub const fn new(
        listing_repo: ListingRepository,
        category_repo: CategoryRepository,
        highlight_repo: HighlightRepository,
        image_repo: ListingImageRepository,
        search_config: SearchConfig,
    ) -> Self {
        Self {
            listing_repo,
            category_repo,
            highlight_repo,
            image_repo,
            search_config,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a listing owned by `broker`.
    pub async fn create(
        &self,
        broker: &user::Model,
        input: CreateListingInput,
    ) -> AppResult<listing::Model> {
        require_broker(broker)?;
        let content = input.content.normalize()?;

        let status = input.status.unwrap_or(ListingStatus::Draft);
        if !matches!(status, ListingStatus::Draft | ListingStatus::Published) {
            return Err(AppError::Validation(format!(
                "A new listing must be draft or published, not {status}"
            )));
        }

        self.ensure_category(content.category_id.as_deref()).await?;
        let highlight_ids = self.resolve_highlights(&input.highlight_ids).await?;
        let slug = self.unique_slug(&content.title).await?;

        let now = Utc::now();
        let model = listing::ActiveModel {
            id: Set(self.id_gen.generate()),
            slug: Set(slug),
            broker_id: Set(broker.id.clone()),
            category_id: Set(content.category_id),
            title: Set(content.title),
            summary: Set(content.summary),
            description: Set(content.description),
            price_type: Set(content.price_type),
            asking_price: Set(content.asking_price),
            revenue: Set(content.revenue),
            profit: Set(content.profit),
            lease_description: Set(content.lease_description),
            location: Set(content.location),
            state: Set(content.state),
            suburb: Set(content.suburb),
            postcode: Set(content.postcode),
            status: Set(status),
            admin_removed_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            published_at: Set((status == ListingStatus::Published).then(|| now.into())),
        };

        let listing = self.listing_repo.create(model).await?;

        if !highlight_ids.is_empty() {
            self.listing_repo
                .replace_highlights(&listing.id, &highlight_ids)
                .await?;
        }

        info!(listing_id = %listing.id, broker_id = %broker.id, status = %status, "Created listing");
        Ok(listing)
    }

    /// Update the content of a listing owned by `broker`.
    ///
    /// Slug and status are never touched here.
    pub async fn update(
        &self,
        broker: &user::Model,
        listing_id: &str,
        input: UpdateListingInput,
    ) -> AppResult<listing::Model> {
        require_broker(broker)?;
        let current = self.get_owned(broker, listing_id).await?;

        let highlight_ids = input.highlight_ids.clone();
        let content = input.merge_into(&current).normalize()?;

        if content.category_id != current.category_id {
            self.ensure_category(content.category_id.as_deref()).await?;
        }
        let highlight_ids = match highlight_ids {
            Some(ids) => Some(self.resolve_highlights(&ids).await?),
            None => None,
        };

        let mut model: listing::ActiveModel = current.into();
        model.category_id = Set(content.category_id);
        model.title = Set(content.title);
        model.summary = Set(content.summary);
        model.description = Set(content.description);
        model.price_type = Set(content.price_type);
        model.asking_price = Set(content.asking_price);
        model.revenue = Set(content.revenue);
        model.profit = Set(content.profit);
        model.lease_description = Set(content.lease_description);
        model.location = Set(content.location);
        model.state = Set(content.state);
        model.suburb = Set(content.suburb);
        model.postcode = Set(content.postcode);
        model.updated_at = Set(Utc::now().into());

        let listing = self.listing_repo.update(model).await?;

        if let Some(ids) = highlight_ids {
            self.listing_repo.replace_highlights(&listing.id, &ids).await?;
        }

        info!(listing_id = %listing.id, "Updated listing");
        Ok(listing)
    }

    /// Delete a listing owned by `broker`.
    pub async fn delete(&self, broker: &user::Model, listing_id: &str) -> AppResult<()> {
        require_broker(broker)?;
        let listing = self.get_owned(broker, listing_id).await?;
        self.listing_repo.delete(&listing.id).await?;

        info!(listing_id = %listing.id, broker_id = %broker.id, "Deleted listing");
        Ok(())
    }

    /// Move a listing owned by `broker` to `requested`.
    ///
    /// Fails with `InvalidTransition` when the edge is not permitted and with
    /// `Conflict` when the status changed between the read and the write.
    pub async fn change_status(
        &self,
        broker: &user::Model,
        listing_id: &str,
        requested: ListingStatus,
    ) -> AppResult<listing::Model> {
        require_broker(broker)?;
        let current = self.get_owned(broker, listing_id).await?;
        check_transition(current.status, requested)?;

        let now = Utc::now();
        let published_at = (requested == ListingStatus::Published).then_some(now);

        let updated = self
            .listing_repo
            .update_status_if(&current.id, &broker.id, current.status, requested, published_at)
            .await?;

        if updated == 0 {
            return Err(AppError::Conflict(format!(
                "Listing {listing_id} was changed by another request; reload and try again"
            )));
        }

        info!(
            listing_id = %current.id,
            from = %current.status,
            to = %requested,
            "Changed listing status"
        );

        Ok(listing::Model {
            status: requested,
            updated_at: now.into(),
            published_at: published_at.map(Into::into).or(current.published_at),
            ..current
        })
    }

    /// A listing owned by `broker`. Other brokers' listings are `NotFound`.
    pub async fn get_owned(
        &self,
        broker: &user::Model,
        listing_id: &str,
    ) -> AppResult<listing::Model> {
        self.listing_repo
            .find_owned(listing_id, &broker.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Listing not found: {listing_id}")))
    }

    /// A publicly visible listing by slug, with its detail data.
    pub async fn get_public_by_slug(&self, slug: &str) -> AppResult<ListingDetail> {
        let listing = self
            .listing_repo
            .find_by_slug(slug)
            .await?
            .filter(listing::Model::is_publicly_visible)
            .ok_or_else(|| AppError::NotFound(format!("Listing not found: {slug}")))?;

        self.load_detail(listing).await
    }

    /// A publicly visible listing by ID.
    pub async fn get_public_by_id(&self, listing_id: &str) -> AppResult<listing::Model> {
        self.listing_repo
            .find_by_id(listing_id)
            .await?
            .filter(listing::Model::is_publicly_visible)
            .ok_or_else(|| AppError::NotFound(format!("Listing not found: {listing_id}")))
    }

    /// The broker's own listings in any status, including moderated ones.
    pub async fn list_mine(
        &self,
        broker: &user::Model,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> AppResult<Page<ListingSummary>> {
        let req = PageRequest::new(page, page_size, self.search_config.default_page_size);

        let total = self.listing_repo.count_by_broker(&broker.id).await?;
        let listings = self
            .listing_repo
            .find_by_broker(&broker.id, req.page_size, req.offset())
            .await?;

        let items = self.attach_summaries(listings).await?;
        Ok(req.into_page(items, total))
    }

    /// Public search over visible listings.
    pub async fn search(&self, input: SearchListingsInput) -> AppResult<Page<ListingSummary>> {
        let req = PageRequest::new(
            input.page,
            input.page_size,
            self.search_config.default_page_size,
        );

        let category_id = match input.category.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => {
                match self.category_repo.find_active_by_slug(slug).await? {
                    Some(category) => Some(category.id),
                    None => match self.search_config.unknown_category {
                        UnknownCategoryPolicy::Ignore => {
                            debug!(category = %slug, "Ignoring unknown category filter");
                            None
                        }
                        UnknownCategoryPolicy::MatchNothing => {
                            debug!(category = %slug, "Unknown category matches nothing");
                            return Ok(req.into_page(Vec::new(), 0));
                        }
                    },
                }
            }
            _ => None,
        };

        let filter = ListingFilter {
            keyword: input.keyword,
            category_id,
            state: input.state,
            suburb: input.suburb,
            price_min: input.price_min,
            price_max: input.price_max,
            revenue_min: input.revenue_min,
            revenue_max: input.revenue_max,
            profit_min: input.profit_min,
            profit_max: input.profit_max,
        };
        let sort = input.sort.unwrap_or_default();

        let total = self.listing_repo.count(&filter).await?;
        let listings = self
            .listing_repo
            .search(&filter, sort, req.page_size, req.offset())
            .await?;

        debug!(total, page = req.page, results = listings.len(), "Listing search");

        let items = self.attach_summaries(listings).await?;
        Ok(req.into_page(items, total))
    }

    async fn load_detail(&self, listing: listing::Model) -> AppResult<ListingDetail> {
        let category = match &listing.category_id {
            Some(id) => self.category_repo.find_by_id(id).await?,
            None => None,
        };
        let images = self.image_repo.find_by_listing(&listing.id).await?;
        let highlights = self.highlight_repo.find_by_listing(&listing.id).await?;

        Ok(ListingDetail {
            listing,
            category,
            images,
            highlights,
        })
    }

    /// Batch-load categories and images for a page of listings.
    async fn attach_summaries(
        &self,
        listings: Vec<listing::Model>,
    ) -> AppResult<Vec<ListingSummary>> {
        let category_ids: Vec<String> = listings
            .iter()
            .filter_map(|l| l.category_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let categories: HashMap<String, category::Model> = self
            .category_repo
            .find_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let listing_ids: Vec<String> = listings.iter().map(|l| l.id.clone()).collect();
        let mut images: HashMap<String, Vec<listing_image::Model>> = HashMap::new();
        for image in self.image_repo.find_by_listings(&listing_ids).await? {
            images.entry(image.listing_id.clone()).or_default().push(image);
        }

        Ok(listings
            .into_iter()
            .map(|listing| ListingSummary {
                category: listing
                    .category_id
                    .as_ref()
                    .and_then(|id| categories.get(id).cloned()),
                images: images.remove(&listing.id).unwrap_or_default(),
                listing,
            })
            .collect())
    }

    async fn ensure_category(&self, category_id: Option<&str>) -> AppResult<()> {
        let Some(id) = category_id else {
            return Ok(());
        };

        match self.category_repo.find_by_id(id).await? {
            Some(category) if category.is_active => Ok(()),
            _ => Err(AppError::Validation(format!(
                "Unknown or inactive category: {id}"
            ))),
        }
    }

    /// Deduplicate and check that every requested highlight is active.
    async fn resolve_highlights(&self, ids: &[String]) -> AppResult<Vec<String>> {
        let mut seen = HashSet::new();
        let unique: Vec<String> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let found = self.highlight_repo.find_active_by_ids(&unique).await?;
        if found.len() != unique.len() {
            return Err(AppError::Validation(
                "Unknown or inactive highlight".to_string(),
            ));
        }

        Ok(unique)
    }

    async fn unique_slug(&self, title: &str) -> AppResult<String> {
        let stem = slugify(title);

        for _ in 0..SLUG_ATTEMPTS {
            let candidate = format!("{stem}-{}", self.id_gen.generate_slug_suffix());
            if self.listing_repo.find_by_slug(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }

        Err(AppError::Conflict(
            "Could not allocate a unique slug".to_string(),
        ))
    }
}
