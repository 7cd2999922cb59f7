//! JSON representations returned by the endpoints.

#![allow(missing_docs)]

use bizlist_core::{ListingDetail, ListingSummary, Page};
use bizlist_db::entities::{
    category, enquiry, highlight,
    listing::{self, ListingStatus, PriceType},
    listing_image,
    user::{self, UserRole},
};
use serde::Serialize;

/// A listing's own fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    pub id: String,
    pub slug: String,
    pub broker_id: String,
    pub category_id: Option<String>,
    pub title: String,
    pub summary: String,
    pub description: String,
    pub price_type: PriceType,
    pub asking_price: Option<i64>,
    pub revenue: Option<i64>,
    pub profit: Option<i64>,
    pub lease_description: Option<String>,
    pub location: String,
    pub state: Option<String>,
    pub suburb: Option<String>,
    pub postcode: Option<String>,
    pub status: ListingStatus,
    pub admin_removed: bool,
    pub created_at: String,
    pub updated_at: String,
    pub published_at: Option<String>,
}

impl From<listing::Model> for ListingView {
    fn from(l: listing::Model) -> Self {
        Self {
            admin_removed: l.admin_removed_at.is_some(),
            created_at: l.created_at.to_rfc3339(),
            updated_at: l.updated_at.to_rfc3339(),
            published_at: l.published_at.map(|t| t.to_rfc3339()),
            id: l.id,
            slug: l.slug,
            broker_id: l.broker_id,
            category_id: l.category_id,
            title: l.title,
            summary: l.summary,
            description: l.description,
            price_type: l.price_type,
            asking_price: l.asking_price,
            revenue: l.revenue,
            profit: l.profit,
            lease_description: l.lease_description,
            location: l.location,
            state: l.state,
            suburb: l.suburb,
            postcode: l.postcode,
            status: l.status,
        }
    }
}

/// A search or dashboard row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummaryView {
    #[serde(flatten)]
    pub listing: ListingView,
    pub category: Option<CategoryView>,
    pub images: Vec<ImageView>,
}

impl From<ListingSummary> for ListingSummaryView {
    fn from(s: ListingSummary) -> Self {
        Self {
            listing: s.listing.into(),
            category: s.category.map(Into::into),
            images: s.images.into_iter().map(Into::into).collect(),
        }
    }
}

/// The public listing page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetailView {
    #[serde(flatten)]
    pub listing: ListingView,
    pub category: Option<CategoryView>,
    pub images: Vec<ImageView>,
    pub highlights: Vec<HighlightView>,
}

impl From<ListingDetail> for ListingDetailView {
    fn from(d: ListingDetail) -> Self {
        Self {
            listing: d.listing.into(),
            category: d.category.map(Into::into),
            images: d.images.into_iter().map(Into::into).collect(),
            highlights: d.highlights.into_iter().map(Into::into).collect(),
        }
    }
}

/// Search results with pagination totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultsView {
    pub listings: Vec<ListingSummaryView>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl From<Page<ListingSummary>> for SearchResultsView {
    fn from(page: Page<ListingSummary>) -> Self {
        Self {
            listings: page.items.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub id: String,
    pub listing_id: String,
    pub url: String,
    pub position: i32,
}

impl From<listing_image::Model> for ImageView {
    fn from(i: listing_image::Model) -> Self {
        Self {
            id: i.id,
            listing_id: i.listing_id,
            url: i.url,
            position: i.position,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

impl From<category::Model> for CategoryView {
    fn from(c: category::Model) -> Self {
        Self {
            id: c.id,
            slug: c.slug,
            name: c.name,
            description: c.description,
            display_order: c.display_order,
            is_active: c.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightView {
    pub id: String,
    pub slug: String,
    pub label: String,
    pub is_active: bool,
}

impl From<highlight::Model> for HighlightView {
    fn from(h: highlight::Model) -> Self {
        Self {
            id: h.id,
            slug: h.slug,
            label: h.label,
            is_active: h.is_active,
        }
    }
}

/// An enquiry as seen by its broker or an admin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryView {
    pub id: String,
    pub listing_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<enquiry::Model> for EnquiryView {
    fn from(e: enquiry::Model) -> Self {
        Self {
            id: e.id,
            listing_id: e.listing_id,
            name: e.name,
            email: e.email,
            phone: e.phone,
            message: e.message,
            is_read: e.is_read,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

/// Account details. Never carries the password hash or token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub agency_name: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_suspended: bool,
    pub created_at: String,
}

impl From<user::Model> for UserView {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            agency_name: u.agency_name,
            phone: u.phone,
            role: u.role,
            is_suspended: u.is_suspended,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn listing() -> listing::Model {
        let now = Utc::now();
        listing::Model {
            id: "l1".to_string(),
            slug: "bakery-abc123".to_string(),
            broker_id: "b1".to_string(),
            category_id: None,
            title: "Bakery".to_string(),
            summary: String::new(),
            description: String::new(),
            price_type: PriceType::Fixed,
            asking_price: Some(250_000),
            revenue: None,
            profit: None,
            lease_description: None,
            location: "Geelong".to_string(),
            state: Some("VIC".to_string()),
            suburb: None,
            postcode: None,
            status: ListingStatus::UnderOffer,
            admin_removed_at: None,
            created_at: now.into(),
            updated_at: now.into(),
            published_at: None,
        }
    }

    #[test]
    fn test_listing_view_is_camel_case() {
        let json = serde_json::to_value(ListingView::from(listing())).unwrap();

        assert_eq!(json["askingPrice"], 250_000);
        assert_eq!(json["status"], "under_offer");
        assert_eq!(json["priceType"], "fixed");
        assert_eq!(json["adminRemoved"], false);
        assert!(json["publishedAt"].is_null());
    }

    #[test]
    fn test_summary_flattens_listing() {
        let view = ListingSummaryView::from(ListingSummary {
            listing: listing(),
            category: None,
            images: Vec::new(),
        });
        let json = serde_json::to_value(view).unwrap();

        assert_eq!(json["slug"], "bakery-abc123");
        assert!(json["images"].as_array().unwrap().is_empty());
        assert!(json.get("listing").is_none());
    }
}
