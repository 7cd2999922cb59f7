//! Listing entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Listing lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "under_offer")]
    UnderOffer,
    #[sea_orm(string_value = "sold")]
    Sold,
    #[sea_orm(string_value = "unpublished")]
    Unpublished,
}

impl ListingStatus {
    /// Wire/database name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::UnderOffer => "under_offer",
            Self::Sold => "sold",
            Self::Unpublished => "unpublished",
        }
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = bizlist_common::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "under_offer" => Ok(Self::UnderOffer),
            "sold" => Ok(Self::Sold),
            "unpublished" => Ok(Self::Unpublished),
            other => Err(bizlist_common::AppError::Validation(format!(
                "Unknown listing status: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the asking price is presented.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    #[sea_orm(string_value = "fixed")]
    #[default]
    Fixed,
    /// Price on application; no asking price is stored.
    #[sea_orm(string_value = "poa")]
    Poa,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Title-derived slug with random suffix; never changes
    #[sea_orm(unique)]
    pub slug: String,

    /// Owning broker
    #[sea_orm(indexed)]
    pub broker_id: String,

    #[sea_orm(nullable, indexed)]
    pub category_id: Option<String>,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub summary: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub price_type: PriceType,

    /// Whole currency units
    #[sea_orm(nullable)]
    pub asking_price: Option<i64>,

    /// Annual revenue, whole currency units
    #[sea_orm(nullable)]
    pub revenue: Option<i64>,

    /// Annual profit, whole currency units
    #[sea_orm(nullable)]
    pub profit: Option<i64>,

    #[sea_orm(column_type = "Text", nullable)]
    pub lease_description: Option<String>,

    /// Free-text location line
    pub location: String,

    #[sea_orm(nullable)]
    pub state: Option<String>,

    #[sea_orm(nullable)]
    pub suburb: Option<String>,

    #[sea_orm(nullable)]
    pub postcode: Option<String>,

    pub status: ListingStatus,

    /// Moderation flag; hides the listing from every public read
    #[sea_orm(nullable)]
    pub admin_removed_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,

    /// Stamped on every transition into `published`
    #[sea_orm(nullable)]
    pub published_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether the public search and detail surfaces may show this listing.
    #[must_use]
    pub fn is_publicly_visible(&self) -> bool {
        self.status == ListingStatus::Published && self.admin_removed_at.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BrokerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Broker,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::listing_image::Entity")]
    Images,
    #[sea_orm(has_many = "super::listing_highlight::Entity")]
    ListingHighlights,
    #[sea_orm(has_many = "super::enquiry::Entity")]
    Enquiries,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Broker.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::listing_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::listing_highlight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ListingHighlights.def()
    }
}

impl Related<super::enquiry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enquiries.def()
    }
}

impl Related<super::highlight::Entity> for Entity {
    fn to() -> RelationDef {
        super::listing_highlight::Relation::Highlight.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::listing_highlight::Relation::Listing.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
