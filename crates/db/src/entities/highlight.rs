//! Highlight entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Short tag attached to listings (e.g. "Owner financing available").
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "highlight")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub label: String,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::listing_highlight::Entity")]
    ListingHighlights,
}

impl Related<super::listing_highlight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ListingHighlights.def()
    }
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        super::listing_highlight::Relation::Listing.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::listing_highlight::Relation::Highlight.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
