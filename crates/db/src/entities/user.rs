//! User entity (brokers and admins).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Seller-side account that owns listings.
    #[sea_orm(string_value = "broker")]
    #[default]
    Broker,
    /// Moderator with access to the admin surface.
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Login email, stored lowercased
    #[sea_orm(unique)]
    pub email: String,

    /// Password hash (Argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Session token, cleared on suspension
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Contact name
    pub name: String,

    /// Brokerage / agency name
    #[sea_orm(nullable)]
    pub agency_name: Option<String>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    pub role: UserRole,

    #[sea_orm(default_value = false)]
    pub is_suspended: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether this account may use the admin surface.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether this account may own and manage listings.
    #[must_use]
    pub fn is_broker(&self) -> bool {
        self.role == UserRole::Broker
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::listing::Entity")]
    Listings,
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
