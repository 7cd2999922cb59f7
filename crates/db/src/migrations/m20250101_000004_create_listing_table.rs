//! Create listing table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_user_table::User;
use super::m20250101_000002_create_category_table::Category;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listing::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Listing::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Listing::Slug).string_len(256).not_null())
                    .col(ColumnDef::new(Listing::BrokerId).string_len(32).not_null())
                    .col(ColumnDef::new(Listing::CategoryId).string_len(32))
                    .col(ColumnDef::new(Listing::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Listing::Summary).text().not_null())
                    .col(ColumnDef::new(Listing::Description).text().not_null())
                    .col(
                        ColumnDef::new(Listing::PriceType)
                            .string_len(8)
                            .not_null()
                            .default("fixed"),
                    )
                    .col(ColumnDef::new(Listing::AskingPrice).big_integer())
                    .col(ColumnDef::new(Listing::Revenue).big_integer())
                    .col(ColumnDef::new(Listing::Profit).big_integer())
                    .col(ColumnDef::new(Listing::LeaseDescription).text())
                    .col(ColumnDef::new(Listing::Location).string_len(256).not_null())
                    .col(ColumnDef::new(Listing::State).string_len(64))
                    .col(ColumnDef::new(Listing::Suburb).string_len(128))
                    .col(ColumnDef::new(Listing::Postcode).string_len(16))
                    .col(
                        ColumnDef::new(Listing::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Listing::AdminRemovedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Listing::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Listing::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Listing::PublishedAt).timestamp_with_time_zone())
                    .check(Expr::col(Listing::AskingPrice).gte(0))
                    .check(Expr::col(Listing::Revenue).gte(0))
                    .check(Expr::col(Listing::Profit).gte(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_broker")
                            .from(Listing::Table, Listing::BrokerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_category")
                            .from(Listing::Table, Listing::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listing_slug")
                    .table(Listing::Table)
                    .col(Listing::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: broker_id (broker dashboard)
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_broker_id")
                    .table(Listing::Table)
                    .col(Listing::BrokerId)
                    .to_owned(),
            )
            .await?;

        // Index: (status, published_at) for the public search base constraint
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_status_published_at")
                    .table(Listing::Table)
                    .col(Listing::Status)
                    .col(Listing::PublishedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listing_category_id")
                    .table(Listing::Table)
                    .col(Listing::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listing_asking_price")
                    .table(Listing::Table)
                    .col(Listing::AskingPrice)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listing_state")
                    .table(Listing::Table)
                    .col(Listing::State)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listing::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Listing {
    Table,
    Id,
    Slug,
    BrokerId,
    CategoryId,
    Title,
    Summary,
    Description,
    PriceType,
    AskingPrice,
    Revenue,
    Profit,
    LeaseDescription,
    Location,
    State,
    Suburb,
    Postcode,
    Status,
    AdminRemovedAt,
    CreatedAt,
    UpdatedAt,
    PublishedAt,
}
