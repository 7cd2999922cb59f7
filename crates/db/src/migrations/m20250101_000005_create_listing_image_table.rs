//! Create listing_image table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000004_create_listing_table::Listing;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ListingImage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingImage::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ListingImage::ListingId).string_len(32).not_null())
                    .col(ColumnDef::new(ListingImage::StorageKey).string_len(512).not_null())
                    .col(ColumnDef::new(ListingImage::Url).string_len(1024).not_null())
                    .col(ColumnDef::new(ListingImage::Position).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(ListingImage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_image_listing")
                            .from(ListingImage::Table, ListingImage::ListingId)
                            .to(Listing::Table, Listing::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (listing_id, position) for ordered image loads
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_image_listing_position")
                    .table(ListingImage::Table)
                    .col(ListingImage::ListingId)
                    .col(ListingImage::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListingImage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ListingImage {
    Table,
    Id,
    ListingId,
    StorageKey,
    Url,
    Position,
    CreatedAt,
}
