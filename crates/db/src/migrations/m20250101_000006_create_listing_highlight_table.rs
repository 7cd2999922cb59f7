//! Create listing_highlight join table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000003_create_highlight_table::Highlight;
use super::m20250101_000004_create_listing_table::Listing;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ListingHighlight::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingHighlight::ListingId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingHighlight::HighlightId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ListingHighlight::ListingId)
                            .col(ListingHighlight::HighlightId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_highlight_listing")
                            .from(ListingHighlight::Table, ListingHighlight::ListingId)
                            .to(Listing::Table, Listing::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_highlight_highlight")
                            .from(ListingHighlight::Table, ListingHighlight::HighlightId)
                            .to(Highlight::Table, Highlight::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: highlight_id (reverse lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_highlight_highlight_id")
                    .table(ListingHighlight::Table)
                    .col(ListingHighlight::HighlightId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListingHighlight::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ListingHighlight {
    Table,
    ListingId,
    HighlightId,
}
