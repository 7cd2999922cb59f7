//! Create enquiry table migration.

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
                    .table(Enquiry::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Enquiry::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Enquiry::ListingId).string_len(32).not_null())
                    .col(ColumnDef::new(Enquiry::BrokerId).string_len(32).not_null())
                    .col(ColumnDef::new(Enquiry::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Enquiry::Email).string_len(320).not_null())
                    .col(ColumnDef::new(Enquiry::Phone).string_len(32))
                    .col(ColumnDef::new(Enquiry::Message).text().not_null())
                    .col(ColumnDef::new(Enquiry::IsRead).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Enquiry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enquiry_listing")
                            .from(Enquiry::Table, Enquiry::ListingId)
                            .to(Listing::Table, Listing::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (broker_id, created_at) for the broker inbox
        manager
            .create_index(
                Index::create()
                    .name("idx_enquiry_broker_created_at")
                    .table(Enquiry::Table)
                    .col(Enquiry::BrokerId)
                    .col(Enquiry::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enquiry_listing_id")
                    .table(Enquiry::Table)
                    .col(Enquiry::ListingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enquiry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Enquiry {
    Table,
    Id,
    ListingId,
    BrokerId,
    Name,
    Email,
    Phone,
    Message,
    IsRead,
    CreatedAt,
}
