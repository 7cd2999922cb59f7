//! Create highlight table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Highlight::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Highlight::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Highlight::Slug).string_len(128).not_null())
                    .col(ColumnDef::new(Highlight::Label).string_len(128).not_null())
                    .col(ColumnDef::new(Highlight::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Highlight::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_highlight_slug")
                    .table(Highlight::Table)
                    .col(Highlight::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Highlight::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Highlight {
    Table,
    Id,
    Slug,
    Label,
    IsActive,
    CreatedAt,
}
