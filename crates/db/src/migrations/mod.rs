//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_category_table;
mod m20250101_000003_create_highlight_table;
mod m20250101_000004_create_listing_table;
mod m20250101_000005_create_listing_image_table;
mod m20250101_000006_create_listing_highlight_table;
mod m20250101_000007_create_enquiry_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_category_table::Migration),
            Box::new(m20250101_000003_create_highlight_table::Migration),
            Box::new(m20250101_000004_create_listing_table::Migration),
            Box::new(m20250101_000005_create_listing_image_table::Migration),
            Box::new(m20250101_000006_create_listing_highlight_table::Migration),
            Box::new(m20250101_000007_create_enquiry_table::Migration),
        ]
    }
}
