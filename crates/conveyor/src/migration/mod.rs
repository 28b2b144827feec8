//! Target-store migrations for the conveyor schema.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_sync_schema;
mod m20260301_000002_seed_sync_domains;

/// The migrator that runs all migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_sync_schema::Migration),
            Box::new(m20260301_000002_seed_sync_domains::Migration),
        ]
    }

    fn migration_table_name() -> SeaRc<dyn Iden> {
        SeaRc::new(Alias::new("conveyor_migrations"))
    }
}
