//! Seed migration to insert the sync_status rows for every known domain.
//!
//! The scheduler only ever mutates existing rows, so a domain must be seeded
//! here (or by an operator) before its first run. Member runs on a tighter
//! interval than its dependents: dependent records stay UNMAPPED until their
//! owner has been migrated, so the owner domain should always be ahead.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Seeded domain definitions.
struct SeededDomain {
    name: &'static str,
    interval_minutes: u32,
}

const SEEDED_DOMAINS: &[SeededDomain] = &[
    SeededDomain {
        name: "member",
        interval_minutes: 5,
    },
    SeededDomain {
        name: "shipping_address",
        interval_minutes: 10,
    },
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for domain in SEEDED_DOMAINS {
            // ON CONFLICT DO NOTHING keeps re-running migrations idempotent
            let sql = format!(
                r#"INSERT INTO sync_status (domain_name, status, sync_interval_minutes, updated_at)
                   VALUES ('{}', 'active', {}, CURRENT_TIMESTAMP)
                   ON CONFLICT (domain_name) DO NOTHING"#,
                domain.name, domain.interval_minutes
            );

            db.execute_unprepared(&sql).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for domain in SEEDED_DOMAINS {
            let sql = format!("DELETE FROM sync_status WHERE domain_name = '{}'", domain.name);
            db.execute_unprepared(&sql).await?;
        }

        Ok(())
    }
}
