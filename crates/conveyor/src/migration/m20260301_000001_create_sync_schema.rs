//! Initial migration to create the sync control table and the migrated
//! domain tables in the target store.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_sync_status(manager).await?;
        self.create_members(manager).await?;
        self.create_shipping_addresses(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShippingAddresses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SyncStatusTable::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_sync_status(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncStatusTable::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SyncStatusTable::DomainName)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    // Checkpoint
                    .col(
                        ColumnDef::new(SyncStatusTable::LastSyncAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    // Counters
                    .col(
                        ColumnDef::new(SyncStatusTable::LastSyncedCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SyncStatusTable::TotalSyncedCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    // Lifecycle
                    .col(
                        ColumnDef::new(SyncStatusTable::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(SyncStatusTable::SyncIntervalMinutes)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(ColumnDef::new(SyncStatusTable::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(SyncStatusTable::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Scheduler selects by status every tick
        manager
            .create_index(
                Index::create()
                    .name("idx_sync_status_status")
                    .table(SyncStatusTable::Table)
                    .col(SyncStatusTable::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_members(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Members::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Members::LegacyMemberId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Members::Email).string().not_null())
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(ColumnDef::new(Members::Phone).string().null())
                    .col(
                        ColumnDef::new(Members::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Members::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Remapping lookup used by every dependent domain
        manager
            .create_index(
                Index::create()
                    .name("idx_members_legacy_id")
                    .table(Members::Table)
                    .col(Members::LegacyMemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Natural key for idempotent writes
        manager
            .create_index(
                Index::create()
                    .name("idx_members_email")
                    .table(Members::Table)
                    .col(Members::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_shipping_addresses(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ShippingAddresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShippingAddresses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ShippingAddresses::MemberId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShippingAddresses::RecipientName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ShippingAddresses::Phone).string().null())
                    .col(
                        ColumnDef::new(ShippingAddresses::ZipCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShippingAddresses::AddressLine1)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShippingAddresses::AddressLine2)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ShippingAddresses::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ShippingAddresses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShippingAddresses::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shipping_addresses_member")
                            .from(ShippingAddresses::Table, ShippingAddresses::MemberId)
                            .to(Members::Table, Members::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural composite key for idempotent writes
        manager
            .create_index(
                Index::create()
                    .name("idx_shipping_addresses_natural_key")
                    .table(ShippingAddresses::Table)
                    .col(ShippingAddresses::MemberId)
                    .col(ShippingAddresses::ZipCode)
                    .col(ShippingAddresses::AddressLine1)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shipping_addresses_member")
                    .table(ShippingAddresses::Table)
                    .col(ShippingAddresses::MemberId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum SyncStatusTable {
    #[sea_orm(iden = "sync_status")]
    Table,
    DomainName,
    LastSyncAt,
    LastSyncedCount,
    TotalSyncedCount,
    Status,
    SyncIntervalMinutes,
    ErrorMessage,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
    LegacyMemberId,
    Email,
    Name,
    Phone,
    CreatedAt,
    SyncedAt,
}

#[derive(DeriveIden)]
enum ShippingAddresses {
    Table,
    Id,
    MemberId,
    RecipientName,
    Phone,
    ZipCode,
    AddressLine1,
    AddressLine2,
    IsDefault,
    CreatedAt,
    SyncedAt,
}
