//! Migration to create the service_locations table.
//!
//! Joins a service to one of its tenant's locations with a service radius
//! and an optional availability window.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceLocations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceLocations::ServiceId).uuid().not_null())
                    .col(
                        ColumnDef::new(ServiceLocations::LocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceLocations::ServiceRangeMi)
                            .double()
                            .not_null()
                            .default(10.0),
                    )
                    .col(
                        ColumnDef::new(ServiceLocations::AvailabilityStart)
                            .time()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ServiceLocations::AvailabilityEnd)
                            .time()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ServiceLocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ServiceLocations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_locations_service_id")
                            .from(ServiceLocations::Table, ServiceLocations::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_locations_location_id")
                            .from(ServiceLocations::Table, ServiceLocations::LocationId)
                            .to(TenantLocations::Table, TenantLocations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_locations_service_id")
                    .table(ServiceLocations::Table)
                    .col(ServiceLocations::ServiceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_locations_location_id")
                    .table(ServiceLocations::Table)
                    .col(ServiceLocations::LocationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_locations_service_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_locations_location_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ServiceLocations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceLocations {
    Table,
    Id,
    ServiceId,
    LocationId,
    ServiceRangeMi,
    AvailabilityStart,
    AvailabilityEnd,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum TenantLocations {
    Table,
    Id,
}
