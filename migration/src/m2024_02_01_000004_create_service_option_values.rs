//! Migration to create the service_option_values table.
//!
//! Each value carries the price delta added to the service's base price
//! when it is selected.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOptionValues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceOptionValues::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ServiceOptionValues::OptionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceOptionValues::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceOptionValues::AdditionalPrice)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ServiceOptionValues::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ServiceOptionValues::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ServiceOptionValues::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_option_values_option_id")
                            .from(ServiceOptionValues::Table, ServiceOptionValues::OptionId)
                            .to(ServiceOptions::Table, ServiceOptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_option_values_option_id")
                    .table(ServiceOptionValues::Table)
                    .col(ServiceOptionValues::OptionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_option_values_option_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ServiceOptionValues::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceOptionValues {
    Table,
    Id,
    OptionId,
    Name,
    AdditionalPrice,
    Position,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServiceOptions {
    Table,
    Id,
}
