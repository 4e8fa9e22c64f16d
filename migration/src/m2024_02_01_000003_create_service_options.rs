//! Migration to create the service_options table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceOptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceOptions::ServiceId).uuid().not_null())
                    .col(
                        ColumnDef::new(ServiceOptions::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceOptions::IsRequired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ServiceOptions::MaxSelections).integer().null())
                    .col(
                        ColumnDef::new(ServiceOptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ServiceOptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_options_service_id")
                            .from(ServiceOptions::Table, ServiceOptions::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_options_service_id")
                    .table(ServiceOptions::Table)
                    .col(ServiceOptions::ServiceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_options_service_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ServiceOptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceOptions {
    Table,
    Id,
    ServiceId,
    Name,
    IsRequired,
    MaxSelections,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
}
