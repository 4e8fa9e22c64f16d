//! Database migrations for the services marketplace.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2024_01_01_000001_create_tenants;
mod m2024_01_01_000002_create_tenant_locations;
mod m2024_02_01_000001_create_services;
mod m2024_02_01_000002_create_service_locations;
mod m2024_02_01_000003_create_service_options;
mod m2024_02_01_000004_create_service_option_values;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2024_01_01_000001_create_tenants::Migration),
            Box::new(m2024_01_01_000002_create_tenant_locations::Migration),
            Box::new(m2024_02_01_000001_create_services::Migration),
            Box::new(m2024_02_01_000002_create_service_locations::Migration),
            Box::new(m2024_02_01_000003_create_service_options::Migration),
            Box::new(m2024_02_01_000004_create_service_option_values::Migration),
        ]
    }
}
