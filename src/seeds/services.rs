//! Service catalog seeding
//!
//! Replaces every marketplace row with the fixed catalog, owned by the
//! operator resolved from the user directory. The reset and repopulation
//! run in one transaction.

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use thiserror::Error;
use uuid::Uuid;

use super::catalog::SeedCatalog;
use super::progress::SeedProgress;
use crate::error::RepositoryError;
use crate::identity::{UserDirectory, UserId, resolve_operator};
use crate::models::{service, tenant, tenant_location};
use crate::repositories::{
    NewOptionValue, NewService, NewServiceLocation, NewServiceOption, ServiceLocationRepository,
    ServiceOptionRepository, ServiceRepository, TenantInput, TenantLocationRepository,
    TenantRepository,
};

/// Rows written by a successful seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub tenants: usize,
    pub tenant_locations: usize,
    pub services: usize,
    pub service_locations: usize,
    pub options: usize,
    pub option_values: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The operator could not be resolved; nothing was changed.
    Aborted,
    Seeded(SeedSummary),
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("no location found for the provider of service '{service}'")]
    MissingLocation { service: String },
    #[error("{kind} '{name}' references missing entry {index}")]
    CatalogReference {
        kind: &'static str,
        name: String,
        index: usize,
    },
}

/// Seed the standard catalog.
pub async fn seed_services(
    db: &DatabaseConnection,
    directory: &dyn UserDirectory,
    operator_email: &str,
    progress: &mut dyn SeedProgress,
) -> Result<SeedOutcome, SeedError> {
    seed_services_with_catalog(
        db,
        directory,
        operator_email,
        &SeedCatalog::standard(),
        progress,
    )
    .await
}

/// Seed an arbitrary catalog.
pub async fn seed_services_with_catalog(
    db: &DatabaseConnection,
    directory: &dyn UserDirectory,
    operator_email: &str,
    catalog: &SeedCatalog,
    progress: &mut dyn SeedProgress,
) -> Result<SeedOutcome, SeedError> {
    progress.message(&format!("Fetching user ID for {operator_email}..."));

    let Some(user_id) = resolve_operator(directory, operator_email).await else {
        progress.message("Failed to fetch user ID.");
        return Ok(SeedOutcome::Aborted);
    };
    progress.message(&format!("Fetched user ID: {user_id}"));

    let txn = db.begin().await?;
    match populate(&txn, &user_id, catalog, progress).await {
        Ok(summary) => {
            txn.commit().await?;
            log::info!(
                "Seeded {} tenants, {} services and {} options for user {}",
                summary.tenants,
                summary.services,
                summary.options,
                user_id
            );
            progress.message("Database populated successfully!");
            Ok(SeedOutcome::Seeded(summary))
        }
        Err(err) => {
            log::error!("Seeding failed, rolling back: {}", err);
            if let Err(rollback_err) = txn.rollback().await {
                log::error!("Rollback failed: {}", rollback_err);
            }
            Err(err)
        }
    }
}

async fn populate(
    txn: &DatabaseTransaction,
    user_id: &UserId,
    catalog: &SeedCatalog,
    progress: &mut dyn SeedProgress,
) -> Result<SeedSummary, SeedError> {
    let tenants = TenantRepository::new(txn);
    let locations = TenantLocationRepository::new(txn);
    let services = ServiceRepository::new(txn);
    let service_locations = ServiceLocationRepository::new(txn);
    let options = ServiceOptionRepository::new(txn);

    progress.message("Clearing existing data...");
    tenants.delete_all().await?;
    locations.delete_all().await?;
    services.delete_all().await?;
    service_locations.delete_all().await?;
    options.delete_all_options().await?;
    options.delete_all_values().await?;

    progress.message("Populating providers...");
    let total = catalog.providers.len();
    progress.advance("Providers", 0, total);
    let mut providers: Vec<tenant::Model> = Vec::with_capacity(total);
    for seed in &catalog.providers {
        let created = tenants
            .create_tenant(TenantInput {
                name: seed.name.clone(),
                description: seed.description.clone(),
                user_id: user_id.to_string(),
                contact_email: seed.contact_email.clone(),
                phone_number: Some(seed.phone_number.clone()),
            })
            .await?;
        providers.push(created);
        progress.advance("Providers", providers.len(), total);
    }

    progress.message("Populating provider locations...");
    let mut provider_locations: Vec<tenant_location::Model> = Vec::with_capacity(total);
    for provider in &providers {
        provider_locations.push(locations.create_location(provider.id, Uuid::new_v4()).await?);
    }

    progress.message("Populating services...");
    let total = catalog.services.len();
    progress.advance("Services", 0, total);
    let mut created_services: Vec<service::Model> = Vec::with_capacity(total);
    for seed in &catalog.services {
        let provider = providers
            .get(seed.provider)
            .ok_or_else(|| SeedError::CatalogReference {
                kind: "service",
                name: seed.name.clone(),
                index: seed.provider,
            })?;
        let created = services
            .create_service(
                provider.id,
                NewService::new(seed.name.clone(), seed.price)
                    .with_category(seed.category.clone())
                    .with_description(seed.description.clone()),
            )
            .await?;
        created_services.push(created);
        progress.advance("Services", created_services.len(), total);
    }

    progress.message("Populating service locations...");
    let mut service_location_count = 0;
    for service in &created_services {
        let location = provider_locations
            .iter()
            .find(|location| location.tenant_id == service.tenant_id)
            .ok_or_else(|| SeedError::MissingLocation {
                service: service.name.clone(),
            })?;
        service_locations
            .create_for(
                service,
                location,
                NewServiceLocation::with_range(catalog.service_range_mi),
            )
            .await?;
        service_location_count += 1;
    }

    progress.message("Populating options and values...");
    let total = catalog.options.len();
    progress.advance("Options", 0, total);
    let mut value_count = 0;
    for (done, seed) in catalog.options.iter().enumerate() {
        let service = created_services
            .get(seed.service)
            .ok_or_else(|| SeedError::CatalogReference {
                kind: "option",
                name: seed.name.clone(),
                index: seed.service,
            })?;
        let option = options
            .create_option(
                service.id,
                NewServiceOption {
                    name: seed.name.clone(),
                    is_required: seed.is_required,
                    max_selections: seed.max_selections,
                },
            )
            .await?;
        for value in &seed.values {
            options
                .add_value(
                    option.id,
                    NewOptionValue::new(value.name.clone(), value.additional_price),
                )
                .await?;
            value_count += 1;
        }
        progress.advance("Options", done + 1, total);
    }

    Ok(SeedSummary {
        tenants: providers.len(),
        tenant_locations: provider_locations.len(),
        services: created_services.len(),
        service_locations: service_location_count,
        options: catalog.options.len(),
        option_values: value_count,
    })
}
