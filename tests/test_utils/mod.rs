//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations, plus fakes for the user directory and seed progress.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use marketplace::config::AppConfig;
use marketplace::identity::{UserDirectory, UserId, UserLookupError};
use marketplace::models::{
    Service, ServiceLocation, ServiceOption, ServiceOptionValue, Tenant, TenantLocation,
};
use marketplace::repositories::{TenantInput, TenantRepository};
use marketplace::seeds::SeedProgress;
use marketplace::server::{AppState, create_app};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Router backed by a fresh in-memory database.
pub async fn setup_test_app() -> Result<(axum::Router, DatabaseConnection)> {
    let db = setup_test_db().await?;
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        db: db.clone(),
    };
    Ok((create_app(state), db))
}

/// Creates a tenant with valid fields and the given name.
pub async fn create_test_tenant(
    db: &DatabaseConnection,
    name: &str,
) -> Result<marketplace::models::tenant::Model> {
    let tenant = TenantRepository::new(db)
        .create_tenant(TenantInput {
            name: name.to_string(),
            description: format!("{name} description"),
            user_id: "test-user".to_string(),
            contact_email: "owner@example.com".to_string(),
            phone_number: None,
        })
        .await?;
    Ok(tenant)
}

/// Row counts of every marketplace table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub tenants: u64,
    pub tenant_locations: u64,
    pub services: u64,
    pub service_locations: u64,
    pub options: u64,
    pub option_values: u64,
}

pub async fn table_counts(db: &DatabaseConnection) -> Result<TableCounts> {
    Ok(TableCounts {
        tenants: Tenant::find().count(db).await?,
        tenant_locations: TenantLocation::find().count(db).await?,
        services: Service::find().count(db).await?,
        service_locations: ServiceLocation::find().count(db).await?,
        options: ServiceOption::find().count(db).await?,
        option_values: ServiceOptionValue::find().count(db).await?,
    })
}

/// User directory returning a fixed result and counting calls.
pub struct StubDirectory {
    user_id: Option<String>,
    calls: AtomicUsize,
}

impl StubDirectory {
    pub fn returning(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn not_found() -> Self {
        Self {
            user_id: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for StubDirectory {
    async fn fetch_user_id(&self, email: &str) -> Result<UserId, UserLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.user_id {
            Some(id) => Ok(UserId::new(id.clone())),
            None => Err(UserLookupError::UserNotFound {
                email: email.to_string(),
            }),
        }
    }
}

/// Progress sink recording every message and stage update.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub messages: Vec<String>,
    pub stages: Vec<(String, usize, usize)>,
}

impl SeedProgress for RecordingProgress {
    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn advance(&mut self, stage: &str, completed: usize, total: usize) {
        self.stages.push((stage.to_string(), completed, total));
    }
}
