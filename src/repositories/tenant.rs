//! # Tenant Repository
//!
//! This module contains the repository implementation for Tenant entities,
//! providing CRUD operations for tenant management.

use crate::config::is_valid_email;
use crate::error::RepositoryError;
use crate::models::tenant::{
    self, ActiveModel as TenantActiveModel, Entity as Tenant, Model as TenantModel,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::{validate_max_len, validate_required};

const PHONE_NUMBER_MAX_LEN: usize = 32;

/// Writable tenant fields, used for creation and full replacement.
#[derive(Debug, Clone)]
pub struct TenantInput {
    /// Display name for the tenant
    pub name: String,
    /// Free-form description (may be empty)
    pub description: String,
    /// Owning user in the user directory
    pub user_id: String,
    pub contact_email: String,
    pub phone_number: Option<String>,
}

/// Partial tenant update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TenantPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<String>,
    pub contact_email: Option<String>,
    /// `Some(None)` clears the phone number
    pub phone_number: Option<Option<String>>,
}

impl TenantPatch {
    fn apply(self, current: &TenantModel) -> TenantInput {
        TenantInput {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            user_id: self.user_id.unwrap_or_else(|| current.user_id.clone()),
            contact_email: self
                .contact_email
                .unwrap_or_else(|| current.contact_email.clone()),
            phone_number: self
                .phone_number
                .unwrap_or_else(|| current.phone_number.clone()),
        }
    }
}

/// Repository for Tenant database operations
pub struct TenantRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TenantRepository<'a, C> {
    /// Create a new TenantRepository over a pool or transaction
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Create a new tenant
    pub async fn create_tenant(&self, input: TenantInput) -> Result<TenantModel, RepositoryError> {
        validate_tenant(&input)?;

        let now = Utc::now();
        let tenant = TenantActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            user_id: Set(input.user_id),
            contact_email: Set(input.contact_email),
            phone_number: Set(input.phone_number),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let result = tenant
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Get tenant by ID
    pub async fn get_tenant_by_id(
        &self,
        tenant_id: Uuid,
    ) -> Result<Option<TenantModel>, RepositoryError> {
        let tenant = Tenant::find_by_id(tenant_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(tenant)
    }

    /// List all tenants, oldest first
    pub async fn list_tenants(&self) -> Result<Vec<TenantModel>, RepositoryError> {
        let tenants = Tenant::find()
            .order_by_asc(tenant::Column::CreatedAt)
            .order_by_asc(tenant::Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(tenants)
    }

    /// Replace every writable field of a tenant
    pub async fn update_tenant(
        &self,
        tenant_id: Uuid,
        input: TenantInput,
    ) -> Result<TenantModel, RepositoryError> {
        validate_tenant(&input)?;

        let tenant = self.require_tenant(tenant_id).await?;

        let mut active_tenant = tenant.into_active_model();
        active_tenant.name = Set(input.name);
        active_tenant.description = Set(input.description);
        active_tenant.user_id = Set(input.user_id);
        active_tenant.contact_email = Set(input.contact_email);
        active_tenant.phone_number = Set(input.phone_number);
        active_tenant.updated_at = Set(Utc::now().into());

        let result = active_tenant
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result)
    }

    /// Update only the fields present in `patch`
    pub async fn patch_tenant(
        &self,
        tenant_id: Uuid,
        patch: TenantPatch,
    ) -> Result<TenantModel, RepositoryError> {
        let tenant = self.require_tenant(tenant_id).await?;
        let merged = patch.apply(&tenant);
        self.update_tenant(tenant_id, merged).await
    }

    /// Delete a tenant together with its locations and services
    pub async fn delete_tenant(&self, tenant_id: Uuid) -> Result<(), RepositoryError> {
        let tenant = self.require_tenant(tenant_id).await?;

        tenant
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// Delete every tenant, returning the number of rows removed
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = Tenant::delete_many()
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(result.rows_affected)
    }

    /// Check if a tenant exists
    pub async fn tenant_exists(&self, tenant_id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.get_tenant_by_id(tenant_id).await?.is_some())
    }

    /// Get tenant count
    pub async fn get_tenant_count(&self) -> Result<u64, RepositoryError> {
        let count = Tenant::find()
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(count)
    }

    async fn require_tenant(&self, tenant_id: Uuid) -> Result<TenantModel, RepositoryError> {
        self.get_tenant_by_id(tenant_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Tenant {tenant_id} not found")))
    }
}

/// Validate tenant fields according to business rules
fn validate_tenant(input: &TenantInput) -> Result<(), RepositoryError> {
    validate_required("name", &input.name, 255)?;
    validate_required("user_id", &input.user_id, 255)?;

    if !is_valid_email(&input.contact_email) {
        return Err(RepositoryError::validation_error(
            "contact_email",
            "contact_email must be a valid email address",
        ));
    }
    validate_max_len("contact_email", &input.contact_email, 254)?;

    if let Some(phone) = input.phone_number.as_deref() {
        validate_max_len("phone_number", phone, PHONE_NUMBER_MAX_LEN)?;
    }

    Ok(())
}
