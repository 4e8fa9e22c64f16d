//! Service repository
//!
//! Validated creation and lookup of services. Defaults mirror the column
//! defaults: category "other", available, one client per slot, not public.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::{validate_amount, validate_max_len, validate_positive, validate_required};
use crate::error::RepositoryError;
use crate::models::service::{self, DEFAULT_CATEGORY, Entity as Service};
use crate::models::tenant;

/// Fields of a service to create.
#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Decimal,
    pub is_available: bool,
    pub max_clients_per_slot: i32,
    pub image: Option<String>,
    pub duration_minutes: Option<i32>,
    pub is_public: bool,
}

impl NewService {
    /// A service with the given name and price and default settings otherwise.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            description: String::new(),
            price,
            is_available: true,
            max_clients_per_slot: 1,
            image: None,
            duration_minutes: None,
            is_public: false,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        validate_required("name", &self.name, 255)?;
        validate_required("category", &self.category, 50)?;
        validate_amount("price", self.price)?;
        validate_positive("max_clients_per_slot", Some(self.max_clients_per_slot))?;
        validate_positive("duration_minutes", self.duration_minutes)?;
        if let Some(image) = self.image.as_deref() {
            validate_max_len("image", image, 255)?;
        }
        Ok(())
    }
}

/// Repository for Service database operations
pub struct ServiceRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ServiceRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Create a service owned by `tenant_id`
    pub async fn create_service(
        &self,
        tenant_id: Uuid,
        new: NewService,
    ) -> Result<service::Model, RepositoryError> {
        new.validate()?;

        if tenant::Entity::find_by_id(tenant_id)
            .one(self.db)
            .await?
            .is_none()
        {
            return Err(RepositoryError::NotFound(format!(
                "Tenant {tenant_id} not found"
            )));
        }

        let now = Utc::now();
        let model = service::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            name: Set(new.name),
            category: Set(new.category),
            description: Set(new.description),
            price: Set(new.price),
            is_available: Set(new.is_available),
            max_clients_per_slot: Set(new.max_clients_per_slot),
            image: Set(new.image),
            duration_minutes: Set(new.duration_minutes),
            is_public: Set(new.is_public),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(model.insert(self.db).await?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<service::Model>, RepositoryError> {
        Ok(Service::find_by_id(id).one(self.db).await?)
    }

    /// Services of one tenant ordered by name
    pub async fn list_for_tenant(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<service::Model>, RepositoryError> {
        let services = Service::find()
            .filter(service::Column::TenantId.eq(tenant_id))
            .order_by_asc(service::Column::Name)
            .all(self.db)
            .await?;
        Ok(services)
    }

    pub async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(Service::find().count(self.db).await?)
    }

    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        Ok(Service::delete_many().exec(self.db).await?.rows_affected)
    }
}
