//! Tenant location repository

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::tenant;
use crate::models::tenant_location::{self, Entity as TenantLocation};

/// Repository for TenantLocation database operations
pub struct TenantLocationRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TenantLocationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Register a location for a tenant
    pub async fn create_location(
        &self,
        tenant_id: Uuid,
        location_id: Uuid,
    ) -> Result<tenant_location::Model, RepositoryError> {
        let tenant_exists = tenant::Entity::find_by_id(tenant_id)
            .one(self.db)
            .await?
            .is_some();
        if !tenant_exists {
            return Err(RepositoryError::NotFound(format!(
                "Tenant {tenant_id} not found"
            )));
        }

        let now = Utc::now();
        let location = tenant_location::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            location_id: Set(location_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(location.insert(self.db).await?)
    }

    pub async fn get_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<tenant_location::Model>, RepositoryError> {
        Ok(TenantLocation::find_by_id(id).one(self.db).await?)
    }

    /// Locations owned by a tenant, oldest first
    pub async fn list_for_tenant(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<tenant_location::Model>, RepositoryError> {
        let locations = TenantLocation::find()
            .filter(tenant_location::Column::TenantId.eq(tenant_id))
            .order_by_asc(tenant_location::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(locations)
    }

    pub async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(TenantLocation::find().count(self.db).await?)
    }

    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = TenantLocation::delete_many().exec(self.db).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{TenantInput, TenantRepository};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    #[tokio::test]
    async fn locations_are_scoped_to_their_tenant() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let tenants = TenantRepository::new(&db);
        let tenant = tenants
            .create_tenant(TenantInput {
                name: "Style Studio Salon".to_string(),
                description: String::new(),
                user_id: "7".to_string(),
                contact_email: "stylestudio@example.com".to_string(),
                phone_number: None,
            })
            .await
            .unwrap();

        let repo = TenantLocationRepository::new(&db);
        let location_id = Uuid::new_v4();
        let location = repo.create_location(tenant.id, location_id).await.unwrap();
        assert_eq!(location.tenant_id, tenant.id);
        assert_eq!(location.to_string(), location_id.to_string());

        assert_eq!(repo.list_for_tenant(tenant.id).await.unwrap().len(), 1);
        assert!(repo.list_for_tenant(Uuid::new_v4()).await.unwrap().is_empty());

        assert!(matches!(
            repo.create_location(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(RepositoryError::NotFound(_))
        ));

        // Deleting the tenant cascades to its locations
        tenants.delete_tenant(tenant.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
