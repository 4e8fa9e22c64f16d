//! Service location repository
//!
//! Creation checks that the tenant location and the service belong to the
//! same tenant before anything is written.

use chrono::{NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::service_location::{self, DEFAULT_SERVICE_RANGE_MI, Entity as ServiceLocation};
use crate::models::{service, tenant_location};

/// Settings of a service at one location.
#[derive(Debug, Clone, PartialEq)]
pub struct NewServiceLocation {
    pub service_range_mi: f64,
    pub availability_start: Option<NaiveTime>,
    pub availability_end: Option<NaiveTime>,
}

impl Default for NewServiceLocation {
    fn default() -> Self {
        Self {
            service_range_mi: DEFAULT_SERVICE_RANGE_MI,
            availability_start: None,
            availability_end: None,
        }
    }
}

impl NewServiceLocation {
    pub fn with_range(service_range_mi: f64) -> Self {
        Self {
            service_range_mi,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        if !self.service_range_mi.is_finite() || self.service_range_mi < 0.0 {
            return Err(RepositoryError::validation_error(
                "service_range_mi",
                "service_range_mi must be a non-negative number",
            ));
        }
        if let (Some(start), Some(end)) = (self.availability_start, self.availability_end) {
            if start >= end {
                return Err(RepositoryError::validation_error(
                    "availability_end",
                    "availability_end must be later than availability_start",
                ));
            }
        }
        Ok(())
    }
}

/// Repository for ServiceLocation database operations
pub struct ServiceLocationRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ServiceLocationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Offer `service` at `location`; both must belong to the same tenant.
    pub async fn create_for(
        &self,
        service: &service::Model,
        location: &tenant_location::Model,
        new: NewServiceLocation,
    ) -> Result<service_location::Model, RepositoryError> {
        if service.tenant_id != location.tenant_id {
            return Err(RepositoryError::LocationTenantMismatch {
                service_tenant_id: service.tenant_id,
                location_tenant_id: location.tenant_id,
            });
        }
        new.validate()?;

        let now = Utc::now();
        let model = service_location::ActiveModel {
            id: Set(Uuid::new_v4()),
            service_id: Set(service.id),
            location_id: Set(location.id),
            service_range_mi: Set(new.service_range_mi),
            availability_start: Set(new.availability_start),
            availability_end: Set(new.availability_end),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(model.insert(self.db).await?)
    }

    /// Same as [`Self::create_for`], loading both parents by id first.
    pub async fn create(
        &self,
        service_id: Uuid,
        location_id: Uuid,
        new: NewServiceLocation,
    ) -> Result<service_location::Model, RepositoryError> {
        let service = service::Entity::find_by_id(service_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Service {service_id} not found")))?;
        let location = tenant_location::Entity::find_by_id(location_id)
            .one(self.db)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Tenant location {location_id} not found"))
            })?;

        self.create_for(&service, &location, new).await
    }

    pub async fn list_for_service(
        &self,
        service_id: Uuid,
    ) -> Result<Vec<service_location::Model>, RepositoryError> {
        let rows = ServiceLocation::find()
            .filter(service_location::Column::ServiceId.eq(service_id))
            .all(self.db)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(ServiceLocation::find().count(self.db).await?)
    }

    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        Ok(ServiceLocation::delete_many()
            .exec(self.db)
            .await?
            .rows_affected)
    }
}
