//! Service option repository
//!
//! Options and their selectable values are managed together.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::{validate_amount, validate_positive, validate_required};
use crate::error::RepositoryError;
use crate::models::service;
use crate::models::service_option::{self, Entity as ServiceOption};
use crate::models::service_option_value::{self, Entity as ServiceOptionValue};

/// Fields of an option to create.
#[derive(Debug, Clone, Default)]
pub struct NewServiceOption {
    pub name: String,
    pub is_required: bool,
    /// `None` allows any number of selections
    pub max_selections: Option<i32>,
}

/// Fields of an option value to create.
#[derive(Debug, Clone)]
pub struct NewOptionValue {
    pub name: String,
    pub additional_price: Decimal,
}

impl NewOptionValue {
    pub fn new(name: impl Into<String>, additional_price: Decimal) -> Self {
        Self {
            name: name.into(),
            additional_price,
        }
    }
}

/// Repository for ServiceOption and ServiceOptionValue database operations
pub struct ServiceOptionRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ServiceOptionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create_option(
        &self,
        service_id: Uuid,
        new: NewServiceOption,
    ) -> Result<service_option::Model, RepositoryError> {
        validate_required("name", &new.name, 255)?;
        validate_positive("max_selections", new.max_selections)?;

        if service::Entity::find_by_id(service_id)
            .one(self.db)
            .await?
            .is_none()
        {
            return Err(RepositoryError::NotFound(format!(
                "Service {service_id} not found"
            )));
        }

        let now = Utc::now();
        let model = service_option::ActiveModel {
            id: Set(Uuid::new_v4()),
            service_id: Set(service_id),
            name: Set(new.name),
            is_required: Set(new.is_required),
            max_selections: Set(new.max_selections),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(model.insert(self.db).await?)
    }

    pub async fn add_value(
        &self,
        option_id: Uuid,
        new: NewOptionValue,
    ) -> Result<service_option_value::Model, RepositoryError> {
        validate_required("name", &new.name, 255)?;
        validate_amount("additional_price", new.additional_price)?;

        if ServiceOption::find_by_id(option_id)
            .one(self.db)
            .await?
            .is_none()
        {
            return Err(RepositoryError::NotFound(format!(
                "Service option {option_id} not found"
            )));
        }

        let position = ServiceOptionValue::find()
            .filter(service_option_value::Column::OptionId.eq(option_id))
            .count(self.db)
            .await?;
        let position = i32::try_from(position).map_err(|_| {
            RepositoryError::validation_error("position", "too many values for one option")
        })?;

        let now = Utc::now();
        let model = service_option_value::ActiveModel {
            id: Set(Uuid::new_v4()),
            option_id: Set(option_id),
            name: Set(new.name),
            additional_price: Set(new.additional_price),
            position: Set(position),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(model.insert(self.db).await?)
    }

    /// Find an option of a service by name
    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<service_option::Model>, RepositoryError> {
        Ok(ServiceOption::find()
            .filter(service_option::Column::Name.eq(name))
            .one(self.db)
            .await?)
    }

    pub async fn list_for_service(
        &self,
        service_id: Uuid,
    ) -> Result<Vec<service_option::Model>, RepositoryError> {
        Ok(ServiceOption::find()
            .filter(service_option::Column::ServiceId.eq(service_id))
            .order_by_asc(service_option::Column::Name)
            .all(self.db)
            .await?)
    }

    /// Values of an option in the order they were added
    pub async fn list_values(
        &self,
        option_id: Uuid,
    ) -> Result<Vec<service_option_value::Model>, RepositoryError> {
        Ok(ServiceOptionValue::find()
            .filter(service_option_value::Column::OptionId.eq(option_id))
            .order_by_asc(service_option_value::Column::Position)
            .order_by_asc(service_option_value::Column::Name)
            .all(self.db)
            .await?)
    }

    pub async fn count_options(&self) -> Result<u64, RepositoryError> {
        Ok(ServiceOption::find().count(self.db).await?)
    }

    pub async fn count_values(&self) -> Result<u64, RepositoryError> {
        Ok(ServiceOptionValue::find().count(self.db).await?)
    }

    pub async fn delete_all_options(&self) -> Result<u64, RepositoryError> {
        Ok(ServiceOption::delete_many()
            .exec(self.db)
            .await?
            .rows_affected)
    }

    pub async fn delete_all_values(&self) -> Result<u64, RepositoryError> {
        Ok(ServiceOptionValue::delete_many()
            .exec(self.db)
            .await?
            .rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{NewService, ServiceRepository, TenantInput, TenantRepository};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    #[tokio::test]
    async fn values_belong_to_their_option() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let tenant = TenantRepository::new(&db)
            .create_tenant(TenantInput {
                name: "Style Studio Salon".to_string(),
                description: String::new(),
                user_id: "42".to_string(),
                contact_email: "stylestudio@example.com".to_string(),
                phone_number: None,
            })
            .await
            .unwrap();
        let haircut = ServiceRepository::new(&db)
            .create_service(tenant.id, NewService::new("Haircut", Decimal::new(3000, 2)))
            .await
            .unwrap();

        let repo = ServiceOptionRepository::new(&db);
        let option = repo
            .create_option(
                haircut.id,
                NewServiceOption {
                    name: "Hair Length".to_string(),
                    is_required: true,
                    max_selections: Some(1),
                },
            )
            .await
            .unwrap();

        for (name, cents) in [("Long", 1000), ("Short", 0), ("Medium", 500)] {
            repo.add_value(option.id, NewOptionValue::new(name, Decimal::new(cents, 2)))
                .await
                .unwrap();
        }

        let names: Vec<String> = repo
            .list_values(option.id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, ["Long", "Short", "Medium"]);

        let zero_max = NewServiceOption {
            name: "Extras".to_string(),
            is_required: false,
            max_selections: Some(0),
        };
        assert!(repo.create_option(haircut.id, zero_max).await.unwrap_err().is_validation());

        let negative = NewOptionValue::new("Discount", Decimal::new(-500, 2));
        assert!(repo.add_value(option.id, negative).await.is_err());

        assert_eq!(repo.count_values().await.unwrap(), 3);
    }
}
