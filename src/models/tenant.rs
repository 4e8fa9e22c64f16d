//! Tenant entity model
//!
//! This module contains the SeaORM entity model for the tenants table,
//! which stores the service-providing organizations of the marketplace.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Tenant entity representing a service provider
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    /// Unique identifier for the tenant (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name for the tenant
    pub name: String,

    /// Free-form description of the tenant's business
    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Identifier of the owning user in the user directory
    pub user_id: String,

    /// Contact email published for the tenant
    pub contact_email: String,

    /// Contact phone number (optional)
    pub phone_number: Option<String>,

    /// Timestamp when the tenant was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the tenant was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tenant_location::Entity")]
    TenantLocation,
    #[sea_orm(has_many = "super::service::Entity")]
    Service,
}

impl Related<super::tenant_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TenantLocation.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
