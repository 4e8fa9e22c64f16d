//! Service entity model
//!
//! This module contains the SeaORM entity model for the services table.
//! A service is an offering published by a tenant, priced as a fixed-point
//! decimal with two fractional digits.

use rust_decimal::Decimal;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Category assigned when none is given
pub const DEFAULT_CATEGORY: &str = "other";

/// Service offered by a tenant
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    /// Unique identifier for the service (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant offering this service
    pub tenant_id: Uuid,

    /// Name of the service
    pub name: String,

    /// Free-text category (defaults to "other")
    pub category: String,

    /// Description of the service (may be empty)
    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Base price, decimal(10, 2)
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,

    /// Whether the service can currently be booked
    pub is_available: bool,

    /// Maximum number of clients allowed per time slot
    pub max_clients_per_slot: i32,

    /// Image reference (optional)
    pub image: Option<String>,

    /// Duration of the service in minutes (optional)
    pub duration_minutes: Option<i32>,

    /// Whether the service is listed publicly
    pub is_public: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
    #[sea_orm(has_many = "super::service_location::Entity")]
    ServiceLocation,
    #[sea_orm(has_many = "super::service_option::Entity")]
    ServiceOption,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::service_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceLocation.def()
    }
}

impl Related<super::service_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
