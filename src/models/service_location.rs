//! Service location entity model
//!
//! Associates a service with one of its tenant's locations, together with
//! the radius served from that location and an optional daily window.
//! The location must belong to the same tenant as the service; the
//! repository layer checks this on creation.

use chrono::NaiveTime;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

use super::{service, tenant_location};

/// Radius assigned when none is given
pub const DEFAULT_SERVICE_RANGE_MI: f64 = 10.0;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "service_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Service offered at this location
    pub service_id: Uuid,

    /// Tenant location where the service is available
    pub location_id: Uuid,

    /// Service range in miles from this location
    #[sea_orm(column_type = "Double")]
    pub service_range_mi: f64,

    pub availability_start: Option<NaiveTime>,

    pub availability_end: Option<NaiveTime>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::Id",
        on_delete = "Cascade"
    )]
    Service,
    #[sea_orm(
        belongs_to = "super::tenant_location::Entity",
        from = "Column::LocationId",
        to = "super::tenant_location::Column::Id",
        on_delete = "Cascade"
    )]
    TenantLocation,
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<super::tenant_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TenantLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Human-readable label, e.g. "Lawn Mowing at 6f0c...".
pub fn label(service: &service::Model, location: &tenant_location::Model) -> String {
    format!("{} at {}", service.name, location)
}
