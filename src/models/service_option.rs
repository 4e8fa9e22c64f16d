//! Service option entity model
//!
//! A configurable choice group attached to a service (e.g. "Grass Height").

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

use super::service;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub service_id: Uuid,

    /// Name of the option (e.g. "Choose a size")
    pub name: String,

    /// Whether a selection is mandatory when booking
    pub is_required: bool,

    /// Maximum number of values that may be selected; `None` means unlimited
    pub max_selections: Option<i32>,

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
    #[sea_orm(has_many = "super::service_option_value::Entity")]
    ServiceOptionValue,
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<super::service_option_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceOptionValue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Human-readable label, e.g. "Grass Height (Service: Lawn Mowing)".
pub fn label(option: &Model, service: &service::Model) -> String {
    format!("{} (Service: {})", option.name, service.name)
}
