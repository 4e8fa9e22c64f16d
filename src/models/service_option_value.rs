//! Service option value entity model
//!
//! One selectable value within a service option. `additional_price` is
//! added to the service's base price when the value is selected.

use rust_decimal::Decimal;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

use super::service_option;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_option_values")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub option_id: Uuid,

    /// Name of the value (e.g. "Large")
    pub name: String,

    /// Price delta applied when selected, decimal(10, 2)
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub additional_price: Decimal,

    /// Zero-based order of the value within its option
    pub position: i32,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_option::Entity",
        from = "Column::OptionId",
        to = "super::service_option::Column::Id",
        on_delete = "Cascade"
    )]
    ServiceOption,
}

impl Related<super::service_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Human-readable label, e.g. "Tall (Option: Grass Height)".
pub fn label(value: &Model, option: &service_option::Model) -> String {
    format!("{} (Option: {})", value.name, option.name)
}

/// Total price of a service with the given values selected.
pub fn total_price<'a>(base: Decimal, selected: impl IntoIterator<Item = &'a Model>) -> Decimal {
    selected
        .into_iter()
        .fold(base, |total, value| total + value.additional_price)
}
