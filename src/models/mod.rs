//! # Data Models
//!
//! This module contains the SeaORM entities of the marketplace schema.
//! Every entity carries a UUID primary key plus `created_at`/`updated_at`
//! timestamps; child rows are removed with their parent (cascade delete).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod service;
pub mod service_location;
pub mod service_option;
pub mod service_option_value;
pub mod tenant;
pub mod tenant_location;

pub use service::Entity as Service;
pub use service_location::Entity as ServiceLocation;
pub use service_option::Entity as ServiceOption;
pub use service_option_value::Entity as ServiceOptionValue;
pub use tenant::Entity as Tenant;
pub use tenant_location::Entity as TenantLocation;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "services-marketplace".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
