//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM operations
//! for the marketplace entities. Repositories borrow any SeaORM connection, so the
//! same validated write paths work on the pool and inside a transaction.

use rust_decimal::Decimal;

use crate::error::RepositoryError;

pub mod service;
pub mod service_location;
pub mod service_option;
pub mod tenant;
pub mod tenant_location;

pub use service::{NewService, ServiceRepository};
pub use service_location::{NewServiceLocation, ServiceLocationRepository};
pub use service_option::{NewOptionValue, NewServiceOption, ServiceOptionRepository};
pub use tenant::{TenantInput, TenantPatch, TenantRepository};
pub use tenant_location::TenantLocationRepository;

/// Require a non-blank value of at most `max` characters.
pub(crate) fn validate_required(
    field: &str,
    value: &str,
    max: usize,
) -> Result<(), RepositoryError> {
    if value.trim().is_empty() {
        return Err(RepositoryError::validation_error(
            field,
            format!("{field} cannot be empty"),
        ));
    }
    validate_max_len(field, value, max)
}

pub(crate) fn validate_max_len(
    field: &str,
    value: &str,
    max: usize,
) -> Result<(), RepositoryError> {
    if value.chars().count() > max {
        return Err(RepositoryError::validation_error(
            field,
            format!("{field} cannot exceed {max} characters"),
        ));
    }
    Ok(())
}

/// Amounts stored as decimal(10, 2): non-negative, two fractional digits, eight integer digits.
pub(crate) fn validate_amount(field: &str, value: Decimal) -> Result<(), RepositoryError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(RepositoryError::validation_error(
            field,
            format!("{field} cannot be negative"),
        ));
    }
    if value.round_dp(2) != value {
        return Err(RepositoryError::validation_error(
            field,
            format!("{field} cannot have more than 2 decimal places"),
        ));
    }
    if value >= Decimal::from(100_000_000) {
        return Err(RepositoryError::validation_error(
            field,
            format!("{field} cannot have more than 8 integer digits"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_positive(
    field: &str,
    value: Option<i32>,
) -> Result<(), RepositoryError> {
    match value {
        Some(v) if v < 1 => Err(RepositoryError::validation_error(
            field,
            format!("{field} must be at least 1"),
        )),
        _ => Ok(()),
    }
}
