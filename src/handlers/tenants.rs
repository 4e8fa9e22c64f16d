//! # Tenants API Handlers
//!
//! This module contains handlers for tenant creation and management endpoints.

use crate::error::{ApiError, RepositoryError};
use crate::models::tenant;
use crate::repositories::{TenantInput, TenantPatch, TenantRepository};
use crate::server::AppState;
use crate::telemetry;
use axum::{
    Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::Json,
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request payload for creating or replacing a tenant
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantRequestDto {
    /// Display name for the tenant (required, max 255 characters)
    #[schema(example = "Green Thumb Landscaping")]
    pub name: String,
    /// Description of the tenant's business (may be empty)
    #[schema(example = "Expert landscaping and lawn care services.")]
    pub description: String,
    /// Owning user identifier from the user directory
    #[schema(example = "42")]
    pub user_id: String,
    #[schema(example = "greenthumb@example.com")]
    pub contact_email: String,
    /// Contact phone number (optional, max 32 characters)
    #[serde(default)]
    #[schema(example = "123-456-7890")]
    pub phone_number: Option<String>,
}

/// Request payload for a partial tenant update; omitted fields are unchanged
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct TenantPatchDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    /// `null` clears the phone number
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub phone_number: Option<Option<String>>,
}

/// Distinguishes an explicit `null` from an absent field.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Tenant representation returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantDto {
    /// Unique identifier for the tenant (UUID)
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub user_id: String,
    pub contact_email: String,
    pub phone_number: Option<String>,
    /// Timestamp when the tenant was created (ISO 8601)
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub created_at: String,
    /// Timestamp when the tenant was last updated (ISO 8601)
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub updated_at: String,
}

impl From<tenant::Model> for TenantDto {
    fn from(tenant: tenant::Model) -> Self {
        Self {
            id: tenant.id.to_string(),
            name: tenant.name,
            description: tenant.description,
            user_id: tenant.user_id,
            contact_email: tenant.contact_email,
            phone_number: tenant.phone_number,
            created_at: tenant.created_at.to_rfc3339(),
            updated_at: tenant.updated_at.to_rfc3339(),
        }
    }
}

impl From<TenantRequestDto> for TenantInput {
    fn from(request: TenantRequestDto) -> Self {
        Self {
            name: request.name.trim().to_string(),
            description: request.description,
            user_id: request.user_id.trim().to_string(),
            contact_email: request.contact_email.trim().to_string(),
            phone_number: request.phone_number.filter(|p| !p.trim().is_empty()),
        }
    }
}

impl From<TenantPatchDto> for TenantPatch {
    fn from(request: TenantPatchDto) -> Self {
        Self {
            name: request.name.map(|v| v.trim().to_string()),
            description: request.description,
            user_id: request.user_id.map(|v| v.trim().to_string()),
            contact_email: request.contact_email.map(|v| v.trim().to_string()),
            phone_number: request
                .phone_number
                .map(|phone| phone.filter(|p| !p.trim().is_empty())),
        }
    }
}

/// Standard API response wrapper for tenant operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response metadata
    pub meta: TenantResponseMeta,
}

/// Response metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantResponseMeta {
    /// Request identifier (matches the `X-Trace-Id` response header)
    #[schema(example = "1b4e28ba-2fa1-11d2-883f-0016d3cca427")]
    pub request_id: String,
    /// Response timestamp (ISO 8601)
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub timestamp: String,
}

impl<T> TenantApiResponse<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            meta: TenantResponseMeta {
                request_id: telemetry::current_trace_id()
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                timestamp: Utc::now().to_rfc3339(),
            },
        }
    }
}

/// Tenant routes mounted under `/api/v1/tenants`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tenants", get(list_tenants).post(create_tenant))
        .route(
            "/api/v1/tenants/{id}",
            get(get_tenant)
                .put(update_tenant)
                .patch(patch_tenant)
                .delete(delete_tenant),
        )
}

fn tenant_not_found(tenant_id: Uuid) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "TENANT_NOT_FOUND", "Tenant not found").with_details(
        serde_json::json!({
            "tenant_id": tenant_id.to_string()
        }),
    )
}

fn map_repository_error(error: RepositoryError, tenant_id: Uuid) -> ApiError {
    match error {
        RepositoryError::NotFound(_) => tenant_not_found(tenant_id),
        other => other.into(),
    }
}

fn parse_tenant_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "Tenant id must be a valid UUID",
        )
        .with_details(serde_json::json!({
            "field": "id",
            "message": rejection.body_text()
        }))
    })
}

/// List all tenants
#[utoipa::path(
    get,
    path = "/api/v1/tenants",
    responses(
        (status = 200, description = "Tenants ordered by creation time", body = TenantApiResponse<Vec<TenantDto>>),
        (status = 500, description = "Internal server error", body = ApiError),
        (status = 503, description = "Database unavailable", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn list_tenants(
    State(state): State<AppState>,
) -> Result<Json<TenantApiResponse<Vec<TenantDto>>>, ApiError> {
    let repo = TenantRepository::new(&state.db);
    let tenants = repo.list_tenants().await?;

    Ok(Json(TenantApiResponse::new(
        tenants.into_iter().map(TenantDto::from).collect(),
    )))
}

/// Create a new tenant
#[utoipa::path(
    post,
    path = "/api/v1/tenants",
    request_body = TenantRequestDto,
    responses(
        (status = 201, description = "Tenant created successfully", body = TenantApiResponse<TenantDto>, headers(
            ("Location", description = "URL of the created tenant"),
            ("X-Trace-Id", description = "Trace identifier for request correlation")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 409, description = "Conflict - tenant already exists", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    payload: Result<Json<TenantRequestDto>, JsonRejection>,
) -> Result<
    (
        StatusCode,
        [(header::HeaderName, String); 1],
        Json<TenantApiResponse<TenantDto>>,
    ),
    ApiError,
> {
    let Json(request) = payload?;

    let repo = TenantRepository::new(&state.db);
    let tenant = repo.create_tenant(request.into()).await?;

    tracing::info!(tenant_id = %tenant.id, "Tenant created");

    let location_header = format!("/api/v1/tenants/{}", tenant.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location_header)],
        Json(TenantApiResponse::new(tenant.into())),
    ))
}

/// Get a tenant by ID
#[utoipa::path(
    get,
    path = "/api/v1/tenants/{id}",
    params(
        ("id" = Uuid, Path, description = "Tenant UUID")
    ),
    responses(
        (status = 200, description = "Tenant retrieved successfully", body = TenantApiResponse<TenantDto>),
        (status = 400, description = "Malformed tenant id", body = ApiError),
        (status = 404, description = "Tenant not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn get_tenant(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TenantApiResponse<TenantDto>>, ApiError> {
    let tenant_id = parse_tenant_id(path)?;

    let repo = TenantRepository::new(&state.db);
    let tenant = repo
        .get_tenant_by_id(tenant_id)
        .await?
        .ok_or_else(|| tenant_not_found(tenant_id))?;

    Ok(Json(TenantApiResponse::new(tenant.into())))
}

/// Replace all writable fields of a tenant
#[utoipa::path(
    put,
    path = "/api/v1/tenants/{id}",
    params(
        ("id" = Uuid, Path, description = "Tenant UUID")
    ),
    request_body = TenantRequestDto,
    responses(
        (status = 200, description = "Tenant updated", body = TenantApiResponse<TenantDto>),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Tenant not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn update_tenant(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TenantRequestDto>, JsonRejection>,
) -> Result<Json<TenantApiResponse<TenantDto>>, ApiError> {
    let tenant_id = parse_tenant_id(path)?;
    let Json(request) = payload?;

    let repo = TenantRepository::new(&state.db);
    let tenant = repo
        .update_tenant(tenant_id, request.into())
        .await
        .map_err(|e| map_repository_error(e, tenant_id))?;

    Ok(Json(TenantApiResponse::new(tenant.into())))
}

/// Update a subset of a tenant's fields
#[utoipa::path(
    patch,
    path = "/api/v1/tenants/{id}",
    params(
        ("id" = Uuid, Path, description = "Tenant UUID")
    ),
    request_body = TenantPatchDto,
    responses(
        (status = 200, description = "Tenant updated", body = TenantApiResponse<TenantDto>),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Tenant not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn patch_tenant(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TenantPatchDto>, JsonRejection>,
) -> Result<Json<TenantApiResponse<TenantDto>>, ApiError> {
    let tenant_id = parse_tenant_id(path)?;
    let Json(request) = payload?;

    let repo = TenantRepository::new(&state.db);
    let tenant = repo
        .patch_tenant(tenant_id, request.into())
        .await
        .map_err(|e| map_repository_error(e, tenant_id))?;

    Ok(Json(TenantApiResponse::new(tenant.into())))
}

/// Delete a tenant with its locations and services
#[utoipa::path(
    delete,
    path = "/api/v1/tenants/{id}",
    params(
        ("id" = Uuid, Path, description = "Tenant UUID")
    ),
    responses(
        (status = 204, description = "Tenant deleted"),
        (status = 404, description = "Tenant not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn delete_tenant(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let tenant_id = parse_tenant_id(path)?;

    let repo = TenantRepository::new(&state.db);
    repo.delete_tenant(tenant_id)
        .await
        .map_err(|e| map_repository_error(e, tenant_id))?;

    tracing::info!(tenant_id = %tenant_id, "Tenant deleted");

    Ok(StatusCode::NO_CONTENT)
}
