use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::response::{success, SuccessResponse};
use crate::domain::metal::{ListOptions, Metal, MetalFilter, MetalPatch, MetalUpdate};
use crate::domain::repositories::MetalRepository;
use crate::infrastructure::repositories::PostgresMetalRepository;

/// Request body for creating a metal
#[derive(Debug, Deserialize)]
pub struct CreateMetalRequest {
    pub name: String,
    pub grade: Option<String>,
    pub density: Option<Decimal>,
    pub attributes: Option<Value>,
}

/// Request body for bulk insert
#[derive(Debug, Deserialize)]
pub struct BulkInsertRequest {
    pub data: Vec<CreateMetalRequest>,
}

/// Request body for filtered list queries
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListMetalsRequest {
    pub query: MetalFilter,
    pub options: ListOptions,
}

/// Request body for count-only queries
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CountMetalsRequest {
    pub query: MetalFilter,
}

/// Request body for full update of a metal
#[derive(Debug, Deserialize)]
pub struct UpdateMetalRequest {
    pub name: String,
    pub grade: Option<String>,
    pub density: Option<Decimal>,
    pub attributes: Option<Value>,
}

/// Request body for bulk update by filter
#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    #[serde(default)]
    pub filter: MetalFilter,
    pub data: MetalPatch,
}

/// Request body carrying a batch of record IDs
#[derive(Debug, Deserialize)]
pub struct IdBatchRequest {
    pub ids: Vec<Uuid>,
}

/// Query parameters for the hard-delete endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteParams {
    /// Report the dependent-record count instead of deleting
    pub is_warning: bool,
}

/// Metal record as returned to clients
#[derive(Debug, Serialize)]
pub struct MetalResponse {
    pub id: Uuid,
    pub name: String,
    pub grade: Option<String>,
    pub density: Option<Decimal>,
    pub attributes: Value,
    pub added_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Metal> for MetalResponse {
    fn from(metal: &Metal) -> Self {
        Self {
            id: metal.id(),
            name: metal.name().to_string(),
            grade: metal.grade().map(str::to_string),
            density: metal.density(),
            attributes: metal.attributes().clone(),
            added_by: metal.added_by(),
            updated_by: metal.updated_by(),
            is_deleted: metal.is_deleted(),
            created_at: metal.created_at(),
            updated_at: metal.updated_at(),
        }
    }
}

/// Pagination block returned alongside list results
#[derive(Debug, Serialize)]
pub struct Paginator {
    pub item_count: i64,
    pub per_page: i64,
    pub page_count: i64,
    pub current_page: u32,
}

/// Payload of a successful list query
#[derive(Debug, Serialize)]
pub struct ListMetalsResponse {
    pub data: Vec<MetalResponse>,
    pub paginator: Paginator,
}

fn build_metal(req: CreateMetalRequest, added_by: Uuid) -> Result<Metal, ApiError> {
    Metal::new(
        req.name,
        req.grade,
        req.density,
        req.attributes.unwrap_or_else(|| json!({})),
        added_by,
    )
    .map_err(ApiError::validation_error)
}

/// Create a new metal
///
/// POST /api/metals
pub async fn create_metal(
    State(pool): State<PgPool>,
    JwtAuth(user_id): JwtAuth,
    Json(req): Json<CreateMetalRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<MetalResponse>>), ApiError> {
    // Validation happens in the domain, before any database call
    let metal = build_metal(req, user_id)?;

    let repo = PostgresMetalRepository::new(pool);
    repo.save(&metal).await?;

    Ok((
        StatusCode::CREATED,
        Json(success("Record created successfully", MetalResponse::from(&metal))),
    ))
}

/// Insert a batch of metals
///
/// POST /api/metals/bulk
pub async fn bulk_insert_metals(
    State(pool): State<PgPool>,
    JwtAuth(user_id): JwtAuth,
    Json(req): Json<BulkInsertRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<Vec<MetalResponse>>>), ApiError> {
    if req.data.is_empty() {
        return Err(ApiError::validation_error("Data array cannot be empty"));
    }

    let metals = req
        .data
        .into_iter()
        .map(|item| build_metal(item, user_id))
        .collect::<Result<Vec<_>, _>>()?;

    let repo = PostgresMetalRepository::new(pool);
    repo.insert_many(&metals).await?;

    let responses = metals.iter().map(MetalResponse::from).collect();
    Ok((
        StatusCode::CREATED,
        Json(success("Records created successfully", responses)),
    ))
}

/// Find metals matching a filter, paginated
///
/// POST /api/metals/list
pub async fn list_metals(
    State(pool): State<PgPool>,
    JwtAuth(_user_id): JwtAuth,
    Json(req): Json<ListMetalsRequest>,
) -> Result<Json<SuccessResponse<ListMetalsResponse>>, ApiError> {
    let repo = PostgresMetalRepository::new(pool);
    let page = repo.find(&req.query, &req.options).await?;

    let response = ListMetalsResponse {
        data: page.items.iter().map(MetalResponse::from).collect(),
        paginator: Paginator {
            item_count: page.total,
            per_page: page.limit,
            page_count: page.total_pages(),
            current_page: page.page,
        },
    };

    Ok(Json(success("Records found", response)))
}

/// Count metals matching a filter
///
/// POST /api/metals/count
pub async fn count_metals(
    State(pool): State<PgPool>,
    JwtAuth(_user_id): JwtAuth,
    Json(req): Json<CountMetalsRequest>,
) -> Result<Json<SuccessResponse<Value>>, ApiError> {
    let repo = PostgresMetalRepository::new(pool);
    let total = repo.count(&req.query).await?;

    Ok(Json(success("Records counted", json!({ "total_records": total }))))
}

/// Get a metal by ID
///
/// GET /api/metals/:id
pub async fn get_metal(
    State(pool): State<PgPool>,
    JwtAuth(_user_id): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse<MetalResponse>>, ApiError> {
    let repo = PostgresMetalRepository::new(pool);
    let metal = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::record_not_found(format!("Record not found: {}", id)))?;

    Ok(Json(success("Record found", MetalResponse::from(&metal))))
}

/// Replace the mutable fields of a metal
///
/// PUT /api/metals/:id
pub async fn update_metal(
    State(pool): State<PgPool>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMetalRequest>,
) -> Result<Json<SuccessResponse<MetalResponse>>, ApiError> {
    let repo = PostgresMetalRepository::new(pool);
    let mut metal = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::record_not_found(format!("Record not found: {}", id)))?;

    metal
        .apply_update(
            MetalUpdate {
                name: req.name,
                grade: req.grade,
                density: req.density,
                attributes: req.attributes.unwrap_or_else(|| json!({})),
            },
            user_id,
        )
        .map_err(ApiError::validation_error)?;

    repo.save(&metal).await?;

    Ok(Json(success("Record updated successfully", MetalResponse::from(&metal))))
}

/// Apply a patch to every metal matching a filter
///
/// PUT /api/metals/bulk-update
pub async fn bulk_update_metals(
    State(pool): State<PgPool>,
    JwtAuth(user_id): JwtAuth,
    Json(req): Json<BulkUpdateRequest>,
) -> Result<Json<SuccessResponse<Value>>, ApiError> {
    if req.data.is_empty() {
        return Err(ApiError::validation_error("Patch contains no fields to update"));
    }
    req.data.validate().map_err(ApiError::validation_error)?;

    let repo = PostgresMetalRepository::new(pool);
    let count = repo.update_many(&req.filter, &req.data, user_id).await?;

    Ok(Json(success("Records updated", json!({ "count": count }))))
}

/// Change only the provided fields of a metal
///
/// PATCH /api/metals/:id
pub async fn partial_update_metal(
    State(pool): State<PgPool>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<Uuid>,
    Json(patch): Json<MetalPatch>,
) -> Result<Json<SuccessResponse<MetalResponse>>, ApiError> {
    let repo = PostgresMetalRepository::new(pool);
    let mut metal = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::record_not_found(format!("Record not found: {}", id)))?;

    metal
        .apply_patch(patch, user_id)
        .map_err(ApiError::validation_error)?;

    repo.save(&metal).await?;

    Ok(Json(success("Record updated successfully", MetalResponse::from(&metal))))
}

/// Soft-delete a metal
///
/// PUT /api/metals/:id/soft-delete
pub async fn soft_delete_metal(
    State(pool): State<PgPool>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse<MetalResponse>>, ApiError> {
    let repo = PostgresMetalRepository::new(pool);
    let mut metal = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::record_not_found(format!("Record not found: {}", id)))?;

    metal
        .mark_deleted(user_id)
        .map_err(ApiError::validation_error)?;

    repo.save(&metal).await?;

    Ok(Json(success("Record deleted successfully", MetalResponse::from(&metal))))
}

/// Soft-delete a batch of metals
///
/// PUT /api/metals/soft-delete-many
pub async fn soft_delete_many_metals(
    State(pool): State<PgPool>,
    JwtAuth(user_id): JwtAuth,
    Json(req): Json<IdBatchRequest>,
) -> Result<Json<SuccessResponse<Value>>, ApiError> {
    if req.ids.is_empty() {
        return Err(ApiError::validation_error("Ids array cannot be empty"));
    }

    let repo = PostgresMetalRepository::new(pool);
    let count = repo.soft_delete_many(&req.ids, user_id).await?;

    Ok(Json(success("Records deleted", json!({ "count": count }))))
}

/// Hard-delete a metal and its dependent records
///
/// DELETE /api/metals/:id
///
/// With `?is_warning=true` the record is left alone and the response
/// carries the dependent-record count instead.
pub async fn delete_metal(
    State(pool): State<PgPool>,
    JwtAuth(_user_id): JwtAuth,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<SuccessResponse<Value>>, ApiError> {
    let repo = PostgresMetalRepository::new(pool);
    let metal = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::record_not_found(format!("Record not found: {}", id)))?;

    if params.is_warning {
        let dependents = repo.count_dependents(&[id]).await?;
        return Ok(Json(success(
            "Dependent records found",
            json!({ "metal_lots": dependents }),
        )));
    }

    repo.delete(id).await?;

    Ok(Json(success(
        "Record deleted successfully",
        serde_json::to_value(MetalResponse::from(&metal))
            .map_err(|e| ApiError::internal_server_error(e.to_string()))?,
    )))
}

/// Hard-delete a batch of metals and their dependent records
///
/// POST /api/metals/delete-many
pub async fn delete_many_metals(
    State(pool): State<PgPool>,
    JwtAuth(_user_id): JwtAuth,
    Query(params): Query<DeleteParams>,
    Json(req): Json<IdBatchRequest>,
) -> Result<Json<SuccessResponse<Value>>, ApiError> {
    if req.ids.is_empty() {
        return Err(ApiError::validation_error("Ids array cannot be empty"));
    }

    let repo = PostgresMetalRepository::new(pool);

    if params.is_warning {
        let dependents = repo.count_dependents(&req.ids).await?;
        return Ok(Json(success(
            "Dependent records found",
            json!({ "metal_lots": dependents }),
        )));
    }

    let count = repo.delete_many(&req.ids).await?;

    Ok(Json(success("Records deleted", json!({ "count": count }))))
}
