use axum::{extract::Path, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{FieldSchema, SchemaField};
use crate::error::ApiError;
use crate::services::schema_service::{self, AttachedField, InlineField, SchemaDetail};

use super::pool;

#[derive(Debug, Deserialize)]
pub struct CreateSchemaBody {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<InlineField>,
}

#[derive(Debug, Deserialize)]
pub struct AttachFieldBody {
    pub field_id: Uuid,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub show_on_card: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReorderBody {
    pub field_ids: Vec<Uuid>,
}

/// POST /lists/:list_id/schemas
pub async fn create(
    Path(list_id): Path<Uuid>,
    Json(body): Json<CreateSchemaBody>,
) -> Result<(StatusCode, Json<SchemaDetail>), ApiError> {
    let pool = pool().await?;
    let detail = schema_service::create(
        &pool,
        list_id,
        &body.name,
        body.description.as_deref(),
        body.fields,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /lists/:list_id/schemas
pub async fn index(Path(list_id): Path<Uuid>) -> Result<Json<Vec<FieldSchema>>, ApiError> {
    let pool = pool().await?;
    Ok(Json(schema_service::list_for(&pool, list_id).await?))
}

/// GET /lists/:list_id/schemas/:schema_id
pub async fn show(
    Path((list_id, schema_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SchemaDetail>, ApiError> {
    let pool = pool().await?;
    Ok(Json(schema_service::get(&pool, list_id, schema_id).await?))
}

/// DELETE /lists/:list_id/schemas/:schema_id - associations die with the
/// schema, fields survive, tags bound to it fall back to no schema
pub async fn destroy(
    Path((list_id, schema_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let pool = pool().await?;
    schema_service::delete(&pool, list_id, schema_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /lists/:list_id/schemas/:schema_id/fields
pub async fn attach(
    Path((list_id, schema_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<AttachFieldBody>,
) -> Result<(StatusCode, Json<SchemaField>), ApiError> {
    let pool = pool().await?;
    let row = schema_service::attach_field(
        &pool,
        list_id,
        schema_id,
        body.field_id,
        body.display_order,
        body.show_on_card,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /lists/:list_id/schemas/:schema_id/fields/:field_id
pub async fn detach(
    Path((list_id, schema_id, field_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let pool = pool().await?;
    schema_service::detach_field(&pool, list_id, schema_id, field_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /lists/:list_id/schemas/:schema_id/fields/order
pub async fn reorder(
    Path((list_id, schema_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<ReorderBody>,
) -> Result<Json<Vec<AttachedField>>, ApiError> {
    let pool = pool().await?;
    let fields =
        schema_service::reorder_fields(&pool, list_id, schema_id, &body.field_ids).await?;
    Ok(Json(fields))
}
