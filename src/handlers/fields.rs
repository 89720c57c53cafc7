use axum::{extract::Path, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::{CustomField, FieldType};
use crate::error::ApiError;
use crate::services::field_service;

use super::pool;

#[derive(Debug, Deserialize)]
pub struct CreateFieldBody {
    pub name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub config: Value,
}

/// POST /lists/:list_id/custom-fields
pub async fn create(
    Path(list_id): Path<Uuid>,
    Json(body): Json<CreateFieldBody>,
) -> Result<(StatusCode, Json<CustomField>), ApiError> {
    let pool = pool().await?;
    let field =
        field_service::create(&pool, list_id, &body.name, body.field_type, &body.config).await?;
    Ok((StatusCode::CREATED, Json(field)))
}

/// GET /lists/:list_id/custom-fields
pub async fn index(Path(list_id): Path<Uuid>) -> Result<Json<Vec<CustomField>>, ApiError> {
    let pool = pool().await?;
    Ok(Json(field_service::list_for(&pool, list_id).await?))
}

/// GET /lists/:list_id/custom-fields/:field_id
pub async fn show(
    Path((list_id, field_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CustomField>, ApiError> {
    let pool = pool().await?;
    Ok(Json(field_service::get(&pool, list_id, field_id).await?))
}

/// DELETE /lists/:list_id/custom-fields/:field_id - cascades to stored values
pub async fn destroy(
    Path((list_id, field_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let pool = pool().await?;
    field_service::delete(&pool, list_id, field_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
