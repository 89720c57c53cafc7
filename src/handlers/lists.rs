use axum::{extract::Path, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::List;
use crate::error::ApiError;
use crate::services::list_service;

use super::pool;

#[derive(Debug, Deserialize)]
pub struct CreateListBody {
    pub name: String,
    pub description: Option<String>,
}

/// POST /lists
pub async fn create(Json(body): Json<CreateListBody>) -> Result<(StatusCode, Json<List>), ApiError> {
    let pool = pool().await?;
    let list = list_service::create(&pool, &body.name, body.description.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// GET /lists
pub async fn index() -> Result<Json<Vec<List>>, ApiError> {
    let pool = pool().await?;
    Ok(Json(list_service::list_all(&pool).await?))
}

/// GET /lists/:list_id
pub async fn show(Path(list_id): Path<Uuid>) -> Result<Json<List>, ApiError> {
    let pool = pool().await?;
    Ok(Json(list_service::get(&pool, list_id).await?))
}

/// DELETE /lists/:list_id
pub async fn destroy(Path(list_id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    let pool = pool().await?;
    list_service::delete(&pool, list_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
