use axum::{extract::Path, http::StatusCode, Json};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::database::models::Tag;
use crate::error::ApiError;
use crate::services::tag_service::{self, TagUpdate};

use super::pool;

#[derive(Debug, Deserialize)]
pub struct CreateTagBody {
    pub name: String,
    pub color: Option<String>,
    pub schema_id: Option<Uuid>,
}

/// PATCH body. `color` and `schema_id` distinguish "absent" (leave alone)
/// from "null" (clear), so a tag can be unbound from its schema explicitly.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTagBody {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "some_nullable")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "some_nullable")]
    pub schema_id: Option<Option<Uuid>>,
}

fn some_nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// POST /lists/:list_id/tags
pub async fn create(
    Path(list_id): Path<Uuid>,
    Json(body): Json<CreateTagBody>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let pool = pool().await?;
    let tag = tag_service::create(
        &pool,
        list_id,
        &body.name,
        body.color.as_deref(),
        body.schema_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// GET /lists/:list_id/tags
pub async fn index(Path(list_id): Path<Uuid>) -> Result<Json<Vec<Tag>>, ApiError> {
    let pool = pool().await?;
    Ok(Json(tag_service::list_for(&pool, list_id).await?))
}

/// GET /lists/:list_id/tags/:tag_id
pub async fn show(Path((list_id, tag_id)): Path<(Uuid, Uuid)>) -> Result<Json<Tag>, ApiError> {
    let pool = pool().await?;
    Ok(Json(tag_service::get(&pool, list_id, tag_id).await?))
}

/// PATCH /lists/:list_id/tags/:tag_id
pub async fn update(
    Path((list_id, tag_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateTagBody>,
) -> Result<Json<Tag>, ApiError> {
    let pool = pool().await?;
    let update = TagUpdate {
        name: body.name,
        color: body.color,
        schema_id: body.schema_id,
    };
    Ok(Json(tag_service::update(&pool, list_id, tag_id, update).await?))
}

/// DELETE /lists/:list_id/tags/:tag_id
pub async fn destroy(Path((list_id, tag_id)): Path<(Uuid, Uuid)>) -> Result<StatusCode, ApiError> {
    let pool = pool().await?;
    tag_service::delete(&pool, list_id, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
