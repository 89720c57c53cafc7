use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Video, VideoTag};
use crate::error::ApiError;
use crate::services::value_service::{self, BatchUpdate, ValuePair};
use crate::services::video_service::{self, NewVideo, VideoDetail};

use super::pool;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub list: Option<Uuid>,
    pub tags: Option<String>,
    pub tags_all: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignTagBody {
    pub tag_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SetValuesBody {
    pub field_values: Vec<ValuePair>,
}

#[derive(Debug, Deserialize)]
pub struct BatchValuesBody {
    pub updates: Vec<BatchUpdate>,
}

/// POST /lists/:list_id/videos
pub async fn create(
    Path(list_id): Path<Uuid>,
    Json(body): Json<NewVideo>,
) -> Result<(StatusCode, Json<Video>), ApiError> {
    let pool = pool().await?;
    let video = video_service::create(&pool, list_id, body).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// GET /lists/:list_id/videos
pub async fn index(Path(list_id): Path<Uuid>) -> Result<Json<Vec<Video>>, ApiError> {
    let pool = pool().await?;
    Ok(Json(video_service::list_for(&pool, list_id).await?))
}

/// GET /lists/:list_id/videos/:video_id - video with tags and field union
pub async fn show(
    Path((list_id, video_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<VideoDetail>, ApiError> {
    let pool = pool().await?;
    Ok(Json(video_service::detail(&pool, list_id, video_id).await?))
}

/// DELETE /lists/:list_id/videos/:video_id
pub async fn destroy(
    Path((list_id, video_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let pool = pool().await?;
    video_service::delete(&pool, list_id, video_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /videos?tags=a,b (any match) or ?tags_all=a,b (all required),
/// optionally scoped with ?list=<uuid>
pub async fn search(Query(query): Query<SearchQuery>) -> Result<Json<Vec<Video>>, ApiError> {
    let pool = pool().await?;
    let videos = video_service::find_by_tags(
        &pool,
        query.list,
        query.tags.as_deref().map(split_names),
        query.tags_all.as_deref().map(split_names),
    )
    .await?;
    Ok(Json(videos))
}

fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// POST /videos/:video_id/tags
pub async fn assign_tag(
    Path(video_id): Path<Uuid>,
    Json(body): Json<AssignTagBody>,
) -> Result<(StatusCode, Json<VideoTag>), ApiError> {
    let pool = pool().await?;
    let row = video_service::assign_tag(&pool, video_id, body.tag_id).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /videos/:video_id/tags/:tag_id
pub async fn unassign_tag(
    Path((video_id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let pool = pool().await?;
    video_service::unassign_tag(&pool, video_id, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /videos/:video_id/fields - set field values for one video atomically,
/// responding with the updated video detail
pub async fn set_values(
    Path(video_id): Path<Uuid>,
    Json(body): Json<SetValuesBody>,
) -> Result<Json<VideoDetail>, ApiError> {
    let pool = pool().await?;
    value_service::set_for_video(&pool, video_id, body.field_values).await?;
    let video = video_service::find_any(&pool, video_id).await?;
    Ok(Json(video_service::detail(&pool, video.list_id, video_id).await?))
}

/// PATCH /lists/:list_id/videos/batch-field-values
pub async fn batch_values(
    Path(list_id): Path<Uuid>,
    Json(body): Json<BatchValuesBody>,
) -> Result<Json<Value>, ApiError> {
    let pool = pool().await?;
    let updated_count = value_service::batch_set(&pool, list_id, body.updates).await?;
    Ok(Json(json!({ "updated_count": updated_count })))
}
