use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Tag, Video, VideoTag};
use crate::fields::FieldGroup;
use crate::services::{list_service, unique_conflict, value_service, ServiceError};

#[derive(Debug, Deserialize)]
pub struct NewVideo {
    pub youtube_id: String,
    pub title: String,
    pub channel_title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub published_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// A video with its tags and the resolved field union.
#[derive(Debug, Serialize)]
pub struct VideoDetail {
    #[serde(flatten)]
    pub video: Video,
    pub tags: Vec<Tag>,
    pub field_groups: Vec<FieldGroup>,
}

pub async fn create(pool: &PgPool, list_id: Uuid, new: NewVideo) -> Result<Video, ServiceError> {
    list_service::get(pool, list_id).await?;

    let youtube_id = new.youtube_id.trim();
    if youtube_id.is_empty() {
        return Err(ServiceError::validation_for("youtube_id", "youtube_id must not be blank"));
    }
    if new.title.trim().is_empty() {
        return Err(ServiceError::validation_for("title", "title must not be blank"));
    }

    sqlx::query_as::<_, Video>(
        "INSERT INTO videos (list_id, youtube_id, title, channel_title, thumbnail_url,
                             duration_seconds, published_at, note)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(list_id)
    .bind(youtube_id)
    .bind(new.title.trim())
    .bind(new.channel_title)
    .bind(new.thumbnail_url)
    .bind(new.duration_seconds)
    .bind(new.published_at)
    .bind(new.note)
    .fetch_one(pool)
    .await
    .map_err(|e| unique_conflict(e, "video is already bookmarked in this list"))
}

pub async fn list_for(pool: &PgPool, list_id: Uuid) -> Result<Vec<Video>, ServiceError> {
    list_service::get(pool, list_id).await?;

    let videos = sqlx::query_as::<_, Video>(
        "SELECT * FROM videos WHERE list_id = $1 ORDER BY created_at DESC",
    )
    .bind(list_id)
    .fetch_all(pool)
    .await?;
    Ok(videos)
}

pub async fn get(pool: &PgPool, list_id: Uuid, video_id: Uuid) -> Result<Video, ServiceError> {
    sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1 AND list_id = $2")
        .bind(video_id)
        .bind(list_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("video not found"))
}

pub async fn delete(pool: &PgPool, list_id: Uuid, video_id: Uuid) -> Result<(), ServiceError> {
    let deleted = sqlx::query("DELETE FROM videos WHERE id = $1 AND list_id = $2")
        .bind(video_id)
        .bind(list_id)
        .execute(pool)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ServiceError::not_found("video not found"));
    }
    Ok(())
}

/// Video with tags and the per-video field union (§ single joined query).
pub async fn detail(pool: &PgPool, list_id: Uuid, video_id: Uuid) -> Result<VideoDetail, ServiceError> {
    let video = get(pool, list_id, video_id).await?;
    let tags = tags_for(pool, video_id).await?;
    let field_groups = value_service::field_union(pool, video_id).await?;
    Ok(VideoDetail { video, tags, field_groups })
}

/// Tag-name filtering. `any_tags` matches videos carrying at least one of
/// the names (OR); `all_tags` requires every name (AND, via GROUP BY ..
/// HAVING COUNT). Supplying both is rejected rather than guessed at.
pub async fn find_by_tags(
    pool: &PgPool,
    list_id: Option<Uuid>,
    any_tags: Option<Vec<String>>,
    all_tags: Option<Vec<String>>,
) -> Result<Vec<Video>, ServiceError> {
    if any_tags.is_some() && all_tags.is_some() {
        return Err(ServiceError::validation_for(
            "tags",
            "tags and tags_all are mutually exclusive",
        ));
    }

    if let Some(names) = any_tags {
        let videos = sqlx::query_as::<_, Video>(
            "SELECT DISTINCT v.* FROM videos v
             JOIN video_tags vt ON vt.video_id = v.id
             JOIN tags t ON t.id = vt.tag_id
             WHERE t.name = ANY($1) AND ($2::uuid IS NULL OR v.list_id = $2)
             ORDER BY v.created_at DESC, v.id",
        )
        .bind(&names)
        .bind(list_id)
        .fetch_all(pool)
        .await?;
        return Ok(videos);
    }

    if let Some(names) = all_tags {
        let count = names.len() as i64;
        let videos = sqlx::query_as::<_, Video>(
            "SELECT v.* FROM videos v
             JOIN video_tags vt ON vt.video_id = v.id
             JOIN tags t ON t.id = vt.tag_id
             WHERE t.name = ANY($1) AND ($2::uuid IS NULL OR v.list_id = $2)
             GROUP BY v.id
             HAVING COUNT(DISTINCT t.name) = $3
             ORDER BY v.created_at DESC, v.id",
        )
        .bind(&names)
        .bind(list_id)
        .bind(count)
        .fetch_all(pool)
        .await?;
        return Ok(videos);
    }

    let videos = sqlx::query_as::<_, Video>(
        "SELECT * FROM videos WHERE ($1::uuid IS NULL OR list_id = $1)
         ORDER BY created_at DESC, id",
    )
    .bind(list_id)
    .fetch_all(pool)
    .await?;
    Ok(videos)
}

/// Assign a tag to a video. Idempotent: re-assigning an already-present tag
/// returns the existing join row.
pub async fn assign_tag(pool: &PgPool, video_id: Uuid, tag_id: Uuid) -> Result<VideoTag, ServiceError> {
    let video = find_any(pool, video_id).await?;
    let tag: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM tags WHERE id = $1 AND list_id = $2")
        .bind(tag_id)
        .bind(video.list_id)
        .fetch_optional(pool)
        .await?;
    if tag.is_none() {
        return Err(ServiceError::not_found("tag not found"));
    }

    let inserted = sqlx::query_as::<_, VideoTag>(
        "INSERT INTO video_tags (video_id, tag_id) VALUES ($1, $2)
         ON CONFLICT (video_id, tag_id) DO NOTHING RETURNING *",
    )
    .bind(video_id)
    .bind(tag_id)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(row) => Ok(row),
        None => {
            let existing = sqlx::query_as::<_, VideoTag>(
                "SELECT * FROM video_tags WHERE video_id = $1 AND tag_id = $2",
            )
            .bind(video_id)
            .bind(tag_id)
            .fetch_one(pool)
            .await?;
            Ok(existing)
        }
    }
}

/// Idempotent removal of a tag assignment.
pub async fn unassign_tag(pool: &PgPool, video_id: Uuid, tag_id: Uuid) -> Result<(), ServiceError> {
    find_any(pool, video_id).await?;

    sqlx::query("DELETE FROM video_tags WHERE video_id = $1 AND tag_id = $2")
        .bind(video_id)
        .bind(tag_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Tags on a video in assignment order.
pub async fn tags_for(pool: &PgPool, video_id: Uuid) -> Result<Vec<Tag>, ServiceError> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT t.* FROM tags t
         JOIN video_tags vt ON vt.tag_id = t.id
         WHERE vt.video_id = $1
         ORDER BY vt.assigned_at, t.id",
    )
    .bind(video_id)
    .fetch_all(pool)
    .await?;
    Ok(tags)
}

pub(crate) async fn find_any(pool: &PgPool, video_id: Uuid) -> Result<Video, ServiceError> {
    sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1")
        .bind(video_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("video not found"))
}
