use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A bookmarked YouTube video. Metadata columns mirror what the Data API
/// returns for a video snippet; all of them are optional except the id and
/// title supplied at bookmark time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Video {
    pub id: Uuid,
    pub list_id: Uuid,
    pub youtube_id: String,
    pub title: String,
    pub channel_title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub published_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tag assignment join row. `assigned_at` makes "first tag wins" tie-breaks
/// in the field union deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VideoTag {
    pub video_id: Uuid,
    pub tag_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}
