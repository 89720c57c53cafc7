use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user label on videos. `schema_id` is nullable: a tag without a schema
/// exposes no custom fields, and deleting a schema nulls the reference
/// rather than deleting the tag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub list_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub schema_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
