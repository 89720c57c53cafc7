use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A reusable, named bundle of custom fields. Tags reference a schema to
/// decide which fields their videos expose.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FieldSchema {
    pub id: Uuid,
    pub list_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join row between a schema and a field, carrying per-association
/// presentation metadata. Unique on (schema_id, field_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SchemaField {
    pub id: Uuid,
    pub schema_id: Uuid,
    pub field_id: Uuid,
    pub display_order: i32,
    pub show_on_card: bool,
}
