use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The value a user entered for one field on one video. Exactly one of the
/// three value columns is populated, chosen by the field's type:
/// select/text -> value_text, rating -> value_numeric, boolean -> value_boolean.
/// Unique on (video_id, field_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VideoFieldValue {
    pub id: Uuid,
    pub video_id: Uuid,
    pub field_id: Uuid,
    pub value_text: Option<String>,
    pub value_numeric: Option<f64>,
    pub value_boolean: Option<bool>,
    pub updated_at: DateTime<Utc>,
}
