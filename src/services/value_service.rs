use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::CustomField;
use crate::fields::{merge_union_rows, FieldConfig, FieldGroup, UnionRow};
use crate::services::{list_service, video_service, ServiceError};

/// One (field, value) pair for a single video. A JSON null value clears the
/// stored value.
#[derive(Debug, Deserialize)]
pub struct ValuePair {
    pub field_id: Uuid,
    #[serde(default)]
    pub value: Value,
}

/// One (video, field, value) triple for the cross-video batch endpoint.
#[derive(Debug, Deserialize)]
pub struct BatchUpdate {
    pub video_id: Uuid,
    pub field_id: Uuid,
    #[serde(default)]
    pub value: Value,
}

/// Set field values for one video. Atomic: either every pair is applied or
/// none are.
pub async fn set_for_video(
    pool: &PgPool,
    video_id: Uuid,
    pairs: Vec<ValuePair>,
) -> Result<u64, ServiceError> {
    let video = video_service::find_any(pool, video_id).await?;
    let updates = pairs
        .into_iter()
        .map(|p| (video_id, p.field_id, p.value))
        .collect();
    apply(pool, video.list_id, updates).await
}

/// Set field values across many videos of one list in a single transaction.
pub async fn batch_set(
    pool: &PgPool,
    list_id: Uuid,
    updates: Vec<BatchUpdate>,
) -> Result<u64, ServiceError> {
    list_service::get(pool, list_id).await?;
    let updates = updates
        .into_iter()
        .map(|u| (u.video_id, u.field_id, u.value))
        .collect();
    apply(pool, list_id, updates).await
}

/// Shared write path. Validation happens entirely before the transaction:
/// every referenced video and field is resolved in one query each, every
/// value checked against its field's config, and any failure rejects the
/// whole batch with a per-field error list. Writes are a single multi-row
/// upsert keyed on (video_id, field_id) plus one delete for cleared values.
async fn apply(
    pool: &PgPool,
    list_id: Uuid,
    updates: Vec<(Uuid, Uuid, Value)>,
) -> Result<u64, ServiceError> {
    if updates.is_empty() {
        return Ok(0);
    }

    // Repeats of the same (video, field) key collapse to the last
    // occurrence; a multi-row upsert cannot touch one row twice.
    let mut positions: HashMap<(Uuid, Uuid), usize> = HashMap::new();
    let mut deduped: Vec<(Uuid, Uuid, Value)> = Vec::with_capacity(updates.len());
    for (video_id, field_id, value) in updates {
        match positions.get(&(video_id, field_id)) {
            Some(&i) => deduped[i].2 = value,
            None => {
                positions.insert((video_id, field_id), deduped.len());
                deduped.push((video_id, field_id, value));
            }
        }
    }

    let mut video_ids: Vec<Uuid> = deduped.iter().map(|(v, _, _)| *v).collect();
    video_ids.sort();
    video_ids.dedup();
    let known: Vec<(Uuid,)> =
        sqlx::query_as("SELECT id FROM videos WHERE id = ANY($1) AND list_id = $2")
            .bind(&video_ids)
            .bind(list_id)
            .fetch_all(pool)
            .await?;
    if known.len() != video_ids.len() {
        let known: Vec<Uuid> = known.into_iter().map(|(id,)| id).collect();
        let missing = video_ids.iter().copied().find(|id| !known.contains(id)).unwrap();
        return Err(ServiceError::not_found(format!("video {} not found in this list", missing)));
    }

    let mut field_ids: Vec<Uuid> = deduped.iter().map(|(_, f, _)| *f).collect();
    field_ids.sort();
    field_ids.dedup();
    let fields: Vec<CustomField> =
        sqlx::query_as("SELECT * FROM custom_fields WHERE id = ANY($1) AND list_id = $2")
            .bind(&field_ids)
            .bind(list_id)
            .fetch_all(pool)
            .await?;
    let fields: HashMap<Uuid, CustomField> = fields.into_iter().map(|f| (f.id, f)).collect();
    if let Some(missing) = field_ids.iter().find(|id| !fields.contains_key(*id)) {
        return Err(ServiceError::not_found(format!("field {} not found in this list", missing)));
    }

    let multi_video = video_ids.len() > 1;
    let mut field_errors: HashMap<String, String> = HashMap::new();
    let mut clears: (Vec<Uuid>, Vec<Uuid>) = (vec![], vec![]);
    let mut writes: (Vec<Uuid>, Vec<Uuid>, Vec<Option<String>>, Vec<Option<f64>>, Vec<Option<bool>>) =
        (vec![], vec![], vec![], vec![], vec![]);

    for (video_id, field_id, value) in &deduped {
        if value.is_null() {
            clears.0.push(*video_id);
            clears.1.push(*field_id);
            continue;
        }
        let field = &fields[field_id];
        let config = FieldConfig::parse(field.field_type, &field.config)
            .map_err(|e| ServiceError::Internal(format!("stored config for field {} is invalid: {}", field_id, e)))?;
        match config.validate_value(value) {
            Ok(validated) => {
                let (text, numeric, boolean) = validated.into_columns();
                writes.0.push(*video_id);
                writes.1.push(*field_id);
                writes.2.push(text);
                writes.3.push(numeric);
                writes.4.push(boolean);
            }
            Err(e) => {
                let key = if multi_video {
                    format!("{}/{}", video_id, field_id)
                } else {
                    field_id.to_string()
                };
                field_errors.insert(key, e.to_string());
            }
        }
    }

    if !field_errors.is_empty() {
        return Err(ServiceError::Validation {
            message: "one or more field values are invalid".to_string(),
            field_errors,
        });
    }

    let mut tx = pool.begin().await?;
    let mut affected = 0u64;

    if !clears.0.is_empty() {
        let result = sqlx::query(
            "DELETE FROM video_field_values
             WHERE (video_id, field_id) IN
                   (SELECT v, f FROM UNNEST($1::uuid[], $2::uuid[]) AS t(v, f))",
        )
        .bind(&clears.0)
        .bind(&clears.1)
        .execute(&mut *tx)
        .await?;
        affected += result.rows_affected();
    }

    if !writes.0.is_empty() {
        let result = sqlx::query(
            "INSERT INTO video_field_values
                 (video_id, field_id, value_text, value_numeric, value_boolean)
             SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::text[], $4::float8[], $5::bool[])
             ON CONFLICT (video_id, field_id) DO UPDATE SET
                 value_text = EXCLUDED.value_text,
                 value_numeric = EXCLUDED.value_numeric,
                 value_boolean = EXCLUDED.value_boolean,
                 updated_at = now()",
        )
        .bind(&writes.0)
        .bind(&writes.1)
        .bind(&writes.2)
        .bind(&writes.3)
        .bind(&writes.4)
        .execute(&mut *tx)
        .await?;
        affected += result.rows_affected();
    }

    tx.commit().await?;
    Ok(affected)
}

/// The per-video field union: one joined query walks video_tags -> tags ->
/// field_schemas -> schema_fields -> custom_fields, left-joined against this
/// video's stored values. Row order encodes tag assignment order, which the
/// merge uses as the duplicate tie-break.
pub async fn field_union(pool: &PgPool, video_id: Uuid) -> Result<Vec<FieldGroup>, ServiceError> {
    let rows = sqlx::query_as::<_, UnionRow>(
        "SELECT f.id AS field_id, f.name AS field_name, f.field_type, f.config,
                sf.display_order, sf.show_on_card, s.name AS schema_name,
                v.value_text, v.value_numeric, v.value_boolean
         FROM video_tags vt
         JOIN tags t ON t.id = vt.tag_id
         JOIN field_schemas s ON s.id = t.schema_id
         JOIN schema_fields sf ON sf.schema_id = s.id
         JOIN custom_fields f ON f.id = sf.field_id
         LEFT JOIN video_field_values v
                ON v.video_id = vt.video_id AND v.field_id = f.id
         WHERE vt.video_id = $1
         ORDER BY vt.assigned_at, t.id, sf.display_order",
    )
    .bind(video_id)
    .fetch_all(pool)
    .await?;

    Ok(merge_union_rows(rows))
}
