use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{CustomField, FieldSchema, FieldType, SchemaField};
use crate::fields::FieldConfig;
use crate::services::{list_service, unique_conflict, ServiceError};

/// A field definition supplied inline with schema creation. The field is
/// created in the schema's list and attached in one transaction.
#[derive(Debug, Deserialize)]
pub struct InlineField {
    pub name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub show_on_card: bool,
}

/// A schema with its attached fields in display order.
#[derive(Debug, Serialize)]
pub struct SchemaDetail {
    #[serde(flatten)]
    pub schema: FieldSchema,
    pub fields: Vec<AttachedField>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AttachedField {
    pub field_id: Uuid,
    pub name: String,
    pub field_type: FieldType,
    pub config: Value,
    pub display_order: i32,
    pub show_on_card: bool,
}

/// Create a schema, optionally with inline field definitions. Inline fields
/// are new fields; a name that already exists in the list is a conflict, the
/// same as creating the field directly.
pub async fn create(
    pool: &PgPool,
    list_id: Uuid,
    name: &str,
    description: Option<&str>,
    inline_fields: Vec<InlineField>,
) -> Result<SchemaDetail, ServiceError> {
    list_service::get(pool, list_id).await?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::validation_for("name", "name must not be blank"));
    }

    // Validate every inline config before touching the database.
    let mut parsed = Vec::with_capacity(inline_fields.len());
    for inline in &inline_fields {
        if inline.name.trim().is_empty() {
            return Err(ServiceError::validation_for("fields", "field names must not be blank"));
        }
        parsed.push(FieldConfig::parse(inline.field_type, &inline.config)?);
    }

    let mut tx = pool.begin().await?;

    let schema = sqlx::query_as::<_, FieldSchema>(
        "INSERT INTO field_schemas (list_id, name, description)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(list_id)
    .bind(name)
    .bind(description)
    .fetch_one(&mut *tx)
    .await?;

    let mut fields = Vec::with_capacity(inline_fields.len());
    for (inline, config) in inline_fields.iter().zip(parsed) {
        let field = sqlx::query_as::<_, CustomField>(
            "INSERT INTO custom_fields (list_id, name, field_type, config)
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(list_id)
        .bind(inline.name.trim())
        .bind(inline.field_type)
        .bind(config.to_json())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            unique_conflict(e, format!("field '{}' already exists in this list", inline.name.trim()))
        })?;

        sqlx::query(
            "INSERT INTO schema_fields (schema_id, field_id, display_order, show_on_card)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(schema.id)
        .bind(field.id)
        .bind(inline.display_order)
        .bind(inline.show_on_card)
        .execute(&mut *tx)
        .await?;

        fields.push(AttachedField {
            field_id: field.id,
            name: field.name,
            field_type: field.field_type,
            config: field.config,
            display_order: inline.display_order,
            show_on_card: inline.show_on_card,
        });
    }

    tx.commit().await?;

    fields.sort_by_key(|f| f.display_order);
    Ok(SchemaDetail { schema, fields })
}

pub async fn list_for(pool: &PgPool, list_id: Uuid) -> Result<Vec<FieldSchema>, ServiceError> {
    list_service::get(pool, list_id).await?;

    let schemas = sqlx::query_as::<_, FieldSchema>(
        "SELECT * FROM field_schemas WHERE list_id = $1 ORDER BY name",
    )
    .bind(list_id)
    .fetch_all(pool)
    .await?;
    Ok(schemas)
}

pub async fn get(pool: &PgPool, list_id: Uuid, schema_id: Uuid) -> Result<SchemaDetail, ServiceError> {
    let schema = find(pool, list_id, schema_id).await?;
    let fields = attached_fields(pool, schema_id).await?;
    Ok(SchemaDetail { schema, fields })
}

/// Deleting a schema removes its associations (the fields stay) and nulls
/// the schema reference on any tag bound to it.
pub async fn delete(pool: &PgPool, list_id: Uuid, schema_id: Uuid) -> Result<(), ServiceError> {
    let deleted = sqlx::query("DELETE FROM field_schemas WHERE id = $1 AND list_id = $2")
        .bind(schema_id)
        .bind(list_id)
        .execute(pool)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ServiceError::not_found("schema not found"));
    }
    Ok(())
}

/// Attach an existing field. Callers own display_order assignment; nothing
/// is renumbered here.
pub async fn attach_field(
    pool: &PgPool,
    list_id: Uuid,
    schema_id: Uuid,
    field_id: Uuid,
    display_order: i32,
    show_on_card: bool,
) -> Result<SchemaField, ServiceError> {
    find(pool, list_id, schema_id).await?;
    crate::services::field_service::get(pool, list_id, field_id).await?;

    sqlx::query_as::<_, SchemaField>(
        "INSERT INTO schema_fields (schema_id, field_id, display_order, show_on_card)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(schema_id)
    .bind(field_id)
    .bind(display_order)
    .bind(show_on_card)
    .fetch_one(pool)
    .await
    .map_err(|e| unique_conflict(e, "field is already attached to this schema"))
}

/// Idempotent removal of the association only; the field itself is untouched.
pub async fn detach_field(
    pool: &PgPool,
    list_id: Uuid,
    schema_id: Uuid,
    field_id: Uuid,
) -> Result<(), ServiceError> {
    find(pool, list_id, schema_id).await?;

    sqlx::query("DELETE FROM schema_fields WHERE schema_id = $1 AND field_id = $2")
        .bind(schema_id)
        .bind(field_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Rewrite display_order for the whole schema to match the given sequence
/// (0-based). The id set must match the schema's current fields exactly.
pub async fn reorder_fields(
    pool: &PgPool,
    list_id: Uuid,
    schema_id: Uuid,
    ordered_field_ids: &[Uuid],
) -> Result<Vec<AttachedField>, ServiceError> {
    find(pool, list_id, schema_id).await?;

    let current: Vec<(Uuid,)> =
        sqlx::query_as("SELECT field_id FROM schema_fields WHERE schema_id = $1")
            .bind(schema_id)
            .fetch_all(pool)
            .await?;
    let current: HashSet<Uuid> = current.into_iter().map(|(id,)| id).collect();

    let requested: HashSet<Uuid> = ordered_field_ids.iter().copied().collect();
    if requested.len() != ordered_field_ids.len() {
        return Err(ServiceError::validation_for("field_ids", "duplicate field ids"));
    }
    if requested != current {
        return Err(ServiceError::validation_for(
            "field_ids",
            "field ids must match the schema's current fields exactly",
        ));
    }

    let orders: Vec<i32> = (0..ordered_field_ids.len() as i32).collect();
    sqlx::query(
        "UPDATE schema_fields AS sf
         SET display_order = u.display_order
         FROM (SELECT * FROM UNNEST($2::uuid[], $3::int4[]) AS t(field_id, display_order)) AS u
         WHERE sf.schema_id = $1 AND sf.field_id = u.field_id",
    )
    .bind(schema_id)
    .bind(ordered_field_ids)
    .bind(&orders)
    .execute(pool)
    .await?;

    attached_fields(pool, schema_id).await
}

async fn find(pool: &PgPool, list_id: Uuid, schema_id: Uuid) -> Result<FieldSchema, ServiceError> {
    sqlx::query_as::<_, FieldSchema>(
        "SELECT * FROM field_schemas WHERE id = $1 AND list_id = $2",
    )
    .bind(schema_id)
    .bind(list_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::not_found("schema not found"))
}

async fn attached_fields(pool: &PgPool, schema_id: Uuid) -> Result<Vec<AttachedField>, ServiceError> {
    let fields = sqlx::query_as::<_, AttachedField>(
        "SELECT f.id AS field_id, f.name, f.field_type, f.config,
                sf.display_order, sf.show_on_card
         FROM schema_fields sf
         JOIN custom_fields f ON f.id = sf.field_id
         WHERE sf.schema_id = $1
         ORDER BY sf.display_order, f.name",
    )
    .bind(schema_id)
    .fetch_all(pool)
    .await?;
    Ok(fields)
}
