use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{CustomField, FieldType};
use crate::fields::FieldConfig;
use crate::services::{list_service, unique_conflict, ServiceError};

/// Create a field after validating its config against the declared type.
/// The config is persisted in normalized form (options trimmed).
pub async fn create(
    pool: &PgPool,
    list_id: Uuid,
    name: &str,
    field_type: FieldType,
    config: &Value,
) -> Result<CustomField, ServiceError> {
    list_service::get(pool, list_id).await?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::validation_for("name", "name must not be blank"));
    }
    let parsed = FieldConfig::parse(field_type, config)?;

    sqlx::query_as::<_, CustomField>(
        "INSERT INTO custom_fields (list_id, name, field_type, config)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(list_id)
    .bind(name)
    .bind(field_type)
    .bind(parsed.to_json())
    .fetch_one(pool)
    .await
    .map_err(|e| unique_conflict(e, format!("field '{}' already exists in this list", name)))
}

pub async fn list_for(pool: &PgPool, list_id: Uuid) -> Result<Vec<CustomField>, ServiceError> {
    list_service::get(pool, list_id).await?;

    let fields = sqlx::query_as::<_, CustomField>(
        "SELECT * FROM custom_fields WHERE list_id = $1 ORDER BY name",
    )
    .bind(list_id)
    .fetch_all(pool)
    .await?;
    Ok(fields)
}

pub async fn get(pool: &PgPool, list_id: Uuid, field_id: Uuid) -> Result<CustomField, ServiceError> {
    sqlx::query_as::<_, CustomField>(
        "SELECT * FROM custom_fields WHERE id = $1 AND list_id = $2",
    )
    .bind(field_id)
    .bind(list_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::not_found("field not found"))
}

/// Deleting a field cascades to its stored values; schema associations
/// holding it are removed by the same policy.
pub async fn delete(pool: &PgPool, list_id: Uuid, field_id: Uuid) -> Result<(), ServiceError> {
    let deleted = sqlx::query("DELETE FROM custom_fields WHERE id = $1 AND list_id = $2")
        .bind(field_id)
        .bind(list_id)
        .execute(pool)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ServiceError::not_found("field not found"));
    }
    Ok(())
}
