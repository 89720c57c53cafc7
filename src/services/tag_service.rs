use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Tag;
use crate::services::{list_service, unique_conflict, ServiceError};

/// Partial update. Outer None = leave alone; inner None = clear the column.
#[derive(Debug, Default)]
pub struct TagUpdate {
    pub name: Option<String>,
    pub color: Option<Option<String>>,
    pub schema_id: Option<Option<Uuid>>,
}

pub async fn create(
    pool: &PgPool,
    list_id: Uuid,
    name: &str,
    color: Option<&str>,
    schema_id: Option<Uuid>,
) -> Result<Tag, ServiceError> {
    list_service::get(pool, list_id).await?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::validation_for("name", "name must not be blank"));
    }
    if let Some(color) = color {
        validate_color(color)?;
    }
    if let Some(schema_id) = schema_id {
        // The schema a tag binds must live in the same list.
        verify_schema_in_list(pool, list_id, schema_id).await?;
    }

    sqlx::query_as::<_, Tag>(
        "INSERT INTO tags (list_id, name, color, schema_id)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(list_id)
    .bind(name)
    .bind(color)
    .bind(schema_id)
    .fetch_one(pool)
    .await
    .map_err(|e| unique_conflict(e, format!("tag '{}' already exists in this list", name)))
}

pub async fn list_for(pool: &PgPool, list_id: Uuid) -> Result<Vec<Tag>, ServiceError> {
    list_service::get(pool, list_id).await?;

    let tags = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE list_id = $1 ORDER BY name")
        .bind(list_id)
        .fetch_all(pool)
        .await?;
    Ok(tags)
}

pub async fn get(pool: &PgPool, list_id: Uuid, tag_id: Uuid) -> Result<Tag, ServiceError> {
    sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1 AND list_id = $2")
        .bind(tag_id)
        .bind(list_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("tag not found"))
}

pub async fn update(
    pool: &PgPool,
    list_id: Uuid,
    tag_id: Uuid,
    update: TagUpdate,
) -> Result<Tag, ServiceError> {
    let current = get(pool, list_id, tag_id).await?;

    let name = match update.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ServiceError::validation_for("name", "name must not be blank"));
            }
            name
        }
        None => current.name,
    };
    let color = match update.color {
        Some(color) => {
            if let Some(ref c) = color {
                validate_color(c)?;
            }
            color
        }
        None => current.color,
    };
    let schema_id = match update.schema_id {
        Some(schema_id) => {
            if let Some(id) = schema_id {
                verify_schema_in_list(pool, list_id, id).await?;
            }
            schema_id
        }
        None => current.schema_id,
    };

    sqlx::query_as::<_, Tag>(
        "UPDATE tags SET name = $3, color = $4, schema_id = $5, updated_at = now()
         WHERE id = $1 AND list_id = $2 RETURNING *",
    )
    .bind(tag_id)
    .bind(list_id)
    .bind(&name)
    .bind(color)
    .bind(schema_id)
    .fetch_one(pool)
    .await
    .map_err(|e| unique_conflict(e, format!("tag '{}' already exists in this list", name)))
}

pub async fn delete(pool: &PgPool, list_id: Uuid, tag_id: Uuid) -> Result<(), ServiceError> {
    let deleted = sqlx::query("DELETE FROM tags WHERE id = $1 AND list_id = $2")
        .bind(tag_id)
        .bind(list_id)
        .execute(pool)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ServiceError::not_found("tag not found"));
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), ServiceError> {
    let ok = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !ok {
        return Err(ServiceError::validation_for("color", "color must be a #RRGGBB hex value"));
    }
    Ok(())
}

async fn verify_schema_in_list(pool: &PgPool, list_id: Uuid, schema_id: Uuid) -> Result<(), ServiceError> {
    let found: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM field_schemas WHERE id = $1 AND list_id = $2")
            .bind(schema_id)
            .bind(list_id)
            .fetch_optional(pool)
            .await?;
    found.map(|_| ()).ok_or_else(|| ServiceError::not_found("schema not found"))
}
