use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::List;
use crate::services::{unique_conflict, ServiceError};

pub async fn create(pool: &PgPool, name: &str, description: Option<&str>) -> Result<List, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::validation_for("name", "name must not be blank"));
    }

    sqlx::query_as::<_, List>(
        "INSERT INTO lists (name, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
    .map_err(|e| unique_conflict(e, format!("list '{}' already exists", name)))
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<List, ServiceError> {
    sqlx::query_as::<_, List>("SELECT * FROM lists WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("list not found"))
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<List>, ServiceError> {
    let lists = sqlx::query_as::<_, List>("SELECT * FROM lists ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(lists)
}

/// Deleting a list cascades to everything it contains.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ServiceError> {
    let deleted = sqlx::query("DELETE FROM lists WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ServiceError::not_found("list not found"));
    }
    Ok(())
}
