pub mod fields;
pub mod lists;
pub mod schemas;
pub mod tags;
pub mod videos;

use sqlx::PgPool;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;

pub(crate) async fn pool() -> Result<PgPool, ApiError> {
    Ok(DatabaseManager::pool().await?)
}
