use anyhow::Context;

use crate::database::manager::DatabaseManager;
use crate::database::migrations;

pub async fn handle() -> anyhow::Result<()> {
    let pool = DatabaseManager::pool()
        .await
        .context("failed to connect to database (is DATABASE_URL set?)")?;

    migrations::bootstrap(&pool)
        .await
        .context("failed to create database schema")?;

    println!("Database schema ready");
    Ok(())
}
