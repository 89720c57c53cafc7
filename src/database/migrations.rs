use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

/// Bootstrap DDL, executed at server startup and by `shelf init`. Statements
/// are idempotent so repeated runs are safe.
///
/// The three deletion policies on the custom-fields graph are load-bearing:
/// - custom_fields -> video_field_values: CASCADE (values are meaningless
///   without their field)
/// - field_schemas -> schema_fields: CASCADE (associations die with the
///   schema; the fields themselves survive and stay reusable)
/// - field_schemas -> tags.schema_id: SET NULL (a tag outlives its field
///   template)
const TABLES: &[(&str, &str)] = &[
    (
        "lists",
        r#"CREATE TABLE IF NOT EXISTS "lists" (
            "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            "name" TEXT NOT NULL UNIQUE,
            "description" TEXT,
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
    ),
    (
        "custom_fields",
        r#"CREATE TABLE IF NOT EXISTS "custom_fields" (
            "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            "list_id" UUID NOT NULL REFERENCES "lists"("id") ON DELETE CASCADE,
            "name" TEXT NOT NULL,
            "field_type" TEXT NOT NULL CHECK ("field_type" IN ('select', 'rating', 'text', 'boolean')),
            "config" JSONB NOT NULL DEFAULT '{}',
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
            UNIQUE ("list_id", "name")
        )"#,
    ),
    (
        "field_schemas",
        r#"CREATE TABLE IF NOT EXISTS "field_schemas" (
            "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            "list_id" UUID NOT NULL REFERENCES "lists"("id") ON DELETE CASCADE,
            "name" TEXT NOT NULL,
            "description" TEXT,
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
    ),
    (
        "schema_fields",
        r#"CREATE TABLE IF NOT EXISTS "schema_fields" (
            "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            "schema_id" UUID NOT NULL REFERENCES "field_schemas"("id") ON DELETE CASCADE,
            "field_id" UUID NOT NULL REFERENCES "custom_fields"("id") ON DELETE CASCADE,
            "display_order" INT NOT NULL DEFAULT 0,
            "show_on_card" BOOLEAN NOT NULL DEFAULT false,
            UNIQUE ("schema_id", "field_id")
        )"#,
    ),
    (
        "tags",
        r#"CREATE TABLE IF NOT EXISTS "tags" (
            "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            "list_id" UUID NOT NULL REFERENCES "lists"("id") ON DELETE CASCADE,
            "name" TEXT NOT NULL,
            "color" TEXT,
            "schema_id" UUID REFERENCES "field_schemas"("id") ON DELETE SET NULL,
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
            UNIQUE ("list_id", "name")
        )"#,
    ),
    (
        "videos",
        r#"CREATE TABLE IF NOT EXISTS "videos" (
            "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            "list_id" UUID NOT NULL REFERENCES "lists"("id") ON DELETE CASCADE,
            "youtube_id" TEXT NOT NULL,
            "title" TEXT NOT NULL,
            "channel_title" TEXT,
            "thumbnail_url" TEXT,
            "duration_seconds" INT,
            "published_at" TIMESTAMPTZ,
            "note" TEXT,
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
            UNIQUE ("list_id", "youtube_id")
        )"#,
    ),
    (
        "video_tags",
        r#"CREATE TABLE IF NOT EXISTS "video_tags" (
            "video_id" UUID NOT NULL REFERENCES "videos"("id") ON DELETE CASCADE,
            "tag_id" UUID NOT NULL REFERENCES "tags"("id") ON DELETE CASCADE,
            "assigned_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY ("video_id", "tag_id")
        )"#,
    ),
    (
        "video_field_values",
        r#"CREATE TABLE IF NOT EXISTS "video_field_values" (
            "id" UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            "video_id" UUID NOT NULL REFERENCES "videos"("id") ON DELETE CASCADE,
            "field_id" UUID NOT NULL REFERENCES "custom_fields"("id") ON DELETE CASCADE,
            "value_text" TEXT,
            "value_numeric" DOUBLE PRECISION,
            "value_boolean" BOOLEAN,
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
            UNIQUE ("video_id", "field_id")
        )"#,
    ),
];

const INDEXES: &[&str] = &[
    r#"CREATE INDEX IF NOT EXISTS "idx_video_tags_tag_id" ON "video_tags" ("tag_id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_video_field_values_field_id" ON "video_field_values" ("field_id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_tags_schema_id" ON "tags" ("schema_id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_videos_list_id" ON "videos" ("list_id")"#,
];

/// Create all tables and indexes if missing.
pub async fn bootstrap(pool: &PgPool) -> Result<(), DatabaseError> {
    for (name, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await.map_err(|e| {
            DatabaseError::QueryError(format!("failed to create table {}: {}", name, e))
        })?;
    }
    for ddl in INDEXES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("failed to create index: {}", e)))?;
    }
    info!("Database schema ready ({} tables)", TABLES.len());
    Ok(())
}
