use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod config;
mod database;
mod error;
mod fields;
mod handlers;
mod services;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, VIDSHELF_DB, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting vidshelf in {:?} mode", config.environment);

    // Make sure the schema exists before accepting traffic
    let pool = crate::database::manager::DatabaseManager::pool()
        .await
        .expect("database connection");
    crate::database::migrations::bootstrap(&pool)
        .await
        .expect("database bootstrap");

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("VIDSHELF_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("vidshelf API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(list_routes())
        .merge(field_routes())
        .merge(schema_routes())
        .merge(tag_routes())
        .merge(video_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn list_routes() -> Router {
    use axum::routing::post;
    use handlers::lists;

    Router::new()
        .route("/lists", post(lists::create).get(lists::index))
        .route("/lists/:list_id", get(lists::show).delete(lists::destroy))
}

fn field_routes() -> Router {
    use axum::routing::post;
    use handlers::fields;

    Router::new()
        .route(
            "/lists/:list_id/custom-fields",
            post(fields::create).get(fields::index),
        )
        .route(
            "/lists/:list_id/custom-fields/:field_id",
            get(fields::show).delete(fields::destroy),
        )
}

fn schema_routes() -> Router {
    use axum::routing::{delete, post, put};
    use handlers::schemas;

    Router::new()
        .route(
            "/lists/:list_id/schemas",
            post(schemas::create).get(schemas::index),
        )
        .route(
            "/lists/:list_id/schemas/:schema_id",
            get(schemas::show).delete(schemas::destroy),
        )
        .route("/lists/:list_id/schemas/:schema_id/fields", post(schemas::attach))
        .route(
            "/lists/:list_id/schemas/:schema_id/fields/order",
            put(schemas::reorder),
        )
        .route(
            "/lists/:list_id/schemas/:schema_id/fields/:field_id",
            delete(schemas::detach),
        )
}

fn tag_routes() -> Router {
    use axum::routing::post;
    use handlers::tags;

    Router::new()
        .route("/lists/:list_id/tags", post(tags::create).get(tags::index))
        .route(
            "/lists/:list_id/tags/:tag_id",
            get(tags::show).patch(tags::update).delete(tags::destroy),
        )
}

fn video_routes() -> Router {
    use axum::routing::{delete, patch, post, put};
    use handlers::videos;

    Router::new()
        .route(
            "/lists/:list_id/videos",
            post(videos::create).get(videos::index),
        )
        .route(
            "/lists/:list_id/videos/batch-field-values",
            patch(videos::batch_values),
        )
        .route(
            "/lists/:list_id/videos/:video_id",
            get(videos::show).delete(videos::destroy),
        )
        .route("/videos", get(videos::search))
        .route("/videos/:video_id/tags", post(videos::assign_tag))
        .route("/videos/:video_id/tags/:tag_id", delete(videos::unassign_tag))
        .route("/videos/:video_id/fields", put(videos::set_values))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "vidshelf",
        "version": version,
        "description": "Video bookmark API with tag-driven custom metadata fields (Axum)",
        "endpoints": {
            "lists": "/lists[/:list_id]",
            "custom_fields": "/lists/:list_id/custom-fields[/:field_id]",
            "schemas": "/lists/:list_id/schemas[/:schema_id]",
            "schema_fields": "/lists/:list_id/schemas/:schema_id/fields[/order|/:field_id]",
            "tags": "/lists/:list_id/tags[/:tag_id]",
            "videos": "/lists/:list_id/videos[/:video_id], /videos?tags=a,b|tags_all=a,b",
            "video_tags": "/videos/:video_id/tags[/:tag_id]",
            "field_values": "/videos/:video_id/fields, /lists/:list_id/videos/batch-field-values",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
