mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

// Field CRUD and config validation. Requires DATABASE_URL (and optionally
// VIDSHELF_DB) to point at a scratch Postgres database.

#[tokio::test]
async fn create_rating_field_round_trips_config() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let list_id = common::create_list(&server.base_url).await?;

    let res = client
        .post(format!("{}/lists/{}/custom-fields", server.base_url, list_id))
        .json(&json!({ "name": "Overall Rating", "field_type": "rating", "config": { "max_rating": 5 } }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let field: Value = res.json().await?;
    assert_eq!(field["name"], "Overall Rating");
    assert_eq!(field["field_type"], "rating");
    assert_eq!(field["config"], json!({ "max_rating": 5 }));

    Ok(())
}

#[tokio::test]
async fn select_options_are_trimmed_and_stored_normalized() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let list_id = common::create_list(&server.base_url).await?;

    let res = client
        .post(format!("{}/lists/{}/custom-fields", server.base_url, list_id))
        .json(&json!({ "name": "Mood", "field_type": "select", "config": { "options": [" Fun ", "Serious"] } }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let field: Value = res.json().await?;
    assert_eq!(field["config"]["options"], json!(["Fun", "Serious"]));

    Ok(())
}

#[tokio::test]
async fn invalid_configs_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let list_id = common::create_list(&server.base_url).await?;

    let cases = vec![
        json!({ "name": "Empty select", "field_type": "select", "config": { "options": [] } }),
        json!({ "name": "Dup select", "field_type": "select", "config": { "options": ["Yes", "yes"] } }),
        json!({ "name": "Big rating", "field_type": "rating", "config": { "max_rating": 11 } }),
        json!({ "name": "Zero rating", "field_type": "rating", "config": { "max_rating": 0 } }),
        json!({ "name": "Short text", "field_type": "text", "config": { "max_length": 0 } }),
        json!({ "name": "Configured bool", "field_type": "boolean", "config": { "default": true } }),
    ];

    for case in cases {
        let res = client
            .post(format!("{}/lists/{}/custom-fields", server.base_url, list_id))
            .json(&case)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY, "accepted: {}", case);
        let body: Value = res.json().await?;
        assert!(body.get("detail").is_some(), "no detail in {}", body);
        assert!(body["field_errors"].get("config").is_some(), "no config error in {}", body);
    }

    Ok(())
}

#[tokio::test]
async fn duplicate_field_name_conflicts() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let list_id = common::create_list(&server.base_url).await?;

    let body = json!({ "name": "Watched", "field_type": "boolean", "config": {} });
    let url = format!("{}/lists/{}/custom-fields", server.base_url, list_id);

    let first = client.post(&url).json(&body).send().await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client.post(&url).json(&body).send().await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let err: Value = second.json().await?;
    assert!(err["detail"].as_str().unwrap_or_default().contains("already exists"));

    Ok(())
}

#[tokio::test]
async fn unknown_list_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!(
            "{}/lists/{}/custom-fields",
            server.base_url,
            uuid::Uuid::new_v4()
        ))
        .json(&json!({ "name": "Orphan", "field_type": "text", "config": {} }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn delete_field_then_gone() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let list_id = common::create_list(&server.base_url).await?;

    let created: Value = client
        .post(format!("{}/lists/{}/custom-fields", server.base_url, list_id))
        .json(&json!({ "name": "Notes", "field_type": "text" }))
        .send()
        .await?
        .json()
        .await?;
    let field_id = common::id_of(&created)?;

    let url = format!("{}/lists/{}/custom-fields/{}", server.base_url, list_id, field_id);
    let deleted = client.delete(&url).send().await?;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = client.get(&url).send().await?;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    Ok(())
}
