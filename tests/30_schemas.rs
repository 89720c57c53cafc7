mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

// Schema CRUD, field association management, and the cascade rules around
// schema deletion.

async fn create_field(base_url: &str, list_id: Uuid, name: &str) -> Result<Uuid> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/lists/{}/custom-fields", base_url, list_id))
        .json(&json!({ "name": name, "field_type": "boolean", "config": {} }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "field create failed: {}", res.status());
    let body: Value = res.json().await?;
    common::id_of(&body)
}

#[tokio::test]
async fn create_schema_with_inline_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let list_id = common::create_list(&server.base_url).await?;

    let res = client
        .post(format!("{}/lists/{}/schemas", server.base_url, list_id))
        .json(&json!({
            "name": "Quality",
            "description": "How good was it",
            "fields": [
                { "name": "Rating", "field_type": "rating", "config": { "max_rating": 5 }, "display_order": 1, "show_on_card": true },
                { "name": "Verdict", "field_type": "select", "config": { "options": ["Keep", "Drop"] }, "display_order": 0 }
            ]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let detail: Value = res.json().await?;
    assert_eq!(detail["name"], "Quality");
    let fields = detail["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    // Ordered by display_order
    assert_eq!(fields[0]["name"], "Verdict");
    assert_eq!(fields[1]["name"], "Rating");
    assert_eq!(fields[1]["show_on_card"], json!(true));

    // Inline fields are real fields of the list
    let listed: Value = client
        .get(format!("{}/lists/{}/custom-fields", server.base_url, list_id))
        .send()
        .await?
        .json()
        .await?;
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["name"].as_str())
        .collect();
    assert!(names.contains(&"Rating") && names.contains(&"Verdict"));

    Ok(())
}

#[tokio::test]
async fn inline_field_with_invalid_config_rejects_whole_schema() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let list_id = common::create_list(&server.base_url).await?;

    let res = client
        .post(format!("{}/lists/{}/schemas", server.base_url, list_id))
        .json(&json!({
            "name": "Broken",
            "fields": [
                { "name": "Fine", "field_type": "boolean" },
                { "name": "Bad", "field_type": "select", "config": { "options": [] } }
            ]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing was written: no schema, no fields
    let schemas: Value = client
        .get(format!("{}/lists/{}/schemas", server.base_url, list_id))
        .send()
        .await?
        .json()
        .await?;
    assert!(schemas.as_array().unwrap().is_empty());
    let fields: Value = client
        .get(format!("{}/lists/{}/custom-fields", server.base_url, list_id))
        .send()
        .await?
        .json()
        .await?;
    assert!(fields.as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn attach_conflicts_on_duplicate_and_detach_is_idempotent() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let list_id = common::create_list(&server.base_url).await?;
    let field_id = create_field(&server.base_url, list_id, "Watched").await?;

    let schema: Value = client
        .post(format!("{}/lists/{}/schemas", server.base_url, list_id))
        .json(&json!({ "name": "Tracking" }))
        .send()
        .await?
        .json()
        .await?;
    let schema_id = common::id_of(&schema)?;

    let attach_url = format!("{}/lists/{}/schemas/{}/fields", server.base_url, list_id, schema_id);
    let attach_body = json!({ "field_id": field_id, "display_order": 0, "show_on_card": true });

    let first = client.post(&attach_url).json(&attach_body).send().await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client.post(&attach_url).json(&attach_body).send().await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let detach_url = format!(
        "{}/lists/{}/schemas/{}/fields/{}",
        server.base_url, list_id, schema_id, field_id
    );
    for _ in 0..2 {
        let res = client.delete(&detach_url).send().await?;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    // Detaching never deletes the field itself
    let field = client
        .get(format!("{}/lists/{}/custom-fields/{}", server.base_url, list_id, field_id))
        .send()
        .await?;
    assert_eq!(field.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn reorder_requires_exact_field_set() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let list_id = common::create_list(&server.base_url).await?;

    let schema: Value = client
        .post(format!("{}/lists/{}/schemas", server.base_url, list_id))
        .json(&json!({
            "name": "Ordered",
            "fields": [
                { "name": "A", "field_type": "boolean", "display_order": 0 },
                { "name": "B", "field_type": "boolean", "display_order": 1 }
            ]
        }))
        .send()
        .await?
        .json()
        .await?;
    let schema_id = common::id_of(&schema)?;
    let ids: Vec<Uuid> = schema["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| Uuid::parse_str(f["field_id"].as_str().unwrap()).unwrap())
        .collect();

    let order_url = format!(
        "{}/lists/{}/schemas/{}/fields/order",
        server.base_url, list_id, schema_id
    );

    // Missing one id
    let partial = client
        .put(&order_url)
        .json(&json!({ "field_ids": [ids[0]] }))
        .send()
        .await?;
    assert_eq!(partial.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Unknown id mixed in
    let unknown = client
        .put(&order_url)
        .json(&json!({ "field_ids": [ids[0], Uuid::new_v4()] }))
        .send()
        .await?;
    assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Exact set, reversed: positions become 0-based sequence
    let reversed = client
        .put(&order_url)
        .json(&json!({ "field_ids": [ids[1], ids[0]] }))
        .send()
        .await?;
    assert_eq!(reversed.status(), StatusCode::OK);
    let fields: Value = reversed.json().await?;
    let names: Vec<&str> = fields
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["B", "A"]);

    Ok(())
}

#[tokio::test]
async fn deleting_schema_keeps_fields_and_unbinds_tags() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let list_id = common::create_list(&server.base_url).await?;

    let schema: Value = client
        .post(format!("{}/lists/{}/schemas", server.base_url, list_id))
        .json(&json!({
            "name": "Quality",
            "fields": [{ "name": "Rating", "field_type": "rating", "config": { "max_rating": 5 } }]
        }))
        .send()
        .await?
        .json()
        .await?;
    let schema_id = common::id_of(&schema)?;
    let field_id = Uuid::parse_str(schema["fields"][0]["field_id"].as_str().unwrap())?;

    let tag: Value = client
        .post(format!("{}/lists/{}/tags", server.base_url, list_id))
        .json(&json!({ "name": "Tutorial", "schema_id": schema_id }))
        .send()
        .await?
        .json()
        .await?;
    let tag_id = common::id_of(&tag)?;
    assert_eq!(tag["schema_id"], json!(schema_id.to_string()));

    let deleted = client
        .delete(format!("{}/lists/{}/schemas/{}", server.base_url, list_id, schema_id))
        .send()
        .await?;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    // The field survives the schema
    let field = client
        .get(format!("{}/lists/{}/custom-fields/{}", server.base_url, list_id, field_id))
        .send()
        .await?;
    assert_eq!(field.status(), StatusCode::OK);

    // The tag survives with its schema reference cleared
    let tag: Value = client
        .get(format!("{}/lists/{}/tags/{}", server.base_url, list_id, tag_id))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(tag["schema_id"], Value::Null);

    Ok(())
}
