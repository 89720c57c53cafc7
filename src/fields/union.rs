use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::models::FieldType;

/// One row of the union query: video_tags -> tags -> field_schemas ->
/// schema_fields -> custom_fields, left-joined against this video's stored
/// values. Rows arrive ordered by (assigned_at, tag_id, display_order), so
/// tag assignment order is encoded in row order.
#[derive(Debug, Clone, FromRow)]
pub struct UnionRow {
    pub field_id: Uuid,
    pub field_name: String,
    pub field_type: FieldType,
    pub config: Value,
    pub display_order: i32,
    pub show_on_card: bool,
    pub schema_name: String,
    pub value_text: Option<String>,
    pub value_numeric: Option<f64>,
    pub value_boolean: Option<bool>,
}

/// A field in the resolved union, annotated with its current value
/// (JSON null when unset) and the presentation metadata of the schema
/// occurrence that won the de-dup.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedField {
    pub field_id: Uuid,
    pub field_name: String,
    pub field_type: FieldType,
    pub config: Value,
    pub display_order: i32,
    pub show_on_card: bool,
    pub value: Value,
}

/// Fields grouped by the schema they were attributed to.
#[derive(Debug, Clone, Serialize)]
pub struct FieldGroup {
    pub schema_name: String,
    pub fields: Vec<ResolvedField>,
}

/// Merge union rows into grouped, ordered output.
///
/// When the same field is reachable through two schemas, the first row wins:
/// with input ordered by tag assignment, that is the earliest-assigned tag's
/// schema. Groups sort by schema name case-insensitively; fields within a
/// group by display_order.
pub fn merge_union_rows(rows: Vec<UnionRow>) -> Vec<FieldGroup> {
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut groups: Vec<FieldGroup> = Vec::new();

    for row in rows {
        if !seen.insert(row.field_id) {
            continue;
        }
        let value = row_value(&row);
        let field = ResolvedField {
            field_id: row.field_id,
            field_name: row.field_name,
            field_type: row.field_type,
            config: row.config,
            display_order: row.display_order,
            show_on_card: row.show_on_card,
            value,
        };
        match groups.iter().position(|g| g.schema_name == row.schema_name) {
            Some(i) => groups[i].fields.push(field),
            None => groups.push(FieldGroup { schema_name: row.schema_name, fields: vec![field] }),
        }
    }

    for group in groups.iter_mut() {
        group.fields.sort_by_key(|f| f.display_order);
    }
    // User-entered display text, so compare lowercased rather than by bytes.
    groups.sort_by(|a, b| {
        a.schema_name
            .to_lowercase()
            .cmp(&b.schema_name.to_lowercase())
            .then_with(|| a.schema_name.cmp(&b.schema_name))
    });
    groups
}

/// Pick the populated value column by field type; JSON null when unset.
fn row_value(row: &UnionRow) -> Value {
    match row.field_type {
        FieldType::Select | FieldType::Text => {
            row.value_text.as_ref().map(|s| Value::from(s.clone())).unwrap_or(Value::Null)
        }
        FieldType::Rating => row.value_numeric.map(Value::from).unwrap_or(Value::Null),
        FieldType::Boolean => row.value_boolean.map(Value::from).unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(field: Uuid, name: &str, schema: &str, order: i32) -> UnionRow {
        UnionRow {
            field_id: field,
            field_name: name.to_string(),
            field_type: FieldType::Rating,
            config: json!({ "max_rating": 5 }),
            display_order: order,
            show_on_card: false,
            schema_name: schema.to_string(),
            value_text: None,
            value_numeric: None,
            value_boolean: None,
        }
    }

    #[test]
    fn duplicate_field_appears_once_first_occurrence_wins() {
        let shared = Uuid::new_v4();
        let mut first = row(shared, "Rating", "Quality", 0);
        first.value_numeric = Some(4.0);
        let mut second = row(shared, "Rating", "Watchlist", 3);
        second.value_numeric = Some(4.0);

        let groups = merge_union_rows(vec![first, second]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].schema_name, "Quality");
        assert_eq!(groups[0].fields.len(), 1);
        assert_eq!(groups[0].fields[0].display_order, 0);
        assert_eq!(groups[0].fields[0].value, json!(4.0));
    }

    #[test]
    fn groups_sort_case_insensitively_fields_by_display_order() {
        let rows = vec![
            row(Uuid::new_v4(), "B", "beta", 1),
            row(Uuid::new_v4(), "A", "Alpha", 2),
            row(Uuid::new_v4(), "C", "beta", 0),
        ];
        let groups = merge_union_rows(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].schema_name, "Alpha");
        assert_eq!(groups[1].schema_name, "beta");
        let names: Vec<&str> = groups[1].fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["C", "B"]);
    }

    #[test]
    fn unset_value_is_json_null() {
        let groups = merge_union_rows(vec![row(Uuid::new_v4(), "Rating", "Quality", 0)]);
        assert_eq!(groups[0].fields[0].value, Value::Null);
    }

    #[test]
    fn boolean_and_text_values_route_by_type() {
        let mut text = row(Uuid::new_v4(), "Notes", "Misc", 0);
        text.field_type = FieldType::Text;
        text.config = json!({});
        text.value_text = Some("great".into());

        let mut flag = row(Uuid::new_v4(), "Watched", "Misc", 1);
        flag.field_type = FieldType::Boolean;
        flag.config = json!({});
        flag.value_boolean = Some(true);

        let groups = merge_union_rows(vec![text, flag]);
        assert_eq!(groups[0].fields[0].value, json!("great"));
        assert_eq!(groups[0].fields[1].value, json!(true));
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(merge_union_rows(vec![]).is_empty());
    }
}
