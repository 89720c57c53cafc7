use std::collections::HashSet;

use serde_json::{json, Value};
use thiserror::Error;

use crate::database::models::FieldType;

/// Errors from config or value validation. Always client-fixable; handlers
/// surface these as 422 with the offending field named.
#[derive(Debug, Error, PartialEq)]
pub enum FieldConfigError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

use FieldConfigError::{InvalidConfig, InvalidValue};

/// Parsed, validated per-type configuration. One variant per field type;
/// the JSON blob stored on a field always round-trips through this enum so
/// malformed configs never reach the database.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldConfig {
    Select { options: Vec<String> },
    Rating { max_rating: i64 },
    Text { max_length: Option<i64> },
    Boolean,
}

/// A validated value, routed to the column the field's type stores into.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Numeric(f64),
    Boolean(bool),
}

impl FieldValue {
    /// Split into the (value_text, value_numeric, value_boolean) column triple.
    pub fn into_columns(self) -> (Option<String>, Option<f64>, Option<bool>) {
        match self {
            FieldValue::Text(s) => (Some(s), None, None),
            FieldValue::Numeric(n) => (None, Some(n), None),
            FieldValue::Boolean(b) => (None, None, Some(b)),
        }
    }
}

impl FieldConfig {
    /// Parse and validate a raw config blob against the declared field type.
    pub fn parse(field_type: FieldType, config: &Value) -> Result<Self, FieldConfigError> {
        let obj = match config {
            Value::Null => None,
            Value::Object(map) => Some(map),
            _ => return Err(InvalidConfig("config must be a JSON object".into())),
        };

        match field_type {
            FieldType::Select => {
                let obj = obj.ok_or_else(|| InvalidConfig("select fields require an options list".into()))?;
                let raw = obj
                    .get("options")
                    .and_then(|v| v.as_array())
                    .ok_or_else(|| InvalidConfig("select fields require an options list".into()))?;

                let mut options = Vec::with_capacity(raw.len());
                let mut seen = HashSet::new();
                for item in raw {
                    let option = item
                        .as_str()
                        .map(str::trim)
                        .ok_or_else(|| InvalidConfig("options must be strings".into()))?;
                    if option.is_empty() {
                        return Err(InvalidConfig("options must not be blank".into()));
                    }
                    if !seen.insert(option.to_lowercase()) {
                        return Err(InvalidConfig(format!("duplicate option '{}'", option)));
                    }
                    options.push(option.to_string());
                }
                if options.is_empty() {
                    return Err(InvalidConfig("select fields require at least one option".into()));
                }
                Ok(FieldConfig::Select { options })
            }
            FieldType::Rating => {
                let obj = obj.ok_or_else(|| InvalidConfig("rating fields require max_rating".into()))?;
                let max_rating = obj
                    .get("max_rating")
                    .and_then(|v| v.as_i64())
                    .ok_or_else(|| InvalidConfig("max_rating must be an integer".into()))?;
                if !(1..=10).contains(&max_rating) {
                    return Err(InvalidConfig("max_rating must be between 1 and 10".into()));
                }
                Ok(FieldConfig::Rating { max_rating })
            }
            FieldType::Text => {
                let max_length = match obj.and_then(|o| o.get("max_length")) {
                    None | Some(Value::Null) => None,
                    Some(v) => {
                        let n = v
                            .as_i64()
                            .ok_or_else(|| InvalidConfig("max_length must be an integer".into()))?;
                        if n < 1 {
                            return Err(InvalidConfig("max_length must be at least 1".into()));
                        }
                        Some(n)
                    }
                };
                Ok(FieldConfig::Text { max_length })
            }
            FieldType::Boolean => {
                if obj.map(|o| !o.is_empty()).unwrap_or(false) {
                    return Err(InvalidConfig("boolean fields take no config".into()));
                }
                Ok(FieldConfig::Boolean)
            }
        }
    }

    /// Normalized JSON form persisted on the field row. Options come back
    /// trimmed, which keeps stored configs equal to what validation saw.
    pub fn to_json(&self) -> Value {
        match self {
            FieldConfig::Select { options } => json!({ "options": options }),
            FieldConfig::Rating { max_rating } => json!({ "max_rating": max_rating }),
            FieldConfig::Text { max_length: Some(n) } => json!({ "max_length": n }),
            FieldConfig::Text { max_length: None } => json!({}),
            FieldConfig::Boolean => json!({}),
        }
    }

    /// Validate a raw value against this config, routing it to its storage
    /// column. Values are never coerced; a wrong JSON type is an error.
    pub fn validate_value(&self, value: &Value) -> Result<FieldValue, FieldConfigError> {
        match self {
            FieldConfig::Select { options } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| InvalidValue("select values must be strings".into()))?;
                if !options.iter().any(|o| o == s) {
                    return Err(InvalidValue(format!("'{}' is not one of the configured options", s)));
                }
                Ok(FieldValue::Text(s.to_string()))
            }
            FieldConfig::Rating { max_rating } => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| InvalidValue("rating values must be numbers".into()))?;
                if n < 1.0 || n > *max_rating as f64 {
                    return Err(InvalidValue(format!("rating must be between 1 and {}", max_rating)));
                }
                // Whole and half steps only (1, 1.5, 2, ...).
                if (n * 2.0).fract() != 0.0 {
                    return Err(InvalidValue("rating must be a whole or half step".into()));
                }
                Ok(FieldValue::Numeric(n))
            }
            FieldConfig::Text { max_length } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| InvalidValue("text values must be strings".into()))?;
                if let Some(max) = max_length {
                    if s.chars().count() as i64 > *max {
                        return Err(InvalidValue(format!("text exceeds maximum length of {}", max)));
                    }
                }
                Ok(FieldValue::Text(s.to_string()))
            }
            FieldConfig::Boolean => {
                let b = value
                    .as_bool()
                    .ok_or_else(|| InvalidValue("boolean values must be true or false".into()))?;
                Ok(FieldValue::Boolean(b))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn select_requires_nonempty_options() {
        let err = FieldConfig::parse(FieldType::Select, &json!({ "options": [] })).unwrap_err();
        assert!(matches!(err, FieldConfigError::InvalidConfig(_)));

        let err = FieldConfig::parse(FieldType::Select, &json!({})).unwrap_err();
        assert!(matches!(err, FieldConfigError::InvalidConfig(_)));
    }

    #[test]
    fn select_rejects_case_insensitive_duplicates() {
        let config = json!({ "options": ["Good", "  good "] });
        let err = FieldConfig::parse(FieldType::Select, &config).unwrap_err();
        assert!(matches!(err, FieldConfigError::InvalidConfig(_)));
    }

    #[test]
    fn select_trims_options_and_matches_exactly() {
        let config = json!({ "options": [" Great ", "Bad"] });
        let parsed = FieldConfig::parse(FieldType::Select, &config).unwrap();
        assert_eq!(
            parsed,
            FieldConfig::Select { options: vec!["Great".into(), "Bad".into()] }
        );

        assert_eq!(
            parsed.validate_value(&json!("Great")).unwrap(),
            FieldValue::Text("Great".into())
        );
        // Matching is exact after config-side trimming, not case-insensitive.
        assert!(parsed.validate_value(&json!("great")).is_err());
    }

    #[test]
    fn rating_bounds_config() {
        assert!(FieldConfig::parse(FieldType::Rating, &json!({ "max_rating": 11 })).is_err());
        assert!(FieldConfig::parse(FieldType::Rating, &json!({ "max_rating": 0 })).is_err());
        assert!(FieldConfig::parse(FieldType::Rating, &json!({ "max_rating": "5" })).is_err());
        assert!(FieldConfig::parse(FieldType::Rating, &json!({ "max_rating": 10 })).is_ok());
    }

    #[test]
    fn rating_bounds_value() {
        let config = FieldConfig::Rating { max_rating: 5 };
        assert!(config.validate_value(&json!(7)).is_err());
        assert!(config.validate_value(&json!(0.5)).is_err());
        assert_eq!(config.validate_value(&json!(3)).unwrap(), FieldValue::Numeric(3.0));
        assert_eq!(config.validate_value(&json!(3.5)).unwrap(), FieldValue::Numeric(3.5));
        assert!(config.validate_value(&json!(3.25)).is_err());
        assert!(config.validate_value(&json!("3")).is_err());
    }

    #[test]
    fn text_length_limit() {
        let unlimited = FieldConfig::parse(FieldType::Text, &json!({})).unwrap();
        assert_eq!(unlimited, FieldConfig::Text { max_length: None });
        assert!(unlimited.validate_value(&json!("x".repeat(10_000))).is_ok());

        assert!(FieldConfig::parse(FieldType::Text, &json!({ "max_length": 0 })).is_err());

        let bounded = FieldConfig::parse(FieldType::Text, &json!({ "max_length": 3 })).unwrap();
        assert!(bounded.validate_value(&json!("abc")).is_ok());
        assert!(bounded.validate_value(&json!("abcd")).is_err());
        // Character count, not byte count.
        assert!(bounded.validate_value(&json!("äöü")).is_ok());
    }

    #[test]
    fn boolean_takes_no_config_and_strict_values() {
        assert!(FieldConfig::parse(FieldType::Boolean, &json!({ "anything": 1 })).is_err());
        let config = FieldConfig::parse(FieldType::Boolean, &json!({})).unwrap();
        assert_eq!(config.validate_value(&json!(true)).unwrap(), FieldValue::Boolean(true));
        assert!(config.validate_value(&json!(1)).is_err());
        assert!(config.validate_value(&json!("true")).is_err());
    }

    #[test]
    fn normalized_json_round_trips() {
        let config = json!({ "options": [" A ", "B"] });
        let parsed = FieldConfig::parse(FieldType::Select, &config).unwrap();
        let stored = parsed.to_json();
        assert_eq!(FieldConfig::parse(FieldType::Select, &stored).unwrap(), parsed);
    }
}
