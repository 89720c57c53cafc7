use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The four value kinds a custom field can hold. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Select,
    Rating,
    Text,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Select => "select",
            FieldType::Rating => "rating",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(FieldType::Select),
            "rating" => Ok(FieldType::Rating),
            "text" => Ok(FieldType::Text),
            "boolean" => Ok(FieldType::Boolean),
            other => Err(format!("unknown field type '{}'", other)),
        }
    }
}

// Stored in a plain TEXT column, so encode/decode delegate to &str.
impl sqlx::Type<sqlx::Postgres> for FieldType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for FieldType {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for FieldType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        raw.parse().map_err(Into::into)
    }
}

/// A named, typed metadata slot scoped to a list. The config blob is
/// validated against the field type before it is ever persisted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomField {
    pub id: Uuid,
    pub list_id: Uuid,
    pub name: String,
    pub field_type: FieldType,
    pub config: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_round_trips_through_text() {
        for ft in [FieldType::Select, FieldType::Rating, FieldType::Text, FieldType::Boolean] {
            assert_eq!(ft.as_str().parse::<FieldType>().unwrap(), ft);
        }
        assert!("date".parse::<FieldType>().is_err());
    }

    #[test]
    fn field_type_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&FieldType::Select).unwrap(), "\"select\"");
        let ft: FieldType = serde_json::from_str("\"rating\"").unwrap();
        assert_eq!(ft, FieldType::Rating);
    }
}
