pub mod config;
pub mod union;

pub use config::{FieldConfig, FieldConfigError, FieldValue};
pub use union::{merge_union_rows, FieldGroup, ResolvedField, UnionRow};
