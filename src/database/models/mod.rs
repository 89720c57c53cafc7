pub mod field;
pub mod list;
pub mod schema;
pub mod tag;
pub mod value;
pub mod video;

pub use field::{CustomField, FieldType};
pub use list::List;
pub use schema::{FieldSchema, SchemaField};
pub use tag::Tag;
pub use value::VideoFieldValue;
pub use video::{Video, VideoTag};
