//! Widget schema registry
//!
//! Recognized prop and style keys per widget type, with defaults and value
//! types. Used to seed new widgets and to flag suspicious values; the
//! projection engine itself never consults it.

mod error;
mod registry;

pub use error::SchemaError;
pub use registry::{
    DefaultSize, FieldDef, FieldType, IssueLevel, SchemaIssue, SchemaRegistry, WidgetSchema,
};
