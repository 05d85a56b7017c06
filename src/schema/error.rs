use thiserror::Error;

/// Errors that can occur when loading or querying widget schemas
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse schema TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no schema registered for widget type '{kind}'")]
    UnknownType { kind: String },
}

impl SchemaError {
    pub fn unknown_type(kind: impl Into<String>) -> Self {
        Self::UnknownType { kind: kind.into() }
    }
}
