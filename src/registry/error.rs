use super::MetadataValidationError;
use crate::schema::SchemaError;

/// Errors that can occur while loading, assembling or validating metadata
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// I/O error reading a metadata or schema file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parse or serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is neither JSON nor YAML
    #[error("Unsupported metadata file type: {0}")]
    UnsupportedFileType(String),

    /// Schema could not be derived from a class table
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The schema itself is not a valid Draft-07 document
    #[error("Invalid JSON Schema: {0}")]
    InvalidSchema(String),

    /// The document violates the schema
    #[error("Metadata failed validation with {} error(s): {}", .0.len(), summarize(.0))]
    Invalid(Vec<MetadataValidationError>),
}

fn summarize(errors: &[MetadataValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
