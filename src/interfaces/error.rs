use crate::backend::ConfigurationError;
use crate::registry::MetadataError;
use crate::schema::SchemaError;
use crate::writer::WriterError;

/// Errors raised by data interfaces and the converter
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    /// Schema derivation failed
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Metadata or options did not validate
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Backend configuration could not be applied
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Writing the container failed
    #[error("Writer error: {0}")]
    Writer(#[from] WriterError),

    /// Options that validate but cannot be deserialized
    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// A metadata field holds an unusable value
    #[error("Invalid metadata at {path}: {reason}")]
    InvalidMetadata {
        /// `$.a.b` style location
        path: String,
        /// What is wrong
        reason: String,
    },

    /// Two interfaces registered under the same name
    #[error("An interface named '{0}' is already registered")]
    DuplicateInterface(String),
}
