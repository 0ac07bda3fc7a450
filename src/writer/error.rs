use std::path::PathBuf;

use crate::backend::{ArrayError, ConfigurationError};

/// Errors that can occur while writing a container to disk
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error encoding or decoding store metadata
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A dataset configuration failed re-validation
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Error reading from an array source
    #[error("Array error: {0}")]
    Array(#[from] ArrayError),

    /// A dataset has no IO settings attached
    #[error("Dataset '{0}' has no backend configuration; run configure_backend first")]
    Unconfigured(String),

    /// Refusing to overwrite an existing store
    #[error("Output path already exists: {0}")]
    AlreadyExists(PathBuf),

    /// The requested backend was not compiled in
    #[error("The {0} backend is not available in this build")]
    BackendUnavailable(String),

    /// Store content that cannot be interpreted
    #[error("Invalid store: {0}")]
    InvalidStore(String),

    /// The Zarr store directory could not be opened
    #[error("Zarr store error: {0}")]
    ZarrStore(#[from] zarrs_filesystem::FilesystemStoreCreateError),

    /// Error reading or writing Zarr store keys
    #[error("Zarr storage error: {0}")]
    ZarrStorage(#[from] zarrs::storage::StorageError),

    /// Zarr array metadata was rejected
    #[error("Zarr array metadata error: {0}")]
    ZarrMetadata(#[from] zarrs::array::ArrayCreateError),

    /// Zarr group metadata was rejected
    #[error("Zarr group metadata error: {0}")]
    ZarrGroup(#[from] zarrs::group::GroupCreateError),

    /// Error encoding or decoding Zarr chunks
    #[error("Zarr array error: {0}")]
    Zarr(#[from] zarrs::array::ArrayError),

    /// Error from the HDF5 library
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
}
