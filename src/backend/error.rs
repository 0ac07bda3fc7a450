use super::{BackendKind, DataType};

/// A dataset configuration that cannot be applied.
///
/// Every variant names the dataset path it concerns.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// No dataset lives at the configured path
    #[error("Dataset '{path}' not found in the container")]
    DatasetNotFound {
        /// Dataset path
        path: String,
    },

    /// A configuration stored under a key other than its own path
    #[error("Configuration for '{path}' is stored under '{key}'")]
    PathMismatch {
        /// Map key
        key: String,
        /// Path inside the configuration
        path: String,
    },

    /// Chunk or buffer shape rank differs from the array rank
    #[error("Dataset '{path}': {what} has {actual} axes but the array has {expected}")]
    RankMismatch {
        /// Dataset path
        path: String,
        /// `chunk_shape` or `buffer_shape`
        what: &'static str,
        /// Array rank
        expected: usize,
        /// Rank of the configured shape
        actual: usize,
    },

    /// A chunk axis of length zero
    #[error("Dataset '{path}': chunk shape {chunk:?} must be at least 1 along every axis")]
    InvalidChunkShape {
        /// Dataset path
        path: String,
        /// Configured chunk shape
        chunk: Vec<usize>,
    },

    /// Chunk larger than buffer along some axis
    #[error("Dataset '{path}': chunk shape {chunk:?} exceeds buffer shape {buffer:?}")]
    ChunkExceedsBuffer {
        /// Dataset path
        path: String,
        /// Configured chunk shape
        chunk: Vec<usize>,
        /// Configured buffer shape
        buffer: Vec<usize>,
    },

    /// Buffer larger than the array along some axis
    #[error("Dataset '{path}': buffer shape {buffer:?} exceeds full shape {full:?}")]
    BufferExceedsFullShape {
        /// Dataset path
        path: String,
        /// Configured buffer shape
        buffer: Vec<usize>,
        /// Array shape
        full: Vec<usize>,
    },

    /// Buffer axis that is neither a chunk multiple nor the full extent
    #[error(
        "Dataset '{path}': buffer shape {buffer:?} is not a multiple of chunk shape {chunk:?}"
    )]
    BufferNotChunkMultiple {
        /// Dataset path
        path: String,
        /// Configured buffer shape
        buffer: Vec<usize>,
        /// Configured chunk shape
        chunk: Vec<usize>,
    },

    /// An array with an empty axis has nothing to chunk
    #[error("Dataset '{path}': shape {shape:?} has a zero-length axis")]
    ZeroLengthAxis {
        /// Dataset path
        path: String,
        /// Array shape
        shape: Vec<usize>,
    },

    /// Compression method not offered by the backend
    #[error(
        "Dataset '{path}': compression method '{method}' is not supported by the {backend} backend"
    )]
    UnsupportedCompression {
        /// Dataset path
        path: String,
        /// Target backend
        backend: BackendKind,
        /// Requested method
        method: String,
    },

    /// Unknown option key or out-of-range value
    #[error("Dataset '{path}': invalid option for compression method '{method}': {reason}")]
    InvalidCompressionOption {
        /// Dataset path
        path: String,
        /// Compression method, `none` when disabled
        method: String,
        /// What is wrong
        reason: String,
    },

    /// Live array shape differs from the configured full shape
    #[error(
        "Dataset '{path}': configured for shape {configured:?} but the array has shape {actual:?}"
    )]
    ShapeMismatch {
        /// Dataset path
        path: String,
        /// `full_shape` of the configuration
        configured: Vec<usize>,
        /// Shape of the array in the container
        actual: Vec<usize>,
    },

    /// Live array element type differs from the configured one
    #[error("Dataset '{path}': configured for {configured} but the array holds {actual}")]
    DtypeMismatch {
        /// Dataset path
        path: String,
        /// `dtype` of the configuration
        configured: DataType,
        /// Element type of the array in the container
        actual: DataType,
    },

    /// Dataset configured for another backend than the one being written
    #[error("Dataset '{path}': configured for the {actual} backend, expected {expected}")]
    BackendMismatch {
        /// Dataset path
        path: String,
        /// Backend of the enclosing configuration
        expected: BackendKind,
        /// Backend of the dataset configuration
        actual: BackendKind,
    },
}
