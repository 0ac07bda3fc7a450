use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::compression::{validate_compression, CompressionMethod};
use super::{ConfigurationError, DataType};

/// On-disk layout a container is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Single hierarchical HDF5 file
    Hdf5,
    /// Zarr v2 directory store
    Zarr,
}

impl BackendKind {
    /// Display label, e.g. `HDF5`
    pub fn label(self) -> &'static str {
        match self {
            BackendKind::Hdf5 => "HDF5",
            BackendKind::Zarr => "Zarr",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::Hdf5 => "hdf5",
            BackendKind::Zarr => "zarr",
        })
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hdf5" | "h5" => Ok(BackendKind::Hdf5),
            "zarr" => Ok(BackendKind::Zarr),
            other => Err(format!("unknown backend '{other}' (expected hdf5 or zarr)")),
        }
    }
}

/// Byte budgets used to size default chunks and buffers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingBudget {
    /// Target size of one chunk, in MB (10^6 bytes)
    pub chunk_mb: f64,
    /// Target size of one write buffer, in GB (10^9 bytes)
    pub buffer_gb: f64,
}

impl Default for ChunkingBudget {
    fn default() -> Self {
        Self {
            chunk_mb: 1.0,
            buffer_gb: 1.0,
        }
    }
}

impl ChunkingBudget {
    /// Chunk budget in bytes
    pub fn chunk_bytes(&self) -> f64 {
        self.chunk_mb * 1e6
    }

    /// Buffer budget in bytes
    pub fn buffer_bytes(&self) -> f64 {
        self.buffer_gb * 1e9
    }
}

/// Chunking, buffering and compression of one array dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfiguration {
    /// Location inside the container, e.g. `acquisition/<name>/data`
    pub dataset_path: String,
    /// Backend the settings are meant for
    pub backend: BackendKind,
    /// Shape of the whole array
    pub full_shape: Vec<usize>,
    /// Element type
    pub dtype: DataType,
    /// Storage tile
    pub chunk_shape: Vec<usize>,
    /// In-memory write batch, made of whole chunks
    pub buffer_shape: Vec<usize>,
    /// Codec, `None` for uncompressed
    pub compression_method: Option<CompressionMethod>,
    /// Codec options, e.g. `{"level": 4}`
    #[serde(default)]
    pub compression_options: Map<String, Value>,
}

impl DatasetConfiguration {
    /// Set the `level` compression option.
    pub fn set_compression_level(&mut self, level: u32) {
        self.compression_options
            .insert("level".into(), Value::from(level));
    }

    /// Size in bytes of a region of `shape`
    fn bytes_of(&self, shape: &[usize]) -> u64 {
        shape.iter().map(|&n| n as u64).product::<u64>() * self.dtype.itemsize() as u64
    }

    /// Bytes of the whole array
    pub fn full_bytes(&self) -> u64 {
        self.bytes_of(&self.full_shape)
    }

    /// Bytes of one chunk
    pub fn chunk_bytes(&self) -> u64 {
        self.bytes_of(&self.chunk_shape)
    }

    /// Bytes of one buffer
    pub fn buffer_bytes(&self) -> u64 {
        self.bytes_of(&self.buffer_shape)
    }

    /// Check chunk <= buffer <= full, the chunk-multiple rule and the
    /// compression settings.
    ///
    /// A buffer axis must be a multiple of the chunk axis unless it spans the
    /// whole array along that axis.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let path = || self.dataset_path.clone();
        let rank = self.full_shape.len();

        if self.full_shape.contains(&0) {
            return Err(ConfigurationError::ZeroLengthAxis {
                path: path(),
                shape: self.full_shape.clone(),
            });
        }
        let shapes = [("chunk_shape", &self.chunk_shape), ("buffer_shape", &self.buffer_shape)];
        for (what, shape) in shapes {
            if shape.len() != rank {
                return Err(ConfigurationError::RankMismatch {
                    path: path(),
                    what,
                    expected: rank,
                    actual: shape.len(),
                });
            }
        }
        if self.chunk_shape.contains(&0) {
            return Err(ConfigurationError::InvalidChunkShape {
                path: path(),
                chunk: self.chunk_shape.clone(),
            });
        }
        if self.chunk_shape.iter().zip(&self.buffer_shape).any(|(c, b)| c > b) {
            return Err(ConfigurationError::ChunkExceedsBuffer {
                path: path(),
                chunk: self.chunk_shape.clone(),
                buffer: self.buffer_shape.clone(),
            });
        }
        if self.buffer_shape.iter().zip(&self.full_shape).any(|(b, f)| b > f) {
            return Err(ConfigurationError::BufferExceedsFullShape {
                path: path(),
                buffer: self.buffer_shape.clone(),
                full: self.full_shape.clone(),
            });
        }
        let misaligned = self
            .buffer_shape
            .iter()
            .zip(&self.chunk_shape)
            .zip(&self.full_shape)
            .any(|((b, c), f)| b % c != 0 && b != f);
        if misaligned {
            return Err(ConfigurationError::BufferNotChunkMultiple {
                path: path(),
                buffer: self.buffer_shape.clone(),
                chunk: self.chunk_shape.clone(),
            });
        }

        validate_compression(
            &self.dataset_path,
            self.backend,
            self.compression_method,
            &self.compression_options,
        )
    }
}

impl fmt::Display for DatasetConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.dataset_path)?;
        writeln!(f, "{}", "-".repeat(self.dataset_path.len()))?;
        writeln!(f, "  dtype : {}", self.dtype)?;
        writeln!(f, "  full shape of source array : {}", format_shape(&self.full_shape))?;
        writeln!(f, "  full size of source array : {}", human_readable_size(self.full_bytes()))?;
        writeln!(f)?;
        writeln!(f, "  buffer shape : {}", format_shape(&self.buffer_shape))?;
        writeln!(f, "  expected RAM usage : {}", human_readable_size(self.buffer_bytes()))?;
        writeln!(f)?;
        writeln!(f, "  chunk shape : {}", format_shape(&self.chunk_shape))?;
        writeln!(f, "  disk space usage per chunk : {}", human_readable_size(self.chunk_bytes()))?;
        writeln!(f)?;
        match self.compression_method {
            Some(method) => {
                writeln!(f, "  compression method : {}", method)?;
                if !self.compression_options.is_empty() {
                    writeln!(
                        f,
                        "  compression options : {}",
                        Value::Object(self.compression_options.clone())
                    )?;
                }
            }
            None => writeln!(f, "  compression method : none")?,
        }
        Ok(())
    }
}

/// Dataset configurations of one container, keyed by dataset path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfiguration {
    /// Backend every dataset is configured for
    pub backend: BackendKind,
    /// Per-dataset settings
    pub dataset_configurations: BTreeMap<String, DatasetConfiguration>,
}

impl BackendConfiguration {
    /// Empty configuration for `backend`.
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            dataset_configurations: BTreeMap::new(),
        }
    }

    /// Add or replace the configuration of a dataset.
    pub fn insert(&mut self, configuration: DatasetConfiguration) {
        self.dataset_configurations
            .insert(configuration.dataset_path.clone(), configuration);
    }

    /// Configuration of a dataset
    pub fn get(&self, path: &str) -> Option<&DatasetConfiguration> {
        self.dataset_configurations.get(path)
    }

    /// Configuration of a dataset, for overriding
    pub fn get_mut(&mut self, path: &str) -> Option<&mut DatasetConfiguration> {
        self.dataset_configurations.get_mut(path)
    }

    /// Validate every dataset configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (key, configuration) in &self.dataset_configurations {
            if *key != configuration.dataset_path {
                return Err(ConfigurationError::PathMismatch {
                    key: key.clone(),
                    path: configuration.dataset_path.clone(),
                });
            }
            if configuration.backend != self.backend {
                return Err(ConfigurationError::BackendMismatch {
                    path: key.clone(),
                    expected: self.backend,
                    actual: configuration.backend,
                });
            }
            configuration.validate()?;
        }
        Ok(())
    }
}

impl fmt::Display for BackendConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = format!("{} dataset configurations", self.backend.label());
        writeln!(f)?;
        writeln!(f, "{title}")?;
        writeln!(f, "{}", "=".repeat(title.len()))?;
        for configuration in self.dataset_configurations.values() {
            writeln!(f)?;
            write!(f, "{configuration}")?;
        }
        Ok(())
    }
}

/// `(a, b, c)` rendering of a shape.
pub fn format_shape(shape: &[usize]) -> String {
    let parts: Vec<String> = shape.iter().map(usize::to_string).collect();
    if parts.len() == 1 {
        format!("({},)", parts[0])
    } else {
        format!("({})", parts.join(", "))
    }
}

/// Decimal size with two digits, e.g. `115.20 MB`.
pub fn human_readable_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}
