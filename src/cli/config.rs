//! TOML configuration file support.
//!
//! Instead of repeating flags, chunking and compression can be set in a file:
//!
//! ```toml
//! # nwbconv.toml
//! [chunking]
//! chunk_mb = 10.0
//! buffer_gb = 0.5
//!
//! [compression]
//! method = "gzip"   # gzip, lzf, zlib or none
//! level = 5
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use nwbconv::backend::{default_level, BackendConfiguration, ChunkingBudget, CompressionMethod};

/// Root configuration structure for nwbconv.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Byte budgets for default chunk and buffer shapes.
    #[serde(default)]
    pub chunking: ChunkingBudget,

    /// Compression applied to every dataset.
    #[serde(default)]
    pub compression: CompressionConfig,
}

/// Compression settings; unset fields keep the backend defaults.
#[derive(Debug, Default, Deserialize)]
pub struct CompressionConfig {
    /// Codec name, or `none` to disable compression.
    pub method: Option<String>,

    /// Codec level (gzip and zlib only).
    pub level: Option<u32>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// The file at `path`, or the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// True when the file sets any compression field.
    pub fn overrides_compression(&self) -> bool {
        self.compression.method.is_some() || self.compression.level.is_some()
    }

    /// Apply the compression settings to every dataset of `configuration`.
    pub fn apply(&self, configuration: &mut BackendConfiguration) -> Result<()> {
        let backend = configuration.backend;
        let method = match self.compression.method.as_deref() {
            None => None,
            Some(name) if name.eq_ignore_ascii_case("none") => Some(None),
            Some(name) => match name.parse::<CompressionMethod>() {
                Ok(method) => Some(Some(method)),
                Err(e) => bail!("Invalid [compression] method: {}", e),
            },
        };

        for dataset in configuration.dataset_configurations.values_mut() {
            if let Some(method) = method {
                dataset.compression_method = method;
                dataset.compression_options.clear();
                if matches!(method, Some(CompressionMethod::Gzip | CompressionMethod::Zlib)) {
                    dataset.set_compression_level(default_level(backend));
                }
            }
            if let Some(level) = self.compression.level {
                dataset.set_compression_level(level);
            }
        }
        configuration
            .validate()
            .context("Configured compression is not valid for this backend")?;
        Ok(())
    }
}
