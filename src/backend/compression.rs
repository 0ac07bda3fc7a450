//! Compression catalogue per backend.
//!
//! | Backend | Method | Options | Default |
//! |---------|--------|---------|---------|
//! | HDF5 | `gzip` | `level` 0-9 | level 4 |
//! | HDF5 | `lzf` | none | |
//! | Zarr | `gzip` | `level` 0-9 | level 1 |
//! | Zarr | `zlib` | `level` 0-9 | |
//!
//! No method at all (`None`) disables compression on either backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{BackendKind, ConfigurationError};

/// A lossless compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMethod {
    /// DEFLATE with gzip framing (HDF5 `deflate` filter, numcodecs `gzip`)
    Gzip,
    /// LZF (HDF5 only)
    Lzf,
    /// DEFLATE with zlib framing (Zarr only)
    Zlib,
}

impl CompressionMethod {
    /// Lowercase codec name
    pub fn name(self) -> &'static str {
        match self {
            CompressionMethod::Gzip => "gzip",
            CompressionMethod::Lzf => "lzf",
            CompressionMethod::Zlib => "zlib",
        }
    }

    fn takes_level(self) -> bool {
        matches!(self, CompressionMethod::Gzip | CompressionMethod::Zlib)
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gzip" | "deflate" => Ok(CompressionMethod::Gzip),
            "lzf" => Ok(CompressionMethod::Lzf),
            "zlib" => Ok(CompressionMethod::Zlib),
            other => Err(format!("unknown compression method '{other}'")),
        }
    }
}

/// Compression methods a backend can write.
pub fn available_compression_methods(backend: BackendKind) -> &'static [CompressionMethod] {
    match backend {
        BackendKind::Hdf5 => &[CompressionMethod::Gzip, CompressionMethod::Lzf],
        BackendKind::Zarr => &[CompressionMethod::Gzip, CompressionMethod::Zlib],
    }
}

/// Default method and options for a backend.
pub fn default_compression(
    backend: BackendKind,
) -> (Option<CompressionMethod>, Map<String, Value>) {
    let mut options = Map::new();
    options.insert("level".into(), Value::from(default_level(backend)));
    (Some(CompressionMethod::Gzip), options)
}

/// Default level used when a level-taking method has no `level` option.
pub fn default_level(backend: BackendKind) -> u32 {
    match backend {
        BackendKind::Hdf5 => 4,
        BackendKind::Zarr => 1,
    }
}

/// The `level` option, if present and valid.
pub fn compression_level(options: &Map<String, Value>) -> Option<u32> {
    options
        .get("level")
        .and_then(Value::as_u64)
        .and_then(|l| u32::try_from(l).ok())
}

/// Check a method/options pair against the backend catalogue.
pub fn validate_compression(
    path: &str,
    backend: BackendKind,
    method: Option<CompressionMethod>,
    options: &Map<String, Value>,
) -> Result<(), ConfigurationError> {
    let invalid = |method: &str, reason: String| ConfigurationError::InvalidCompressionOption {
        path: path.to_string(),
        method: method.to_string(),
        reason,
    };

    let Some(method) = method else {
        return match options.keys().next() {
            Some(key) => Err(invalid("none", format!("'{key}' given but compression is disabled"))),
            None => Ok(()),
        };
    };

    if !available_compression_methods(backend).contains(&method) {
        return Err(ConfigurationError::UnsupportedCompression {
            path: path.to_string(),
            backend,
            method: method.name().to_string(),
        });
    }

    for (key, value) in options {
        if key != "level" || !method.takes_level() {
            return Err(invalid(method.name(), format!("unknown option '{key}'")));
        }
        match value.as_u64() {
            Some(level) if level <= 9 => {}
            _ => {
                return Err(invalid(
                    method.name(),
                    format!("level must be an integer in 0..=9, got {value}"),
                ))
            }
        }
    }
    Ok(())
}
