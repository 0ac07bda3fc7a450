//! Zarr v2 directory-store writer and readback, built on `zarrs`.
//!
//! Groups hold `.zgroup` and `.zattrs`. Arrays hold `.zarray`, `.zattrs` and
//! one numcodecs-compatible chunk per grid cell. Every buffer is handed to
//! the array as one subset, so `zarrs` splits it into chunks and pads edge
//! chunks with the fill value.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use zarrs::array::{Array, ArrayMetadata, ArrayMetadataOptions, ArrayMetadataV2, ArraySubset};
use zarrs::group::Group;
use zarrs::metadata::v2::GroupMetadataV2;
use zarrs::metadata::GroupMetadata;
use zarrs_filesystem::FilesystemStore;

use crate::backend::{
    compression_level, decode_le, default_level, BackendKind, BlockIter, CompressionMethod,
    DataType, DatasetConfiguration, DatasetSlot, InMemoryArray, NwbFile, TimeSeries,
};

use super::layout::{self, plan_datasets};
use super::{WriterError, WriterStats};

/// Run `$body` with `$t` bound to the Rust element type of `$dtype`.
macro_rules! with_element_type {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype {
            DataType::Int8 => {
                type $t = i8;
                $body
            }
            DataType::Int16 => {
                type $t = i16;
                $body
            }
            DataType::Int32 => {
                type $t = i32;
                $body
            }
            DataType::Int64 => {
                type $t = i64;
                $body
            }
            DataType::UInt8 => {
                type $t = u8;
                $body
            }
            DataType::UInt16 => {
                type $t = u16;
                $body
            }
            DataType::UInt32 => {
                type $t = u32;
                $body
            }
            DataType::UInt64 => {
                type $t = u64;
                $body
            }
            DataType::Float32 => {
                type $t = f32;
                $body
            }
            DataType::Float64 => {
                type $t = f64;
                $body
            }
        }
    };
}

/// `compressor` entry of a `.zarray` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZarrCompressor {
    /// numcodecs codec id, e.g. `gzip`
    pub id: String,
    /// Compression level, when the codec takes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

/// Layout of a stored Zarr v2 array, as reported by `zarrs`
#[derive(Debug, Clone, PartialEq)]
pub struct ZarrArrayMetadata {
    /// Full array shape
    pub shape: Vec<usize>,
    /// Chunk shape
    pub chunks: Vec<usize>,
    /// Type string such as `<i2`
    pub dtype: String,
    /// Codec, `None` when uncompressed
    pub compressor: Option<ZarrCompressor>,
    /// Value of unwritten elements
    pub fill_value: Value,
    /// Memory layout, always `C`
    pub order: String,
    /// Filter pipeline, always `None`
    pub filters: Option<Vec<Value>>,
    /// Contents of `.zattrs`
    pub attributes: Map<String, Value>,
}

#[derive(Deserialize)]
struct ZarrayDocument {
    shape: Vec<usize>,
    chunks: Vec<usize>,
    dtype: String,
    compressor: Option<ZarrCompressor>,
    fill_value: Value,
    order: String,
    filters: Option<Vec<Value>>,
}

impl ZarrArrayMetadata {
    /// Open the array stored at `dir` and report its metadata.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, WriterError> {
        let array = open_array(dir.as_ref())?;
        Self::from_array(&array)
    }

    fn from_array(array: &Array<FilesystemStore>) -> Result<Self, WriterError> {
        let ArrayMetadata::V2(metadata) = array.metadata() else {
            return Err(WriterError::InvalidStore("expected a Zarr v2 array".to_string()));
        };
        let document: ZarrayDocument = serde_json::from_value(serde_json::to_value(metadata)?)?;
        Ok(Self {
            shape: document.shape,
            chunks: document.chunks,
            dtype: document.dtype,
            compressor: document.compressor,
            fill_value: document.fill_value,
            order: document.order,
            filters: document.filters,
            attributes: array.attributes().clone(),
        })
    }

    /// Element type named by `dtype`
    pub fn data_type(&self) -> Result<DataType, WriterError> {
        DataType::from_zarr_dtype(&self.dtype)
            .ok_or_else(|| WriterError::InvalidStore(format!("unsupported dtype '{}'", self.dtype)))
    }

    /// Compression method named by the compressor, if any
    pub fn compression_method(&self) -> Result<Option<CompressionMethod>, WriterError> {
        self.compressor
            .as_ref()
            .map(|c| c.id.parse().map_err(WriterError::InvalidStore))
            .transpose()
    }
}

fn open_array(dir: &Path) -> Result<Array<FilesystemStore>, WriterError> {
    let store = Arc::new(FilesystemStore::new(dir)?);
    Ok(Array::open(store, "/")?)
}

/// `.zarray` contents for a configured dataset.
fn array_metadata(configuration: &DatasetConfiguration) -> Result<ArrayMetadataV2, WriterError> {
    let compressor = configuration.compression_method.map(|method| ZarrCompressor {
        id: method.name().to_string(),
        level: Some(
            compression_level(&configuration.compression_options)
                .unwrap_or_else(|| default_level(BackendKind::Zarr)),
        ),
    });
    let metadata = serde_json::from_value(json!({
        "zarr_format": 2,
        "shape": configuration.full_shape,
        "chunks": configuration.chunk_shape,
        "dtype": configuration.dtype.zarr_dtype(),
        "compressor": compressor,
        "fill_value": 0,
        "order": "C",
        "filters": null,
    }))?;
    Ok(metadata)
}

fn subset(offset: &[usize], shape: &[usize]) -> ArraySubset {
    let ranges: Vec<Range<u64>> = offset
        .iter()
        .zip(shape)
        .map(|(&start, &len)| start as u64..(start + len) as u64)
        .collect();
    ArraySubset::new_with_ranges(&ranges)
}

/// Read a whole Zarr v2 array back into memory.
///
/// Missing chunks read as the fill value (zero).
pub fn read_zarr_array(dir: impl AsRef<Path>) -> Result<InMemoryArray, WriterError> {
    let array = open_array(dir.as_ref())?;
    let metadata = ZarrArrayMetadata::from_array(&array)?;
    let everything = ArraySubset::new_with_shape(array.shape().to_vec());
    let restored = with_element_type!(metadata.data_type()?, T => {
        let values = array.retrieve_array_subset::<Vec<T>>(&everything)?;
        InMemoryArray::from_vec(metadata.shape, values)?
    });
    Ok(restored)
}

/// Attributes of the group stored at `dir`.
pub fn read_zarr_attributes(dir: impl AsRef<Path>) -> Result<Map<String, Value>, WriterError> {
    let store = Arc::new(FilesystemStore::new(dir.as_ref())?);
    let group = Group::open(store, "/")?;
    Ok(group.attributes().clone())
}

/// Writes an [`NwbFile`] as a Zarr v2 directory store.
pub struct ZarrWriter {
    root: PathBuf,
    store: Arc<FilesystemStore>,
    stats: WriterStats,
}

impl std::fmt::Debug for ZarrWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZarrWriter")
            .field("root", &self.root)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl ZarrWriter {
    /// Prepare a store at `path`. Fails if `path` already exists; nothing is
    /// created until [`ZarrWriter::write_nwbfile`] has checked every dataset.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WriterError> {
        let root = path.as_ref().to_path_buf();
        if root.exists() {
            return Err(WriterError::AlreadyExists(root));
        }
        let store = Arc::new(FilesystemStore::new(&root)?);
        Ok(Self {
            root,
            store,
            stats: WriterStats::default(),
        })
    }

    /// Write every group, attribute and dataset of `nwbfile`.
    ///
    /// All dataset settings are checked before the first chunk is written.
    pub fn write_nwbfile(mut self, nwbfile: &NwbFile) -> Result<WriterStats, WriterError> {
        let planned = plan_datasets(nwbfile, BackendKind::Zarr)?;
        debug!("Writing {} datasets to {}", planned.len(), self.root.display());

        self.write_group("/", &layout::root_attributes(nwbfile))?;
        self.write_group("/general", &layout::general_attributes(nwbfile))?;
        self.write_group("/general/devices", &Map::new())?;
        for device in nwbfile.devices.values() {
            let path = format!("/general/devices/{}", device.name);
            self.write_group(&path, &layout::device_attributes(device))?;
        }
        self.write_group("/general/extracellular_ephys", &Map::new())?;
        for group in nwbfile.electrode_groups.values() {
            let path = format!("/general/extracellular_ephys/{}", group.name);
            self.write_group(&path, &layout::electrode_group_attributes(group))?;
        }

        self.write_group("/acquisition", &Map::new())?;
        for series in nwbfile.acquisition().values() {
            self.write_series(&format!("/acquisition/{}", series.name), series)?;
        }

        self.write_group("/processing", &Map::new())?;
        for module in nwbfile.processing().values() {
            let path = format!("/processing/{}", module.name);
            self.write_group(&path, &layout::processing_attributes(&module.description))?;
            for series in module.data_interfaces.values() {
                self.write_series(&format!("{}/{}", path, series.name), series)?;
            }
        }

        info!("Wrote Zarr store {}: {}", self.root.display(), self.stats);
        Ok(self.stats)
    }

    fn write_group(&self, path: &str, attrs: &Map<String, Value>) -> Result<(), WriterError> {
        let metadata = GroupMetadata::V2(GroupMetadataV2::default());
        let mut group = Group::new_with_metadata(self.store.clone(), path, metadata)?;
        group.attributes_mut().extend(attrs.clone());
        group.store_metadata()?;
        Ok(())
    }

    fn write_series(&mut self, path: &str, series: &TimeSeries) -> Result<(), WriterError> {
        self.write_group(path, &layout::time_series_attributes(series))?;
        let data = format!("{}/data", path);
        self.write_array(&data, &series.data, &layout::data_attributes(series))?;
        if let Some(timestamps) = &series.timestamps {
            let path = format!("{}/timestamps", path);
            self.write_array(&path, timestamps, &layout::timestamps_attributes())?;
        }
        Ok(())
    }

    fn write_array(
        &mut self,
        path: &str,
        slot: &DatasetSlot,
        attrs: &Map<String, Value>,
    ) -> Result<(), WriterError> {
        let Some(configuration) = slot.io_settings() else {
            if layout::is_empty(slot) {
                return Ok(());
            }
            return Err(WriterError::Unconfigured(path.trim_start_matches('/').to_string()));
        };
        let metadata = ArrayMetadata::V2(array_metadata(configuration)?);
        let mut array = Array::new_with_metadata(self.store.clone(), path, metadata)?;
        array.attributes_mut().extend(attrs.clone());
        array.store_metadata_opt(
            &ArrayMetadataOptions::default().with_include_zarrs_metadata(false),
        )?;

        let chunk = &configuration.chunk_shape;
        for buffer in BlockIter::new(&configuration.full_shape, &configuration.buffer_shape) {
            let bytes = slot.source().read_block(&buffer.offset, &buffer.shape)?;
            self.stats.record_buffer(bytes.len());

            let region = subset(&buffer.offset, &buffer.shape);
            with_element_type!(configuration.dtype, T => {
                array.store_array_subset(&region, decode_le::<T>(&bytes))?
            });
            self.stats.chunks_written += BlockIter::new(&buffer.shape, chunk).count();
        }
        self.stats.datasets_written += 1;
        debug!(
            "Wrote {} with chunks {:?} and buffers {:?}",
            path, chunk, configuration.buffer_shape
        );
        Ok(())
    }
}
