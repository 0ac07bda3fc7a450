//! HDF5 writer (feature `hdf5`, needs a native libhdf5).

use std::path::{Path, PathBuf};

use hdf5::filters::Filter;
use hdf5::types::VarLenUnicode;
use hdf5::{Dataset, File, Group, H5Type, Location};
use log::{debug, info};
use ndarray::{ArrayD, IxDyn};
use serde_json::{Map, Value};

use crate::backend::{
    compression_level, decode_le, default_level, BackendKind, BlockIter, CompressionMethod,
    DataType, DatasetConfiguration, DatasetSlot, Element, NwbFile, TimeSeries,
};

use super::layout::{self, plan_datasets};
use super::{WriterError, WriterStats};

/// Chunking and compression recorded for a dataset in an HDF5 file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hdf5Layout {
    /// Dataset shape
    pub shape: Vec<usize>,
    /// Chunk shape, `None` for contiguous storage
    pub chunks: Option<Vec<usize>>,
    /// Compression filter, if any
    pub compression_method: Option<CompressionMethod>,
    /// Deflate level, for gzip
    pub compression_level: Option<u32>,
}

/// Read the storage layout of `dataset_path` inside the HDF5 file at `path`.
pub fn read_hdf5_layout(
    path: impl AsRef<Path>,
    dataset_path: &str,
) -> Result<Hdf5Layout, WriterError> {
    let file = File::open(path)?;
    let dataset = file.dataset(dataset_path)?;
    let mut layout = Hdf5Layout {
        shape: dataset.shape(),
        chunks: dataset.chunk(),
        compression_method: None,
        compression_level: None,
    };
    for filter in dataset.filters() {
        match filter {
            Filter::Deflate(level) => {
                layout.compression_method = Some(CompressionMethod::Gzip);
                layout.compression_level = Some(u32::from(level));
            }
            Filter::LZF => layout.compression_method = Some(CompressionMethod::Lzf),
            _ => {}
        }
    }
    Ok(layout)
}

fn unicode(value: &str) -> Result<VarLenUnicode, WriterError> {
    value
        .parse()
        .map_err(|e| {
            WriterError::InvalidStore(format!("cannot store '{value}' as HDF5 string: {e}"))
        })
}

fn write_attributes(location: &Location, attrs: &Map<String, Value>) -> Result<(), WriterError> {
    for (name, value) in attrs {
        match value {
            Value::Number(n) => {
                let n = n.as_f64().unwrap_or_default();
                location.new_attr::<f64>().create(name.as_str())?.write_scalar(&n)?;
            }
            Value::Bool(b) => {
                location.new_attr::<bool>().create(name.as_str())?.write_scalar(b)?;
            }
            Value::String(s) => {
                location
                    .new_attr::<VarLenUnicode>()
                    .create(name.as_str())?
                    .write_scalar(&unicode(s)?)?;
            }
            Value::Array(items) => {
                let strings = items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => unicode(s),
                        other => unicode(&other.to_string()),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                location
                    .new_attr::<VarLenUnicode>()
                    .shape(strings.len())
                    .create(name.as_str())?
                    .write(&strings)?;
            }
            Value::Null | Value::Object(_) => {
                debug!("Skipping attribute '{}' with no HDF5 representation", name);
            }
        }
    }
    Ok(())
}

/// Writes an [`NwbFile`] as a single HDF5 file.
#[derive(Debug)]
pub struct Hdf5Writer {
    path: PathBuf,
    stats: WriterStats,
}

impl Hdf5Writer {
    /// Prepare a file at `path`. Fails if `path` already exists; the file is
    /// created only after [`Hdf5Writer::write_nwbfile`] has checked every
    /// dataset.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WriterError> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(WriterError::AlreadyExists(path));
        }
        Ok(Self {
            path,
            stats: WriterStats::default(),
        })
    }

    /// Write every group, attribute and dataset of `nwbfile`.
    pub fn write_nwbfile(mut self, nwbfile: &NwbFile) -> Result<WriterStats, WriterError> {
        let planned = plan_datasets(nwbfile, BackendKind::Hdf5)?;
        debug!("Writing {} datasets to {}", planned.len(), self.path.display());

        let file = File::create(&self.path)?;
        write_attributes(&file, &layout::root_attributes(nwbfile))?;
        let general = file.create_group("general")?;
        write_attributes(&general, &layout::general_attributes(nwbfile))?;
        let devices = general.create_group("devices")?;
        for device in nwbfile.devices.values() {
            let group = devices.create_group(&device.name)?;
            write_attributes(&group, &layout::device_attributes(device))?;
        }
        let ephys = general.create_group("extracellular_ephys")?;
        for group in nwbfile.electrode_groups.values() {
            write_attributes(
                &ephys.create_group(&group.name)?,
                &layout::electrode_group_attributes(group),
            )?;
        }

        let acquisition = file.create_group("acquisition")?;
        for series in nwbfile.acquisition().values() {
            self.write_series(&acquisition, series)?;
        }

        let processing = file.create_group("processing")?;
        for module in nwbfile.processing().values() {
            let group = processing.create_group(&module.name)?;
            write_attributes(&group, &layout::processing_attributes(&module.description))?;
            for series in module.data_interfaces.values() {
                self.write_series(&group, series)?;
            }
        }

        file.flush()?;
        info!("Wrote HDF5 file {}: {}", self.path.display(), self.stats);
        Ok(self.stats)
    }

    fn write_series(&mut self, parent: &Group, series: &TimeSeries) -> Result<(), WriterError> {
        let group = parent.create_group(&series.name)?;
        write_attributes(&group, &layout::time_series_attributes(series))?;
        if let Some(data) = self.write_dataset(&group, "data", &series.data)? {
            write_attributes(&data, &layout::data_attributes(series))?;
        }
        if let Some(timestamps) = &series.timestamps {
            if let Some(dataset) = self.write_dataset(&group, "timestamps", timestamps)? {
                write_attributes(&dataset, &layout::timestamps_attributes())?;
            }
        }
        Ok(())
    }

    fn write_dataset(
        &mut self,
        group: &Group,
        name: &str,
        slot: &DatasetSlot,
    ) -> Result<Option<Dataset>, WriterError> {
        let Some(configuration) = slot.io_settings() else {
            if layout::is_empty(slot) {
                return Ok(None);
            }
            return Err(WriterError::Unconfigured(format!("{}/{}", group.name(), name)));
        };
        let dataset = match configuration.dtype {
            DataType::Int8 => self.write_typed::<i8>(group, name, slot, configuration)?,
            DataType::Int16 => self.write_typed::<i16>(group, name, slot, configuration)?,
            DataType::Int32 => self.write_typed::<i32>(group, name, slot, configuration)?,
            DataType::Int64 => self.write_typed::<i64>(group, name, slot, configuration)?,
            DataType::UInt8 => self.write_typed::<u8>(group, name, slot, configuration)?,
            DataType::UInt16 => self.write_typed::<u16>(group, name, slot, configuration)?,
            DataType::UInt32 => self.write_typed::<u32>(group, name, slot, configuration)?,
            DataType::UInt64 => self.write_typed::<u64>(group, name, slot, configuration)?,
            DataType::Float32 => self.write_typed::<f32>(group, name, slot, configuration)?,
            DataType::Float64 => self.write_typed::<f64>(group, name, slot, configuration)?,
        };
        self.stats.datasets_written += 1;
        Ok(Some(dataset))
    }

    fn write_typed<T: H5Type + Element>(
        &mut self,
        group: &Group,
        name: &str,
        slot: &DatasetSlot,
        configuration: &DatasetConfiguration,
    ) -> Result<Dataset, WriterError> {
        let builder = group
            .new_dataset::<T>()
            .shape(configuration.full_shape.clone())
            .chunk(configuration.chunk_shape.clone());
        let builder = match configuration.compression_method {
            Some(CompressionMethod::Gzip) => {
                let level = compression_level(&configuration.compression_options)
                    .unwrap_or_else(|| default_level(BackendKind::Hdf5));
                builder.deflate(level as u8)
            }
            Some(CompressionMethod::Lzf) => builder.lzf(),
            Some(CompressionMethod::Zlib) | None => builder,
        };
        let dataset = builder.create(name)?;

        for buffer in BlockIter::new(&configuration.full_shape, &configuration.buffer_shape) {
            let bytes = slot.source().read_block(&buffer.offset, &buffer.shape)?;
            self.stats.record_buffer(bytes.len());
            let values = ArrayD::from_shape_vec(IxDyn(&buffer.shape), decode_le::<T>(&bytes))
                .map_err(|e| WriterError::InvalidStore(e.to_string()))?;
            let selection: Vec<hdf5::SliceOrIndex> = buffer
                .offset
                .iter()
                .zip(&buffer.shape)
                .map(|(&start, &len)| hdf5::SliceOrIndex::from(start..start + len))
                .collect();
            dataset.write_slice(&values, hdf5::Hyperslab::from(selection))?;
            self.stats.chunks_written +=
                BlockIter::new(&buffer.shape, &configuration.chunk_shape).count();
        }
        Ok(dataset)
    }
}
