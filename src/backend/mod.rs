//! # Dataset Backend Configuration
//!
//! Decides how every array dataset of a container is laid out on disk: chunk
//! shape, write-buffer shape and compression, for either the HDF5 or the Zarr
//! backend.
//!
//! ## Workflow
//!
//! 1. [`get_default_backend_configuration`] walks the container and proposes a
//!    [`DatasetConfiguration`] per dataset path (1 MB chunks, 1 GB buffers and
//!    gzip by default, see [`ChunkingBudget`]).
//! 2. The caller may override chunk shape, buffer shape or compression options
//!    of any entry.
//! 3. [`configure_backend`] re-validates every entry against the live arrays
//!    and attaches the settings to the container. Nothing is applied if any
//!    entry is invalid.
//!
//! ## Invariants
//!
//! - `1 <= chunk_shape <= buffer_shape <= full_shape` on every axis
//! - each buffer axis is a whole multiple of the chunk axis, or spans the
//!   full array along that axis
//! - the compression method and options are offered by the backend
//!
//! ```rust
//! use nwbconv::backend::*;
//! use chrono::Utc;
//!
//! let mut nwbfile = NwbFile::new("session", Utc::now());
//! let data = SyntheticArray::zeros::<i16>(vec![150_000, 384]);
//! nwbfile.add_acquisition(TimeSeries::new("TestTimeSeries", data, "volts", 30_000.0));
//!
//! let mut configuration = get_default_backend_configuration(&nwbfile, BackendKind::Hdf5);
//! let dataset = configuration.get_mut("acquisition/TestTimeSeries/data").unwrap();
//! assert_eq!(dataset.chunk_shape, vec![13_650, 35]);
//!
//! dataset.chunk_shape = vec![30_000, 64];
//! dataset.buffer_shape = vec![60_000, 192];
//! dataset.set_compression_level(5);
//! configure_backend(&mut nwbfile, &configuration)?;
//! # Ok::<(), ConfigurationError>(())
//! ```

mod array;
mod compression;
mod config;
mod container;
mod dtype;
mod engine;
mod error;
mod estimate;

#[cfg(test)]
mod tests;

pub use array::{
    check_selection, ArrayError, ArraySource, Block, BlockIter, FrameSlice, InMemoryArray,
    SyntheticArray,
};
pub use compression::{
    available_compression_methods, compression_level, default_compression, default_level,
    validate_compression, CompressionMethod,
};
pub use config::{
    format_shape, human_readable_size, BackendConfiguration, BackendKind, ChunkingBudget,
    DatasetConfiguration,
};
pub use container::{
    DatasetContainer, DatasetSlot, Device, ElectrodeGroup, NwbFile, ProcessingModule, TimeSeries,
};
pub use dtype::{decode_le, DataType, Element};
pub use engine::{
    configure_backend, get_default_backend_configuration,
    get_default_backend_configuration_with_budget, get_default_dataset_configuration,
};
pub use error::ConfigurationError;
pub use estimate::{estimate_default_buffer_shape, estimate_default_chunk_shape};
