//! # Backend Writer
//!
//! Writes a configured [`NwbFile`](crate::backend::NwbFile) to disk.
//!
//! Every dataset must carry IO settings from
//! [`configure_backend`](crate::backend::configure_backend); the settings are
//! re-validated against the source arrays before anything is written. Data
//! is pulled one buffer at a time and split into whole chunks, so memory use
//! is bounded by the largest `buffer_shape`.
//!
//! - **Zarr** (always available): a Zarr v2 directory store written through
//!   `zarrs`.
//! - **HDF5** (feature `hdf5`): a single chunked HDF5 file with deflate or
//!   lzf filters.

mod error;
#[cfg(feature = "hdf5")]
mod h5;
mod layout;
mod stats;
mod zarr;


use std::path::Path;

use crate::backend::{BackendKind, NwbFile};

#[cfg(feature = "hdf5")]
pub use h5::{read_hdf5_layout, Hdf5Layout, Hdf5Writer};
pub use error::WriterError;
pub use layout::{plan_datasets, PlannedDataset, NWB_VERSION};
pub use stats::WriterStats;
pub use zarr::{
    read_zarr_array, read_zarr_attributes, ZarrArrayMetadata, ZarrCompressor, ZarrWriter,
};

/// Write `nwbfile` to `path` with the given backend.
///
/// Nothing is created on disk if any dataset fails its checks.
pub fn write_nwbfile(
    nwbfile: &NwbFile,
    path: impl AsRef<Path>,
    backend: BackendKind,
) -> Result<WriterStats, WriterError> {
    match backend {
        BackendKind::Zarr => ZarrWriter::create(path)?.write_nwbfile(nwbfile),
        #[cfg(feature = "hdf5")]
        BackendKind::Hdf5 => Hdf5Writer::create(path)?.write_nwbfile(nwbfile),
        #[cfg(not(feature = "hdf5"))]
        BackendKind::Hdf5 => Err(WriterError::BackendUnavailable(backend.to_string())),
    }
}
