//! # nwbconv - Metadata Schemas and Dataset Layout for NWB Conversion
//!
//! `nwbconv` provides the two pieces of a neurophysiology-to-NWB conversion
//! pipeline that do not depend on any particular acquisition system:
//!
//! - **Metadata schemas**: JSON Schemas (Draft-07) derived from the parameter
//!   tables of NWB classes and interface constructors, assembled into one root
//!   schema that user-supplied metadata (JSON or YAML) is validated against.
//!
//! - **Dataset backend configuration**: for every array dataset of an
//!   in-memory NWB file, a chunk shape, a write-buffer shape and a compression
//!   codec for either HDF5 or Zarr, with defaults sized by a byte budget and
//!   caller overrides checked before anything is written.
//!
//! - **Writers**: stream each dataset to disk buffer by buffer using its
//!   configuration. Zarr v2 directory stores are always available; HDF5 files
//!   need the `hdf5` feature and a native HDF5 library.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nwbconv::backend::{BackendKind, ChunkingBudget, SyntheticArray};
//! use nwbconv::interfaces::{Converter, Recording, RecordingInterface, RecordingOptions};
//! use serde_json::json;
//!
//! // A recording with 4 channels in two electrode groups
//! let traces = SyntheticArray::new(vec![30_000, 4], |i: &[usize]| i[1] as i16);
//! let recording = Recording::new(traces, 30_000.0).with_channel_groups(["0", "0", "1", "1"]);
//!
//! let mut converter = Converter::new();
//! converter.add_interface(
//!     "Recording",
//!     RecordingInterface::new(recording, RecordingOptions::default()),
//! )?;
//!
//! // Default metadata lacks a session start time
//! let mut metadata = converter.get_metadata();
//! metadata["NWBFile"]["session_start_time"] = json!("2020-01-01T00:00:00");
//!
//! let stats = converter.run_conversion(
//!     "session.nwb.zarr",
//!     BackendKind::Zarr,
//!     Some(&metadata),
//!     &json!({}),
//!     None,
//!     &ChunkingBudget::default(),
//! )?;
//! println!("{}", stats);
//! # Ok::<(), nwbconv::interfaces::InterfaceError>(())
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: parameter descriptors and the Type Mapper / Schema Builder
//! - [`registry`]: root schema assembly, metadata merging and validation
//! - [`backend`]: chunk, buffer and compression configuration
//! - [`writer`]: Zarr and HDF5 writers
//! - [`interfaces`]: data interfaces and the converter that drives them

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod backend;
pub mod interfaces;
pub mod registry;
pub mod schema;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::backend::{
        configure_backend, get_default_backend_configuration, ArraySource, BackendConfiguration,
        BackendKind, ChunkingBudget, CompressionMethod, ConfigurationError, DataType,
        DatasetConfiguration, DatasetContainer, InMemoryArray, NwbFile, SyntheticArray,
        TimeSeries,
    };
    pub use crate::interfaces::{
        Converter, DataInterface, InterfaceError, Recording, RecordingInterface, RecordingOptions,
    };
    pub use crate::registry::{
        assemble_root_schema, deep_merge, ecephys_schema, load_dict_from_file, ophys_schema,
        validate, MetadataError, ValidationReport,
    };
    pub use crate::schema::{get_schema_from_hdmf_class, SchemaError, SchemaNode};
    pub use crate::writer::{write_nwbfile, WriterError, WriterStats};
}
