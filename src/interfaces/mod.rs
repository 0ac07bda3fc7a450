//! # Data Interfaces
//!
//! A data interface wraps one source of data and knows how to describe it:
//!
//! - [`DataInterface::get_source_schema`]: the options it is constructed with
//! - [`DataInterface::get_metadata_schema`] and [`DataInterface::get_metadata`]:
//!   the metadata it contributes, with automatically extracted defaults
//! - [`DataInterface::get_conversion_options_schema`]: per-conversion options
//! - [`DataInterface::add_to_nwbfile`]: adds its objects to a container
//!
//! [`Converter`] combines several interfaces, merges their schemas and
//! metadata, and runs the full conversion including backend configuration.
//!
//! ```rust
//! use nwbconv::backend::{BackendKind, ChunkingBudget, SyntheticArray};
//! use nwbconv::interfaces::{Converter, Recording, RecordingInterface, RecordingOptions};
//! use serde_json::json;
//!
//! let recording = Recording::new(SyntheticArray::zeros::<i16>(vec![3_000, 4]), 30_000.0);
//! let mut converter = Converter::new();
//! let interface = RecordingInterface::new(recording, RecordingOptions::default());
//! converter.add_interface("Recording", interface)?;
//!
//! let mut metadata = converter.get_metadata();
//! metadata["NWBFile"]["session_start_time"] = json!("2020-01-01T00:00:00");
//! converter.validate_metadata(&metadata)?;
//! # Ok::<(), nwbconv::interfaces::InterfaceError>(())
//! ```

mod converter;
mod error;
mod recording;

#[cfg(test)]
mod tests;

use serde_json::{json, Value};

use crate::backend::NwbFile;
use crate::registry::assemble_root_schema;
use crate::schema::{get_base_schema, SchemaError, SchemaNode};

pub use converter::{
    configure_and_write, default_nwbfile_metadata, parse_session_start_time, Converter,
};
pub use error::InterfaceError;
pub use recording::{
    Recording, RecordingConversionOptions, RecordingInterface, RecordingOptions, WriteAs,
    DEFAULT_DEVICE, RECORDING_INTERFACE_INIT, RECORDING_RUN_CONVERSION, STUB_FRAMES,
};

/// One source of data taking part in a conversion.
pub trait DataInterface {
    /// Schema of the options the interface is constructed with.
    fn get_source_schema(&self) -> Result<SchemaNode, SchemaError>;

    /// Root metadata schema including the sections this interface fills.
    fn get_metadata_schema(&self) -> Result<SchemaNode, SchemaError> {
        assemble_root_schema(Vec::<(String, SchemaNode)>::new())
    }

    /// Metadata extracted from the source.
    fn get_metadata(&self) -> Value {
        json!({})
    }

    /// Schema of the options accepted by [`DataInterface::add_to_nwbfile`].
    fn get_conversion_options_schema(&self) -> Result<SchemaNode, SchemaError> {
        Ok(get_base_schema(None))
    }

    /// Add this interface's objects to `nwbfile`.
    fn add_to_nwbfile(
        &self,
        nwbfile: &mut NwbFile,
        metadata: &Value,
        conversion_options: &Value,
    ) -> Result<(), InterfaceError>;
}
