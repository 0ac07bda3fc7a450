//! # Metadata Schema Registry
//!
//! Combines per-section schemas into the root metadata schema, merges
//! metadata documents and validates them against Draft-07 schemas.
//!
//! ## Document lifecycle
//!
//! 1. Each data interface contributes default metadata.
//! 2. Defaults are combined with [`deep_merge`]: objects merge key by key,
//!    leaves and arrays are replaced by the right-hand side.
//! 3. User overrides are deep-merged on top.
//! 4. The result is checked with [`validate`], which reports every violation
//!    with a `$.a.b[0]` style path instead of stopping at the first one.
//!
//! ```rust
//! use nwbconv::registry::{assemble_root_schema, ophys_schema, validate};
//! use serde_json::json;
//!
//! let root = assemble_root_schema([("Ophys", ophys_schema()?)])?;
//! let document = json!({
//!     "NWBFile": {
//!         "session_description": "demo",
//!         "identifier": "1234",
//!         "session_start_time": "2020-01-01T00:00:00"
//!     },
//!     "Ophys": {"Devices": [], "Fluorescence": {"name": "Fluorescence"}}
//! });
//! let errors = validate(&document, &root.to_value())?;
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].path, "$.Ophys.Fluorescence");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod merge;
mod nwbfile;
mod report;
mod root;
mod sections;
mod validate;

#[cfg(test)]
mod tests;

pub use error::MetadataError;
pub use merge::{
    append_replace_dict_in_list, deep_merge, dict_deep_update, exist_dict_in_list,
    load_dict_from_file,
};
pub use nwbfile::get_schema_for_nwbfile;
pub use report::ValidationReport;
pub use root::assemble_root_schema;
pub use sections::{
    ecephys_schema, ophys_schema, DEFAULT_ES_KEY, PLANE_KEY_PATTERN, SEGMENTATION_KEY_PATTERN,
};
pub use validate::{
    check_schema, json_path, validate, validate_metadata, MetadataValidationError,
    ValidationFailure,
};
