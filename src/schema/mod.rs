//! # Metadata Schema Generation
//!
//! Derives JSON Schemas (Draft-07) from the parameter tables of NWB classes and
//! interface constructors.
//!
//! ## Pipeline
//!
//! 1. **Descriptor tables** ([`ClassSpec`], [`MethodSignature`]): every supported
//!    constructor is declared once, statically, with the name, type, default and
//!    documentation of each argument.
//! 2. **Type Mapper** ([`map_parameter`]): turns one argument into a property
//!    schema, or drops it when the type has no JSON representation.
//! 3. **Schema Builder** ([`build_schema`], [`get_schema_from_hdmf_class`]):
//!    assembles `required`, `properties` and `additionalProperties`, recursing
//!    into nested NWB objects.
//!
//! Nested objects use a legacy convention kept for compatibility with existing
//! metadata files: a single embedded object is written as an array schema with
//! `minItems = maxItems = 1`.
//!
//! ```rust
//! use nwbconv::schema::{classes, get_schema_from_hdmf_class};
//!
//! let schema = get_schema_from_hdmf_class(&classes::ELECTRODE_GROUP)?;
//! assert_eq!(schema.tag, "pynwb.ecephys.ElectrodeGroup");
//! assert_eq!(schema.properties["device"]["target"], "pynwb.device.Device");
//! # Ok::<(), nwbconv::schema::SchemaError>(())
//! ```

mod builder;
pub mod classes;
mod descriptor;
mod error;
mod mapper;
mod node;

#[cfg(test)]
mod tests;

pub use builder::{build_schema, get_schema_from_hdmf_class, get_schema_from_method_signature};
pub use descriptor::{
    Annotation, ClassSpec, DeclaredType, DefaultValue, MethodSignature, ParameterDefault,
    ParameterDescriptor, ParameterKind, SignatureParameter, TypeKind,
};
pub use error::SchemaError;
pub use mapper::{map_annotation, map_parameter, PropertyMapping};
pub use node::{
    fill_defaults, get_base_schema, get_input_schema, get_root_schema, unroot_schema, SchemaNode,
    DRAFT_07,
};
