//! Per-modality metadata sections.

use serde_json::{json, Value};

use crate::schema::classes::{
    DEVICE, ELECTRICAL_SERIES, ELECTRODE_GROUP, IMAGING_PLANE, TWO_PHOTON_SERIES,
};
use crate::schema::{get_base_schema, get_schema_from_hdmf_class, SchemaError, SchemaNode};

/// Default key of the `ElectricalSeries` entry inside `Ecephys`.
pub const DEFAULT_ES_KEY: &str = "ElectricalSeries";

/// Plane keys of `Fluorescence` and `DFOverF`: anything alphanumeric except `name`.
pub const PLANE_KEY_PATTERN: &str = "^(?!name$)[a-zA-Z0-9]+$";

/// Plane keys of `SegmentationImages`: alphanumeric except `name` and `description`.
pub const SEGMENTATION_KEY_PATTERN: &str = "^(?!(name|description)$)[a-zA-Z0-9]+$";

const DATA_KEY_PATTERN: &str = "^[a-zA-Z0-9]+$";

/// The `Ecephys` section schema.
///
/// `Device` and `ElectrodeGroup` are non-empty lists whose items refer to the
/// class schemas stored under `properties.definitions`. With `es_key` set,
/// an `ElectricalSeries` schema is added under that key.
pub fn ecephys_schema(es_key: Option<&str>) -> Result<SchemaNode, SchemaError> {
    let mut schema = get_base_schema(Some("Ecephys"));
    schema.require("Device");
    schema.require("ElectrodeGroup");

    schema.insert_property(
        "Device",
        json!({
            "type": "array",
            "minItems": 1,
            "items": {"$ref": "#/properties/Ecephys/properties/definitions/Device"}
        }),
    );
    schema.insert_property(
        "ElectrodeGroup",
        json!({
            "type": "array",
            "minItems": 1,
            "items": {"$ref": "#/properties/Ecephys/properties/definitions/ElectrodeGroup"}
        }),
    );
    schema.insert_property(
        "Electrodes",
        json!({
            "type": "array",
            "minItems": 0,
            "renderForm": false,
            "items": {"$ref": "#/properties/Ecephys/properties/definitions/Electrodes"}
        }),
    );
    schema.insert_property(
        "definitions",
        json!({
            "Device": get_schema_from_hdmf_class(&DEVICE)?,
            "ElectrodeGroup": get_schema_from_hdmf_class(&ELECTRODE_GROUP)?,
            "Electrodes": {
                "type": "object",
                "additionalProperties": false,
                "required": ["name"],
                "properties": {
                    "name": {"type": "string", "description": "name of this electrodes column"},
                    "description": {
                        "type": "string",
                        "description": "description of this electrodes column"
                    }
                }
            }
        }),
    );

    if let Some(key) = es_key {
        schema.insert_property(key, get_schema_from_hdmf_class(&ELECTRICAL_SERIES)?);
    }
    Ok(schema)
}

/// The `Ophys` section schema.
///
/// `Fluorescence`, `DFOverF` and `SegmentationImages` hold a `name` plus at
/// least one plane subsection keyed by an alphanumeric name. Each plane holds
/// at least one named entry. Other keys are accepted unchecked, so documents
/// that spell the trace section `DfOverF` still validate.
pub fn ophys_schema() -> Result<SchemaNode, SchemaError> {
    let mut schema = get_base_schema(Some("Ophys"));
    schema.additional_properties = true;
    schema.require("Devices");

    schema.insert_property(
        "Devices",
        json!({
            "type": "array",
            "items": get_schema_from_hdmf_class(&DEVICE)?
        }),
    );
    schema.insert_property(
        "ImagingPlane",
        json!({
            "type": "array",
            "items": get_schema_from_hdmf_class(&IMAGING_PLANE)?
        }),
    );
    schema.insert_property(
        "TwoPhotonSeries",
        json!({
            "type": "array",
            "items": get_schema_from_hdmf_class(&TWO_PHOTON_SERIES)?
        }),
    );

    let trace = json!({
        "type": "object",
        "required": ["name", "description"],
        "properties": {
            "name": {"type": "string", "description": "Name of the roi response series"},
            "description": {
                "type": "string",
                "description": "Description of the roi response series"
            },
            "unit": {"type": "string", "description": "Unit of the roi response series"}
        }
    });
    let image = json!({
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": {"type": "string", "description": "Name of the image"},
            "description": {"type": "string", "description": "Description of the image"}
        }
    });

    schema.insert_property(
        "Fluorescence",
        plane_container("Fluorescence", PLANE_KEY_PATTERN, &trace, false),
    );
    schema.insert_property(
        "DFOverF",
        plane_container("DfOverF", PLANE_KEY_PATTERN, &trace, false),
    );
    schema.insert_property(
        "SegmentationImages",
        plane_container("SegmentationImages", SEGMENTATION_KEY_PATTERN, &image, true),
    );
    Ok(schema)
}

/// A `name` leaf plus pattern-keyed plane subsections; a bare `name` is not enough.
fn plane_container(title: &str, key_pattern: &str, entry: &Value, with_description: bool) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "name".into(),
        json!({"type": "string", "description": format!("Name of the {title} container")}),
    );
    if with_description {
        properties.insert(
            "description".into(),
            json!({
                "type": "string",
                "description": format!("Description of the {title} container")
            }),
        );
    }

    let plane = json!({
        "type": "object",
        "minProperties": 1,
        "patternProperties": {DATA_KEY_PATTERN: entry},
        "additionalProperties": false
    });

    json!({
        "type": "object",
        "required": ["name"],
        "properties": properties,
        "patternProperties": {key_pattern: plane},
        "additionalProperties": false,
        "minProperties": 2
    })
}
