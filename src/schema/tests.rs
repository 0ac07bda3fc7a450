use serde_json::{json, Value};

use super::classes::{
    DEVICE, ELECTRICAL_SERIES, ELECTRODE_GROUP, IMAGE_SERIES, IMAGING_PLANE, SUBJECT,
    TIME_SERIES, TWO_PHOTON_SERIES,
};
use super::*;

static LOOPING: ClassSpec = ClassSpec {
    module: "pynwb.test",
    name: "Looping",
    params: &[
        ParameterDescriptor::required("name", DeclaredType::Single(TypeKind::Str), "name"),
        ParameterDescriptor::optional(
            "inner",
            DeclaredType::Single(TypeKind::Class(&LOOPING)),
            "a nested copy of itself",
        ),
    ],
    allow_extra: None,
};

#[test]
fn test_device_schema() {
    let schema = get_schema_from_hdmf_class(&DEVICE).unwrap();

    assert_eq!(schema.tag, "pynwb.device.Device");
    assert_eq!(schema.required, vec!["name".to_string()]);
    assert_eq!(
        schema.properties.keys().collect::<Vec<_>>(),
        vec!["name", "description", "manufacturer"]
    );
    assert!(!schema.additional_properties);
    assert_eq!(schema.properties["manufacturer"]["type"], "string");
    assert!(schema.properties["description"].get("default").is_none());
    schema.check_invariants().unwrap();
}

#[test]
fn test_link_to_device() {
    let schema = get_schema_from_hdmf_class(&ELECTRODE_GROUP).unwrap();

    assert_eq!(
        schema.properties["device"],
        json!({
            "type": "string",
            "description": "the device that was used to record from this electrode group",
            "target": "pynwb.device.Device"
        })
    );
    // `position` has no JSON representation
    assert!(!schema.properties.contains_key("position"));
    assert_eq!(schema.required, vec!["name", "description", "location", "device"]);
}

#[test]
fn test_defaults_and_skipped_time_series() {
    let schema = get_schema_from_hdmf_class(&TIME_SERIES).unwrap();

    assert!(!schema.properties.contains_key("data"));
    assert!(!schema.properties.contains_key("timestamps"));
    assert_eq!(schema.required, vec!["name", "unit"]);
    assert_eq!(schema.properties["resolution"]["default"], json!(-1.0));
    assert_eq!(schema.properties["comments"]["default"], "no comments");
    assert!(schema.properties["rate"].get("default").is_none());
}

#[test]
fn test_required_field_dropped_by_mapper_is_not_required() {
    let schema = get_schema_from_hdmf_class(&ELECTRICAL_SERIES).unwrap();

    // `electrodes` has no default but maps to nothing
    assert!(!schema.properties.contains_key("electrodes"));
    assert!(!schema.required.contains(&"electrodes".to_string()));
    schema.check_invariants().unwrap();
}

#[test]
fn test_nested_object_is_singleton_array() {
    let schema = get_schema_from_hdmf_class(&IMAGING_PLANE).unwrap();
    let optical = &schema.properties["optical_channel"];

    assert_eq!(optical["type"], "array");
    assert_eq!(optical["minItems"], 1);
    assert_eq!(optical["maxItems"], 1);
    let items = optical["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["tag"], "pynwb.ophys.OpticalChannel");
    assert_eq!(
        items[0]["required"],
        json!(["name", "description", "emission_lambda"])
    );
    assert_eq!(schema.properties["device"]["target"], "pynwb.device.Device");
}

#[test]
fn test_link_to_imaging_plane() {
    let schema = get_schema_from_hdmf_class(&TWO_PHOTON_SERIES).unwrap();
    assert_eq!(
        schema.properties["imaging_plane"]["target"],
        "pynwb.ophys.ImagingPlane"
    );
    assert!(schema.required.contains(&"imaging_plane".to_string()));
}

#[test]
fn test_float_wins_over_string_and_date_time_format() {
    let schema = get_schema_from_hdmf_class(&SUBJECT).unwrap();

    assert_eq!(schema.properties["weight"]["type"], "number");
    assert_eq!(schema.properties["date_of_birth"]["format"], "date-time");
    assert!(schema.required.is_empty());
}

#[test]
fn test_property_key_order() {
    let schema = get_schema_from_hdmf_class(&TIME_SERIES).unwrap();
    let keys: Vec<&str> = schema.properties["resolution"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["type", "description", "default"]);
}

#[test]
fn test_cyclic_class_is_an_error() {
    let err = get_schema_from_hdmf_class(&LOOPING).unwrap_err();
    assert!(matches!(err, SchemaError::CyclicReference(_)));
    assert!(err.to_string().contains("pynwb.test.Looping -> pynwb.test.Looping"));
}

#[test]
fn test_map_parameter_skip() {
    let param = ParameterDescriptor::required(
        "count",
        DeclaredType::Single(TypeKind::Unsupported("int")),
        "a count",
    );
    assert_eq!(map_parameter(&param).unwrap(), PropertyMapping::Skip);
}

#[test]
fn test_build_schema_allow_extra() {
    let params = [ParameterDescriptor::with_default(
        "gain",
        DeclaredType::Single(TypeKind::Float),
        DefaultValue::Float(2.0),
        "gain",
    )];
    let schema = build_schema(&params, true).unwrap();
    assert!(schema.additional_properties);
    assert!(schema.required.is_empty());
}

#[test]
fn test_build_schema_without_parameters() {
    for allow_extra in [false, true] {
        let schema = build_schema(&[], allow_extra).unwrap();
        assert!(schema.required.is_empty());
        assert!(schema.properties.is_empty());
        assert_eq!(schema.additional_properties, allow_extra);

        let value = schema.to_value();
        assert_eq!(value["required"], json!([]));
        assert_eq!(value["properties"], json!({}));
        assert_eq!(value["additionalProperties"], json!(allow_extra));
    }
}

static LINK_CANDIDATES: [TypeKind; 2] = [TypeKind::Class(&IMAGE_SERIES), TypeKind::Class(&DEVICE)];

#[test]
fn test_first_linkable_candidate_is_the_target() {
    let param = ParameterDescriptor::required(
        "source",
        DeclaredType::Tuple(&LINK_CANDIDATES),
        "the object this entry points at",
    );
    let PropertyMapping::Property(property) = map_parameter(&param).unwrap() else {
        panic!("a linkable tuple maps to a property");
    };
    assert_eq!(property["type"], "string");
    assert_eq!(property["target"], "pynwb.image.ImageSeries");

    let schema = build_schema(&[param], false).unwrap();
    assert_eq!(schema.required, vec!["source"]);
    assert_eq!(schema.properties["source"]["target"], "pynwb.image.ImageSeries");
}

const RECORDING_INIT: MethodSignature = MethodSignature {
    owner: "RecordingInterface.__init__",
    params: &[
        SignatureParameter::receiver(),
        SignatureParameter::new("file_path", Annotation::FilePath, ParameterDefault::Required),
        SignatureParameter::new(
            "folder_path",
            Annotation::Optional(&Annotation::FolderPath),
            ParameterDefault::Null,
        ),
        SignatureParameter::new(
            "verbose",
            Annotation::Bool,
            ParameterDefault::Value(DefaultValue::Bool(true)),
        ),
        SignatureParameter::new("nwbfile", Annotation::Other("NWBFile"), ParameterDefault::Null),
        SignatureParameter::new("metadata", Annotation::Dict, ParameterDefault::Null),
        SignatureParameter::var_keyword("kwargs"),
    ],
};

#[test]
fn test_method_signature_schema() {
    let schema = get_schema_from_method_signature(&RECORDING_INIT, &["metadata"]).unwrap();

    assert_eq!(schema.required, vec!["file_path"]);
    assert_eq!(
        schema.properties["file_path"],
        json!({"type": "string", "format": "file"})
    );
    assert_eq!(schema.properties["folder_path"]["format"], "directory");
    assert_eq!(schema.properties["verbose"]["default"], true);
    assert!(!schema.properties.contains_key("self"));
    assert!(!schema.properties.contains_key("nwbfile"));
    assert!(!schema.properties.contains_key("metadata"));
    assert!(!schema.properties.contains_key("kwargs"));
    assert!(schema.additional_properties);
}

#[test]
fn test_method_signature_rejects_var_positional() {
    const SIG: MethodSignature = MethodSignature {
        owner: "Broken.__init__",
        params: &[SignatureParameter::receiver(), SignatureParameter::var_positional("args")],
    };
    let err = get_schema_from_method_signature(&SIG, &[]).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::UnsupportedParameterKind { ref parameter, .. } if parameter == "args"
    ));
}

#[test]
fn test_root_and_input_schema() {
    let root = get_root_schema().to_value();
    assert_eq!(root["$schema"], DRAFT_07);
    assert_eq!(root["type"], "object");

    let input = get_input_schema().to_value();
    assert_eq!(input["title"], "Source data and conversion options");
    assert_eq!(input["version"], "0.1.0");

    let unrooted = unroot_schema(&input);
    assert!(unrooted.get("$schema").is_none());
    assert!(unrooted.get("version").is_none());
    assert_eq!(unrooted["title"], "Source data and conversion options");
}

#[test]
fn test_check_invariants_dangling_required() {
    let mut schema = SchemaNode::new("x");
    schema.require("missing");
    assert!(matches!(
        schema.check_invariants(),
        Err(SchemaError::DanglingRequired { .. })
    ));
}

#[test]
fn test_fill_defaults() {
    let mut schema = json!({
        "properties": {
            "rate": {"type": "number"},
            "unit": {"type": "string", "default": "volts"},
            "nested": {"type": "object", "properties": {"gain": {"type": "number"}}}
        }
    });
    let defaults = json!({"rate": 30000.0, "unit": "mV", "nested": {"gain": 0.195}});

    fill_defaults(&mut schema, &defaults, false);
    assert_eq!(schema["properties"]["rate"]["default"], 30000.0);
    assert_eq!(schema["properties"]["unit"]["default"], "volts");
    assert_eq!(
        schema["properties"]["nested"]["properties"]["gain"]["default"],
        0.195
    );

    fill_defaults(&mut schema, &defaults, true);
    assert_eq!(schema["properties"]["unit"]["default"], Value::from("mV"));
}
