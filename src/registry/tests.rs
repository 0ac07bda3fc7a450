use std::io::Write;

use serde_json::{json, Value};

use super::*;
use crate::schema::SchemaNode;

fn nwbfile_section() -> Value {
    json!({
        "session_start_time": "2020-01-01T00:00:00",
        "session_description": "Auto-generated",
        "identifier": "1234"
    })
}

fn ophys_root() -> Value {
    assemble_root_schema([("Ophys", ophys_schema().unwrap())])
        .unwrap()
        .to_value()
}

#[test]
fn test_root_schema_is_valid_draft7() {
    let root = assemble_root_schema([
        ("Ecephys", ecephys_schema(Some(DEFAULT_ES_KEY)).unwrap()),
        ("Ophys", ophys_schema().unwrap()),
    ])
    .unwrap();

    assert_eq!(root.required, vec!["NWBFile", "Ecephys", "Ophys"]);
    check_schema(&root.to_value()).unwrap();
}

#[test]
fn test_empty_root_schema() {
    let root = assemble_root_schema(Vec::<(String, SchemaNode)>::new()).unwrap();
    assert_eq!(root.required, vec!["NWBFile"]);
    let nwbfile = &root.properties["NWBFile"];
    assert_eq!(
        nwbfile["required"],
        json!(["session_description", "identifier", "session_start_time"])
    );
    assert_eq!(nwbfile["tag"], "pynwb.file.NWBFile");
}

#[test]
fn test_valid_ophys_metadata() {
    let document = json!({
        "NWBFile": nwbfile_section(),
        "Ophys": {
            "Devices": [{"name": "ImagingDevice"}],
            "Fluorescence": {
                "name": "Fluorescence",
                "PlaneSegmentationChan1Plane0": {
                    "raw": {
                        "name": "RoiResponseSeriesChan1Plane0",
                        "description": "raw fluorescence signal"
                    },
                    "deconvolved": {
                        "name": "DeconvolvedChan1Plane0",
                        "description": "deconvolved fluorescence signal"
                    },
                    "neuropil": {
                        "name": "NeuropilChan1Plane0",
                        "description": "neuropil fluorescence signal"
                    }
                }
            },
            "DfOverF": {
                "name": "DfOverF",
                "PlaneSegmentationChan1Plane0": {
                    "dff": {
                        "name": "RoiResponseSeriesChan1Plane0",
                        "description": "Array of df/F traces."
                    }
                }
            },
            "SegmentationImages": {
                "name": "SegmentationImages",
                "PlaneSegmentationChan1Plane0": {
                    "raw": {
                        "name": "PlaneSegmentationChan1Plane0",
                        "description": "raw segmentation image"
                    },
                    "neuropil": {"name": "PlaneSegmentationChan1Plane0"}
                }
            }
        }
    });

    validate_metadata(&document, &ophys_root()).unwrap();
}

#[test]
fn test_ophys_section_accepts_unlisted_keys() {
    let schema = ophys_schema().unwrap();
    assert!(schema.additional_properties);
    assert_eq!(schema.to_value()["additionalProperties"], json!(true));

    // known sections stay strict next to unlisted ones
    let document = json!({
        "NWBFile": nwbfile_section(),
        "Ophys": {
            "Devices": [],
            "DfOverF": {"name": "DfOverF", "anything": {}},
            "Fluorescence": {"name": "Fluorescence"}
        }
    });
    let errors = validate(&document, &ophys_root()).unwrap();
    assert_eq!(errors.len(), 1, "{errors:#?}");
    assert_eq!(errors[0].path, "$.Ophys.Fluorescence");
}

#[test]
fn test_three_independent_defects() {
    let document = json!({
        "NWBFile": nwbfile_section(),
        "Ophys": {
            "Devices": [],
            "Fluorescence": {
                "name": "Fluorescence",
                "fluorescence_chan1_plane0": {},
                "FluorescenceChan1Plane0": {},
                "FluorescenceChan1Plane1": {"raw": {"description": "raw"}}
            }
        }
    });

    let errors = validate(&document, &ophys_root()).unwrap();
    assert_eq!(errors.len(), 3, "{errors:#?}");

    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert!(paths.contains(&"$.Ophys.Fluorescence"));
    assert!(paths.contains(&"$.Ophys.Fluorescence.FluorescenceChan1Plane0"));
    assert!(paths.contains(&"$.Ophys.Fluorescence.FluorescenceChan1Plane1.raw"));

    assert!(errors.iter().any(|e| e.kind
        == ValidationFailure::MissingRequired {
            property: "name".to_string()
        }));
    assert!(errors
        .iter()
        .any(|e| e.kind == ValidationFailure::TooFewProperties { limit: 1 }));
}

#[test]
fn test_invalid_ophys_metadata_is_exhaustive() {
    let document = json!({
        "NWBFile": nwbfile_section(),
        "Ophys": {
            "Devices": [],
            "Fluorescence": {
                "name": "Fluorescence",
                "fluorescence_chan1_plane0": {},
                "FluorescenceChan1Plane0": {},
                "FluorescenceChan1Plane1": {"raw": {}}
            },
            "DFOverF": {
                "name": "DfOverF",
                "df_chan1_plane0": {},
                "DFChan1Plane0": {},
                "DFChan1Plane1": {"raw": {}}
            },
            "SegmentationImages": {
                "name": "SegmentationImages",
                "segmentation_chan1_plane0": {},
                "SegmentationChan1Plane0": {},
                "SegmentationChan1Plane1": {"raw": {}}
            }
        }
    });

    let errors = validate(&document, &ophys_root()).unwrap();
    assert_eq!(errors.len(), 11, "{errors:#?}");

    let missing: Vec<(&str, &str)> = errors
        .iter()
        .filter_map(|e| match &e.kind {
            ValidationFailure::MissingRequired { property } => {
                Some((e.path.as_str(), property.as_str()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        missing,
        vec![
            ("$.Ophys.DFOverF.DFChan1Plane1.raw", "description"),
            ("$.Ophys.DFOverF.DFChan1Plane1.raw", "name"),
            ("$.Ophys.Fluorescence.FluorescenceChan1Plane1.raw", "description"),
            ("$.Ophys.Fluorescence.FluorescenceChan1Plane1.raw", "name"),
            ("$.Ophys.SegmentationImages.SegmentationChan1Plane1.raw", "name"),
        ]
    );

    let too_few = errors
        .iter()
        .filter(|e| matches!(e.kind, ValidationFailure::TooFewProperties { .. }))
        .count();
    assert_eq!(too_few, 3);
}

#[test]
fn test_name_only_sections_have_too_few_properties() {
    let document = json!({
        "NWBFile": nwbfile_section(),
        "Ophys": {
            "Devices": [],
            "Fluorescence": {"name": "Fluorescence"},
            "DFOverF": {"name": "DfOverF"},
            "SegmentationImages": {"name": "SegmentationImages"}
        }
    });

    let errors = validate(&document, &ophys_root()).unwrap();
    let found: Vec<(&str, &ValidationFailure)> =
        errors.iter().map(|e| (e.path.as_str(), &e.kind)).collect();
    assert_eq!(
        found,
        vec![
            ("$.Ophys.DFOverF", &ValidationFailure::TooFewProperties { limit: 2 }),
            ("$.Ophys.Fluorescence", &ValidationFailure::TooFewProperties { limit: 2 }),
            ("$.Ophys.SegmentationImages", &ValidationFailure::TooFewProperties { limit: 2 }),
        ]
    );
}

#[test]
fn test_adding_a_plane_fixes_name_only_sections() {
    let document = json!({
        "NWBFile": nwbfile_section(),
        "Ophys": {
            "Devices": [],
            "Fluorescence": {
                "name": "Fluorescence",
                "FluorescenceChan1Plane1": {
                    "raw": {"name": "FluorescenceChan1Plane0", "description": "basic description"}
                }
            },
            "DFOverF": {
                "name": "DfOverF",
                "DFChan1Plane1": {
                    "raw": {"name": "DFChan1Plane0", "description": "basic description"}
                }
            },
            "SegmentationImages": {
                "name": "SegmentationImages",
                "SegmentationChan1Plane1": {
                    "raw": {"name": "SegmentationChan1Plane0", "description": "basic description"}
                }
            }
        }
    });

    assert!(validate(&document, &ophys_root()).unwrap().is_empty());
}

#[test]
fn test_ecephys_metadata() {
    let ecephys = ecephys_schema(Some("ElectricalSeriesRaw")).unwrap();
    let root = assemble_root_schema([("Ecephys", ecephys)])
        .unwrap()
        .to_value();
    let mut document = json!({
        "NWBFile": nwbfile_section(),
        "Ecephys": {
            "Device": [{"name": "DeviceEcephys", "description": "no description"}],
            "ElectrodeGroup": [{
                "name": "0",
                "description": "no description",
                "location": "unknown",
                "device": "DeviceEcephys"
            }],
            "ElectricalSeriesRaw": {"name": "ElectricalSeriesRaw", "description": "raw traces"}
        }
    });
    validate_metadata(&document, &root).unwrap();

    document["Ecephys"]["ElectrodeGroup"] = json!([{"name": "0"}]);
    let errors = validate(&document, &root).unwrap();
    assert_eq!(errors.len(), 3, "{errors:#?}");
    assert!(errors
        .iter()
        .all(|e| e.path == "$.Ecephys.ElectrodeGroup[0]"));
}

#[test]
fn test_validate_metadata_error_lists_violations() {
    let document = json!({"NWBFile": {"identifier": "1234"}});
    let root = assemble_root_schema(Vec::<(&str, SchemaNode)>::new()).unwrap().to_value();

    match validate_metadata(&document, &root) {
        Err(MetadataError::Invalid(errors)) => {
            assert_eq!(errors.len(), 2);
            assert!(errors.iter().all(|e| e.path == "$.NWBFile"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn test_check_schema_rejects_bad_schema() {
    let bad = json!({"type": "object", "minProperties": "two"});
    assert!(matches!(
        check_schema(&bad),
        Err(MetadataError::InvalidSchema(_))
    ));
}

#[test]
fn test_json_path() {
    let document = json!({"a": {"0": [10, {"b": 1}]}});
    assert_eq!(json_path(&document, ""), "$");
    assert_eq!(json_path(&document, "/a/0/1/b"), "$.a.0[1].b");
}

#[test]
fn test_deep_merge() {
    let base = json!({"x": 1, "nested": {"a": 1, "list": [1, 2]}, "keep": true});
    let overrides = json!({"x": 2, "nested": {"b": 2, "list": [3]}});

    assert_eq!(deep_merge(&base, &json!({})), base);
    assert_eq!(deep_merge(&json!({"x": 1}), &json!({"x": 2})), json!({"x": 2}));
    assert_eq!(
        deep_merge(&base, &overrides),
        json!({"x": 2, "nested": {"a": 1, "list": [3], "b": 2}, "keep": true})
    );
}

#[test]
fn test_dict_helpers() {
    let mut devices = vec![json!({"name": "A", "description": "first"})];
    assert!(exist_dict_in_list(&devices[0].clone(), &devices));
    assert!(!exist_dict_in_list(&json!({"name": "A"}), &devices));

    append_replace_dict_in_list(&mut devices, json!({"name": "A", "manufacturer": "X"}), "name");
    assert_eq!(devices.len(), 1);
    assert_eq!(
        devices[0],
        json!({"name": "A", "description": "first", "manufacturer": "X"})
    );

    append_replace_dict_in_list(&mut devices, json!({"name": "B"}), "name");
    assert_eq!(devices.len(), 2);
}

#[test]
fn test_load_dict_from_file() {
    let dir = tempfile::tempdir().unwrap();

    let yaml_path = dir.path().join("metadata.yml");
    let mut file = std::fs::File::create(&yaml_path).unwrap();
    writeln!(file, "NWBFile:\n  identifier: '1234'\n  experimenter: [Ada, Grace]").unwrap();
    let loaded = load_dict_from_file(&yaml_path).unwrap();
    assert_eq!(loaded["NWBFile"]["experimenter"], json!(["Ada", "Grace"]));

    let json_path = dir.path().join("metadata.json");
    std::fs::write(&json_path, r#"{"NWBFile": {"identifier": "1234"}}"#).unwrap();
    assert_eq!(load_dict_from_file(&json_path).unwrap()["NWBFile"]["identifier"], "1234");

    let txt_path = dir.path().join("metadata.txt");
    std::fs::write(&txt_path, "").unwrap();
    assert!(matches!(
        load_dict_from_file(&txt_path),
        Err(MetadataError::UnsupportedFileType(_))
    ));
}

#[test]
fn test_report_groups_by_section() {
    let document = json!({
        "NWBFile": nwbfile_section(),
        "Ophys": {"Devices": [], "Fluorescence": {"name": "Fluorescence"}}
    });
    let report = ValidationReport::build("memory", &document, &ophys_root()).unwrap();

    assert!(!report.is_valid());
    assert_eq!(report.sections, vec!["NWBFile", "Ophys"]);
    assert_eq!(report.errors_in("Ophys").count(), 1);
    assert_eq!(report.errors_in("NWBFile").count(), 0);

    let text = report.to_string();
    assert!(text.contains("[✓] NWBFile"));
    assert!(text.contains("[✗] Ophys - FAILED: 1 error(s)"));
    assert!(text.contains("Validation FAILED"));
}
