use serde_json::json;
use tempfile::tempdir;

use super::*;
use crate::backend::{
    get_default_backend_configuration, ArraySource, BackendKind, ChunkingBudget, DatasetContainer,
    NwbFile, SyntheticArray, TimeSeries,
};
use crate::registry::{check_schema, MetadataError};
use crate::writer::{read_zarr_array, ZarrArrayMetadata};

fn recording(frames: usize) -> Recording {
    let traces = SyntheticArray::new(vec![frames, 4], |i: &[usize]| (i[0] * 4 + i[1]) as i16);
    Recording::new(traces, 30_000.0).with_channel_groups(["0", "0", "1", "1"])
}

fn converter(frames: usize) -> Converter {
    let mut converter = Converter::new();
    converter
        .add_interface(
            "Recording",
            RecordingInterface::new(recording(frames), RecordingOptions::default()),
        )
        .unwrap();
    converter
}

fn metadata_for(converter: &Converter) -> serde_json::Value {
    let mut metadata = converter.get_metadata();
    metadata["NWBFile"]["session_start_time"] = json!("2020-01-01T00:00:00");
    metadata
}

#[test]
fn test_interface_schemas_are_valid() {
    let interface = RecordingInterface::new(recording(10), RecordingOptions::default());

    let source = interface.get_source_schema().unwrap();
    check_schema(&source.to_value()).unwrap();
    assert!(source.additional_properties);
    assert_eq!(source.properties["es_key"]["default"], "ElectricalSeries");
    assert_eq!(source.properties["verbose"]["type"], "boolean");

    let options = interface.get_conversion_options_schema().unwrap();
    check_schema(&options.to_value()).unwrap();
    assert!(!options.additional_properties);
    assert!(options.required.is_empty());
    let keys: Vec<&str> = options.properties.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["stub_test", "starting_time", "write_as", "write_electrical_series"]
    );

    check_schema(&interface.get_metadata_schema().unwrap().to_value()).unwrap();
}

#[test]
fn test_recording_metadata() {
    let interface = RecordingInterface::new(
        recording(10),
        RecordingOptions {
            verbose: false,
            es_key: "ElectricalSeriesRaw".to_string(),
        },
    );
    let metadata = interface.get_metadata();

    assert_eq!(
        metadata["Ecephys"]["Device"],
        json!([{"name": "DeviceEcephys", "description": "no description"}])
    );
    let groups: Vec<&str> = metadata["Ecephys"]["ElectrodeGroup"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(groups, vec!["0", "1"]);
    assert_eq!(
        metadata["Ecephys"]["ElectricalSeriesRaw"],
        json!({
            "name": "ElectricalSeriesRaw",
            "description": "Acquisition traces for the ElectricalSeriesRaw."
        })
    );

    let schema = interface.get_metadata_schema().unwrap();
    assert!(schema.properties["Ecephys"]["properties"]
        .get("ElectricalSeriesRaw")
        .is_some());
}

#[test]
fn test_default_electrode_group() {
    let plain = Recording::new(SyntheticArray::zeros::<i16>(vec![10, 2]), 1000.0);
    assert_eq!(plain.group_names(), vec!["ElectrodeGroup"]);
}

#[test]
fn test_from_source_data() {
    let interface = RecordingInterface::from_source_data(
        recording(10),
        &json!({"es_key": "ElectricalSeriesLF", "file_path": "recording.bin"}),
    )
    .unwrap();
    assert_eq!(interface.es_key(), "ElectricalSeriesLF");

    let err = RecordingInterface::from_source_data(recording(10), &json!({"verbose": "yes"}))
        .unwrap_err();
    assert!(matches!(err, InterfaceError::Metadata(MetadataError::Invalid(_))));
}

#[test]
fn test_converter_metadata_validates() {
    let converter = converter(10);
    let metadata = metadata_for(&converter);
    converter.validate_metadata(&metadata).unwrap();

    let schema = converter.get_metadata_schema().unwrap();
    assert_eq!(schema["required"], json!(["NWBFile", "Ecephys"]));

    let mut broken = metadata.clone();
    broken["Ecephys"]["Device"] = json!([]);
    assert!(converter.validate_metadata(&broken).is_err());
}

#[test]
fn test_converter_schemas() {
    let converter = converter(10);
    let source = converter.get_source_schema().unwrap().to_value();
    check_schema(&source).unwrap();
    assert_eq!(source["title"], "Source data schema");
    assert_eq!(source["properties"]["Recording"]["additionalProperties"], true);

    let options = converter.get_conversion_options_schema().unwrap().to_value();
    check_schema(&options).unwrap();
    assert_eq!(
        options["properties"]["Recording"]["properties"]["stub_test"]["default"],
        false
    );
}

#[test]
fn test_duplicate_interface() {
    let mut converter = converter(10);
    let err = converter
        .add_interface(
            "Recording",
            RecordingInterface::new(recording(10), RecordingOptions::default()),
        )
        .unwrap_err();
    assert!(matches!(err, InterfaceError::DuplicateInterface(ref name) if name == "Recording"));
    assert_eq!(converter.interface_names(), vec!["Recording"]);
}

#[test]
fn test_create_nwbfile() {
    let converter = converter(10);
    let mut metadata = metadata_for(&converter);
    metadata["NWBFile"]["experimenter"] = json!("Doe, Jane");
    metadata["NWBFile"]["identifier"] = json!("abc-123");

    let nwbfile = converter.create_nwbfile(&metadata).unwrap();
    assert_eq!(nwbfile.identifier, "abc-123");
    assert_eq!(nwbfile.experimenter, vec!["Doe, Jane"]);
    assert_eq!(nwbfile.session_start_time.to_rfc3339(), "2020-01-01T00:00:00+00:00");

    metadata["NWBFile"]["session_start_time"] = json!("yesterday");
    assert!(matches!(
        converter.create_nwbfile(&metadata),
        Err(InterfaceError::InvalidMetadata { .. })
    ));
}

#[test]
fn test_parse_session_start_time() {
    let with_zone = parse_session_start_time("2020-01-01T02:00:00+02:00").unwrap();
    let naive = parse_session_start_time("2020-01-01T00:00:00").unwrap();
    assert_eq!(with_zone, naive);
    assert!(parse_session_start_time("2020-01-01").is_none());
}

#[test]
fn test_add_to_nwbfile_stub_and_processed() {
    let converter = converter(1_000);
    let metadata = metadata_for(&converter);
    let mut nwbfile = converter.create_nwbfile(&metadata).unwrap();

    converter
        .add_to_nwbfile(
            &mut nwbfile,
            &metadata,
            &json!({
                "Recording": {"stub_test": true, "write_as": "processed", "starting_time": 1.5}
            }),
        )
        .unwrap();

    assert!(nwbfile.acquisition().is_empty());
    assert_eq!(nwbfile.devices.len(), 1);
    assert_eq!(nwbfile.electrode_groups.len(), 2);
    let series = &nwbfile.processing()["ecephys"].data_interfaces["ElectricalSeries"];
    assert_eq!(series.data.source().shape(), &[STUB_FRAMES, 4]);
    assert_eq!(series.starting_time, Some(1.5));
    assert_eq!(series.description, "Acquisition traces for the ElectricalSeries.");
    assert_eq!(
        nwbfile.dataset_paths(),
        vec!["processing/ecephys/ElectricalSeries/data".to_string()]
    );
}

#[test]
fn test_add_to_nwbfile_rejects_unknown_options() {
    let converter = converter(10);
    let metadata = metadata_for(&converter);
    let mut nwbfile = converter.create_nwbfile(&metadata).unwrap();

    let err = converter
        .add_to_nwbfile(&mut nwbfile, &metadata, &json!({"Recording": {"compression": "gzip"}}))
        .unwrap_err();
    assert!(matches!(err, InterfaceError::Metadata(MetadataError::Invalid(_))));

    let err = converter
        .add_to_nwbfile(&mut nwbfile, &metadata, &json!({"Recording": {"write_as": "bogus"}}))
        .unwrap_err();
    assert!(matches!(err, InterfaceError::InvalidOptions(_)));
}

#[test]
fn test_write_electrical_series_false() {
    let converter = converter(10);
    let metadata = metadata_for(&converter);
    let mut nwbfile = converter.create_nwbfile(&metadata).unwrap();
    converter
        .add_to_nwbfile(
            &mut nwbfile,
            &metadata,
            &json!({"Recording": {"write_electrical_series": false}}),
        )
        .unwrap();
    assert!(nwbfile.dataset_paths().is_empty());
    assert_eq!(nwbfile.devices.len(), 1);
}

#[test]
fn test_run_conversion_with_override() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("converted.nwb.zarr");
    let converter = converter(1_000);
    let metadata = metadata_for(&converter);

    // build the same file once to derive an override for its only dataset
    let mut preview = converter.create_nwbfile(&metadata).unwrap();
    converter.add_to_nwbfile(&mut preview, &metadata, &json!({})).unwrap();
    let mut overrides = get_default_backend_configuration(&preview, BackendKind::Zarr);
    let dataset = overrides
        .get_mut("acquisition/ElectricalSeries/data")
        .unwrap();
    dataset.chunk_shape = vec![100, 2];
    dataset.buffer_shape = vec![500, 4];
    dataset.set_compression_level(5);

    let stats = converter
        .run_conversion(
            &store,
            BackendKind::Zarr,
            Some(&metadata),
            &json!({}),
            Some(&overrides),
            &ChunkingBudget::default(),
        )
        .unwrap();
    assert_eq!(stats.datasets_written, 1);
    assert_eq!(stats.chunks_written, 20);

    let array_dir = store.join("acquisition/ElectricalSeries/data");
    let written = ZarrArrayMetadata::open(&array_dir).unwrap();
    assert_eq!(written.chunks, vec![100, 2]);
    assert_eq!(written.compressor.unwrap().level, Some(5));
    let data = read_zarr_array(&array_dir).unwrap();
    assert_eq!(
        data.as_bytes(),
        recording(1_000)
            .traces
            .read_block(&[0, 0], &[1_000, 4])
            .unwrap()
            .as_slice()
    );
}

#[test]
fn test_run_conversion_with_default_metadata_needs_start_time() {
    let dir = tempdir().unwrap();
    let converter = converter(10);
    let err = converter
        .run_conversion(
            dir.path().join("x.zarr"),
            BackendKind::Zarr,
            None,
            &json!({}),
            None,
            &ChunkingBudget::default(),
        )
        .unwrap_err();
    assert!(matches!(err, InterfaceError::Metadata(MetadataError::Invalid(_))));
}

#[test]
fn test_configure_and_write_skips_scalar_series() {
    use chrono::{TimeZone, Utc};

    let dir = tempdir().unwrap();
    let store = dir.path().join("scalar.nwb.zarr");
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let mut nwbfile = NwbFile::new("scalar and trace", start);
    nwbfile.add_acquisition(TimeSeries::new(
        "Scalar",
        SyntheticArray::zeros::<f64>(vec![]),
        "volts",
        1.0,
    ));
    nwbfile.add_acquisition(TimeSeries::new(
        "Trace",
        SyntheticArray::new(vec![10, 2], |i: &[usize]| (i[0] * 2 + i[1]) as i16),
        "volts",
        1.0,
    ));

    let stats =
        configure_and_write(&mut nwbfile, &store, BackendKind::Zarr, &ChunkingBudget::default())
            .unwrap();
    assert_eq!(stats.datasets_written, 1);
    assert!(nwbfile.dataset("acquisition/Scalar/data").unwrap().io_settings().is_none());
    assert!(!store.join("acquisition/Scalar/data").exists());

    let trace = read_zarr_array(store.join("acquisition/Trace/data")).unwrap();
    assert_eq!(trace.shape(), &[10, 2]);
    assert_eq!(
        crate::backend::decode_le::<i16>(trace.as_bytes()),
        (0..20).collect::<Vec<i16>>()
    );
}
