use chrono::{TimeZone, Utc};
use serde_json::json;

use super::*;

const PATH: &str = "acquisition/TestTimeSeries/data";

fn recording_file(shape: Vec<usize>) -> NwbFile {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let mut nwbfile = NwbFile::new("test session", start);
    let data = SyntheticArray::zeros::<i16>(shape);
    nwbfile.add_acquisition(TimeSeries::new("TestTimeSeries", data, "volts", 30_000.0));
    nwbfile
}

#[test]
fn test_default_chunk_shape_recording() {
    let chunk = estimate_default_chunk_shape(1e6, &[150_000, 384], 2);
    assert_eq!(chunk, vec![13_650, 35]);
}

#[test]
fn test_default_chunk_shape_one_dimensional() {
    assert_eq!(estimate_default_chunk_shape(1e6, &[1_000], 8), vec![1_000]);
    assert_eq!(estimate_default_chunk_shape(1e6, &[10_000_000], 8), vec![125_000]);
}

#[test]
fn test_default_buffer_shape_fits_in_budget() {
    let buffer = estimate_default_buffer_shape(1e9, &[13_650, 35], &[150_000, 384], 2);
    assert_eq!(buffer, vec![136_500, 350]);
}

#[test]
fn test_default_buffer_shape_over_budget() {
    // 4 GB of float32, 1 GB budget
    let full = [1_000_000, 1_000];
    let chunk = estimate_default_chunk_shape(1e6, &full, 4);
    let buffer = estimate_default_buffer_shape(1e9, &chunk, &full, 4);

    let bytes: f64 = buffer.iter().map(|&n| n as f64).product::<f64>() * 4.0;
    assert!(bytes <= 1e9, "buffer {buffer:?} uses {bytes} bytes");
    for ((b, c), f) in buffer.iter().zip(&chunk).zip(&full) {
        assert_eq!(b % c, 0);
        assert!(c <= b && b <= f);
    }
}

#[test]
fn test_default_backend_configuration() {
    let nwbfile = recording_file(vec![150_000, 384]);
    let configuration = get_default_backend_configuration(&nwbfile, BackendKind::Hdf5);

    assert_eq!(configuration.dataset_configurations.len(), 1);
    let dataset = configuration.get(PATH).unwrap();
    assert_eq!(dataset.dtype, DataType::Int16);
    assert_eq!(dataset.full_shape, vec![150_000, 384]);
    assert_eq!(dataset.chunk_shape, vec![13_650, 35]);
    assert_eq!(dataset.buffer_shape, vec![136_500, 350]);
    assert_eq!(dataset.compression_method, Some(CompressionMethod::Gzip));
    assert_eq!(dataset.compression_options["level"], 4);
    dataset.validate().unwrap();

    let zarr = get_default_backend_configuration(&nwbfile, BackendKind::Zarr);
    assert_eq!(zarr.get(PATH).unwrap().compression_options["level"], 1);
}

#[test]
fn test_timestamps_and_processing_datasets_are_found() {
    let mut nwbfile = recording_file(vec![1_000, 4]);
    let data = SyntheticArray::zeros::<f32>(vec![1_000, 4]);
    let series = TimeSeries::new("Filtered", data, "volts", 1.0)
        .with_timestamps(SyntheticArray::new(vec![1_000], |i: &[usize]| i[0] as f64 / 30_000.0));
    nwbfile.processing_module("ecephys", "processed traces").add(series);

    assert_eq!(
        nwbfile.dataset_paths(),
        vec![
            PATH.to_string(),
            "processing/ecephys/Filtered/data".to_string(),
            "processing/ecephys/Filtered/timestamps".to_string(),
        ]
    );
    let configuration = get_default_backend_configuration(&nwbfile, BackendKind::Zarr);
    assert_eq!(configuration.dataset_configurations.len(), 3);
    assert_eq!(
        configuration
            .get("processing/ecephys/Filtered/timestamps")
            .unwrap()
            .dtype,
        DataType::Float64
    );
}

#[test]
fn test_zero_length_datasets_are_skipped() {
    let nwbfile = recording_file(vec![0, 384]);
    let configuration = get_default_backend_configuration(&nwbfile, BackendKind::Hdf5);
    assert!(configuration.dataset_configurations.is_empty());
}

#[test]
fn test_configure_backend_with_overrides() {
    let mut nwbfile = recording_file(vec![150_000, 384]);
    let mut configuration = get_default_backend_configuration(&nwbfile, BackendKind::Hdf5);

    let dataset = configuration.get_mut(PATH).unwrap();
    dataset.chunk_shape = vec![30_000, 64];
    dataset.buffer_shape = vec![60_000, 192];
    dataset.compression_options = json!({"level": 5}).as_object().unwrap().clone();

    configure_backend(&mut nwbfile, &configuration).unwrap();
    let applied = nwbfile.dataset(PATH).unwrap().io_settings().unwrap();
    assert_eq!(applied.chunk_shape, vec![30_000, 64]);
    assert_eq!(applied.buffer_shape, vec![60_000, 192]);
    assert_eq!(compression_level(&applied.compression_options), Some(5));
}

#[test]
fn test_configure_backend_rejects_bad_overrides() {
    let mut nwbfile = recording_file(vec![150_000, 384]);
    let defaults = get_default_backend_configuration(&nwbfile, BackendKind::Hdf5);

    let mut chunk_too_big = defaults.clone();
    chunk_too_big.get_mut(PATH).unwrap().chunk_shape = vec![200_000, 35];
    assert!(matches!(
        configure_backend(&mut nwbfile, &chunk_too_big),
        Err(ConfigurationError::ChunkExceedsBuffer { ref path, .. }) if path == PATH
    ));

    let mut not_multiple = defaults.clone();
    not_multiple.get_mut(PATH).unwrap().chunk_shape = vec![30_000, 64];
    not_multiple.get_mut(PATH).unwrap().buffer_shape = vec![50_000, 192];
    assert!(matches!(
        configure_backend(&mut nwbfile, &not_multiple),
        Err(ConfigurationError::BufferNotChunkMultiple { .. })
    ));

    let mut too_big = defaults.clone();
    too_big.get_mut(PATH).unwrap().buffer_shape = vec![150_000, 420];
    assert!(matches!(
        configure_backend(&mut nwbfile, &too_big),
        Err(ConfigurationError::BufferExceedsFullShape { .. })
    ));

    let mut wrong_rank = defaults.clone();
    wrong_rank.get_mut(PATH).unwrap().chunk_shape = vec![100];
    assert!(matches!(
        configure_backend(&mut nwbfile, &wrong_rank),
        Err(ConfigurationError::RankMismatch { what: "chunk_shape", .. })
    ));

    let mut lzf_on_zarr = get_default_backend_configuration(&nwbfile, BackendKind::Zarr);
    let dataset = lzf_on_zarr.get_mut(PATH).unwrap();
    dataset.compression_method = Some(CompressionMethod::Lzf);
    dataset.compression_options.clear();
    assert!(matches!(
        configure_backend(&mut nwbfile, &lzf_on_zarr),
        Err(ConfigurationError::UnsupportedCompression { backend: BackendKind::Zarr, .. })
    ));

    let mut bad_option = defaults.clone();
    bad_option
        .get_mut(PATH)
        .unwrap()
        .compression_options
        .insert("shuffle".into(), json!(true));
    assert!(matches!(
        configure_backend(&mut nwbfile, &bad_option),
        Err(ConfigurationError::InvalidCompressionOption { .. })
    ));

    let mut bad_level = defaults;
    bad_level.get_mut(PATH).unwrap().set_compression_level(12);
    assert!(matches!(
        configure_backend(&mut nwbfile, &bad_level),
        Err(ConfigurationError::InvalidCompressionOption { .. })
    ));

    // nothing was applied
    assert!(nwbfile.dataset(PATH).unwrap().io_settings().is_none());
}

#[test]
fn test_buffer_may_span_full_extent() {
    let mut nwbfile = recording_file(vec![150_000, 384]);
    let mut configuration = get_default_backend_configuration(&nwbfile, BackendKind::Hdf5);
    let dataset = configuration.get_mut(PATH).unwrap();
    dataset.chunk_shape = vec![40_000, 64];
    dataset.buffer_shape = vec![150_000, 384];
    configure_backend(&mut nwbfile, &configuration).unwrap();
}

#[test]
fn test_configure_backend_checks_live_array() {
    let mut nwbfile = recording_file(vec![150_000, 384]);
    let configuration = get_default_backend_configuration(&nwbfile, BackendKind::Hdf5);

    let mut missing = configuration.clone();
    let mut moved = missing.dataset_configurations.remove(PATH).unwrap();
    moved.dataset_path = "acquisition/Missing/data".to_string();
    missing.insert(moved);
    assert!(matches!(
        configure_backend(&mut nwbfile, &missing),
        Err(ConfigurationError::DatasetNotFound { ref path }) if path == "acquisition/Missing/data"
    ));

    nwbfile
        .dataset_mut(PATH)
        .unwrap()
        .replace_source(SyntheticArray::zeros::<i16>(vec![100_000, 384]));
    assert!(matches!(
        configure_backend(&mut nwbfile, &configuration),
        Err(ConfigurationError::ShapeMismatch { .. })
    ));

    nwbfile
        .dataset_mut(PATH)
        .unwrap()
        .replace_source(SyntheticArray::zeros::<f32>(vec![150_000, 384]));
    assert!(matches!(
        configure_backend(&mut nwbfile, &configuration),
        Err(ConfigurationError::DtypeMismatch { .. })
    ));
}

#[test]
fn test_backend_mismatch() {
    let nwbfile = recording_file(vec![1_000, 4]);
    let mut configuration = get_default_backend_configuration(&nwbfile, BackendKind::Hdf5);
    configuration.backend = BackendKind::Zarr;
    assert!(matches!(
        configuration.validate(),
        Err(ConfigurationError::BackendMismatch { .. })
    ));
}

#[test]
fn test_uncompressed_rejects_options() {
    let options = json!({"level": 1});
    let err = validate_compression("x", BackendKind::Hdf5, None, options.as_object().unwrap())
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidCompressionOption { .. }));
    validate_compression("x", BackendKind::Hdf5, None, &serde_json::Map::new()).unwrap();
}

#[test]
fn test_display() {
    let nwbfile = recording_file(vec![150_000, 384]);
    let configuration = get_default_backend_configuration(&nwbfile, BackendKind::Hdf5);
    let text = configuration.to_string();

    assert!(text.contains("HDF5 dataset configurations"));
    assert!(text.contains("full shape of source array : (150000, 384)"));
    assert!(text.contains("full size of source array : 115.20 MB"));
    assert!(text.contains("chunk shape : (13650, 35)"));
    assert!(text.contains("compression method : gzip"));
    assert!(text.contains(r#"compression options : {"level":4}"#));
}

#[test]
fn test_configuration_serde() {
    let nwbfile = recording_file(vec![1_000, 4]);
    let configuration = get_default_backend_configuration(&nwbfile, BackendKind::Zarr);
    let text = serde_json::to_string(&configuration).unwrap();
    assert!(text.contains(r#""backend":"zarr""#));
    assert!(text.contains(r#""dtype":"int16""#));
    let restored: BackendConfiguration = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, configuration);
}

#[test]
fn test_in_memory_blocks() {
    let values: Vec<i16> = (0..24).collect();
    let array = InMemoryArray::from_vec(vec![2, 3, 4], values).unwrap();

    let block = array.read_block(&[1, 1, 2], &[1, 2, 2]).unwrap();
    assert_eq!(decode_le::<i16>(&block), vec![18, 19, 22, 23]);

    assert!(matches!(
        array.read_block(&[1, 2, 0], &[1, 2, 4]),
        Err(ArrayError::OutOfBounds { .. })
    ));
    assert!(matches!(
        InMemoryArray::from_vec(vec![2, 2], vec![1i16, 2, 3]),
        Err(ArrayError::LengthMismatch { expected: 4, actual: 3, .. })
    ));
}

#[test]
fn test_synthetic_matches_in_memory() {
    let synthetic = SyntheticArray::new(vec![5, 7], |i: &[usize]| (i[0] * 7 + i[1]) as i32);
    let materialized = InMemoryArray::from_vec(vec![5, 7], (0..35).collect::<Vec<i32>>()).unwrap();

    for block in BlockIter::new(&[5, 7], &[2, 3]) {
        assert_eq!(
            synthetic.read_block(&block.offset, &block.shape).unwrap(),
            materialized.read_block(&block.offset, &block.shape).unwrap()
        );
    }
}

#[test]
fn test_runtime_typed_zeros() {
    let zeros = SyntheticArray::zeros_of(vec![3, 2], DataType::Float64);
    assert_eq!(zeros.dtype(), DataType::Float64);
    assert_eq!(zeros.read_block(&[1, 0], &[2, 2]).unwrap(), vec![0u8; 32]);
}

#[test]
fn test_block_iter_clips_edges() {
    let blocks: Vec<Block> = BlockIter::new(&[5, 4], &[2, 4]).collect();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[2].index, vec![2, 0]);
    assert_eq!(blocks[2].offset, vec![4, 0]);
    assert_eq!(blocks[2].shape, vec![1, 4]);

    assert_eq!(BlockIter::new(&[0, 4], &[2, 4]).count(), 0);
}

#[test]
fn test_in_memory_scalar_and_column_blocks() {
    let scalar = InMemoryArray::from_vec(vec![], vec![7.5f64]).unwrap();
    assert_eq!(decode_le::<f64>(&scalar.read_block(&[], &[]).unwrap()), vec![7.5]);

    let values: Vec<u32> = (0..12).collect();
    let array = InMemoryArray::from_vec(vec![4, 3], values).unwrap();
    let column = array.read_block(&[1, 2], &[3, 1]).unwrap();
    assert_eq!(decode_le::<u32>(&column), vec![5, 8, 11]);
}

#[test]
fn test_dtype_names() {
    assert_eq!("int16".parse::<DataType>().unwrap(), DataType::Int16);
    assert_eq!(DataType::Int16.zarr_dtype(), "<i2");
    assert_eq!(DataType::from_zarr_dtype("<f8"), Some(DataType::Float64));
    assert!("complex64".parse::<DataType>().is_err());
    assert_eq!(human_readable_size(999), "999 B");
    assert_eq!(format_shape(&[7]), "(7,)");
}
