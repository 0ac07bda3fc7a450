//! Property tests for default chunk and buffer shapes.

use nwbconv::backend::{
    estimate_default_buffer_shape, estimate_default_chunk_shape,
    get_default_backend_configuration_with_budget, BackendKind, ChunkingBudget, DataType, NwbFile,
    SyntheticArray, TimeSeries,
};
use proptest::prelude::*;

fn bytes(shape: &[usize], itemsize: usize) -> f64 {
    shape.iter().map(|&n| n as f64).product::<f64>() * itemsize as f64
}

fn itemsizes() -> impl Strategy<Value = usize> {
    prop::sample::select(vec![1usize, 2, 4, 8])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn chunk_fits_array_and_budget(
        full in prop::collection::vec(1usize..200_000, 1..4),
        itemsize in itemsizes(),
        chunk_budget in 1e4f64..1e7,
    ) {
        let chunk = estimate_default_chunk_shape(chunk_budget, &full, itemsize);
        prop_assert_eq!(chunk.len(), full.len());
        for (c, f) in chunk.iter().zip(&full) {
            prop_assert!(*c >= 1);
            prop_assert!(c <= f);
        }
        prop_assert!(bytes(&chunk, itemsize) <= chunk_budget);
    }

    #[test]
    fn buffer_is_chunk_multiple_within_array(
        full in prop::collection::vec(1usize..200_000, 1..4),
        itemsize in itemsizes(),
        chunk_budget in 1e4f64..1e6,
        buffer_budget in 1e6f64..1e8,
    ) {
        let chunk = estimate_default_chunk_shape(chunk_budget, &full, itemsize);
        let buffer = estimate_default_buffer_shape(buffer_budget, &chunk, &full, itemsize);
        prop_assert_eq!(buffer.len(), full.len());
        for ((b, c), f) in buffer.iter().zip(&chunk).zip(&full) {
            prop_assert!(c <= b, "chunk {:?} buffer {:?}", chunk, buffer);
            prop_assert!(b <= f, "buffer {:?} full {:?}", buffer, full);
            prop_assert_eq!(b % c, 0);
        }
        if bytes(&full, itemsize) > buffer_budget {
            prop_assert!(bytes(&buffer, itemsize) <= buffer_budget);
        }
    }

    #[test]
    fn default_configurations_validate(
        frames in 1usize..2_000_000,
        channels in 1usize..1_024,
        dtype in prop::sample::select(vec![DataType::Int16, DataType::Float32, DataType::Float64]),
        backend in prop::sample::select(vec![BackendKind::Hdf5, BackendKind::Zarr]),
    ) {
        let mut nwbfile = NwbFile::new("property test", chrono::Utc::now());
        let data = match dtype {
            DataType::Int16 => SyntheticArray::zeros::<i16>(vec![frames, channels]),
            DataType::Float32 => SyntheticArray::zeros::<f32>(vec![frames, channels]),
            _ => SyntheticArray::zeros::<f64>(vec![frames, channels]),
        };
        nwbfile.add_acquisition(TimeSeries::new("Series", data, "volts", 30_000.0));

        let budget = ChunkingBudget::default();
        let configuration =
            get_default_backend_configuration_with_budget(&nwbfile, backend, &budget);
        prop_assert!(configuration.validate().is_ok());
        let dataset = configuration.get("acquisition/Series/data").unwrap();
        prop_assert_eq!(dataset.dtype, dtype);
        prop_assert!(dataset.chunk_bytes() <= 1_000_000);
        prop_assert!(dataset.buffer_bytes() <= 1_000_000_000);
    }
}
