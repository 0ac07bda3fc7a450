use log::{debug, warn};

use super::compression::default_compression;
use super::container::{DatasetContainer, DatasetSlot};
use super::estimate::{estimate_default_buffer_shape, estimate_default_chunk_shape};
use super::{
    BackendConfiguration, BackendKind, ChunkingBudget, ConfigurationError, DatasetConfiguration,
};

/// Default configuration for a single dataset.
///
/// Returns `None` for scalars and arrays with a zero-length axis, which have
/// nothing to chunk.
pub fn get_default_dataset_configuration(
    path: &str,
    slot: &DatasetSlot,
    backend: BackendKind,
    budget: &ChunkingBudget,
) -> Option<DatasetConfiguration> {
    let source = slot.source();
    let full_shape = source.shape().to_vec();
    let dtype = source.dtype();

    if full_shape.is_empty() {
        debug!("Skipping scalar dataset '{}'", path);
        return None;
    }
    if full_shape.contains(&0) {
        warn!(
            "Skipping dataset '{}': shape {:?} has a zero-length axis",
            path, full_shape
        );
        return None;
    }

    let chunk_shape =
        estimate_default_chunk_shape(budget.chunk_bytes(), &full_shape, dtype.itemsize());
    let buffer_shape = estimate_default_buffer_shape(
        budget.buffer_bytes(),
        &chunk_shape,
        &full_shape,
        dtype.itemsize(),
    );
    let (compression_method, compression_options) = default_compression(backend);

    debug!(
        "Default configuration for '{}': full {:?}, chunk {:?}, buffer {:?}",
        path, full_shape, chunk_shape, buffer_shape
    );
    Some(DatasetConfiguration {
        dataset_path: path.to_string(),
        backend,
        full_shape,
        dtype,
        chunk_shape,
        buffer_shape,
        compression_method,
        compression_options,
    })
}

/// Default configuration of every array dataset in `container`, using the
/// default 1 MB chunk / 1 GB buffer budget.
pub fn get_default_backend_configuration<C>(
    container: &C,
    backend: BackendKind,
) -> BackendConfiguration
where
    C: DatasetContainer + ?Sized,
{
    get_default_backend_configuration_with_budget(container, backend, &ChunkingBudget::default())
}

/// [`get_default_backend_configuration`] with an explicit budget.
pub fn get_default_backend_configuration_with_budget<C>(
    container: &C,
    backend: BackendKind,
    budget: &ChunkingBudget,
) -> BackendConfiguration
where
    C: DatasetContainer + ?Sized,
{
    let mut configuration = BackendConfiguration::new(backend);
    for path in container.dataset_paths() {
        let Some(slot) = container.dataset(&path) else {
            continue;
        };
        if let Some(dataset) = get_default_dataset_configuration(&path, slot, backend, budget) {
            configuration.insert(dataset);
        }
    }
    configuration
}

/// Apply `configuration` to the datasets of `container`.
///
/// Everything is checked before anything is applied: the configuration's own
/// invariants, that every path exists, and that the live arrays still have
/// the configured shape and element type. On error the container is left
/// untouched.
pub fn configure_backend<C>(
    container: &mut C,
    configuration: &BackendConfiguration,
) -> Result<(), ConfigurationError>
where
    C: DatasetContainer + ?Sized,
{
    configuration.validate()?;

    for (path, dataset) in &configuration.dataset_configurations {
        let slot = container
            .dataset(path)
            .ok_or_else(|| ConfigurationError::DatasetNotFound { path: path.clone() })?;
        let source = slot.source();
        if source.shape() != dataset.full_shape.as_slice() {
            return Err(ConfigurationError::ShapeMismatch {
                path: path.clone(),
                configured: dataset.full_shape.clone(),
                actual: source.shape().to_vec(),
            });
        }
        if source.dtype() != dataset.dtype {
            return Err(ConfigurationError::DtypeMismatch {
                path: path.clone(),
                configured: dataset.dtype,
                actual: source.dtype(),
            });
        }
    }

    for (path, dataset) in &configuration.dataset_configurations {
        let slot = container
            .dataset_mut(path)
            .ok_or_else(|| ConfigurationError::DatasetNotFound { path: path.clone() })?;
        slot.set_io_settings(dataset.clone());
        debug!(
            "Configured '{}': chunk {:?}, buffer {:?}, compression {:?}",
            path, dataset.chunk_shape, dataset.buffer_shape, dataset.compression_method
        );
    }
    Ok(())
}
