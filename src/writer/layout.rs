//! Group and dataset layout shared by every backend.
//!
//! Writers walk the same tree: root attributes, `general`, `acquisition`
//! and `processing/<module>`, with one group per time series holding `data`
//! and optionally `timestamps`.

use log::warn;
use serde_json::{json, Map, Value};

use crate::backend::{
    BackendKind, ConfigurationError, DatasetConfiguration, DatasetContainer, DatasetSlot, Device,
    ElectrodeGroup, NwbFile, TimeSeries,
};

use super::WriterError;

/// NWB schema version recorded in the root attributes.
pub const NWB_VERSION: &str = "2.7.0";

/// A dataset ready to be written: its source and validated settings.
#[derive(Debug)]
pub struct PlannedDataset<'a> {
    /// Dataset path inside the container
    pub path: String,
    /// Source array
    pub slot: &'a DatasetSlot,
    /// Settings applied by `configure_backend`
    pub configuration: &'a DatasetConfiguration,
}

/// Whether the source of `slot` is a scalar or has a zero-length axis.
///
/// Such datasets are never configured and are left out of the store.
pub fn is_empty(slot: &DatasetSlot) -> bool {
    let shape = slot.source().shape();
    shape.is_empty() || shape.contains(&0)
}

/// Check that every dataset carries settings for `backend` that still
/// hold against its source, before anything is written.
///
/// Unconfigured scalars and datasets with a zero-length axis are skipped.
pub fn plan_datasets(
    nwbfile: &NwbFile,
    backend: BackendKind,
) -> Result<Vec<PlannedDataset<'_>>, WriterError> {
    let mut planned = Vec::new();
    for path in nwbfile.dataset_paths() {
        let slot = nwbfile
            .dataset(&path)
            .ok_or_else(|| WriterError::Unconfigured(path.clone()))?;
        let Some(configuration) = slot.io_settings() else {
            if is_empty(slot) {
                warn!("Skipping dataset '{}' with nothing to chunk", path);
                continue;
            }
            return Err(WriterError::Unconfigured(path));
        };

        configuration.validate()?;
        if configuration.backend != backend {
            return Err(ConfigurationError::BackendMismatch {
                path,
                expected: backend,
                actual: configuration.backend,
            }
            .into());
        }
        let source = slot.source();
        if source.shape() != configuration.full_shape.as_slice() {
            return Err(ConfigurationError::ShapeMismatch {
                path,
                configured: configuration.full_shape.clone(),
                actual: source.shape().to_vec(),
            }
            .into());
        }
        planned.push(PlannedDataset {
            path,
            slot,
            configuration,
        });
    }
    Ok(planned)
}

fn insert_some(attrs: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        attrs.insert(key.into(), json!(value));
    }
}

/// Attributes of the root group.
pub fn root_attributes(nwbfile: &NwbFile) -> Map<String, Value> {
    let start = nwbfile.session_start_time.to_rfc3339();
    let mut attrs = Map::new();
    attrs.insert("neurodata_type".into(), json!("NWBFile"));
    attrs.insert("namespace".into(), json!("core"));
    attrs.insert("nwb_version".into(), json!(NWB_VERSION));
    attrs.insert("identifier".into(), json!(nwbfile.identifier));
    attrs.insert("session_description".into(), json!(nwbfile.session_description));
    attrs.insert("session_start_time".into(), json!(start));
    attrs.insert("timestamps_reference_time".into(), json!(start));
    attrs
}

/// Attributes of the `general` group; empty when nothing is set.
pub fn general_attributes(nwbfile: &NwbFile) -> Map<String, Value> {
    let mut attrs = Map::new();
    if !nwbfile.experimenter.is_empty() {
        attrs.insert("experimenter".into(), json!(nwbfile.experimenter));
    }
    insert_some(&mut attrs, "lab", &nwbfile.lab);
    insert_some(&mut attrs, "institution", &nwbfile.institution);
    insert_some(&mut attrs, "experiment_description", &nwbfile.experiment_description);
    insert_some(&mut attrs, "session_id", &nwbfile.session_id);
    attrs
}

/// Attributes of a time series group.
pub fn time_series_attributes(series: &TimeSeries) -> Map<String, Value> {
    let mut attrs = Map::new();
    attrs.insert("neurodata_type".into(), json!("TimeSeries"));
    attrs.insert("namespace".into(), json!("core"));
    attrs.insert("description".into(), json!(series.description));
    attrs.insert("comments".into(), json!(series.comments));
    if let Some(rate) = series.rate {
        attrs.insert("rate".into(), json!(rate));
        attrs.insert("starting_time".into(), json!(series.starting_time.unwrap_or(0.0)));
    }
    attrs
}

/// Attributes of the `data` dataset of a time series.
pub fn data_attributes(series: &TimeSeries) -> Map<String, Value> {
    let mut attrs = Map::new();
    attrs.insert("unit".into(), json!(series.unit));
    attrs.insert("conversion".into(), json!(series.conversion));
    attrs.insert("offset".into(), json!(series.offset));
    attrs.insert("resolution".into(), json!(series.resolution));
    attrs
}

/// Attributes of the `timestamps` dataset of a time series.
pub fn timestamps_attributes() -> Map<String, Value> {
    let mut attrs = Map::new();
    attrs.insert("unit".into(), json!("seconds"));
    attrs.insert("interval".into(), json!(1));
    attrs
}

/// Attributes of a processing module group.
pub fn processing_attributes(description: &str) -> Map<String, Value> {
    let mut attrs = Map::new();
    attrs.insert("neurodata_type".into(), json!("ProcessingModule"));
    attrs.insert("namespace".into(), json!("core"));
    attrs.insert("description".into(), json!(description));
    attrs
}

/// Attributes of a device group under `general/devices`.
pub fn device_attributes(device: &Device) -> Map<String, Value> {
    let mut attrs = Map::new();
    attrs.insert("neurodata_type".into(), json!("Device"));
    attrs.insert("namespace".into(), json!("core"));
    attrs.insert("description".into(), json!(device.description));
    attrs
}

/// Attributes of an electrode group under `general/extracellular_ephys`.
///
/// The device link is stored as its path inside the file.
pub fn electrode_group_attributes(group: &ElectrodeGroup) -> Map<String, Value> {
    let mut attrs = Map::new();
    attrs.insert("neurodata_type".into(), json!("ElectrodeGroup"));
    attrs.insert("namespace".into(), json!("core"));
    attrs.insert("description".into(), json!(group.description));
    attrs.insert("location".into(), json!(group.location));
    attrs.insert("device".into(), json!(format!("/general/devices/{}", group.device)));
    attrs
}
