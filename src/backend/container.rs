//! In-memory NWB container: the objects a conversion builds before writing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::warn;
use uuid::Uuid;

use super::array::ArraySource;
use super::config::DatasetConfiguration;

/// A dataset inside a container: its source plus the IO settings applied to it
#[derive(Debug)]
pub struct DatasetSlot {
    source: Box<dyn ArraySource>,
    io: Option<DatasetConfiguration>,
}

impl DatasetSlot {
    /// Wrap an array source with no IO settings.
    pub fn new(source: impl ArraySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            io: None,
        }
    }

    /// The array behind this dataset
    pub fn source(&self) -> &dyn ArraySource {
        self.source.as_ref()
    }

    /// Chunking and compression applied by `configure_backend`, if any
    pub fn io_settings(&self) -> Option<&DatasetConfiguration> {
        self.io.as_ref()
    }

    /// Swap the array source. Existing IO settings are dropped.
    pub fn replace_source(&mut self, source: impl ArraySource + 'static) {
        self.source = Box::new(source);
        self.io = None;
    }

    pub(crate) fn set_io_settings(&mut self, configuration: DatasetConfiguration) {
        self.io = Some(configuration);
    }
}

/// Anything that exposes array datasets under slash-separated paths.
pub trait DatasetContainer {
    /// Every dataset path, in a stable order
    fn dataset_paths(&self) -> Vec<String>;

    /// Look up a dataset
    fn dataset(&self, path: &str) -> Option<&DatasetSlot>;

    /// Look up a dataset for modification
    fn dataset_mut(&mut self, path: &str) -> Option<&mut DatasetSlot>;
}

/// A time series with its sample data and optional timestamps
#[derive(Debug)]
pub struct TimeSeries {
    /// Object name, unique within its parent
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Free-form comments
    pub comments: String,
    /// Unit of measurement of `data`
    pub unit: String,
    /// Scale factor from stored values to `unit`
    pub conversion: f64,
    /// Offset added after scaling
    pub offset: f64,
    /// Smallest meaningful difference between values, -1 when unknown
    pub resolution: f64,
    /// Time of the first sample, in seconds
    pub starting_time: Option<f64>,
    /// Sampling rate in Hz
    pub rate: Option<f64>,
    /// Samples; the first axis is time
    pub data: DatasetSlot,
    /// Sample times, when the series is not regularly sampled
    pub timestamps: Option<DatasetSlot>,
}

impl TimeSeries {
    /// A regularly sampled series starting at t = 0.
    pub fn new(
        name: impl Into<String>,
        data: impl ArraySource + 'static,
        unit: impl Into<String>,
        rate: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: "no description".to_string(),
            comments: "no comments".to_string(),
            unit: unit.into(),
            conversion: 1.0,
            offset: 0.0,
            resolution: -1.0,
            starting_time: Some(0.0),
            rate: Some(rate),
            data: DatasetSlot::new(data),
            timestamps: None,
        }
    }

    /// Replace the sampling rate with explicit timestamps.
    pub fn with_timestamps(mut self, timestamps: impl ArraySource + 'static) -> Self {
        self.rate = None;
        self.starting_time = None;
        self.timestamps = Some(DatasetSlot::new(timestamps));
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn slot(&self, field: &str) -> Option<&DatasetSlot> {
        match field {
            "data" => Some(&self.data),
            "timestamps" => self.timestamps.as_ref(),
            _ => None,
        }
    }

    fn slot_mut(&mut self, field: &str) -> Option<&mut DatasetSlot> {
        match field {
            "data" => Some(&mut self.data),
            "timestamps" => self.timestamps.as_mut(),
            _ => None,
        }
    }

    fn push_paths(&self, prefix: &str, paths: &mut Vec<String>) {
        paths.push(format!("{prefix}/{}/data", self.name));
        if self.timestamps.is_some() {
            paths.push(format!("{prefix}/{}/timestamps", self.name));
        }
    }
}

/// A named group of processed time series
#[derive(Debug)]
pub struct ProcessingModule {
    /// Module name, e.g. `ecephys`
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Series by name
    pub data_interfaces: BTreeMap<String, TimeSeries>,
}

impl ProcessingModule {
    /// Add a series, replacing any series of the same name.
    pub fn add(&mut self, series: TimeSeries) {
        if self.data_interfaces.contains_key(&series.name) {
            warn!("Replacing '{}' in processing module '{}'", series.name, self.name);
        }
        self.data_interfaces.insert(series.name.clone(), series);
    }
}

/// Recording hardware
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    /// Device name
    pub name: String,
    /// Free-form description
    pub description: String,
}

/// A group of electrodes on one device
#[derive(Debug, Clone, PartialEq)]
pub struct ElectrodeGroup {
    /// Group name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Brain location of the group
    pub location: String,
    /// Name of the device the group belongs to
    pub device: String,
}

/// Root NWB container
#[derive(Debug)]
pub struct NwbFile {
    /// Description of the recording session
    pub session_description: String,
    /// Unique identifier of the file
    pub identifier: String,
    /// Start of the recording session
    pub session_start_time: DateTime<Utc>,
    /// People who performed the experiment
    pub experimenter: Vec<String>,
    /// Lab where the experiment was performed
    pub lab: Option<String>,
    /// Institution where the experiment was performed
    pub institution: Option<String>,
    /// General description of the experiment
    pub experiment_description: Option<String>,
    /// Lab-specific session ID
    pub session_id: Option<String>,
    /// Recording devices, by name
    pub devices: BTreeMap<String, Device>,
    /// Electrode groups, by name
    pub electrode_groups: BTreeMap<String, ElectrodeGroup>,
    acquisition: BTreeMap<String, TimeSeries>,
    processing: BTreeMap<String, ProcessingModule>,
}

impl NwbFile {
    /// Empty file with a random identifier.
    pub fn new(session_description: impl Into<String>, session_start_time: DateTime<Utc>) -> Self {
        Self {
            session_description: session_description.into(),
            identifier: Uuid::new_v4().to_string(),
            session_start_time,
            experimenter: Vec::new(),
            lab: None,
            institution: None,
            experiment_description: None,
            session_id: None,
            devices: BTreeMap::new(),
            electrode_groups: BTreeMap::new(),
            acquisition: BTreeMap::new(),
            processing: BTreeMap::new(),
        }
    }

    /// Add an acquired series, replacing any series of the same name.
    pub fn add_acquisition(&mut self, series: TimeSeries) {
        if self.acquisition.contains_key(&series.name) {
            warn!("Replacing acquisition '{}'", series.name);
        }
        self.acquisition.insert(series.name.clone(), series);
    }

    /// Add a device, replacing any device of the same name.
    pub fn add_device(&mut self, device: Device) {
        self.devices.insert(device.name.clone(), device);
    }

    /// Add an electrode group, replacing any group of the same name.
    pub fn add_electrode_group(&mut self, group: ElectrodeGroup) {
        if !self.devices.contains_key(&group.device) {
            warn!(
                "Electrode group '{}' refers to unknown device '{}'",
                group.name, group.device
            );
        }
        self.electrode_groups.insert(group.name.clone(), group);
    }

    /// Acquired series by name
    pub fn acquisition(&self) -> &BTreeMap<String, TimeSeries> {
        &self.acquisition
    }

    /// Get or create a processing module.
    pub fn processing_module(
        &mut self,
        name: &str,
        description: impl Into<String>,
    ) -> &mut ProcessingModule {
        self.processing
            .entry(name.to_string())
            .or_insert_with(|| ProcessingModule {
                name: name.to_string(),
                description: description.into(),
                data_interfaces: BTreeMap::new(),
            })
    }

    /// Processing modules by name
    pub fn processing(&self) -> &BTreeMap<String, ProcessingModule> {
        &self.processing
    }
}

impl DatasetContainer for NwbFile {
    fn dataset_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for series in self.acquisition.values() {
            series.push_paths("acquisition", &mut paths);
        }
        for module in self.processing.values() {
            let prefix = format!("processing/{}", module.name);
            for series in module.data_interfaces.values() {
                series.push_paths(&prefix, &mut paths);
            }
        }
        paths
    }

    fn dataset(&self, path: &str) -> Option<&DatasetSlot> {
        let parts: Vec<&str> = path.split('/').collect();
        match parts.as_slice() {
            ["acquisition", name, field] => self.acquisition.get(*name)?.slot(field),
            ["processing", module, name, field] => self
                .processing
                .get(*module)?
                .data_interfaces
                .get(*name)?
                .slot(field),
            _ => None,
        }
    }

    fn dataset_mut(&mut self, path: &str) -> Option<&mut DatasetSlot> {
        let parts: Vec<&str> = path.split('/').collect();
        match parts.as_slice() {
            ["acquisition", name, field] => self.acquisition.get_mut(*name)?.slot_mut(field),
            ["processing", module, name, field] => self
                .processing
                .get_mut(*module)?
                .data_interfaces
                .get_mut(*name)?
                .slot_mut(field),
            _ => None,
        }
    }
}
