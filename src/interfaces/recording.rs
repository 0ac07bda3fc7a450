//! Extracellular recording interface.

use std::rc::Rc;

use log::{debug, info};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::backend::{ArraySource, Device, ElectrodeGroup, FrameSlice, NwbFile, TimeSeries};
use crate::registry::{assemble_root_schema, ecephys_schema, validate_metadata, DEFAULT_ES_KEY};
use crate::schema::{
    get_schema_from_method_signature, Annotation, DefaultValue, MethodSignature, ParameterDefault,
    SchemaError, SchemaNode, SignatureParameter,
};

use super::{DataInterface, InterfaceError};

/// Frames kept by a stub conversion.
pub const STUB_FRAMES: usize = 100;

/// Name of the device created when metadata names none.
pub const DEFAULT_DEVICE: &str = "DeviceEcephys";

/// Constructor of [`RecordingInterface`]; extra keys go to the extractor.
pub static RECORDING_INTERFACE_INIT: MethodSignature = MethodSignature {
    owner: "RecordingInterface.__init__",
    params: &[
        SignatureParameter::receiver(),
        SignatureParameter::new(
            "verbose",
            Annotation::Bool,
            ParameterDefault::Value(DefaultValue::Bool(true)),
        ),
        SignatureParameter::new(
            "es_key",
            Annotation::Str,
            ParameterDefault::Value(DefaultValue::Str(DEFAULT_ES_KEY)),
        ),
        SignatureParameter::var_keyword("source_data"),
    ],
};

/// Conversion entry point of [`RecordingInterface`].
pub static RECORDING_RUN_CONVERSION: MethodSignature = MethodSignature {
    owner: "RecordingInterface.run_conversion",
    params: &[
        SignatureParameter::receiver(),
        SignatureParameter::new(
            "nwbfile_path",
            Annotation::Optional(&Annotation::FilePath),
            ParameterDefault::Null,
        ),
        SignatureParameter::new("nwbfile", Annotation::Other("NWBFile"), ParameterDefault::Null),
        SignatureParameter::new(
            "metadata",
            Annotation::Optional(&Annotation::Dict),
            ParameterDefault::Null,
        ),
        SignatureParameter::new(
            "overwrite",
            Annotation::Bool,
            ParameterDefault::Value(DefaultValue::Bool(false)),
        ),
        SignatureParameter::new(
            "stub_test",
            Annotation::Bool,
            ParameterDefault::Value(DefaultValue::Bool(false)),
        ),
        SignatureParameter::new(
            "starting_time",
            Annotation::Optional(&Annotation::Float),
            ParameterDefault::Null,
        ),
        SignatureParameter::new(
            "write_as",
            Annotation::Str,
            ParameterDefault::Value(DefaultValue::Str("raw")),
        ),
        SignatureParameter::new(
            "write_electrical_series",
            Annotation::Bool,
            ParameterDefault::Value(DefaultValue::Bool(true)),
        ),
    ],
};

/// Arguments of the conversion entry point handled by the converter itself.
const CONVERTER_ARGUMENTS: [&str; 4] = ["nwbfile_path", "nwbfile", "metadata", "overwrite"];

/// Interface options from the source data
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecordingOptions {
    /// Log progress at info level
    pub verbose: bool,
    /// Key of the `ElectricalSeries` entry in the `Ecephys` metadata
    pub es_key: String,
}

impl Default for RecordingOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            es_key: DEFAULT_ES_KEY.to_string(),
        }
    }
}

/// Where the traces end up in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteAs {
    /// `acquisition`
    #[default]
    Raw,
    /// `processing/ecephys`, low-pass filtered
    Lfp,
    /// `processing/ecephys`
    Processed,
}

/// Options of one recording conversion
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecordingConversionOptions {
    /// Keep only the first [`STUB_FRAMES`] frames
    pub stub_test: bool,
    /// Override the start time of the series, in seconds
    pub starting_time: Option<f64>,
    /// Destination of the traces
    pub write_as: WriteAs,
    /// Write the traces at all; devices and groups are always written
    pub write_electrical_series: bool,
}

impl Default for RecordingConversionOptions {
    fn default() -> Self {
        Self {
            stub_test: false,
            starting_time: None,
            write_as: WriteAs::Raw,
            write_electrical_series: true,
        }
    }
}

/// A multichannel voltage recording: traces of shape (frames, channels).
#[derive(Debug, Clone)]
pub struct Recording {
    /// Sample data, frames along axis 0
    pub traces: Rc<dyn ArraySource>,
    /// Sampling rate in Hz
    pub sampling_frequency: f64,
    /// Electrode group of every channel, if known
    pub channel_groups: Option<Vec<String>>,
}

impl Recording {
    /// Recording without channel group information.
    pub fn new(traces: impl ArraySource + 'static, sampling_frequency: f64) -> Self {
        Self {
            traces: Rc::new(traces),
            sampling_frequency,
            channel_groups: None,
        }
    }

    /// Attach the group of every channel.
    pub fn with_channel_groups<S: Into<String>>(
        mut self,
        groups: impl IntoIterator<Item = S>,
    ) -> Self {
        self.channel_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Distinct channel groups in first-seen order.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        match &self.channel_groups {
            Some(groups) => {
                for group in groups {
                    if !names.contains(group) {
                        names.push(group.clone());
                    }
                }
            }
            None => names.push("ElectrodeGroup".to_string()),
        }
        names
    }
}

/// Converts a [`Recording`] into an `ElectricalSeries` plus its devices
/// and electrode groups.
#[derive(Debug, Clone)]
pub struct RecordingInterface {
    recording: Recording,
    options: RecordingOptions,
}

impl RecordingInterface {
    /// Interface with explicit options.
    pub fn new(recording: Recording, options: RecordingOptions) -> Self {
        Self { recording, options }
    }

    /// Interface whose options are read from a source-data document.
    ///
    /// The document is validated against the source schema first.
    pub fn from_source_data(
        recording: Recording,
        source_data: &Value,
    ) -> Result<Self, InterfaceError> {
        let schema = get_schema_from_method_signature(&RECORDING_INTERFACE_INIT, &[])?;
        validate_metadata(source_data, &schema.to_value())?;
        let options = RecordingOptions::deserialize(source_data)?;
        Ok(Self::new(recording, options))
    }

    /// Key of the `ElectricalSeries` metadata entry
    pub fn es_key(&self) -> &str {
        &self.options.es_key
    }

    /// The wrapped recording
    pub fn recording(&self) -> &Recording {
        &self.recording
    }
}

fn text<'a>(entry: &'a Value, key: &str, default: &'a str) -> &'a str {
    entry.get(key).and_then(Value::as_str).unwrap_or(default)
}

fn entries<'a>(section: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    section
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

impl DataInterface for RecordingInterface {
    fn get_source_schema(&self) -> Result<SchemaNode, SchemaError> {
        get_schema_from_method_signature(&RECORDING_INTERFACE_INIT, &[])
    }

    fn get_metadata_schema(&self) -> Result<SchemaNode, SchemaError> {
        assemble_root_schema([("Ecephys", ecephys_schema(Some(self.es_key()))?)])
    }

    fn get_metadata(&self) -> Value {
        let groups: Vec<Value> = self
            .recording
            .group_names()
            .into_iter()
            .map(|name| {
                json!({
                    "name": name,
                    "description": "no description",
                    "location": "unknown",
                    "device": DEFAULT_DEVICE
                })
            })
            .collect();

        let mut ecephys = Map::new();
        ecephys.insert(
            "Device".into(),
            json!([{"name": DEFAULT_DEVICE, "description": "no description"}]),
        );
        ecephys.insert("ElectrodeGroup".into(), Value::Array(groups));
        ecephys.insert(
            self.es_key().to_string(),
            json!({
                "name": self.es_key(),
                "description": format!("Acquisition traces for the {}.", self.es_key())
            }),
        );
        json!({ "Ecephys": ecephys })
    }

    fn get_conversion_options_schema(&self) -> Result<SchemaNode, SchemaError> {
        get_schema_from_method_signature(&RECORDING_RUN_CONVERSION, &CONVERTER_ARGUMENTS)
    }

    fn add_to_nwbfile(
        &self,
        nwbfile: &mut NwbFile,
        metadata: &Value,
        conversion_options: &Value,
    ) -> Result<(), InterfaceError> {
        validate_metadata(conversion_options, &self.get_conversion_options_schema()?.to_value())?;
        let options = RecordingConversionOptions::deserialize(conversion_options)?;
        let ecephys = metadata.get("Ecephys").unwrap_or(&Value::Null);

        for device in entries(ecephys, "Device") {
            nwbfile.add_device(Device {
                name: text(device, "name", DEFAULT_DEVICE).to_string(),
                description: text(device, "description", "no description").to_string(),
            });
        }
        for group in entries(ecephys, "ElectrodeGroup") {
            nwbfile.add_electrode_group(ElectrodeGroup {
                name: text(group, "name", "ElectrodeGroup").to_string(),
                description: text(group, "description", "no description").to_string(),
                location: text(group, "location", "unknown").to_string(),
                device: text(group, "device", DEFAULT_DEVICE).to_string(),
            });
        }

        if !options.write_electrical_series {
            debug!("Skipping the {} traces", self.es_key());
            return Ok(());
        }

        let series_metadata = ecephys.get(self.es_key()).unwrap_or(&Value::Null);
        let default_description = format!("Acquisition traces for the {}.", self.es_key());
        let name = text(series_metadata, "name", self.es_key());
        let description = text(series_metadata, "description", &default_description);

        let traces = &self.recording.traces;
        let rate = self.recording.sampling_frequency;
        let series = if options.stub_test {
            TimeSeries::new(name, FrameSlice::new(Rc::clone(traces), STUB_FRAMES), "volts", rate)
        } else {
            TimeSeries::new(name, Rc::clone(traces), "volts", rate)
        };
        let mut series = series.with_description(description);
        if let Some(start) = options.starting_time {
            series.starting_time = Some(start);
        }

        let shape = series.data.source().shape().to_vec();
        match options.write_as {
            WriteAs::Raw => nwbfile.add_acquisition(series),
            WriteAs::Lfp | WriteAs::Processed => nwbfile
                .processing_module("ecephys", "Processed extracellular electrophysiology data.")
                .add(series),
        }
        if self.options.verbose {
            info!("Added {} with shape {:?} ({:?})", name, shape, options.write_as);
        }
        Ok(())
    }
}
