//! Orchestrates several data interfaces into one NWB file.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use log::{debug, info, warn};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::backend::{
    configure_backend, get_default_backend_configuration_with_budget, BackendConfiguration,
    BackendKind, ChunkingBudget, DatasetContainer, DatasetSlot, NwbFile,
};
use crate::registry::{assemble_root_schema, deep_merge, validate_metadata};
use crate::schema::{get_input_schema, unroot_schema, SchemaNode};
use crate::writer::{write_nwbfile, WriterStats};

use super::{DataInterface, InterfaceError};

/// Metadata every conversion starts from.
///
/// The identifier is a fresh UUID on every call.
pub fn default_nwbfile_metadata() -> Value {
    json!({
        "NWBFile": {
            "session_description": "no description",
            "identifier": Uuid::new_v4().to_string()
        }
    })
}

/// Parse `session_start_time`: RFC 3339, or a naive timestamp taken as UTC.
pub fn parse_session_start_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Configure every dataset of `nwbfile` and write it.
///
/// Settings already attached for `backend` are kept; every other dataset
/// gets the default configuration for `budget`.
pub fn configure_and_write(
    nwbfile: &mut NwbFile,
    path: impl AsRef<Path>,
    backend: BackendKind,
    budget: &ChunkingBudget,
) -> Result<WriterStats, InterfaceError> {
    let mut configuration = get_default_backend_configuration_with_budget(nwbfile, backend, budget);
    for dataset_path in nwbfile.dataset_paths() {
        let existing = nwbfile.dataset(&dataset_path).and_then(DatasetSlot::io_settings);
        let Some(existing) = existing else {
            continue;
        };
        if existing.backend == backend {
            debug!("Keeping caller configuration of '{}'", dataset_path);
            configuration.insert(existing.clone());
        } else {
            warn!(
                "'{}' was configured for {}, using {} defaults",
                dataset_path, existing.backend, backend
            );
        }
    }
    configure_backend(nwbfile, &configuration)?;
    Ok(write_nwbfile(nwbfile, path, backend)?)
}

/// Named data interfaces converted together
#[derive(Default)]
pub struct Converter {
    interfaces: Vec<(String, Box<dyn DataInterface>)>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("interfaces", &self.interface_names())
            .finish()
    }
}

impl Converter {
    /// Converter without interfaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interface under `name`.
    pub fn add_interface(
        &mut self,
        name: impl Into<String>,
        interface: impl DataInterface + 'static,
    ) -> Result<(), InterfaceError> {
        let name = name.into();
        if self.interfaces.iter().any(|(existing, _)| *existing == name) {
            return Err(InterfaceError::DuplicateInterface(name));
        }
        self.interfaces.push((name, Box::new(interface)));
        Ok(())
    }

    /// Interface names in registration order
    pub fn interface_names(&self) -> Vec<&str> {
        self.interfaces.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn combined_schema<F>(
        &self,
        title: &str,
        description: &str,
        section: F,
    ) -> Result<SchemaNode, InterfaceError>
    where
        F: Fn(&dyn DataInterface) -> Result<SchemaNode, crate::schema::SchemaError>,
    {
        let mut schema = get_input_schema();
        schema.title = Some(title.to_string());
        schema.description = Some(description.to_string());
        for (name, interface) in &self.interfaces {
            let sub = section(interface.as_ref())?;
            schema.insert_property(name.clone(), unroot_schema(&sub.to_value()));
        }
        Ok(schema)
    }

    /// Source schema with one subsection per interface.
    pub fn get_source_schema(&self) -> Result<SchemaNode, InterfaceError> {
        self.combined_schema(
            "Source data schema",
            "Schema for the source data, files and directories",
            |interface| interface.get_source_schema(),
        )
    }

    /// Conversion options schema with one subsection per interface.
    pub fn get_conversion_options_schema(&self) -> Result<SchemaNode, InterfaceError> {
        self.combined_schema(
            "Conversion options schema",
            "Schema for the conversion options",
            |interface| interface.get_conversion_options_schema(),
        )
    }

    /// Deep-merged metadata schemas of all interfaces.
    ///
    /// Root `required` lists are unioned rather than replaced.
    pub fn get_metadata_schema(&self) -> Result<Value, InterfaceError> {
        let mut merged = assemble_root_schema(Vec::<(String, SchemaNode)>::new())?.to_value();
        let mut required: Vec<Value> = Vec::new();
        for (_, interface) in &self.interfaces {
            let schema = interface.get_metadata_schema()?.to_value();
            for field in schema.get("required").and_then(Value::as_array).into_iter().flatten() {
                if !required.contains(field) {
                    required.push(field.clone());
                }
            }
            merged = deep_merge(&merged, &schema);
        }
        if let Some(root) = merged.as_object_mut() {
            let mut all = vec![json!("NWBFile")];
            all.extend(required.into_iter().filter(|f| f != "NWBFile"));
            root.insert("required".into(), Value::Array(all));
        }
        Ok(merged)
    }

    /// Default NWBFile metadata deep-merged with every interface's metadata.
    pub fn get_metadata(&self) -> Value {
        self.interfaces
            .iter()
            .fold(default_nwbfile_metadata(), |merged, (_, interface)| {
                deep_merge(&merged, &interface.get_metadata())
            })
    }

    /// Validate a metadata document against [`Converter::get_metadata_schema`].
    pub fn validate_metadata(&self, metadata: &Value) -> Result<(), InterfaceError> {
        Ok(validate_metadata(metadata, &self.get_metadata_schema()?)?)
    }

    /// Build an empty file from the `NWBFile` section of `metadata`.
    pub fn create_nwbfile(&self, metadata: &Value) -> Result<NwbFile, InterfaceError> {
        let section = metadata.get("NWBFile").unwrap_or(&Value::Null);
        let field = |key: &str| section.get(key).and_then(Value::as_str).map(str::to_string);

        let start = field("session_start_time").ok_or_else(|| InterfaceError::InvalidMetadata {
            path: "$.NWBFile.session_start_time".to_string(),
            reason: "missing".to_string(),
        })?;
        let start = parse_session_start_time(&start).ok_or_else(|| InterfaceError::InvalidMetadata {
            path: "$.NWBFile.session_start_time".to_string(),
            reason: format!("'{start}' is not a date-time"),
        })?;

        let description =
            field("session_description").unwrap_or_else(|| "no description".to_string());
        let mut nwbfile = NwbFile::new(description, start);
        if let Some(identifier) = field("identifier") {
            nwbfile.identifier = identifier;
        }
        nwbfile.experimenter = match section.get("experimenter") {
            Some(Value::String(name)) => vec![name.clone()],
            Some(Value::Array(names)) => {
                names.iter().filter_map(Value::as_str).map(str::to_string).collect()
            }
            _ => Vec::new(),
        };
        nwbfile.lab = field("lab");
        nwbfile.institution = field("institution");
        nwbfile.experiment_description = field("experiment_description");
        nwbfile.session_id = field("session_id");
        Ok(nwbfile)
    }

    /// Let every interface add its objects to `nwbfile`.
    ///
    /// `conversion_options` maps interface names to their options; missing
    /// entries mean all defaults.
    pub fn add_to_nwbfile(
        &self,
        nwbfile: &mut NwbFile,
        metadata: &Value,
        conversion_options: &Value,
    ) -> Result<(), InterfaceError> {
        let empty = Value::Object(Map::new());
        for (name, interface) in &self.interfaces {
            let options = conversion_options.get(name).unwrap_or(&empty);
            debug!("Adding interface '{}'", name);
            interface.add_to_nwbfile(nwbfile, metadata, options)?;
        }
        Ok(())
    }

    /// Validate `metadata` (or the default metadata), build the file, add
    /// every interface, configure it and write it.
    ///
    /// Caller overrides in `configuration` replace the defaults of the
    /// datasets they name.
    pub fn run_conversion(
        &self,
        path: impl AsRef<Path>,
        backend: BackendKind,
        metadata: Option<&Value>,
        conversion_options: &Value,
        configuration: Option<&BackendConfiguration>,
        budget: &ChunkingBudget,
    ) -> Result<WriterStats, InterfaceError> {
        let defaults;
        let metadata = match metadata {
            Some(metadata) => metadata,
            None => {
                defaults = self.get_metadata();
                &defaults
            }
        };
        self.validate_metadata(metadata)?;

        let mut nwbfile = self.create_nwbfile(metadata)?;
        self.add_to_nwbfile(&mut nwbfile, metadata, conversion_options)?;

        if let Some(overrides) = configuration {
            let mut merged =
                get_default_backend_configuration_with_budget(&nwbfile, backend, budget);
            for dataset in overrides.dataset_configurations.values() {
                merged.insert(dataset.clone());
            }
            configure_backend(&mut nwbfile, &merged)?;
        }
        let stats = configure_and_write(&mut nwbfile, path.as_ref(), backend, budget)?;
        info!("Conversion to {} finished: {}", path.as_ref().display(), stats);
        Ok(stats)
    }
}
