use serde_json::json;

use crate::schema::{get_base_schema, SchemaNode};

const OPTIONAL_TEXT_FIELDS: &[(&str, &str)] = &[
    ("experiment_description", "general description of the experiment"),
    ("session_id", "lab-specific ID for the session"),
    ("institution", "institution(s) where experiment is performed"),
    ("notes", "Notes about the experiment."),
    (
        "pharmacology",
        "Description of drugs used, including how and when they were administered. Anesthesia(s), \
         painkiller(s), etc., plus dosage, concentration, etc.",
    ),
    ("protocol", "Experimental protocol, if applicable. E.g., include IACUC protocol"),
    (
        "related_publications",
        "Publication information.PMID, DOI, URL, etc. If multiple, concatenate together and \
         describe which is which. such as PMID, DOI, URL, etc",
    ),
    (
        "slices",
        "Description of slices, including information about preparation thickness, orientation, \
         temperature and bath solution",
    ),
    ("source_script", "Script file used to create this NWB file."),
    ("source_script_file_name", "Name of the source_script file"),
    ("data_collection", "Notes about data collection and analysis."),
    (
        "surgery",
        "Narrative description about surgery/surgeries, including date(s) and who performed \
         surgery.",
    ),
    (
        "virus",
        "Information about virus(es) used in experiments, including virus ID, source, date made, \
         injection location, volume, etc.",
    ),
    ("stimulus_notes", "Notes about stimuli, such as how and where presented."),
    ("lab", "lab where experiment was performed"),
];

/// The authored `NWBFile` section schema.
///
/// Only `session_description`, `identifier` and `session_start_time` are
/// required; everything else is optional descriptive text.
pub fn get_schema_for_nwbfile() -> SchemaNode {
    let mut schema = get_base_schema(Some("pynwb.file.NWBFile"));
    for field in ["session_description", "identifier", "session_start_time"] {
        schema.require(field);
    }

    schema.insert_property(
        "session_description",
        json!({
            "type": "string",
            "format": "long",
            "description": "a description of the session where this data was generated"
        }),
    );
    schema.insert_property(
        "identifier",
        json!({"type": "string", "description": "a unique text identifier for the file"}),
    );
    schema.insert_property(
        "session_start_time",
        json!({
            "type": "string",
            "description": "the start date and time of the recording session",
            "format": "date-time"
        }),
    );
    schema.insert_property(
        "experimenter",
        json!({
            "type": "array",
            "items": {"type": "string", "title": "experimenter"},
            "description": "name of person who performed experiment"
        }),
    );
    for (name, description) in OPTIONAL_TEXT_FIELDS {
        schema.insert_property(*name, json!({"type": "string", "description": description}));
    }
    schema
}
