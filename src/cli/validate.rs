use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use nwbconv::registry::{
    assemble_root_schema, ecephys_schema, load_dict_from_file, ophys_schema, ValidationReport,
};

/// Validate a metadata file against a schema file or the root schema
pub fn run(metadata: PathBuf, schema: Option<PathBuf>) -> Result<()> {
    info!("Metadata: {}", metadata.display());

    let document = load_dict_from_file(&metadata)
        .with_context(|| format!("Failed to load metadata from {}", metadata.display()))?;
    let schema = match schema {
        Some(path) => {
            info!("Schema: {}", path.display());
            load_dict_from_file(&path)
                .with_context(|| format!("Failed to load schema from {}", path.display()))?
        }
        None => assemble_root_schema([
            ("Ecephys", ecephys_schema(None)?),
            ("Ophys", ophys_schema()?),
        ])?
        .to_value(),
    };

    let report = ValidationReport::build(metadata.display().to_string(), &document, &schema)?;

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}
