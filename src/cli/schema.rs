use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use nwbconv::registry::{assemble_root_schema, ecephys_schema, ophys_schema};

/// Print or save the root metadata schema
pub fn run(output: Option<PathBuf>) -> Result<()> {
    let root = assemble_root_schema([
        ("Ecephys", ecephys_schema(None)?),
        ("Ophys", ophys_schema()?),
    ])
    .context("Failed to assemble the root metadata schema")?;
    let text = serde_json::to_string_pretty(&root.to_value())?;

    match output {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write schema to {}", path.display()))?;
            info!("Schema written to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
