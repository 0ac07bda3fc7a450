use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use std::path::PathBuf;

use nwbconv::backend::{
    get_default_backend_configuration_with_budget, BackendKind, DataType, NwbFile,
    SyntheticArray, TimeSeries,
};

use super::Config;

/// Parse `150000,384` into a shape.
fn parse_shape(shape: &str) -> Result<Vec<usize>> {
    shape
        .split(',')
        .map(|axis| {
            axis.trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid axis length '{}' in shape '{}'", axis, shape))
        })
        .collect()
}

/// Print the default configuration of one array dataset
pub fn run(shape: &str, dtype: &str, backend: BackendKind, config: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    let shape = parse_shape(shape)?;
    let dtype: DataType = dtype.parse().map_err(anyhow::Error::msg)?;

    let mut nwbfile = NwbFile::new("backend preview", Utc::now());
    let data = SyntheticArray::zeros_of(shape, dtype);
    nwbfile.add_acquisition(TimeSeries::new("TimeSeries", data, "n.a.", 1.0));

    let mut configuration =
        get_default_backend_configuration_with_budget(&nwbfile, backend, &config.chunking);
    config.apply(&mut configuration)?;
    if configuration.dataset_configurations.is_empty() {
        info!("Nothing to configure: the array is a scalar or has a zero-length axis");
    }

    println!("{}", configuration);
    Ok(())
}
