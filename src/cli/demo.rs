use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use log::info;
use serde_json::json;
use std::path::PathBuf;

use nwbconv::backend::{get_default_backend_configuration_with_budget, BackendKind, SyntheticArray};
use nwbconv::interfaces::{Converter, Recording, RecordingInterface, RecordingOptions};

use super::Config;

const SAMPLING_FREQUENCY: f64 = 30_000.0;
const CHANNELS_PER_GROUP: usize = 8;

/// Synthetic traces: a per-channel sine with a slow drift
fn synthetic_recording(frames: usize, channels: usize) -> Recording {
    let traces = SyntheticArray::new(vec![frames, channels], |i: &[usize]| {
        let t = i[0] as f64 / SAMPLING_FREQUENCY;
        let phase = i[1] as f64 * 0.3;
        let value = 200.0 * (2.0 * std::f64::consts::PI * 50.0 * t + phase).sin() + 20.0 * t;
        value as i16
    });
    let groups = (0..channels).map(|c| (c / CHANNELS_PER_GROUP).to_string());
    Recording::new(traces, SAMPLING_FREQUENCY).with_channel_groups(groups)
}

/// Convert a synthetic recording to `output`
pub fn run(
    output: PathBuf,
    backend: BackendKind,
    frames: usize,
    channels: usize,
    stub: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    info!(
        "Demo recording: {} frames x {} channels at {} Hz",
        frames, channels, SAMPLING_FREQUENCY
    );

    let mut converter = Converter::new();
    converter.add_interface(
        "Recording",
        RecordingInterface::new(synthetic_recording(frames, channels), RecordingOptions::default()),
    )?;

    let mut metadata = converter.get_metadata();
    metadata["NWBFile"]["session_description"] = json!("Synthetic extracellular recording");
    metadata["NWBFile"]["session_start_time"] =
        json!(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    let conversion_options = json!({"Recording": {"stub_test": stub}});

    // build the file once to derive the per-dataset overrides from the config
    let overrides = if config.overrides_compression() {
        let mut preview = converter.create_nwbfile(&metadata)?;
        converter.add_to_nwbfile(&mut preview, &metadata, &conversion_options)?;
        let mut configuration =
            get_default_backend_configuration_with_budget(&preview, backend, &config.chunking);
        config.apply(&mut configuration)?;
        Some(configuration)
    } else {
        None
    };

    let stats = converter
        .run_conversion(
            &output,
            backend,
            Some(&metadata),
            &conversion_options,
            overrides.as_ref(),
            &config.chunking,
        )
        .with_context(|| format!("Failed to convert to {}", output.display()))?;

    println!("{}", stats);
    println!("Output: {}", output.display());
    Ok(())
}
