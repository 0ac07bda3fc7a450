use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use nwbconv::backend::BackendKind;

mod backend;
mod config;
mod demo;
mod schema;
mod validate;

pub use config::Config;

/// nwbconv - NWB metadata schemas and dataset layout
#[derive(Parser)]
#[command(name = "nwbconv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Storage backend of the output file.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum BackendArg {
    /// Single HDF5 file (needs the hdf5 feature to write)
    #[default]
    Hdf5,
    /// Zarr v2 directory store
    Zarr,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Hdf5 => BackendKind::Hdf5,
            BackendArg::Zarr => BackendKind::Zarr,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the root metadata schema (NWBFile, Ecephys and Ophys sections)
    Schema {
        /// Write the schema to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Validate a JSON or YAML metadata file
    Validate {
        /// Metadata file (.json, .yml or .yaml)
        #[arg(value_name = "METADATA")]
        metadata: PathBuf,

        /// Validate against this schema instead of the built-in root schema
        #[arg(long, value_name = "FILE")]
        schema: Option<PathBuf>,
    },

    /// Show the default chunking and compression for an array
    Backend {
        /// Array shape, comma separated (e.g. 150000,384)
        #[arg(long, value_name = "SHAPE")]
        shape: String,

        /// Element type (e.g. int16, float32)
        #[arg(long, default_value = "int16")]
        dtype: String,

        /// Target backend
        #[arg(short, long, default_value = "hdf5", value_enum)]
        backend: BackendArg,

        /// Load chunking and compression settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Convert a synthetic extracellular recording
    Demo {
        /// Output file (HDF5) or directory (Zarr)
        #[arg(value_name = "OUTPUT", default_value = "demo_recording.nwb.zarr")]
        output: PathBuf,

        /// Target backend
        #[arg(short, long, default_value = "zarr", value_enum)]
        backend: BackendArg,

        /// Number of frames
        #[arg(long, default_value = "30000")]
        frames: usize,

        /// Number of channels
        #[arg(long, default_value = "32")]
        channels: usize,

        /// Write only the first 100 frames
        #[arg(long)]
        stub: bool,

        /// Load chunking and compression settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Schema { output } => schema::run(output),
        Commands::Validate { metadata, schema } => validate::run(metadata, schema),
        Commands::Backend {
            shape,
            dtype,
            backend,
            config,
        } => backend::run(&shape, &dtype, backend.into(), config),
        Commands::Demo {
            output,
            backend,
            frames,
            channels,
            stub,
            config,
        } => demo::run(output, backend.into(), frames, channels, stub, config),
    }
}
