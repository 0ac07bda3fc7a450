//! # nwbconv
//!
//! Command-line front end for NWB metadata schemas and dataset layout.
//!
//! ## Usage
//!
//! ```bash
//! # Print the root metadata schema
//! nwbconv schema -o metadata_schema.json
//!
//! # Validate a metadata file
//! nwbconv validate metadata.yml
//!
//! # Default chunking for a 150000 x 384 int16 array
//! nwbconv backend --shape 150000,384 --dtype int16 --backend hdf5
//!
//! # Convert a synthetic recording to a Zarr store
//! nwbconv demo demo_recording.nwb.zarr --backend zarr
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
