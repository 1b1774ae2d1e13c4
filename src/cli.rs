// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "inertial-camera")]
#[command(about = "Inertial first-person camera viewer", long_about = None)]
pub struct Cli {
    /// JSON file overriding celerity, inertia and default pose
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fly the camera over a reference grid (default)
    View {
        /// Initial window width in logical pixels
        #[arg(long, default_value_t = 1024)]
        width: u32,
        /// Initial window height in logical pixels
        #[arg(long, default_value_t = 768)]
        height: u32,
    },
    /// Replay scripted input headlessly and print one JSON record per frame
    Simulate {
        /// Script file; the built-in hold-then-glide script when omitted
        #[arg(long)]
        script: Option<PathBuf>,
    },
}
