//! CLI command definitions and handlers.

pub mod config;
pub mod crop;

use clap::{Parser, Subcommand};

/// Facecrop - Face-centered square portrait cropping
#[derive(Parser)]
#[command(name = "facecrop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared crop arguments (paths, pipeline settings, flags).
    #[command(flatten)]
    pub crop: crop::CropArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Crop images around their most prominent face
    Crop(crop::CropArgs),
    /// Print the effective configuration as TOML
    Config,
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every image was cropped.
    Success = 0,
    /// At least one image failed.
    SomeFailed = 1,
    /// Usage or runtime error.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
