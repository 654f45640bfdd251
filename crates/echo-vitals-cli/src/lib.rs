//! EchoVitals CLI library.
//!
//! Command definitions and execution logic for the `echo-vitals` binary.

use clap::{Parser, Subcommand};

pub mod analyze;

/// EchoVitals: acoustic FMCW vital-sign sensing from a finished recording.
#[derive(Parser, Debug)]
#[command(name = "echo-vitals", version, about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a recorded session into breathing and heart-rate estimates
    Analyze(analyze::AnalyzeArgs),

    /// Print version information
    Version,
}
