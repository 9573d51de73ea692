//! Command-line argument definitions for the Strata CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the project snapshot, the scope of the
//! diagram, the previous diagram state, configuration and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Strata class diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the project snapshot (JSON)
    #[arg(help = "Path to the project snapshot")]
    pub input: String,

    /// Path to the output diagram file (JSON)
    #[arg(short, long, default_value = "diagram.json")]
    pub output: String,

    /// Diagram scope (file, project)
    #[arg(short, long, default_value = "file")]
    pub mode: String,

    /// Active file for file scope; defaults to the first file of the snapshot
    #[arg(short, long)]
    pub active: Option<String>,

    /// Previously produced diagram whose node positions are kept
    #[arg(short, long)]
    pub previous: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
