//! Error type for the Strata CLI.

use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;

/// Failures of a CLI run.
///
/// Synthesis itself cannot fail; every variant belongs to reading inputs or
/// writing the output.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Failed to read {path}")]
    #[diagnostic(code(strata::io::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}")]
    #[diagnostic(code(strata::io::write))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {path}")]
    #[diagnostic(
        code(strata::json),
        help("Project snapshots hold a `files` array; diagrams hold `nodes` and `edges`")
    )]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize diagram")]
    #[diagnostic(code(strata::json::serialize))]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid argument `{name}`: {message}")]
    #[diagnostic(code(strata::args))]
    InvalidArgument { name: &'static str, message: String },
}
