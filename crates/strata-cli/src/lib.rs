//! CLI logic for the Strata class diagram tool.
//!
//! Reads a project snapshot, optionally the diagram produced by a previous
//! run, and writes the regenerated diagram as JSON.

mod args;
mod config;
mod error;

pub use args::Args;
pub use config::ConfigError;
pub use error::CliError;

use std::{fs, path::Path};

use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use strata::{
    DiagramSynthesizer,
    diagram::Diagram,
    identifier::FileId,
    model::Project,
    scope::{ScopeMode, ScopeRequest},
};

/// Run the Strata CLI application
///
/// # Errors
///
/// Returns [`CliError`] for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed project or diagram JSON
/// - Unknown scope modes
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing project snapshot"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let mode: ScopeMode = args
        .mode
        .parse()
        .map_err(|message: &str| CliError::InvalidArgument {
            name: "mode",
            message: format!("{message}: `{}`", args.mode),
        })?;

    let project: Project = read_json(&args.input)?;
    let previous = args
        .previous
        .as_ref()
        .map(read_json::<Diagram>)
        .transpose()?
        .map(Diagram::into_state);

    let request = scope_request(mode, args.active.as_deref(), &project);

    let synthesizer = DiagramSynthesizer::new(app_config);
    let regeneration = synthesizer.regenerate(&project, &request, previous.as_ref());

    let (diagram, diff) = regeneration.into_parts();
    info!(
        nodes = diagram.nodes().len(),
        edges = diagram.edges().len(),
        added = diff.nodes().added().len(),
        removed = diff.nodes().removed().len(),
        significant = diff.has_significant_changes();
        "Diagram regenerated"
    );
    if let Some(bounds) = diagram.bounds() {
        debug!(width = bounds.width(), height = bounds.height(); "Diagram extent");
    }

    let json =
        serde_json::to_string_pretty(&diagram).map_err(CliError::Serialize)?;
    fs::write(&args.output, json).map_err(|source| CliError::Write {
        path: args.output.clone().into(),
        source,
    })?;

    info!(output_file = args.output; "Diagram exported successfully");

    Ok(())
}

/// Builds the scope request; file scope without an explicit active file uses
/// the first file of the snapshot.
///
/// An active file missing from the snapshot is kept, so the diagram comes out
/// empty, but it is reported.
fn scope_request(mode: ScopeMode, active: Option<&str>, project: &Project) -> ScopeRequest {
    let active = match (mode, active) {
        (ScopeMode::Project, _) => None,
        (ScopeMode::File, Some(active)) => {
            let active = FileId::from(active);
            if project.file(active).is_none() {
                warn!(active_file:% = active; "Active file is not part of the project");
            }
            Some(active)
        }
        (ScopeMode::File, None) => {
            let first = project.files().first().map(|file| file.id());
            if let Some(first) = first {
                info!(active_file:% = first; "No active file given, using first file");
            }
            first
        }
    };
    ScopeRequest::new(mode, active)
}

fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, CliError> {
    let path = path.as_ref();
    debug!(path = path.display().to_string(); "Reading JSON");

    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}
