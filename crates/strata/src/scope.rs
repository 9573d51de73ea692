//! Scope resolution: which entities a diagram shows.
//!
//! A [`ScopeRequest`] is supplied on every regeneration; nothing about a
//! previous scope choice is remembered here.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use indexmap::IndexSet;
use log::{debug, trace};
use petgraph::visit::Dfs;
use serde::{Deserialize, Serialize};

use strata_core::{
    identifier::FileId,
    model::{EntityDescriptor, Project},
};

use crate::imports::ImportGraph;

/// Whether a diagram covers one file and its dependencies or the whole project.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeMode {
    /// The active file plus everything it transitively imports (default).
    #[default]
    File,
    /// Every file of the project.
    Project,
}

impl FromStr for ScopeMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "project" => Ok(Self::Project),
            _ => Err("Unsupported scope mode"),
        }
    }
}

impl From<ScopeMode> for &'static str {
    fn from(val: ScopeMode) -> Self {
        match val {
            ScopeMode::File => "file",
            ScopeMode::Project => "project",
        }
    }
}

impl Display for ScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Scope selection for one regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeRequest {
    mode: ScopeMode,
    active_file: Option<FileId>,
}

impl ScopeRequest {
    pub fn new(mode: ScopeMode, active_file: Option<FileId>) -> Self {
        Self { mode, active_file }
    }

    /// File view centred on `active_file`.
    pub fn file(active_file: impl Into<FileId>) -> Self {
        Self::new(ScopeMode::File, Some(active_file.into()))
    }

    /// Whole-project view.
    pub fn project() -> Self {
        Self::new(ScopeMode::Project, None)
    }

    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    pub fn active_file(&self) -> Option<FileId> {
        self.active_file
    }
}

/// Returns the active file plus every file it transitively imports.
///
/// Only the imports direction is followed, so files importing the active file
/// are not included. The set is empty when the active file is not part of the
/// graph. Each file is visited once, so cyclic imports terminate.
pub fn reachable_files(graph: &ImportGraph, active_file: FileId) -> IndexSet<FileId> {
    let Some(start) = graph.node_index(active_file) else {
        debug!(file:% = active_file; "Active file is not part of the project");
        return IndexSet::new();
    };

    let imports = graph.graph();
    let mut dfs = Dfs::new(imports, start);
    let mut reachable = IndexSet::new();
    while let Some(idx) = dfs.next(imports) {
        trace!(file:% = imports[idx]; "File reachable");
        reachable.insert(imports[idx]);
    }
    reachable
}

/// Selects the entities visible under `request`.
///
/// Entities keep project order: by file, then by declaration within the file.
/// A file-mode request with no or an unknown active file resolves to an empty
/// set, which is a valid result rather than an error.
pub fn resolve<'p>(
    project: &'p Project,
    graph: &ImportGraph,
    request: &ScopeRequest,
) -> Vec<&'p EntityDescriptor> {
    let entities: Vec<&EntityDescriptor> = match request.mode() {
        ScopeMode::Project => project.entities().collect(),
        ScopeMode::File => {
            let Some(active_file) = request.active_file() else {
                debug!("File scope requested without an active file");
                return Vec::new();
            };
            let files = reachable_files(graph, active_file);
            project
                .files()
                .iter()
                .filter(|file| files.contains(&file.id()))
                .flat_map(|file| file.entities())
                .collect()
        }
    };

    debug!(mode:% = request.mode(), entities = entities.len(); "Scope resolved");

    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::model::{ClassDescriptor, SourceFile};

    fn file(name: &str, entities: &[&str], imports: &[&str]) -> SourceFile {
        let mut file = SourceFile::new(name);
        for entity in entities {
            file = file.with_entity(ClassDescriptor::new(name, *entity));
        }
        for import in imports {
            file = file.with_import(*import);
        }
        file
    }

    fn names(entities: &[&EntityDescriptor]) -> Vec<String> {
        entities.iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn test_scope_mode_from_str() {
        assert_eq!("file".parse::<ScopeMode>(), Ok(ScopeMode::File));
        assert_eq!("project".parse::<ScopeMode>(), Ok(ScopeMode::Project));
        assert!("workspace".parse::<ScopeMode>().is_err());
        assert_eq!(ScopeMode::Project.to_string(), "project");
    }

    #[test]
    fn test_import_chain_is_followed() {
        let project = Project::new(vec![
            file("a.ts", &["A"], &["b.ts"]),
            file("b.ts", &["B"], &["c.ts"]),
            file("c.ts", &["C"], &[]),
        ]);
        let graph = ImportGraph::build(&project);

        let files = reachable_files(&graph, FileId::new("a.ts"));
        let expected: IndexSet<FileId> = ["a.ts", "b.ts", "c.ts"]
            .into_iter()
            .map(FileId::new)
            .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn test_dependents_are_not_included() {
        let project = Project::new(vec![
            file("a.ts", &["A"], &["b.ts"]),
            file("b.ts", &["B"], &[]),
        ]);
        let graph = ImportGraph::build(&project);

        let entities = resolve(&project, &graph, &ScopeRequest::file("b.ts"));
        assert_eq!(names(&entities), ["B"]);
    }

    #[test]
    fn test_cyclic_imports_terminate() {
        let project = Project::new(vec![
            file("a.ts", &["A"], &["b.ts"]),
            file("b.ts", &["B"], &["c.ts"]),
            file("c.ts", &["C"], &["a.ts"]),
            file("d.ts", &["D"], &[]),
        ]);
        let graph = ImportGraph::build(&project);

        let entities = resolve(&project, &graph, &ScopeRequest::file("b.ts"));
        assert_eq!(names(&entities), ["A", "B", "C"]);
    }

    #[test]
    fn test_file_without_imports_shows_own_entities() {
        let project = Project::new(vec![
            file("a.ts", &["A1", "A2"], &[]),
            file("b.ts", &["B"], &[]),
        ]);
        let graph = ImportGraph::build(&project);

        let entities = resolve(&project, &graph, &ScopeRequest::file("a.ts"));
        assert_eq!(names(&entities), ["A1", "A2"]);
    }

    #[test]
    fn test_project_mode_ignores_active_file() {
        let project = Project::new(vec![
            file("a.ts", &["A"], &[]),
            file("b.ts", &["B"], &[]),
        ]);
        let graph = ImportGraph::build(&project);

        let request = ScopeRequest::new(ScopeMode::Project, Some(FileId::new("a.ts")));
        assert_eq!(names(&resolve(&project, &graph, &request)), ["A", "B"]);
        assert_eq!(names(&resolve(&project, &graph, &ScopeRequest::project())), ["A", "B"]);
    }

    #[test]
    fn test_missing_active_file_is_empty() {
        let project = Project::new(vec![file("a.ts", &["A"], &[])]);
        let graph = ImportGraph::build(&project);

        assert!(resolve(&project, &graph, &ScopeRequest::file("gone.ts")).is_empty());
        let no_file = ScopeRequest::new(ScopeMode::File, None);
        assert!(resolve(&project, &graph, &no_file).is_empty());
    }
}
