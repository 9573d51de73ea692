//! Strata - incremental class diagram synthesis.
//!
//! Turns the classes and interfaces reported by source parsers into a
//! laid-out class diagram, and keeps node positions stable across repeated
//! regenerations while the source is being edited.
//!
//! The pipeline runs in stages:
//!
//! 1. [`imports`] builds the file import graph.
//! 2. [`scope`] selects the entities of the current view.
//! 3. [`analysis`] infers relationships among those entities.
//! 4. [`generate`] sizes nodes, styles edges and places them through [`layout`].
//! 5. [`diff`] compares with the previous state and carries positions over.
//!
//! Every stage is a pure function of its inputs; the previous diagram state is
//! passed in explicitly by the caller.

pub mod analysis;
pub mod config;
pub mod diff;
pub mod generate;
pub mod imports;
pub mod layout;
pub mod scope;

mod error;

pub use strata_core::{diagram, geometry, identifier, model};

pub use error::{ConfigError, LayoutError};

use log::{debug, info};

use strata_core::{
    diagram::{Diagram, DiagramState},
    model::{EntityDescriptor, Project},
};

use config::AppConfig;
use diff::DiagramDiff;
use generate::DiagramGenerator;
use imports::ImportGraph;
use scope::{ScopeMode, ScopeRequest};

/// Result of one regeneration cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Regeneration {
    diagram: Diagram,
    diff: DiagramDiff,
}

impl Regeneration {
    /// The merged diagram, with surviving nodes at their previous positions.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Differences against the previous state.
    pub fn diff(&self) -> &DiagramDiff {
        &self.diff
    }

    /// Shorthand for [`DiagramDiff::has_significant_changes`].
    pub fn has_significant_changes(&self) -> bool {
        self.diff.has_significant_changes()
    }

    pub fn into_parts(self) -> (Diagram, DiagramDiff) {
        (self.diagram, self.diff)
    }
}

/// Entry point for diagram synthesis.
///
/// Holds configuration only. Scope and previous state are supplied on every
/// call.
///
/// # Examples
///
/// ```
/// use strata::{
///     DiagramSynthesizer,
///     model::{ClassDescriptor, Project, SourceFile},
///     scope::ScopeRequest,
/// };
///
/// let project = Project::new(vec![
///     SourceFile::new("hr.ts")
///         .with_entity(ClassDescriptor::new("hr.ts", "Person"))
///         .with_entity(ClassDescriptor::new("hr.ts", "Employee").with_extends("Person")),
/// ]);
///
/// let synthesizer = DiagramSynthesizer::default();
/// let first = synthesizer.regenerate(&project, &ScopeRequest::file("hr.ts"), None);
/// assert_eq!(first.diagram().nodes().len(), 2);
/// assert_eq!(first.diagram().edges().len(), 1);
///
/// let second = synthesizer.regenerate(
///     &project,
///     &ScopeRequest::file("hr.ts"),
///     Some(first.diagram().state()),
/// );
/// assert!(!second.has_significant_changes());
/// ```
pub struct DiagramSynthesizer {
    config: AppConfig,
    generator: DiagramGenerator,
}

impl DiagramSynthesizer {
    /// Create a new synthesizer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let generator = DiagramGenerator::new(&config);
        Self { config, generator }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Builds the import graph of `project`.
    pub fn import_graph(&self, project: &Project) -> ImportGraph {
        ImportGraph::build(project)
    }

    /// Selects the entities visible under `request`.
    pub fn resolve_scope<'p>(
        &self,
        project: &'p Project,
        imports: &ImportGraph,
        request: &ScopeRequest,
    ) -> Vec<&'p EntityDescriptor> {
        scope::resolve(project, imports, request)
    }

    /// Generates a laid-out diagram for already scoped entities.
    ///
    /// Relationships are inferred over `entities` alone, so no edge can
    /// point outside the scope. `mode` selects the spacing profile.
    pub fn generate(&self, entities: &[&EntityDescriptor], mode: ScopeMode) -> Diagram {
        let relationships = analysis::infer_relationships(entities.iter().copied());
        let spacing = self.config.layout().spacing(mode);
        self.generator.generate(entities, &relationships, spacing)
    }

    /// Runs one full regeneration cycle.
    ///
    /// Builds the import graph, resolves the scope, generates the diagram,
    /// then diffs against `previous` and keeps the previous position of
    /// every surviving node. Without a previous state every node keeps its
    /// fresh layout position.
    pub fn regenerate(
        &self,
        project: &Project,
        request: &ScopeRequest,
        previous: Option<&DiagramState>,
    ) -> Regeneration {
        info!(
            mode:% = request.mode(),
            files = project.files().len();
            "Regenerating diagram"
        );

        let imports = self.import_graph(project);
        let entities = self.resolve_scope(project, &imports, request);
        let diagram = self.generate(&entities, request.mode());

        let empty = DiagramState::default();
        let previous = previous.unwrap_or(&empty);
        let diff = diff::diff(
            previous.nodes(),
            diagram.nodes(),
            previous.edges(),
            diagram.edges(),
        );

        let direction = diagram.layout_direction();
        let (nodes, edges) = diagram.into_state().into_parts();
        let nodes = diff::merge_positions(previous.nodes(), nodes);
        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            significant = diff.has_significant_changes();
            "Regeneration complete"
        );

        Regeneration {
            diagram: Diagram::new(DiagramState::new(nodes, edges), direction),
            diff,
        }
    }
}

impl Default for DiagramSynthesizer {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
