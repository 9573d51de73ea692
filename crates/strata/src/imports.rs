//! File-level import dependency graph.
//!
//! Nodes are source files and an edge `a -> b` means that `a` imports
//! something `b` defines. The graph may contain cycles.

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use strata_core::{
    identifier::FileId,
    model::{ImportEdge, Project},
};

/// Directed import graph over the files of a project.
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    graph: DiGraph<FileId, ()>,
    node_map: IndexMap<FileId, NodeIndex>,
}

impl ImportGraph {
    /// Builds the import graph of `project`.
    ///
    /// Every file of the project becomes a node, including files with no
    /// imports. Import targets that name no file of the project (external
    /// libraries) and self imports are skipped, and repeated imports of the
    /// same file collapse to one edge.
    pub fn build(project: &Project) -> Self {
        let mut import_graph = Self::default();

        for file in project.files() {
            import_graph.add_file(file.id());
        }

        for file in project.files() {
            let from = file.id();
            for target in file.imports() {
                let to = FileId::new(target);
                if to == from {
                    trace!(file:% = from; "Skipping self import");
                    continue;
                }
                let (Some(&a), Some(&b)) =
                    (import_graph.node_map.get(&from), import_graph.node_map.get(&to))
                else {
                    trace!(file:% = from, import = target.as_str(); "Skipping unresolved import");
                    continue;
                };
                import_graph.graph.update_edge(a, b, ());
            }
        }

        debug!(
            files = import_graph.file_count(),
            imports = import_graph.import_count();
            "Import graph built"
        );

        import_graph
    }

    fn add_file(&mut self, file: FileId) {
        if !self.node_map.contains_key(&file) {
            let idx = self.graph.add_node(file);
            self.node_map.insert(file, idx);
        }
    }

    /// Returns true if `file` is a node of the graph.
    pub fn contains(&self, file: FileId) -> bool {
        self.node_map.contains_key(&file)
    }

    /// Files directly imported by `file`, in insertion order.
    pub fn dependencies(&self, file: FileId) -> Vec<FileId> {
        let Some(&idx) = self.node_map.get(&file) else {
            return Vec::new();
        };
        // petgraph yields edges most-recent first.
        let mut dependencies: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (edge.id(), self.graph[edge.target()]))
            .collect();
        dependencies.sort_by_key(|(edge, _)| edge.index());
        dependencies.into_iter().map(|(_, file)| file).collect()
    }

    /// All import edges, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = ImportEdge> + '_ {
        self.graph.edge_indices().filter_map(|e| {
            self.graph
                .edge_endpoints(e)
                .map(|(a, b)| ImportEdge::new(self.graph[a], self.graph[b]))
        })
    }

    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn import_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(crate) fn node_index(&self, file: FileId) -> Option<NodeIndex> {
        self.node_map.get(&file).copied()
    }

    pub(crate) fn graph(&self) -> &DiGraph<FileId, ()> {
        &self.graph
    }
}
