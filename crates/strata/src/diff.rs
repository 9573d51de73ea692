//! Comparison and merging of successive diagram states.
//!
//! Regeneration recomputes every node, including its position. The merge
//! step puts back the previous position of every node that survives, so that
//! positions adjusted by the user are kept while new nodes take their fresh
//! layout position.
//!
//! # Example
//!
//! ```
//! # use strata::diff::{diff, merge_positions};
//! # use strata_core::{diagram::DiagramNode, geometry::{Point, Size}, identifier::EntityId, model::EntityKind};
//! let node = |name: &str, x: f32| {
//!     DiagramNode::new(
//!         EntityId::new("a.ts", name),
//!         EntityKind::Class,
//!         name.to_string(),
//!         None,
//!         Vec::new(),
//!         Size::new(160.0, 60.0),
//!     )
//!     .with_position(Point::new(x, 0.0))
//! };
//!
//! let previous = vec![node("A", 500.0)];
//! let fresh = vec![node("A", 0.0), node("B", 200.0)];
//!
//! let changes = diff(&previous, &fresh, &[], &[]);
//! assert!(changes.has_significant_changes());
//!
//! let merged = merge_positions(&previous, fresh);
//! assert_eq!(merged[0].position(), Point::new(500.0, 0.0));
//! assert_eq!(merged[1].position(), Point::new(200.0, 0.0));
//! ```

use std::hash::Hash;

use indexmap::IndexMap;
use log::debug;

use strata_core::{
    diagram::{DiagramEdge, DiagramNode},
    identifier::EntityId,
};

/// Classification of the ids of one element kind between two states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdDiff<K> {
    added: Vec<K>,
    removed: Vec<K>,
    unchanged: Vec<K>,
    changed: Vec<K>,
}

impl<K> Default for IdDiff<K> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            unchanged: Vec::new(),
            changed: Vec::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> IdDiff<K> {
    /// Classifies `previous` and `new` elements by key.
    ///
    /// Keys present in both states are `unchanged` when `same` holds for the
    /// two elements and `changed` otherwise. Output follows `new` order, with
    /// removed keys in `previous` order.
    fn classify<T>(
        previous: &[T],
        new: &[T],
        key: impl Fn(&T) -> K,
        same: impl Fn(&T, &T) -> bool,
    ) -> Self {
        let before: IndexMap<K, &T> = previous.iter().map(|e| (key(e), e)).collect();
        let after: IndexMap<K, &T> = new.iter().map(|e| (key(e), e)).collect();

        let mut diff = Self::default();
        for (k, element) in &after {
            match before.get(k) {
                None => diff.added.push(k.clone()),
                Some(old) if same(*old, *element) => diff.unchanged.push(k.clone()),
                Some(_) => diff.changed.push(k.clone()),
            }
        }
        diff.removed = before
            .keys()
            .filter(|k| !after.contains_key(*k))
            .cloned()
            .collect();
        diff
    }
}

impl<K> IdDiff<K> {
    /// Ids only in the new state.
    pub fn added(&self) -> &[K] {
        &self.added
    }

    /// Ids only in the previous state.
    pub fn removed(&self) -> &[K] {
        &self.removed
    }

    /// Ids in both states with identical content.
    pub fn unchanged(&self) -> &[K] {
        &self.unchanged
    }

    /// Ids in both states whose content differs (positions aside).
    pub fn changed(&self) -> &[K] {
        &self.changed
    }

    /// Returns true when both states hold the same set of ids.
    pub fn same_ids(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Difference between two diagram states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagramDiff {
    nodes: IdDiff<EntityId>,
    edges: IdDiff<String>,
    significant: bool,
}

impl DiagramDiff {
    pub fn nodes(&self) -> &IdDiff<EntityId> {
        &self.nodes
    }

    pub fn edges(&self) -> &IdDiff<String> {
        &self.edges
    }

    /// Returns true when the node count, the edge count or either id set
    /// differs from the previous state.
    ///
    /// Content-only changes (a renamed member, a resized node) are not
    /// significant: they keep the diagram's structure.
    pub fn has_significant_changes(&self) -> bool {
        self.significant
    }
}

/// Compares a previous diagram state with a freshly generated one.
pub fn diff(
    previous_nodes: &[DiagramNode],
    new_nodes: &[DiagramNode],
    previous_edges: &[DiagramEdge],
    new_edges: &[DiagramEdge],
) -> DiagramDiff {
    let nodes = IdDiff::classify(
        previous_nodes,
        new_nodes,
        DiagramNode::id,
        |a: &DiagramNode, b: &DiagramNode| a.same_content(b),
    );
    let edges = IdDiff::classify(
        previous_edges,
        new_edges,
        |edge: &DiagramEdge| edge.id().to_string(),
        |a, b| a == b,
    );

    let significant = previous_nodes.len() != new_nodes.len()
        || previous_edges.len() != new_edges.len()
        || !nodes.same_ids()
        || !edges.same_ids();

    debug!(
        added_nodes = nodes.added().len(),
        removed_nodes = nodes.removed().len(),
        changed_nodes = nodes.changed().len(),
        added_edges = edges.added().len(),
        removed_edges = edges.removed().len(),
        significant;
        "Diagram diff"
    );

    DiagramDiff {
        nodes,
        edges,
        significant,
    }
}

/// Carries previous positions over to `new` nodes.
///
/// Nodes whose id is present in `previous` take the previous position; all
/// others keep their own. Merging against an empty previous state, or a state
/// against itself, returns `new` unchanged.
pub fn merge_positions(previous: &[DiagramNode], new: Vec<DiagramNode>) -> Vec<DiagramNode> {
    let positions: IndexMap<EntityId, _> = previous
        .iter()
        .map(|node| (node.id(), node.position()))
        .collect();

    new.into_iter()
        .map(|mut node| {
            if let Some(&position) = positions.get(&node.id()) {
                node.set_position(position);
            }
            node
        })
        .collect()
}
