//! Built-in layered layout engine.
//!
//! Four phases, all deterministic for a given graph:
//!
//! 1. Cycle removal: the edges of a greedy feedback arc set are reversed.
//! 2. Ranking: longest path from the sources.
//! 3. Ordering: edges spanning several ranks are split into one virtual
//!    segment per rank, then alternating barycenter sweeps keep the order
//!    with the fewest crossings seen.
//! 4. Coordinates: nodes of a rank are laid side by side, each rank centred
//!    on the widest one. Virtual nodes take no space.
//!
//! Ties are always broken by node index, which is the order callers added
//! nodes in.

use log::{debug, trace};
use petgraph::{
    algo::greedy_feedback_arc_set,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use strata_core::{
    diagram::LayoutDirection,
    geometry::{Point, Size},
};

use crate::{
    config::SpacingProfile,
    error::LayoutError,
    layout::{LayoutGraph, engines::LayoutEngine},
};

/// The layered layout engine
pub struct Engine {
    /// Upper bound on crossing reduction iterations
    ordering_passes: usize,
}

impl Engine {
    /// Create a new layered layout engine
    pub fn new() -> Self {
        Self { ordering_passes: 4 }
    }

    /// Set the maximum number of crossing reduction iterations
    pub fn set_ordering_passes(&mut self, passes: usize) -> &mut Self {
        self.ordering_passes = passes;
        self
    }
}

impl LayoutEngine for Engine {
    fn name(&self) -> &'static str {
        "layered"
    }

    fn centers(
        &self,
        graph: &LayoutGraph,
        spacing: SpacingProfile,
        direction: LayoutDirection,
    ) -> Result<Vec<Point>, LayoutError> {
        graph.validate()?;
        if graph.is_empty() {
            return Ok(Vec::new());
        }

        let n = graph.node_count();
        let adjacency = Adjacency::acyclic(graph);
        let ranks = assign_ranks(&adjacency)?;
        let (layered, ranks) = adjacency.split_long_edges(&ranks);
        let mut rank_order = build_rank_buckets(&ranks);
        let crossings = minimize_crossings(&mut rank_order, &layered, self.ordering_passes);

        debug!(
            nodes = n,
            virtual_nodes = layered.node_count() - n,
            ranks = rank_order.len(),
            crossings;
            "Layered ordering complete"
        );

        for nodes in &mut rank_order {
            nodes.retain(|&v| v < n);
        }

        Ok(assign_centers(&rank_order, graph.sizes(), spacing, direction))
    }
}

/// Successor and predecessor lists of an acyclic version of a graph.
#[derive(Debug)]
struct Adjacency {
    succ: Vec<Vec<usize>>,
    pred: Vec<Vec<usize>>,
}

impl Adjacency {
    /// Builds the adjacency of `graph` with self loops dropped, duplicate
    /// edges merged and a feedback arc set reversed.
    fn acyclic(graph: &LayoutGraph) -> Self {
        let n = graph.node_count();
        let mut dag: DiGraph<(), ()> = DiGraph::with_capacity(n, graph.edges().len());
        for _ in 0..n {
            dag.add_node(());
        }
        for &(source, target) in graph.edges() {
            if source != target {
                dag.update_edge(NodeIndex::new(source), NodeIndex::new(target), ());
            }
        }

        let mut reversed = vec![false; dag.edge_count()];
        for edge in greedy_feedback_arc_set(&dag) {
            reversed[edge.id().index()] = true;
        }

        let mut succ = vec![Vec::new(); n];
        let mut pred = vec![Vec::new(); n];
        for edge in dag.edge_references() {
            let (mut u, mut v) = (edge.source().index(), edge.target().index());
            if reversed[edge.id().index()] {
                trace!(source = u, target = v; "Reversing edge to break a cycle");
                std::mem::swap(&mut u, &mut v);
            }
            succ[u].push(v);
            pred[v].push(u);
        }
        for list in succ.iter_mut().chain(pred.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        Self { succ, pred }
    }

    /// Replaces every edge spanning more than one rank by a chain of
    /// virtual nodes, one per intermediate rank.
    ///
    /// Virtual nodes are numbered after the real ones. Returns the new
    /// adjacency and the rank of every node, virtual ones included.
    fn split_long_edges(&self, ranks: &[usize]) -> (Self, Vec<usize>) {
        let n = self.node_count();
        let mut ranks = ranks.to_vec();
        let mut succ = vec![Vec::new(); n];
        let mut pred = vec![Vec::new(); n];

        for u in 0..n {
            for &v in &self.succ[u] {
                let mut previous = u;
                for rank in ranks[u] + 1..ranks[v] {
                    let dummy = succ.len();
                    succ.push(Vec::new());
                    pred.push(Vec::new());
                    ranks.push(rank);
                    succ[previous].push(dummy);
                    pred[dummy].push(previous);
                    previous = dummy;
                }
                succ[previous].push(v);
                pred[v].push(previous);
            }
        }
        for list in succ.iter_mut().chain(pred.iter_mut()) {
            list.sort_unstable();
        }

        (Self { succ, pred }, ranks)
    }

    fn node_count(&self) -> usize {
        self.succ.len()
    }
}

/// Longest-path ranking: sources get rank 0, every other node one more than
/// its highest-ranked predecessor.
fn assign_ranks(adjacency: &Adjacency) -> Result<Vec<usize>, LayoutError> {
    let n = adjacency.node_count();
    let mut in_degree: Vec<usize> = adjacency.pred.iter().map(Vec::len).collect();
    let mut queue: Vec<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut ranks = vec![0usize; n];

    let mut head = 0;
    while head < queue.len() {
        let u = queue[head];
        head += 1;
        for &v in &adjacency.succ[u] {
            ranks[v] = ranks[v].max(ranks[u] + 1);
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push(v);
            }
        }
    }

    if queue.len() < n {
        let stuck = (0..n).find(|&v| in_degree[v] > 0).unwrap_or(0);
        return Err(LayoutError::Cyclic(stuck));
    }
    Ok(ranks)
}

/// Groups node indices by rank, keeping index order inside each rank.
pub(super) fn build_rank_buckets(ranks: &[usize]) -> Vec<Vec<usize>> {
    let rank_count = ranks.iter().copied().max().map_or(0, |max| max + 1);
    let mut buckets = vec![Vec::new(); rank_count];
    for (v, &r) in ranks.iter().enumerate() {
        buckets[r].push(v);
    }
    buckets
}

/// Position of every node within its rank.
fn positions_in_rank(rank_order: &[Vec<usize>], n: usize) -> Vec<usize> {
    let mut positions = vec![0usize; n];
    for nodes in rank_order {
        for (i, &v) in nodes.iter().enumerate() {
            positions[v] = i;
        }
    }
    positions
}

/// Reorders `nodes` by the mean position of their neighbours.
///
/// Nodes with no neighbour keep their current position as their key, and
/// equal keys keep their current relative order.
fn barycenter_sort(nodes: &mut [usize], neighbors: &[Vec<usize>], positions: &[usize]) {
    let mut scored: Vec<(usize, f64)> = nodes
        .iter()
        .enumerate()
        .map(|(current, &v)| {
            let adjacent = &neighbors[v];
            let key = if adjacent.is_empty() {
                current as f64
            } else {
                adjacent.iter().map(|&u| positions[u] as f64).sum::<f64>() / adjacent.len() as f64
            };
            (v, key)
        })
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    for (slot, (v, _)) in nodes.iter_mut().zip(scored) {
        *slot = v;
    }
}

/// Counts crossings between two adjacent ranks.
fn count_crossings(upper: &[usize], lower: &[usize], adjacency: &Adjacency) -> usize {
    let mut lower_pos = vec![usize::MAX; adjacency.node_count()];
    for (i, &v) in lower.iter().enumerate() {
        lower_pos[v] = i;
    }

    let mut segments: Vec<(usize, usize)> = Vec::new();
    for (i, &u) in upper.iter().enumerate() {
        for &v in &adjacency.succ[u] {
            if lower_pos[v] != usize::MAX {
                segments.push((i, lower_pos[v]));
            }
        }
    }

    let mut crossings = 0;
    for (k, &(a1, b1)) in segments.iter().enumerate() {
        for &(a2, b2) in &segments[k + 1..] {
            if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                crossings += 1;
            }
        }
    }
    crossings
}

fn total_crossings(rank_order: &[Vec<usize>], adjacency: &Adjacency) -> usize {
    rank_order
        .windows(2)
        .map(|pair| count_crossings(&pair[0], &pair[1], adjacency))
        .sum()
}

/// Iterated barycenter crossing reduction.
///
/// Runs at most `passes` down-and-up sweeps, stops at the first sweep that
/// does not improve, and leaves the best order found in `rank_order`.
/// Returns the resulting crossing count.
fn minimize_crossings(rank_order: &mut Vec<Vec<usize>>, adjacency: &Adjacency, passes: usize) -> usize {
    let n = adjacency.node_count();
    let mut best_crossings = total_crossings(rank_order, adjacency);
    if rank_order.len() <= 1 || best_crossings == 0 {
        return best_crossings;
    }
    let mut best_order = rank_order.clone();

    for pass in 0..passes {
        for r in 1..rank_order.len() {
            let positions = positions_in_rank(rank_order, n);
            barycenter_sort(&mut rank_order[r], &adjacency.pred, &positions);
        }
        for r in (0..rank_order.len() - 1).rev() {
            let positions = positions_in_rank(rank_order, n);
            barycenter_sort(&mut rank_order[r], &adjacency.succ, &positions);
        }

        let crossings = total_crossings(rank_order, adjacency);
        trace!(pass, crossings; "Barycenter sweep");
        if crossings < best_crossings {
            best_crossings = crossings;
            best_order.clone_from(rank_order);
            if crossings == 0 {
                break;
            }
        } else {
            break;
        }
    }

    *rank_order = best_order;
    best_crossings
}

/// Turns ranks and in-rank order into node centers.
///
/// Coordinates are computed for a top-to-bottom flow and transposed for
/// left-to-right. Each rank is as thick as its largest node; the first rank
/// and the leftmost slot of the widest rank touch zero.
pub(super) fn assign_centers(
    rank_order: &[Vec<usize>],
    sizes: &[Size],
    spacing: SpacingProfile,
    direction: LayoutDirection,
) -> Vec<Point> {
    let oriented: Vec<Size> = sizes
        .iter()
        .map(|&size| match direction {
            LayoutDirection::TopToBottom => size,
            LayoutDirection::LeftToRight => size.transpose(),
        })
        .collect();

    let extents: Vec<f32> = rank_order
        .iter()
        .map(|nodes| {
            let widths: f32 = nodes.iter().map(|&v| oriented[v].width()).sum();
            let gaps = nodes.len().saturating_sub(1) as f32 * spacing.node_spacing();
            widths + gaps
        })
        .collect();
    let widest = extents.iter().copied().fold(0.0_f32, f32::max);

    let mut centers = vec![Point::default(); sizes.len()];
    let mut rank_start = 0.0_f32;
    for (nodes, extent) in rank_order.iter().zip(&extents) {
        let thickness = nodes
            .iter()
            .map(|&v| oriented[v].height())
            .fold(0.0_f32, f32::max);
        let mut cursor = (widest - extent) / 2.0;
        for &v in nodes {
            let size = oriented[v];
            let center = Point::new(cursor + size.width() / 2.0, rank_start + thickness / 2.0);
            centers[v] = match direction {
                LayoutDirection::TopToBottom => center,
                LayoutDirection::LeftToRight => center.transpose(),
            };
            cursor += size.width() + spacing.node_spacing();
        }
        rank_start += thickness + spacing.rank_spacing();
    }
    centers
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn graph(sizes: &[(f32, f32)], edges: &[(usize, usize)]) -> LayoutGraph {
        let mut graph = LayoutGraph::new();
        for &(w, h) in sizes {
            graph.add_node(Size::new(w, h));
        }
        for &(s, t) in edges {
            graph.add_edge(s, t);
        }
        graph
    }

    fn ranks_of(graph: &LayoutGraph) -> Vec<usize> {
        assign_ranks(&Adjacency::acyclic(graph)).unwrap()
    }

    fn spacing() -> SpacingProfile {
        SpacingProfile::new(50.0, 80.0)
    }

    #[test]
    fn test_longest_path_ranks() {
        // 0 -> 1 -> 2 and a shortcut 0 -> 2.
        let graph = graph(&[(10.0, 10.0); 4], &[(0, 1), (1, 2), (0, 2)]);
        assert_eq!(ranks_of(&graph), [0, 1, 2, 0]);
    }

    #[test]
    fn test_cycle_is_broken() {
        let graph = graph(&[(10.0, 10.0); 3], &[(0, 1), (1, 2), (2, 0)]);
        let mut ranks = ranks_of(&graph);
        ranks.sort_unstable();
        assert_eq!(ranks, [0, 1, 2]);
    }

    #[test]
    fn test_self_loops_and_duplicates_are_ignored() {
        let graph = graph(&[(10.0, 10.0); 2], &[(0, 0), (0, 1), (0, 1)]);
        let adjacency = Adjacency::acyclic(&graph);
        assert_eq!(adjacency.succ, [vec![1], vec![]]);
        assert_eq!(assign_ranks(&adjacency).unwrap(), [0, 1]);
    }

    #[test]
    fn test_mutual_edges_collapse() {
        let graph = graph(&[(10.0, 10.0); 2], &[(0, 1), (1, 0)]);
        let ranks = ranks_of(&graph);
        assert_ne!(ranks[0], ranks[1]);
    }

    #[test]
    fn test_crossings_are_removed() {
        // 0 and 1 on top, 2 and 3 below, wired crosswise.
        let graph = graph(&[(10.0, 10.0); 4], &[(0, 3), (1, 2)]);
        let adjacency = Adjacency::acyclic(&graph);
        let mut rank_order = build_rank_buckets(&assign_ranks(&adjacency).unwrap());

        assert_eq!(total_crossings(&rank_order, &adjacency), 1);
        assert_eq!(minimize_crossings(&mut rank_order, &adjacency, 4), 0);
        assert_eq!(rank_order, [vec![0, 1], vec![3, 2]]);
    }

    #[test]
    fn test_long_edges_take_part_in_crossings() {
        // Two chains 0 -> 1 -> 2 and 3 -> 4 -> 5 joined crosswise by edges
        // skipping the middle rank.
        let graph = graph(
            &[(10.0, 10.0); 6],
            &[(0, 1), (1, 2), (3, 4), (4, 5), (0, 5), (3, 2)],
        );
        let adjacency = Adjacency::acyclic(&graph);
        let ranks = assign_ranks(&adjacency).unwrap();
        let (layered, ranks) = adjacency.split_long_edges(&ranks);

        assert_eq!(ranks, [0, 1, 2, 0, 1, 2, 1, 1]);
        assert_eq!(layered.succ[0], [1, 6]);
        assert_eq!(layered.succ[6], [5]);
        assert_eq!(layered.pred[2], [1, 7]);

        let mut rank_order = build_rank_buckets(&ranks);
        assert_eq!(total_crossings(&rank_order, &layered), 3);
        // The two chains and their cross links form a ring that needs one crossing.
        assert_eq!(minimize_crossings(&mut rank_order, &layered, 4), 1);
        assert_eq!(total_crossings(&rank_order, &layered), 1);
    }

    #[test]
    fn test_virtual_nodes_are_not_placed() {
        let graph = graph(&[(10.0, 10.0); 3], &[(0, 1), (1, 2), (0, 2)]);
        let centers = Engine::new()
            .centers(&graph, spacing(), LayoutDirection::TopToBottom)
            .unwrap();

        assert_eq!(centers.len(), 3);
        // One node per rank, all on the same axis.
        assert!(centers.iter().all(|c| c.x() == centers[0].x()));
    }

    #[test]
    fn test_zero_passes_keep_initial_order() {
        let graph = graph(&[(10.0, 10.0); 4], &[(0, 3), (1, 2)]);
        let adjacency = Adjacency::acyclic(&graph);
        let mut rank_order = build_rank_buckets(&assign_ranks(&adjacency).unwrap());

        assert_eq!(minimize_crossings(&mut rank_order, &adjacency, 0), 1);
        assert_eq!(rank_order, [vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_ranks_are_centred_on_widest() {
        // Root above two children of different widths.
        let graph = graph(
            &[(100.0, 40.0), (100.0, 60.0), (200.0, 20.0)],
            &[(0, 1), (0, 2)],
        );
        let centers = Engine::new()
            .centers(&graph, spacing(), LayoutDirection::TopToBottom)
            .unwrap();

        // Widest rank: 100 + 50 + 200 = 350.
        assert_approx_eq!(f32, centers[0].x(), 175.0);
        assert_approx_eq!(f32, centers[0].y(), 20.0);
        assert_approx_eq!(f32, centers[1].x(), 50.0);
        assert_approx_eq!(f32, centers[2].x(), 250.0);
        // Second rank is 60 thick and starts at 40 + 80.
        assert_approx_eq!(f32, centers[1].y(), 150.0);
        assert_approx_eq!(f32, centers[2].y(), 150.0);
    }

    #[test]
    fn test_left_to_right_transposes() {
        let graph = graph(&[(100.0, 40.0), (120.0, 60.0)], &[(0, 1)]);
        let centers = Engine::new()
            .centers(&graph, spacing(), LayoutDirection::LeftToRight)
            .unwrap();

        assert_approx_eq!(f32, centers[0].x(), 50.0);
        assert_approx_eq!(f32, centers[1].x(), 100.0 + 80.0 + 60.0);
        assert_approx_eq!(f32, centers[0].y(), 30.0);
        assert_approx_eq!(f32, centers[1].y(), 30.0);
    }

    #[test]
    fn test_rejects_malformed_graph() {
        let graph = graph(&[(10.0, 10.0)], &[(0, 3)]);
        let result = Engine::new().centers(&graph, spacing(), LayoutDirection::TopToBottom);
        assert!(matches!(result, Err(LayoutError::UnknownNode { node: 3, .. })));
    }

    proptest! {
        #[test]
        fn prop_every_graph_is_placed_deterministically(
            n in 1usize..12,
            raw_edges in prop::collection::vec((0usize..12, 0usize..12), 0..30),
        ) {
            let edges: Vec<(usize, usize)> = raw_edges
                .into_iter()
                .map(|(s, t)| (s % n, t % n))
                .collect();
            let graph = graph(&vec![(80.0, 40.0); n], &edges);
            let engine = Engine::new();

            let first = engine.centers(&graph, spacing(), LayoutDirection::TopToBottom).unwrap();
            let second = engine.centers(&graph, spacing(), LayoutDirection::TopToBottom).unwrap();

            prop_assert_eq!(first.len(), n);
            prop_assert!(first.iter().all(|p| p.is_finite()));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_acyclic_edges_point_down(
            n in 1usize..12,
            raw_edges in prop::collection::vec((0usize..12, 0usize..12), 0..30),
        ) {
            // Only forward index edges, so the graph is already acyclic.
            let edges: Vec<(usize, usize)> = raw_edges
                .into_iter()
                .map(|(s, t)| (s % n, t % n))
                .filter(|(s, t)| s < t)
                .collect();
            let graph = graph(&vec![(80.0, 40.0); n], &edges);
            let ranks = ranks_of(&graph);

            for (s, t) in edges {
                prop_assert!(ranks[s] < ranks[t]);
            }
        }
    }
}
