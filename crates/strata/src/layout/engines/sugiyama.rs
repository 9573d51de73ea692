//! Sugiyama layout engine backed by the `rust-sugiyama` crate.
//!
//! `rust-sugiyama` lays out each connected component on its own and knows
//! nothing about node sizes. Its coordinates are only used to recover the
//! rank and in-rank order of every node; components are then packed side by
//! side, nodes without edges are appended to the first rank, and the sizes
//! and spacing are applied by the same coordinate pass the layered engine
//! uses.

use indexmap::IndexSet;
use log::{debug, trace};
use rust_sugiyama::configure::Config;

use strata_core::{diagram::LayoutDirection, geometry::Point};

use crate::{
    config::SpacingProfile,
    error::LayoutError,
    layout::{
        LayoutGraph,
        engines::{LayoutEngine, layered},
    },
};

/// Distance between vertices in `rust-sugiyama`'s own coordinate space.
const VERTEX_SPACING: f64 = 10.0;

/// The Sugiyama layout engine
pub struct Engine {
    vertex_spacing: f64,
}

impl Engine {
    /// Create a new Sugiyama layout engine
    pub fn new() -> Self {
        Self {
            vertex_spacing: VERTEX_SPACING,
        }
    }

    /// Converts the graph's edges to `rust-sugiyama` input, without self
    /// loops and duplicates.
    fn sugiyama_edges(graph: &LayoutGraph) -> Result<Vec<(u32, u32)>, LayoutError> {
        let mut edges = IndexSet::new();
        for &(source, target) in graph.edges() {
            if source == target {
                continue;
            }
            let (Ok(s), Ok(t)) = (u32::try_from(source), u32::try_from(target)) else {
                return Err(LayoutError::Engine(format!(
                    "Node index out of range for rust-sugiyama: {source} -> {target}"
                )));
            };
            edges.insert((s, t));
        }
        Ok(edges.into_iter().collect())
    }

    /// Recovers rank buckets from one component's coordinates.
    ///
    /// Equal y values share a rank, ranks are ordered so that most edges
    /// point to a higher rank, and nodes within a rank are ordered by x.
    fn component_ranks(
        &self,
        coords: &[(usize, (f64, f64))],
        edges: &[(u32, u32)],
        node_count: usize,
    ) -> Vec<Vec<usize>> {
        let mut vertices: Vec<(usize, f64, f64)> = coords
            .iter()
            .filter_map(|&(id, (x, y))| {
                if id < node_count && x.is_finite() && y.is_finite() {
                    Some((id, x, y))
                } else {
                    debug!(id; "Ignoring rust-sugiyama vertex outside the graph");
                    None
                }
            })
            .collect();
        vertices.sort_by(|a, b| a.2.total_cmp(&b.2).then(a.1.total_cmp(&b.1)).then(a.0.cmp(&b.0)));

        let tolerance = self.vertex_spacing * 1e-3;
        let mut buckets: Vec<Vec<usize>> = Vec::new();
        let mut rank_y: Option<f64> = None;
        for (id, _, y) in vertices {
            match rank_y {
                Some(current) if (y - current).abs() <= tolerance => {}
                _ => {
                    buckets.push(Vec::new());
                    rank_y = Some(y);
                }
            }
            if let Some(bucket) = buckets.last_mut() {
                bucket.push(id);
            }
        }

        let mut rank_of = vec![usize::MAX; node_count];
        for (r, nodes) in buckets.iter().enumerate() {
            for &v in nodes {
                rank_of[v] = r;
            }
        }
        let (mut down, mut up) = (0usize, 0usize);
        for &(s, t) in edges {
            let (rs, rt) = (rank_of[s as usize], rank_of[t as usize]);
            if rs == usize::MAX || rt == usize::MAX {
                continue;
            }
            if rs < rt {
                down += 1;
            } else if rs > rt {
                up += 1;
            }
        }
        if up > down {
            trace!(down, up; "Flipping rust-sugiyama ranks");
            buckets.reverse();
        }
        buckets
    }
}

impl LayoutEngine for Engine {
    fn name(&self) -> &'static str {
        "sugiyama"
    }

    fn centers(
        &self,
        graph: &LayoutGraph,
        spacing: SpacingProfile,
        direction: LayoutDirection,
    ) -> Result<Vec<Point>, LayoutError> {
        graph.validate()?;
        let n = graph.node_count();
        if n == 0 {
            return Ok(Vec::new());
        }

        let edges = Self::sugiyama_edges(graph)?;
        let mut rank_order: Vec<Vec<usize>> = Vec::new();
        let mut placed = vec![false; n];

        if !edges.is_empty() {
            debug!(nodes = n, edges = edges.len(); "Applying rust-sugiyama");

            let config = Config {
                minimum_length: 1,
                vertex_spacing: self.vertex_spacing,
                ..Default::default()
            };
            let layouts = rust_sugiyama::from_edges(&edges, &config);
            if layouts.is_empty() {
                return Err(LayoutError::Engine(
                    "rust-sugiyama returned empty layout results".to_string(),
                ));
            }

            for (coords, _, _) in &layouts {
                let component = self.component_ranks(coords, &edges, n);
                for (r, nodes) in component.into_iter().enumerate() {
                    if rank_order.len() <= r {
                        rank_order.push(Vec::new());
                    }
                    for v in nodes {
                        if !placed[v] {
                            placed[v] = true;
                            rank_order[r].push(v);
                        }
                    }
                }
            }
        }

        // Nodes rust-sugiyama never saw: no edges at all.
        if rank_order.is_empty() {
            rank_order.push(Vec::new());
        }
        for v in 0..n {
            if !placed[v] {
                rank_order[0].push(v);
            }
        }

        Ok(layered::assign_centers(
            &rank_order,
            graph.sizes(),
            spacing,
            direction,
        ))
    }
}
