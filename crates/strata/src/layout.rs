//! Node placement.
//!
//! The [`Layouter`] runs the configured [`LayoutEngine`] over a
//! [`LayoutGraph`] and turns the engine's node centers into the top-left
//! positions renderers expect. Any engine failure, including a panic, falls
//! back to a row-major grid so that placement itself never fails.

pub mod engines;
mod grid;

use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};

use strata_core::{
    diagram::LayoutDirection,
    geometry::{Point, Size},
};

use crate::{
    config::{LayoutConfig, SpacingProfile},
    error::LayoutError,
};

pub use engines::{EngineBuilder, LayoutEngine};

/// Sized nodes and directed index edges handed to a layout engine.
///
/// Nodes are addressed by their insertion index. An edge `(a, b)` asks for
/// `a` to be ranked before `b`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutGraph {
    sizes: Vec<Size>,
    edges: Vec<(usize, usize)>,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self, size: Size) -> usize {
        self.sizes.push(size);
        self.sizes.len() - 1
    }

    /// Adds a directed edge between two node indices.
    ///
    /// Indices are not checked here; engines reject edges to unknown nodes.
    pub fn add_edge(&mut self, source: usize, target: usize) {
        self.edges.push((source, target));
    }

    pub fn node_count(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn sizes(&self) -> &[Size] {
        &self.sizes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Checks that every edge endpoint names a node and every size is usable.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let count = self.node_count();
        for (edge, &(source, target)) in self.edges.iter().enumerate() {
            for node in [source, target] {
                if node >= count {
                    return Err(LayoutError::UnknownNode { edge, node, count });
                }
            }
        }
        for (node, size) in self.sizes.iter().enumerate() {
            if !size.is_valid() {
                return Err(LayoutError::DegenerateSize {
                    node,
                    width: size.width(),
                    height: size.height(),
                });
            }
        }
        Ok(())
    }
}

/// Top-left node positions produced by a [`Layouter`].
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    positions: Vec<Point>,
    fallback: bool,
}

impl Placement {
    /// One position per node, in node index order.
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn into_positions(self) -> Vec<Point> {
        self.positions
    }

    /// Returns true if the grid fallback produced these positions.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Runs a layout engine with grid fallback.
pub struct Layouter {
    engine: Box<dyn LayoutEngine>,
    direction: LayoutDirection,
    grid_spacing: f32,
}

impl Layouter {
    /// Creates a layouter for the algorithm and direction named by `config`.
    pub fn new(config: &LayoutConfig) -> Self {
        let engine = EngineBuilder::new()
            .with_ordering_passes(config.ordering_passes())
            .build(config.algorithm());
        Self::with_engine(engine, config.direction(), config.grid_spacing())
    }

    /// Creates a layouter around an arbitrary engine.
    pub fn with_engine(
        engine: Box<dyn LayoutEngine>,
        direction: LayoutDirection,
        grid_spacing: f32,
    ) -> Self {
        Self {
            engine,
            direction,
            grid_spacing,
        }
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Places every node of `graph`.
    ///
    /// Always returns exactly one finite position per node.
    pub fn place(&self, graph: &LayoutGraph, spacing: SpacingProfile) -> Placement {
        if graph.is_empty() {
            return Placement {
                positions: Vec::new(),
                fallback: false,
            };
        }

        match self.run_engine(graph, spacing) {
            Ok(centers) => {
                let positions = centers
                    .into_iter()
                    .zip(graph.sizes())
                    .map(|(center, &size)| center.to_bounds(size).min_point())
                    .collect();
                debug!(
                    nodes = graph.node_count(),
                    edges = graph.edges().len(),
                    engine = self.engine.name();
                    "Layout calculated"
                );
                Placement {
                    positions,
                    fallback: false,
                }
            }
            Err(err) => {
                warn!(
                    err:% = err,
                    engine = self.engine.name(),
                    nodes = graph.node_count();
                    "Layout engine failed, falling back to grid layout"
                );
                Placement {
                    positions: grid::positions(graph.sizes(), self.grid_spacing),
                    fallback: true,
                }
            }
        }
    }

    fn run_engine(
        &self,
        graph: &LayoutGraph,
        spacing: SpacingProfile,
    ) -> Result<Vec<Point>, LayoutError> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.engine.centers(graph, spacing, self.direction)
        }));

        let centers = match result {
            Ok(centers) => centers?,
            Err(payload) => {
                let message = if let Some(message) = payload.downcast_ref::<String>() {
                    message.clone()
                } else if let Some(message) = payload.downcast_ref::<&str>() {
                    (*message).to_string()
                } else {
                    "unknown panic payload".to_string()
                };
                return Err(LayoutError::Panicked(message));
            }
        };

        if centers.len() != graph.node_count() {
            return Err(LayoutError::PositionCount {
                expected: graph.node_count(),
                actual: centers.len(),
            });
        }
        if let Some(node) = centers.iter().position(|center| !center.is_finite()) {
            return Err(LayoutError::NonFinitePosition(node));
        }
        Ok(centers)
    }
}

impl Default for Layouter {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}
