//! Layout engine selection.
//!
//! Every engine answers the same narrow question: given node sizes, directed
//! index edges, spacing and a direction, where is the center of each node?
//! Callers never depend on a particular algorithm.

mod layered;
mod sugiyama;

use strata_core::{diagram::LayoutDirection, geometry::Point};

use crate::{
    config::{LayoutAlgorithm, SpacingProfile},
    error::LayoutError,
    layout::LayoutGraph,
};

/// A hierarchical layout algorithm.
pub trait LayoutEngine {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Calculates one center point per node of `graph`, in node index order.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] when the graph is malformed or the algorithm
    /// cannot place it.
    fn centers(
        &self,
        graph: &LayoutGraph,
        spacing: SpacingProfile,
        direction: LayoutDirection,
    ) -> Result<Vec<Point>, LayoutError>;
}

/// Builder for configured layout engines.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    ordering_passes: usize,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self { ordering_passes: 4 }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of crossing reduction sweeps
    pub fn with_ordering_passes(mut self, passes: usize) -> Self {
        self.ordering_passes = passes;
        self
    }

    /// Builds the engine for `algorithm`.
    pub fn build(&self, algorithm: LayoutAlgorithm) -> Box<dyn LayoutEngine> {
        match algorithm {
            LayoutAlgorithm::Layered => {
                let mut engine = layered::Engine::new();
                engine.set_ordering_passes(self.ordering_passes);
                Box::new(engine)
            }
            LayoutAlgorithm::Sugiyama => Box::new(sugiyama::Engine::new()),
        }
    }
}
