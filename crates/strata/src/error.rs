//! Error types for Strata operations.
//!
//! The synthesis pipeline itself never fails: every degenerate input has a
//! defined fallback value. The errors here are internal to the layout stage
//! ([`LayoutError`], always answered by the grid fallback) or belong to
//! configuration validation ([`ConfigError`]).

use thiserror::Error;

/// Reasons a layout engine rejects a graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Edge {edge} references node {node}, but the graph has {count} nodes")]
    UnknownNode {
        edge: usize,
        node: usize,
        count: usize,
    },

    #[error("Node {node} has a degenerate size ({width} x {height})")]
    DegenerateSize { node: usize, width: f32, height: f32 },

    #[error("Graph still contains a cycle through node {0} after cycle removal")]
    Cyclic(usize),

    #[error("Layout engine panicked: {0}")]
    Panicked(String),

    #[error("Layout engine returned {actual} positions for {expected} nodes")]
    PositionCount { expected: usize, actual: usize },

    #[error("Layout engine returned a non-finite position for node {0}")]
    NonFinitePosition(usize),

    #[error("Layout engine error: {0}")]
    Engine(String),
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be a finite, non-negative number (got {value})")]
    NegativeOrNonFinite { field: &'static str, value: f32 },

    #[error("`{field}` must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("Project spacing ({project}) must not be smaller than file spacing ({file}) for `{field}`")]
    ProfileOrder {
        field: &'static str,
        file: f32,
        project: f32,
    },
}
