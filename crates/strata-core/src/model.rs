//! Normalized source-code entity model.
//!
//! These types are produced by language-specific parser collaborators and are
//! consumed, never mutated, by the synthesis pipeline. Every parse cycle
//! recreates them wholesale.
//!
//! # Pipeline Position
//!
//! ```text
//! Source files
//!     ↓ parser collaborators (external)
//! Project snapshot (these types)
//!     ↓ analysis + imports + scope
//! Working set of entities and relationships
//!     ↓ generate + layout
//! Diagram (see `diagram` module)
//! ```
//!
//! # Organization
//!
//! - [`entity`] - Classes, interfaces and their members
//! - [`relationship`] - Inferred structural edges and import edges
//! - [`project`] - Per-file collaborator output for a whole project

pub mod entity;
pub mod project;
pub mod relationship;

pub use entity::*;
pub use project::*;
pub use relationship::*;
