//! Structural relationships between entities and import edges between files.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::{EntityId, FileId};

/// Kind of structural relationship inferred between two entities.
///
/// # Variants
///
/// - `Inheritance` - class extends class, or interface extends interface
/// - `Realization` - class implements interface
/// - `Association` - a member refers to another entity
/// - `Aggregation` - a member holds a collection of another entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Inheritance,
    Realization,
    Association,
    Aggregation,
}

impl RelationshipKind {
    /// Returns true for the kinds that point from a subtype to its supertype.
    pub fn is_generalization(self) -> bool {
        matches!(
            self,
            RelationshipKind::Inheritance | RelationshipKind::Realization
        )
    }
}

impl From<RelationshipKind> for &'static str {
    fn from(val: RelationshipKind) -> Self {
        match val {
            RelationshipKind::Inheritance => "inheritance",
            RelationshipKind::Realization => "realization",
            RelationshipKind::Association => "association",
            RelationshipKind::Aggregation => "aggregation",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// An inferred relationship from `source` to `target`.
///
/// The id is derived from the `(kind, source, target)` triple, so two edges
/// with the same triple are the same edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipEdge {
    id: String,
    kind: RelationshipKind,
    source: EntityId,
    target: EntityId,
}

impl RelationshipEdge {
    pub fn new(kind: RelationshipKind, source: EntityId, target: EntityId) -> Self {
        Self {
            id: format!("{kind}:{source}->{target}"),
            kind,
            source,
            target,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn source(&self) -> EntityId {
        self.source
    }

    pub fn target(&self) -> EntityId {
        self.target
    }
}

impl fmt::Display for RelationshipEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// `from` imports something that `to` defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportEdge {
    from: FileId,
    to: FileId,
}

impl ImportEdge {
    pub fn new(from: FileId, to: FileId) -> Self {
        Self { from, to }
    }

    pub fn from(&self) -> FileId {
        self.from
    }

    pub fn to(&self) -> FileId {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id_is_derived_from_triple() {
        let source = EntityId::new("hr.ts", "Employee");
        let target = EntityId::new("hr.ts", "Person");

        let edge = RelationshipEdge::new(RelationshipKind::Inheritance, source, target);
        let same = RelationshipEdge::new(RelationshipKind::Inheritance, source, target);
        let other = RelationshipEdge::new(RelationshipKind::Association, source, target);

        assert_eq!(edge.id(), "inheritance:hr.ts::Employee->hr.ts::Person");
        assert_eq!(edge, same);
        assert_ne!(edge.id(), other.id());
    }

    #[test]
    fn test_is_generalization() {
        assert!(RelationshipKind::Inheritance.is_generalization());
        assert!(RelationshipKind::Realization.is_generalization());
        assert!(!RelationshipKind::Association.is_generalization());
        assert!(!RelationshipKind::Aggregation.is_generalization());
    }
}
