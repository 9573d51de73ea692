//! Diagram model handed to the rendering layer.
//!
//! A [`Diagram`] is a snapshot of sized, positioned nodes and styled edges.
//! Only node positions survive from one regeneration to the next; everything
//! else is recomputed from the entity model every cycle.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Bounds, Point, Size},
    identifier::EntityId,
    model::{EntityKind, RelationshipKind},
};

/// Orientation of the rank axis of a layered layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    /// Ranks stack downwards (default)
    #[default]
    TopToBottom,
    /// Ranks stack rightwards
    LeftToRight,
}

impl FromStr for LayoutDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top_to_bottom" | "tb" => Ok(Self::TopToBottom),
            "left_to_right" | "lr" => Ok(Self::LeftToRight),
            _ => Err("Unsupported layout direction"),
        }
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutDirection::TopToBottom => f.write_str("top_to_bottom"),
            LayoutDirection::LeftToRight => f.write_str("left_to_right"),
        }
    }
}

/// Stroke pattern of an edge line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// Decoration drawn at an edge end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    None,
    HollowTriangle,
    OpenArrow,
    HollowDiamond,
}

/// Visual style of an edge. Fully determined by the relationship kind.
///
/// # Examples
///
/// ```
/// use strata_core::{diagram::{EdgeStyle, LineStyle, Marker}, model::RelationshipKind};
///
/// let style = EdgeStyle::for_kind(RelationshipKind::Realization);
/// assert_eq!(style.line(), LineStyle::Dashed);
/// assert_eq!(style.target_marker(), Marker::HollowTriangle);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeStyle {
    line: LineStyle,
    source_marker: Marker,
    target_marker: Marker,
}

impl EdgeStyle {
    /// Returns the UML notation for a relationship kind.
    pub fn for_kind(kind: RelationshipKind) -> Self {
        let (line, source_marker, target_marker) = match kind {
            RelationshipKind::Inheritance => (LineStyle::Solid, Marker::None, Marker::HollowTriangle),
            RelationshipKind::Realization => (LineStyle::Dashed, Marker::None, Marker::HollowTriangle),
            RelationshipKind::Association => (LineStyle::Solid, Marker::None, Marker::OpenArrow),
            RelationshipKind::Aggregation => (LineStyle::Solid, Marker::HollowDiamond, Marker::None),
        };
        Self {
            line,
            source_marker,
            target_marker,
        }
    }

    pub fn line(&self) -> LineStyle {
        self.line
    }

    pub fn source_marker(&self) -> Marker {
        self.source_marker
    }

    pub fn target_marker(&self) -> Marker {
        self.target_marker
    }
}

/// A sized, positioned box for one entity.
///
/// `position` is the top-left corner. The size depends only on the text
/// content, so two generations over the same entity produce the same size
/// without any rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    id: EntityId,
    kind: EntityKind,
    display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stereotype: Option<String>,
    #[serde(default)]
    member_lines: Vec<String>,
    size: Size,
    #[serde(default)]
    position: Point,
}

impl DiagramNode {
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        display_name: String,
        stereotype: Option<String>,
        member_lines: Vec<String>,
        size: Size,
    ) -> Self {
        Self {
            id,
            kind,
            display_name,
            stereotype,
            member_lines,
            size,
            position: Point::default(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn stereotype(&self) -> Option<&str> {
        self.stereotype.as_deref()
    }

    pub fn member_lines(&self) -> &[String] {
        &self.member_lines
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the top-left corner of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Compares every field except the position.
    pub fn same_content(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.display_name == other.display_name
            && self.stereotype == other.stereotype
            && self.member_lines == other.member_lines
            && self.size == other.size
    }
}

/// A styled edge between two nodes of the same diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagramEdge {
    id: String,
    source: EntityId,
    target: EntityId,
    kind: RelationshipKind,
    style: EdgeStyle,
}

impl DiagramEdge {
    /// Creates an edge whose style follows from `kind`.
    pub fn new(id: String, source: EntityId, target: EntityId, kind: RelationshipKind) -> Self {
        Self {
            id,
            source,
            target,
            kind,
            style: EdgeStyle::for_kind(kind),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> EntityId {
        self.source
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }
}

/// The `{nodes, edges}` snapshot passed between regenerations.
///
/// Renderers feed the state back after user drags so the next cycle can keep
/// the adjusted positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramState {
    #[serde(default)]
    nodes: Vec<DiagramNode>,
    #[serde(default)]
    edges: Vec<DiagramEdge>,
}

impl DiagramState {
    pub fn new(nodes: Vec<DiagramNode>, edges: Vec<DiagramEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn into_parts(self) -> (Vec<DiagramNode>, Vec<DiagramEdge>) {
        (self.nodes, self.edges)
    }
}

/// A complete diagram: the state plus the direction it was laid out in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(flatten)]
    state: DiagramState,
    #[serde(default)]
    layout_direction: LayoutDirection,
}

impl Diagram {
    pub fn new(state: DiagramState, layout_direction: LayoutDirection) -> Self {
        Self {
            state,
            layout_direction,
        }
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        self.state.nodes()
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        self.state.edges()
    }

    pub fn state(&self) -> &DiagramState {
        &self.state
    }

    pub fn into_state(self) -> DiagramState {
        self.state
    }

    pub fn layout_direction(&self) -> LayoutDirection {
        self.layout_direction
    }

    /// Returns the node with the given id, if present.
    pub fn node(&self, id: EntityId) -> Option<&DiagramNode> {
        self.state.nodes.iter().find(|node| node.id == id)
    }

    /// Smallest rectangle containing every node, or `None` for an empty diagram.
    pub fn bounds(&self) -> Option<Bounds> {
        self.state
            .nodes
            .iter()
            .map(|node| Bounds::new_from_top_left(node.position, node.size))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str) -> DiagramNode {
        DiagramNode::new(
            EntityId::new("a.ts", name),
            EntityKind::Class,
            name.to_string(),
            None,
            vec!["+ id: number".to_string()],
            Size::new(160.0, 64.0),
        )
    }

    #[test]
    fn test_edge_style_per_kind() {
        let inheritance = EdgeStyle::for_kind(RelationshipKind::Inheritance);
        assert_eq!(inheritance.line(), LineStyle::Solid);
        assert_eq!(inheritance.target_marker(), Marker::HollowTriangle);

        let aggregation = EdgeStyle::for_kind(RelationshipKind::Aggregation);
        assert_eq!(aggregation.source_marker(), Marker::HollowDiamond);
        assert_eq!(aggregation.target_marker(), Marker::None);

        let association = EdgeStyle::for_kind(RelationshipKind::Association);
        assert_eq!(association.target_marker(), Marker::OpenArrow);
    }

    #[test]
    fn test_same_content_ignores_position() {
        let a = node("A");
        let moved = node("A").with_position(Point::new(300.0, 10.0));

        assert!(a.same_content(&moved));
        assert_ne!(a, moved);
        assert!(!a.same_content(&node("B")));
    }

    #[test]
    fn test_bounds_cover_every_node() {
        let diagram = Diagram::new(
            DiagramState::new(
                vec![
                    node("A").with_position(Point::new(-20.0, 10.0)),
                    node("B").with_position(Point::new(200.0, 100.0)),
                ],
                Vec::new(),
            ),
            LayoutDirection::TopToBottom,
        );

        let bounds = diagram.bounds().unwrap();
        assert_eq!(bounds.min_point(), Point::new(-20.0, 10.0));
        assert_eq!(bounds.max_x(), 360.0);
        assert_eq!(bounds.max_y(), 164.0);
        assert_eq!(bounds.width(), 380.0);
        assert!(Diagram::default().bounds().is_none());
    }

    #[test]
    fn test_layout_direction_from_str() {
        assert_eq!(
            "lr".parse::<LayoutDirection>(),
            Ok(LayoutDirection::LeftToRight)
        );
        assert_eq!(
            "top_to_bottom".parse::<LayoutDirection>(),
            Ok(LayoutDirection::TopToBottom)
        );
        assert!("diagonal".parse::<LayoutDirection>().is_err());
    }

    #[test]
    fn test_diagram_serializes_flat() {
        let diagram = Diagram::new(
            DiagramState::new(vec![node("A")], Vec::new()),
            LayoutDirection::LeftToRight,
        );
        let value = serde_json::to_value(&diagram).unwrap();

        assert!(value.get("nodes").is_some());
        assert!(value.get("edges").is_some());
        assert_eq!(value["layout_direction"], "left_to_right");

        let back: Diagram = serde_json::from_value(value).unwrap();
        assert_eq!(back, diagram);
    }
}
