//! Diagram construction: nodes, edges and their placement.

use indexmap::IndexMap;
use log::{debug, trace, warn};

use strata_core::{
    diagram::{Diagram, DiagramEdge, DiagramNode, DiagramState},
    geometry::Size,
    identifier::EntityId,
    model::{EntityDescriptor, MemberDescriptor, MemberKind, Modifier, RelationshipEdge},
};

use crate::{
    config::{AppConfig, SizingConfig, SpacingProfile},
    layout::{LayoutGraph, Layouter},
};

/// Builds laid-out diagrams from scope-filtered entities.
pub struct DiagramGenerator {
    sizing: SizingConfig,
    layouter: Layouter,
}

impl DiagramGenerator {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_layouter(config.sizing().clone(), Layouter::new(config.layout()))
    }

    pub fn with_layouter(sizing: SizingConfig, layouter: Layouter) -> Self {
        Self { sizing, layouter }
    }

    /// Generates the diagram for `entities`.
    ///
    /// `relationships` must have been inferred over the same entity set.
    /// A relationship whose endpoints are not both among the generated nodes
    /// is logged and skipped. Entities sharing an id are only shown once.
    pub fn generate(
        &self,
        entities: &[&EntityDescriptor],
        relationships: &[RelationshipEdge],
        spacing: SpacingProfile,
    ) -> Diagram {
        let mut nodes: IndexMap<EntityId, DiagramNode> = IndexMap::with_capacity(entities.len());
        for entity in entities {
            let id = entity.id();
            if nodes.contains_key(&id) {
                warn!(entity:% = id; "Skipping duplicate entity");
                continue;
            }
            let node = self.node(entity);
            trace!(
                entity:% = id,
                width = node.size().width(),
                height = node.size().height();
                "Node sized"
            );
            nodes.insert(id, node);
        }

        let mut graph = LayoutGraph::new();
        for node in nodes.values() {
            graph.add_node(node.size());
        }

        let mut edges = Vec::with_capacity(relationships.len());
        for relationship in relationships {
            let (source, target) = (relationship.source(), relationship.target());
            let (Some(source_idx), Some(target_idx)) =
                (nodes.get_index_of(&source), nodes.get_index_of(&target))
            else {
                warn!(
                    relationship = relationship.id(),
                    source:% = source,
                    target:% = target;
                    "Dropping relationship with an endpoint outside the diagram"
                );
                continue;
            };

            // Supertypes rank above their subtypes.
            if relationship.kind().is_generalization() {
                graph.add_edge(target_idx, source_idx);
            } else {
                graph.add_edge(source_idx, target_idx);
            }
            edges.push(DiagramEdge::new(
                relationship.id().to_string(),
                source,
                target,
                relationship.kind(),
            ));
        }

        let placement = self.layouter.place(&graph, spacing);
        let fallback = placement.is_fallback();
        let nodes: Vec<DiagramNode> = nodes
            .into_values()
            .zip(placement.into_positions())
            .map(|(node, position)| node.with_position(position))
            .collect();

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            fallback;
            "Diagram generated"
        );

        Diagram::new(DiagramState::new(nodes, edges), self.layouter.direction())
    }

    fn node(&self, entity: &EntityDescriptor) -> DiagramNode {
        let display_name = display_name(entity);
        let stereotype = stereotype(entity).map(str::to_string);
        let member_lines: Vec<String> = entity.members().iter().map(member_line).collect();

        let longest = std::iter::once(display_name.as_str())
            .chain(stereotype.as_deref())
            .chain(member_lines.iter().map(String::as_str))
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        let size = node_size(&self.sizing, longest, member_lines.len());
        DiagramNode::new(
            entity.id(),
            entity.kind(),
            display_name,
            stereotype,
            member_lines,
            size,
        )
    }
}

impl Default for DiagramGenerator {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

/// Estimates a node size from its longest line and member count.
pub fn node_size(sizing: &SizingConfig, longest_line: usize, member_count: usize) -> Size {
    let width = (longest_line as f32 * sizing.char_width() + sizing.horizontal_padding())
        .max(sizing.min_width());
    let height = (sizing.header_height() + member_count as f32 * sizing.member_height())
        .max(sizing.min_height());
    Size::new(width, height)
}

/// Entity name followed by its generic parameters, e.g. `Map<K, V>`.
fn display_name(entity: &EntityDescriptor) -> String {
    let generics = entity.generics();
    if generics.is_empty() {
        entity.name().to_string()
    } else {
        format!("{}<{}>", entity.name(), generics.join(", "))
    }
}

fn stereotype(entity: &EntityDescriptor) -> Option<&'static str> {
    match entity {
        EntityDescriptor::Interface(_) => Some("«interface»"),
        EntityDescriptor::Class(class) if class.is_abstract() => Some("«abstract»"),
        EntityDescriptor::Class(_) => None,
    }
}

/// Renders a member as a UML compartment line.
///
/// ```text
/// + name: string
/// - static count: number
/// # readonly id?: string
/// + run(input: Order, retries: number): Promise<void>
/// ```
fn member_line(member: &MemberDescriptor) -> String {
    let mut line = String::new();
    line.push(member.visibility().symbol());
    line.push(' ');

    for modifier in member.modifiers() {
        let keyword = match modifier {
            Modifier::Static => "static",
            Modifier::Abstract => "abstract",
            Modifier::Readonly => "readonly",
            Modifier::Optional => continue,
        };
        line.push_str(keyword);
        line.push(' ');
    }

    line.push_str(member.name());
    if member.has_modifier(Modifier::Optional) {
        line.push('?');
    }

    if member.kind() == MemberKind::Method {
        let parameters: Vec<String> = member
            .parameters()
            .iter()
            .map(|p| {
                if p.type_text().is_empty() {
                    p.name().to_string()
                } else {
                    format!("{}: {}", p.name(), p.type_text())
                }
            })
            .collect();
        line.push('(');
        line.push_str(&parameters.join(", "));
        line.push(')');
    }

    if !member.type_text().is_empty() {
        line.push_str(": ");
        line.push_str(member.type_text());
    }
    line
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use strata_core::model::{
        ClassDescriptor, EntityKind, InterfaceDescriptor, Parameter, RelationshipKind, Visibility,
    };

    use super::*;
    use crate::analysis::infer_relationships;

    fn spacing() -> SpacingProfile {
        SpacingProfile::new(50.0, 80.0)
    }

    fn generate(entities: &[EntityDescriptor]) -> Diagram {
        let refs: Vec<&EntityDescriptor> = entities.iter().collect();
        let relationships = infer_relationships(refs.iter().copied());
        DiagramGenerator::default().generate(&refs, &relationships, spacing())
    }

    #[test]
    fn test_unrelated_entities() {
        let diagram = generate(&[
            ClassDescriptor::new("a.ts", "A").into(),
            ClassDescriptor::new("a.ts", "B").into(),
        ]);

        assert_eq!(diagram.nodes().len(), 2);
        assert!(diagram.edges().is_empty());
    }

    #[test]
    fn test_empty_input() {
        let diagram = generate(&[]);
        assert!(diagram.state().is_empty());
    }

    #[test]
    fn test_relationship_to_absent_node_is_dropped() {
        let entities: Vec<EntityDescriptor> = vec![ClassDescriptor::new("a.ts", "Employee").into()];
        let refs: Vec<&EntityDescriptor> = entities.iter().collect();
        let dangling = RelationshipEdge::new(
            RelationshipKind::Inheritance,
            EntityId::new("a.ts", "Employee"),
            EntityId::new("b.ts", "Person"),
        );

        let diagram = DiagramGenerator::default().generate(&refs, &[dangling], spacing());

        assert_eq!(diagram.nodes().len(), 1);
        assert!(diagram.edges().is_empty());
    }

    #[test]
    fn test_supertype_is_placed_above_subtype() {
        let diagram = generate(&[
            ClassDescriptor::new("hr.ts", "Employee")
                .with_extends("Person")
                .into(),
            ClassDescriptor::new("hr.ts", "Person").into(),
        ]);

        let employee = diagram.node(EntityId::new("hr.ts", "Employee")).unwrap();
        let person = diagram.node(EntityId::new("hr.ts", "Person")).unwrap();
        assert!(person.position().y() < employee.position().y());

        let edge = &diagram.edges()[0];
        assert_eq!(edge.source(), employee.id());
        assert_eq!(edge.target(), person.id());
    }

    #[test]
    fn test_minimum_size() {
        let diagram = generate(&[ClassDescriptor::new("a.ts", "A").into()]);
        let size = diagram.nodes()[0].size();

        assert_approx_eq!(f32, size.width(), 160.0);
        assert_approx_eq!(f32, size.height(), 60.0);
    }

    #[test]
    fn test_size_grows_with_content() {
        let sizing = SizingConfig::default();
        let size = node_size(&sizing, 40, 5);

        assert_approx_eq!(f32, size.width(), 40.0 * 7.5 + 32.0);
        assert_approx_eq!(f32, size.height(), 44.0 + 5.0 * 20.0);
    }

    #[test]
    fn test_display_name_and_stereotype() {
        let diagram = generate(&[
            InterfaceDescriptor::new("a.ts", "Repository")
                .with_generic("T")
                .with_generic("K")
                .into(),
            ClassDescriptor::new("a.ts", "Shape").with_abstract(true).into(),
            ClassDescriptor::new("a.ts", "Circle").into(),
        ]);

        let nodes = diagram.nodes();
        assert_eq!(nodes[0].display_name(), "Repository<T, K>");
        assert_eq!(nodes[0].kind(), EntityKind::Interface);
        assert_eq!(nodes[0].stereotype(), Some("«interface»"));
        assert_eq!(nodes[1].stereotype(), Some("«abstract»"));
        assert_eq!(nodes[2].stereotype(), None);
    }

    #[test]
    fn test_member_lines() {
        let field = MemberDescriptor::field("id", "string")
            .with_visibility(Visibility::Protected)
            .with_modifier(Modifier::Readonly)
            .with_modifier(Modifier::Optional);
        let method = MemberDescriptor::method("run", "Promise<void>")
            .with_visibility(Visibility::Private)
            .with_modifier(Modifier::Static)
            .with_parameter(Parameter::new("input", "Order"))
            .with_parameter(Parameter::new("retries", "number"));
        let untyped = MemberDescriptor::method("reset", "");

        assert_eq!(member_line(&field), "# readonly id?: string");
        assert_eq!(
            member_line(&method),
            "- static run(input: Order, retries: number): Promise<void>"
        );
        assert_eq!(member_line(&untyped), "+ reset()");
    }

    #[test]
    fn test_duplicate_entities_are_shown_once() {
        let diagram = generate(&[
            ClassDescriptor::new("a.ts", "A").into(),
            ClassDescriptor::new("a.ts", "A").into(),
        ]);
        assert_eq!(diagram.nodes().len(), 1);
    }
}
