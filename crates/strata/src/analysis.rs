//! Relationship inference between entities.
//!
//! Relationships are inferred purely from names: supertype references and
//! member type text are matched against the names of the entities in the
//! current working set. There is no type resolution, so an entity named like
//! an unrelated one in another file can be matched (false positive) and an
//! aliased import is missed (false negative).
//!
//! # Rules
//!
//! - **Inheritance**: a class extending a known class, or an interface
//!   extending known interfaces (subtype → supertype).
//! - **Realization**: a class implementing known interfaces.
//! - **Association / Aggregation**: a member whose declared type names a known
//!   entity; aggregation when the name is held in a collection.
//!
//! Self references produce no edge, and each `(source, target, kind)` triple
//! produces at most one edge.

mod type_ref;

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use strata_core::{
    identifier::{EntityId, FileId},
    model::{EntityDescriptor, EntityKind, RelationshipEdge, RelationshipKind},
};

/// Infers the deduplicated relationship edges among `entities`.
///
/// Edges come out in a deterministic order: by source entity in input order,
/// then inheritance, realization and member-derived edges.
///
/// # Examples
///
/// ```
/// use strata::analysis::infer_relationships;
/// use strata_core::model::{ClassDescriptor, EntityDescriptor, RelationshipKind};
///
/// let entities: Vec<EntityDescriptor> = vec![
///     ClassDescriptor::new("hr.ts", "Person").into(),
///     ClassDescriptor::new("hr.ts", "Employee").with_extends("Person").into(),
/// ];
///
/// let edges = infer_relationships(&entities);
/// assert_eq!(edges.len(), 1);
/// assert_eq!(edges[0].kind(), RelationshipKind::Inheritance);
/// assert_eq!(edges[0].source(), entities[1].id());
/// ```
pub fn infer_relationships<'a>(
    entities: impl IntoIterator<Item = &'a EntityDescriptor>,
) -> Vec<RelationshipEdge> {
    let entities: Vec<&EntityDescriptor> = entities.into_iter().collect();
    let known = KnownEntities::new(&entities);
    let mut edges = IndexSet::new();

    for entity in &entities {
        let source = entity.id();
        let mut emit = |kind: RelationshipKind, target: EntityId| {
            if target == source {
                trace!(entity:% = source, kind:%; "Skipping self relationship");
                return;
            }
            let edge = RelationshipEdge::new(kind, source, target);
            if edges.insert(edge) {
                trace!(source:% = source, target:% = target, kind:%; "Inferred relationship");
            }
        };

        match entity {
            EntityDescriptor::Class(class) => {
                if let Some(target) = class
                    .extends()
                    .and_then(type_ref::base_name)
                    .and_then(|name| known.resolve(name, source.file(), EntityKind::Class))
                {
                    emit(RelationshipKind::Inheritance, target);
                }
                for interface in class.implements() {
                    if let Some(target) = type_ref::base_name(interface)
                        .and_then(|name| known.resolve(name, source.file(), EntityKind::Interface))
                    {
                        emit(RelationshipKind::Realization, target);
                    }
                }
            }
            EntityDescriptor::Interface(interface) => {
                for supertype in interface.extends() {
                    if let Some(target) = type_ref::base_name(supertype)
                        .and_then(|name| known.resolve(name, source.file(), EntityKind::Interface))
                    {
                        emit(RelationshipKind::Inheritance, target);
                    }
                }
            }
        }

        for member in entity.members() {
            for type_name in type_ref::type_names(member.type_text()) {
                let Some(target) = known.resolve_any(type_name.name, source.file()) else {
                    continue;
                };
                let kind = if type_name.in_collection {
                    RelationshipKind::Aggregation
                } else {
                    RelationshipKind::Association
                };
                emit(kind, target);
            }
        }
    }

    debug!(entities = entities.len(), relationships = edges.len(); "Relationships inferred");

    edges.into_iter().collect()
}

/// Name index over the working set.
struct KnownEntities {
    by_name: IndexMap<String, Vec<(EntityId, EntityKind)>>,
}

impl KnownEntities {
    fn new(entities: &[&EntityDescriptor]) -> Self {
        let mut by_name: IndexMap<String, Vec<(EntityId, EntityKind)>> = IndexMap::new();
        for entity in entities {
            by_name
                .entry(entity.name().to_string())
                .or_default()
                .push((entity.id(), entity.kind()));
        }
        Self { by_name }
    }

    /// Resolves `name` to an entity of the given kind.
    fn resolve(&self, name: &str, referrer: FileId, kind: EntityKind) -> Option<EntityId> {
        self.pick(name, referrer, |candidate| candidate == kind)
    }

    /// Resolves `name` to an entity of any kind.
    fn resolve_any(&self, name: &str, referrer: FileId) -> Option<EntityId> {
        self.pick(name, referrer, |_| true)
    }

    /// Among same-named candidates, prefers the referrer's own file, then the
    /// first in working-set order.
    fn pick(
        &self,
        name: &str,
        referrer: FileId,
        accept: impl Fn(EntityKind) -> bool,
    ) -> Option<EntityId> {
        let candidates = self.by_name.get(name)?;
        let mut accepted = candidates.iter().filter(|(_, kind)| accept(*kind));
        let first = accepted.next()?;
        if first.0.file() == referrer {
            return Some(first.0);
        }
        Some(
            accepted
                .find(|(id, _)| id.file() == referrer)
                .unwrap_or(first)
                .0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::model::{ClassDescriptor, InterfaceDescriptor, MemberDescriptor};

    fn kinds(edges: &[RelationshipEdge]) -> Vec<(String, String, RelationshipKind)> {
        edges
            .iter()
            .map(|e| {
                (
                    e.source().name().to_string(),
                    e.target().name().to_string(),
                    e.kind(),
                )
            })
            .collect()
    }

    fn triple(
        source: &str,
        target: &str,
        kind: RelationshipKind,
    ) -> (String, String, RelationshipKind) {
        (source.to_string(), target.to_string(), kind)
    }

    #[test]
    fn test_unrelated_entities_have_no_edges() {
        let entities: Vec<EntityDescriptor> = vec![
            ClassDescriptor::new("a.ts", "A").into(),
            ClassDescriptor::new("a.ts", "B").into(),
        ];
        assert!(infer_relationships(&entities).is_empty());
    }

    #[test]
    fn test_inheritance_from_class() {
        let entities: Vec<EntityDescriptor> = vec![
            ClassDescriptor::new("hr.ts", "Employee")
                .with_extends("Person")
                .into(),
            ClassDescriptor::new("hr.ts", "Person").into(),
        ];

        let edges = infer_relationships(&entities);
        assert_eq!(
            kinds(&edges),
            [triple("Employee", "Person", RelationshipKind::Inheritance)]
        );
    }

    #[test]
    fn test_class_cannot_extend_interface() {
        let entities: Vec<EntityDescriptor> = vec![
            ClassDescriptor::new("a.ts", "Impl").with_extends("Shape").into(),
            InterfaceDescriptor::new("a.ts", "Shape").into(),
        ];
        assert!(infer_relationships(&entities).is_empty());
    }

    #[test]
    fn test_realization_per_matched_interface() {
        let entities: Vec<EntityDescriptor> = vec![
            ClassDescriptor::new("a.ts", "Circle")
                .with_implements("Shape")
                .with_implements("Drawable")
                .with_implements("Serializable")
                .into(),
            InterfaceDescriptor::new("a.ts", "Shape").into(),
            InterfaceDescriptor::new("a.ts", "Drawable").into(),
        ];

        let edges = infer_relationships(&entities);
        assert_eq!(
            kinds(&edges),
            [
                triple("Circle", "Shape", RelationshipKind::Realization),
                triple("Circle", "Drawable", RelationshipKind::Realization),
            ]
        );
    }

    #[test]
    fn test_interface_inheritance() {
        let entities: Vec<EntityDescriptor> = vec![
            InterfaceDescriptor::new("a.ts", "Square")
                .with_extends("Shape<number>")
                .with_extends("Base")
                .into(),
            InterfaceDescriptor::new("a.ts", "Shape").with_generic("T").into(),
            ClassDescriptor::new("a.ts", "Base").into(),
        ];

        let edges = infer_relationships(&entities);
        assert_eq!(
            kinds(&edges),
            [triple("Square", "Shape", RelationshipKind::Inheritance)]
        );
    }

    #[test]
    fn test_association_and_aggregation() {
        let entities: Vec<EntityDescriptor> = vec![
            ClassDescriptor::new("shop.ts", "Order")
                .with_member(MemberDescriptor::field("customer", "Customer"))
                .with_member(MemberDescriptor::field("lines", "OrderLine[]"))
                .with_member(MemberDescriptor::field("total", "number"))
                .with_member(MemberDescriptor::method("invoice", "Promise<Invoice>"))
                .into(),
            ClassDescriptor::new("shop.ts", "Customer").into(),
            ClassDescriptor::new("shop.ts", "OrderLine").into(),
            ClassDescriptor::new("shop.ts", "Invoice").into(),
        ];

        let edges = infer_relationships(&entities);
        assert_eq!(
            kinds(&edges),
            [
                triple("Order", "Customer", RelationshipKind::Association),
                triple("Order", "OrderLine", RelationshipKind::Aggregation),
                triple("Order", "Invoice", RelationshipKind::Association),
            ]
        );
    }

    #[test]
    fn test_dedup_and_self_reference() {
        let entities: Vec<EntityDescriptor> = vec![
            ClassDescriptor::new("a.ts", "Node")
                .with_member(MemberDescriptor::field("next", "Node"))
                .with_member(MemberDescriptor::field("owner", "Tree"))
                .with_member(MemberDescriptor::field("root", "Tree"))
                .with_member(MemberDescriptor::field("forest", "List<Tree>"))
                .into(),
            ClassDescriptor::new("a.ts", "Tree").into(),
        ];

        let edges = infer_relationships(&entities);
        assert_eq!(
            kinds(&edges),
            [
                triple("Node", "Tree", RelationshipKind::Association),
                triple("Node", "Tree", RelationshipKind::Aggregation),
            ]
        );
    }

    #[test]
    fn test_same_name_prefers_own_file() {
        let entities: Vec<EntityDescriptor> = vec![
            ClassDescriptor::new("b.ts", "Config").into(),
            ClassDescriptor::new("a.ts", "App")
                .with_member(MemberDescriptor::field("config", "Config"))
                .into(),
            ClassDescriptor::new("a.ts", "Config").into(),
            ClassDescriptor::new("c.ts", "Service")
                .with_member(MemberDescriptor::field("config", "Config"))
                .into(),
        ];

        let edges = infer_relationships(&entities);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].target(), EntityId::new("a.ts", "Config"));
        // No same-file candidate: first in working-set order.
        assert_eq!(edges[1].target(), EntityId::new("b.ts", "Config"));
    }

    #[test]
    fn test_unresolved_names_are_not_errors() {
        let entities: Vec<EntityDescriptor> = vec![
            ClassDescriptor::new("a.ts", "Widget")
                .with_extends("React.Component")
                .with_implements("Missing")
                .with_member(MemberDescriptor::field("label", "string"))
                .into(),
        ];
        assert!(infer_relationships(&entities).is_empty());
    }

    #[test]
    fn test_parameter_names_do_not_associate() {
        let entities: Vec<EntityDescriptor> = vec![
            ClassDescriptor::new("a.ts", "Checkout")
                .with_member(MemberDescriptor::field("onPay", "(Payment: string) => Receipt"))
                .with_member(MemberDescriptor::field("meta", "{ Payment: number }"))
                .into(),
            ClassDescriptor::new("a.ts", "Payment").into(),
            ClassDescriptor::new("a.ts", "Receipt").into(),
        ];

        let edges = infer_relationships(&entities);
        assert_eq!(
            kinds(&edges),
            [triple("Checkout", "Receipt", RelationshipKind::Association)]
        );
    }
}
