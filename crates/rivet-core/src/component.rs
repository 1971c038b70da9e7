//! # Components
//!
//! Component descriptions: the parameters, generic type parameters and
//! constructor argument definition of an instantiable type.
//!
//! Components inherit from their `rdfs:subClassOf` ancestors that are
//! themselves components. Own parameters come first, then inherited ones in
//! breadth-first order. A component without its own constructor arguments or
//! generic type parameters takes the nearest ancestor's.

use std::collections::{BTreeSet, VecDeque};

use tracing::trace;

use crate::graph::GraphStore;
use crate::vocab::{
    OO_ABSTRACT_CLASS, OO_CLASS, OO_CONSTRUCTOR_ARGUMENTS, OO_GENERIC_TYPE_PARAMETERS,
    OO_PARAMETER, RDFS_SUBCLASS_OF,
};
use crate::{NodeId, ResolveError};

/// Whether a component can be instantiated directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentKind {
    Class,
    AbstractClass,
}

impl ComponentKind {
    /// Get a human-readable name for the kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::AbstractClass => "abstract class",
        }
    }

    fn of<G: GraphStore>(graph: &G, node: NodeId) -> Option<Self> {
        let types = graph.types(node);
        if types.contains(&OO_CLASS) {
            Some(Self::Class)
        } else if types.contains(&OO_ABSTRACT_CLASS) {
            Some(Self::AbstractClass)
        } else {
            None
        }
    }
}

/// A resolved component description, inheritance applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub node: NodeId,
    /// The component IRI (or blank label).
    pub id: String,
    pub kind: ComponentKind,
    /// Generic type parameter IRIs, in declaration order.
    pub generic_type_parameters: Vec<String>,
    /// Parameter nodes, own first.
    pub parameters: Vec<NodeId>,
    /// Root of the constructor argument definition, if any.
    pub constructor_arguments: Option<NodeId>,
}

impl Component {
    /// Whether `node` is declared as a component.
    pub fn is_component<G: GraphStore>(graph: &G, node: NodeId) -> bool {
        ComponentKind::of(graph, node).is_some()
    }

    /// Load the component described at `node`.
    pub fn load<G: GraphStore>(graph: &G, node: NodeId) -> Result<Self, ResolveError> {
        let kind =
            ComponentKind::of(graph, node).ok_or_else(|| ResolveError::NotAComponent(graph.display(node)))?;
        let mut component = Self {
            node,
            id: graph.display(node),
            kind,
            generic_type_parameters: generic_type_parameters(graph, node),
            parameters: graph.ordered(node, OO_PARAMETER),
            constructor_arguments: graph.object(node, OO_CONSTRUCTOR_ARGUMENTS),
        };

        let mut seen: BTreeSet<NodeId> = component.parameters.iter().copied().collect();
        let mut visited = BTreeSet::from([node]);
        let mut queue: VecDeque<NodeId> = graph.objects(node, RDFS_SUBCLASS_OF).iter().copied().collect();
        while let Some(ancestor) = queue.pop_front() {
            if !visited.insert(ancestor) {
                continue;
            }
            queue.extend(graph.objects(ancestor, RDFS_SUBCLASS_OF).iter().copied());
            if !Self::is_component(graph, ancestor) {
                continue;
            }
            trace!(component = %component.id, ancestor = %graph.display(ancestor), "inheriting");
            for parameter in graph.ordered(ancestor, OO_PARAMETER) {
                if seen.insert(parameter) {
                    component.parameters.push(parameter);
                }
            }
            if component.constructor_arguments.is_none() {
                component.constructor_arguments = graph.object(ancestor, OO_CONSTRUCTOR_ARGUMENTS);
            }
            if component.generic_type_parameters.is_empty() {
                component.generic_type_parameters = generic_type_parameters(graph, ancestor);
            }
        }
        Ok(component)
    }

    /// The component a configuration instantiates: the first of its declared
    /// types that is a component.
    pub fn of_config<G: GraphStore>(graph: &G, config: NodeId) -> Option<NodeId> {
        graph
            .types(config)
            .into_iter()
            .filter_map(|t| graph.lookup_named(t))
            .find(|&t| Self::is_component(graph, t))
    }

    /// Load the component a configuration instantiates.
    pub fn for_config<G: GraphStore>(graph: &G, config: NodeId) -> Result<Self, ResolveError> {
        let component = Self::of_config(graph, config)
            .ok_or_else(|| ResolveError::NotAComponent(graph.display(config)))?;
        Self::load(graph, component)
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.kind == ComponentKind::AbstractClass
    }
}

fn generic_type_parameters<G: GraphStore>(graph: &G, node: NodeId) -> Vec<String> {
    graph
        .ordered(node, OO_GENERIC_TYPE_PARAMETERS)
        .into_iter()
        .map(|generic| graph.display(generic))
        .collect()
}
