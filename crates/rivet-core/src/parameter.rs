//! # Parameters
//!
//! A parameter description as declared on a component.

use crate::graph::GraphStore;
use crate::vocab::{
    OO_DEFAULT, OO_DEFAULT_SCOPED, OO_FIXED, OO_LAZY, OO_REQUIRED, OO_UNIQUE_VALUE, RDFS_RANGE,
};
use crate::{NodeId, Range, ResolveError};

/// A component parameter.
///
/// Parameters are named nodes: their IRI is the predicate a configuration
/// uses to supply values.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub node: NodeId,
    /// The parameter IRI.
    pub id: String,
    pub range: Option<Range>,
    pub unique: bool,
    pub required: bool,
    pub lazy: bool,
    /// Values used when the configuration supplies none.
    pub default: Vec<NodeId>,
    /// Scoped default entries; validated when they are applied.
    pub default_scoped: Vec<NodeId>,
    /// Values always appended to the configured ones.
    pub fixed: Vec<NodeId>,
}

impl Parameter {
    /// Read the parameter described at `node`.
    pub fn load<G: GraphStore>(graph: &G, node: NodeId) -> Result<Self, ResolveError> {
        let id = graph
            .iri(node)
            .ok_or_else(|| ResolveError::InvalidDefinition {
                node: graph.display(node),
                message: "a parameter must be a named node".to_string(),
            })?
            .to_string();
        let range = graph
            .object(node, RDFS_RANGE)
            .map(|range| Range::from_graph(graph, range))
            .transpose()?;
        Ok(Self {
            node,
            id,
            range,
            unique: graph.flag(node, OO_UNIQUE_VALUE),
            required: graph.flag(node, OO_REQUIRED),
            lazy: graph.flag(node, OO_LAZY),
            default: graph.ordered(node, OO_DEFAULT),
            default_scoped: graph.objects(node, OO_DEFAULT_SCOPED).to_vec(),
            fixed: graph.ordered(node, OO_FIXED),
        })
    }
}
