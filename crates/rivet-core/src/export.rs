//! # Canonical Graph Document
//!
//! Deterministic JSON serialization of a [`Graph`].
//!
//! The canonical document is the interchange format for component and
//! configuration graphs: the CLI reads it, tests and benches build it. Nodes
//! are listed in arena order, triples sorted by subject then predicate, and
//! lists by list node, so exporting the same graph twice yields identical
//! bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::vocab::xsd;
use crate::{Literal, NodeId, ResolveError, Term};

// =============================================================================
// CANONICAL FORMAT
// =============================================================================

/// Current canonical format version.
pub const CANONICAL_VERSION: u32 = 1;

/// Maximum allowed node count in canonical imports.
pub const MAX_IMPORT_NODE_COUNT: usize = 1_000_000;

/// Maximum allowed triple count in canonical imports.
pub const MAX_IMPORT_TRIPLE_COUNT: usize = 10_000_000;

/// A term in canonical format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CanonicalTerm {
    Named {
        iri: String,
    },
    Blank {
        label: String,
    },
    Literal {
        value: String,
        #[serde(default = "default_datatype")]
        datatype: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
}

fn default_datatype() -> String {
    xsd::STRING.to_string()
}

impl From<&Term> for CanonicalTerm {
    fn from(term: &Term) -> Self {
        match term {
            Term::Named(iri) => Self::Named { iri: iri.clone() },
            Term::Blank(label) => Self::Blank {
                label: label.clone(),
            },
            Term::Literal(literal) => Self::Literal {
                value: literal.value.clone(),
                datatype: literal.datatype.clone(),
                language: literal.language.clone(),
            },
        }
    }
}

impl From<CanonicalTerm> for Term {
    fn from(term: CanonicalTerm) -> Self {
        match term {
            CanonicalTerm::Named { iri } => Self::Named(iri),
            CanonicalTerm::Blank { label } => Self::Blank(label),
            CanonicalTerm::Literal {
                value,
                datatype,
                language,
            } => Self::Literal(Literal {
                value,
                datatype,
                language,
            }),
        }
    }
}

/// A node in canonical format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalNode {
    /// Document-local identifier, referenced by triples and lists.
    pub id: u32,

    #[serde(flatten)]
    pub term: CanonicalTerm,
}

/// A triple in canonical format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalTriple {
    pub subject: u32,
    pub predicate: String,
    pub object: u32,
}

/// An ordered list in canonical format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalList {
    pub node: u32,
    pub items: Vec<u32>,
}

/// A graph in canonical format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalGraph {
    /// Format version for compatibility.
    pub version: u32,

    /// Nodes in arena order.
    pub nodes: Vec<CanonicalNode>,

    /// Triples sorted by subject, predicate. Objects keep insertion order.
    #[serde(default)]
    pub triples: Vec<CanonicalTriple>,

    /// Lists sorted by list node.
    #[serde(default)]
    pub lists: Vec<CanonicalList>,
}

impl CanonicalGraph {
    /// Create a canonical graph from a regular graph.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|(id, term)| CanonicalNode {
                id: id.0,
                term: term.into(),
            })
            .collect();

        let triples = graph
            .triples()
            .map(|(subject, predicate, object)| CanonicalTriple {
                subject: subject.0,
                predicate: predicate.to_string(),
                object: object.0,
            })
            .collect();

        let lists = graph
            .lists()
            .map(|(node, items)| CanonicalList {
                node: node.0,
                items: items.iter().map(|item| item.0).collect(),
            })
            .collect();

        Self {
            version: CANONICAL_VERSION,
            nodes,
            triples,
            lists,
        }
    }

    /// Rebuild a graph, validating every node reference.
    ///
    /// Document identifiers need not be dense; they are remapped to fresh
    /// arena identifiers. Repeated named nodes or literals collapse onto the
    /// same interned node.
    pub fn to_graph(&self) -> Result<Graph, ResolveError> {
        if self.version != CANONICAL_VERSION {
            return Err(ResolveError::DeserializationError(format!(
                "Unsupported graph version {}",
                self.version
            )));
        }
        if self.nodes.len() > MAX_IMPORT_NODE_COUNT {
            return Err(ResolveError::DeserializationError(format!(
                "Node count {} exceeds maximum allowed {}",
                self.nodes.len(),
                MAX_IMPORT_NODE_COUNT
            )));
        }
        if self.triples.len() > MAX_IMPORT_TRIPLE_COUNT {
            return Err(ResolveError::DeserializationError(format!(
                "Triple count {} exceeds maximum allowed {}",
                self.triples.len(),
                MAX_IMPORT_TRIPLE_COUNT
            )));
        }

        let mut graph = Graph::new();
        let mut ids: BTreeMap<u32, NodeId> = BTreeMap::new();
        for node in &self.nodes {
            let id = graph.insert_term(node.term.clone().into());
            if ids.insert(node.id, id).is_some() {
                return Err(ResolveError::DeserializationError(format!(
                    "Duplicate node id {}",
                    node.id
                )));
            }
        }

        let resolve = |id: u32| {
            ids.get(&id).copied().ok_or_else(|| {
                ResolveError::DeserializationError(format!("Dangling node reference {id}"))
            })
        };

        for triple in &self.triples {
            let subject = resolve(triple.subject)?;
            let object = resolve(triple.object)?;
            graph.add(subject, &triple.predicate, object);
        }

        for list in &self.lists {
            let node = resolve(list.node)?;
            let items = list
                .items
                .iter()
                .map(|&item| resolve(item))
                .collect::<Result<Vec<_>, _>>()?;
            graph.set_list(node, items);
        }

        Ok(graph)
    }
}

// =============================================================================
// EXPORT FUNCTIONS
// =============================================================================

/// Export a graph to canonical JSON.
///
/// # Errors
///
/// Returns `ResolveError::SerializationError` if serialization fails.
pub fn export_canonical(graph: &Graph) -> Result<String, ResolveError> {
    serde_json::to_string_pretty(&CanonicalGraph::from_graph(graph))
        .map_err(|e| ResolveError::SerializationError(e.to_string()))
}

/// Import a graph from canonical JSON.
///
/// # Errors
///
/// Returns `ResolveError::DeserializationError` if the document is malformed,
/// has an unsupported version, or references undeclared nodes.
pub fn import_canonical(data: &str) -> Result<Graph, ResolveError> {
    let canonical: CanonicalGraph = serde_json::from_str(data)
        .map_err(|e| ResolveError::DeserializationError(e.to_string()))?;
    canonical.to_graph()
}

// =============================================================================
// TESTS
// =============================================================================
