//! # Graph Store
//!
//! The read-only knowledge graph the resolver walks.
//!
//! This module defines the `GraphStore` trait and its in-memory `Graph`
//! implementation. All data structures use `BTreeMap` for deterministic
//! ordering. The resolver never writes to the graph: occurrence metadata
//! lives in [`crate::Overlays`].

use crate::vocab::{RDF_TYPE, RDFS_SUBCLASS_OF};
use crate::{Literal, NodeId, Term};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

// =============================================================================
// GRAPHSTORE TRAIT
// =============================================================================

/// Read access to a graph of terms, ordered properties and lists.
///
/// Property values keep insertion order. A node may carry an ordered list of
/// items (an explicit ordered sequence) in addition to its properties.
pub trait GraphStore {
    /// The term stored under `id`.
    fn term(&self, id: NodeId) -> Option<&Term>;

    /// Find the node of a named IRI.
    fn lookup_named(&self, iri: &str) -> Option<NodeId>;

    /// All values of `predicate` on `subject`, in insertion order.
    fn objects(&self, subject: NodeId, predicate: &str) -> &[NodeId];

    /// The ordered items of a list node.
    fn list(&self, id: NodeId) -> Option<&[NodeId]>;

    /// Number of terms in the graph.
    fn node_count(&self) -> usize;

    /// First value of `predicate` on `subject`.
    fn object(&self, subject: NodeId, predicate: &str) -> Option<NodeId> {
        self.objects(subject, predicate).first().copied()
    }

    /// Whether `subject` carries at least one value of `predicate`.
    fn has(&self, subject: NodeId, predicate: &str) -> bool {
        !self.objects(subject, predicate).is_empty()
    }

    /// The IRI of a named node.
    fn iri(&self, id: NodeId) -> Option<&str> {
        self.term(id).and_then(Term::as_iri)
    }

    /// The literal of a literal node.
    fn literal(&self, id: NodeId) -> Option<&Literal> {
        self.term(id).and_then(Term::as_literal)
    }

    /// Whether `predicate` on `subject` is the literal `"true"`.
    fn flag(&self, subject: NodeId, predicate: &str) -> bool {
        self.objects(subject, predicate)
            .iter()
            .any(|&o| self.literal(o).is_some_and(|l| l.value == "true"))
    }

    /// Values of `predicate`, expanding a single list-valued object into its
    /// items.
    fn ordered(&self, subject: NodeId, predicate: &str) -> Vec<NodeId> {
        let objects = self.objects(subject, predicate);
        if let [single] = objects
            && let Some(items) = self.list(*single)
        {
            return items.to_vec();
        }
        objects.to_vec()
    }

    /// The declared `rdf:type` IRIs of a node.
    fn types(&self, id: NodeId) -> Vec<&str> {
        self.objects(id, RDF_TYPE)
            .iter()
            .filter_map(|&t| self.iri(t))
            .collect()
    }

    /// Whether class `sub` equals `sup` or reaches it through `rdfs:subClassOf`.
    ///
    /// Cycles in the class hierarchy are tolerated.
    fn is_subclass_of(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        let Some(start) = self.lookup_named(sub) else {
            return false;
        };
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for &parent in self.objects(current, RDFS_SUBCLASS_OF) {
                if self.iri(parent) == Some(sup) {
                    return true;
                }
                queue.push_back(parent);
            }
        }
        false
    }

    /// Whether any declared type of `id` is `type_iri` or one of its subclasses.
    fn is_a(&self, id: NodeId, type_iri: &str) -> bool {
        self.types(id)
            .iter()
            .any(|t| self.is_subclass_of(t, type_iri))
    }

    /// Human-readable rendering of a node for messages.
    fn display(&self, id: NodeId) -> String {
        self.term(id)
            .map_or_else(|| format!("<unknown node {}>", id.0), ToString::to_string)
    }
}

// =============================================================================
// GRAPH IMPLEMENTATION
// =============================================================================

/// In-memory graph.
///
/// Uses `BTreeMap` exclusively for deterministic ordering.
/// Named nodes and literals are interned: inserting the same IRI or the same
/// literal twice returns the same `NodeId`.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Term arena, indexed by `NodeId`.
    terms: Vec<Term>,

    /// Reverse lookup: IRI -> NodeId
    named_index: BTreeMap<String, NodeId>,

    /// Reverse lookup: blank label -> NodeId
    blank_index: BTreeMap<String, NodeId>,

    /// Reverse lookup: literal -> NodeId
    literal_index: BTreeMap<Literal, NodeId>,

    /// Properties: subject -> predicate -> [objects]
    properties: BTreeMap<NodeId, BTreeMap<String, Vec<NodeId>>>,

    /// Ordered list items: list node -> [items]
    lists: BTreeMap<NodeId, Vec<NodeId>>,

    /// Counter for generated blank labels.
    next_blank: u64,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, term: Term) -> NodeId {
        let id = NodeId(self.terms.len() as u32);
        self.terms.push(term);
        id
    }

    /// Get or create a named node.
    pub fn named(&mut self, iri: &str) -> NodeId {
        if let Some(&id) = self.named_index.get(iri) {
            return id;
        }
        let id = self.push(Term::Named(iri.to_string()));
        self.named_index.insert(iri.to_string(), id);
        id
    }

    /// Create a fresh blank node.
    pub fn blank(&mut self) -> NodeId {
        loop {
            let label = format!("b{}", self.next_blank);
            self.next_blank += 1;
            if !self.blank_index.contains_key(&label) {
                return self.blank_labeled(&label);
            }
        }
    }

    /// Get or create the blank node with the given label.
    pub fn blank_labeled(&mut self, label: &str) -> NodeId {
        if let Some(&id) = self.blank_index.get(label) {
            return id;
        }
        let id = self.push(Term::Blank(label.to_string()));
        self.blank_index.insert(label.to_string(), id);
        id
    }

    /// Get or create a literal node.
    pub fn insert_literal(&mut self, literal: Literal) -> NodeId {
        if let Some(&id) = self.literal_index.get(&literal) {
            return id;
        }
        let id = self.push(Term::Literal(literal.clone()));
        self.literal_index.insert(literal, id);
        id
    }

    /// Get or create a typed literal node.
    pub fn typed(&mut self, value: &str, datatype: &str) -> NodeId {
        self.insert_literal(Literal::new(value, datatype))
    }

    /// Get or create a plain string literal node.
    pub fn string(&mut self, value: &str) -> NodeId {
        self.insert_literal(Literal::string(value))
    }

    /// Get or create a node for an arbitrary term.
    pub fn insert_term(&mut self, term: Term) -> NodeId {
        match term {
            Term::Named(iri) => self.named(&iri),
            Term::Blank(label) => self.blank_labeled(&label),
            Term::Literal(literal) => self.insert_literal(literal),
        }
    }

    /// Append `object` to the values of `predicate` on `subject`.
    pub fn add(&mut self, subject: NodeId, predicate: &str, object: NodeId) {
        self.properties
            .entry(subject)
            .or_default()
            .entry(predicate.to_string())
            .or_default()
            .push(object);
    }

    /// Append a named object, creating it when needed.
    pub fn add_named(&mut self, subject: NodeId, predicate: &str, iri: &str) {
        let object = self.named(iri);
        self.add(subject, predicate, object);
    }

    /// Declare an `rdf:type` of `subject`.
    pub fn add_type(&mut self, subject: NodeId, type_iri: &str) {
        self.add_named(subject, RDF_TYPE, type_iri);
    }

    /// Create a fresh blank list node holding `items`.
    pub fn list_of(&mut self, items: Vec<NodeId>) -> NodeId {
        let id = self.blank();
        self.lists.insert(id, items);
        id
    }

    /// Attach ordered items to an existing node, replacing earlier items.
    pub fn set_list(&mut self, node: NodeId, items: Vec<NodeId>) {
        self.lists.insert(node, items);
    }

    /// All terms with their identifiers, in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Term)> {
        self.terms
            .iter()
            .enumerate()
            .map(|(index, term)| (NodeId(index as u32), term))
    }

    /// All `(subject, predicate, object)` triples in deterministic order.
    pub fn triples(&self) -> impl Iterator<Item = (NodeId, &str, NodeId)> {
        self.properties.iter().flat_map(|(&subject, predicates)| {
            predicates.iter().flat_map(move |(predicate, objects)| {
                objects
                    .iter()
                    .map(move |&object| (subject, predicate.as_str(), object))
            })
        })
    }

    /// All list nodes with their items.
    pub fn lists(&self) -> impl Iterator<Item = (NodeId, &[NodeId])> {
        self.lists.iter().map(|(&id, items)| (id, items.as_slice()))
    }

    /// Number of stored triples.
    #[must_use]
    pub fn triple_count(&self) -> usize {
        self.properties
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }
}

impl GraphStore for Graph {
    fn term(&self, id: NodeId) -> Option<&Term> {
        self.terms.get(id.index())
    }

    fn lookup_named(&self, iri: &str) -> Option<NodeId> {
        self.named_index.get(iri).copied()
    }

    fn objects(&self, subject: NodeId, predicate: &str) -> &[NodeId] {
        self.properties
            .get(&subject)
            .and_then(|predicates| predicates.get(predicate))
            .map_or(&[][..], Vec::as_slice)
    }

    fn list(&self, id: NodeId) -> Option<&[NodeId]> {
        self.lists.get(&id).map(Vec::as_slice)
    }

    fn node_count(&self) -> usize {
        self.terms.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
