//! # Parameter Ranges
//!
//! The range lattice: the set of value shapes a parameter accepts.
//!
//! Ranges are read from the graph once ([`Range::from_graph`]) and then
//! combined with [`Range::merge`], which computes the narrower of two ranges
//! or reports why they cannot be combined.
//!
//! ## Merge Rules
//!
//! | Left | Right | Result |
//! |------|-------|--------|
//! | wildcard | any | right |
//! | generic reference | any | right |
//! | undefined | undefined | undefined |
//! | literal | literal | narrower datatype |
//! | type | type | subtype |
//! | union / intersection / tuple | same kind, same length | positional merge |
//! | array / rest / keyof | same kind | inner merge |
//! | union | other | union of the members that merge |
//!
//! Every rule is symmetric; the left operand wins ties.

pub mod check;
pub mod literal;

use std::fmt;

use crate::graph::GraphStore;
use crate::vocab::{
    MAX_RANGE_DEPTH, OO_RANGE_ARRAY, OO_RANGE_ELEMENTS, OO_RANGE_GENERIC_TYPE,
    OO_RANGE_GENERIC_TYPE_REFERENCE, OO_RANGE_INTERSECTION, OO_RANGE_KEYOF, OO_RANGE_REST,
    OO_RANGE_TUPLE, OO_RANGE_UNDEFINED, OO_RANGE_UNION, OO_RANGE_VALUE, OO_RANGE_WILDCARD,
};
use crate::{ErrorReport, NodeId, ResolveError};

// =============================================================================
// RANGE
// =============================================================================

/// The accepted shape of a parameter value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Range {
    /// Accepts anything.
    Wildcard,
    /// Accepts only the absent value.
    Undefined,
    /// A literal datatype IRI.
    Literal(String),
    /// A component type IRI.
    Type(String),
    /// A placeholder bound through the generics context.
    GenericTypeReference(String),
    Union(Vec<Range>),
    Intersection(Vec<Range>),
    Tuple(Vec<Range>),
    Array(Box<Range>),
    /// Variadic tail of a tuple.
    Rest(Box<Range>),
    /// The keys of a record type.
    Keyof(Box<Range>),
}

/// Kind of an n-ary composition, used in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Composition {
    Union,
    Intersection,
    Tuple,
}

impl Composition {
    const fn name(self) -> &'static str {
        match self {
            Self::Union => "union",
            Self::Intersection => "intersection",
            Self::Tuple => "tuple",
        }
    }

    fn build(self, members: Vec<Range>) -> Range {
        match self {
            Self::Union => Range::Union(members),
            Self::Intersection => Range::Intersection(members),
            Self::Tuple => Range::Tuple(members),
        }
    }
}

impl Range {
    /// Read the range described at `node`.
    ///
    /// A named node whose IRI is a datatype becomes a literal range; any other
    /// named node is a component type. Blank nodes must carry one of the
    /// range kinds as their `rdf:type`.
    pub fn from_graph<G: GraphStore>(graph: &G, node: NodeId) -> Result<Self, ResolveError> {
        Self::read(graph, node, 0)
    }

    fn read<G: GraphStore>(graph: &G, node: NodeId, depth: usize) -> Result<Self, ResolveError> {
        let invalid = |message: &str| ResolveError::InvalidDefinition {
            node: graph.display(node),
            message: message.to_string(),
        };
        if depth > MAX_RANGE_DEPTH {
            return Err(invalid("range nesting is too deep"));
        }

        let types = graph.types(node);
        let has_type = |iri: &str| types.contains(&iri);

        if has_type(OO_RANGE_WILDCARD) {
            return Ok(Self::Wildcard);
        }
        if has_type(OO_RANGE_UNDEFINED) {
            return Ok(Self::Undefined);
        }
        if has_type(OO_RANGE_GENERIC_TYPE_REFERENCE) {
            let generic = graph
                .object(node, OO_RANGE_GENERIC_TYPE)
                .and_then(|g| graph.iri(g))
                .ok_or_else(|| invalid("generic type reference without a generic type"))?;
            return Ok(Self::GenericTypeReference(generic.to_string()));
        }
        for (kind_iri, kind) in [
            (OO_RANGE_UNION, Composition::Union),
            (OO_RANGE_INTERSECTION, Composition::Intersection),
            (OO_RANGE_TUPLE, Composition::Tuple),
        ] {
            if has_type(kind_iri) {
                let members = graph
                    .ordered(node, OO_RANGE_ELEMENTS)
                    .into_iter()
                    .map(|member| Self::read(graph, member, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(kind.build(members));
            }
        }
        for kind_iri in [OO_RANGE_ARRAY, OO_RANGE_REST, OO_RANGE_KEYOF] {
            if has_type(kind_iri) {
                let value = graph
                    .object(node, OO_RANGE_VALUE)
                    .ok_or_else(|| invalid("range without a parameterRangeValue"))?;
                let inner = Box::new(Self::read(graph, value, depth + 1)?);
                return Ok(match kind_iri {
                    OO_RANGE_ARRAY => Self::Array(inner),
                    OO_RANGE_REST => Self::Rest(inner),
                    _ => Self::Keyof(inner),
                });
            }
        }

        match graph.iri(node) {
            Some(iri) if literal::is_datatype(iri) => Ok(Self::Literal(iri.to_string())),
            Some(iri) => Ok(Self::Type(iri.to_string())),
            None => Err(invalid("unknown range kind")),
        }
    }

    // =========================================================================
    // MERGE
    // =========================================================================

    /// Merge two ranges without a type hierarchy: component types merge only
    /// when equal.
    pub fn merge(&self, other: &Range) -> Result<Range, ErrorReport> {
        self.merge_with(other, &|sub, sup| sub == sup)
    }

    /// Merge two ranges, resolving component types with `is_subtype`.
    ///
    /// The result is the narrower range. Fails with a conflict report when
    /// the ranges are incompatible.
    pub fn merge_with(
        &self,
        other: &Range,
        is_subtype: &dyn Fn(&str, &str) -> bool,
    ) -> Result<Range, ErrorReport> {
        match (self, other) {
            (Self::Wildcard | Self::GenericTypeReference(_), _) => Ok(other.clone()),
            (_, Self::Wildcard | Self::GenericTypeReference(_)) => Ok(self.clone()),
            (Self::Undefined, Self::Undefined) => Ok(Self::Undefined),
            (Self::Literal(a), Self::Literal(b)) => literal::merge_datatypes(a, b)
                .map(|narrower| Self::Literal(narrower.to_string()))
                .ok_or_else(|| self.conflict(other)),
            (Self::Type(a), Self::Type(b)) => {
                if is_subtype(a, b) {
                    Ok(self.clone())
                } else if is_subtype(b, a) {
                    Ok(other.clone())
                } else {
                    Err(self.conflict(other))
                }
            }
            (Self::Union(a), Self::Union(b)) => self.positional(other, Composition::Union, a, b, is_subtype),
            (Self::Intersection(a), Self::Intersection(b)) => {
                self.positional(other, Composition::Intersection, a, b, is_subtype)
            }
            (Self::Tuple(a), Self::Tuple(b)) => self.positional(other, Composition::Tuple, a, b, is_subtype),
            (Self::Array(a), Self::Array(b)) => self.inner(other, a, b, is_subtype).map(Self::Array),
            (Self::Rest(a), Self::Rest(b)) => self.inner(other, a, b, is_subtype).map(Self::Rest),
            (Self::Keyof(a), Self::Keyof(b)) => self.inner(other, a, b, is_subtype).map(Self::Keyof),
            (Self::Union(members), _) => {
                self.absorb(other, members, |member| member.merge_with(other, is_subtype))
            }
            (_, Self::Union(members)) => {
                self.absorb(other, members, |member| self.merge_with(member, is_subtype))
            }
            _ => Err(self.conflict(other)),
        }
    }

    fn conflict(&self, other: &Range) -> ErrorReport {
        ErrorReport::new(format!("Unable to merge ranges \"{self}\" and \"{other}\""))
            .with_context("left", self.to_string())
            .with_context("right", other.to_string())
    }

    fn positional(
        &self,
        other: &Range,
        kind: Composition,
        a: &[Range],
        b: &[Range],
        is_subtype: &dyn Fn(&str, &str) -> bool,
    ) -> Result<Range, ErrorReport> {
        if a.len() != b.len() {
            return Err(self.conflict(other).with_context(
                "reason",
                format!("{} lengths differ: {} and {}", kind.name(), a.len(), b.len()),
            ));
        }
        let mut merged = Vec::with_capacity(a.len());
        for (left, right) in a.iter().zip(b) {
            match left.merge_with(right, is_subtype) {
                Ok(range) => merged.push(range),
                Err(cause) => return Err(self.conflict(other).with_cause(cause)),
            }
        }
        Ok(kind.build(merged))
    }

    fn inner(
        &self,
        other: &Range,
        a: &Range,
        b: &Range,
        is_subtype: &dyn Fn(&str, &str) -> bool,
    ) -> Result<Box<Range>, ErrorReport> {
        a.merge_with(b, is_subtype)
            .map(Box::new)
            .map_err(|cause| self.conflict(other).with_cause(cause))
    }

    fn absorb(
        &self,
        other: &Range,
        members: &[Range],
        mut merge_member: impl FnMut(&Range) -> Result<Range, ErrorReport>,
    ) -> Result<Range, ErrorReport> {
        let mut merged = Vec::with_capacity(members.len());
        let mut causes = Vec::new();
        for member in members {
            match merge_member(member) {
                Ok(range) => merged.push(range),
                Err(cause) => causes.push(cause),
            }
        }
        if merged.is_empty() {
            return Err(self.conflict(other).with_causes(causes));
        }
        Ok(Self::Union(merged))
    }
}

fn join(f: &mut fmt::Formatter<'_>, members: &[Range], separator: &str) -> fmt::Result {
    for (index, member) in members.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{member}")?;
    }
    Ok(())
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str("*"),
            Self::Undefined => f.write_str("undefined"),
            Self::Literal(iri) | Self::Type(iri) => f.write_str(iri),
            Self::GenericTypeReference(id) => write!(f, "<{id}>"),
            Self::Union(members) => join(f, members, " | "),
            Self::Intersection(members) => join(f, members, " & "),
            Self::Tuple(members) => {
                f.write_str("[")?;
                join(f, members, ", ")?;
                f.write_str("]")
            }
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::Rest(inner) => write!(f, "...{inner}"),
            Self::Keyof(inner) => write!(f, "keyof {inner}"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
