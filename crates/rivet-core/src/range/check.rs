//! # Range Checking
//!
//! Validates one observed parameter value against a [`Range`], casting
//! literals to their native value on the way.

use tracing::trace;

use super::{Range, literal};
use crate::graph::GraphStore;
use crate::range::literal::Scalar;
use crate::{ErrorReport, GenericsContext, Literal, NodeId};

// =============================================================================
// OBSERVED VALUES
// =============================================================================

/// A value as the range checker sees it.
///
/// Literal values may come from the graph or from a variable substitution,
/// so they are carried by reference rather than by node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observed<'a> {
    /// No value.
    Absent,
    /// A literal value.
    Literal(&'a Literal),
    /// A named or blank node.
    Node(NodeId),
}

impl<'a> Observed<'a> {
    /// Observe a graph node as-is.
    pub fn of<G: GraphStore>(graph: &'a G, id: NodeId) -> Self {
        match graph.literal(id) {
            Some(literal) => Self::Literal(literal),
            None => Self::Node(id),
        }
    }

    /// Render the value for messages.
    pub fn describe<G: GraphStore>(&self, graph: &G) -> String {
        match self {
            Self::Absent => "undefined".to_string(),
            Self::Literal(literal) => literal.value.clone(),
            Self::Node(id) => graph.display(*id),
        }
    }
}

// =============================================================================
// RANGE CHECKER
// =============================================================================

/// Checks values against ranges.
///
/// Checking a generic type reference binds or validates the generic in the
/// supplied [`GenericsContext`], so checks are not side-effect free.
#[derive(Debug, Clone, Copy)]
pub struct RangeChecker<'g, G> {
    graph: &'g G,
}

impl<'g, G: GraphStore> RangeChecker<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// Check `value` against `range`.
    ///
    /// Returns the cast value for literal ranges that define one, `None` when
    /// the value passes through untouched.
    pub fn check(
        &self,
        value: &Observed<'_>,
        range: &Range,
        generics: &mut GenericsContext,
    ) -> Result<Option<Scalar>, ErrorReport> {
        trace!(range = %range, "checking value");
        match range {
            Range::Wildcard => Ok(None),
            Range::Undefined => match value {
                Observed::Absent => Ok(None),
                _ => Err(self.mismatch(value, range, "value must be undefined")),
            },
            Range::Literal(datatype) => match value {
                Observed::Literal(literal) => literal::cast(literal, datatype)
                    .map_err(|reason| self.mismatch(value, range, &reason)),
                _ => Err(self.mismatch(value, range, "value is not a literal")),
            },
            Range::Type(iri) => match value {
                Observed::Node(id) if self.graph.is_a(*id, iri) => Ok(None),
                Observed::Node(_) => Err(self.mismatch(value, range, "value is not of this type")),
                _ => Err(self.mismatch(value, range, "value is not a node")),
            },
            Range::GenericTypeReference(generic) => {
                let failed = |cause: ErrorReport| {
                    self.mismatch(value, range, "generic type binding failed")
                        .with_cause(cause)
                };
                let mut cast = None;
                let mut validated = false;
                generics
                    .bind_generic_type_to_value(self.graph, generic, value, |generics, bound| {
                        validated = true;
                        cast = self.check(value, bound, generics)?;
                        Ok(())
                    })
                    .map_err(failed)?;
                // A value that created the binding is cast against it.
                if !validated && let Some(bound) = generics.binding(generic).cloned() {
                    cast = self.check(value, &bound, generics).map_err(failed)?;
                }
                Ok(cast)
            }
            Range::Union(members) => {
                let mut causes = Vec::with_capacity(members.len());
                for member in members {
                    match self.check(value, member, generics) {
                        Ok(cast) => return Ok(cast),
                        Err(cause) => causes.push(cause),
                    }
                }
                Err(self
                    .mismatch(value, range, "no union member accepts the value")
                    .with_causes(causes))
            }
            Range::Intersection(members) => {
                let mut cast = None;
                for member in members {
                    let member_cast = self.check(value, member, generics).map_err(|cause| {
                        self.mismatch(value, range, "an intersection member rejects the value")
                            .with_cause(cause)
                    })?;
                    cast = cast.or(member_cast);
                }
                Ok(cast)
            }
            Range::Array(inner) => {
                let items = self.items(value, range)?;
                for item in items {
                    self.check(&item, inner, generics).map_err(|cause| {
                        self.mismatch(value, range, "an array element is rejected")
                            .with_cause(cause)
                    })?;
                }
                Ok(None)
            }
            Range::Tuple(members) => self.check_tuple(value, range, members, generics),
            Range::Rest(inner) => self.check(value, inner, generics),
            Range::Keyof(_) => match value {
                Observed::Literal(_) => Ok(None),
                _ => Err(self.mismatch(value, range, "a key must be a literal")),
            },
        }
    }

    fn check_tuple(
        &self,
        value: &Observed<'_>,
        range: &Range,
        members: &[Range],
        generics: &mut GenericsContext,
    ) -> Result<Option<Scalar>, ErrorReport> {
        let items = self.items(value, range)?;
        let mut position = 0;
        for member in members {
            if let Range::Rest(inner) = member {
                for item in &items[position.min(items.len())..] {
                    self.check(item, inner, generics).map_err(|cause| {
                        self.mismatch(value, range, "a rest element is rejected")
                            .with_cause(cause)
                    })?;
                }
                return Ok(None);
            }
            let item = items.get(position).copied().unwrap_or(Observed::Absent);
            self.check(&item, member, generics).map_err(|cause| {
                self.mismatch(value, range, "a tuple element is rejected")
                    .with_cause(cause)
                    .with_context("position", position)
            })?;
            position += 1;
        }
        if items.len() > members.len() {
            return Err(self
                .mismatch(value, range, "too many tuple elements")
                .with_context("expected", members.len())
                .with_context("actual", items.len()));
        }
        Ok(None)
    }

    fn items(&self, value: &Observed<'_>, range: &Range) -> Result<Vec<Observed<'g>>, ErrorReport> {
        let list = match value {
            Observed::Node(id) => self.graph.list(*id),
            _ => None,
        };
        list.map(|items| items.iter().map(|&item| Observed::of(self.graph, item)).collect())
            .ok_or_else(|| self.mismatch(value, range, "value is not a list"))
    }

    fn mismatch(&self, value: &Observed<'_>, range: &Range, reason: &str) -> ErrorReport {
        let described = value.describe(self.graph);
        ErrorReport::new(format!(
            "The value \"{described}\" is not of range \"{range}\""
        ))
        .with_context("value", described)
        .with_context("range", range.to_string())
        .with_context("reason", reason)
    }
}

// =============================================================================
// TESTS
// =============================================================================
