//! # Generics Context
//!
//! Per-instantiation bindings of a component's generic type parameters.
//!
//! A binding starts from an explicit instantiation
//! ([`GenericsContext::bind_component_generic_types`]) or from the first value
//! checked against a generic reference. Once bound, every later value must
//! satisfy the bound range, and the binding only ever narrows.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::graph::GraphStore;
use crate::range::check::Observed;
use crate::vocab::OO_PARAMETER_RANGE_GENERIC_BINDINGS;
use crate::{Component, ErrorReport, NodeId, Range, ResolveError};

/// Generic type bindings for one component instantiation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericsContext {
    /// Generic type parameters in scope.
    generic_type_ids: BTreeSet<String>,
    /// Current binding per generic type parameter.
    bindings: BTreeMap<String, Range>,
}

impl GenericsContext {
    /// Create a context with the given generic type parameters in scope.
    pub fn new<I, S>(generic_type_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            generic_type_ids: generic_type_ids.into_iter().map(Into::into).collect(),
            bindings: BTreeMap::new(),
        }
    }

    /// Create a context scoped to a component's generic type parameters.
    pub fn for_component(component: &Component) -> Self {
        Self::new(component.generic_type_parameters.iter().cloned())
    }

    #[must_use]
    pub fn is_in_scope(&self, generic: &str) -> bool {
        self.generic_type_ids.contains(generic)
    }

    /// The current binding of a generic type parameter.
    #[must_use]
    pub fn binding(&self, generic: &str) -> Option<&Range> {
        self.bindings.get(generic)
    }

    /// All current bindings.
    #[must_use]
    pub fn bindings(&self) -> &BTreeMap<String, Range> {
        &self.bindings
    }

    fn out_of_scope(generic: &str) -> ErrorReport {
        ErrorReport::new(format!("Unknown generic type {generic}"))
            .with_context("generic", generic)
    }

    /// Infer the range a value belongs to.
    ///
    /// Absent values infer `undefined`; literals infer their datatype; nodes
    /// infer their declared type (a union when they have several). Typeless
    /// nodes infer nothing.
    pub fn infer_value_range<G: GraphStore>(graph: &G, value: &Observed<'_>) -> Option<Range> {
        match value {
            Observed::Absent => Some(Range::Undefined),
            Observed::Literal(literal) => Some(Range::Literal(literal.datatype.clone())),
            Observed::Node(id) => {
                let mut types: Vec<Range> = graph
                    .types(*id)
                    .into_iter()
                    .map(|t| Range::Type(t.to_string()))
                    .collect();
                match types.len() {
                    0 => None,
                    1 => types.pop(),
                    _ => Some(Range::Union(types)),
                }
            }
        }
    }

    /// Bind `generic` to the range of `value`, or validate `value` against the
    /// existing binding.
    ///
    /// When a binding exists, `validator` must accept it; a compatible value
    /// then narrows the binding to the merge of both ranges when that merge
    /// succeeds. Without a binding, the first inferable range becomes the
    /// binding. The validator may itself bind further generics.
    pub fn bind_generic_type_to_value<G, V>(
        &mut self,
        graph: &G,
        generic: &str,
        value: &Observed<'_>,
        mut validator: V,
    ) -> Result<(), ErrorReport>
    where
        G: GraphStore,
        V: FnMut(&mut Self, &Range) -> Result<(), ErrorReport>,
    {
        if !self.is_in_scope(generic) {
            return Err(Self::out_of_scope(generic));
        }
        let inferred = Self::infer_value_range(graph, value);

        let Some(existing) = self.bindings.get(generic).cloned() else {
            if let Some(range) = inferred {
                trace!(generic, range = %range, "binding generic type to value");
                self.bindings.insert(generic.to_string(), range);
            }
            return Ok(());
        };

        if let Err(cause) = validator(self, &existing) {
            return Err(ErrorReport::new(format!(
                "Generic type {generic} with existing range \"{existing}\" can not be bound to value \"{}\"",
                value.describe(graph)
            ))
            .with_context("generic", generic)
            .with_context("range", existing.to_string())
            .with_cause(cause));
        }

        if let Some(inferred) = inferred
            && let Ok(narrowed) =
                existing.merge_with(&inferred, &|sub, sup| graph.is_subclass_of(sub, sup))
        {
            trace!(generic, range = %narrowed, "narrowing generic type binding");
            self.bindings.insert(generic.to_string(), narrowed);
        }
        Ok(())
    }

    /// Bind `generic` to `range`, merging with any existing binding.
    pub fn bind_generic_type_to_range<G: GraphStore>(
        &mut self,
        graph: &G,
        generic: &str,
        range: &Range,
    ) -> Result<(), ErrorReport> {
        if !self.is_in_scope(generic) {
            return Err(Self::out_of_scope(generic));
        }
        let merged = match self.bindings.get(generic) {
            None => range.clone(),
            Some(existing) => existing
                .merge_with(range, &|sub, sup| graph.is_subclass_of(sub, sup))
                .map_err(|cause| {
                    ErrorReport::new(format!(
                        "Generic type {generic} with existing range \"{existing}\" can not be bound to range \"{range}\""
                    ))
                    .with_context("generic", generic)
                    .with_cause(cause)
                })?,
        };
        trace!(generic, range = %merged, "binding generic type to range");
        self.bindings.insert(generic.to_string(), merged);
        Ok(())
    }

    /// Apply a configuration's explicit generic type instantiations.
    ///
    /// `instances` are positional: the i-th instance binds the component's
    /// i-th generic type parameter. An empty list binds nothing; instances
    /// without a range are skipped.
    pub fn bind_component_generic_types<G: GraphStore>(
        &mut self,
        graph: &G,
        component: &Component,
        instances: &[NodeId],
    ) -> Result<(), ResolveError> {
        if instances.is_empty() {
            return Ok(());
        }
        let declared = &component.generic_type_parameters;
        if instances.len() != declared.len() {
            return Err(ResolveError::GenericArityMismatch {
                component: component.id.clone(),
                expected: declared.len(),
                actual: instances.len(),
            });
        }
        for (generic, &instance) in declared.iter().zip(instances) {
            let Some(range_node) = graph.object(instance, OO_PARAMETER_RANGE_GENERIC_BINDINGS)
            else {
                continue;
            };
            let range = Range::from_graph(graph, range_node)?;
            debug!(generic = %generic, range = %range, component = %component.id, "explicit generic binding");
            self.bind_generic_type_to_range(graph, generic, &range)
                .map_err(|report| ResolveError::GenericBinding {
                    generic: generic.clone(),
                    component: component.id.clone(),
                    report,
                })?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::check::RangeChecker;
    use crate::vocab::xsd;
    use crate::{Graph, Literal};

    fn lit(iri: &str) -> Range {
        Range::Literal(iri.to_string())
    }

    fn bind_value(
        graph: &Graph,
        generics: &mut GenericsContext,
        value: &Observed<'_>,
    ) -> Result<(), ErrorReport> {
        let checker = RangeChecker::new(graph);
        generics.bind_generic_type_to_value(graph, "urn:T", value, |generics, bound| {
            checker.check(value, bound, generics).map(|_| ())
        })
    }

    #[test]
    fn first_value_binds() {
        let graph = Graph::new();
        let mut generics = GenericsContext::new(["urn:T"]);
        let value = Literal::new("1", xsd::NUMBER);
        assert!(bind_value(&graph, &mut generics, &Observed::Literal(&value)).is_ok());
        assert_eq!(generics.binding("urn:T"), Some(&lit(xsd::NUMBER)));
    }

    #[test]
    fn compatible_value_narrows_binding() {
        let graph = Graph::new();
        let mut generics = GenericsContext::new(["urn:T"]);
        let number = Literal::new("1", xsd::NUMBER);
        let integer = Literal::new("2", xsd::INTEGER);
        assert!(bind_value(&graph, &mut generics, &Observed::Literal(&number)).is_ok());
        assert!(bind_value(&graph, &mut generics, &Observed::Literal(&integer)).is_ok());
        assert_eq!(generics.binding("urn:T"), Some(&lit(xsd::INTEGER)));
    }

    #[test]
    fn incompatible_value_fails_and_keeps_binding() {
        let graph = Graph::new();
        let mut generics = GenericsContext::new(["urn:T"]);
        let yes = Literal::new("true", xsd::BOOLEAN);
        let word = Literal::string("WORLD");
        assert!(bind_value(&graph, &mut generics, &Observed::Literal(&yes)).is_ok());
        let report = bind_value(&graph, &mut generics, &Observed::Literal(&word)).err();
        assert!(report.is_some_and(|r| !r.causes.is_empty()));
        assert_eq!(generics.binding("urn:T"), Some(&lit(xsd::BOOLEAN)));
    }

    #[test]
    fn typeless_node_does_not_bind() {
        let mut graph = Graph::new();
        let node = graph.blank();
        let mut generics = GenericsContext::new(["urn:T"]);
        assert!(bind_value(&graph, &mut generics, &Observed::Node(node)).is_ok());
        assert_eq!(generics.binding("urn:T"), None);

        let value = Literal::string("x");
        assert!(bind_value(&graph, &mut generics, &Observed::Literal(&value)).is_ok());
        assert_eq!(generics.binding("urn:T"), Some(&lit(xsd::STRING)));
    }

    #[test]
    fn multi_typed_node_infers_union() {
        let mut graph = Graph::new();
        let node = graph.named("urn:x");
        graph.add_type(node, "urn:A");
        graph.add_type(node, "urn:B");
        assert_eq!(
            GenericsContext::infer_value_range(&graph, &Observed::Node(node)),
            Some(Range::Union(vec![
                Range::Type("urn:A".into()),
                Range::Type("urn:B".into())
            ]))
        );
        assert_eq!(
            GenericsContext::infer_value_range(&graph, &Observed::Absent),
            Some(Range::Undefined)
        );
    }

    #[test]
    fn unknown_generic_is_rejected() {
        let graph = Graph::new();
        let mut generics = GenericsContext::new(["urn:T"]);
        assert!(generics
            .bind_generic_type_to_range(&graph, "urn:U", &Range::Wildcard)
            .is_err());
    }

    #[test]
    fn unknown_generic_value_leaves_bindings_untouched() {
        let graph = Graph::new();
        let mut generics = GenericsContext::new(["urn:T"]);
        assert!(generics.bind_generic_type_to_range(&graph, "urn:T", &lit(xsd::NUMBER)).is_ok());
        let before = generics.bindings().clone();

        let value = Literal::string("x");
        let mut validated = false;
        let report = generics
            .bind_generic_type_to_value(&graph, "urn:U", &Observed::Literal(&value), |_, _| {
                validated = true;
                Ok(())
            })
            .err();
        assert!(report.is_some_and(|r| r.description.contains("Unknown generic type urn:U")));
        assert!(!validated);
        assert_eq!(generics.bindings(), &before);
    }

    #[test]
    fn union_binding_narrows_to_merging_members() {
        let graph = Graph::new();
        let mut generics = GenericsContext::new(["urn:T"]);
        let union = Range::Union(vec![lit(xsd::NUMBER), lit(xsd::BOOLEAN)]);
        assert!(generics.bind_generic_type_to_range(&graph, "urn:T", &union).is_ok());

        let value = Literal::new("1", xsd::INT);
        assert!(bind_value(&graph, &mut generics, &Observed::Literal(&value)).is_ok());
        assert_eq!(generics.binding("urn:T"), Some(&Range::Union(vec![lit(xsd::INT)])));
    }

    #[test]
    fn range_binding_merges() {
        let graph = Graph::new();
        let mut generics = GenericsContext::new(["urn:T"]);
        assert!(generics.bind_generic_type_to_range(&graph, "urn:T", &lit(xsd::NUMBER)).is_ok());
        assert!(generics.bind_generic_type_to_range(&graph, "urn:T", &lit(xsd::SHORT)).is_ok());
        assert_eq!(generics.binding("urn:T"), Some(&lit(xsd::SHORT)));
        assert!(generics.bind_generic_type_to_range(&graph, "urn:T", &lit(xsd::STRING)).is_err());
        assert_eq!(generics.binding("urn:T"), Some(&lit(xsd::SHORT)));
    }
}
