//! # Parameter Property Pipeline
//!
//! Ordered stages that turn the raw values of one parameter into the values
//! passed to the constructor.
//!
//! ## Stages
//!
//! | Stage | Applies when | Effect |
//! |-------|--------------|--------|
//! | DefaultScoped | no values, scoped defaults declared | append defaults whose scope the root satisfies |
//! | Default | no values, defaults declared | take the defaults |
//! | Fixed | fixed values declared | append the fixed values |
//! | Variable | values present | substitute variable nodes |
//! | Range | range declared, values present | validate and cast |
//! | Lazy | parameter is lazy | mark every value as deferred |
//! | Unique | parameter is unique | keep a private copy of the first value |
//! | Required | parameter is required, no values | fail |
//!
//! Every stage runs at most once, in this order. Whether a stage applies is
//! decided on the values left by the previous stage.

use std::fmt;

use tracing::trace;

use crate::graph::GraphStore;
use crate::overlay::{Overlays, ValueRef};
use crate::range::check::{Observed, RangeChecker};
use crate::vocab::{OM_VARIABLE, OO_DEFAULT_SCOPE, OO_DEFAULT_SCOPED_VALUE};
use crate::{GenericsContext, NodeId, Parameter, Range, ResolveError, Variables};

// =============================================================================
// CONTEXT
// =============================================================================

/// Mutable state the stages read and write.
pub struct PipelineContext<'a, G> {
    pub graph: &'a G,
    pub overlays: &'a mut Overlays,
    pub generics: &'a mut GenericsContext,
    pub variables: &'a Variables,
}

/// The configuration a parameter is resolved for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site<'p> {
    /// Root configuration; scopes of scoped defaults are checked against it.
    pub config_root: NodeId,
    /// Node the values are read from.
    pub config_element: NodeId,
    pub parameter: &'p Parameter,
}

// =============================================================================
// STAGES
// =============================================================================

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterProperty {
    DefaultScoped,
    Default,
    Fixed,
    Variable,
    Range,
    Lazy,
    Unique,
    Required,
}

impl ParameterProperty {
    /// All stages in application order.
    pub const PIPELINE: [ParameterProperty; 8] = [
        Self::DefaultScoped,
        Self::Default,
        Self::Fixed,
        Self::Variable,
        Self::Range,
        Self::Lazy,
        Self::Unique,
        Self::Required,
    ];

    /// Get the stage name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DefaultScoped => "defaultScoped",
            Self::Default => "default",
            Self::Fixed => "fixed",
            Self::Variable => "variable",
            Self::Range => "range",
            Self::Lazy => "lazy",
            Self::Unique => "unique",
            Self::Required => "required",
        }
    }

    /// Whether this stage applies to `values` of `parameter`.
    #[must_use]
    pub fn applies(&self, values: &[ValueRef], parameter: &Parameter) -> bool {
        match self {
            Self::DefaultScoped => values.is_empty() && !parameter.default_scoped.is_empty(),
            Self::Default => values.is_empty() && !parameter.default.is_empty(),
            Self::Fixed => !parameter.fixed.is_empty(),
            Self::Variable => !values.is_empty(),
            Self::Range => parameter.range.is_some() && !values.is_empty(),
            Self::Lazy => parameter.lazy && !values.is_empty(),
            Self::Unique => parameter.unique && !values.is_empty(),
            Self::Required => parameter.required && values.is_empty(),
        }
    }

    /// Apply this stage.
    pub fn apply<G: GraphStore>(
        &self,
        cx: &mut PipelineContext<'_, G>,
        values: Vec<ValueRef>,
        site: &Site<'_>,
    ) -> Result<Vec<ValueRef>, ResolveError> {
        match self {
            Self::DefaultScoped => apply_default_scoped(cx, values, site),
            Self::Default => Ok(site
                .parameter
                .default
                .iter()
                .map(|&value| ValueRef::new(value))
                .collect()),
            Self::Fixed => {
                let mut values = values;
                values.extend(site.parameter.fixed.iter().map(|&value| ValueRef::new(value)));
                Ok(values)
            }
            Self::Variable => apply_variables(cx, values),
            Self::Range => match &site.parameter.range {
                Some(range) => apply_range(cx, values, range, site),
                None => Ok(values),
            },
            Self::Lazy => Ok(values
                .into_iter()
                .map(|value| cx.overlays.annotate(value, |o| o.lazy = true))
                .collect()),
            Self::Unique => Ok(values
                .into_iter()
                .take(1)
                .map(|value| cx.overlays.annotate(value, |o| o.unique = true))
                .collect()),
            Self::Required => Err(ResolveError::RequiredParameterMissing {
                parameter: site.parameter.id.clone(),
                config: cx.graph.display(site.config_element),
            }),
        }
    }
}

impl fmt::Display for ParameterProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run every applicable stage over `values`.
pub fn run<G: GraphStore>(
    cx: &mut PipelineContext<'_, G>,
    values: Vec<ValueRef>,
    site: &Site<'_>,
) -> Result<Vec<ValueRef>, ResolveError> {
    let mut values = values;
    for stage in ParameterProperty::PIPELINE {
        if stage.applies(&values, site.parameter) {
            trace!(stage = %stage, parameter = %site.parameter.id, count = values.len(), "applying stage");
            values = stage.apply(cx, values, site)?;
        }
    }
    Ok(values)
}

// =============================================================================
// STAGE IMPLEMENTATIONS
// =============================================================================

fn apply_default_scoped<G: GraphStore>(
    cx: &mut PipelineContext<'_, G>,
    values: Vec<ValueRef>,
    site: &Site<'_>,
) -> Result<Vec<ValueRef>, ResolveError> {
    let graph = cx.graph;
    let invalid = |message: &str| ResolveError::InvalidDefinition {
        node: site.parameter.id.clone(),
        message: message.to_string(),
    };
    let mut values = values;
    for &entry in &site.parameter.default_scoped {
        let scopes = graph.objects(entry, OO_DEFAULT_SCOPE);
        if scopes.is_empty() {
            return Err(invalid("Invalid defaultScoped value: missing defaultScope"));
        }
        let scoped = graph.objects(entry, OO_DEFAULT_SCOPED_VALUE);
        if scoped.is_empty() {
            return Err(invalid("Invalid defaultScoped value: missing defaultScopedValue"));
        }
        let in_scope = scopes
            .iter()
            .filter_map(|&scope| graph.iri(scope))
            .any(|scope| graph.is_a(site.config_root, scope));
        if in_scope {
            values.extend(scoped.iter().map(|&value| ValueRef::new(value)));
        }
    }
    Ok(values)
}

fn apply_variables<G: GraphStore>(
    cx: &mut PipelineContext<'_, G>,
    values: Vec<ValueRef>,
) -> Result<Vec<ValueRef>, ResolveError> {
    let graph = cx.graph;
    let mut substituted = Vec::with_capacity(values.len());
    for value in values {
        if !graph.is_a(value.source, OM_VARIABLE) {
            substituted.push(value);
            continue;
        }
        let name = graph.display(value.source);
        let literal = cx
            .variables
            .get(&name)
            .ok_or_else(|| ResolveError::UndefinedVariable(name.clone()))?
            .clone();
        trace!(variable = %name, value = %literal.value, "substituting variable");
        substituted.push(cx.overlays.annotate(value, |o| o.literal = Some(literal)));
    }
    Ok(substituted)
}

fn apply_range<G: GraphStore>(
    cx: &mut PipelineContext<'_, G>,
    values: Vec<ValueRef>,
    range: &Range,
    site: &Site<'_>,
) -> Result<Vec<ValueRef>, ResolveError> {
    let checker = RangeChecker::new(cx.graph);
    let mut checked = Vec::with_capacity(values.len());
    for value in values {
        let observed = cx.overlays.observe(cx.graph, value);
        let lexical = match observed {
            Observed::Literal(literal) => Some(literal.value.clone()),
            _ => None,
        };
        match checker.check(&observed, range, cx.generics) {
            Ok(None) => checked.push(value),
            Ok(Some(scalar)) => checked.push(cx.overlays.annotate(value, |o| o.cast = Some(scalar))),
            Err(report) => {
                return Err(match (lexical, range) {
                    (Some(value), Range::Literal(_)) => ResolveError::InvalidLiteral {
                        value,
                        range: range.to_string(),
                        parameter: site.parameter.id.clone(),
                    },
                    _ => ResolveError::RangeConflict {
                        parameter: site.parameter.id.clone(),
                        report,
                    },
                });
            }
        }
    }
    Ok(checked)
}

// =============================================================================
// TESTS
// =============================================================================
