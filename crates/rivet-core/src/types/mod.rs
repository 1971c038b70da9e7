//! # Core Type Definitions
//!
//! This module contains the core types shared by every Rivet stage:
//! - Graph identifiers and terms (`NodeId`, `Term`, `Literal`)
//! - Variable bindings (`Variables`)
//! - Structured error reports (`ErrorReport`)
//! - Error types (`ResolveError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Implement `Ord` where they key a `BTreeMap`/`BTreeSet`
//! - Render the same text for the same input on every run

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::vocab::xsd;

// =============================================================================
// GRAPH IDENTIFIERS
// =============================================================================

/// Unique identifier for a term in the graph arena.
///
/// Identifiers are dense indices handed out by [`crate::Graph`] in insertion
/// order. They are only meaningful for the graph that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// TERMS
// =============================================================================

/// A literal value with its datatype and optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Lexical form.
    pub value: String,
    /// Datatype IRI.
    pub datatype: String,
    /// Language tag, only set for language-tagged strings.
    pub language: Option<String>,
}

impl Literal {
    /// Create a typed literal.
    #[must_use]
    pub fn new(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// Create a plain `xsd:string` literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(value, xsd::STRING)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.language {
            Some(language) => write!(f, "\"{}\"@{}", self.value, language),
            None => write!(f, "\"{}\"^^<{}>", self.value, self.datatype),
        }
    }
}

/// A term in the graph: a named node, a blank node or a literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    /// A node identified by an IRI.
    Named(String),
    /// An anonymous node, identified by a document-local label.
    Blank(String),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// The IRI of a named node.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Named(iri) => Some(iri),
            _ => None,
        }
    }

    /// The literal of a literal term.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(iri) => f.write_str(iri),
            Self::Blank(label) => write!(f, "_:{label}"),
            Self::Literal(literal) => literal.fmt(f),
        }
    }
}

// =============================================================================
// VARIABLES
// =============================================================================

/// Values supplied for variable nodes at resolution time, keyed by the
/// variable's IRI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, Literal>,
}

impl Variables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable to a literal value. Replaces any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: Literal) {
        self.values.insert(name.into(), value);
    }

    /// Bind a variable to a plain string value.
    pub fn insert_str(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.insert(name, Literal::string(value));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Literal> {
        self.values.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Literal)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, Literal)>>(iter: I) -> Self {
        let mut variables = Self::new();
        for (name, value) in iter {
            variables.insert(name, value);
        }
        variables
    }
}

// =============================================================================
// ERROR REPORTS
// =============================================================================

/// Structured description of a failure.
///
/// Reports nest: a failure caused by other failures keeps them as `causes`,
/// so a union mismatch lists why every member was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{description}")]
pub struct ErrorReport {
    /// Human-readable summary.
    pub description: String,
    /// Named context values (ranges, values, parameter identifiers).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, serde_json::Value>,
    /// Underlying failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<ErrorReport>,
}

impl ErrorReport {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            context: BTreeMap::new(),
            causes: Vec::new(),
        }
    }

    /// Attach a context value.
    #[must_use]
    pub fn with_context(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attach one underlying failure.
    #[must_use]
    pub fn with_cause(mut self, cause: ErrorReport) -> Self {
        self.causes.push(cause);
        self
    }

    /// Attach several underlying failures, keeping their order.
    #[must_use]
    pub fn with_causes(mut self, causes: impl IntoIterator<Item = ErrorReport>) -> Self {
        self.causes.extend(causes);
        self
    }

    /// Render the report and its causes as an indented tree.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push_str(&self.description);
        out.push('\n');
        for (key, value) in &self.context {
            let value = match value {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            out.push_str(&format!("{indent}  {key}: {value}\n"));
        }
        for cause in &self.causes {
            cause.render_into(out, depth + 1);
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while resolving a configuration.
///
/// - No silent failures
/// - Use `Result<T, ResolveError>` for fallible operations
/// - The core never panics; every failure is returned to the caller
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A constructor argument definition does not have a legal shape.
    #[error("Invalid constructor arguments at {node}: {message}")]
    Shape { node: String, message: String },

    /// A component, parameter or range description is malformed.
    #[error("Invalid definition of {node}: {message}")]
    InvalidDefinition { node: String, message: String },

    /// A required parameter received no value.
    #[error("Required parameter missing: no value for \"{parameter}\" in config \"{config}\"")]
    RequiredParameterMissing { parameter: String, config: String },

    /// A literal value does not satisfy its literal range.
    #[error(
        "Parameter value \"{value}\" is not of required range type \"{range}\" for parameter \"{parameter}\""
    )]
    InvalidLiteral {
        value: String,
        range: String,
        parameter: String,
    },

    /// A value does not satisfy its parameter range.
    #[error("The value for parameter \"{parameter}\" does not match its range: {report}")]
    RangeConflict {
        parameter: String,
        report: ErrorReport,
    },

    /// A variable node has no supplied value.
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    /// A configuration supplies a different number of generic instances than
    /// its component declares.
    #[error(
        "Invalid generic type instantiation: component \"{component}\" declares {expected} generic type parameters, but {actual} were given"
    )]
    GenericArityMismatch {
        component: String,
        expected: usize,
        actual: usize,
    },

    /// An explicit generic binding conflicts with the current binding.
    #[error("Invalid binding for generic type {generic} of component \"{component}\": {report}")]
    GenericBinding {
        generic: String,
        component: String,
        report: ErrorReport,
    },

    /// None of the node's types is a known component.
    #[error("Config \"{0}\" does not instantiate a known component")]
    NotAComponent(String),

    /// The requested node is not in the graph.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A configuration depends on itself without a lazy edge in between.
    #[error("Cyclic reference to {0}")]
    CyclicReference(String),

    /// Nesting exceeded the configured limit.
    #[error("Resolution depth limit {limit} exceeded at {node}")]
    DepthExceeded { limit: usize, node: String },

    /// A caller-supplied instantiator failed.
    #[error("Instantiation failed: {0}")]
    Instantiation(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl ResolveError {
    /// Render this error as a structured report.
    ///
    /// Errors that wrap a report keep it as the single cause.
    #[must_use]
    pub fn report(&self) -> ErrorReport {
        let base = ErrorReport::new(self.to_string());
        match self {
            Self::Shape { node, .. } | Self::InvalidDefinition { node, .. } => {
                base.with_context("node", node.as_str())
            }
            Self::RequiredParameterMissing { parameter, config } => base
                .with_context("parameter", parameter.as_str())
                .with_context("config", config.as_str()),
            Self::InvalidLiteral {
                value,
                range,
                parameter,
            } => base
                .with_context("value", value.as_str())
                .with_context("range", range.as_str())
                .with_context("parameter", parameter.as_str()),
            Self::RangeConflict { parameter, report } => ErrorReport::new(format!(
                "The value for parameter \"{parameter}\" does not match its range"
            ))
            .with_context("parameter", parameter.as_str())
            .with_cause(report.clone()),
            Self::UndefinedVariable(name) => base.with_context("variable", name.as_str()),
            Self::GenericArityMismatch {
                component,
                expected,
                actual,
            } => base
                .with_context("component", component.as_str())
                .with_context("expected", *expected)
                .with_context("actual", *actual),
            Self::GenericBinding {
                generic,
                component,
                report,
            } => ErrorReport::new(format!(
                "Invalid binding for generic type {generic} of component \"{component}\""
            ))
            .with_context("generic", generic.as_str())
            .with_context("component", component.as_str())
            .with_cause(report.clone()),
            Self::NotAComponent(node) | Self::NodeNotFound(node) | Self::CyclicReference(node) => {
                base.with_context("node", node.as_str())
            }
            Self::DepthExceeded { limit, node } => base
                .with_context("limit", *limit)
                .with_context("node", node.as_str()),
            Self::Instantiation(_)
            | Self::SerializationError(_)
            | Self::DeserializationError(_)
            | Self::IoError(_) => base,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
