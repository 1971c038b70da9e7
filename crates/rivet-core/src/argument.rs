//! # Resolved Arguments
//!
//! The output of resolution: constructor argument trees and the instance
//! table they point into.

use std::fmt;

use serde::Serialize;

use crate::range::literal::Scalar;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Index of an instance in a [`ResolutionPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct InstanceId(pub u32);

impl InstanceId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// ARGUMENTS
// =============================================================================

/// One resolved constructor argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Argument {
    /// Explicit placeholder for an absent value.
    Undefined,
    Literal(Scalar),
    /// A named node that is not a component configuration.
    Iri(String),
    /// Another resolved instance.
    Instance(InstanceId),
    /// A deferred value, constructed only when invoked.
    Lazy(Box<Argument>),
    List(Vec<Argument>),
    Map(Vec<Entry>),
}

/// A keyed entry of a map argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub key: String,
    pub value: Argument,
}

impl Entry {
    #[must_use]
    pub fn new(key: impl Into<String>, value: Argument) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl Argument {
    /// A string literal argument.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Scalar::String(value.into()))
    }

    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Look up a map entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Argument> {
        match self {
            Self::Map(entries) => entries.iter().find(|e| e.key == key).map(|e| &e.value),
            _ => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Literal(scalar) => write!(f, "{scalar}"),
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Instance(id) => write!(f, "{id}"),
            Self::Lazy(inner) => write!(f, "lazy({inner})"),
            Self::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (index, entry) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", entry.key, entry.value)?;
                }
                f.write_str("}")
            }
        }
    }
}

// =============================================================================
// PLAN
// =============================================================================

/// How to build one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstancePlan {
    /// The configuration node.
    pub config: String,
    /// The component it instantiates.
    pub component: String,
    /// Positional constructor arguments.
    pub arguments: Vec<Argument>,
}

/// Every instance reachable from one root configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionPlan {
    pub root: InstanceId,
    pub instances: Vec<InstancePlan>,
}

impl ResolutionPlan {
    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&InstancePlan> {
        self.instances.get(id.index())
    }

    /// The plan of the root configuration.
    #[must_use]
    pub fn root_plan(&self) -> Option<&InstancePlan> {
        self.get(self.root)
    }
}
