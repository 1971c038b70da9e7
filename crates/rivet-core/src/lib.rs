//! # rivet-core
//!
//! The deterministic resolution engine for Rivet - THE LOGIC.
//!
//! Rivet is declarative dependency injection: components, their parameters
//! and the configurations that instantiate them are nodes of a graph. This
//! crate walks that graph and produces, for one root configuration, an
//! ordered, fully-resolved constructor argument tree for every instance it
//! reaches.
//!
//! ## Stages
//!
//! - `graph`: the read-only term graph (`GraphStore`, `Graph`)
//! - `component` / `parameter`: component and parameter definitions
//! - `range`: the parameter range lattice and value checking
//! - `generics`: generic type bindings per component instantiation
//! - `pipeline`: the ordered parameter property stages
//! - `mapper`: constructor argument shapes to argument values
//! - `resolver`: instance bookkeeping, sharing and cycle handling
//! - `instantiate`: turning a plan into caller-defined objects
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no I/O
//! - Deterministic: `BTreeMap` only, no `HashMap`, no randomness
//! - The graph is never mutated during resolution
//! - Every failure is returned as a `ResolveError`; the core never panics

// =============================================================================
// MODULES
// =============================================================================

pub mod argument;
pub mod component;
pub mod export;
pub mod generics;
pub mod graph;
pub mod instantiate;
pub mod mapper;
pub mod overlay;
pub mod parameter;
pub mod pipeline;
pub mod range;
pub mod resolver;
pub mod types;
pub mod vocab;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ErrorReport, Literal, NodeId, ResolveError, Term, Variables};

// =============================================================================
// RE-EXPORTS: Resolution Engine
// =============================================================================

pub use argument::{Argument, Entry, InstanceId, InstancePlan, ResolutionPlan};
pub use component::{Component, ComponentKind};
pub use export::{CanonicalGraph, export_canonical, import_canonical};
pub use generics::GenericsContext;
pub use graph::{Graph, GraphStore};
pub use instantiate::{Constructed, Instantiator, construct, construct_argument};
pub use mapper::{ArgumentShape, Mapped, ResolvedValues};
pub use overlay::{Overlays, ValueRef};
pub use parameter::Parameter;
pub use pipeline::ParameterProperty;
pub use range::Range;
pub use range::check::{Observed, RangeChecker};
pub use range::literal::Scalar;
pub use resolver::{Resolver, resolve};
