//! # Resolver
//!
//! Per-run resolution state combining the graph with everything a walk
//! accumulates: overlays, the instance table and the cycle guard.
//!
//! - The graph is borrowed read-only
//! - Non-unique references to the same configuration share one instance
//! - A configuration met again while it is still being resolved resolves to
//!   the undefined placeholder (or, behind a lazy edge, to its reserved
//!   instance)

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::argument::{Argument, InstanceId, InstancePlan, ResolutionPlan};
use crate::graph::GraphStore;
use crate::overlay::{Overlay, Overlays, ValueRef};
use crate::range::literal::Scalar;
use crate::vocab::{DEFAULT_MAX_DEPTH, OO_GENERIC_TYPE_INSTANCES};
use crate::{Component, GenericsContext, NodeId, Parameter, ResolveError, Term, Variables};

/// Resolution state for one graph.
///
/// A resolver can resolve several root configurations; shared instances are
/// reused across them.
#[derive(Debug)]
pub struct Resolver<'g, G> {
    pub(crate) graph: &'g G,
    pub(crate) variables: Variables,
    pub(crate) overlays: Overlays,
    instances: Vec<InstancePlan>,
    /// Shared instance per configuration node.
    shared: BTreeMap<NodeId, InstanceId>,
    /// Configurations currently being resolved.
    in_progress: BTreeSet<NodeId>,
    parameters: BTreeMap<NodeId, Parameter>,
    components: BTreeMap<NodeId, Component>,
    depth: usize,
    max_depth: usize,
}

impl<'g, G: GraphStore> Resolver<'g, G> {
    /// Create a resolver over `graph` without variables.
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            variables: Variables::new(),
            overlays: Overlays::new(),
            instances: Vec::new(),
            shared: BTreeMap::new(),
            in_progress: BTreeSet::new(),
            parameters: BTreeMap::new(),
            components: BTreeMap::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Supply variable values.
    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// Bound the nesting depth of one walk.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn graph(&self) -> &'g G {
        self.graph
    }

    /// The overlay records created so far.
    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    /// The instance table built so far.
    pub fn instances(&self) -> &[InstancePlan] {
        &self.instances
    }

    pub fn instance(&self, id: InstanceId) -> Option<&InstancePlan> {
        self.instances.get(id.index())
    }

    /// Resolve a configuration node into the instance table.
    pub fn resolve(&mut self, config: NodeId) -> Result<InstanceId, ResolveError> {
        debug!(config = %self.graph.display(config), "resolving configuration");
        self.instantiate(config, false, false)?
            .ok_or_else(|| ResolveError::CyclicReference(self.graph.display(config)))
    }

    /// Resolve the configuration with the given IRI.
    pub fn resolve_iri(&mut self, iri: &str) -> Result<InstanceId, ResolveError> {
        let config = self
            .graph
            .lookup_named(iri)
            .ok_or_else(|| ResolveError::NodeNotFound(iri.to_string()))?;
        self.resolve(config)
    }

    /// Finish resolution, keeping `root` as the plan's entry point.
    pub fn into_plan(self, root: InstanceId) -> ResolutionPlan {
        ResolutionPlan {
            root,
            instances: self.instances,
        }
    }

    // =========================================================================
    // INSTANCES
    // =========================================================================

    /// Resolve `config` to an instance.
    ///
    /// Returns `None` when `config` is already being resolved and the edge is
    /// not lazy.
    pub(crate) fn instantiate(
        &mut self,
        config: NodeId,
        unique: bool,
        lazy: bool,
    ) -> Result<Option<InstanceId>, ResolveError> {
        if self.in_progress.contains(&config) {
            if lazy && let Some(&id) = self.shared.get(&config) {
                debug!(config = %self.graph.display(config), "lazy reference to configuration in progress");
                return Ok(Some(id));
            }
            warn!(config = %self.graph.display(config), "cyclic configuration reference resolved to undefined");
            return Ok(None);
        }
        if !unique && let Some(&id) = self.shared.get(&config) {
            return Ok(Some(id));
        }

        let component = self.component(config)?;
        let id = InstanceId(self.instances.len() as u32);
        self.instances.push(InstancePlan {
            config: self.graph.display(config),
            component: component.id.clone(),
            arguments: Vec::new(),
        });
        if !unique {
            self.shared.insert(config, id);
        }
        debug!(config = %self.graph.display(config), component = %component.id, instance = %id, unique, "instantiating");

        self.in_progress.insert(config);
        let arguments = self.descend(config, |resolver| resolver.resolve_arguments(config, &component));
        self.in_progress.remove(&config);
        let arguments = arguments?;

        if let Some(plan) = self.instances.get_mut(id.index()) {
            plan.arguments = arguments;
        }
        Ok(Some(id))
    }

    fn resolve_arguments(
        &mut self,
        config: NodeId,
        component: &Component,
    ) -> Result<Vec<Argument>, ResolveError> {
        let mut generics = GenericsContext::for_component(component);
        let instances = self.graph.ordered(config, OO_GENERIC_TYPE_INSTANCES);
        generics.bind_component_generic_types(self.graph, component, &instances)?;

        let Some(arguments) = component.constructor_arguments else {
            return Ok(Vec::new());
        };
        let mapped = self.apply_constructor_arguments(config, arguments, config, &mut generics)?;
        if !generics.bindings().is_empty() {
            debug!(component = %component.id, bindings = ?generics.bindings(), "generic bindings");
        }
        Ok(mapped.into_positional())
    }

    fn component(&mut self, config: NodeId) -> Result<Component, ResolveError> {
        let node = Component::of_config(self.graph, config)
            .ok_or_else(|| ResolveError::NotAComponent(self.graph.display(config)))?;
        if let Some(component) = self.components.get(&node) {
            return Ok(component.clone());
        }
        let component = Component::load(self.graph, node)?;
        self.components.insert(node, component.clone());
        Ok(component)
    }

    /// Load a parameter description, cached per node.
    pub(crate) fn parameter(&mut self, node: NodeId) -> Result<Parameter, ResolveError> {
        if let Some(parameter) = self.parameters.get(&node) {
            return Ok(parameter.clone());
        }
        let parameter = Parameter::load(self.graph, node)?;
        self.parameters.insert(node, parameter.clone());
        Ok(parameter)
    }

    /// Run `f` one nesting level deeper.
    pub(crate) fn descend<T>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut Self) -> Result<T, ResolveError>,
    ) -> Result<T, ResolveError> {
        if self.depth >= self.max_depth {
            return Err(ResolveError::DepthExceeded {
                limit: self.max_depth,
                node: self.graph.display(node),
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // =========================================================================
    // MATERIALIZATION
    // =========================================================================

    /// Turn a pipeline value into an argument.
    pub(crate) fn materialize(&mut self, value: ValueRef) -> Result<Argument, ResolveError> {
        let overlay = self.overlays.overlay_of(value).cloned().unwrap_or_default();
        let argument = self.materialize_occurrence(value.source, &overlay)?;
        Ok(if overlay.lazy {
            Argument::Lazy(Box::new(argument))
        } else {
            argument
        })
    }

    fn materialize_occurrence(
        &mut self,
        source: NodeId,
        overlay: &Overlay,
    ) -> Result<Argument, ResolveError> {
        if let Some(scalar) = &overlay.cast {
            return Ok(Argument::Literal(scalar.clone()));
        }
        if let Some(literal) = &overlay.literal {
            return Ok(Argument::string(literal.value.clone()));
        }
        let graph = self.graph;
        let term = graph
            .term(source)
            .ok_or_else(|| ResolveError::NodeNotFound(graph.display(source)))?;
        if let Term::Literal(literal) = term {
            return Ok(Argument::Literal(Scalar::String(literal.value.clone())));
        }
        if let Some(items) = graph.list(source) {
            return items
                .iter()
                .map(|&item| self.materialize(ValueRef::new(item)))
                .collect::<Result<Vec<_>, _>>()
                .map(Argument::List);
        }
        if Component::of_config(graph, source).is_some() {
            return Ok(self
                .instantiate(source, overlay.unique, overlay.lazy)?
                .map_or(Argument::Undefined, Argument::Instance));
        }
        Ok(Argument::Iri(graph.display(source)))
    }

    /// The reference node itself as a value.
    pub(crate) fn materialize_raw(&self, node: NodeId) -> Argument {
        match self.graph.literal(node) {
            Some(literal) => Argument::string(literal.value.clone()),
            None => Argument::string(self.graph.display(node)),
        }
    }
}

/// Resolve `config` in a fresh resolver and return its plan.
pub fn resolve<G: GraphStore>(
    graph: &G,
    config: NodeId,
    variables: Variables,
) -> Result<ResolutionPlan, ResolveError> {
    let mut resolver = Resolver::new(graph).with_variables(variables);
    let root = resolver.resolve(config)?;
    Ok(resolver.into_plan(root))
}

// =============================================================================
// TESTS
// =============================================================================
