//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands. Commands
//! return the text to print so they can be exercised without a terminal.

use rivet_core::{
    Argument, Component, Constructed, ErrorReport, Graph, GraphStore, InstancePlan, Instantiator, NodeId,
    ResolutionPlan, ResolveError, Resolver, Term, construct, import_canonical,
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::fmt::Write as _;
use std::path::Path;

use crate::settings::Settings;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum graph document size (100 MB).
const MAX_GRAPH_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), ResolveError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ResolveError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(ResolveError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Read a canonical graph document.
pub fn load_graph(path: &Path) -> Result<Graph, ResolveError> {
    validate_file_size(path, MAX_GRAPH_FILE_SIZE)?;
    let text = std::fs::read_to_string(path)
        .map_err(|e| ResolveError::IoError(format!("Cannot read '{}': {}", path.display(), e)))?;
    let graph = import_canonical(&text)?;
    tracing::info!(
        path = %path.display(),
        nodes = graph.node_count(),
        triples = graph.triple_count(),
        "loaded graph"
    );
    Ok(graph)
}

fn to_pretty_json(value: &impl Serialize) -> Result<String, ResolveError> {
    serde_json::to_string_pretty(value).map_err(|e| ResolveError::SerializationError(e.to_string()))
}

// =============================================================================
// RESOLVE COMMAND
// =============================================================================

/// Resolve `config` and render its plan or its constructed tree.
pub fn cmd_resolve(
    graph_path: &Path,
    config: &str,
    settings: &Settings,
    json_mode: bool,
    expand: bool,
) -> Result<String, ResolveError> {
    let graph = load_graph(graph_path)?;
    let mut resolver = Resolver::new(&graph)
        .with_variables(settings.variables())
        .with_max_depth(settings.resolver.max_depth);
    let root = resolver.resolve_iri(config)?;
    let plan = resolver.into_plan(root);
    tracing::info!(config, instances = plan.instances.len(), "resolved");

    if expand {
        let tree = construct(&plan, &mut JsonInstantiator)?;
        return if json_mode {
            to_pretty_json(&tree)
        } else {
            Ok(tree.to_string())
        };
    }
    if json_mode {
        return to_pretty_json(&plan);
    }
    Ok(render_plan(&plan))
}

/// Render a plan as one block per instance.
pub fn render_plan(plan: &ResolutionPlan) -> String {
    let mut out = String::new();
    for (index, instance) in plan.instances.iter().enumerate() {
        let marker = if index == plan.root.index() { " (root)" } else { "" };
        let _ = writeln!(out, "#{index} {} : {}{marker}", instance.config, instance.component);
        for (position, argument) in instance.arguments.iter().enumerate() {
            let _ = writeln!(out, "  {position}: {argument}");
        }
    }
    out.trim_end().to_string()
}

/// Builds each instance as a JSON object of its component and arguments.
pub struct JsonInstantiator;

impl JsonInstantiator {
    fn value(argument: Constructed<Value>) -> Result<Value, ResolveError> {
        Ok(match argument {
            Constructed::Undefined => Value::Null,
            Constructed::Literal(scalar) => serde_json::to_value(scalar)
                .map_err(|e| ResolveError::SerializationError(e.to_string()))?,
            Constructed::Iri(iri) => json!({ "iri": iri }),
            Constructed::Instance(instance) => instance,
            Constructed::Lazy(deferred) => json!({ "lazy": Self::deferred(&deferred)? }),
            Constructed::List(items) => Value::Array(
                items
                    .into_iter()
                    .map(Self::value)
                    .collect::<Result<_, _>>()?,
            ),
            Constructed::Map(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, Self::value(value)?);
                }
                Value::Object(map)
            }
        })
    }

    fn deferred(argument: &Argument) -> Result<Value, ResolveError> {
        serde_json::to_value(argument).map_err(|e| ResolveError::SerializationError(e.to_string()))
    }
}

impl Instantiator for JsonInstantiator {
    type Instance = Value;

    fn instantiate(
        &mut self,
        plan: &InstancePlan,
        arguments: Vec<Constructed<Value>>,
    ) -> Result<Value, ResolveError> {
        let arguments = arguments
            .into_iter()
            .map(Self::value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(json!({
            "config": plan.config,
            "component": plan.component,
            "arguments": arguments,
        }))
    }
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// One configuration that failed to resolve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckFailure {
    pub config: String,
    pub error: String,
    pub report: ErrorReport,
}

/// Result of resolving every configuration of a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub checked: usize,
    pub failures: Vec<CheckFailure>,
}

impl CheckReport {
    pub fn render(&self, json_mode: bool) -> Result<String, ResolveError> {
        if json_mode {
            return to_pretty_json(self);
        }
        let mut out = format!(
            "Checked {} configurations: {} failed",
            self.checked,
            self.failures.len()
        );
        for failure in &self.failures {
            let _ = write!(out, "\n  {}: {}", failure.config, failure.error);
        }
        Ok(out)
    }
}

/// Named nodes that instantiate a component, excluding components themselves.
pub fn configurations<G: GraphStore>(graph: &G) -> Vec<NodeId> {
    (0..graph.node_count() as u32)
        .map(NodeId)
        .filter(|&id| matches!(graph.term(id), Some(Term::Named(_))))
        .filter(|&id| !Component::is_component(graph, id))
        .filter(|&id| Component::of_config(graph, id).is_some())
        .collect()
}

/// Resolve every configuration independently.
pub fn cmd_check(graph_path: &Path, settings: &Settings) -> Result<CheckReport, ResolveError> {
    let graph = load_graph(graph_path)?;
    let configs = configurations(&graph);
    let mut failures = Vec::new();
    for &config in &configs {
        let mut resolver = Resolver::new(&graph)
            .with_variables(settings.variables())
            .with_max_depth(settings.resolver.max_depth);
        if let Err(e) = resolver.resolve(config) {
            tracing::warn!(config = %graph.display(config), error = %e, "configuration failed");
            failures.push(CheckFailure {
                config: graph.display(config),
                error: e.to_string(),
                report: e.report(),
            });
        }
    }
    Ok(CheckReport {
        checked: configs.len(),
        failures,
    })
}

// =============================================================================
// COMPONENTS COMMAND
// =============================================================================

/// List every component with its kind, generics and parameters.
pub fn cmd_components(graph_path: &Path, json_mode: bool) -> Result<String, ResolveError> {
    let graph = load_graph(graph_path)?;
    let mut components = Vec::new();
    for (id, term) in graph.nodes() {
        if matches!(term, Term::Named(_)) && Component::is_component(&graph, id) {
            components.push(Component::load(&graph, id)?);
        }
    }

    if json_mode {
        let listed: Vec<Value> = components
            .iter()
            .map(|c| {
                json!({
                    "component": c.id,
                    "kind": c.kind.name(),
                    "generic_type_parameters": c.generic_type_parameters,
                    "parameters": c.parameters.iter().map(|&p| graph.display(p)).collect::<Vec<_>>(),
                })
            })
            .collect();
        return to_pretty_json(&listed);
    }

    let mut out = String::new();
    for component in &components {
        let generics = if component.generic_type_parameters.is_empty() {
            String::new()
        } else {
            format!("<{}>", component.generic_type_parameters.join(", "))
        };
        let _ = writeln!(out, "{}{generics} ({})", component.id, component.kind.name());
        for &parameter in &component.parameters {
            let _ = writeln!(out, "  - {}", graph.display(parameter));
        }
    }
    Ok(out.trim_end().to_string())
}
