//! # Constructor Arguments Mapper
//!
//! Interprets constructor argument definitions against a configuration.
//!
//! ## Shapes
//!
//! A definition node is read as exactly one shape, by precedence:
//!
//! 1. **Elements**: `elements` points at a list; the resolved values of its
//!    entries are concatenated into one flat list.
//! 2. **Fields**: `fields` points at one field or a list of fields; the
//!    resolved entries are flattened into one keyed map.
//! 3. **List**: the node is itself a list; each item is one positional
//!    argument.
//! 4. **Key/value**: anything else; an optional literal `key` plus a `value`
//!    or `valueRawReference`, or a `collectEntries` expansion.

use tracing::{debug, warn};

use crate::argument::{Argument, Entry};
use crate::graph::GraphStore;
use crate::overlay::ValueRef;
use crate::pipeline::{self, PipelineContext, Site};
use crate::range::check::Observed;
use crate::resolver::Resolver;
use crate::vocab::{
    OO_COLLECT_ENTRIES, OO_ELEMENTS, OO_FIELDS, OO_KEY, OO_VALUE_RAW_REFERENCE, RDF_VALUE,
};
use crate::{GenericsContext, NodeId, ResolveError};

// =============================================================================
// SHAPES
// =============================================================================

/// The interpretation of a constructor argument definition node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArgumentShape {
    Elements,
    Fields,
    List,
    KeyValue,
}

impl ArgumentShape {
    /// All shapes, highest precedence first.
    pub const PRECEDENCE: [ArgumentShape; 4] = [Self::Elements, Self::Fields, Self::List, Self::KeyValue];

    /// Get the shape name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Elements => "elements",
            Self::Fields => "fields",
            Self::List => "list",
            Self::KeyValue => "key/value",
        }
    }

    /// Whether `node` structurally satisfies this shape.
    pub fn matches<G: GraphStore>(&self, graph: &G, node: NodeId) -> bool {
        match self {
            Self::Elements => graph.has(node, OO_ELEMENTS),
            Self::Fields => graph.has(node, OO_FIELDS),
            Self::List => graph.list(node).is_some(),
            Self::KeyValue => true,
        }
    }

    /// The single shape `node` is interpreted as.
    pub fn classify<G: GraphStore>(graph: &G, node: NodeId) -> Self {
        Self::PRECEDENCE
            .into_iter()
            .find(|shape| shape.matches(graph, node))
            .unwrap_or(Self::KeyValue)
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Output of applying one constructor argument definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped {
    /// Positional arguments of a list definition.
    Positional(Vec<Argument>),
    /// One assembled value: the map of a fields definition or the list of an
    /// elements definition.
    Value(Argument),
    /// Keyed entries of a key/value definition.
    Entries(Vec<Entry>),
    /// Values of a keyless key/value definition.
    Resolved(ResolvedValues),
    /// Bare values of a keyless entry collection.
    Values(Vec<Argument>),
}

impl Mapped {
    /// Read the result as one argument value.
    #[must_use]
    pub fn into_argument(self) -> Argument {
        match self {
            Self::Value(argument) => argument,
            Self::Resolved(resolved) => resolved.collapse(),
            Self::Positional(items) | Self::Values(items) => Argument::List(items),
            Self::Entries(entries) => Argument::Map(entries),
        }
    }

    /// Read the result as positional constructor arguments.
    #[must_use]
    pub fn into_positional(self) -> Vec<Argument> {
        match self {
            Self::Positional(items) | Self::Values(items) => items,
            Self::Resolved(resolved) => resolved.values,
            Self::Value(argument) => vec![argument],
            Self::Entries(entries) => vec![Argument::Map(entries)],
        }
    }
}

/// Values resolved for one parameter reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValues {
    pub values: Vec<Argument>,
    /// The first value is a private single value.
    pub unique: bool,
}

impl ResolvedValues {
    /// A single value.
    #[must_use]
    pub fn single(value: Argument) -> Self {
        Self {
            values: vec![value],
            unique: true,
        }
    }

    /// Collapse into one argument: the value itself when unique, a list
    /// container otherwise, the undefined placeholder when empty.
    #[must_use]
    pub fn collapse(self) -> Argument {
        if self.values.is_empty() {
            return Argument::Undefined;
        }
        if self.unique {
            return self.values.into_iter().next().unwrap_or(Argument::Undefined);
        }
        Argument::List(self.values)
    }
}

// =============================================================================
// MAPPER
// =============================================================================

impl<G: GraphStore> Resolver<'_, G> {
    fn shape_error(&self, node: NodeId, message: impl Into<String>) -> ResolveError {
        ResolveError::Shape {
            node: self.graph.display(node),
            message: message.into(),
        }
    }

    /// Interpret the constructor argument definition at `arguments`.
    ///
    /// Parameter values are read from `config_element`; scoped defaults are
    /// matched against `config_root`.
    pub fn apply_constructor_arguments(
        &mut self,
        config_root: NodeId,
        arguments: NodeId,
        config_element: NodeId,
        generics: &mut GenericsContext,
    ) -> Result<Mapped, ResolveError> {
        let shape = ArgumentShape::classify(self.graph, arguments);
        debug!(shape = shape.name(), node = %self.graph.display(arguments), "applying constructor arguments");
        self.descend(arguments, |resolver| match shape {
            ArgumentShape::Elements => resolver.map_elements(config_root, arguments, config_element, generics),
            ArgumentShape::Fields => resolver.map_fields(config_root, arguments, config_element, generics),
            ArgumentShape::List => resolver.map_list(config_root, arguments, config_element, generics),
            ArgumentShape::KeyValue => resolver.map_key_value(config_root, arguments, config_element, generics),
        })
    }

    /// Resolve the value(s) behind a parameter reference.
    ///
    /// A reference with its own fields or elements is a nested definition. A
    /// raw reference, a literal or a blank node is the value itself.
    /// Otherwise the reference names a parameter whose values are read from
    /// `config_element` and run through the pipeline.
    pub fn get_parameter_value(
        &mut self,
        config_root: NodeId,
        reference: NodeId,
        config_element: NodeId,
        raw: bool,
        generics: &mut GenericsContext,
    ) -> Result<ResolvedValues, ResolveError> {
        let graph = self.graph;
        if graph.has(reference, OO_FIELDS) || graph.has(reference, OO_ELEMENTS) {
            let mapped = self.apply_constructor_arguments(config_root, reference, config_element, generics)?;
            return Ok(ResolvedValues::single(mapped.into_argument()));
        }
        if raw || graph.iri(reference).is_none() {
            return Ok(ResolvedValues::single(self.materialize_raw(reference)));
        }
        let values = self.parameter_values(config_root, reference, config_element, generics)?;
        let unique = values.first().is_some_and(|&v| self.overlays.is_unique(v));
        let values = values
            .into_iter()
            .map(|value| self.materialize(value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ResolvedValues { values, unique })
    }

    /// Run the pipeline for the values of `parameter` on `config_element`.
    pub fn parameter_values(
        &mut self,
        config_root: NodeId,
        parameter: NodeId,
        config_element: NodeId,
        generics: &mut GenericsContext,
    ) -> Result<Vec<ValueRef>, ResolveError> {
        let graph = self.graph;
        let parameter = self.parameter(parameter)?;
        let mut raw = Vec::new();
        for &value in graph.objects(config_element, &parameter.id) {
            if value == config_element {
                warn!(config = %graph.display(config_element), parameter = %parameter.id, "ignoring self reference");
                continue;
            }
            raw.push(ValueRef::new(value));
        }
        let mut cx = PipelineContext {
            graph,
            overlays: &mut self.overlays,
            generics,
            variables: &self.variables,
        };
        let site = Site {
            config_root,
            config_element,
            parameter: &parameter,
        };
        pipeline::run(&mut cx, raw, &site)
    }

    // =========================================================================
    // SHAPE HANDLERS
    // =========================================================================

    fn map_elements(
        &mut self,
        config_root: NodeId,
        node: NodeId,
        config_element: NodeId,
        generics: &mut GenericsContext,
    ) -> Result<Mapped, ResolveError> {
        let graph = self.graph;
        let items = match graph.objects(node, OO_ELEMENTS) {
            [single] => graph.list(*single),
            _ => None,
        }
        .ok_or_else(|| self.shape_error(node, "Illegal non-RDF-list elements"))?;

        let mut values = Vec::with_capacity(items.len());
        for &entry in items {
            if graph.has(entry, OO_FIELDS)
                || graph.has(entry, OO_ELEMENTS)
                || graph.has(entry, OO_COLLECT_ENTRIES)
            {
                match self.apply_constructor_arguments(config_root, entry, config_element, generics)? {
                    Mapped::Value(argument) => values.push(argument),
                    Mapped::Values(items) | Mapped::Positional(items) => values.extend(items),
                    Mapped::Resolved(resolved) => values.extend(resolved.values),
                    Mapped::Entries(_) => {
                        return Err(self.shape_error(entry, "Illegal keyed entry inside elements"));
                    }
                }
            } else if graph.iri(entry).is_some() {
                let resolved = self.get_parameter_value(config_root, entry, config_element, false, generics)?;
                values.extend(resolved.values);
            } else if let Some(value) = graph.object(entry, RDF_VALUE) {
                let resolved = self.get_parameter_value(config_root, value, config_element, false, generics)?;
                values.extend(resolved.values);
            } else if let Some(value) = graph.object(entry, OO_VALUE_RAW_REFERENCE) {
                let resolved = self.get_parameter_value(config_root, value, config_element, true, generics)?;
                values.extend(resolved.values);
            } else {
                return Err(self.shape_error(
                    entry,
                    "Illegal elements entry: must be a reference or have a value or valueRawReference",
                ));
            }
        }
        Ok(Mapped::Value(Argument::List(values)))
    }

    fn map_fields(
        &mut self,
        config_root: NodeId,
        node: NodeId,
        config_element: NodeId,
        generics: &mut GenericsContext,
    ) -> Result<Mapped, ResolveError> {
        let graph = self.graph;
        let fields = match graph.objects(node, OO_FIELDS) {
            [single] => graph.list(*single).map_or_else(|| vec![*single], <[NodeId]>::to_vec),
            _ => return Err(self.shape_error(node, "Detected more than one fields value")),
        };

        let mut entries = Vec::new();
        for field in fields {
            match self.apply_constructor_arguments(config_root, field, config_element, generics)? {
                Mapped::Entries(found) => entries.extend(found),
                Mapped::Value(Argument::Map(found)) => entries.extend(found),
                Mapped::Values(values) | Mapped::Resolved(ResolvedValues { values, .. }) => {
                    for value in values {
                        match value {
                            Argument::Map(found) => entries.extend(found),
                            _ => return Err(self.shape_error(field, "Illegal fields entry without key")),
                        }
                    }
                }
                Mapped::Value(_) | Mapped::Positional(_) => {
                    return Err(self.shape_error(field, "Illegal fields entry: expected a keyed entry"));
                }
            }
        }
        Ok(Mapped::Value(Argument::Map(entries)))
    }

    fn map_list(
        &mut self,
        config_root: NodeId,
        node: NodeId,
        config_element: NodeId,
        generics: &mut GenericsContext,
    ) -> Result<Mapped, ResolveError> {
        let graph = self.graph;
        let items = graph.list(node).unwrap_or_default();
        let mut arguments = Vec::with_capacity(items.len());
        for &item in items {
            if graph.iri(item).is_some()
                && !graph.has(item, OO_FIELDS)
                && !graph.has(item, OO_ELEMENTS)
            {
                let resolved = self.get_parameter_value(config_root, item, config_element, false, generics)?;
                arguments.push(resolved.collapse());
                continue;
            }
            let mapped = self.apply_constructor_arguments(config_root, item, config_element, generics)?;
            arguments.push(mapped.into_argument());
        }
        Ok(Mapped::Positional(arguments))
    }

    fn map_key_value(
        &mut self,
        config_root: NodeId,
        node: NodeId,
        config_element: NodeId,
        generics: &mut GenericsContext,
    ) -> Result<Mapped, ResolveError> {
        let graph = self.graph;
        if let Some(collected) = graph.object(node, OO_COLLECT_ENTRIES) {
            return self.collect_entries(config_root, node, collected, config_element, generics);
        }

        let key = match graph.object(node, OO_KEY) {
            None => None,
            Some(key) => match graph.literal(key) {
                Some(literal) => Some(literal.value.clone()),
                None => {
                    return Err(self.shape_error(
                        node,
                        format!("Illegal IRI object key {}", graph.display(key)),
                    ));
                }
            },
        };
        let resolved = if let Some(value) = graph.object(node, RDF_VALUE) {
            self.get_parameter_value(config_root, value, config_element, false, generics)?
        } else if let Some(value) = graph.object(node, OO_VALUE_RAW_REFERENCE) {
            self.get_parameter_value(config_root, value, config_element, true, generics)?
        } else {
            return Err(self.shape_error(node, "Missing value or valueRawReference"));
        };

        Ok(match key {
            Some(_) if resolved.values.is_empty() => Mapped::Entries(Vec::new()),
            Some(key) => Mapped::Entries(vec![Entry::new(key, resolved.collapse())]),
            None => Mapped::Resolved(resolved),
        })
    }

    /// Expand one entry per value of `collected` on the configuration.
    ///
    /// The `key` and `value` references of `node` are resolved against each
    /// entry node instead of the configuration element.
    fn collect_entries(
        &mut self,
        config_root: NodeId,
        node: NodeId,
        collected: NodeId,
        config_element: NodeId,
        generics: &mut GenericsContext,
    ) -> Result<Mapped, ResolveError> {
        let graph = self.graph;
        let key_reference = graph.object(node, OO_KEY);
        let value_reference = graph
            .object(node, RDF_VALUE)
            .map(|value| (value, false))
            .or_else(|| graph.object(node, OO_VALUE_RAW_REFERENCE).map(|value| (value, true)));

        let sources = self.parameter_values(config_root, collected, config_element, generics)?;
        debug!(node = %graph.display(node), count = sources.len(), "collecting entries");

        let mut entries = Vec::new();
        let mut values = Vec::new();
        for source in sources {
            let entry = source.source;
            let value = match value_reference {
                Some((reference, raw)) => self
                    .get_parameter_value(config_root, reference, entry, raw, generics)?
                    .collapse(),
                None => self.materialize(source)?,
            };
            match key_reference {
                Some(reference) => {
                    let key = self.entry_key(config_root, reference, entry, generics)?;
                    entries.push(Entry::new(key, value));
                }
                None => values.push(value),
            }
        }
        Ok(match key_reference {
            Some(_) => Mapped::Entries(entries),
            None => Mapped::Values(values),
        })
    }

    /// The key of a collected entry: a literal or an IRI.
    fn entry_key(
        &mut self,
        config_root: NodeId,
        reference: NodeId,
        entry: NodeId,
        generics: &mut GenericsContext,
    ) -> Result<String, ResolveError> {
        let graph = self.graph;
        if let Some(literal) = graph.literal(reference) {
            return Ok(literal.value.clone());
        }
        let keys = self.parameter_values(config_root, reference, entry, generics)?;
        let key = keys
            .first()
            .ok_or_else(|| self.shape_error(entry, "Missing key for collected entry"))?;
        let observed = self.overlays.observe(graph, *key);
        Ok(match observed {
            Observed::Literal(literal) => literal.value.clone(),
            _ => graph.display(key.source),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
