#![allow(clippy::unwrap_used, clippy::panic)]
//! # Resolution Scenarios
//!
//! End-to-end resolution of small component graphs.
//!
//! ## Groups
//! - Shapes: fields, lists, elements, raw references, collected entries
//! - Pipeline: defaults, fixed values, variables, ranges, required
//! - Instances: sharing, unique values, cycles, lazy edges, inheritance
//! - Generics: explicit bindings, inferred bindings, arity

use rivet_core::vocab::{
    OM_VARIABLE, OO_ABSTRACT_CLASS, OO_CLASS, OO_COLLECT_ENTRIES, OO_CONSTRUCTOR_ARGUMENTS,
    OO_DEFAULT, OO_DEFAULT_SCOPE, OO_DEFAULT_SCOPED, OO_DEFAULT_SCOPED_VALUE, OO_ELEMENTS,
    OO_FIELDS, OO_FIXED, OO_GENERIC_TYPE_INSTANCES, OO_GENERIC_TYPE_PARAMETERS, OO_KEY, OO_LAZY,
    OO_PARAMETER, OO_PARAMETER_RANGE_GENERIC_BINDINGS, OO_RANGE_GENERIC_TYPE,
    OO_RANGE_GENERIC_TYPE_REFERENCE, OO_REQUIRED, OO_UNIQUE_VALUE, OO_VALUE_RAW_REFERENCE,
    RDF_VALUE, RDFS_RANGE, RDFS_SUBCLASS_OF, xsd,
};
use rivet_core::{
    Argument, Entry, Graph, InstanceId, Literal, NodeId, ResolutionPlan, ResolveError, Scalar,
    Variables, resolve,
};

// =============================================================================
// FIXTURES
// =============================================================================

const C: &str = "urn:ex:C";

fn p(name: &str) -> String {
    format!("urn:ex:C#{name}")
}

/// Declare component `C` with the named parameters.
fn component(graph: &mut Graph, params: &[&str]) -> NodeId {
    let class = graph.named(C);
    graph.add_type(class, OO_CLASS);
    for name in params {
        let param = graph.named(&p(name));
        graph.add(class, OO_PARAMETER, param);
    }
    class
}

/// Pass the named parameters positionally.
fn positional(graph: &mut Graph, class: NodeId, params: &[&str]) {
    let items = params.iter().map(|name| graph.named(&p(name))).collect();
    let list = graph.list_of(items);
    graph.add(class, OO_CONSTRUCTOR_ARGUMENTS, list);
}

/// A keyed field passing parameter `name` under key `name`.
fn field(graph: &mut Graph, name: &str) -> NodeId {
    let node = graph.blank();
    let key = graph.string(name);
    graph.add(node, OO_KEY, key);
    let param = graph.named(&p(name));
    graph.add(node, RDF_VALUE, param);
    node
}

/// A fields definition passed as the only constructor argument.
fn fields(graph: &mut Graph, class: NodeId, entries: Vec<NodeId>) {
    let list = graph.list_of(entries);
    let node = graph.blank();
    graph.add(node, OO_FIELDS, list);
    graph.add(class, OO_CONSTRUCTOR_ARGUMENTS, node);
}

fn flag(graph: &mut Graph, name: &str, predicate: &str) {
    let param = graph.named(&p(name));
    let yes = graph.typed("true", xsd::BOOLEAN);
    graph.add(param, predicate, yes);
}

fn config(graph: &mut Graph, iri: &str) -> NodeId {
    let node = graph.named(iri);
    graph.add_type(node, C);
    node
}

fn set(graph: &mut Graph, config: NodeId, name: &str, value: &str) {
    let value = graph.string(value);
    graph.add(config, &p(name), value);
}

fn root_arguments(plan: &ResolutionPlan) -> Vec<Argument> {
    plan.root_plan().unwrap().arguments.clone()
}

fn list(items: &[&str]) -> Argument {
    Argument::List(items.iter().map(|v| Argument::string(*v)).collect())
}

// =============================================================================
// SHAPES
// =============================================================================

mod shapes {
    use super::*;

    #[test]
    fn fields_select_configured_parameters() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1", "p2", "p3"]);
        let f1 = field(&mut graph, "p1");
        let f3 = field(&mut graph, "p3");
        fields(&mut graph, class, vec![f1, f3]);
        let cfg = config(&mut graph, "urn:ex:config");
        set(&mut graph, cfg, "p1", "ABC");
        set(&mut graph, cfg, "p2", "DEF");
        set(&mut graph, cfg, "p3", "GHI");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        let args = root_arguments(&plan);
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].to_string(), "{p1: [\"ABC\"], p3: [\"GHI\"]}");
    }

    #[test]
    fn keyed_field_without_values_is_omitted() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1", "p2"]);
        let f1 = field(&mut graph, "p1");
        let f2 = field(&mut graph, "p2");
        fields(&mut graph, class, vec![f1, f2]);
        let cfg = config(&mut graph, "urn:ex:config");
        set(&mut graph, cfg, "p1", "ABC");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(
            root_arguments(&plan),
            vec![Argument::Map(vec![Entry::new("p1", list(&["ABC"]))])]
        );
    }

    #[test]
    fn list_passes_each_parameter_positionally() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1", "p2"]);
        positional(&mut graph, class, &["p1", "p2"]);
        let cfg = config(&mut graph, "urn:ex:config");
        set(&mut graph, cfg, "p1", "A");
        set(&mut graph, cfg, "p2", "B");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(root_arguments(&plan), vec![list(&["A"]), list(&["B"])]);
    }

    #[test]
    fn keyless_value_in_list_matches_bare_reference() {
        for values in [&[][..], &["A"][..], &["A", "B"][..]] {
            let mut graph = Graph::new();
            let class = component(&mut graph, &["p1"]);
            let bare = graph.named(&p("p1"));
            let keyless = graph.blank();
            graph.add(keyless, RDF_VALUE, bare);
            let args = graph.list_of(vec![bare, keyless]);
            graph.add(class, OO_CONSTRUCTOR_ARGUMENTS, args);
            let cfg = config(&mut graph, "urn:ex:config");
            for value in values {
                set(&mut graph, cfg, "p1", value);
            }

            let plan = resolve(&graph, cfg, Variables::new()).unwrap();
            let expected = if values.is_empty() {
                Argument::Undefined
            } else {
                list(values)
            };
            assert_eq!(root_arguments(&plan), vec![expected.clone(), expected]);
        }
    }

    #[test]
    fn unset_positional_parameter_is_undefined() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1", "p2"]);
        positional(&mut graph, class, &["p1", "p2"]);
        let cfg = config(&mut graph, "urn:ex:config");
        set(&mut graph, cfg, "p2", "B");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(root_arguments(&plan), vec![Argument::Undefined, list(&["B"])]);
    }

    #[test]
    fn elements_concatenate_values() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1", "p2"]);
        let p1 = graph.named(&p("p1"));
        let p2 = graph.named(&p("p2"));
        let items = graph.list_of(vec![p1, p2]);
        let node = graph.blank();
        graph.add(node, OO_ELEMENTS, items);
        graph.add(class, OO_CONSTRUCTOR_ARGUMENTS, node);
        let cfg = config(&mut graph, "urn:ex:config");
        set(&mut graph, cfg, "p1", "A");
        set(&mut graph, cfg, "p1", "B");
        set(&mut graph, cfg, "p2", "C");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(root_arguments(&plan), vec![list(&["A", "B", "C"])]);
    }

    #[test]
    fn elements_must_point_at_a_list() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        let p1 = graph.named(&p("p1"));
        let node = graph.blank();
        graph.add(node, OO_ELEMENTS, p1);
        graph.add(class, OO_CONSTRUCTOR_ARGUMENTS, node);
        let cfg = config(&mut graph, "urn:ex:config");

        let err = resolve(&graph, cfg, Variables::new()).unwrap_err();
        assert!(matches!(err, ResolveError::Shape { .. }));
        assert!(err.to_string().contains("Illegal non-RDF-list elements"));
    }

    #[test]
    fn raw_reference_passes_the_reference_itself() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        let node = graph.blank();
        let key = graph.string("name");
        graph.add(node, OO_KEY, key);
        let p1 = graph.named(&p("p1"));
        graph.add(node, OO_VALUE_RAW_REFERENCE, p1);
        fields(&mut graph, class, vec![node]);
        let cfg = config(&mut graph, "urn:ex:config");
        set(&mut graph, cfg, "p1", "ignored");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(
            root_arguments(&plan),
            vec![Argument::Map(vec![Entry::new(
                "name",
                Argument::string(p("p1"))
            )])]
        );
    }

    #[test]
    fn iri_keys_are_rejected() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        let node = graph.blank();
        graph.add_named(node, OO_KEY, "urn:ex:key");
        let p1 = graph.named(&p("p1"));
        graph.add(node, RDF_VALUE, p1);
        fields(&mut graph, class, vec![node]);
        let cfg = config(&mut graph, "urn:ex:config");

        let err = resolve(&graph, cfg, Variables::new()).unwrap_err();
        assert!(err.to_string().contains("Illegal IRI object key"));
    }

    #[test]
    fn collected_entries_become_map_entries() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["entries"]);
        let collector = graph.blank();
        let entries = graph.named(&p("entries"));
        let entry_key = graph.named("urn:ex:entryKey");
        let entry_value = graph.named("urn:ex:entryValue");
        graph.add(collector, OO_COLLECT_ENTRIES, entries);
        graph.add(collector, OO_KEY, entry_key);
        graph.add(collector, RDF_VALUE, entry_value);
        fields(&mut graph, class, vec![collector]);

        let cfg = config(&mut graph, "urn:ex:config");
        for (key, value) in [("a", "1"), ("b", "2")] {
            let entry = graph.blank();
            let k = graph.string(key);
            let v = graph.string(value);
            graph.add(entry, "urn:ex:entryKey", k);
            graph.add(entry, "urn:ex:entryValue", v);
            graph.add(cfg, &p("entries"), entry);
        }

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(
            root_arguments(&plan),
            vec![Argument::Map(vec![
                Entry::new("a", list(&["1"])),
                Entry::new("b", list(&["2"])),
            ])]
        );
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

mod pipeline {
    use super::*;

    #[test]
    fn unique_default_is_a_single_value() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        flag(&mut graph, "p1", OO_UNIQUE_VALUE);
        let param = graph.named(&p("p1"));
        let fallback = graph.string("A");
        graph.add(param, OO_DEFAULT, fallback);
        let cfg = config(&mut graph, "urn:ex:config");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(root_arguments(&plan), vec![Argument::string("A")]);
    }

    #[test]
    fn configured_value_wins_over_default() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        let param = graph.named(&p("p1"));
        let fallback = graph.string("A");
        graph.add(param, OO_DEFAULT, fallback);
        let cfg = config(&mut graph, "urn:ex:config");
        set(&mut graph, cfg, "p1", "B");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(root_arguments(&plan), vec![list(&["B"])]);
    }

    #[test]
    fn fixed_values_are_appended() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        let param = graph.named(&p("p1"));
        let fixed = graph.string("F");
        graph.add(param, OO_FIXED, fixed);
        let cfg = config(&mut graph, "urn:ex:config");
        set(&mut graph, cfg, "p1", "X");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(root_arguments(&plan), vec![list(&["X", "F"])]);
    }

    #[test]
    fn scoped_default_applies_within_scope() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        let param = graph.named(&p("p1"));
        let scoped = graph.blank();
        graph.add_named(scoped, OO_DEFAULT_SCOPE, C);
        let value = graph.string("scoped");
        graph.add(scoped, OO_DEFAULT_SCOPED_VALUE, value);
        graph.add(param, OO_DEFAULT_SCOPED, scoped);
        let cfg = config(&mut graph, "urn:ex:config");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(root_arguments(&plan), vec![list(&["scoped"])]);
    }

    #[test]
    fn scoped_default_outside_scope_is_ignored() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        let param = graph.named(&p("p1"));
        let scoped = graph.blank();
        graph.add_named(scoped, OO_DEFAULT_SCOPE, "urn:ex:Elsewhere");
        let value = graph.string("scoped");
        graph.add(scoped, OO_DEFAULT_SCOPED_VALUE, value);
        graph.add(param, OO_DEFAULT_SCOPED, scoped);
        let cfg = config(&mut graph, "urn:ex:config");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(root_arguments(&plan), vec![Argument::Undefined]);
    }

    #[test]
    fn variables_are_substituted() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        let cfg = config(&mut graph, "urn:ex:config");
        let variable = graph.named("urn:ex:var:greeting");
        graph.add_type(variable, OM_VARIABLE);
        graph.add(cfg, &p("p1"), variable);

        let mut variables = Variables::new();
        variables.insert("urn:ex:var:greeting", Literal::string("hello"));
        let plan = resolve(&graph, cfg, variables).unwrap();
        assert_eq!(root_arguments(&plan), vec![list(&["hello"])]);

        let err = resolve(&graph, cfg, Variables::new()).unwrap_err();
        assert!(matches!(err, ResolveError::UndefinedVariable(ref name) if name == "urn:ex:var:greeting"));
    }

    #[test]
    fn required_parameter_without_value_fails() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        flag(&mut graph, "p1", OO_REQUIRED);
        let cfg = config(&mut graph, "urn:ex:config");

        let err = resolve(&graph, cfg, Variables::new()).unwrap_err();
        assert!(matches!(err, ResolveError::RequiredParameterMissing { .. }));
        assert!(err.to_string().starts_with("Required parameter missing"));
    }

    #[test]
    fn literal_range_casts_values() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        flag(&mut graph, "p1", OO_UNIQUE_VALUE);
        let param = graph.named(&p("p1"));
        graph.add_named(param, RDFS_RANGE, xsd::BOOLEAN);
        let cfg = config(&mut graph, "urn:ex:config");
        set(&mut graph, cfg, "p1", "true");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(
            root_arguments(&plan),
            vec![Argument::Literal(Scalar::Boolean(true))]
        );
    }

    #[test]
    fn literal_range_rejects_invalid_lexical_form() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        let param = graph.named(&p("p1"));
        graph.add_named(param, RDFS_RANGE, xsd::BOOLEAN);
        let cfg = config(&mut graph, "urn:ex:config");
        set(&mut graph, cfg, "p1", "WORLD");

        let err = resolve(&graph, cfg, Variables::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Parameter value \"WORLD\" is not of required range type \"{}\" for parameter \"{}\"",
                xsd::BOOLEAN,
                p("p1")
            )
        );
    }

    #[test]
    fn type_range_checks_instances() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        let param = graph.named(&p("p1"));
        graph.add_named(param, RDFS_RANGE, C);

        let leaf = config(&mut graph, "urn:ex:leaf");
        let cfg = config(&mut graph, "urn:ex:config");
        graph.add(cfg, &p("p1"), leaf);
        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(
            root_arguments(&plan),
            vec![Argument::List(vec![Argument::Instance(InstanceId(1))])]
        );

        let other = config(&mut graph, "urn:ex:other");
        set(&mut graph, other, "p1", "not an instance");
        let err = resolve(&graph, other, Variables::new()).unwrap_err();
        assert!(matches!(err, ResolveError::RangeConflict { .. }));
    }
}

// =============================================================================
// INSTANCES
// =============================================================================

mod instances {
    use super::*;

    #[test]
    fn self_reference_is_ignored() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        let cfg = config(&mut graph, "urn:ex:config");
        graph.add(cfg, &p("p1"), cfg);

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(root_arguments(&plan), vec![Argument::Undefined]);
        assert_eq!(plan.instances.len(), 1);
    }

    #[test]
    fn shared_configuration_is_one_instance() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1", "p2"]);
        positional(&mut graph, class, &["p1", "p2"]);
        let leaf = config(&mut graph, "urn:ex:leaf");
        let cfg = config(&mut graph, "urn:ex:config");
        graph.add(cfg, &p("p1"), leaf);
        graph.add(cfg, &p("p2"), leaf);

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        let shared = Argument::List(vec![Argument::Instance(InstanceId(1))]);
        assert_eq!(root_arguments(&plan), vec![shared.clone(), shared]);
        assert_eq!(plan.instances.len(), 2);
    }

    #[test]
    fn unique_values_are_independent_instances() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1", "p2"]);
        positional(&mut graph, class, &["p1", "p2"]);
        flag(&mut graph, "p1", OO_UNIQUE_VALUE);
        flag(&mut graph, "p2", OO_UNIQUE_VALUE);
        let leaf = config(&mut graph, "urn:ex:leaf");
        let cfg = config(&mut graph, "urn:ex:config");
        graph.add(cfg, &p("p1"), leaf);
        graph.add(cfg, &p("p2"), leaf);

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(
            root_arguments(&plan),
            vec![
                Argument::Instance(InstanceId(1)),
                Argument::Instance(InstanceId(2))
            ]
        );
        assert_eq!(plan.get(InstanceId(1)).unwrap().config, "urn:ex:leaf");
        assert_eq!(plan.get(InstanceId(2)).unwrap().config, "urn:ex:leaf");
    }

    #[test]
    fn lazy_cycle_resolves_to_reserved_instance() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["next"]);
        positional(&mut graph, class, &["next"]);
        flag(&mut graph, "next", OO_LAZY);
        let a = config(&mut graph, "urn:ex:a");
        let b = config(&mut graph, "urn:ex:b");
        graph.add(a, &p("next"), b);
        graph.add(b, &p("next"), a);

        let plan = resolve(&graph, a, Variables::new()).unwrap();
        let lazy = |id| Argument::List(vec![Argument::Lazy(Box::new(Argument::Instance(InstanceId(id))))]);
        assert_eq!(plan.get(InstanceId(0)).unwrap().arguments, vec![lazy(1)]);
        assert_eq!(plan.get(InstanceId(1)).unwrap().arguments, vec![lazy(0)]);
    }

    #[test]
    fn subclass_inherits_parameters_and_arguments() {
        let mut graph = Graph::new();
        let base = graph.named("urn:ex:Base");
        graph.add_type(base, OO_ABSTRACT_CLASS);
        let param = graph.named("urn:ex:Base#name");
        graph.add(base, OO_PARAMETER, param);
        let args = graph.list_of(vec![param]);
        graph.add(base, OO_CONSTRUCTOR_ARGUMENTS, args);

        let child = graph.named("urn:ex:Child");
        graph.add_type(child, OO_CLASS);
        graph.add(child, RDFS_SUBCLASS_OF, base);

        let cfg = graph.named("urn:ex:config");
        graph.add_type(cfg, "urn:ex:Child");
        let value = graph.string("x");
        graph.add(cfg, "urn:ex:Base#name", value);

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        let root = plan.root_plan().unwrap();
        assert_eq!(root.component, "urn:ex:Child");
        assert_eq!(root.arguments, vec![list(&["x"])]);
    }

    #[test]
    fn non_component_config_is_rejected() {
        let mut graph = Graph::new();
        component(&mut graph, &[]);
        let cfg = graph.named("urn:ex:config");
        graph.add_type(cfg, "urn:ex:Unknown");

        let err = resolve(&graph, cfg, Variables::new()).unwrap_err();
        assert!(matches!(err, ResolveError::NotAComponent(_)));
    }

    #[test]
    fn plan_serializes_to_json() {
        let mut graph = Graph::new();
        let class = component(&mut graph, &["p1"]);
        positional(&mut graph, class, &["p1"]);
        let cfg = config(&mut graph, "urn:ex:config");
        set(&mut graph, cfg, "p1", "A");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["root"], 0);
        assert_eq!(json["instances"][0]["component"], C);
        assert_eq!(json["instances"][0]["arguments"][0]["kind"], "list");
    }
}

// =============================================================================
// GENERICS
// =============================================================================

mod generics {
    use super::*;

    const T: &str = "urn:ex:C__T";

    /// Component `C<T>` whose parameters are all ranged by `T`.
    fn generic_component(graph: &mut Graph, params: &[&str]) -> NodeId {
        let class = component(graph, params);
        let generic = graph.named(T);
        let generics = graph.list_of(vec![generic]);
        graph.add(class, OO_GENERIC_TYPE_PARAMETERS, generics);
        for name in params {
            let param = graph.named(&p(name));
            let range = graph.blank();
            graph.add_type(range, OO_RANGE_GENERIC_TYPE_REFERENCE);
            graph.add(range, OO_RANGE_GENERIC_TYPE, generic);
            graph.add(param, RDFS_RANGE, range);
        }
        positional(graph, class, params);
        class
    }

    fn instantiate_with(graph: &mut Graph, config: NodeId, bindings: &[Option<&str>]) {
        let instances = bindings
            .iter()
            .map(|binding| {
                let instance = graph.blank();
                if let Some(range) = binding {
                    graph.add_named(instance, OO_PARAMETER_RANGE_GENERIC_BINDINGS, range);
                }
                instance
            })
            .collect();
        let list = graph.list_of(instances);
        graph.add(config, OO_GENERIC_TYPE_INSTANCES, list);
    }

    #[test]
    fn explicit_binding_casts_values() {
        let mut graph = Graph::new();
        generic_component(&mut graph, &["p1"]);
        let cfg = config(&mut graph, "urn:ex:config");
        instantiate_with(&mut graph, cfg, &[Some(xsd::BOOLEAN)]);
        set(&mut graph, cfg, "p1", "true");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(
            root_arguments(&plan),
            vec![Argument::List(vec![Argument::Literal(Scalar::Boolean(true))])]
        );
    }

    #[test]
    fn explicit_binding_rejects_values() {
        let mut graph = Graph::new();
        generic_component(&mut graph, &["p1"]);
        let cfg = config(&mut graph, "urn:ex:config");
        instantiate_with(&mut graph, cfg, &[Some(xsd::BOOLEAN)]);
        set(&mut graph, cfg, "p1", "WORLD");

        let err = resolve(&graph, cfg, Variables::new()).unwrap_err();
        assert!(matches!(err, ResolveError::RangeConflict { .. }));
    }

    #[test]
    fn first_value_binds_later_values() {
        let mut graph = Graph::new();
        generic_component(&mut graph, &["p1", "p2"]);
        let cfg = config(&mut graph, "urn:ex:config");
        let number = graph.typed("1", xsd::INTEGER);
        graph.add(cfg, &p("p1"), number);
        set(&mut graph, cfg, "p2", "x");

        let err = resolve(&graph, cfg, Variables::new()).unwrap_err();
        let ResolveError::RangeConflict { parameter, report } = err else {
            panic!("expected a range conflict");
        };
        assert_eq!(parameter, p("p2"));
        assert!(report.render().contains(T));
    }

    #[test]
    fn compatible_values_share_a_binding() {
        let mut graph = Graph::new();
        generic_component(&mut graph, &["p1", "p2"]);
        let cfg = config(&mut graph, "urn:ex:config");
        let one = graph.typed("1", xsd::INTEGER);
        let two = graph.typed("2", xsd::INTEGER);
        graph.add(cfg, &p("p1"), one);
        graph.add(cfg, &p("p2"), two);

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(
            root_arguments(&plan),
            vec![
                Argument::List(vec![Argument::Literal(Scalar::Integer(1))]),
                Argument::List(vec![Argument::Literal(Scalar::Integer(2))]),
            ]
        );
    }

    #[test]
    fn instance_without_binding_is_skipped() {
        let mut graph = Graph::new();
        generic_component(&mut graph, &["p1"]);
        let cfg = config(&mut graph, "urn:ex:config");
        instantiate_with(&mut graph, cfg, &[None]);
        set(&mut graph, cfg, "p1", "free");

        let plan = resolve(&graph, cfg, Variables::new()).unwrap();
        assert_eq!(root_arguments(&plan), vec![list(&["free"])]);
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let mut graph = Graph::new();
        generic_component(&mut graph, &["p1"]);
        let cfg = config(&mut graph, "urn:ex:config");
        instantiate_with(&mut graph, cfg, &[Some(xsd::BOOLEAN), Some(xsd::STRING)]);

        let err = resolve(&graph, cfg, Variables::new()).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::GenericArityMismatch {
                expected: 1,
                actual: 2,
                ..
            }
        ));
    }
}
