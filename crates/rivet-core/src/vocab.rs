//! # Vocabulary
//!
//! Fixed IRIs and runtime limits for the Rivet resolver.
//!
//! Rivet starts with zero components but fixed vocabulary.
//! These terms are compiled into the binary and are immutable at runtime.
//!
//! ## Namespaces
//!
//! 1. **oo**: component, parameter and constructor argument descriptions.
//! 2. **om**: object mapping (variables).
//! 3. **rdf / rdfs / xsd**: types, subclassing and literal datatypes.

macro_rules! oo {
    ($name:literal) => {
        concat!(
            "https://linkedsoftwaredependencies.org/vocabularies/object-oriented#",
            $name
        )
    };
}

macro_rules! rdf {
    ($name:literal) => {
        concat!("http://www.w3.org/1999/02/22-rdf-syntax-ns#", $name)
    };
}

macro_rules! rdfs {
    ($name:literal) => {
        concat!("http://www.w3.org/2000/01/rdf-schema#", $name)
    };
}

macro_rules! xsd {
    ($name:literal) => {
        concat!("http://www.w3.org/2001/XMLSchema#", $name)
    };
}

// =============================================================================
// RDF / RDFS
// =============================================================================

pub const RDF_TYPE: &str = rdf!("type");
pub const RDF_VALUE: &str = rdf!("value");
pub const RDF_JSON: &str = rdf!("JSON");
pub const RDF_LANG_STRING: &str = rdf!("langString");
pub const RDFS_SUBCLASS_OF: &str = rdfs!("subClassOf");
pub const RDFS_RANGE: &str = rdfs!("range");

/// Prefix shared by every XSD datatype IRI.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

// =============================================================================
// COMPONENTS
// =============================================================================

pub const OO_CLASS: &str = oo!("Class");
pub const OO_ABSTRACT_CLASS: &str = oo!("AbstractClass");
pub const OO_PARAMETER: &str = oo!("parameter");
pub const OO_CONSTRUCTOR_ARGUMENTS: &str = oo!("constructorArguments");
pub const OO_GENERIC_TYPE_PARAMETERS: &str = oo!("genericTypeParameters");
pub const OO_GENERIC_TYPE_INSTANCES: &str = oo!("genericTypeInstances");
pub const OO_PARAMETER_RANGE_GENERIC_BINDINGS: &str = oo!("parameterRangeGenericBindings");

// =============================================================================
// CONSTRUCTOR ARGUMENT SHAPES
// =============================================================================

pub const OO_FIELDS: &str = oo!("fields");
pub const OO_ELEMENTS: &str = oo!("elements");
pub const OO_KEY: &str = oo!("key");
pub const OO_VALUE_RAW_REFERENCE: &str = oo!("valueRawReference");
pub const OO_COLLECT_ENTRIES: &str = oo!("collectEntries");

// =============================================================================
// PARAMETER PROPERTIES
// =============================================================================

pub const OO_UNIQUE_VALUE: &str = oo!("uniqueValue");
pub const OO_LAZY: &str = oo!("lazy");
pub const OO_REQUIRED: &str = oo!("required");
pub const OO_DEFAULT: &str = oo!("default");
pub const OO_DEFAULT_SCOPED: &str = oo!("defaultScoped");
pub const OO_DEFAULT_SCOPE: &str = oo!("defaultScope");
pub const OO_DEFAULT_SCOPED_VALUE: &str = oo!("defaultScopedValue");
pub const OO_FIXED: &str = oo!("fixed");

// =============================================================================
// PARAMETER RANGES
// =============================================================================

pub const OO_RANGE_WILDCARD: &str = oo!("ParameterRangeWildcard");
pub const OO_RANGE_UNDEFINED: &str = oo!("ParameterRangeUndefined");
pub const OO_RANGE_GENERIC_TYPE_REFERENCE: &str = oo!("ParameterRangeGenericTypeReference");
pub const OO_RANGE_UNION: &str = oo!("ParameterRangeUnion");
pub const OO_RANGE_INTERSECTION: &str = oo!("ParameterRangeIntersection");
pub const OO_RANGE_TUPLE: &str = oo!("ParameterRangeTuple");
pub const OO_RANGE_ARRAY: &str = oo!("ParameterRangeArray");
pub const OO_RANGE_REST: &str = oo!("ParameterRangeRest");
pub const OO_RANGE_KEYOF: &str = oo!("ParameterRangeKeyof");
pub const OO_RANGE_ELEMENTS: &str = oo!("parameterRangeElements");
pub const OO_RANGE_VALUE: &str = oo!("parameterRangeValue");
pub const OO_RANGE_GENERIC_TYPE: &str = oo!("parameterRangeGenericType");

// =============================================================================
// OBJECT MAPPING
// =============================================================================

pub const OM_VARIABLE: &str = "https://linkedsoftwaredependencies.org/vocabularies/object-mapping#Variable";

// =============================================================================
// XSD DATATYPES
// =============================================================================

/// XSD datatype IRIs known to the range lattice.
pub mod xsd {
    pub const STRING: &str = xsd!("string");
    pub const BOOLEAN: &str = xsd!("boolean");
    /// Root of the numeric family. Not a standard XSD type.
    pub const NUMBER: &str = xsd!("number");

    pub const INTEGER: &str = xsd!("integer");
    pub const NON_POSITIVE_INTEGER: &str = xsd!("nonPositiveInteger");
    pub const NEGATIVE_INTEGER: &str = xsd!("negativeInteger");
    pub const NON_NEGATIVE_INTEGER: &str = xsd!("nonNegativeInteger");
    pub const POSITIVE_INTEGER: &str = xsd!("positiveInteger");
    pub const LONG: &str = xsd!("long");
    pub const INT: &str = xsd!("int");
    pub const SHORT: &str = xsd!("short");
    pub const BYTE: &str = xsd!("byte");
    pub const UNSIGNED_LONG: &str = xsd!("unsignedLong");
    pub const UNSIGNED_INT: &str = xsd!("unsignedInt");
    pub const UNSIGNED_SHORT: &str = xsd!("unsignedShort");
    pub const UNSIGNED_BYTE: &str = xsd!("unsignedByte");

    pub const DECIMAL: &str = xsd!("decimal");
    pub const FLOAT: &str = xsd!("float");
    pub const DOUBLE: &str = xsd!("double");

    pub const NORMALIZED_STRING: &str = xsd!("normalizedString");
    pub const ANY_URI: &str = xsd!("anyURI");
    pub const BASE64_BINARY: &str = xsd!("base64Binary");
    pub const LANGUAGE: &str = xsd!("language");
    pub const NAME: &str = xsd!("Name");
    pub const NCNAME: &str = xsd!("NCName");
    pub const NMTOKEN: &str = xsd!("NMTOKEN");
    pub const TOKEN: &str = xsd!("token");
    pub const HEX_BINARY: &str = xsd!("hexBinary");
}

// =============================================================================
// LIMITS
// =============================================================================

/// Default maximum nesting depth of one resolution walk.
///
/// Counts nested constructor argument shapes and nested instances together.
/// Bounds malformed input that nests shapes inside themselves.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Maximum nesting depth of a range description.
pub const MAX_RANGE_DEPTH: usize = 64;
