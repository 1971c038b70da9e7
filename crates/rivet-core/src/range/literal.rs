//! # Literal Datatypes
//!
//! The flat datatype table of the range lattice and lexical casting.
//!
//! Numeric XSD types are subtypes of `xsd:number`; string-like XSD types are
//! subtypes of `xsd:string`. There is no deeper hierarchy: `xsd:int` and
//! `xsd:long` are both direct subtypes of `xsd:number` and do not merge with
//! each other.

use serde::Serialize;

use crate::Literal;
use crate::vocab::{RDF_JSON, RDF_LANG_STRING, XSD_NAMESPACE, xsd};

// =============================================================================
// SCALARS
// =============================================================================

/// A literal cast to its native value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Json(serde_json::Value),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Double(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Json(value) => write!(f, "{value}"),
        }
    }
}

// =============================================================================
// DATATYPE TABLE
// =============================================================================

const INTEGER_TYPES: [&str; 13] = [
    xsd::INTEGER,
    xsd::NON_POSITIVE_INTEGER,
    xsd::NEGATIVE_INTEGER,
    xsd::NON_NEGATIVE_INTEGER,
    xsd::POSITIVE_INTEGER,
    xsd::LONG,
    xsd::INT,
    xsd::SHORT,
    xsd::BYTE,
    xsd::UNSIGNED_LONG,
    xsd::UNSIGNED_INT,
    xsd::UNSIGNED_SHORT,
    xsd::UNSIGNED_BYTE,
];

const FLOAT_TYPES: [&str; 4] = [xsd::DECIMAL, xsd::FLOAT, xsd::DOUBLE, xsd::NUMBER];

const STRING_SUBTYPES: [&str; 10] = [
    xsd::NORMALIZED_STRING,
    xsd::ANY_URI,
    xsd::BASE64_BINARY,
    xsd::LANGUAGE,
    xsd::NAME,
    xsd::NCNAME,
    xsd::NMTOKEN,
    xsd::TOKEN,
    xsd::HEX_BINARY,
    RDF_LANG_STRING,
];

/// Whether `iri` names a literal datatype rather than a component type.
#[must_use]
pub fn is_datatype(iri: &str) -> bool {
    iri.starts_with(XSD_NAMESPACE) || iri == RDF_JSON || iri == RDF_LANG_STRING
}

fn is_numeric(iri: &str) -> bool {
    INTEGER_TYPES.contains(&iri) || FLOAT_TYPES.contains(&iri)
}

/// Whether datatype `sub` is `sup` or a direct subtype of it.
#[must_use]
pub fn is_subtype(sub: &str, sup: &str) -> bool {
    sub == sup
        || (sup == xsd::NUMBER && is_numeric(sub))
        || (sup == xsd::STRING && STRING_SUBTYPES.contains(&sub))
}

/// The narrower of two datatypes, if one contains the other.
#[must_use]
pub fn merge_datatypes<'a>(a: &'a str, b: &'a str) -> Option<&'a str> {
    if is_subtype(a, b) {
        Some(a)
    } else if is_subtype(b, a) {
        Some(b)
    } else {
        None
    }
}

// =============================================================================
// CASTING
// =============================================================================

/// Cast `literal` to the native value required by `datatype`.
///
/// Returns `Ok(None)` for datatypes that keep the lexical form untouched
/// (strings and unknown datatypes). Returns the reason on a lexical mismatch.
pub fn cast(literal: &Literal, datatype: &str) -> Result<Option<Scalar>, String> {
    let lexical = literal.value.as_str();
    if datatype == xsd::BOOLEAN {
        return match lexical {
            "true" => Ok(Some(Scalar::Boolean(true))),
            "false" => Ok(Some(Scalar::Boolean(false))),
            _ => Err(format!("\"{lexical}\" is not a boolean")),
        };
    }
    if INTEGER_TYPES.contains(&datatype) {
        return cast_integer(lexical, datatype).map(|value| Some(Scalar::Integer(value)));
    }
    if FLOAT_TYPES.contains(&datatype) {
        return cast_float(lexical).map(|value| Some(Scalar::Double(value)));
    }
    if datatype == RDF_JSON {
        return serde_json::from_str(lexical)
            .map(|value| Some(Scalar::Json(value)))
            .map_err(|e| format!("invalid JSON: {e}"));
    }
    Ok(None)
}

fn cast_integer(lexical: &str, datatype: &str) -> Result<i64, String> {
    let digits = lexical
        .strip_prefix('-')
        .or_else(|| lexical.strip_prefix('+'))
        .unwrap_or(lexical);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("\"{lexical}\" is not an integer"));
    }
    let value: i64 = lexical
        .parse()
        .map_err(|_| format!("\"{lexical}\" is out of range"))?;
    let (min, max) = integer_bounds(datatype);
    if value < min || value > max {
        return Err(format!("\"{lexical}\" is out of range for {datatype}"));
    }
    Ok(value)
}

fn integer_bounds(datatype: &str) -> (i64, i64) {
    match datatype {
        xsd::NON_POSITIVE_INTEGER => (i64::MIN, 0),
        xsd::NEGATIVE_INTEGER => (i64::MIN, -1),
        xsd::NON_NEGATIVE_INTEGER | xsd::UNSIGNED_LONG => (0, i64::MAX),
        xsd::POSITIVE_INTEGER => (1, i64::MAX),
        xsd::INT => (i32::MIN.into(), i32::MAX.into()),
        xsd::SHORT => (i16::MIN.into(), i16::MAX.into()),
        xsd::BYTE => (i8::MIN.into(), i8::MAX.into()),
        xsd::UNSIGNED_INT => (0, u32::MAX.into()),
        xsd::UNSIGNED_SHORT => (0, u16::MAX.into()),
        xsd::UNSIGNED_BYTE => (0, u8::MAX.into()),
        _ => (i64::MIN, i64::MAX),
    }
}

fn cast_float(lexical: &str) -> Result<f64, String> {
    match lexical {
        "INF" | "+INF" => return Ok(f64::INFINITY),
        "-INF" => return Ok(f64::NEG_INFINITY),
        "NaN" => return Ok(f64::NAN),
        _ => {}
    }
    // Rust also accepts "inf" and "nan" spellings, XSD does not.
    if lexical
        .bytes()
        .any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E')
    {
        return Err(format!("\"{lexical}\" is not a number"));
    }
    lexical
        .parse()
        .map_err(|_| format!("\"{lexical}\" is not a number"))
}
