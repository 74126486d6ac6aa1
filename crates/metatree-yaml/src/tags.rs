//! Core-schema tag table and scalar construction rules.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use metatree_node::{NodeData, NodeType, Span};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Handle prefix the engine resolves `!!` tags to.
pub(crate) const CORE_SCHEMA_HANDLE: &str = "tag:yaml.org,2002:";

/// Whether a tag handle refers to the core schema. Engines differ on
/// whether `!!` is already resolved to its full prefix; accept both
/// spellings.
pub(crate) fn is_core_handle(handle: &str) -> bool {
    handle == CORE_SCHEMA_HANDLE || handle == "!!"
}

/// The built-in tags the loader captures positions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CoreTag {
    Seq,
    Set,
    Pairs,
    Binary,
    Bool,
    Timestamp,
    Null,
    Int,
    Float,
    Omap,
    Map,
    Str,
}

/// Tag-suffix lookup table, built once and immutable afterwards.
pub(crate) static CORE_TAGS: Lazy<HashMap<&'static str, CoreTag>> = Lazy::new(|| {
    HashMap::from([
        ("seq", CoreTag::Seq),
        ("set", CoreTag::Set),
        ("pairs", CoreTag::Pairs),
        ("binary", CoreTag::Binary),
        ("bool", CoreTag::Bool),
        ("timestamp", CoreTag::Timestamp),
        ("null", CoreTag::Null),
        ("int", CoreTag::Int),
        ("float", CoreTag::Float),
        ("omap", CoreTag::Omap),
        ("map", CoreTag::Map),
        ("str", CoreTag::Str),
    ])
});

/// Resolve an untagged plain scalar by the core schema.
///
/// Handles null/boolean/number forms (including the `yes`/`no`/`on`/`off`
/// family and `.inf`/`.nan`); everything else is a string.
pub(crate) fn resolve_plain_scalar(value: &str) -> (NodeData, NodeType) {
    match value {
        "null" | "Null" | "NULL" | "~" | "" => return (NodeData::Null, NodeType::Null),
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => {
            return (NodeData::Bool(true), NodeType::Boolean);
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            return (NodeData::Bool(false), NodeType::Boolean);
        }
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return (NodeData::Float(f64::INFINITY), NodeType::Number);
        }
        "-.inf" | "-.Inf" | "-.INF" => {
            return (NodeData::Float(f64::NEG_INFINITY), NodeType::Number);
        }
        ".nan" | ".NaN" | ".NAN" => return (NodeData::Float(f64::NAN), NodeType::Number),
        _ => {}
    }

    // Only digit-shaped text goes through the numeric parsers; `parse::<f64>`
    // alone would also accept words like `inf`.
    if value.starts_with(['-', '+', '.']) || value.starts_with(|c: char| c.is_ascii_digit()) {
        if let Ok(int) = value.parse::<i64>() {
            return (NodeData::Int(int), NodeType::Number);
        }
        if let Ok(float) = value.parse::<f64>() {
            return (NodeData::Float(float), NodeType::Number);
        }
    }

    (NodeData::String(value.to_string()), NodeType::String)
}

/// Construct a scalar under an explicit core-schema tag.
///
/// Collection tags applied to a scalar, and scalar text that does not fit
/// its tag, are construction errors carrying the scalar's span.
pub(crate) fn construct_tagged_scalar(
    tag: CoreTag,
    value: &str,
    span: Span,
) -> Result<(NodeData, NodeType)> {
    let fail = |name: &str, message: &str| Error::Construct {
        tag: name.to_string(),
        message: message.to_string(),
        span,
    };

    match tag {
        CoreTag::Str => Ok((NodeData::String(value.to_string()), NodeType::String)),
        CoreTag::Null => match value {
            "" | "~" | "null" | "Null" | "NULL" => Ok((NodeData::Null, NodeType::Null)),
            _ => Err(fail("null", "expected a null value")),
        },
        CoreTag::Bool => match resolve_plain_scalar(value) {
            (NodeData::Bool(b), _) => Ok((NodeData::Bool(b), NodeType::Boolean)),
            _ => Err(fail("bool", "expected a boolean value")),
        },
        CoreTag::Int => parse_int(value)
            .map(|i| (NodeData::Int(i), NodeType::Number))
            .ok_or_else(|| fail("int", "expected an integer value")),
        CoreTag::Float => parse_float(value)
            .map(|f| (NodeData::Float(f), NodeType::Number))
            .ok_or_else(|| fail("float", "expected a float value")),
        CoreTag::Binary => {
            let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
            BASE64
                .decode(compact.as_bytes())
                .map(|bytes| (NodeData::Binary(bytes), NodeType::Binary))
                .map_err(|e| fail("binary", &format!("invalid base64 data: {e}")))
        }
        CoreTag::Timestamp => {
            // Keep the canonical text; a loose shape check catches the
            // obvious mistakes (timestamps start with `YYYY-`).
            let plausible = value.len() >= 8
                && value.as_bytes()[..4].iter().all(u8::is_ascii_digit)
                && value.as_bytes()[4] == b'-';
            if plausible {
                Ok((NodeData::Datetime(value.to_string()), NodeType::Datetime))
            } else {
                Err(fail("timestamp", "expected a timestamp value"))
            }
        }
        CoreTag::Seq | CoreTag::Omap | CoreTag::Pairs => {
            Err(fail(tag_suffix(tag), "tag expects a sequence node"))
        }
        CoreTag::Map | CoreTag::Set => Err(fail(tag_suffix(tag), "tag expects a mapping node")),
    }
}

pub(crate) fn tag_suffix(tag: CoreTag) -> &'static str {
    match tag {
        CoreTag::Seq => "seq",
        CoreTag::Set => "set",
        CoreTag::Pairs => "pairs",
        CoreTag::Binary => "binary",
        CoreTag::Bool => "bool",
        CoreTag::Timestamp => "timestamp",
        CoreTag::Null => "null",
        CoreTag::Int => "int",
        CoreTag::Float => "float",
        CoreTag::Omap => "omap",
        CoreTag::Map => "map",
        CoreTag::Str => "str",
    }
}

/// Integer forms of the core schema: sign, decimal, `0x`/`0o`/`0b`
/// prefixes, `_` separators.
fn parse_int(value: &str) -> Option<i64> {
    let cleaned: String = value.chars().filter(|c| *c != '_').collect();
    let (sign, magnitude) = match cleaned.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    let parsed = if let Some(hex) = magnitude.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(octal) = magnitude.strip_prefix("0o") {
        i64::from_str_radix(octal, 8).ok()?
    } else if let Some(binary) = magnitude.strip_prefix("0b") {
        i64::from_str_radix(binary, 2).ok()?
    } else {
        magnitude.parse::<i64>().ok()?
    };
    Some(sign * parsed)
}

fn parse_float(value: &str) -> Option<f64> {
    let cleaned: String = value.chars().filter(|c| *c != '_').collect();
    match cleaned.as_str() {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => return Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        _ => {}
    }
    if cleaned.starts_with(['-', '+', '.']) || cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        cleaned.parse::<f64>().ok()
    } else {
        None
    }
}
