//! Builder that transforms the engine's parse tree into annotated nodes.

use crate::error::{Error, Result};
use crate::parser::{self, Label, ParseNode};
use indexmap::IndexMap;
use metatree_node::{Node, NodeData, NodeType};
use std::str::Chars;
use tracing::debug;

/// Load a string representation of a JSON document as a [`Node`] tree.
///
/// # Example
///
/// ```rust
/// let json = metatree_json::load(r#"{"test": 123}"#).unwrap();
/// assert_eq!(json.raw(), serde_json::json!({"test": 123}));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] for any syntactically invalid input, carrying
/// the engine's diagnostic. A failed load never yields a partial tree.
pub fn load(text: &str) -> Result<Node> {
    let tree = parser::parse(text)?;
    let root = build(&tree)?;
    debug!(data_type = ?root.data_type, "loaded json document");
    Ok(root)
}

fn build(node: &ParseNode<'_>) -> Result<Node> {
    let (data, data_type) = match node.label {
        Label::Object => {
            let mut map = IndexMap::with_capacity(node.children.len());
            for pair in &node.children {
                // A pair yields a (key node, value node) entry; the pair
                // itself never becomes a node of its own.
                let [key_tree, value_tree] = &pair.children[..] else {
                    return Err(Error::UnexpectedSyntax { label: "pair" });
                };
                map.insert(build(key_tree)?, build(value_tree)?);
            }
            (NodeData::Object(map), NodeType::Object)
        }
        Label::Array => {
            let items = node
                .children
                .iter()
                .map(build)
                .collect::<Result<Vec<_>>>()?;
            (NodeData::Array(items), NodeType::Array)
        }
        Label::String => (NodeData::String(decode_string(node)?), NodeType::String),
        Label::Number => (decode_number(node)?, NodeType::Number),
        Label::True => (NodeData::Bool(true), NodeType::True),
        Label::False => (NodeData::Bool(false), NodeType::False),
        Label::Null => (NodeData::Null, NodeType::Null),
        Label::Pair => return Err(Error::UnexpectedSyntax { label: "pair" }),
    };
    Ok(Node::new(data, data_type, node.span))
}

/// Decode a raw string lexeme (quotes included) into its value.
fn decode_string(node: &ParseNode<'_>) -> Result<String> {
    let inner = &node.lexeme[1..node.lexeme.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let escape = chars
            .next()
            .ok_or_else(|| Error::parse("truncated escape sequence", node.span.start))?;
        let decoded = match escape {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => decode_unicode_escape(&mut chars, node)?,
            other => {
                return Err(Error::parse(
                    format!("invalid escape sequence `\\{other}`"),
                    node.span.start,
                ));
            }
        };
        out.push(decoded);
    }

    Ok(out)
}

/// Decode a `\uXXXX` escape, pairing surrogates into a single character.
fn decode_unicode_escape(chars: &mut Chars<'_>, node: &ParseNode<'_>) -> Result<char> {
    let unit = read_hex4(chars, node)?;

    if (0xDC00..=0xDFFF).contains(&unit) {
        return Err(Error::parse(
            "unpaired low surrogate in \\u escape",
            node.span.start,
        ));
    }

    if (0xD800..=0xDBFF).contains(&unit) {
        if chars.next() != Some('\\') || chars.next() != Some('u') {
            return Err(Error::parse(
                "unpaired high surrogate in \\u escape",
                node.span.start,
            ));
        }
        let low = read_hex4(chars, node)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return Err(Error::parse(
                "expected low surrogate in \\u escape",
                node.span.start,
            ));
        }
        let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(code)
            .ok_or_else(|| Error::parse("invalid \\u escape", node.span.start));
    }

    char::from_u32(unit).ok_or_else(|| Error::parse("invalid \\u escape", node.span.start))
}

fn read_hex4(chars: &mut Chars<'_>, node: &ParseNode<'_>) -> Result<u32> {
    let mut value = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| Error::parse("invalid \\u escape", node.span.start))?;
        value = value * 16 + digit;
    }
    Ok(value)
}

/// Decode a raw number lexeme. Plain integers become `Int`; fractions,
/// exponents, and `i64` overflow become `Float`.
fn decode_number(node: &ParseNode<'_>) -> Result<NodeData> {
    let lexeme = node.lexeme;
    if !lexeme.contains(['.', 'e', 'E']) {
        if let Ok(int) = lexeme.parse::<i64>() {
            return Ok(NodeData::Int(int));
        }
    }
    lexeme
        .parse::<f64>()
        .map(NodeData::Float)
        .map_err(|_| Error::parse(format!("invalid number literal `{lexeme}`"), node.span.start))
}
