//! YAML parser that builds annotated [`Node`] trees.

use crate::error::{Error, Result};
use crate::resolver::{RejectCustomTags, TagResolver, TaggedValue};
use crate::tags::{self, CORE_TAGS, CoreTag};
use indexmap::IndexMap;
use metatree_node::{Node, NodeData, NodeType, Position, Span};
use std::collections::HashMap;
use tracing::debug;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Load a string representation of a YAML stream as a [`Node`] tree.
///
/// The stream may hold zero, one, or many `---`-separated documents: zero
/// yields a null node with a zero-width span, one yields that document's
/// node directly, and several yield an array node spanning the stream.
///
/// # Example
///
/// ```rust
/// let yaml = metatree_yaml::load("test: 123").unwrap();
/// assert_eq!(yaml.get("test").unwrap().as_i64(), Some(123));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] wrapping the engine's diagnostic on malformed
/// input. A failed load never yields a partial tree.
pub fn load(text: &str) -> Result<Node> {
    load_with(text, &RejectCustomTags)
}

/// Load a YAML stream, resolving custom tags through `resolver`.
///
/// This is the extension seam specialized loaders build on: the builder
/// constructs the tagged node's content normally, then hands content and
/// span to the resolver instead of failing on the unknown tag.
///
/// # Errors
///
/// As [`load`], plus whatever the resolver returns for its tags.
pub fn load_with(text: &str, resolver: &dyn TagResolver) -> Result<Node> {
    let mut parser = Parser::new_from_str(text);
    let mut builder = TreeBuilder::new(text, resolver);

    // The parser, reader, and scanner state all live inside `parser` and
    // drop on every exit path, including mid-stream errors.
    parser.load(&mut builder, true).map_err(Error::from)?;

    builder.finish()
}

/// A container being assembled while its events stream in.
enum Frame {
    Sequence {
        start: Marker,
        tag: Option<Tag>,
        anchor: usize,
        items: Vec<Node>,
    },
    Mapping {
        start: Marker,
        tag: Option<Tag>,
        anchor: usize,
        entries: Vec<(Node, Option<Node>)>,
    },
}

/// Builder that implements [`MarkedEventReceiver`] to construct node trees.
struct TreeBuilder<'a> {
    /// The source text, used to compute scalar end positions.
    source: &'a str,

    /// Resolver for custom tags.
    resolver: &'a dyn TagResolver,

    /// Stack of containers being constructed.
    stack: Vec<Frame>,

    /// Completed root node of each document seen so far.
    docs: Vec<Node>,

    /// Completed nodes recorded by anchor id, for alias resolution.
    anchors: HashMap<usize, Node>,

    /// First error raised inside the event callback. Once set, all further
    /// events are ignored; `finish` re-surfaces it.
    error: Option<Error>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str, resolver: &'a dyn TagResolver) -> Self {
        Self {
            source,
            resolver,
            stack: Vec::new(),
            docs: Vec::new(),
            anchors: HashMap::new(),
            error: None,
        }
    }

    /// Assemble the document stream into the root node.
    fn finish(self) -> Result<Node> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut docs = self.docs;
        debug!(documents = docs.len(), "assembled yaml stream");

        if docs.len() == 1 {
            return Ok(docs.swap_remove(0));
        }
        match (docs.first(), docs.last()) {
            (Some(first), Some(last)) => {
                let span = Span::new(first.span.start, last.span.end);
                Ok(Node::new(NodeData::Array(docs), NodeType::Array, span))
            }
            _ => Ok(Node::empty_stream()),
        }
    }

    /// Record a completed node: into its parent container, or as a
    /// document root when no container is open.
    fn push_complete(&mut self, node: Node, anchor: usize) {
        if anchor != 0 {
            self.anchors.insert(anchor, node.clone());
        }

        match self.stack.last_mut() {
            None => self.docs.push(node),
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping { entries, .. }) => {
                if let Some((_, value)) = entries.last_mut() {
                    if value.is_none() {
                        *value = Some(node);
                    } else {
                        entries.push((node, None));
                    }
                } else {
                    entries.push((node, None));
                }
            }
        }
    }

    fn fail(&mut self, error: Error) {
        self.error = Some(error);
    }

    fn build_scalar(
        &mut self,
        value: String,
        style: TScalarStyle,
        marker: &Marker,
        tag: Option<Tag>,
    ) -> Result<Node> {
        let start = position_from_marker(marker);
        let end = self.scalar_end(marker, style, &value);
        let span = Span::new(start, end);

        if let Some(tag) = tag {
            if tags::is_core_handle(&tag.handle) {
                let core = CORE_TAGS.get(tag.suffix.as_str()).ok_or_else(|| {
                    Error::UnresolvedTag {
                        tag: tag.suffix.clone(),
                        span,
                    }
                })?;
                let (data, data_type) = tags::construct_tagged_scalar(*core, &value, span)?;
                return Ok(Node::new(data, data_type, span));
            }
            return self.resolver.resolve(&tag.suffix, TaggedValue::Scalar(value), span);
        }

        let (data, data_type) = if style == TScalarStyle::Plain {
            tags::resolve_plain_scalar(&value)
        } else {
            (NodeData::String(value), NodeType::String)
        };
        Ok(Node::new(data, data_type, span))
    }

    fn complete_sequence(
        &mut self,
        start: Marker,
        tag: Option<Tag>,
        items: Vec<Node>,
        end: &Marker,
    ) -> Result<Node> {
        let span = Span::new(position_from_marker(&start), position_from_marker(end));

        if let Some(tag) = tag {
            if tags::is_core_handle(&tag.handle) {
                let core = CORE_TAGS.get(tag.suffix.as_str()).ok_or_else(|| {
                    Error::UnresolvedTag {
                        tag: tag.suffix.clone(),
                        span,
                    }
                })?;
                return match core {
                    CoreTag::Seq => Ok(Node::new(NodeData::Array(items), NodeType::Array, span)),
                    CoreTag::Omap => build_omap(items, span),
                    CoreTag::Pairs => build_pairs(items, span),
                    other => Err(Error::Construct {
                        tag: tags::tag_suffix(*other).to_string(),
                        message: "tag does not apply to a sequence node".to_string(),
                        span,
                    }),
                };
            }
            return self
                .resolver
                .resolve(&tag.suffix, TaggedValue::Sequence(items), span);
        }

        Ok(Node::new(NodeData::Array(items), NodeType::Array, span))
    }

    fn complete_mapping(
        &mut self,
        start: Marker,
        tag: Option<Tag>,
        entries: Vec<(Node, Option<Node>)>,
        end: &Marker,
    ) -> Result<Node> {
        let span = Span::new(position_from_marker(&start), position_from_marker(end));

        let mut map = IndexMap::with_capacity(entries.len());
        for (key, value) in entries {
            let value = value.ok_or_else(|| Error::Parse {
                message: "mapping entry without value".to_string(),
            })?;
            map.insert(key, value);
        }

        if let Some(tag) = tag {
            if tags::is_core_handle(&tag.handle) {
                let core = CORE_TAGS.get(tag.suffix.as_str()).ok_or_else(|| {
                    Error::UnresolvedTag {
                        tag: tag.suffix.clone(),
                        span,
                    }
                })?;
                return match core {
                    CoreTag::Map => Ok(Node::new(NodeData::Object(map), NodeType::Object, span)),
                    // A set is a mapping whose values are all null; the
                    // annotated view keeps the key nodes, in order.
                    CoreTag::Set => Ok(Node::new(
                        NodeData::Array(map.into_keys().collect()),
                        NodeType::Array,
                        span,
                    )),
                    other => Err(Error::Construct {
                        tag: tags::tag_suffix(*other).to_string(),
                        message: "tag does not apply to a mapping node".to_string(),
                        span,
                    }),
                };
            }
            return self.resolver.resolve(
                &tag.suffix,
                TaggedValue::Mapping(map.into_iter().collect()),
                span,
            );
        }

        Ok(Node::new(NodeData::Object(map), NodeType::Object, span))
    }

    /// Compute a scalar's exclusive end position.
    ///
    /// The engine only marks where a scalar starts, so the end comes from
    /// the source text: quoted scalars scan to their closing quote, block
    /// scalars extend over their indented lines, and plain scalars take
    /// their value length (plain text is written as-is).
    fn scalar_end(&self, marker: &Marker, style: TScalarStyle, value: &str) -> Position {
        match style {
            TScalarStyle::SingleQuoted | TScalarStyle::DoubleQuoted => {
                let double = style == TScalarStyle::DoubleQuoted;
                match quoted_end_offset(self.source, marker.index(), double) {
                    Some(offset) => position_at(self.source, offset),
                    None => Position::new(marker.line(), marker.col() + value.chars().count()),
                }
            }
            TScalarStyle::Literal | TScalarStyle::Folded => {
                position_at(self.source, block_end_offset(self.source, marker.index()))
            }
            _ => Position::new(marker.line(), marker.col() + value.chars().count()),
        }
    }
}

impl MarkedEventReceiver for TreeBuilder<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}

            Event::Scalar(value, style, anchor, tag) => {
                match self.build_scalar(value, style, &marker, tag) {
                    Ok(node) => self.push_complete(node, anchor),
                    Err(error) => self.fail(error),
                }
            }

            Event::SequenceStart(anchor, tag) => {
                self.stack.push(Frame::Sequence {
                    start: marker,
                    tag,
                    anchor,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => match self.stack.pop() {
                Some(Frame::Sequence {
                    start,
                    tag,
                    anchor,
                    items,
                }) => match self.complete_sequence(start, tag, items, &marker) {
                    Ok(node) => self.push_complete(node, anchor),
                    Err(error) => self.fail(error),
                },
                _ => self.fail(Error::Parse {
                    message: "sequence end without matching start".to_string(),
                }),
            },

            Event::MappingStart(anchor, tag) => {
                self.stack.push(Frame::Mapping {
                    start: marker,
                    tag,
                    anchor,
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Mapping {
                    start,
                    tag,
                    anchor,
                    entries,
                }) => match self.complete_mapping(start, tag, entries, &marker) {
                    Ok(node) => self.push_complete(node, anchor),
                    Err(error) => self.fail(error),
                },
                _ => self.fail(Error::Parse {
                    message: "mapping end without matching start".to_string(),
                }),
            },

            Event::Alias(anchor) => match self.anchors.get(&anchor) {
                Some(node) => {
                    let node = node.clone();
                    self.push_complete(node, 0);
                }
                None => {
                    let at = position_from_marker(&marker);
                    self.fail(Error::UnknownAnchor {
                        span: Span::new(at, at),
                    });
                }
            },
        }
    }
}

/// Convert an engine marker to a position.
///
/// yaml-rust2 markers carry 1-based lines and 0-based columns, which is
/// already the convention the node model uses.
fn position_from_marker(marker: &Marker) -> Position {
    Position::new(marker.line(), marker.col())
}

/// Convert a character offset into a position by scanning the source.
fn position_at(source: &str, char_offset: usize) -> Position {
    let mut line = 1;
    let mut column = 0;
    for (i, ch) in source.chars().enumerate() {
        if i >= char_offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    Position::new(line, column)
}

/// Find the offset one past the closing quote of a quoted scalar whose
/// opening quote sits at `start`.
fn quoted_end_offset(source: &str, start: usize, double: bool) -> Option<usize> {
    let mut chars = source.chars().skip(start).peekable();
    chars.next()?; // opening quote
    let mut offset = start + 1;

    while let Some(ch) = chars.next() {
        offset += 1;
        if double {
            match ch {
                '\\' => {
                    if chars.next().is_some() {
                        offset += 1;
                    }
                }
                '"' => return Some(offset),
                _ => {}
            }
        } else if ch == '\'' {
            // `''` is an escaped quote inside single-quoted scalars.
            if chars.peek() == Some(&'\'') {
                chars.next();
                offset += 1;
            } else {
                return Some(offset);
            }
        }
    }
    None
}

/// Find the end of a block scalar whose `|`/`>` indicator sits at `start`:
/// the end of the last non-blank line indented deeper than the indicator's
/// own line.
fn block_end_offset(source: &str, start: usize) -> usize {
    let chars: Vec<char> = source.chars().collect();
    if start >= chars.len() {
        return start;
    }

    let mut line_begin = start;
    while line_begin > 0 && chars[line_begin - 1] != '\n' {
        line_begin -= 1;
    }
    let mut header_indent = 0;
    while chars.get(line_begin + header_indent) == Some(&' ') {
        header_indent += 1;
    }

    let mut i = start;
    while i < chars.len() && chars[i] != '\n' {
        i += 1;
    }
    let mut end = i; // end of the indicator line

    while i < chars.len() {
        i += 1; // past '\n'
        let content_start = i;
        let mut j = i;
        while j < chars.len() && chars[j] == ' ' {
            j += 1;
        }
        let mut line_end = j;
        while line_end < chars.len() && chars[line_end] != '\n' {
            line_end += 1;
        }

        let blank = j == line_end;
        if blank {
            i = line_end;
            continue;
        }
        if j - content_start <= header_indent {
            break;
        }
        end = line_end;
        i = line_end;
    }

    end
}

fn build_omap(items: Vec<Node>, span: Span) -> Result<Node> {
    let mut map = IndexMap::with_capacity(items.len());
    for item in items {
        let item_span = item.span;
        match item.data {
            NodeData::Object(entries) if entries.len() == 1 => {
                for (key, value) in entries {
                    map.insert(key, value);
                }
            }
            _ => {
                return Err(Error::Construct {
                    tag: "omap".to_string(),
                    message: "expected a sequence of single-entry mappings".to_string(),
                    span: item_span,
                });
            }
        }
    }
    Ok(Node::new(NodeData::Object(map), NodeType::Object, span))
}

fn build_pairs(items: Vec<Node>, span: Span) -> Result<Node> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let item_span = item.span;
        match item.data {
            NodeData::Object(entries) if entries.len() == 1 => {
                for (key, value) in entries {
                    out.push(Node::new(
                        NodeData::Array(vec![key, value]),
                        NodeType::Array,
                        item_span,
                    ));
                }
            }
            _ => {
                return Err(Error::Construct {
                    tag: "pairs".to_string(),
                    message: "expected a sequence of single-entry mappings".to_string(),
                    span: item_span,
                });
            }
        }
    }
    Ok(Node::new(NodeData::Array(out), NodeType::Array, span))
}
