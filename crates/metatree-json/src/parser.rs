//! Recursive-descent JSON parser.
//!
//! Produces a parse tree where every node carries a grammar label, its raw
//! lexeme (for scalar tokens), and a half-open source span. The tree is the
//! engine-side representation; the builder turns it into annotated nodes.

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use metatree_node::Span;

/// Grammar label of a parse-tree node. Closed set; the builder matches it
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Label {
    Object,
    Array,
    Pair,
    String,
    Number,
    True,
    False,
    Null,
}

/// A node of the engine's parse tree.
///
/// `Pair` nodes appear only as direct children of `Object` nodes, with
/// exactly two children of their own (key, value).
#[derive(Debug)]
pub(crate) struct ParseNode<'a> {
    pub label: Label,
    /// Raw source text for `String`/`Number` nodes, empty otherwise.
    pub lexeme: &'a str,
    pub children: Vec<ParseNode<'a>>,
    pub span: Span,
}

impl<'a> ParseNode<'a> {
    fn leaf(label: Label, lexeme: &'a str, span: Span) -> Self {
        Self {
            label,
            lexeme,
            children: Vec::new(),
            span,
        }
    }
}

/// Parse a JSON text into a parse tree.
///
/// Trailing content after the top-level value is a parse error.
pub(crate) fn parse(text: &str) -> Result<ParseNode<'_>> {
    let mut parser = Parser::new(text)?;
    let root = parser.parse_value()?;
    parser.expect_eof()?;
    Ok(root)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token<'a>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(text);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Consume the current token and return it.
    fn advance(&mut self) -> Result<Token<'a>> {
        let taken = self.current;
        self.current = self.lexer.next_token()?;
        Ok(taken)
    }

    fn error_at_current(&self, message: impl Into<String>) -> Error {
        Error::parse(message, self.current.span.start)
    }

    fn parse_value(&mut self) -> Result<ParseNode<'a>> {
        match self.current.kind {
            TokenKind::LeftBrace => self.parse_object(),
            TokenKind::LeftBracket => self.parse_array(),
            TokenKind::String(lexeme) => {
                let token = self.advance()?;
                Ok(ParseNode::leaf(Label::String, lexeme, token.span))
            }
            TokenKind::Number(lexeme) => {
                let token = self.advance()?;
                Ok(ParseNode::leaf(Label::Number, lexeme, token.span))
            }
            TokenKind::True => {
                let token = self.advance()?;
                Ok(ParseNode::leaf(Label::True, "", token.span))
            }
            TokenKind::False => {
                let token = self.advance()?;
                Ok(ParseNode::leaf(Label::False, "", token.span))
            }
            TokenKind::Null => {
                let token = self.advance()?;
                Ok(ParseNode::leaf(Label::Null, "", token.span))
            }
            TokenKind::Eof => Err(self.error_at_current("unexpected end of input")),
            TokenKind::RightBrace
            | TokenKind::RightBracket
            | TokenKind::Colon
            | TokenKind::Comma => Err(self.error_at_current("expected a value")),
        }
    }

    fn parse_object(&mut self) -> Result<ParseNode<'a>> {
        let open = self.advance()?;
        let mut pairs = Vec::new();

        if self.current.kind != TokenKind::RightBrace {
            loop {
                let key = match self.current.kind {
                    TokenKind::String(lexeme) => {
                        let token = self.advance()?;
                        ParseNode::leaf(Label::String, lexeme, token.span)
                    }
                    _ => return Err(self.error_at_current("expected string key")),
                };

                if self.current.kind != TokenKind::Colon {
                    return Err(self.error_at_current("expected `:` after object key"));
                }
                self.advance()?;

                let value = self.parse_value()?;
                let span = Span::new(key.span.start, value.span.end);
                pairs.push(ParseNode {
                    label: Label::Pair,
                    lexeme: "",
                    children: vec![key, value],
                    span,
                });

                match self.current.kind {
                    TokenKind::Comma => {
                        self.advance()?;
                    }
                    TokenKind::RightBrace => break,
                    _ => return Err(self.error_at_current("expected `,` or `}` in object")),
                }
            }
        }

        let close = self.advance()?;
        Ok(ParseNode {
            label: Label::Object,
            lexeme: "",
            children: pairs,
            span: Span::new(open.span.start, close.span.end),
        })
    }

    fn parse_array(&mut self) -> Result<ParseNode<'a>> {
        let open = self.advance()?;
        let mut items = Vec::new();

        if self.current.kind != TokenKind::RightBracket {
            loop {
                items.push(self.parse_value()?);
                match self.current.kind {
                    TokenKind::Comma => {
                        self.advance()?;
                    }
                    TokenKind::RightBracket => break,
                    _ => return Err(self.error_at_current("expected `,` or `]` in array")),
                }
            }
        }

        let close = self.advance()?;
        Ok(ParseNode {
            label: Label::Array,
            lexeme: "",
            children: items,
            span: Span::new(open.span.start, close.span.end),
        })
    }

    fn expect_eof(&self) -> Result<()> {
        if self.current.kind != TokenKind::Eof {
            return Err(self.error_at_current("unexpected trailing characters"));
        }
        Ok(())
    }
}
