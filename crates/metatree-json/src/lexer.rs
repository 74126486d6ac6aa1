//! JSON lexer.
//!
//! Produces tokens carrying their source span and, for strings and numbers,
//! the raw lexeme (quotes and escapes included). Decoding raw lexemes is the
//! builder's job; the lexer only validates enough structure to tokenize
//! safely.

use crate::error::{Error, Result};
use metatree_node::{Position, Span};

/// Token types produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    /// Left brace `{`
    LeftBrace,
    /// Right brace `}`
    RightBrace,
    /// Left bracket `[`
    LeftBracket,
    /// Right bracket `]`
    RightBracket,
    /// Colon `:`
    Colon,
    /// Comma `,`
    Comma,
    /// Raw string lexeme, including the surrounding quotes
    String(&'a str),
    /// Raw number lexeme
    Number(&'a str),
    /// `true` literal
    True,
    /// `false` literal
    False,
    /// `null` literal
    Null,
    /// End of input
    Eof,
}

/// A token with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Span,
}

/// JSON lexer that tokenizes input while tracking line and column.
///
/// Lines are 1-based, columns 0-based in characters; a token's span end is
/// one past its last character. JSON tokens never contain a raw newline, so
/// every token starts and ends on the same line.
pub(crate) struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn error_here(&self, message: impl Into<String>) -> Error {
        Error::parse(message, self.position())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.advance();
        }
    }

    /// Read the next token from the input.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        self.skip_whitespace();
        let start = self.position();
        let start_pos = self.pos;

        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: Span::new(start, start),
            });
        };

        let kind = match ch {
            '{' => self.punct(TokenKind::LeftBrace),
            '}' => self.punct(TokenKind::RightBrace),
            '[' => self.punct(TokenKind::LeftBracket),
            ']' => self.punct(TokenKind::RightBracket),
            ':' => self.punct(TokenKind::Colon),
            ',' => self.punct(TokenKind::Comma),
            '"' => self.read_string(start_pos)?,
            '-' | '0'..='9' => self.read_number(start_pos)?,
            't' => self.read_keyword("true", TokenKind::True)?,
            'f' => self.read_keyword("false", TokenKind::False)?,
            'n' => self.read_keyword("null", TokenKind::Null)?,
            other => return Err(self.error_here(format!("unexpected character {other:?}"))),
        };

        Ok(Token {
            kind,
            span: Span::new(start, self.position()),
        })
    }

    fn punct(&mut self, kind: TokenKind<'a>) -> TokenKind<'a> {
        self.advance();
        kind
    }

    /// Scan a string lexeme up to its closing quote.
    ///
    /// Escape sequences are skipped, not validated; the builder decodes and
    /// rejects malformed ones. Raw control characters are refused here
    /// because no later stage would see them otherwise.
    fn read_string(&mut self, start_pos: usize) -> Result<TokenKind<'a>> {
        self.advance(); // opening quote

        loop {
            match self.advance() {
                None => return Err(self.error_here("unterminated string")),
                Some('"') => break,
                Some('\\') => {
                    // Skip the escaped character; a trailing backslash at
                    // end of input falls out as an unterminated string.
                    self.advance();
                }
                Some(c) if (c as u32) < 0x20 => {
                    return Err(self.error_here("control character in string"));
                }
                Some(_) => {}
            }
        }

        Ok(TokenKind::String(&self.src[start_pos..self.pos]))
    }

    fn read_digits(&mut self) -> Result<()> {
        if !matches!(self.peek(), Some('0'..='9')) {
            return Err(self.error_here("expected digit in number"));
        }
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }
        Ok(())
    }

    fn read_number(&mut self, start_pos: usize) -> Result<TokenKind<'a>> {
        if self.peek() == Some('-') {
            self.advance();
        }
        match self.peek() {
            Some('0') => {
                self.advance();
            }
            Some('1'..='9') => {
                while matches!(self.peek(), Some('0'..='9')) {
                    self.advance();
                }
            }
            _ => return Err(self.error_here("expected digit in number")),
        }
        if self.peek() == Some('.') {
            self.advance();
            self.read_digits()?;
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.read_digits()?;
        }
        Ok(TokenKind::Number(&self.src[start_pos..self.pos]))
    }

    fn read_keyword(&mut self, word: &'static str, kind: TokenKind<'a>) -> Result<TokenKind<'a>> {
        for expected in word.chars() {
            if self.advance() != Some(expected) {
                return Err(self.error_here(format!("expected keyword `{word}`")));
            }
        }
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind<'_>> {
        let mut lexer = Lexer::new(text);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            let done = token.kind == TokenKind::Eof;
            out.push(token.kind);
            if done {
                return out;
            }
        }
    }

    #[test]
    fn test_punctuation_and_literals() {
        assert_eq!(
            kinds("[true, false, null]"),
            vec![
                TokenKind::LeftBracket,
                TokenKind::True,
                TokenKind::Comma,
                TokenKind::False,
                TokenKind::Comma,
                TokenKind::Null,
                TokenKind::RightBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_lexeme_keeps_quotes() {
        assert_eq!(
            kinds(r#""a\"b""#),
            vec![TokenKind::String(r#""a\"b""#), TokenKind::Eof]
        );
    }

    #[test]
    fn test_number_lexemes() {
        assert_eq!(
            kinds("[0, -12, 3.5, 1e-3]"),
            vec![
                TokenKind::LeftBracket,
                TokenKind::Number("0"),
                TokenKind::Comma,
                TokenKind::Number("-12"),
                TokenKind::Comma,
                TokenKind::Number("3.5"),
                TokenKind::Comma,
                TokenKind::Number("1e-3"),
                TokenKind::RightBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_token_spans() {
        let mut lexer = Lexer::new("\n  42");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.span.start, Position::new(2, 2));
        assert_eq!(token.span.end, Position::new(2, 4));
    }

    #[test]
    fn test_leading_zero_rule() {
        let mut lexer = Lexer::new("01");
        let token = lexer.next_token().unwrap();
        // `01` lexes as `0` followed by `1`; the parser rejects the
        // trailing content.
        assert_eq!(token.kind, TokenKind::Number("0"));
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("\"abc");
        assert!(matches!(
            lexer.next_token(),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_control_character_rejected() {
        let mut lexer = Lexer::new("\"a\u{0001}b\"");
        assert!(matches!(lexer.next_token(), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_bad_keyword() {
        let mut lexer = Lexer::new("nul");
        assert!(matches!(lexer.next_token(), Err(Error::Parse { .. })));
    }
}
