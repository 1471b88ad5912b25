//! Tokenizer for storage-format markup.
//!
//! A single forward pass over the input. Never fails: anything that does not
//! look like a tag is text, anything that starts like a tag but cannot be
//! finished is an [`TokenKind::Unknown`] token.

use super::entities::decode_entities;
use std::borrow::Cow;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Open,
    Close,
    SelfClosing,
    Text,
    CData,
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Lowercased tag name; empty for text, CDATA and unknown tokens.
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    /// Decoded text for `Text`, verbatim payload for `CData`.
    pub text: Cow<'a, str>,
    /// The exact source slice this token was read from.
    pub raw: &'a str,
}

impl<'a> Token<'a> {
    fn tag(kind: TokenKind, name: String, attrs: BTreeMap<String, String>, raw: &'a str) -> Self {
        Self {
            kind,
            name,
            attrs,
            text: Cow::Borrowed(""),
            raw,
        }
    }

    fn content(kind: TokenKind, text: Cow<'a, str>, raw: &'a str) -> Self {
        Self {
            kind,
            name: String::new(),
            attrs: BTreeMap::new(),
            text,
            raw,
        }
    }
}

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Lazy token stream over a markup string.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Consumes up to `len` bytes and returns the consumed slice.
    fn advance(&mut self, len: usize) -> &'a str {
        let start = self.pos;
        self.pos = (self.pos + len).min(self.input.len());
        &self.input[start..self.pos]
    }

    /// Skips past `terminator`, or to end of input when it never appears.
    fn skip_past(&mut self, terminator: &str) {
        match self.rest().find(terminator) {
            Some(idx) => {
                self.advance(idx + terminator.len());
            }
            None => self.pos = self.input.len(),
        }
    }

    fn read_text(&mut self) -> Token<'a> {
        let rest = self.rest();
        // A leading '<' here is a stray bracket that did not start a tag.
        let skip = usize::from(rest.starts_with('<'));
        let len = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
        let raw = self.advance(len);
        Token::content(TokenKind::Text, decode_entities(raw), raw)
    }

    fn read_cdata(&mut self) -> Token<'a> {
        let rest = self.rest();
        let body = &rest[CDATA_OPEN.len()..];
        let (payload, consumed) = match body.find(CDATA_CLOSE) {
            Some(end) => (&body[..end], CDATA_OPEN.len() + end + CDATA_CLOSE.len()),
            None => (body, rest.len()),
        };
        let raw = self.advance(consumed);
        Token::content(TokenKind::CData, Cow::Borrowed(payload), raw)
    }

    fn read_close_tag(&mut self) -> Token<'a> {
        let rest = self.rest();
        let name_len = name_length(&rest[2..]);
        let after_name = &rest[2 + name_len..];
        let trimmed = after_name.trim_start();
        if name_len > 0 && trimmed.starts_with('>') {
            let consumed = rest.len() - trimmed.len() + 1;
            let name = rest[2..2 + name_len].to_ascii_lowercase();
            let raw = self.advance(consumed);
            return Token::tag(TokenKind::Close, name, BTreeMap::new(), raw);
        }
        self.read_unknown()
    }

    fn read_open_tag(&mut self) -> Token<'a> {
        let rest = self.rest();
        let name_len = name_length(&rest[1..]);
        let name = rest[1..1 + name_len].to_ascii_lowercase();
        let mut cursor = 1 + name_len;
        let mut attrs = BTreeMap::new();

        loop {
            let tail = &rest[cursor..];
            let trimmed = tail.trim_start();
            cursor += tail.len() - trimmed.len();

            if trimmed.starts_with("/>") {
                let raw = self.advance(cursor + 2);
                return Token::tag(TokenKind::SelfClosing, name, attrs, raw);
            }
            if trimmed.starts_with('>') {
                let raw = self.advance(cursor + 1);
                return Token::tag(TokenKind::Open, name, attrs, raw);
            }

            let attr_len = trimmed
                .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
                .unwrap_or(trimmed.len());
            if attr_len == 0 {
                if trimmed.starts_with('/') {
                    // Stray slash inside the tag.
                    cursor += 1;
                    continue;
                }
                // End of input or '=' with no attribute name.
                return self.read_unknown();
            }

            let attr_name = trimmed[..attr_len].to_ascii_lowercase();
            cursor += attr_len;

            let tail = &rest[cursor..];
            let after_ws = tail.trim_start();
            if !after_ws.starts_with('=') {
                attrs.insert(attr_name, String::new());
                continue;
            }
            cursor += tail.len() - after_ws.len() + 1;

            let tail = &rest[cursor..];
            let value_start = tail.trim_start();
            cursor += tail.len() - value_start.len();

            match value_start.chars().next() {
                Some(quote @ ('"' | '\'')) => match value_start[1..].find(quote) {
                    Some(end) => {
                        let value = decode_entities(&value_start[1..1 + end]).into_owned();
                        attrs.insert(attr_name, value);
                        cursor += end + 2;
                    }
                    None => return self.read_unknown(),
                },
                Some(_) => {
                    let len = value_start
                        .find(|c: char| c.is_whitespace() || c == '>')
                        .unwrap_or(value_start.len());
                    let value = decode_entities(&value_start[..len]).into_owned();
                    attrs.insert(attr_name, value);
                    cursor += len;
                }
                None => return self.read_unknown(),
            }
        }
    }

    /// Swallows a malformed tag up to the next `>` or the next `<`.
    fn read_unknown(&mut self) -> Token<'a> {
        let rest = self.rest();
        let len = match rest[1..].find(['<', '>']) {
            Some(i) if rest.as_bytes()[1 + i] == b'>' => i + 2,
            Some(i) => i + 1,
            None => rest.len(),
        };
        let raw = self.advance(len);
        tracing::warn!(raw, "malformed tag kept as unknown token");
        Token::content(TokenKind::Unknown, Cow::Borrowed(raw), raw)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return None;
            }
            if !rest.starts_with('<') {
                return Some(self.read_text());
            }
            if rest.starts_with(CDATA_OPEN) {
                return Some(self.read_cdata());
            }
            if rest.starts_with("<!--") {
                self.skip_past("-->");
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past(">");
                continue;
            }
            if rest.starts_with("</") {
                return Some(self.read_close_tag());
            }
            if rest[1..].starts_with(is_name_start) {
                return Some(self.read_open_tag());
            }
            return Some(self.read_text());
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn name_length(s: &str) -> usize {
    if !s.starts_with(is_name_start) {
        return 0;
    }
    s.find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_' | '.')))
        .unwrap_or(s.len())
}
