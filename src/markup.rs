//! Streaming tag scanner for stored HTML templates.
//!
//! Every component that looks inside the template (image extraction, body
//! extraction, hero splicing, `src` rewriting, tag stripping) walks the same
//! token stream produced here. The scanner is deliberately small: it does not
//! build a tree, decode entities, or repair markup. It only knows enough HTML
//! to find tags reliably:
//!
//! - attribute values may be double-quoted, single-quoted or unquoted, and a
//!   quoted value may contain `>`
//! - tag and attribute names are matched case-insensitively
//! - `<!-- comments -->`, `<!DOCTYPE ...>` and `<?...?>` are opaque
//! - the content of `<script>`, `<style>`, `<textarea>` and `<title>` is raw
//!   text, so an `<img` inside a script string is not an image
//! - a `<` that does not open a well-formed tag is plain text
//!
//! Tokens borrow from the source and carry byte spans, so callers can copy
//! untouched regions verbatim and rewrite only what they need.
//!
//! ```text
//! <p class="x">Hi <img src='a.png'/></p>
//! └─StartTag──┘└Text┘└───StartTag───┘└EndTag┘
//! ```

use std::ops::Range;

/// Elements whose content is raw text rather than markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// A single attribute inside a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name as written in the source.
    pub name: &'a str,
    /// Raw value without surrounding quotes. `None` for bare attributes like `defer`.
    pub value: Option<&'a str>,
    /// Span of the whole attribute, from the first byte of the name to the
    /// closing quote (or last byte of an unquoted value).
    pub span: Range<usize>,
}

/// A start tag such as `<img src="a.png" alt="">`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    pub attributes: Vec<Attribute<'a>>,
    /// Written with a trailing `/>`.
    pub self_closing: bool,
    /// Span from `<` to `>` inclusive.
    pub span: Range<usize>,
}

impl<'a> Tag<'a> {
    /// Case-insensitive tag name comparison.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// First attribute with the given name (case-insensitive), as browsers do
    /// when an attribute is repeated.
    pub fn attr(&self, name: &str) -> Option<&Attribute<'a>> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// Value of the named attribute, `None` if absent or bare.
    pub fn attr_value(&self, name: &str) -> Option<&'a str> {
        self.attr(name).and_then(|attr| attr.value)
    }

    /// Byte offset just past the tag name, where new attributes can be inserted.
    pub fn name_end(&self) -> usize {
        self.span.start + 1 + self.name.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text { text: &'a str, span: Range<usize> },
    StartTag(Tag<'a>),
    EndTag { name: &'a str, span: Range<usize> },
    Comment { span: Range<usize> },
    /// `<!DOCTYPE html>`, `<![CDATA[...]]>`, `<?xml ...?>`.
    Declaration { span: Range<usize> },
}

impl Token<'_> {
    pub fn span(&self) -> Range<usize> {
        match self {
            Token::Text { span, .. }
            | Token::EndTag { span, .. }
            | Token::Comment { span }
            | Token::Declaration { span } => span.clone(),
            Token::StartTag(tag) => tag.span.clone(),
        }
    }
}

/// Iterator over the tokens of an HTML string.
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    /// Set after a raw-text start tag; the next token is its verbatim content.
    raw_text: Option<&'a str>,
}

/// Whether `tag` opens an element whose content the tokenizer returns as one
/// raw text token.
pub fn is_raw_text_element(tag: &Tag<'_>) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|raw| tag.is(raw))
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            raw_text: None,
        }
    }

    fn text_until(&mut self, end: usize) -> Token<'a> {
        let span = self.pos..end;
        self.pos = end;
        Token::Text {
            text: &self.src[span.clone()],
            span,
        }
    }

    /// Content of a raw-text element, up to (not including) its end tag.
    fn raw_text_token(&mut self, element: &str) -> Option<Token<'a>> {
        let end = find_end_tag(self.src, self.pos, element).unwrap_or(self.src.len());
        if end == self.pos {
            return None;
        }
        Some(self.text_until(end))
    }

    fn next_markup(&mut self) -> Token<'a> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let rest = &self.src[start..];

        if rest.starts_with("<!--") {
            let end = rest[4..]
                .find("-->")
                .map(|i| start + 4 + i + 3)
                .unwrap_or(self.src.len());
            self.pos = end;
            return Token::Comment { span: start..end };
        }

        match bytes.get(start + 1) {
            Some(b'!') | Some(b'?') => {
                let end = rest
                    .find('>')
                    .map(|i| start + i + 1)
                    .unwrap_or(self.src.len());
                self.pos = end;
                Token::Declaration { span: start..end }
            }
            Some(b'/') if bytes.get(start + 2).is_some_and(u8::is_ascii_alphabetic) => {
                match self.src[start..].find('>') {
                    Some(i) => {
                        let end = start + i + 1;
                        let name_end = scan_name(bytes, start + 2);
                        self.pos = end;
                        Token::EndTag {
                            name: &self.src[start + 2..name_end],
                            span: start..end,
                        }
                    }
                    None => self.text_until(self.src.len()),
                }
            }
            Some(c) if c.is_ascii_alphabetic() => match parse_start_tag(self.src, start) {
                Some(tag) => {
                    self.pos = tag.span.end;
                    if !tag.self_closing {
                        self.raw_text = RAW_TEXT_ELEMENTS
                            .iter()
                            .copied()
                            .find(|raw| tag.is(raw));
                    }
                    Token::StartTag(tag)
                }
                None => self.text_until(self.src.len()),
            },
            _ => {
                // A stray `<`: plain text up to the next candidate tag.
                let end = self.src[start + 1..]
                    .find('<')
                    .map(|i| start + 1 + i)
                    .unwrap_or(self.src.len());
                self.text_until(end)
            }
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(element) = self.raw_text.take() {
            if let Some(token) = self.raw_text_token(element) {
                return Some(token);
            }
        }
        if self.pos >= self.src.len() {
            return None;
        }
        if self.src.as_bytes()[self.pos] == b'<' {
            return Some(self.next_markup());
        }
        let end = self.src[self.pos..]
            .find('<')
            .map(|i| self.pos + i)
            .unwrap_or(self.src.len());
        Some(self.text_until(end))
    }
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

/// End of a tag or attribute name starting at `from`.
fn scan_name(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() && !is_space(bytes[i]) && !matches!(bytes[i], b'/' | b'>' | b'=') {
        i += 1;
    }
    i
}

fn skip_space(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_space(bytes[i]) {
        i += 1;
    }
    i
}

/// Parse a start tag whose `<` is at `start`. `None` if the tag never closes.
fn parse_start_tag(src: &str, start: usize) -> Option<Tag<'_>> {
    let bytes = src.as_bytes();
    let name_end = scan_name(bytes, start + 1);
    let name = &src[start + 1..name_end];
    let mut attributes = Vec::new();
    let mut i = name_end;

    loop {
        i = skip_space(bytes, i);
        match bytes.get(i)? {
            b'>' => {
                return Some(Tag {
                    name,
                    attributes,
                    self_closing: false,
                    span: start..i + 1,
                });
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Some(Tag {
                    name,
                    attributes,
                    self_closing: true,
                    span: start..i + 2,
                });
            }
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let attr_start = i;
        // `=` may legally open an attribute name; consume it so we make progress.
        let attr_name_end = scan_name(bytes, i + 1).max(i + 1);
        let attr_name = &src[attr_start..attr_name_end];
        i = skip_space(bytes, attr_name_end);

        if bytes.get(i) != Some(&b'=') {
            attributes.push(Attribute {
                name: attr_name,
                value: None,
                span: attr_start..attr_name_end,
            });
            continue;
        }

        i = skip_space(bytes, i + 1);
        let (value, end) = match bytes.get(i)? {
            quote @ (b'"' | b'\'') => {
                let close = src[i + 1..].find(*quote as char)? + i + 1;
                (&src[i + 1..close], close + 1)
            }
            _ => {
                let mut j = i;
                while j < bytes.len() && !is_space(bytes[j]) && bytes[j] != b'>' {
                    j += 1;
                }
                (&src[i..j], j)
            }
        };
        attributes.push(Attribute {
            name: attr_name,
            value: Some(value),
            span: attr_start..end,
        });
        i = end;
    }
}

/// Offset of the next `</name` (case-insensitive) at or after `from`.
fn find_end_tag(src: &str, from: usize, name: &str) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut search = from;
    while let Some(i) = src[search..].find("</") {
        let at = search + i;
        let name_start = at + 2;
        let name_end = name_start + name.len();
        if name_end <= bytes.len()
            && bytes[name_start..name_end].eq_ignore_ascii_case(name.as_bytes())
            && bytes
                .get(name_end)
                .is_none_or(|b| is_space(*b) || matches!(b, b'/' | b'>'))
        {
            return Some(at);
        }
        search = at + 2;
    }
    None
}

/// Location of one element: its start tag, its content and its end tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub open: Range<usize>,
    pub inner: Range<usize>,
    pub close: Range<usize>,
}

impl Element {
    /// From the `<` of the start tag to the `>` of the end tag.
    pub fn outer(&self) -> Range<usize> {
        self.open.start..self.close.end
    }
}

/// Find the first element whose start tag satisfies `matches`, together with
/// its balanced end tag.
///
/// Nested elements of the same name are counted, so a `<section>` inside the
/// matched `<section>` does not end it early. Returns `None` when no start tag
/// matches or when the matched element is never closed.
pub fn find_element<F>(src: &str, matches: F) -> Option<Element>
where
    F: Fn(&Tag<'_>) -> bool,
{
    let mut tokens = Tokenizer::new(src);
    let open = tokens.by_ref().find_map(|token| match token {
        Token::StartTag(tag) if matches(&tag) => Some(tag),
        _ => None,
    })?;

    let mut depth = 0usize;
    for token in tokens {
        match token {
            Token::StartTag(tag) if tag.is(open.name) => depth += 1,
            Token::EndTag { name, span } if name.eq_ignore_ascii_case(open.name) => {
                if depth == 0 {
                    return Some(Element {
                        open: open.span.clone(),
                        inner: open.span.end..span.start,
                        close: span,
                    });
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}
