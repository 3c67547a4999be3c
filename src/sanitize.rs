//! Escaping and sanitization helpers.
//!
//! Two audiences use these functions:
//!
//! - **Rendering** escapes values for the context they land in. Text and
//!   attribute escaping is Maud's own escaper ([`escape_attr`]), and URLs get
//!   an extra scheme check ([`escape_url`]).
//! - **Saving** cleans operator input before it is stored:
//!   [`sanitize_text_field`] for single-line values, [`sanitize_textarea`] for
//!   CSS/JS blobs written by operators without the unfiltered-markup
//!   capability, and [`filter_post_html`] for their template HTML.
//!
//! All tag handling goes through the [`markup`](crate::markup) tokenizer.

use crate::markup::{Tag, Token, Tokenizer, is_raw_text_element};
use maud::html;

/// URL schemes allowed in rendered `href`/`src` attributes.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "ftp", "ftps"];

/// Elements dropped together with their content when filtering or stripping.
const DROP_WITH_CONTENT: &[&str] = &["script", "style"];

/// Elements kept by [`filter_post_html`]. Everything else loses its tags but
/// keeps its text.
const POST_CONTENT_TAGS: &[&str] = &[
    "a", "abbr", "address", "article", "aside", "audio", "b", "blockquote", "br", "button",
    "caption", "cite", "code", "col", "colgroup", "dd", "del", "details", "div", "dl", "dt", "em",
    "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "i",
    "img", "ins", "label", "li", "main", "mark", "nav", "ol", "p", "picture", "pre", "q", "s",
    "section", "small", "source", "span", "strong", "sub", "summary", "sup", "table", "tbody",
    "td", "tfoot", "th", "thead", "time", "tr", "track", "u", "ul", "video",
];

/// Attributes whose value is a URL and must pass [`escape_url`].
const URL_ATTRIBUTES: &[&str] = &["href", "src", "poster", "cite", "action", "formaction"];

/// Escape a value for a double-quoted attribute or for element text.
pub fn escape_attr(value: &str) -> String {
    html! { (value) }.into_string()
}

/// Clean a URL for use in an `href`/`src` attribute.
///
/// Whitespace and control characters are removed (inner spaces become `%20`)
/// and a URL with a scheme outside [`ALLOWED_SCHEMES`] becomes the empty
/// string. Relative URLs pass. The result still needs attribute escaping,
/// which Maud does when it is interpolated.
pub fn escape_url(url: &str) -> String {
    let cleaned: String = url
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some("%20".to_string()),
            c if c.is_control() || c.is_whitespace() => None,
            c => Some(c.to_string()),
        })
        .collect();

    match url_scheme(&cleaned) {
        Some(scheme) if !ALLOWED_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) => {
            String::new()
        }
        _ => cleaned,
    }
}

/// Scheme of a URL, if the part before the first `:` looks like one.
fn url_scheme(url: &str) -> Option<&str> {
    let colon = url.find(':')?;
    let candidate = &url[..colon];
    if candidate.contains(['/', '?', '#']) {
        return None;
    }
    Some(candidate)
}

/// Remove every tag, dropping the content of `<script>` and `<style>` too.
///
/// Comments and declarations disappear. Raw-text content (`<textarea>`,
/// `<title>`) is stripped in turn, and a tag left unterminated at the end of
/// the input is dropped rather than kept as text.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut dropping: Option<&str> = None;
    let mut raw_content = false;

    for token in Tokenizer::new(input) {
        let in_raw = std::mem::take(&mut raw_content);
        match token {
            Token::Text { text, .. } if dropping.is_none() => {
                if in_raw {
                    out.push_str(&strip_tags(text));
                } else if !is_tag_fragment(text) {
                    out.push_str(text);
                }
            }
            Token::StartTag(tag) if dropping.is_none() && !tag.self_closing => {
                dropping = drop_with_content(&tag);
                raw_content = dropping.is_none() && is_raw_text_element(&tag);
            }
            Token::EndTag { name, .. } if dropping.is_some_and(|d| name.eq_ignore_ascii_case(d)) => {
                dropping = None;
            }
            _ => {}
        }
    }
    out
}

/// Text the tokenizer produced from a tag it could not close.
fn is_tag_fragment(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

fn drop_with_content(tag: &Tag<'_>) -> Option<&'static str> {
    DROP_WITH_CONTENT.iter().copied().find(|name| tag.is(name))
}

/// Single-line text field: tags stripped, every whitespace run (line breaks
/// and tabs included) collapsed to one space, ends trimmed.
pub fn sanitize_text_field(input: &str) -> String {
    collapse_whitespace(&strip_tags(input))
}

/// A value interpolated into the generated stylesheet (colors, sizes,
/// paddings): a text field that also loses `<`, `>`, `{` and `}`, so it can
/// neither close the `<style>` element nor the rule it lands in.
pub fn sanitize_css_value(input: &str) -> String {
    collapse_whitespace(&strip_tags(input).replace(['<', '>', '{', '}'], " "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Multi-line text: tags stripped, line structure preserved, ends trimmed.
pub fn sanitize_textarea(input: &str) -> String {
    strip_tags(input).trim().to_string()
}

/// Reduce HTML to the post-content subset.
///
/// Allowed elements are rebuilt with their safe attributes only: event
/// handlers (`on*`) are dropped, URL attributes must pass [`escape_url`], and
/// `style` attributes containing `expression(` or `javascript:` are dropped.
/// Disallowed elements lose their tags but keep their text, except
/// `<script>`/`<style>` whose content goes as well. Comments and declarations
/// are removed. Text is emitted with `<` and `>` escaped, so raw-text content
/// and unterminated tags come out inert.
pub fn filter_post_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut dropping: Option<&str> = None;

    for token in Tokenizer::new(input) {
        if let Some(element) = dropping {
            if let Token::EndTag { name, .. } = token {
                if name.eq_ignore_ascii_case(element) {
                    dropping = None;
                }
            }
            continue;
        }
        match token {
            Token::Text { text, .. } => push_text(&mut out, text),
            Token::StartTag(tag) => {
                if is_post_content(tag.name) {
                    push_filtered_tag(&mut out, &tag);
                } else if !tag.self_closing {
                    dropping = drop_with_content(&tag);
                }
            }
            Token::EndTag { name, .. } if is_post_content(name) => {
                out.push_str("</");
                out.push_str(&name.to_ascii_lowercase());
                out.push('>');
            }
            _ => {}
        }
    }
    out
}

fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn is_post_content(name: &str) -> bool {
    POST_CONTENT_TAGS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(name))
}

fn push_filtered_tag(out: &mut String, tag: &Tag<'_>) {
    out.push('<');
    out.push_str(&tag.name.to_ascii_lowercase());
    for attr in &tag.attributes {
        let name = attr.name.to_ascii_lowercase();
        if name.starts_with("on") || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            continue;
        }
        let Some(value) = attr.value else {
            out.push(' ');
            out.push_str(&name);
            continue;
        };
        let value = if URL_ATTRIBUTES.contains(&name.as_str()) {
            let url = escape_url(value);
            if url.is_empty() && !value.trim().is_empty() {
                continue;
            }
            url
        } else {
            value.to_string()
        };
        if name == "style" {
            let lowered = value.to_ascii_lowercase();
            if lowered.contains("expression(") || lowered.contains("javascript:") {
                continue;
            }
        }
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        out.push_str(&escape_attr(&value));
        out.push('"');
    }
    if tag.self_closing {
        out.push_str(" /");
    }
    out.push('>');
}
