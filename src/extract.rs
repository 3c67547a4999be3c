//! Read-only views into a stored template.
//!
//! - [`extract_images`] lists every `<img>` in document order, for the admin
//!   image override table.
//! - [`extract_body`] returns the content of the first `<body>` element, or the
//!   whole template when there is none.
//! - [`extract_embedded_style`] returns the text of the first `<style>` element,
//!   which the stylesheet generator passes through.
//!
//! Nothing here allocates a modified copy of the template; results borrow from
//! it or are recomputed on every call.

use crate::markup::{Token, Tokenizer, find_element};
use serde::Serialize;

/// One image element found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    /// Zero-based position among all `<img>` elements, in document order.
    pub index: usize,
    /// The `src` attribute as written (not entity-decoded). Empty when the
    /// element has no `src`.
    pub original_source: String,
}

/// Every `<img>` element of `html`, numbered from 0 in document order.
///
/// Images without a `src` are listed too so indices line up with the ones the
/// override applier counts.
pub fn extract_images(html: &str) -> Vec<ImageRecord> {
    Tokenizer::new(html)
        .filter_map(|token| match token {
            Token::StartTag(tag) if tag.is("img") => {
                Some(tag.attr_value("src").unwrap_or_default().to_string())
            }
            _ => None,
        })
        .enumerate()
        .map(|(index, original_source)| ImageRecord {
            index,
            original_source,
        })
        .collect()
}

/// Content between the first `<body ...>` and its `</body>`.
///
/// Falls back to the whole template when there is no body element.
pub fn extract_body(template: &str) -> &str {
    match find_element(template, |tag| tag.is("body")) {
        Some(body) => &template[body.inner],
        None => template,
    }
}

/// Text of the first `<style>` element anywhere in the template.
pub fn extract_embedded_style(template: &str) -> Option<&str> {
    find_element(template, |tag| tag.is("style")).map(|style| &template[style.inner])
}
