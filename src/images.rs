//! Positional image source overrides.
//!
//! The operator replaces images by position, not by identity: override `1`
//! means "the second `<img>` of the rendered body". Counting runs once, left to
//! right, across the whole body after the hero has been spliced in, so the hero
//! image is normally index `0` and the first template image after it is `1`.
//!
//! Only the `src` attribute of an overridden image is touched. Every other byte
//! of the body is copied through unchanged.

use crate::markup::{Token, Tokenizer};
use crate::options::ImageOverrides;
use crate::sanitize::escape_attr;
use tracing::debug;

/// Rewrite image sources according to `overrides`.
///
/// - Indices with no entry, or a blank entry, keep their source.
/// - Indices beyond the number of images are ignored.
/// - The override is trimmed and attribute-escaped but otherwise not
///   validated; operators may point at any URL they like.
/// - An overridden image without a `src` gets one inserted after its tag name.
pub fn apply_image_overrides(body: &str, overrides: &ImageOverrides) -> String {
    if overrides.is_empty() {
        return body.to_string();
    }

    let mut out = String::with_capacity(body.len());
    let mut copied = 0;
    let mut index = 0;
    let mut applied = 0;

    for token in Tokenizer::new(body) {
        let Token::StartTag(tag) = token else {
            continue;
        };
        if !tag.is("img") {
            continue;
        }
        if let Some(source) = overrides.get(index) {
            let replacement = format!(r#"src="{}""#, escape_attr(source));
            match tag.attr("src") {
                Some(attr) => {
                    out.push_str(&body[copied..attr.span.start]);
                    out.push_str(&replacement);
                    copied = attr.span.end;
                }
                None => {
                    let at = tag.name_end();
                    out.push_str(&body[copied..at]);
                    out.push(' ');
                    out.push_str(&replacement);
                    copied = at;
                }
            }
            applied += 1;
        }
        index += 1;
    }
    out.push_str(&body[copied..]);

    debug!(images = index, applied, "image overrides applied");
    out
}
