//! # Landing Builder
//!
//! An operator-customizable landing page. The operator stores one full HTML
//! template plus a flat set of options; every render takes that template,
//! swaps its hero section for one built from the options, rewrites image
//! sources by position, and wraps the result with a generated stylesheet and
//! an optional script.
//!
//! # Architecture: One Snapshot, One Pass
//!
//! ```text
//! store ─► read ─► OptionSet ─┬─► extract_body ─► splice_hero ─► apply_image_overrides ─► expander ─┐
//!                             ├─► generate_stylesheet ──────────────────────────────────────────────┤
//!                             └─► custom_js ────────────────────────────────────────────────────────┴─► page
//! ```
//!
//! A render reads the option set once and never writes it back. Every step
//! after the read is a pure function of that snapshot, so the same options
//! always produce byte-identical markup.
//!
//! Writing goes the other way: the admin form submits every field in one
//! batch, [`form::sanitize`] cleans it according to each field's kind and the
//! operator's [`form::Capability`], and [`store::write`] persists the result.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`options`] | The option set, its defaults, lenient resolution and the field table |
//! | [`store`] | Persistence seam ([`store::OptionStore`]) plus read, write and activate |
//! | [`form`] | Batched form submissions and capability-gated sanitization |
//! | [`markup`] | Tag-aware HTML tokenizer used by every step that reads markup |
//! | [`sanitize`] | Escaping, tag stripping and the post-content HTML filter |
//! | [`extract`] | Image inventory, body and embedded-style extraction |
//! | [`hero`] | Hero section rendering (Maud) and splicing |
//! | [`images`] | Positional image `src` overrides |
//! | [`stylesheet`] | Ordered, deterministic stylesheet generation |
//! | [`page`] | Final assembly and the render entry point |
//! | [`admin`] | Admin form page (Maud) |
//! | [`settings`] | CLI settings: store path, template asset, log level |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## A Tokenizer, Not Regexes
//!
//! Every step that looks inside the template (finding the body, the hero
//! section, images, the embedded stylesheet) walks the same tokenizer in
//! [`markup`]. It understands quoted attribute values containing `>`,
//! case-insensitive tag names, comments and raw-text elements, so an `<img>`
//! written inside a `<script>` string is never counted as an image, and a
//! hero section containing nested `<section>` elements is replaced whole.
//!
//! ## Positional Image Overrides
//!
//! Overrides are keyed by image position in the body *after* the hero is
//! spliced in. The hero image is usually position `0`. The admin image list
//! and the `images` command count the same markup, so the indices an operator
//! sees are the indices that get applied.
//!
//! ## Forgiving Reads, Sanitized Writes
//!
//! A stored document can be sparse, stale or hand-edited. Reading never
//! fails: each stored key is layered over the defaults on its own, and one
//! that does not fit keeps the default with a warning. Cleaning happens on
//! write instead, so rendering trusts the stored values and only escapes what
//! it interpolates into the hero.
//!
//! ## Maud for Generated HTML
//!
//! The hero, the page wrapper and the admin form are built with
//! [Maud](https://maud.lambda.xyz/). Interpolated text and attributes are
//! escaped automatically; the template body, the stylesheet and the script
//! are inserted with `PreEscaped` because they are operator-authored markup.

pub mod admin;
pub mod extract;
pub mod form;
pub mod hero;
pub mod images;
pub mod markup;
pub mod options;
pub mod output;
pub mod page;
pub mod sanitize;
pub mod settings;
pub mod store;
pub mod stylesheet;

#[cfg(test)]
pub(crate) mod test_helpers;
