//! Admin form submissions and save-time sanitization.
//!
//! The admin surface submits every field in one batch. A [`FormSubmission`]
//! holds the raw submitted strings, keyed by option name, plus any
//! `image_overrides[N]` inputs. [`sanitize`] turns a submission into the next
//! [`OptionSet`] according to each field's [`FieldKind`]:
//!
//! | Kind | Stored as |
//! |------|-----------|
//! | Text, Url, Color, CssValue | tags stripped, whitespace collapsed, trimmed |
//! | Breakpoint | absolute leading integer, fallback when zero or unparsable |
//! | Flag | `1` when truthy, `0` otherwise |
//! | Html | verbatim with [`Capability::UnfilteredHtml`], else post-content subset |
//! | Css, Js | verbatim with [`Capability::UnfilteredHtml`], else tags stripped |
//!
//! Sanitizing never rejects a submission; restricted operators simply get
//! filtered content stored.
//!
//! ## Complete forms and patches
//!
//! A submission from the admin form is *complete*: a checkbox that was not
//! ticked is simply absent, so absent flags mean "off", and the image override
//! inputs replace the stored map. A *patch* (the CLI's `--set key=value`)
//! only touches the keys it names.

use crate::options::{
    FIELDS, FieldKind, IMAGE_OVERRIDES_KEY, ImageOverrides, OptionSet, field_spec, is_truthy,
    parse_leading_int,
};
use crate::sanitize::{
    filter_post_html, sanitize_css_value, sanitize_text_field, sanitize_textarea,
};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("expected KEY=VALUE, got {0:?}")]
    InvalidPair(String),
    #[error("invalid image override index in {0:?}")]
    InvalidImageIndex(String),
    #[error("unsupported value for {0:?}: expected a string, number or boolean")]
    UnsupportedValue(String),
}

/// Whether the acting operator may store raw markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// HTML, CSS and JS fields are stored exactly as submitted.
    UnfilteredHtml,
    /// HTML is filtered to the post-content subset, CSS and JS lose their tags.
    Restricted,
}

impl Capability {
    pub fn from_flag(unfiltered_html: bool) -> Self {
        if unfiltered_html {
            Capability::UnfilteredHtml
        } else {
            Capability::Restricted
        }
    }
}

/// Raw values of one admin form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    values: BTreeMap<String, String>,
    image_overrides: BTreeMap<usize, String>,
    complete: bool,
}

impl FormSubmission {
    /// An empty submission of the whole admin form.
    pub fn complete() -> Self {
        Self {
            complete: true,
            ..Self::default()
        }
    }

    /// An empty partial update.
    pub fn patch() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Add one submitted input. `image_overrides[N]` keys go to the override map.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Result<(), FormError> {
        match parse_override_key(key)? {
            Some(index) => {
                self.image_overrides.insert(index, value.into());
            }
            None => {
                self.values.insert(key.to_string(), value.into());
            }
        }
        Ok(())
    }

    /// Add a `KEY=VALUE` pair, as given on the command line.
    pub fn insert_pair(&mut self, raw: &str) -> Result<(), FormError> {
        let (key, value) = raw
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| FormError::InvalidPair(raw.to_string()))?;
        self.insert(key.trim(), value)
    }

    /// Parse a complete form from TOML, in the layout `gen-form` prints.
    pub fn from_toml_str(content: &str) -> Result<Self, FormError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut submission = Self::complete();

        for (key, value) in table {
            if key == IMAGE_OVERRIDES_KEY {
                let toml::Value::Table(entries) = value else {
                    return Err(FormError::UnsupportedValue(key));
                };
                for (index, source) in entries {
                    let index = index
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| FormError::InvalidImageIndex(index.clone()))?;
                    let source = toml_scalar(&source)
                        .ok_or_else(|| FormError::UnsupportedValue(format!("{IMAGE_OVERRIDES_KEY}[{index}]")))?;
                    submission.image_overrides.insert(index, source);
                }
                continue;
            }
            let raw = toml_scalar(&value).ok_or_else(|| FormError::UnsupportedValue(key.clone()))?;
            submission.insert(&key, raw)?;
        }
        Ok(submission)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// `image_overrides[N]` → `Some(N)`; any other key → `None`.
fn parse_override_key(key: &str) -> Result<Option<usize>, FormError> {
    let Some(rest) = key.strip_prefix(IMAGE_OVERRIDES_KEY) else {
        return Ok(None);
    };
    let Some(index) = rest.strip_prefix('[').and_then(|r| r.strip_suffix(']')) else {
        return Err(FormError::InvalidImageIndex(key.to_string()));
    };
    index
        .trim()
        .parse::<usize>()
        .map(Some)
        .map_err(|_| FormError::InvalidImageIndex(key.to_string()))
}

fn toml_scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(n) => Some(n.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

/// Build the option set to store from the current values and a submission.
pub fn sanitize(
    current: &OptionSet,
    submission: &FormSubmission,
    capability: Capability,
) -> OptionSet {
    for key in submission.values.keys() {
        if field_spec(key).is_none() {
            warn!(field = %key, "ignoring unknown form field");
        }
    }

    let mut map = current.to_map();
    for spec in FIELDS {
        let value = match (spec.kind, submission.get(spec.key)) {
            (FieldKind::Flag, Some(raw)) => Value::from(u8::from(is_truthy(raw))),
            (FieldKind::Flag, None) if submission.complete => Value::from(0u8),
            (_, None) => continue,
            (FieldKind::Breakpoint { fallback }, Some(raw)) => {
                let width = parse_leading_int(raw).saturating_abs();
                Value::from(if width > 0 { width } else { i64::from(fallback) })
            }
            (kind, Some(raw)) if kind.is_markup() => {
                Value::String(sanitize_markup(kind, raw, capability))
            }
            (FieldKind::Color | FieldKind::CssValue, Some(raw)) => {
                Value::String(sanitize_css_value(raw))
            }
            (_, Some(raw)) => Value::String(sanitize_text_field(raw)),
        };
        map.insert(spec.key.to_string(), value);
    }

    let mut next: OptionSet = match serde_json::from_value(Value::Object(map)) {
        Ok(options) => options,
        Err(err) => {
            warn!(error = %err, "sanitized form did not produce valid options; keeping current values");
            current.clone()
        }
    };

    let mut overrides = if submission.complete {
        ImageOverrides::new()
    } else {
        current.image_overrides.clone()
    };
    for (index, source) in &submission.image_overrides {
        overrides.set(*index, sanitize_text_field(source));
    }
    next.image_overrides = overrides;
    next
}

fn sanitize_markup(kind: FieldKind, raw: &str, capability: Capability) -> String {
    match (capability, kind) {
        (Capability::UnfilteredHtml, _) => raw.to_string(),
        (Capability::Restricted, FieldKind::Html) => filter_post_html(raw),
        (Capability::Restricted, _) => sanitize_textarea(raw),
    }
}

/// Keys whose stored value differs between two option sets, in form order.
pub fn changed_fields(before: &OptionSet, after: &OptionSet) -> Vec<&'static str> {
    let (before_map, after_map) = (before.to_map(), after.to_map());
    let mut changed: Vec<&'static str> = FIELDS
        .iter()
        .filter(|spec| before_map.get(spec.key) != after_map.get(spec.key))
        .map(|spec| spec.key)
        .collect();
    if before.image_overrides != after.image_overrides {
        changed.push(IMAGE_OVERRIDES_KEY);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(pairs: &[(&str, &str)]) -> FormSubmission {
        let mut submission = FormSubmission::patch();
        for (key, value) in pairs {
            submission.insert(key, *value).unwrap();
        }
        submission
    }

    #[test]
    fn text_fields_are_stripped() {
        let current = OptionSet::default();
        let next = sanitize(
            &current,
            &patch(&[("hero_badge_1", "  <b>Best</b>\nin class ")]),
            Capability::UnfilteredHtml,
        );
        assert_eq!(next.hero_badge_1, "Best in class");
    }

    #[test]
    fn css_values_cannot_close_the_style_element() {
        let next = sanitize(
            &OptionSet::default(),
            &patch(&[
                ("color_accent", "<textarea></style><img src=x onerror=alert(1)></textarea>"),
                ("tablet_font_size", "15px</style><script>x()</script>"),
                ("hero_desktop_padding", "80px 0 } body { display: none"),
            ]),
            Capability::Restricted,
        );
        assert_eq!(next.color_accent, "");
        assert_eq!(next.tablet_font_size, "15px");
        assert_eq!(next.hero_desktop_padding, "80px 0 body display: none");

        let css = crate::stylesheet::generate_stylesheet(&next);
        assert!(!css.contains("</style"));
        assert!(!css.contains("onerror"));
    }

    #[test]
    fn restricted_template_neutralizes_raw_text_and_open_tags() {
        let next = sanitize(
            &OptionSet::default(),
            &patch(&[(
                "template_html",
                "<textarea><script>alert(1)</script></textarea><p>hi</p><img src=x onerror=alert(1) ",
            )]),
            Capability::Restricted,
        );
        assert_eq!(
            next.template_html,
            "&lt;script&gt;alert(1)&lt;/script&gt;<p>hi</p>&lt;img src=x onerror=alert(1) "
        );
    }

    #[test]
    fn patch_keeps_unmentioned_fields_and_flags() {
        let current = OptionSet::default();
        let next = sanitize(&current, &patch(&[("color_accent", "#000")]), Capability::Restricted);
        assert_eq!(next.color_accent, "#000");
        assert_eq!(next.hero_badge_2, current.hero_badge_2);
        assert!(next.hero_force_stacked_mobile);
        assert!(next.remove_button_underline);
    }

    #[test]
    fn complete_form_turns_absent_flags_off() {
        let current = OptionSet::default();
        let mut form = FormSubmission::complete();
        form.insert("remove_button_underline", "1").unwrap();
        let next = sanitize(&current, &form, Capability::Restricted);
        assert!(!next.hero_force_stacked_mobile);
        assert!(next.remove_button_underline);
    }

    #[test]
    fn flags_normalize_truthy_input() {
        let current = OptionSet {
            hero_force_stacked_mobile: false,
            ..OptionSet::default()
        };
        let next = sanitize(
            &current,
            &patch(&[("hero_force_stacked_mobile", "on"), ("remove_button_underline", "0")]),
            Capability::Restricted,
        );
        assert!(next.hero_force_stacked_mobile);
        assert!(!next.remove_button_underline);
    }

    #[test]
    fn breakpoints_are_coerced() {
        let next = sanitize(
            &OptionSet::default(),
            &patch(&[
                ("tablet_breakpoint", "0"),
                ("mobile_breakpoint", "-600"),
                ("hero_stack_breakpoint", "wide"),
            ]),
            Capability::Restricted,
        );
        assert_eq!(next.tablet_breakpoint, 992);
        assert_eq!(next.mobile_breakpoint, 600);
        assert_eq!(next.hero_stack_breakpoint, 992);
    }

    #[test]
    fn unfiltered_capability_stores_markup_verbatim() {
        let html = r#"<html><body><script>track()</script><section id="hero"></section></body></html>"#;
        let css = "a > b { color: red; } /* <tag> */";
        let next = sanitize(
            &OptionSet::default(),
            &patch(&[("template_html", html), ("custom_css", css), ("custom_js", "x<y")]),
            Capability::UnfilteredHtml,
        );
        assert_eq!(next.template_html, html);
        assert_eq!(next.custom_css, css);
        assert_eq!(next.custom_js, "x<y");
    }

    #[test]
    fn restricted_capability_filters_markup() {
        let next = sanitize(
            &OptionSet::default(),
            &patch(&[
                ("template_html", r#"<div onclick="x()"><script>track()</script><p>Hi</p></div>"#),
                ("custom_css", "<style>a{}</style>b { }"),
                ("custom_js", "<script>alert(1)</script>go();"),
            ]),
            Capability::Restricted,
        );
        assert_eq!(next.template_html, "<div><p>Hi</p></div>");
        assert_eq!(next.custom_css, "b { }");
        assert_eq!(next.custom_js, "go();");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let current = OptionSet::default();
        let next = sanitize(&current, &patch(&[("not_a_field", "x")]), Capability::Restricted);
        assert_eq!(next, current);
    }

    #[test]
    fn patch_merges_image_overrides() {
        let current = OptionSet {
            image_overrides: [(0, "a.png"), (2, "c.png")].into_iter().collect(),
            ..OptionSet::default()
        };
        let next = sanitize(
            &current,
            &patch(&[("image_overrides[2]", ""), ("image_overrides[3]", " d.png ")]),
            Capability::Restricted,
        );
        let entries: Vec<_> = next.image_overrides.iter().collect();
        assert_eq!(entries, vec![(0, "a.png"), (3, "d.png")]);
    }

    #[test]
    fn complete_form_replaces_image_overrides() {
        let current = OptionSet {
            image_overrides: [(0, "a.png")].into_iter().collect(),
            ..OptionSet::default()
        };
        let mut form = FormSubmission::complete();
        form.insert("image_overrides[1]", "b.png").unwrap();
        let next = sanitize(&current, &form, Capability::Restricted);
        let entries: Vec<_> = next.image_overrides.iter().collect();
        assert_eq!(entries, vec![(1, "b.png")]);
    }

    #[test]
    fn insert_pair_splits_on_first_equals() {
        let mut submission = FormSubmission::patch();
        submission.insert_pair("hero_cta_1_url=/a?b=c").unwrap();
        assert_eq!(submission.get("hero_cta_1_url"), Some("/a?b=c"));
    }

    #[test]
    fn insert_pair_rejects_missing_equals() {
        let mut submission = FormSubmission::patch();
        assert!(matches!(
            submission.insert_pair("hero_badge_1"),
            Err(FormError::InvalidPair(_))
        ));
        assert!(matches!(submission.insert_pair("=x"), Err(FormError::InvalidPair(_))));
    }

    #[test]
    fn bad_override_index_is_rejected() {
        let mut submission = FormSubmission::patch();
        assert!(matches!(
            submission.insert("image_overrides[x]", "a"),
            Err(FormError::InvalidImageIndex(_))
        ));
        assert!(matches!(
            submission.insert("image_overrides", "a"),
            Err(FormError::InvalidImageIndex(_))
        ));
    }

    #[test]
    fn toml_form_is_complete() {
        let form = FormSubmission::from_toml_str(
            r#"
hero_badge_1 = "A"
tablet_breakpoint = 1024
hero_force_stacked_mobile = false

[image_overrides]
1 = "new.png"
"#,
        )
        .unwrap();
        assert!(form.is_complete());
        assert_eq!(form.get("hero_badge_1"), Some("A"));
        assert_eq!(form.get("tablet_breakpoint"), Some("1024"));
        assert_eq!(form.get("hero_force_stacked_mobile"), Some("0"));

        let next = sanitize(&OptionSet::default(), &form, Capability::Restricted);
        assert_eq!(next.tablet_breakpoint, 1024);
        assert!(!next.hero_force_stacked_mobile);
        assert_eq!(next.image_overrides.get(1), Some("new.png"));
    }

    #[test]
    fn toml_form_rejects_arrays() {
        let result = FormSubmission::from_toml_str("hero_badge_1 = [1, 2]");
        assert!(matches!(result, Err(FormError::UnsupportedValue(_))));
    }

    #[test]
    fn toml_form_rejects_invalid_toml() {
        let result = FormSubmission::from_toml_str("this is not toml [[[");
        assert!(matches!(result, Err(FormError::Toml(_))));
    }

    #[test]
    fn stock_form_resubmits_to_defaults() {
        let form = FormSubmission::from_toml_str(&crate::options::stock_form_toml()).unwrap();
        let next = sanitize(&OptionSet::default(), &form, Capability::UnfilteredHtml);
        assert_eq!(next, OptionSet::default());
    }

    #[test]
    fn changed_fields_lists_differences() {
        let before = OptionSet::default();
        let after = OptionSet {
            hero_badge_1: "A".to_string(),
            tablet_breakpoint: 1000,
            image_overrides: [(1, "x.png")].into_iter().collect(),
            ..OptionSet::default()
        };
        assert_eq!(
            changed_fields(&before, &after),
            vec!["hero_badge_1", "tablet_breakpoint", IMAGE_OVERRIDES_KEY]
        );
    }
}
