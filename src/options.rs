//! Landing page option values.
//!
//! Every value the operator can change lives in one flat [`OptionSet`]. The
//! field names double as the admin form input names and as the keys of the
//! persisted JSON object, so a stored document looks like:
//!
//! ```json
//! {
//!   "hero_badge_1": "⭐ Trusted by 30+ countries",
//!   "tablet_breakpoint": 992,
//!   "hero_force_stacked_mobile": 1,
//!   "image_overrides": { "1": "https://cdn.example.com/team.webp" },
//!   "template_html": "<!DOCTYPE html>..."
//! }
//! ```
//!
//! ## Defaults and leniency
//!
//! Every field has a default. Stored documents are sparse and may be stale or
//! hand-edited, so reading is forgiving: [`resolve_options`] layers the stored
//! object over the stock defaults one key at a time, and a key whose value does
//! not fit its field keeps the default (with a warning) instead of failing the
//! whole read. Breakpoints accept numbers or numeric strings; flags accept
//! booleans, `0`/`1` or the usual truthy strings.
//!
//! ## Field table
//!
//! [`FIELDS`] lists every scalar key with its admin label, admin section and
//! [`FieldKind`]. Sanitization, the admin form and the generated form template
//! are all driven from it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Fallback for `tablet_breakpoint` when the stored value is not a positive integer.
pub const TABLET_BREAKPOINT_FALLBACK: u32 = 992;
/// Fallback for `mobile_breakpoint`.
pub const MOBILE_BREAKPOINT_FALLBACK: u32 = 768;
/// Fallback for `hero_stack_breakpoint`.
pub const HERO_STACK_BREAKPOINT_FALLBACK: u32 = 992;

const DEFAULT_CUSTOM_JS: &str = r#"document.addEventListener('DOMContentLoaded', function() {
    const tabs = document.querySelectorAll('.tab-button');
    const contents = document.querySelectorAll('.industry-content');
    tabs.forEach(tab => {
        tab.addEventListener('click', () => {
            tabs.forEach(t => t.classList.remove('active'));
            contents.forEach(c => c.classList.remove('active'));
            tab.classList.add('active');
            const targetId = tab.dataset.industry;
            const targetContent = document.getElementById(targetId);
            if (targetContent) targetContent.classList.add('active');
        });
    });
});
window.showForm = function(formType) {
    const allForms = document.querySelectorAll('.form-container');
    allForms.forEach(form => form.classList.remove('active-form'));
    const allButtons = document.querySelectorAll('.form-tab-button');
    allButtons.forEach(button => button.classList.remove('active'));
    const selectedForm = document.getElementById(formType + '-form');
    if (selectedForm) selectedForm.classList.add('active-form');
    const selectedButton = document.getElementById(formType + '-tab');
    if (selectedButton) selectedButton.classList.add('active');
    const formSection = document.getElementById('contact-form');
    if (formSection) {
        const targetPosition = formSection.getBoundingClientRect().top + window.pageYOffset - 10;
        window.scrollTo({ top: targetPosition, behavior: 'smooth' });
    }
};"#;

/// All operator-editable values for the landing page.
///
/// Missing keys take the [`Default`] value when deserializing. Unknown keys
/// are rejected so [`resolve_options`] can report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionSet {
    // Hero content
    pub hero_badge_1: String,
    pub hero_badge_2: String,
    pub hero_sub_heading: String,
    pub hero_heading_before: String,
    pub hero_heading_highlight: String,
    pub hero_description: String,
    pub hero_cta_1_text: String,
    pub hero_cta_1_url: String,
    pub hero_cta_2_text: String,
    pub hero_cta_2_url: String,
    pub hero_image_url: String,
    pub hero_image_alt: String,

    // Hero metrics
    pub hero_metric_1_value: String,
    pub hero_metric_1_label: String,
    pub hero_metric_2_value: String,
    pub hero_metric_2_label: String,
    pub hero_metric_3_value: String,
    pub hero_metric_3_label: String,
    pub hero_metric_4_value: String,
    pub hero_metric_4_label: String,

    // Theme colors
    pub color_dark_primary: String,
    pub color_accent: String,
    pub color_light_gray: String,
    pub color_white: String,

    // Responsive controls
    pub desktop_font_size: String,
    pub tablet_font_size: String,
    pub mobile_font_size: String,
    pub desktop_section_padding: String,
    pub tablet_section_padding: String,
    pub mobile_section_padding: String,
    pub hero_desktop_heading_size: String,
    pub hero_tablet_heading_size: String,
    pub hero_mobile_heading_size: String,
    pub hero_desktop_padding: String,
    pub hero_tablet_padding: String,
    pub hero_mobile_padding: String,
    #[serde(deserialize_with = "lenient_int")]
    pub tablet_breakpoint: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub mobile_breakpoint: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub hero_stack_breakpoint: i64,
    #[serde(serialize_with = "flag_as_int", deserialize_with = "lenient_flag")]
    pub hero_force_stacked_mobile: bool,
    #[serde(serialize_with = "flag_as_int", deserialize_with = "lenient_flag")]
    pub remove_button_underline: bool,
    pub tablet_css: String,
    pub mobile_css: String,

    // Raw blobs
    pub template_html: String,
    pub custom_css: String,
    pub custom_js: String,

    /// Replacement `src` per image position in the rendered body.
    pub image_overrides: ImageOverrides,
}

impl Default for OptionSet {
    fn default() -> Self {
        Self {
            hero_badge_1: "⭐ Trusted by 30+ countries".to_string(),
            hero_badge_2: "99.999% Uptime".to_string(),
            hero_sub_heading: "Unified Communication & Contact Center Solutions".to_string(),
            hero_heading_before: "Cutting-Edge Solutions That Drive Your Business".to_string(),
            hero_heading_highlight: "Forward".to_string(),
            hero_description: "Gain the competitive advantage by combining HD Audio, Video, \
                Messaging, and CRM integration all from one secure and simplified interface."
                .to_string(),
            hero_cta_1_text: "Schedule a Demo".to_string(),
            hero_cta_1_url: "https://voipoffice.in/contact-us/".to_string(),
            hero_cta_2_text: "View Pricing".to_string(),
            hero_cta_2_url: "https://voipoffice.in/plans-pricing/".to_string(),
            hero_image_url:
                "https://voipoffice.in/wp-content/uploads/2026/02/Group-3-2-scaled-1.webp"
                    .to_string(),
            hero_image_alt: "Dynamic VOIP Office Communication Visual".to_string(),
            hero_metric_1_value: "99.999%".to_string(),
            hero_metric_1_label: "Uptime SLA".to_string(),
            hero_metric_2_value: "30+".to_string(),
            hero_metric_2_label: "Countries Served".to_string(),
            hero_metric_3_value: "HD".to_string(),
            hero_metric_3_label: "Audio & Video".to_string(),
            hero_metric_4_value: "24/7".to_string(),
            hero_metric_4_label: "Expert Support".to_string(),
            color_dark_primary: "#14213d".to_string(),
            color_accent: "#fca311".to_string(),
            color_light_gray: "#e5e5e5".to_string(),
            color_white: "#ffffff".to_string(),
            desktop_font_size: "16px".to_string(),
            tablet_font_size: "15px".to_string(),
            mobile_font_size: "14px".to_string(),
            desktop_section_padding: "80px 30px".to_string(),
            tablet_section_padding: "60px 20px".to_string(),
            mobile_section_padding: "40px 15px".to_string(),
            hero_desktop_heading_size: "clamp(1.8rem, 4vw, 2.8rem)".to_string(),
            hero_tablet_heading_size: "2rem".to_string(),
            hero_mobile_heading_size: "1.5rem".to_string(),
            hero_desktop_padding: "60px 30px 60px".to_string(),
            hero_tablet_padding: "40px 20px 40px".to_string(),
            hero_mobile_padding: "28px 15px 28px".to_string(),
            tablet_breakpoint: i64::from(TABLET_BREAKPOINT_FALLBACK),
            mobile_breakpoint: i64::from(MOBILE_BREAKPOINT_FALLBACK),
            hero_stack_breakpoint: i64::from(HERO_STACK_BREAKPOINT_FALLBACK),
            hero_force_stacked_mobile: true,
            remove_button_underline: true,
            tablet_css: String::new(),
            mobile_css: String::new(),
            template_html: String::new(),
            custom_css: String::new(),
            custom_js: DEFAULT_CUSTOM_JS.to_string(),
            image_overrides: ImageOverrides::default(),
        }
    }
}

impl OptionSet {
    /// Stock defaults with `template_html` seeded from the bundled template.
    pub fn with_template(template_html: impl Into<String>) -> Self {
        Self {
            template_html: template_html.into(),
            ..Self::default()
        }
    }

    /// Breakpoints coerced to positive pixel widths.
    pub fn breakpoints(&self) -> Breakpoints {
        Breakpoints {
            tablet: positive_or(self.tablet_breakpoint, TABLET_BREAKPOINT_FALLBACK),
            mobile: positive_or(self.mobile_breakpoint, MOBILE_BREAKPOINT_FALLBACK),
            hero_stack: positive_or(self.hero_stack_breakpoint, HERO_STACK_BREAKPOINT_FALLBACK),
        }
    }

    /// The option set as a JSON object keyed by field name.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Display string of one scalar field, as the admin form shows it.
    ///
    /// Flags render as `1`/`0`, breakpoints as their stored integer.
    pub fn field_display(&self, key: &str) -> String {
        display_value(self.to_map().get(key))
    }
}

pub(crate) fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Resolved responsive breakpoints in pixels. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    pub tablet: u32,
    pub mobile: u32,
    pub hero_stack: u32,
}

/// `value` as a pixel width if it is a positive integer that fits, else `fallback`.
pub fn positive_or(value: i64, fallback: u32) -> u32 {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .unwrap_or(fallback)
}

/// Parse the leading integer of a form value the way loose numeric inputs are
/// usually read: optional sign, then digits; `"800px"` is 800, `"abc"` is 0.
pub fn parse_leading_int(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}

/// Whether a submitted checkbox/flag value counts as "on".
pub fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LooseScalar::deserialize(deserializer)? {
        LooseScalar::Int(n) => n,
        LooseScalar::Float(f) => f as i64,
        LooseScalar::Text(s) => parse_leading_int(&s),
        LooseScalar::Bool(_) => 0,
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LooseScalar::deserialize(deserializer)? {
        LooseScalar::Bool(b) => b,
        LooseScalar::Int(n) => n != 0,
        LooseScalar::Float(f) => f != 0.0,
        LooseScalar::Text(s) => is_truthy(&s),
    })
}

fn flag_as_int<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*flag))
}

/// Replacement image sources keyed by zero-based image position.
///
/// Entries whose value is blank after trimming mean "keep the original" and
/// are skipped by [`ImageOverrides::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageOverrides(BTreeMap<usize, String>);

impl ImageOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed override for `index`, if one is set and non-blank.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0
            .get(&index)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Set or clear (with a blank value) the override for `index`.
    pub fn set(&mut self, index: usize, source: impl Into<String>) {
        let source = source.into();
        if source.trim().is_empty() {
            self.0.remove(&index);
        } else {
            self.0.insert(index, source);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(index, source)| (*index, source.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for ImageOverrides {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (index, source) in iter {
            overrides.set(index, source);
        }
        overrides
    }
}

// =============================================================================
// Field table
// =============================================================================

/// How a field is validated on save and shown in the admin form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line plain text.
    Text,
    /// Link or image source. Stored as text, validated when rendered.
    Url,
    /// CSS color value.
    Color,
    /// Any other CSS value (sizes, paddings).
    CssValue,
    /// Pixel width; non-positive values fall back.
    Breakpoint { fallback: u32 },
    /// On/off checkbox.
    Flag,
    /// Raw template HTML.
    Html,
    /// Raw CSS appended to the generated stylesheet.
    Css,
    /// Raw script emitted after the page body.
    Js,
}

impl FieldKind {
    /// Kinds stored verbatim only for operators with the unfiltered-markup capability.
    pub fn is_markup(self) -> bool {
        matches!(self, FieldKind::Html | FieldKind::Css | FieldKind::Js)
    }
}

/// Admin form grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    HeroContent,
    HeroMetrics,
    Responsive,
    Colors,
    Template,
    CustomCode,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::HeroContent,
        Section::HeroMetrics,
        Section::Responsive,
        Section::Colors,
        Section::Template,
        Section::CustomCode,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::HeroContent => "Hero Content",
            Section::HeroMetrics => "Hero Metrics",
            Section::Responsive => "Responsive Controls",
            Section::Colors => "Theme Colors",
            Section::Template => "Full Homepage Template",
            Section::CustomCode => "Optional Custom CSS / JS",
        }
    }
}

/// One row of [`FIELDS`].
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub section: Section,
    pub kind: FieldKind,
}

const fn field(key: &'static str, label: &'static str, section: Section, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        key,
        label,
        section,
        kind,
    }
}

use FieldKind::{Color, Css, CssValue, Flag, Html, Js, Text, Url};
use Section::{Colors, CustomCode, HeroContent, HeroMetrics, Responsive, Template};

/// Every scalar option key, in admin form order. `image_overrides` is not a
/// scalar and is handled separately.
pub const FIELDS: &[FieldSpec] = &[
    field("hero_badge_1", "Hero Badge 1", HeroContent, Text),
    field("hero_badge_2", "Hero Badge 2", HeroContent, Text),
    field("hero_sub_heading", "Hero Sub Heading", HeroContent, Text),
    field("hero_heading_before", "Hero Heading (Before Highlight)", HeroContent, Text),
    field("hero_heading_highlight", "Hero Heading Highlight", HeroContent, Text),
    field("hero_description", "Hero Description", HeroContent, Text),
    field("hero_cta_1_text", "CTA 1 Text", HeroContent, Text),
    field("hero_cta_1_url", "CTA 1 URL", HeroContent, Url),
    field("hero_cta_2_text", "CTA 2 Text", HeroContent, Text),
    field("hero_cta_2_url", "CTA 2 URL", HeroContent, Url),
    field("hero_image_url", "Hero Image URL", HeroContent, Url),
    field("hero_image_alt", "Hero Image Alt", HeroContent, Text),
    field("hero_metric_1_value", "Metric 1 Value", HeroMetrics, Text),
    field("hero_metric_1_label", "Metric 1 Label", HeroMetrics, Text),
    field("hero_metric_2_value", "Metric 2 Value", HeroMetrics, Text),
    field("hero_metric_2_label", "Metric 2 Label", HeroMetrics, Text),
    field("hero_metric_3_value", "Metric 3 Value", HeroMetrics, Text),
    field("hero_metric_3_label", "Metric 3 Label", HeroMetrics, Text),
    field("hero_metric_4_value", "Metric 4 Value", HeroMetrics, Text),
    field("hero_metric_4_label", "Metric 4 Label", HeroMetrics, Text),
    field("desktop_font_size", "Desktop Body Font Size (example: 16px)", Responsive, CssValue),
    field("tablet_font_size", "Tablet Body Font Size (example: 15px)", Responsive, CssValue),
    field("mobile_font_size", "Mobile Body Font Size (example: 14px)", Responsive, CssValue),
    field("desktop_section_padding", "Desktop Section Padding (example: 80px 30px)", Responsive, CssValue),
    field("tablet_section_padding", "Tablet Section Padding (example: 60px 20px)", Responsive, CssValue),
    field("mobile_section_padding", "Mobile Section Padding (example: 40px 15px)", Responsive, CssValue),
    field("hero_desktop_heading_size", "Desktop Hero Heading Font Size (example: clamp(1.8rem, 4vw, 2.8rem))", Responsive, CssValue),
    field("hero_tablet_heading_size", "Tablet Hero Heading Font Size (example: 2rem)", Responsive, CssValue),
    field("hero_mobile_heading_size", "Mobile Hero Heading Font Size (example: 1.5rem)", Responsive, CssValue),
    field("hero_desktop_padding", "Desktop Hero Padding (example: 60px 30px 60px)", Responsive, CssValue),
    field("hero_tablet_padding", "Tablet Hero Padding (example: 40px 20px 40px)", Responsive, CssValue),
    field("hero_mobile_padding", "Mobile Hero Padding (example: 28px 15px 28px)", Responsive, CssValue),
    field("tablet_breakpoint", "Tablet Breakpoint (px)", Responsive, FieldKind::Breakpoint { fallback: TABLET_BREAKPOINT_FALLBACK }),
    field("mobile_breakpoint", "Mobile Breakpoint (px)", Responsive, FieldKind::Breakpoint { fallback: MOBILE_BREAKPOINT_FALLBACK }),
    field("hero_stack_breakpoint", "Hero Stack Breakpoint (px)", Responsive, FieldKind::Breakpoint { fallback: HERO_STACK_BREAKPOINT_FALLBACK }),
    field("hero_force_stacked_mobile", "Force stacked hero layout at breakpoint", Responsive, Flag),
    field("remove_button_underline", "Remove underline from buttons", Responsive, Flag),
    field("tablet_css", "Tablet Custom CSS", Responsive, Css),
    field("mobile_css", "Mobile Custom CSS", Responsive, Css),
    field("color_dark_primary", "Dark Primary Color", Colors, Color),
    field("color_accent", "Accent Color", Colors, Color),
    field("color_light_gray", "Light Gray Color", Colors, Color),
    field("color_white", "White Color", Colors, Color),
    field("template_html", "Template HTML", Template, Html),
    field("custom_css", "Custom CSS", CustomCode, Css),
    field("custom_js", "Custom JS", CustomCode, Js),
];

/// Key of the image override map in stored documents and forms.
pub const IMAGE_OVERRIDES_KEY: &str = "image_overrides";

/// Look up a field by key.
pub fn field_spec(key: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.key == key)
}

// =============================================================================
// Resolution
// =============================================================================

/// Stock defaults as a JSON object, the base layer for stored values.
pub fn stock_defaults_value() -> Value {
    Value::Object(OptionSet::default().to_map())
}

/// Layer a stored document over `base`, one key at a time.
///
/// A stored key is kept only if the option set still deserializes with it in
/// place; otherwise the base value stays and a warning names the key. A stored
/// value that is not an object is ignored entirely.
pub fn resolve_over(base: OptionSet, stored: Option<Value>) -> OptionSet {
    let Some(stored) = stored else {
        return base;
    };
    let Value::Object(entries) = stored else {
        warn!("stored options are not an object; using defaults");
        return base;
    };

    let mut merged = base.to_map();
    for (key, value) in entries {
        let previous = merged.insert(key.clone(), value);
        if serde_json::from_value::<OptionSet>(Value::Object(merged.clone())).is_err() {
            warn!(field = %key, "ignoring malformed stored option");
            match previous {
                Some(previous) => merged.insert(key, previous),
                None => merged.remove(&key),
            };
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or(base)
}

/// Stored values merged over the stock defaults. Never fails.
pub fn resolve_options(stored: Option<Value>) -> OptionSet {
    resolve_over(OptionSet::default(), stored)
}

// =============================================================================
// Form template
// =============================================================================

/// A documented TOML form with every key at its default value.
///
/// Editing a copy and passing it to `save --form` submits the whole admin
/// form in one batch.
pub fn stock_form_toml() -> String {
    let defaults = OptionSet::default().to_map();
    let mut out = String::from(
        "# Landing Builder form\n\
         # ====================\n\
         # Every admin form field with its default value. Submit a copy with\n\
         # `landing-builder save --form <file>`. A submitted form is complete:\n\
         # flags left out are switched off, like unchecked checkboxes.\n",
    );

    for section in Section::ALL {
        out.push_str("\n# ---------------------------------------------------------------------------\n");
        out.push_str(&format!("# {}\n", section.title()));
        out.push_str("# ---------------------------------------------------------------------------\n");
        for spec in FIELDS.iter().filter(|spec| spec.section == section) {
            out.push_str(&format!("# {}\n", spec.label));
            let value = match (spec.kind, defaults.get(spec.key)) {
                (FieldKind::Flag, Some(v)) => toml::Value::Boolean(v.as_u64() == Some(1)),
                (FieldKind::Breakpoint { fallback }, Some(v)) => {
                    toml::Value::Integer(v.as_i64().unwrap_or(i64::from(fallback)))
                }
                (_, v) => toml::Value::String(display_value(v)),
            };
            out.push_str(&format!("{} = {}\n", spec.key, value));
        }
    }

    out.push_str(
        "\n# ---------------------------------------------------------------------------\n\
         # Image overrides: replacement src per image position (0 = first image of\n\
         # the rendered body, the hero image included). Blank keeps the original.\n\
         # ---------------------------------------------------------------------------\n\
         [image_overrides]\n\
         # 1 = \"https://cdn.example.com/team.webp\"\n",
    );
    out
}
