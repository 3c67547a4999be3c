//! Dynamic stylesheet generation.
//!
//! The page ships one `<style>` block built from the option set. Sections are
//! emitted in a fixed order, separated by a blank line, so later sections win
//! the cascade over earlier ones at equal specificity:
//!
//! ```text
//! 1. template <style> content (pass-through)
//! 2. :root color variables
//! 3. desktop rules                       (!important)
//! 4. @media (max-width: tablet)  { rules + tablet_css }
//! 5. @media (max-width: mobile)  { rules + mobile_css }
//! 6. @media (max-width: stack)   { stacked hero }       if hero_force_stacked_mobile
//! 7. button underline removal                          if remove_button_underline
//! 8. custom_css
//! ```
//!
//! Generated declarations carry `!important` so they beat whatever the
//! template's own stylesheet says about the same properties. A size or padding
//! left blank produces no declaration at all.
//!
//! Generation is a pure function of the option set: the same input always
//! yields byte-identical output.

use crate::extract::extract_embedded_style;
use crate::options::OptionSet;

/// Selectors that lose their underline when `remove_button_underline` is set.
const BUTTON_SELECTORS: &[&str] = &[
    ".cta-button",
    ".cta-primary",
    ".cta-secondary",
    ".btn",
    ".button",
    ".tab-button",
    ".form-tab-button",
];

/// One responsive tier's values.
struct TierValues<'a> {
    font_size: &'a str,
    section_padding: &'a str,
    hero_padding: &'a str,
    hero_heading_size: &'a str,
}

impl<'a> TierValues<'a> {
    fn desktop(options: &'a OptionSet) -> Self {
        Self {
            font_size: &options.desktop_font_size,
            section_padding: &options.desktop_section_padding,
            hero_padding: &options.hero_desktop_padding,
            hero_heading_size: &options.hero_desktop_heading_size,
        }
    }

    fn tablet(options: &'a OptionSet) -> Self {
        Self {
            font_size: &options.tablet_font_size,
            section_padding: &options.tablet_section_padding,
            hero_padding: &options.hero_tablet_padding,
            hero_heading_size: &options.hero_tablet_heading_size,
        }
    }

    fn mobile(options: &'a OptionSet) -> Self {
        Self {
            font_size: &options.mobile_font_size,
            section_padding: &options.mobile_section_padding,
            hero_padding: &options.hero_mobile_padding,
            hero_heading_size: &options.hero_mobile_heading_size,
        }
    }

    /// Forced rules, one per line, each prefixed with `indent`.
    fn rules(&self, indent: &str) -> Vec<String> {
        [
            ("body", "font-size", self.font_size),
            ("section", "padding", self.section_padding),
            ("#hero", "padding", self.hero_padding),
            ("#hero .hero-text h1", "font-size", self.hero_heading_size),
        ]
        .into_iter()
        .filter(|(_, _, value)| !value.trim().is_empty())
        .map(|(selector, property, value)| {
            format!("{indent}{selector} {{ {property}: {} !important; }}", value.trim())
        })
        .collect()
    }
}

/// Build the full stylesheet for the page.
pub fn generate_stylesheet(options: &OptionSet) -> String {
    let breakpoints = options.breakpoints();
    let mut sections: Vec<String> = Vec::new();

    if let Some(base) = extract_embedded_style(&options.template_html) {
        sections.push(base.to_string());
    }
    sections.push(generate_color_css(options));
    sections.push(TierValues::desktop(options).rules("").join("\n"));
    sections.push(media_block(
        breakpoints.tablet,
        &TierValues::tablet(options),
        &options.tablet_css,
    ));
    sections.push(media_block(
        breakpoints.mobile,
        &TierValues::mobile(options),
        &options.mobile_css,
    ));
    if options.hero_force_stacked_mobile {
        sections.push(generate_hero_stack_css(breakpoints.hero_stack));
    }
    if options.remove_button_underline {
        sections.push(generate_button_underline_css());
    }
    if !options.custom_css.trim().is_empty() {
        sections.push(options.custom_css.clone());
    }

    sections.retain(|section| !section.is_empty());
    sections.join("\n\n")
}

/// Theme colors as CSS custom properties.
pub fn generate_color_css(options: &OptionSet) -> String {
    format!(
        r#":root {{
    --color-dark-primary: {dark_primary};
    --color-accent: {accent};
    --color-light-gray: {light_gray};
    --color-white: {white};
}}"#,
        dark_primary = options.color_dark_primary,
        accent = options.color_accent,
        light_gray = options.color_light_gray,
        white = options.color_white,
    )
}

fn media_block(max_width: u32, tier: &TierValues<'_>, extra_css: &str) -> String {
    let mut lines = vec![format!("@media (max-width: {max_width}px) {{")];
    lines.extend(tier.rules("    "));
    if !extra_css.trim().is_empty() {
        lines.push(extra_css.to_string());
    }
    lines.push("}".to_string());
    lines.join("\n")
}

/// Force the hero into a single column below `max_width`.
pub fn generate_hero_stack_css(max_width: u32) -> String {
    format!(
        r#"@media (max-width: {max_width}px) {{
    #hero .hero-content {{ flex-direction: column !important; }}
    #hero .hero-text, #hero .hero-visual {{ max-width: 100% !important; width: 100% !important; }}
}}"#
    )
}

/// Strip text decoration from every call-to-action and button class.
pub fn generate_button_underline_css() -> String {
    let selectors: Vec<String> = BUTTON_SELECTORS
        .iter()
        .flat_map(|s| [s.to_string(), format!("{s}:hover"), format!("{s}:focus")])
        .collect();
    format!(
        "{} {{ text-decoration: none !important; }}",
        selectors.join(", ")
    )
}
