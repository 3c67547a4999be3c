//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Images
//!
//! ```text
//! Images
//! 000 https://cdn.example.com/hero.webp
//! 001 assets/team.png
//!     Override: https://cdn.example.com/team.webp
//! 002 (no src)
//! ```
//!
//! ## Show
//!
//! ```text
//! Hero Content
//!     hero_badge_1: ⭐ Trusted by 30+ countries
//!     hero_description: Gain the competitive advantage by combining HD Audio...
//! Full Homepage Template
//!     template_html: (5321 bytes)
//! Image Overrides
//!     001 https://cdn.example.com/team.webp
//! ```
//!
//! ## Save
//!
//! ```text
//! Saved 2 changes
//!     hero_badge_1
//!     image_overrides
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::extract::ImageRecord;
use crate::options::{FIELDS, FieldKind, ImageOverrides, OptionSet, Section};
use std::path::Path;

/// Longest single-line value `show` prints before truncating.
const MAX_VALUE_CHARS: usize = 72;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 0-based image index as 3-digit zero-padded.
fn format_index(index: usize) -> String {
    format!("{:0>3}", index)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((at, _)) => format!("{}...", &text[..at]),
        None => text.to_string(),
    }
}

// ============================================================================
// images
// ============================================================================

/// Image inventory with the override currently set for each position.
pub fn format_image_records(images: &[ImageRecord], overrides: &ImageOverrides) -> Vec<String> {
    let mut lines = vec!["Images".to_string()];
    if images.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
        return lines;
    }
    for image in images {
        let source = if image.original_source.is_empty() {
            "(no src)"
        } else {
            image.original_source.as_str()
        };
        lines.push(format!("{} {}", format_index(image.index), source));
        if let Some(replacement) = overrides.get(image.index) {
            lines.push(format!("{}Override: {}", indent(1), replacement));
        }
    }
    lines
}

pub fn print_image_records(images: &[ImageRecord], overrides: &ImageOverrides) {
    for line in format_image_records(images, overrides) {
        println!("{}", line);
    }
}

// ============================================================================
// show
// ============================================================================

/// Current options grouped by admin section.
///
/// Blobs (template, CSS, JS) show their size only; long single-line values
/// are truncated.
pub fn format_options(options: &OptionSet) -> Vec<String> {
    let mut lines = Vec::new();
    for section in Section::ALL {
        lines.push(section.title().to_string());
        for spec in FIELDS.iter().filter(|spec| spec.section == section) {
            let value = options.field_display(spec.key);
            let shown = match spec.kind {
                FieldKind::Html | FieldKind::Css | FieldKind::Js if value.is_empty() => {
                    "(empty)".to_string()
                }
                FieldKind::Html | FieldKind::Css | FieldKind::Js => {
                    format!("({} bytes)", value.len())
                }
                _ => truncate(&value, MAX_VALUE_CHARS),
            };
            lines.push(format!("{}{}: {}", indent(1), spec.key, shown));
        }
    }

    lines.push("Image Overrides".to_string());
    if options.image_overrides.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (index, source) in options.image_overrides.iter() {
        lines.push(format!("{}{} {}", indent(1), format_index(index), source.trim()));
    }
    lines
}

pub fn print_options(options: &OptionSet) {
    for line in format_options(options) {
        println!("{}", line);
    }
}

// ============================================================================
// save / activate
// ============================================================================

/// Summary of a save: the keys whose stored value changed.
pub fn format_save_summary(changed: &[&str]) -> Vec<String> {
    match changed.len() {
        0 => vec!["No changes".to_string()],
        n => {
            let noun = if n == 1 { "change" } else { "changes" };
            let mut lines = vec![format!("Saved {} {}", n, noun)];
            lines.extend(changed.iter().map(|key| format!("{}{}", indent(1), key)));
            lines
        }
    }
}

pub fn print_save_summary(changed: &[&str]) {
    for line in format_save_summary(changed) {
        println!("{}", line);
    }
}

/// Outcome of `activate` for the given store location.
pub fn format_activation(seeded: bool, store: &Path) -> Vec<String> {
    if seeded {
        vec![format!("Seeded stock options → {}", store.display())]
    } else {
        vec![format!("Options already present in {}, left unchanged", store.display())]
    }
}

pub fn print_activation(seeded: bool, store: &Path) {
    for line in format_activation(seeded, store) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, source: &str) -> ImageRecord {
        ImageRecord {
            index,
            original_source: source.to_string(),
        }
    }

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(0), "000");
        assert_eq!(format_index(12), "012");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn truncate_short_text_is_unchanged() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exact", 5), "exact");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("⭐⭐⭐", 2), "⭐⭐...");
    }

    #[test]
    fn image_records_show_overrides() {
        let images = vec![record(0, "hero.webp"), record(1, "team.png"), record(2, "")];
        let overrides: ImageOverrides = [(1, "new.png")].into_iter().collect();
        assert_eq!(
            format_image_records(&images, &overrides),
            vec![
                "Images",
                "000 hero.webp",
                "001 team.png",
                "    Override: new.png",
                "002 (no src)",
            ]
        );
    }

    #[test]
    fn image_records_empty() {
        assert_eq!(
            format_image_records(&[], &ImageOverrides::new()),
            vec!["Images", "    (none)"]
        );
    }

    #[test]
    fn options_group_by_section() {
        let options = OptionSet {
            template_html: "<p>x</p>".to_string(),
            custom_css: String::new(),
            image_overrides: [(3, "d.png")].into_iter().collect(),
            ..OptionSet::default()
        };
        let lines = format_options(&options);
        assert_eq!(lines[0], "Hero Content");
        assert!(lines.contains(&"    hero_badge_2: 99.999% Uptime".to_string()));
        assert!(lines.contains(&"    tablet_breakpoint: 992".to_string()));
        assert!(lines.contains(&"    hero_force_stacked_mobile: 1".to_string()));
        assert!(lines.contains(&"    template_html: (8 bytes)".to_string()));
        assert!(lines.contains(&"    custom_css: (empty)".to_string()));
        assert_eq!(lines[lines.len() - 2], "Image Overrides");
        assert_eq!(lines[lines.len() - 1], "    003 d.png");
    }

    #[test]
    fn options_truncate_long_values() {
        let lines = format_options(&OptionSet::default());
        let description = lines
            .iter()
            .find(|l| l.starts_with("    hero_description: "))
            .unwrap();
        assert!(description.ends_with("..."));
    }

    #[test]
    fn save_summary_pluralizes() {
        assert_eq!(format_save_summary(&[]), vec!["No changes"]);
        assert_eq!(
            format_save_summary(&["hero_badge_1"]),
            vec!["Saved 1 change", "    hero_badge_1"]
        );
        assert_eq!(format_save_summary(&["a", "b"])[0], "Saved 2 changes");
    }

    #[test]
    fn activation_outcomes() {
        let path = Path::new("landing-options.json");
        assert_eq!(
            format_activation(true, path),
            vec!["Seeded stock options → landing-options.json"]
        );
        assert_eq!(
            format_activation(false, path),
            vec!["Options already present in landing-options.json, left unchanged"]
        );
    }
}
