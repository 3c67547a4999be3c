//! Admin settings page.
//!
//! One HTML document holding the whole option form. Inputs are named after
//! their option keys so a browser submission maps straight onto a
//! [`FormSubmission`](crate::form::FormSubmission). Sections and inputs come
//! from the [`FIELDS`] table; the image override list comes from the images
//! of the rendered body, so the indices shown are the ones overrides use.

use crate::extract::ImageRecord;
use crate::options::{FIELDS, FieldKind, FieldSpec, IMAGE_OVERRIDES_KEY, OptionSet, Section};
use crate::page::body_images;
use maud::{DOCTYPE, Markup, html};

const ADMIN_CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0 auto; max-width: 960px; padding: 24px; color: #1d2327; }
fieldset { border: 1px solid #c3c4c7; margin: 0 0 24px; padding: 16px 20px; }
legend { font-weight: 600; padding: 0 6px; }
.field { display: grid; grid-template-columns: 240px 1fr; gap: 12px; margin: 8px 0; align-items: start; }
.field input[type=text], .field input[type=number], .field textarea { width: 100%; box-sizing: border-box; }
.field textarea { font-family: ui-monospace, monospace; }
.original-source { font-size: 12px; color: #646970; word-break: break-all; }
"#;

/// Render the admin form for the current options.
pub fn render_admin_page(options: &OptionSet) -> Markup {
    let images = body_images(options);

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Landing Builder" }
                style { (ADMIN_CSS) }
            }
            body {
                h1 { "Landing Builder" }
                form method="post" {
                    @for section in Section::ALL {
                        (render_section(section, options))
                        @if section == Section::Template {
                            (render_image_overrides(&images, options))
                        }
                    }
                    button type="submit" { "Save Changes" }
                }
            }
        }
    }
}

fn render_section(section: Section, options: &OptionSet) -> Markup {
    html! {
        fieldset {
            legend { (section.title()) }
            @for spec in FIELDS.iter().filter(|spec| spec.section == section) {
                (render_field(spec, options))
            }
        }
    }
}

fn render_field(spec: &FieldSpec, options: &OptionSet) -> Markup {
    let value = options.field_display(spec.key);
    let input = match spec.kind {
        FieldKind::Flag => html! {
            input type="checkbox" id=(spec.key) name=(spec.key) value="1" checked[value == "1"];
        },
        FieldKind::Breakpoint { .. } => html! {
            input type="number" min="1" id=(spec.key) name=(spec.key) value=(value);
        },
        FieldKind::Html => html! {
            textarea id=(spec.key) name=(spec.key) rows="20" { (value) }
        },
        FieldKind::Css | FieldKind::Js => html! {
            textarea id=(spec.key) name=(spec.key) rows="8" { (value) }
        },
        FieldKind::Text | FieldKind::Url | FieldKind::Color | FieldKind::CssValue => html! {
            input type="text" id=(spec.key) name=(spec.key) value=(value);
        },
    };
    html! {
        div.field {
            label for=(spec.key) { (spec.label) }
            (input)
        }
    }
}

fn render_image_overrides(images: &[ImageRecord], options: &OptionSet) -> Markup {
    html! {
        fieldset {
            legend { "Image Overrides" }
            @if images.is_empty() {
                p { "No images found in the template." }
            }
            @for image in images {
                @let name = format!("{IMAGE_OVERRIDES_KEY}[{}]", image.index);
                div.field {
                    label for=(name) {
                        "Image " (image.index)
                        div.original-source { (image.original_source) }
                    }
                    input type="text" id=(name) name=(name)
                        placeholder=(image.original_source)
                        value=(options.image_overrides.get(image.index).unwrap_or_default());
                }
            }
        }
    }
}
