//! Hero section rendering and splicing.
//!
//! The hero is the only part of the template the operator edits field by
//! field. [`render_hero`] builds it from the option set with Maud, so every
//! text value is HTML-escaped and every attribute value is attribute-escaped
//! without any manual work; URL fields additionally go through
//! [`escape_url`](crate::sanitize::escape_url) so a `javascript:` link cannot
//! be smuggled in through the CTA fields.
//!
//! [`splice_hero`] swaps the first `<section id="hero">` of a body for the
//! rendered markup.

use crate::markup::find_element;
use crate::options::OptionSet;
use crate::sanitize::escape_url;
use maud::{Markup, html};
use tracing::debug;

/// `id` of the section replaced by [`splice_hero`].
pub const HERO_ID: &str = "hero";

/// Render the hero section from the option set.
pub fn render_hero(options: &OptionSet) -> Markup {
    let metrics = [
        (&options.hero_metric_1_value, &options.hero_metric_1_label),
        (&options.hero_metric_2_value, &options.hero_metric_2_label),
        (&options.hero_metric_3_value, &options.hero_metric_3_label),
        (&options.hero_metric_4_value, &options.hero_metric_4_label),
    ];

    html! {
        section id=(HERO_ID) {
            div.hero-content {
                div.hero-text {
                    div.trust-badges {
                        div.badge { (options.hero_badge_1) }
                        div.badge { (options.hero_badge_2) }
                    }
                    p.sub-heading { (options.hero_sub_heading) }
                    h1 {
                        (options.hero_heading_before) " "
                        span { (options.hero_heading_highlight) }
                    }
                    p.description { (options.hero_description) }
                    div.hero-cta-group {
                        a.cta-button.cta-primary href=(escape_url(&options.hero_cta_1_url)) {
                            (options.hero_cta_1_text)
                        }
                        a.cta-button.cta-secondary href=(escape_url(&options.hero_cta_2_url)) {
                            (options.hero_cta_2_text)
                        }
                    }
                    div.hero-metrics {
                        @for (value, label) in metrics {
                            div.hero-metric-item {
                                div.hero-metric-value { (value) }
                                div.hero-metric-label { (label) }
                            }
                        }
                    }
                }
                div.hero-visual {
                    img src=(escape_url(&options.hero_image_url))
                        alt=(options.hero_image_alt)
                        width="600"
                        height="400"
                        fetchpriority="high";
                }
            }
        }
    }
}

/// Replace the first `<section id="hero">` element of `body` with `hero`.
///
/// Nested `<section>` elements inside the hero are balanced. A body without a
/// hero section (or with one that is never closed) comes back unchanged.
pub fn splice_hero(body: &str, hero: &str) -> String {
    let found = find_element(body, |tag| {
        tag.is("section") && tag.attr_value("id") == Some(HERO_ID)
    });
    match found {
        Some(section) => {
            let outer = section.outer();
            debug!(start = outer.start, end = outer.end, "hero section replaced");
            let mut out = String::with_capacity(body.len() - outer.len() + hero.len());
            out.push_str(&body[..outer.start]);
            out.push_str(hero);
            out.push_str(&body[outer.end..]);
            out
        }
        None => {
            debug!("no hero section in body");
            body.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_images;

    #[test]
    fn hero_contains_every_field() {
        let options = OptionSet::default();
        let html = render_hero(&options).into_string();
        assert!(html.starts_with(r#"<section id="hero">"#));
        assert!(html.contains(r#"<div class="badge">⭐ Trusted by 30+ countries</div>"#));
        assert!(html.contains(r#"<p class="sub-heading">"#));
        assert!(html.contains("Cutting-Edge Solutions That Drive Your Business <span>Forward</span>"));
        assert!(html.contains(r#"class="cta-button cta-primary" href="https://voipoffice.in/contact-us/""#));
        assert!(html.contains("View Pricing"));
        assert_eq!(html.matches("hero-metric-item").count(), 4);
        assert!(html.contains("Audio &amp; Video"));
        assert!(html.contains(r#"fetchpriority="high""#));
    }

    #[test]
    fn hero_has_exactly_one_image() {
        let html = render_hero(&OptionSet::default()).into_string();
        let images = extract_images(&html);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].original_source, OptionSet::default().hero_image_url);
    }

    #[test]
    fn hero_escapes_text_fields() {
        let options = OptionSet {
            hero_badge_1: "<script>alert(1)</script>".to_string(),
            hero_image_alt: r#"a "quoted" alt"#.to_string(),
            ..OptionSet::default()
        };
        let html = render_hero(&options).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"alt="a &quot;quoted&quot; alt""#));
    }

    #[test]
    fn hero_blanks_unsafe_urls() {
        let options = OptionSet {
            hero_cta_1_url: "javascript:alert(1)".to_string(),
            ..OptionSet::default()
        };
        let html = render_hero(&options).into_string();
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r#"class="cta-button cta-primary" href="""#));
    }

    #[test]
    fn hero_is_deterministic() {
        let options = OptionSet::default();
        assert_eq!(
            render_hero(&options).into_string(),
            render_hero(&options).into_string()
        );
    }

    #[test]
    fn splice_replaces_first_hero_only() {
        let body = r#"<header>h</header><section id="hero">OLD</section><section id="hero">SECOND</section>"#;
        let out = splice_hero(body, "<NEW>");
        assert_eq!(out, r#"<header>h</header><NEW><section id="hero">SECOND</section>"#);
    }

    #[test]
    fn splice_balances_nested_sections() {
        let body = r#"<section id="hero"><section>inner</section>tail</section><p>after</p>"#;
        assert_eq!(splice_hero(body, "X"), "X<p>after</p>");
    }

    #[test]
    fn splice_matches_id_among_other_attributes() {
        let body = r#"<section class="top" id="hero" data-x='1'>OLD</section>"#;
        assert_eq!(splice_hero(body, "X"), "X");
    }

    #[test]
    fn splice_without_hero_is_noop() {
        let body = r#"<section id="features">F</section><img src="x.png">"#;
        assert_eq!(splice_hero(body, "X"), body);
    }

    #[test]
    fn splice_with_unclosed_hero_is_noop() {
        let body = r#"<section id="hero"><p>never closed"#;
        assert_eq!(splice_hero(body, "X"), body);
    }
}
