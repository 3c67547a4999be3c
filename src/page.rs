//! Page assembly: the markup returned wherever the landing page is embedded.
//!
//! ```text
//! template_html ─► extract_body ─► splice_hero ─► apply_image_overrides ─► expander
//!                                                                            │
//! <div class="landing-builder"><style>generate_stylesheet</style> body <script>custom_js</script></div>
//! ```
//!
//! The host embeds the page through one parameterless call, [`render`], which
//! reads a single option snapshot and never mutates it.

use crate::extract::{ImageRecord, extract_body, extract_images};
use crate::hero::{render_hero, splice_hero};
use crate::images::apply_image_overrides;
use crate::options::OptionSet;
use crate::store::{self, OptionStore};
use crate::stylesheet::generate_stylesheet;
use maud::{PreEscaped, html};
use tracing::debug;

/// Class of the root container element wrapping the whole page.
pub const ROOT_CLASS: &str = "landing-builder";

/// Host step that expands embedded shorthand directives (shortcodes) in the
/// assembled body. The page treats it as opaque.
pub trait ShortcodeExpander {
    fn expand(&self, body: &str) -> String;
}

/// Expander for hosts without shortcodes: returns the body unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ShortcodeExpander for PassThrough {
    fn expand(&self, body: &str) -> String {
        body.to_string()
    }
}

impl<F> ShortcodeExpander for F
where
    F: Fn(&str) -> String,
{
    fn expand(&self, body: &str) -> String {
        self(body)
    }
}

/// Template body with the hero spliced in but no image overrides applied.
///
/// Image positions in this markup are the ones override indices refer to.
pub fn spliced_body(options: &OptionSet) -> String {
    let body = extract_body(&options.template_html);
    let hero = render_hero(options).into_string();
    splice_hero(body, &hero)
}

/// Images of the rendered body, numbered the way overrides count them.
pub fn body_images(options: &OptionSet) -> Vec<ImageRecord> {
    extract_images(&spliced_body(options))
}

/// Final body markup: hero spliced in, image overrides applied.
pub fn assemble_body(options: &OptionSet) -> String {
    apply_image_overrides(&spliced_body(options), &options.image_overrides)
}

/// Full embeddable markup for one option snapshot.
pub fn assemble(options: &OptionSet, expander: &dyn ShortcodeExpander) -> String {
    let css = generate_stylesheet(options);
    let body = expander.expand(&assemble_body(options));
    let script = options.custom_js.as_str();
    debug!(
        css_bytes = css.len(),
        body_bytes = body.len(),
        script = !script.trim().is_empty(),
        "page assembled"
    );

    html! {
        div class=(ROOT_CLASS) {
            style { (PreEscaped(css)) }
            (PreEscaped(body))
            @if !script.trim().is_empty() {
                script { (PreEscaped(script)) }
            }
        }
    }
    .into_string()
}

/// Render entry point: read the current options once and assemble them.
pub fn render(store: &dyn OptionStore, expander: &dyn ShortcodeExpander) -> String {
    let options = store::read(store);
    assemble(&options, expander)
}
