//! Shared test utilities.
//!
//! [`SAMPLE_TEMPLATE`] is a small but complete homepage: an embedded
//! stylesheet, a hero section with its own image, and three more images
//! further down, one of them inside a nested container.

use crate::options::OptionSet;

pub const SAMPLE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Home</title>
<style>
.hero-content { display: flex; gap: 40px; }
.feature-card > img { max-width: 100%; }
</style>
</head>
<body class="home">
<section id="hero">
  <div class="hero-content">
    <h1>Placeholder hero</h1>
    <img src="assets/placeholder-hero.png" alt="placeholder">
  </div>
</section>
<section id="features">
  <div class="feature-card"><img src="assets/feature-1.png" alt="Feature one"></div>
  <div class="feature-card"><div><img src='assets/feature-2.png' alt='Feature two'></div></div>
</section>
<section id="team">
  <img alt="Team" src=assets/team.jpg>
</section>
</body>
</html>
"#;

/// Stock options rendering `template`.
pub fn options_with_template(template: &str) -> OptionSet {
    OptionSet::with_template(template)
}
