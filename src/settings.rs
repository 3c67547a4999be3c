//! CLI settings.
//!
//! Where the options live and how chatty the tool is. Settings are layered,
//! first match wins:
//!
//! 1. Environment variables (`LANDING_STORE`, `LANDING_TEMPLATE_ASSET`, `LANDING_LOG`)
//! 2. The settings file (`landing.toml` unless `--config` says otherwise; optional)
//! 3. Defaults
//!
//! ```toml
//! store = "landing-options.json"      # JSON document holding the option set
//! template_asset = "assets/homepage.html"  # seeded into template_html by `activate`
//! log_level = "warn"                  # tracing filter when RUST_LOG is unset
//! ```
//!
//! These are not the landing page options themselves; those are edited
//! through `save` and persisted in the store.

use confique::Config;
use std::path::{Path, PathBuf};

/// Settings file read when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "landing.toml";

#[derive(Config, Debug, Clone)]
pub struct Settings {
    /// Path of the JSON option store.
    #[config(env = "LANDING_STORE", default = "landing-options.json")]
    pub store: PathBuf,

    /// Template seeded into `template_html` on first activation.
    #[config(env = "LANDING_TEMPLATE_ASSET", default = "assets/homepage.html")]
    pub template_asset: PathBuf,

    /// Log filter used when `RUST_LOG` is not set.
    #[config(env = "LANDING_LOG", default = "warn")]
    pub log_level: String,
}

impl Settings {
    /// Load settings from the environment, then `file` (if it exists), then defaults.
    pub fn load(file: &Path) -> Result<Self, confique::Error> {
        Settings::builder().env().file(file).load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Environment layering is left to confique; these tests only touch files
    // and assume no LANDING_* variables are set.

    #[test]
    fn missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.store, PathBuf::from("landing-options.json"));
        assert_eq!(settings.template_asset, PathBuf::from("assets/homepage.html"));
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("landing.toml");
        fs::write(&path, "store = \"/srv/site/options.json\"\nlog_level = \"debug\"\n").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.store, PathBuf::from("/srv/site/options.json"));
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.template_asset, PathBuf::from("assets/homepage.html"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("landing.toml");
        fs::write(&path, "store = [").unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
