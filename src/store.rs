//! Option persistence.
//!
//! The whole option set is stored as one JSON object under one logical key.
//! [`OptionStore`] is the seam between the page logic and wherever that object
//! lives: [`JsonFileStore`] keeps it in a file on disk, [`MemoryStore`] keeps
//! it in memory for tests and embedding hosts.
//!
//! Three operations sit on top of any store:
//!
//! - [`read`] resolves the stored object over the stock defaults and never
//!   fails. An unreadable store logs a warning and yields defaults.
//! - [`write`] sanitizes a form submission against the current values and
//!   persists the result.
//! - [`activate`] seeds stock defaults on first activation, loading
//!   `template_html` from the bundled template asset.

use crate::form::{Capability, FormSubmission, sanitize};
use crate::options::{OptionSet, resolve_options};
use serde_json::Value;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Backend holding the stored option object.
pub trait OptionStore {
    /// The stored object, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<Value>, StoreError>;

    /// Replace the stored object.
    fn save(&self, value: &Value) -> Result<(), StoreError>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: RefCell<Option<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `options`.
    pub fn with_options(options: &OptionSet) -> Self {
        Self {
            value: RefCell::new(Some(Value::Object(options.to_map()))),
        }
    }

    /// A store holding an arbitrary raw object, as a hand-edited or stale
    /// document would look.
    pub fn with_value(value: Value) -> Self {
        Self {
            value: RefCell::new(Some(value)),
        }
    }

    pub fn snapshot(&self) -> Option<Value> {
        self.value.borrow().clone()
    }
}

impl OptionStore for MemoryStore {
    fn load(&self) -> Result<Option<Value>, StoreError> {
        Ok(self.value.borrow().clone())
    }

    fn save(&self, value: &Value) -> Result<(), StoreError> {
        *self.value.borrow_mut() = Some(value.clone());
        Ok(())
    }
}

/// Store backed by a pretty-printed JSON file.
///
/// Saves go to a sibling temp file that is then renamed over the target, so a
/// crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl OptionStore for JsonFileStore {
    fn load(&self) -> Result<Option<Value>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, value: &Value) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, serde_json::to_string_pretty(value)?)?;
        fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), "options saved");
        Ok(())
    }
}

/// Current options: stored values over stock defaults. Never fails.
pub fn read(store: &dyn OptionStore) -> OptionSet {
    match store.load() {
        Ok(stored) => resolve_options(stored),
        Err(err) => {
            warn!(error = %err, "could not load stored options; using defaults");
            OptionSet::default()
        }
    }
}

/// Sanitize `submission` against the current options and persist the result.
///
/// Returns the option set that was stored.
pub fn write(
    store: &dyn OptionStore,
    submission: &FormSubmission,
    capability: Capability,
) -> Result<OptionSet, StoreError> {
    let current = read(store);
    let next = sanitize(&current, submission, capability);
    store.save(&Value::Object(next.to_map()))?;
    info!(
        complete = submission.is_complete(),
        capability = ?capability,
        "options saved"
    );
    Ok(next)
}

/// Seed stock defaults if nothing is stored yet.
///
/// `template_html` is loaded from `template_asset`; a missing asset seeds an
/// empty template. Returns `true` when defaults were written, `false` when
/// options already existed and were left alone.
pub fn activate(store: &dyn OptionStore, template_asset: &Path) -> Result<bool, StoreError> {
    if store.load()?.is_some() {
        debug!("options already stored; activation leaves them unchanged");
        return Ok(false);
    }
    let options = OptionSet::with_template(load_template_asset(template_asset));
    store.save(&Value::Object(options.to_map()))?;
    info!(template = %template_asset.display(), "stock options seeded");
    Ok(true)
}

/// Contents of the bundled template, or an empty string if it cannot be read.
pub fn load_template_asset(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "template asset unavailable; seeding empty template");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::SAMPLE_TEMPLATE;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn read_empty_store_is_default() {
        assert_eq!(read(&MemoryStore::new()), OptionSet::default());
    }

    #[test]
    fn read_layers_sparse_document() {
        let store = MemoryStore::with_value(json!({ "color_accent": "#000" }));
        let options = read(&store);
        assert_eq!(options.color_accent, "#000");
        assert_eq!(options.color_white, "#ffffff");
    }

    #[test]
    fn read_survives_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("options.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(store.load().is_err());
        assert_eq!(read(&store), OptionSet::default());
    }

    #[test]
    fn file_store_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_roundtrip_creates_parents() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/dir/options.json"));
        let value = json!({ "hero_badge_1": "A", "image_overrides": { "2": "b.png" } });
        store.save(&value).unwrap();
        assert_eq!(store.load().unwrap(), Some(value));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn write_unfiltered_keeps_template_verbatim() {
        let store = MemoryStore::new();
        let mut form = FormSubmission::patch();
        form.insert("template_html", SAMPLE_TEMPLATE).unwrap();
        let saved = write(&store, &form, Capability::UnfilteredHtml).unwrap();
        assert_eq!(saved.template_html, SAMPLE_TEMPLATE);
        assert_eq!(read(&store).template_html, SAMPLE_TEMPLATE);
    }

    #[test]
    fn write_restricted_filters_template() {
        let store = MemoryStore::new();
        let mut form = FormSubmission::patch();
        form.insert("template_html", "<p>ok</p><script>bad()</script>")
            .unwrap();
        let saved = write(&store, &form, Capability::Restricted).unwrap();
        assert_eq!(saved.template_html, "<p>ok</p>");
    }

    #[test]
    fn write_persists_full_object() {
        let store = MemoryStore::new();
        let mut form = FormSubmission::patch();
        form.insert("hero_badge_1", "A").unwrap();
        write(&store, &form, Capability::Restricted).unwrap();

        let Some(Value::Object(stored)) = store.snapshot() else {
            panic!("nothing stored");
        };
        assert_eq!(stored["hero_badge_1"], json!("A"));
        assert_eq!(stored["hero_force_stacked_mobile"], json!(1));
        assert_eq!(stored["tablet_breakpoint"], json!(992));
    }

    #[test]
    fn activate_seeds_once() {
        let dir = TempDir::new().unwrap();
        let asset = dir.path().join("homepage.html");
        fs::write(&asset, SAMPLE_TEMPLATE).unwrap();
        let store = MemoryStore::new();

        assert!(activate(&store, &asset).unwrap());
        assert_eq!(read(&store).template_html, SAMPLE_TEMPLATE);

        let mut form = FormSubmission::patch();
        form.insert("hero_badge_1", "edited").unwrap();
        write(&store, &form, Capability::Restricted).unwrap();

        assert!(!activate(&store, &asset).unwrap());
        assert_eq!(read(&store).hero_badge_1, "edited");
    }

    #[test]
    fn activate_without_asset_seeds_empty_template() {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::new();
        assert!(activate(&store, &dir.path().join("missing.html")).unwrap());
        let options = read(&store);
        assert!(options.template_html.is_empty());
        assert_eq!(options.hero_badge_1, OptionSet::default().hero_badge_1);
    }
}
