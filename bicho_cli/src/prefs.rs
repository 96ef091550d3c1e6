use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bicho_core::PreferenceStore;
use tracing::warn;

/// JSON object on disk, rewritten on every `set`.
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Opens `path`; a missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "ignoring corrupt preferences");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bicho")
            .join("prefs.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if let Err(err) = self.save() {
            warn!(path = %self.path.display(), error = %err, "cannot save preferences");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bicho_core::{HelpContext, HelpOverlay};

    #[test]
    fn preference_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut help = HelpOverlay::new(HelpContext::new(5, 5), FilePreferences::open(&path));
        assert!(help.show_on_startup());
        help.set_show_on_startup(false);

        let help = HelpOverlay::new(HelpContext::new(5, 5), FilePreferences::open(&path));
        assert!(!help.show_on_startup());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let prefs = FilePreferences::open(&path);
        assert_eq!(prefs.get("anything"), None);
    }
}
