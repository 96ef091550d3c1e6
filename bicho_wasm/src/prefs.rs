use bicho_core::PreferenceStore;
use web_sys::Storage;

/// `window.localStorage`; without it (private mode, no window) reads are
/// empty and writes are dropped.
pub struct LocalStoragePreferences {
    storage: Option<Storage>,
}

impl LocalStoragePreferences {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::debug!("localStorage unavailable, preferences are not persisted");
        }
        Self { storage }
    }
}

impl Default for LocalStoragePreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for LocalStoragePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.set_item(key, value) {
                tracing::warn!(key, error = ?err, "cannot persist preference");
            }
        }
    }
}
