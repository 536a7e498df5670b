//! Display preferences.

use log::warn;
use std::sync::Arc;

use crate::storage::{DARK_MODE_KEY, KeyValueStore, StorageResult};

/// Dark/light display flag, persisted as JSON `true`/`false`
pub struct Preferences {
    storage: Arc<dyn KeyValueStore>,
    dark_mode: bool,
}

impl Preferences {
    /// Read the persisted flag. Missing or unreadable values mean light mode.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let dark_mode = match storage.get(DARK_MODE_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|err| {
                warn!("Ignoring stored {DARK_MODE_KEY} value {raw:?}: {err}");
                false
            }),
            Ok(None) => false,
            Err(err) => {
                warn!("Could not read display preferences: {err}");
                false
            }
        };
        Self { storage, dark_mode }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Set and persist the flag
    pub fn set_dark_mode(&mut self, enabled: bool) -> StorageResult<()> {
        self.storage
            .set(DARK_MODE_KEY, &serde_json::to_string(&enabled)?)?;
        self.dark_mode = enabled;
        Ok(())
    }

    /// Flip the flag, returning the new value
    pub fn toggle(&mut self) -> StorageResult<bool> {
        self.set_dark_mode(!self.dark_mode)?;
        Ok(self.dark_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_to_light() {
        let prefs = Preferences::load(Arc::new(MemoryStore::new()));
        assert!(!prefs.dark_mode());
    }

    #[test]
    fn test_toggle_persists() {
        let storage = Arc::new(MemoryStore::new());
        let mut prefs = Preferences::load(storage.clone());

        assert!(prefs.toggle().unwrap());
        assert_eq!(storage.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));

        let reloaded = Preferences::load(storage.clone());
        assert!(reloaded.dark_mode());

        assert!(!prefs.toggle().unwrap());
        assert_eq!(storage.get(DARK_MODE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_garbage_value_is_light() {
        let storage = Arc::new(MemoryStore::with_entries([(DARK_MODE_KEY, "yes please")]));
        assert!(!Preferences::load(storage).dark_mode());
    }
}
