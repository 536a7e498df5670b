//! File-backed durable storage.

use campus_records::storage::{KeyValueStore, StorageResult};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::warn;

/// Key/value pairs kept as one JSON object on disk
///
/// Every write rewrites the whole file; the data is a token and a flag, so
/// there is nothing to gain from anything finer.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents. An unreadable document counts as empty, so the
    /// next write replaces it.
    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %self.path.display(), error = %err, "Ignoring corrupt storage file");
                BTreeMap::new()
            })),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock()?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock()?;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.lock.lock()?;
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_records::storage::{DARK_MODE_KEY, StorageError, TOKEN_KEY};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "campus_client_{name}_{}.json",
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = FileStore::new(temp_path("missing"));
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert!(store.remove(TOKEN_KEY).is_ok());
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let store = FileStore::new(&path);
        store.set(TOKEN_KEY, "abc").unwrap();
        store.set(DARK_MODE_KEY, "true").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

        reopened.remove(TOKEN_KEY).unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_replaced() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert!(store.remove(TOKEN_KEY).is_ok());

        store.set(TOKEN_KEY, "fresh").unwrap();
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("fresh"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let dir = temp_path("as_dir");
        fs::create_dir_all(&dir).unwrap();

        let store = FileStore::new(&dir);
        assert!(matches!(store.get(TOKEN_KEY), Err(StorageError::Io(_))));

        fs::remove_dir(&dir).unwrap();
    }
}
