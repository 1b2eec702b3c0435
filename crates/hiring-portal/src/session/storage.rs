use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Well-known key the credential lives under in the durable key-value store.
pub const CREDENTIAL_KEY: &str = "token";

/// Durable key-value storage for the bearer credential.
pub trait CredentialStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, credential: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("credential store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("credential store is not a JSON object: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Process-local store, used by tests and the demo backend.
#[derive(Debug, Default)]
pub struct MemoryCredentialStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryCredentialStorage {
    pub fn with_credential(credential: impl Into<String>) -> Self {
        let storage = Self::default();
        storage
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(CREDENTIAL_KEY.to_string(), credential.into());
        storage
    }
}

impl CredentialStorage for MemoryCredentialStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(CREDENTIAL_KEY).cloned())
    }

    fn save(&self, credential: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(CREDENTIAL_KEY.to_string(), credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(CREDENTIAL_KEY);
        Ok(())
    }
}

/// JSON file holding a flat string map, the on-disk analogue of browser local storage.
#[derive(Debug, Clone)]
pub struct FileCredentialStorage {
    path: PathBuf,
}

impl FileCredentialStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// A corrupt file is replaced on the next write instead of blocking sign-out.
    fn entries_or_reset(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_entries() {
            Ok(entries) => Ok(entries),
            Err(StorageError::Corrupt(_)) => Ok(BTreeMap::new()),
            Err(err) => Err(err),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(entries)?;
        fs::write(&self.path, body)?;
        Ok(())
    }
}

impl CredentialStorage for FileCredentialStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(CREDENTIAL_KEY))
    }

    fn save(&self, credential: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_or_reset()?;
        entries.insert(CREDENTIAL_KEY.to_string(), credential.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.entries_or_reset()?;
        entries.remove(CREDENTIAL_KEY);
        if !entries.is_empty() {
            return self.write_entries(&entries);
        }
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_nanos();
        std::env::temp_dir()
            .join(format!("hiring-portal-{name}-{nanos}"))
            .join("credentials.json")
    }

    #[test]
    fn memory_store_round_trips_and_clears() {
        let storage = MemoryCredentialStorage::default();
        assert_eq!(storage.load().expect("load"), None);
        storage.save("a.b.c").expect("save");
        assert_eq!(storage.load().expect("load").as_deref(), Some("a.b.c"));
        storage.clear().expect("clear");
        storage.clear().expect("second clear is harmless");
        assert_eq!(storage.load().expect("load"), None);
    }

    #[test]
    fn file_store_keeps_unrelated_keys() {
        let path = scratch_path("keys");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, r#"{"theme":"dark"}"#).expect("seed file");

        let storage = FileCredentialStorage::new(&path);
        storage.save("x.y.z").expect("save");
        assert_eq!(storage.load().expect("load").as_deref(), Some("x.y.z"));

        storage.clear().expect("clear");
        assert_eq!(storage.load().expect("load"), None);
        let remaining = fs::read_to_string(&path).expect("file kept");
        assert!(remaining.contains("theme"));
    }

    #[test]
    fn file_store_clear_removes_empty_file() {
        let path = scratch_path("empty");
        let storage = FileCredentialStorage::new(&path);
        storage.clear().expect("clearing a missing file succeeds");
        storage.save("x.y.z").expect("save");
        storage.clear().expect("clear");
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_surfaces_on_load_and_is_reset_on_clear() {
        let path = scratch_path("corrupt");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "not json").expect("seed file");

        let storage = FileCredentialStorage::new(&path);
        assert!(matches!(storage.load(), Err(StorageError::Corrupt(_))));
        storage.clear().expect("clear resets corrupt store");
        assert_eq!(storage.load().expect("load"), None);
    }
}
