use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::models::MeetingDetails;

pub const MEETING_DETAILS_KEY: &str = "calendly_meeting_details";
pub const MEETING_LINK_KEY: &str = "calendly_meeting_link";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// String key-value persistence in the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// A JSON object on disk. Survives restarts the way local storage survives
/// page reloads. The lock only serialises writers inside this process.
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

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// Single-use handoff of a booked meeting from the widget callback to the
/// next page load. Last write wins.
#[derive(Clone)]
pub struct MeetingStore {
    store: Arc<dyn KeyValueStore>,
}

impl MeetingStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, details: &MeetingDetails) -> Result<(), StorageError> {
        let blob = serde_json::to_string(details)?;
        self.store.set(MEETING_DETAILS_KEY, &blob)?;
        if !details.meeting_link.is_empty() {
            self.store.set(MEETING_LINK_KEY, &details.meeting_link)?;
        }
        Ok(())
    }

    /// Peek-and-clear: the stored details come back at most once. Both keys
    /// are removed even when the blob turns out to be unreadable.
    pub fn take(&self) -> Result<Option<MeetingDetails>, StorageError> {
        let Some(raw) = self.store.get(MEETING_DETAILS_KEY)? else {
            return Ok(None);
        };
        self.store.remove(MEETING_DETAILS_KEY)?;
        self.store.remove(MEETING_LINK_KEY)?;

        match serde_json::from_str(&raw) {
            Ok(details) => Ok(Some(details)),
            Err(e) => {
                tracing::error!(error = %e, "error parsing stored meeting details");
                Ok(None)
            }
        }
    }

    /// The separately kept link, consumed like the details.
    pub fn take_link(&self) -> Result<Option<String>, StorageError> {
        let link = self.store.get(MEETING_LINK_KEY)?;
        if link.is_some() {
            self.store.remove(MEETING_LINK_KEY)?;
        }
        Ok(link.filter(|l| !l.is_empty()))
    }
}
