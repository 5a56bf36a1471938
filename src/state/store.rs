use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use super::{parse_view_state, serialize_view_state, ViewState};

/// Key the view state blob lives under.
pub const STATE_KEY: &str = "dashboardState";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read storage file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write storage file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is not a string map: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode view state: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

/// String key/value store in the shape of browser local storage.
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Local storage persisted as one JSON object of string values.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StorageError::Read {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            source: e,
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let write_err = |e| StorageError::Write {
            path: self.path.display().to_string(),
            source: e,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let contents =
            serde_json::to_string_pretty(map).map_err(|e| StorageError::Encode { source: e })?;
        std::fs::write(&self.path, contents).map_err(write_err)
    }

    /// Current map, or an empty one when the file holds garbage. A corrupt
    /// file is replaced on the next write.
    fn read_map_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_map() {
            Err(StorageError::Corrupt { path, source }) => {
                warn!("discarding unreadable storage file {path}: {source}");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.read_map_for_update()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut map = self.read_map_for_update()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Loads and saves the comments view state under [`STATE_KEY`].
#[derive(Clone, Debug)]
pub struct ViewStateStore<B> {
    backend: B,
}

impl<B: StorageBackend> ViewStateStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Stored state, or the defaults when nothing usable is stored.
    pub fn load(&self) -> ViewState {
        let raw = match self.backend.get_item(STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no stored view state, using defaults");
                return ViewState::default();
            }
            Err(e) => {
                warn!("view state unavailable, using defaults: {e}");
                return ViewState::default();
            }
        };
        match parse_view_state(&raw) {
            Ok(state) => state,
            Err(e) => {
                debug!("ignoring stored view state: {e}");
                ViewState::default()
            }
        }
    }

    pub fn save(&mut self, state: &ViewState) -> Result<(), StorageError> {
        let raw = serialize_view_state(state).map_err(|e| StorageError::Encode { source: e })?;
        self.backend.set_item(STATE_KEY, &raw)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.backend.remove_item(STATE_KEY)
    }
}
