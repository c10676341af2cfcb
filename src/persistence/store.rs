use super::snapshot::PlayerSnapshot;
use crate::error::StoreError;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Key-value store for player snapshots.
pub trait RecordStore {
    fn read(&self, key: &str) -> Result<Option<PlayerSnapshot>, StoreError>;
    fn write(&mut self, key: &str, snapshot: &PlayerSnapshot) -> Result<(), StoreError>;
}

/// In-process store, for tests and the simulator.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, PlayerSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<PlayerSnapshot>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, snapshot: &PlayerSnapshot) -> Result<(), StoreError> {
        self.records.insert(key.to_string(), snapshot.clone());
        Ok(())
    }
}

/// One pretty-printed JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under `~/.forge/`.
    pub fn in_home() -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine home directory",
            )
        })?;
        Ok(Self::new(home_dir.join(".forge")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl RecordStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<PlayerSnapshot>, StoreError> {
        let json = match fs::read_to_string(self.path_for(key)) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn write(&mut self, key: &str, snapshot: &PlayerSnapshot) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        // Write then rename so a crash never leaves a half-written record
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}
