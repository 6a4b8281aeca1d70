use crate::error::Result;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

/// String-valued key-value store that outlives the process.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Keeps every entry in one JSON object on disk, rewritten on each change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<FileStorage> {
        let path = path.as_ref().to_path_buf();
        let mut raw = Vec::new();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        file.read_to_end(&mut raw)?;

        let entries = match parse_entries(raw) {
            Ok(entries) => entries,
            Err(reason) => {
                warn!(
                    path = %path.display(),
                    error = %reason,
                    "storage file unreadable, starting empty"
                );
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), keys = entries.len(), "opened storage");
        Ok(FileStorage { path, entries })
    }

    fn flush_to_disk(&self) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.entries)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(serialized.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        Ok(())
    }
}

fn parse_entries(raw: Vec<u8>) -> std::result::Result<BTreeMap<String, String>, String> {
    let contents = String::from_utf8(raw).map_err(|err| err.to_string())?;
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&contents).map_err(|err| err.to_string())
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush_to_disk()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush_to_disk()?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
