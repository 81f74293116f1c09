//! Native platform implementation (JSON file preference store)

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::prefs::PrefStore;

/// Preferences persisted as a flat JSON object.
///
/// The file is read once on open and rewritten on every change. A missing
/// file is an empty store.
pub struct FileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let items = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).with_context(|| {
                    format!("Preferences file {} is not a JSON object of strings", path.display())
                })?
            }
        } else {
            BTreeMap::new()
        };
        log::debug!("Loaded {} preference(s) from {}", items.len(), path.display());
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))
    }
}

impl PrefStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("explorer-params-{}-{name}", std::process::id()))
            .join("prefs.json")
    }

    #[test]
    fn missing_file_is_empty() {
        let store = FileStore::open(scratch("missing")).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn values_survive_reopen() {
        let path = scratch("reopen");
        {
            let mut store = FileStore::open(&path).unwrap();
            store.set("a", "1").unwrap();
            store.set("b", "2").unwrap();
            store.remove("b").unwrap();
        }
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.get("b"), None);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = scratch("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(FileStore::open(&path).is_err());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
