use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sim_tracker_engine::{Store, StoreError, StoredValue};

/// Variable store backed by a JSON file on disk.
///
/// Load is tolerant: a missing or unreadable file starts an empty store, the
/// way the pipeline treats any persistence failure as "value absent". Writes
/// accumulate in memory until [`save`](JsonFileStore::save).
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, StoredValue>,
}

impl JsonFileStore {
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(error) => {
                    log::warn!(
                        "variable store {} is corrupt ({error}); starting empty",
                        path.display()
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn get(&self, name: &str) -> Result<Option<StoredValue>, StoreError> {
        Ok(self.values.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: StoredValue) -> Result<(), StoreError> {
        self.values.insert(name.to_string(), value);
        Ok(())
    }
}
