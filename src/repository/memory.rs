use std::collections::HashMap;
use std::sync::Mutex;

use crate::repository::{KeyValueReader, KeyValueWriter, RepositoryError, RepositoryResult};

/// Process-local key-value store.
///
/// Used by tests and by sessions that do not need to outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`, e.g. data left by a previous run.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueReader for MemoryStore {
    fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| RepositoryError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }
}

impl KeyValueWriter for MemoryStore {
    fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let mut entries = self.entries.lock().map_err(|_| RepositoryError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_value(&self, key: &str) -> RepositoryResult<usize> {
        let mut entries = self.entries.lock().map_err(|_| RepositoryError::Poisoned)?;
        Ok(usize::from(entries.remove(key).is_some()))
    }
}
