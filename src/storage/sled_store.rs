//! A `LogStore` backed by a `sled` tree.
use super::LogStore;
use crate::error::TelemetryResult;
use sled::Db;

/// A `LogStore` implementation using `sled` for storage.
pub struct SledLogStore {
    tree: sled::Tree,
}

impl SledLogStore {
    /// Creates a new `SledLogStore`.
    ///
    /// # Arguments
    ///
    /// * `db` - The `sled::Db` instance to use for storage.
    ///
    /// # Errors
    ///
    /// This function will return an error if the `logs` tree cannot be opened.
    pub fn new(db: &Db) -> TelemetryResult<Self> {
        let tree = db.open_tree("logs")?;
        Ok(Self { tree })
    }
}

impl LogStore for SledLogStore {
    fn load(&self, key: &str) -> TelemetryResult<Option<Vec<u8>>> {
        Ok(self.tree.get(key.as_bytes())?.map(|value| value.to_vec()))
    }

    fn save(&self, key: &str, value: &[u8]) -> TelemetryResult<()> {
        self.tree.insert(key.as_bytes(), value)?;
        self.tree.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> TelemetryResult<()> {
        self.tree.remove(key.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> Db {
        sled::Config::new().temporary(true).open().unwrap()
    }

    #[test]
    fn missing_key_loads_as_none() {
        let store = SledLogStore::new(&temp_db()).unwrap();
        assert!(store.load("app_logs").unwrap().is_none());
    }

    #[test]
    fn save_overwrites_and_remove_clears() {
        let store = SledLogStore::new(&temp_db()).unwrap();
        store.save("app_logs", b"first").unwrap();
        store.save("app_logs", b"second").unwrap();
        assert_eq!(store.load("app_logs").unwrap().as_deref(), Some(&b"second"[..]));

        store.remove("app_logs").unwrap();
        store.remove("app_logs").unwrap();
        assert!(store.load("app_logs").unwrap().is_none());
    }
}
