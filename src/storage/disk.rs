use super::base::StorageError;
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes record sets as pretty-printed JSON arrays under a base directory.
#[derive(Debug, Clone)]
pub struct DiskStorage {
    base_path: PathBuf,
}

impl DiskStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.base_path.join(filename)
    }

    pub fn write_records<T: Serialize>(
        &self,
        filename: &str,
        records: &[T],
    ) -> Result<PathBuf, StorageError> {
        let path = self.path_for(filename);
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&path, json)?;
        info!("Saved {} records to {}", records.len(), path.display());
        Ok(path)
    }

    /// Like [`DiskStorage::write_records`], but a failure is only logged.
    pub fn save_or_log<T: Serialize>(&self, filename: &str, records: &[T]) -> Option<PathBuf> {
        match self.write_records(filename, records) {
            Ok(path) => Some(path),
            Err(e) => {
                error!("Error saving records to {}: {}", filename, e);
                None
            }
        }
    }

    pub fn read_records<T: DeserializeOwned>(&self, filename: &str) -> Result<Vec<T>, StorageError> {
        let raw = fs::read_to_string(self.path_for(filename))?;
        Ok(serde_json::from_str(&raw)?)
    }
}
