use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::storage::{SlotStorage, StorageError};

/// One JSON file per slot inside a data directory.
#[derive(Debug, Clone)]
pub struct FileSlotStorage {
    dir: PathBuf,
}

impl FileSlotStorage {
    /// Creates the directory if it does not exist yet.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Write {
            slot: "*",
            path: dir.clone(),
            source,
        })?;

        debug!(data_dir = %dir.display(), "file slot storage opened");
        Ok(Self { dir })
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl SlotStorage for FileSlotStorage {
    fn read(&self, slot: &'static str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(slot);
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { slot, path, source }),
        }
    }

    fn write(&self, slot: &'static str, payload: &str) -> Result<(), StorageError> {
        let path = self.slot_path(slot);
        let tmp = path.with_extension("json.tmp");

        // rename keeps readers from ever seeing a half-written slot
        fs::write(&tmp, payload)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|source| {
                let _ = fs::remove_file(&tmp);
                if source.kind() == ErrorKind::StorageFull {
                    StorageError::QuotaExceeded { slot }
                } else {
                    StorageError::Write { slot, path, source }
                }
            })
    }
}
