use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::storage::{SlotStorage, StorageError};

/// Process-local slots. Used when `STORAGE_BACKEND=memory` and in tests.
#[derive(Debug, Default)]
pub struct MemorySlotStorage {
    slots: Mutex<HashMap<&'static str, String>>,
    reject_writes: AtomicBool,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a slot with a raw payload, valid or not.
    pub fn with_payload(self, slot: &'static str, payload: impl Into<String>) -> Self {
        self.lock().insert(slot, payload.into());
        self
    }

    /// Makes every following write fail as if the quota were exhausted.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn raw(&self, slot: &'static str) -> Option<String> {
        self.lock().get(slot).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<&'static str, String>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SlotStorage for MemorySlotStorage {
    fn read(&self, slot: &'static str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(slot))
    }

    fn write(&self, slot: &'static str, payload: &str) -> Result<(), StorageError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::QuotaExceeded { slot });
        }

        self.lock().insert(slot, payload.to_string());
        Ok(())
    }
}
