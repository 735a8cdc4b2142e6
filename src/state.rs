use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::notify::Notifier;
use crate::observability::metrics::Metrics;
use crate::storage::{FileSlotStorage, MemorySlotStorage, SlotStorage};
use crate::store::RecordStore;

pub struct AppState {
    store: Mutex<RecordStore>,
    pub notifier: Notifier,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(storage: Arc<dyn SlotStorage>, event_buffer_size: usize) -> Self {
        let notifier = Notifier::new(event_buffer_size);
        let metrics = Metrics::new();
        let store = RecordStore::open(storage, notifier.clone(), metrics.clone());

        Self {
            store: Mutex::new(store),
            notifier,
            metrics,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let storage: Arc<dyn SlotStorage> = match config.storage_backend {
            StorageBackend::File => Arc::new(FileSlotStorage::open(&config.data_dir)?),
            StorageBackend::Memory => Arc::new(MemorySlotStorage::new()),
        };

        Ok(Self::new(storage, config.event_buffer_size))
    }

    /// Locks the store for one load-modify-save step.
    pub fn store(&self) -> Result<MutexGuard<'_, RecordStore>, AppError> {
        self.store
            .lock()
            .map_err(|_| AppError::Internal("record store lock poisoned".to_string()))
    }
}
