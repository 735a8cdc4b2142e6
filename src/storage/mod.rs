//! Key-value slots holding whole serialized collections.
//!
//! Every collection lives in exactly one slot and is rewritten as a single
//! payload on each mutation. Backends never interpret the payload.

pub mod file;
pub mod memory;

use std::path::PathBuf;

use thiserror::Error;

use crate::models::CollectionKind;

pub use file::FileSlotStorage;
pub use memory::MemorySlotStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read slot {slot} at {path}: {source}")]
    Read {
        slot: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write slot {slot} at {path}: {source}")]
    Write {
        slot: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage quota exceeded while writing slot {slot}")]
    QuotaExceeded { slot: &'static str },
}

/// Slot name used for a collection. These match the names the browser panel
/// wrote, so exported data can be dropped into a data directory as is.
pub fn slot_name(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Orders => "trackingOrders",
        CollectionKind::Drivers => "trackingDrivers",
    }
}

pub trait SlotStorage: Send + Sync {
    /// Returns `None` when the slot has never been written.
    fn read(&self, slot: &'static str) -> Result<Option<String>, StorageError>;

    /// Replaces the slot contents in one step.
    fn write(&self, slot: &'static str, payload: &str) -> Result<(), StorageError>;
}
