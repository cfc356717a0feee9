//! Durable sled-backed stores: cluster progress, generated content, and style settings.
//! All three share one database; each owns its own trees.

pub mod clusters;
pub mod content;
pub mod settings;

pub use clusters::{ProgressStore, SledClusterStore};
pub use content::{ContentItemStore, SledContentStore};
pub use settings::SledSettingsStore;

use crate::error::StorageError;
use std::io;
use std::path::Path;

/// Open (or create) the sled database backing every store.
pub fn open_database<P: AsRef<Path>>(path: P) -> Result<sled::Db, StorageError> {
    let path = path.as_ref();
    std::fs::create_dir_all(path)?;
    sled::open(path).map_err(|e| {
        StorageError::IoError(io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to open sled database at {}: {}", path.display(), e),
        ))
    })
}

pub(crate) fn to_storage_io(err: sled::Error) -> StorageError {
    StorageError::IoError(io::Error::new(io::ErrorKind::Other, err.to_string()))
}

pub(crate) fn to_storage_data(err: serde_json::Error) -> StorageError {
    StorageError::IoError(io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
}
