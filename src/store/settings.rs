//! Singleton style-settings row.

use crate::error::{ApiError, StorageError};
use crate::settings::{SettingsProvider, SettingsUpdate, StyleSettings};
use crate::store::{to_storage_data, to_storage_io};
use sled::{Db, Tree};

const TREE_SETTINGS: &str = "settings";
const KEY_STYLE: &str = "style";

#[derive(Clone)]
pub struct SledSettingsStore {
    settings: Tree,
}

impl SledSettingsStore {
    pub fn new(db: &Db) -> Result<Self, StorageError> {
        let settings = db.open_tree(TREE_SETTINGS).map_err(to_storage_io)?;
        Ok(Self { settings })
    }

    /// Stored settings, or defaults when nothing has been saved yet.
    pub fn get(&self) -> Result<StyleSettings, StorageError> {
        let Some(raw) = self.settings.get(KEY_STYLE).map_err(to_storage_io)? else {
            return Ok(StyleSettings::default());
        };
        serde_json::from_slice(&raw).map_err(to_storage_data)
    }

    pub fn put(&self, settings: &StyleSettings) -> Result<(), StorageError> {
        let value = serde_json::to_vec(settings).map_err(to_storage_data)?;
        self.settings.insert(KEY_STYLE, value).map_err(to_storage_io)?;
        self.settings.flush().map_err(to_storage_io)?;
        Ok(())
    }

    pub fn update(&self, update: SettingsUpdate) -> Result<StyleSettings, StorageError> {
        let mut settings = self.get()?;
        settings.apply(update);
        self.put(&settings)?;
        Ok(settings)
    }
}

impl SettingsProvider for SledSettingsStore {
    fn load(&self) -> Result<StyleSettings, ApiError> {
        self.get()
            .map_err(|e| ApiError::SettingsUnavailable(e.to_string()))
    }
}
