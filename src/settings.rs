//! Brand voice and style settings injected into every generation prompt.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StyleSettings {
    #[serde(default)]
    pub brand_voice: String,
    #[serde(default)]
    pub authority_block: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub extra_instructions: String,
}

/// Partial update for [`StyleSettings`]; `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub brand_voice: Option<String>,
    pub authority_block: Option<String>,
    pub site_name: Option<String>,
    pub extra_instructions: Option<String>,
}

impl StyleSettings {
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(v) = update.brand_voice {
            self.brand_voice = v;
        }
        if let Some(v) = update.authority_block {
            self.authority_block = v;
        }
        if let Some(v) = update.site_name {
            self.site_name = v;
        }
        if let Some(v) = update.extra_instructions {
            self.extra_instructions = v;
        }
    }
}

/// Read-only source of style settings. Loaded once per batch.
pub trait SettingsProvider: Send + Sync {
    fn load(&self) -> Result<StyleSettings, ApiError>;
}

impl SettingsProvider for StyleSettings {
    fn load(&self) -> Result<StyleSettings, ApiError> {
        Ok(self.clone())
    }
}
