//! Config loading entry point: builds the layered source stack and deserializes it.

use crate::config::merge::merge_policy;
use crate::config::sources::{global_file, workspace_file};
use crate::config::AppConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

/// Loads [`AppConfig`] from defaults, files and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global file, then workspace files, then `CLUSTERWRIGHT__*` variables.
    pub fn load(workspace_root: &Path) -> Result<AppConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        builder
            .add_source(merge_policy::environment_source())
            .build()?
            .try_deserialize()
    }

    /// Defaults, then exactly `path` (which must exist), then the environment.
    pub fn load_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(merge_policy::environment_source())
            .build()?
            .try_deserialize()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
