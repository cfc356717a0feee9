//! Integration tests for the configuration system

use crate::integration::test_utils::with_xdg_env;
use clusterwright::cluster::FunnelStage;
use clusterwright::config::{ConfigLoader, ValidationError};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_global_config_applies_to_every_workspace() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let global_dir = test_dir.path().join("clusterwright");
        std::fs::create_dir_all(&global_dir).unwrap();
        std::fs::write(
            global_dir.join("config.toml"),
            r#"
[provider]
endpoint = "http://localhost:11434/v1"
model = "llama3"

[logging]
level = "debug"
format = "json"
"#,
        )
        .unwrap();

        let workspace = TempDir::new().unwrap();
        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.provider.endpoint, "http://localhost:11434/v1");
        assert_eq!(config.provider.model, "llama3");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    });
}

#[test]
fn test_environment_variables_override_files() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let workspace = TempDir::new().unwrap();
        std::fs::create_dir_all(workspace.path().join("config")).unwrap();
        std::fs::write(
            workspace.path().join("config").join("config.toml"),
            "[generation]\npacing_delay_ms = 500\n\n[provider]\nmodel = \"from-file\"\n",
        )
        .unwrap();

        std::env::set_var("CLUSTERWRIGHT__GENERATION__PACING_DELAY_MS", "42");
        std::env::set_var("CLUSTERWRIGHT__PROVIDER__MODEL", "from-env");
        let config = ConfigLoader::load(workspace.path());
        std::env::remove_var("CLUSTERWRIGHT__GENERATION__PACING_DELAY_MS");
        std::env::remove_var("CLUSTERWRIGHT__PROVIDER__MODEL");

        let config = config.unwrap();
        assert_eq!(config.generation.pacing_delay(), Duration::from_millis(42));
        assert_eq!(config.provider.model, "from-env");
    });
}

#[test]
fn test_custom_stage_plan_from_workspace_config() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let workspace = TempDir::new().unwrap();
        std::fs::create_dir_all(workspace.path().join("config")).unwrap();
        std::fs::write(
            workspace.path().join("config").join("config.toml"),
            r#"
[[generation.stage_plan.stages]]
stage = "MOFU"
count = 4
description = "Comparisons"
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(workspace.path()).unwrap();
        let plan = config.generation.stage_plan();
        assert_eq!(plan.total_items(), 4);
        assert_eq!(plan.stages[0].stage, FunnelStage::Mofu);
    });
}

#[test]
fn test_invalid_values_are_reported_by_validate() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    std::fs::write(
        &config_file,
        r#"
[storage]
store_path = ""

[provider]
endpoint = "localhost:8080"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], ValidationError::Storage(_)));
    assert!(matches!(errors[1], ValidationError::Provider(_)));
}

#[test]
fn test_explicit_file_ignores_workspace_files() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let workspace = TempDir::new().unwrap();
        std::fs::create_dir_all(workspace.path().join("config")).unwrap();
        std::fs::write(
            workspace.path().join("config").join("config.toml"),
            "[storage]\nstore_path = \"workspace-store\"\n",
        )
        .unwrap();
        let explicit = workspace.path().join("explicit.toml");
        std::fs::write(&explicit, "[generation]\npacing_delay_ms = 0\n").unwrap();

        let config = ConfigLoader::load_from_file(&explicit).unwrap();
        assert_eq!(config.storage.store_path, PathBuf::from(".clusterwright/store"));
        assert_eq!(config.generation.pacing_delay(), Duration::ZERO);
    });
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(ConfigLoader::load_from_file(&temp_dir.path().join("absent.toml")).is_err());
}
