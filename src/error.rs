//! Error types for the cluster generation system.

use crate::cluster::ClusterStatus;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Slug already taken: {0}")]
    SlugTaken(String),

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failures surfaced by a content generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Generator rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Generator quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("Generator returned malformed output: {0}")]
    MalformedOutput(String),

    #[error("Generator transport error: {0}")]
    Transport(String),

    #[error("Generator not configured: {0}")]
    NotConfigured(String),
}

impl GeneratorError {
    /// Rate limits are the only failure worth retrying as-is later.
    pub fn is_transient(&self) -> bool {
        matches!(self, GeneratorError::RateLimited(_))
    }
}

/// Per-item failures of the item pipeline.
///
/// The executor records all three identically against the item key, but keeps
/// the kind for logs and for the cluster's error details.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("Generated item failed validation: {0}")]
    Schema(String),

    #[error("Failed to persist generated item: {0}")]
    Persistence(#[from] StorageError),
}

impl PipelineError {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Generator(_) => "generator",
            PipelineError::Schema(_) => "schema",
            PipelineError::Persistence(_) => "persistence",
        }
    }
}

/// Orchestrator-level and API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Cluster not found: {0}")]
    ClusterNotFound(String),

    #[error("Cluster {id} cannot start generation from status '{status}'")]
    ClusterNotStartable { id: String, status: ClusterStatus },

    #[error("Invalid cluster: {0}")]
    InvalidCluster(String),

    #[error("Invalid stage plan: {0}")]
    InvalidPlan(String),

    #[error("Settings unavailable: {0}")]
    SettingsUnavailable(String),

    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
