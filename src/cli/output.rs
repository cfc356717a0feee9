//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a one-line message for CLI output.
pub fn map_error(e: &ApiError) -> String {
    let message = match e {
        ApiError::ClusterNotStartable { id, status } => match status {
            crate::cluster::ClusterStatus::Generating => {
                format!(
                    "Cluster {} is already generating (if its batch is no longer running, use 'cluster retry {} --force')",
                    id, id
                )
            }
            _ => e.to_string(),
        },
        ApiError::ProviderError(msg) => format!("Content generator unavailable: {}", msg),
        _ => e.to_string(),
    };
    message.replace('\n', " ")
}
