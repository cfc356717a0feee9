//! Cluster entry points: create, start, retry.
//! Callers (CLI, tests) use these only; claiming and batch orchestration stay here.

use crate::cluster::{ClusterJob, ClusterStatus, NewCluster};
use crate::error::ApiError;
use crate::generation::executor::{BatchScope, GenerationExecutor, GenerationOutcome};
use crate::provider::ContentGenerator;
use crate::settings::SettingsProvider;
use crate::store::{ContentItemStore, ProgressStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Validate and store a new `draft` cluster.
pub fn create_cluster(store: &dyn ProgressStore, request: NewCluster) -> Result<ClusterJob, ApiError> {
    let job = ClusterJob::from_request(request)?;
    store.create(&job)?;
    info!(
        cluster_id = %job.id,
        topic = %job.topic,
        total_items = job.stage_plan.total_items(),
        "cluster created"
    );
    Ok(job)
}

/// Wires the stores, settings and generator behind the cluster entry points.
pub struct ClusterService {
    clusters: Arc<dyn ProgressStore>,
    settings: Arc<dyn SettingsProvider>,
    executor: GenerationExecutor,
}

impl ClusterService {
    pub fn new(
        clusters: Arc<dyn ProgressStore>,
        content: Arc<dyn ContentItemStore>,
        settings: Arc<dyn SettingsProvider>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            clusters,
            settings,
            executor: GenerationExecutor::new(generator, content),
        }
    }

    pub fn with_pacing_delay(mut self, pacing_delay: Duration) -> Self {
        self.executor = self.executor.with_pacing_delay(pacing_delay);
        self
    }

    pub fn create_cluster(&self, request: NewCluster) -> Result<ClusterJob, ApiError> {
        create_cluster(self.clusters.as_ref(), request)
    }

    /// Run the full stage plan of a `draft` cluster and wait for the batch to finish.
    ///
    /// The cluster is claimed with a compare-and-set on its status, so a second
    /// concurrent start fails with [`ApiError::ClusterNotStartable`] instead of
    /// interleaving writes. Settings are loaded before claiming; if they are
    /// unavailable the cluster stays in `draft`.
    pub async fn start_generation(&self, cluster_id: &str) -> Result<GenerationOutcome, ApiError> {
        self.clusters.read(cluster_id)?;
        let settings = self.settings.load()?;
        let job = self.clusters.begin(cluster_id, ClusterStatus::Draft)?;
        self.executor
            .execute(self.clusters.as_ref(), &job, &settings, BatchScope::All)
            .await
    }

    /// Re-attempt only the items whose latest attempt failed.
    ///
    /// Valid only for clusters in `error`; completed items are left untouched and
    /// the terminal status is recomputed over the whole progress map.
    pub async fn retry_failed(&self, cluster_id: &str) -> Result<GenerationOutcome, ApiError> {
        let current = self.clusters.read(cluster_id)?;
        if current.status != ClusterStatus::Error {
            return Err(ApiError::ClusterNotStartable {
                id: current.id,
                status: current.status,
            });
        }
        let settings = self.settings.load()?;
        let job = self.clusters.begin(cluster_id, ClusterStatus::Error)?;
        let keys = job.failed_keys();
        info!(cluster_id = %job.id, keys = ?keys, "retrying failed items");
        self.executor
            .execute(
                self.clusters.as_ref(),
                &job,
                &settings,
                BatchScope::Keys(&keys),
            )
            .await
    }

    /// Resume a cluster left in `generating` by a batch that never finished
    /// (process exit, store fault). Re-attempts every slot that is not `complete`.
    ///
    /// Only safe when no batch for the cluster is still running; the status check
    /// cannot tell a live batch from a dead one.
    pub async fn recover_stalled(&self, cluster_id: &str) -> Result<GenerationOutcome, ApiError> {
        let current = self.clusters.read(cluster_id)?;
        if current.status != ClusterStatus::Generating {
            return Err(ApiError::ClusterNotStartable {
                id: current.id,
                status: current.status,
            });
        }
        let settings = self.settings.load()?;
        let job = self.clusters.begin(cluster_id, ClusterStatus::Generating)?;
        let keys = job.unfinished_keys();
        warn!(cluster_id = %job.id, keys = ?keys, "recovering stalled cluster");
        self.executor
            .execute(
                self.clusters.as_ref(),
                &job,
                &settings,
                BatchScope::Keys(&keys),
            )
            .await
    }

    pub fn cluster(&self, cluster_id: &str) -> Result<ClusterJob, ApiError> {
        self.clusters.read(cluster_id)
    }

    pub fn clusters(&self) -> Result<Vec<ClusterJob>, ApiError> {
        self.clusters.list()
    }
}
