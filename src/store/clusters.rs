//! Cluster records and their progress maps.

use crate::cluster::{ClusterJob, ClusterPatch, ClusterStatus};
use crate::error::{ApiError, StorageError};
use crate::store::{to_storage_data, to_storage_io};
use sled::{Db, IVec, Tree};

const TREE_CLUSTERS: &str = "clusters";

/// Durable cluster state. Single writer per cluster id at a time; `begin` is the
/// compare-and-set that claims a cluster for a batch.
pub trait ProgressStore: Send + Sync {
    fn create(&self, job: &ClusterJob) -> Result<(), ApiError>;

    fn read(&self, cluster_id: &str) -> Result<ClusterJob, ApiError>;

    /// Apply a partial update. A present `progress` replaces the stored map wholesale.
    fn write(&self, cluster_id: &str, patch: &ClusterPatch) -> Result<(), ApiError>;

    /// Atomically move the cluster from `expected` to `generating`.
    fn begin(&self, cluster_id: &str, expected: ClusterStatus) -> Result<ClusterJob, ApiError>;

    fn list(&self) -> Result<Vec<ClusterJob>, ApiError>;
}

#[derive(Clone)]
pub struct SledClusterStore {
    clusters: Tree,
}

impl SledClusterStore {
    pub fn new(db: &Db) -> Result<Self, StorageError> {
        let clusters = db.open_tree(TREE_CLUSTERS).map_err(to_storage_io)?;
        Ok(Self { clusters })
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.clusters.flush().map_err(to_storage_io)?;
        Ok(())
    }

    fn load(&self, cluster_id: &str) -> Result<(IVec, ClusterJob), ApiError> {
        let raw = self
            .clusters
            .get(cluster_id.as_bytes())
            .map_err(to_storage_io)?
            .ok_or_else(|| ApiError::ClusterNotFound(cluster_id.to_string()))?;
        let job = serde_json::from_slice(&raw).map_err(to_storage_data)?;
        Ok((raw, job))
    }

    /// Read-modify-write guarded by compare-and-swap, retried if another writer raced us.
    fn modify<F>(&self, cluster_id: &str, mut change: F) -> Result<ClusterJob, ApiError>
    where
        F: FnMut(&mut ClusterJob) -> Result<(), ApiError>,
    {
        loop {
            let (raw, mut job) = self.load(cluster_id)?;
            change(&mut job)?;
            let encoded = serde_json::to_vec(&job).map_err(to_storage_data)?;
            let swapped = self
                .clusters
                .compare_and_swap(cluster_id.as_bytes(), Some(raw), Some(encoded))
                .map_err(to_storage_io)?;
            if swapped.is_ok() {
                return Ok(job);
            }
        }
    }
}

impl ProgressStore for SledClusterStore {
    fn create(&self, job: &ClusterJob) -> Result<(), ApiError> {
        let encoded = serde_json::to_vec(job).map_err(to_storage_data)?;
        let swapped = self
            .clusters
            .compare_and_swap(job.id.as_bytes(), None as Option<&[u8]>, Some(encoded))
            .map_err(to_storage_io)?;
        if swapped.is_err() {
            return Err(StorageError::Duplicate(format!("cluster {}", job.id)).into());
        }
        self.flush()?;
        Ok(())
    }

    fn read(&self, cluster_id: &str) -> Result<ClusterJob, ApiError> {
        self.load(cluster_id).map(|(_, job)| job)
    }

    fn write(&self, cluster_id: &str, patch: &ClusterPatch) -> Result<(), ApiError> {
        self.modify(cluster_id, |job| {
            job.apply(patch);
            Ok(())
        })?;
        self.flush()?;
        Ok(())
    }

    fn begin(&self, cluster_id: &str, expected: ClusterStatus) -> Result<ClusterJob, ApiError> {
        let job = self.modify(cluster_id, |job| {
            if job.status != expected {
                return Err(ApiError::ClusterNotStartable {
                    id: job.id.clone(),
                    status: job.status,
                });
            }
            job.apply(&ClusterPatch::status(ClusterStatus::Generating));
            Ok(())
        })?;
        self.flush()?;
        Ok(job)
    }

    fn list(&self) -> Result<Vec<ClusterJob>, ApiError> {
        let mut out = Vec::new();
        for result in self.clusters.iter() {
            let (_, value) = result.map_err(to_storage_io)?;
            let job: ClusterJob = serde_json::from_slice(&value).map_err(to_storage_data)?;
            out.push(job);
        }
        out.sort_by_key(|job| std::cmp::Reverse(job.created_at));
        Ok(out)
    }
}
