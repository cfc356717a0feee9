use crate::cluster::plan::StagePlan;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStatus {
    Draft,
    Generating,
    Complete,
    Error,
}

impl ClusterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClusterStatus::Draft => "draft",
            ClusterStatus::Generating => "generating",
            ClusterStatus::Complete => "complete",
            ClusterStatus::Error => "error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ClusterStatus::Complete | ClusterStatus::Error)
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Generating,
    Complete,
    Error,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Generating => "generating",
            ItemStatus::Complete => "complete",
            ItemStatus::Error => "error",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, ItemStatus::Generating)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item key -> status, in attempt order.
pub type ProgressMap = IndexMap<String, ItemStatus>;

/// Why the most recent attempt at an item failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemFailure {
    pub kind: String,
    pub message: String,
}

/// Durable record of one cluster batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterJob {
    pub id: String,
    pub topic: String,
    pub primary_keyword: String,
    pub target_audience: String,
    #[serde(default)]
    pub category: Option<String>,
    pub stage_plan: StagePlan,
    pub status: ClusterStatus,
    #[serde(default)]
    pub progress: ProgressMap,
    #[serde(default)]
    pub item_errors: IndexMap<String, ItemFailure>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update written to the progress store. `None` fields are left untouched;
/// `progress` always replaces the whole map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterPatch {
    pub status: Option<ClusterStatus>,
    pub progress: Option<ProgressMap>,
    pub item_errors: Option<IndexMap<String, ItemFailure>>,
}

impl ClusterPatch {
    pub fn status(status: ClusterStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn progress(progress: &ProgressMap) -> Self {
        Self {
            progress: Some(progress.clone()),
            ..Self::default()
        }
    }
}

/// Creation request for a cluster.
#[derive(Debug, Clone)]
pub struct NewCluster {
    pub id: String,
    pub topic: String,
    pub primary_keyword: String,
    pub target_audience: String,
    pub category: Option<String>,
    pub stage_plan: StagePlan,
}

impl ClusterJob {
    pub fn from_request(request: NewCluster) -> Result<Self, ApiError> {
        if request.id.trim().is_empty() {
            return Err(ApiError::InvalidCluster("Cluster id cannot be empty".to_string()));
        }
        if request.topic.trim().is_empty() {
            return Err(ApiError::InvalidCluster("Topic cannot be empty".to_string()));
        }
        if request.primary_keyword.trim().is_empty() {
            return Err(ApiError::InvalidCluster(
                "Primary keyword cannot be empty".to_string(),
            ));
        }
        request.stage_plan.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: request.id,
            topic: request.topic.trim().to_string(),
            primary_keyword: request.primary_keyword.trim().to_string(),
            target_audience: request.target_audience.trim().to_string(),
            category: request
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            stage_plan: request.stage_plan,
            status: ClusterStatus::Draft,
            progress: ProgressMap::new(),
            item_errors: IndexMap::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: &ClusterPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(progress) = &patch.progress {
            self.progress = progress.clone();
        }
        if let Some(item_errors) = &patch.item_errors {
            self.item_errors = item_errors.clone();
        }
        self.updated_at = Utc::now();
    }

    /// Keys whose latest attempt failed, in plan order.
    pub fn failed_keys(&self) -> Vec<String> {
        self.stage_plan
            .slots()
            .filter(|slot| self.progress.get(&slot.key) == Some(&ItemStatus::Error))
            .map(|slot| slot.key)
            .collect()
    }

    /// Keys not yet `complete` (failed, interrupted or never attempted), in plan order.
    pub fn unfinished_keys(&self) -> Vec<String> {
        self.stage_plan
            .slots()
            .filter(|slot| self.progress.get(&slot.key) != Some(&ItemStatus::Complete))
            .map(|slot| slot.key)
            .collect()
    }
}

/// Terminal cluster status for a fully attempted progress map.
pub fn final_status(progress: &ProgressMap) -> ClusterStatus {
    if progress.values().any(|s| *s == ItemStatus::Error) {
        ClusterStatus::Error
    } else {
        ClusterStatus::Complete
    }
}
