//! Generation executor: drives a cluster's stage plan one slot at a time.
//! Owns progress bookkeeping, pacing and failure aggregation; prompt building and
//! persistence of items stay in the pipeline.

use crate::cluster::{
    final_status, ClusterJob, ClusterPatch, ClusterStatus, ItemFailure, ItemStatus, ProgressMap,
};
use crate::error::ApiError;
use crate::generation::pipeline::ItemPipeline;
use crate::provider::ContentGenerator;
use crate::settings::StyleSettings;
use crate::store::{ContentItemStore, ProgressStore};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Which slots of the plan a batch attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchScope<'a> {
    /// Every slot, in plan order.
    All,
    /// Only the listed keys, still in plan order.
    Keys(&'a [String]),
}

/// Result of one batch as seen by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub cluster_id: String,
    pub success: bool,
    pub status: ClusterStatus,
    pub progress: ProgressMap,
    /// Item key -> article id, for slots completed in this batch.
    pub articles: IndexMap<String, String>,
    /// Item key -> failure, for every key currently in error.
    pub failures: IndexMap<String, ItemFailure>,
}

/// Runs a claimed (`generating`) cluster to a terminal status.
pub struct GenerationExecutor {
    generator: Arc<dyn ContentGenerator>,
    content: Arc<dyn ContentItemStore>,
    pacing_delay: Duration,
}

impl GenerationExecutor {
    pub const DEFAULT_PACING_DELAY: Duration = Duration::from_secs(3);

    pub fn new(generator: Arc<dyn ContentGenerator>, content: Arc<dyn ContentItemStore>) -> Self {
        Self {
            generator,
            content,
            pacing_delay: Self::DEFAULT_PACING_DELAY,
        }
    }

    pub fn with_pacing_delay(mut self, pacing_delay: Duration) -> Self {
        self.pacing_delay = pacing_delay;
        self
    }

    pub fn pacing_delay(&self) -> Duration {
        self.pacing_delay
    }

    /// Attempt every slot in `scope` exactly once, persisting the whole progress map
    /// before and after each attempt. Item failures are recorded, never propagated;
    /// only progress-store faults abort the batch.
    pub async fn execute(
        &self,
        store: &dyn ProgressStore,
        job: &ClusterJob,
        settings: &StyleSettings,
        scope: BatchScope<'_>,
    ) -> Result<GenerationOutcome, ApiError> {
        let pipeline = ItemPipeline::new(self.generator.clone(), self.content.clone(), settings);
        let selected: Option<HashSet<&str>> = match scope {
            BatchScope::All => None,
            BatchScope::Keys(keys) => Some(keys.iter().map(String::as_str).collect()),
        };
        let slots: Vec<_> = job
            .stage_plan
            .slots()
            .filter(|slot| {
                selected
                    .as_ref()
                    .map_or(true, |keys| keys.contains(slot.key.as_str()))
            })
            .collect();

        let mut progress = job.progress.clone();
        let mut item_errors = job.item_errors.clone();
        let mut articles = IndexMap::new();

        info!(
            cluster_id = %job.id,
            generator = %self.generator.name(),
            slots = slots.len(),
            total_items = job.stage_plan.total_items(),
            "cluster generation started"
        );

        for (position, slot) in slots.iter().enumerate() {
            progress.insert(slot.key.clone(), ItemStatus::Generating);
            store.write(&job.id, &ClusterPatch::progress(&progress))?;
            debug!(cluster_id = %job.id, key = %slot.key, stage = %slot.stage, "item started");

            let mut patch = match pipeline.run(job, slot).await {
                Ok(outcome) => {
                    info!(
                        cluster_id = %job.id,
                        key = %slot.key,
                        stage = %slot.stage,
                        article_id = %outcome.article_id,
                        slug = %outcome.slug,
                        faqs = outcome.faq_ids.len(),
                        "item complete"
                    );
                    progress.insert(slot.key.clone(), ItemStatus::Complete);
                    articles.insert(slot.key.clone(), outcome.article_id);
                    let mut patch = ClusterPatch::progress(&progress);
                    if item_errors.shift_remove(&slot.key).is_some() {
                        patch.item_errors = Some(item_errors.clone());
                    }
                    patch
                }
                Err(err) => {
                    warn!(
                        cluster_id = %job.id,
                        key = %slot.key,
                        stage = %slot.stage,
                        kind = err.kind(),
                        error = %err,
                        "item failed"
                    );
                    progress.insert(slot.key.clone(), ItemStatus::Error);
                    item_errors.insert(
                        slot.key.clone(),
                        ItemFailure {
                            kind: err.kind().to_string(),
                            message: err.to_string(),
                        },
                    );
                    let mut patch = ClusterPatch::progress(&progress);
                    patch.item_errors = Some(item_errors.clone());
                    patch
                }
            };

            let is_last = position + 1 == slots.len();
            if is_last {
                // Terminal status goes out with the last item's result in one update.
                patch.status = Some(final_status(&progress));
                patch.item_errors = Some(item_errors.clone());
            }
            store.write(&job.id, &patch)?;

            if !is_last && !self.pacing_delay.is_zero() {
                tokio::time::sleep(self.pacing_delay).await;
            }
        }

        let status = final_status(&progress);
        if slots.is_empty() {
            store.write(
                &job.id,
                &ClusterPatch {
                    status: Some(status),
                    progress: Some(progress.clone()),
                    item_errors: Some(item_errors.clone()),
                },
            )?;
        }

        info!(
            cluster_id = %job.id,
            status = %status,
            completed = progress.values().filter(|s| **s == ItemStatus::Complete).count(),
            failed = item_errors.len(),
            "cluster generation finished"
        );

        Ok(GenerationOutcome {
            cluster_id: job.id.clone(),
            success: status == ClusterStatus::Complete,
            status,
            progress,
            articles,
            failures: item_errors,
        })
    }
}
