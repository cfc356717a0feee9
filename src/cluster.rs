//! Cluster domain: the stage plan a batch follows and the job record that tracks it.
//! Stores and the executor live elsewhere; this module is data and invariants only.

pub mod job;
pub mod plan;

pub use job::{
    final_status, ClusterJob, ClusterPatch, ClusterStatus, ItemFailure, ItemStatus, NewCluster,
    ProgressMap,
};
pub use plan::{item_key, FunnelStage, PlanSlot, StageDescriptor, StagePlan};
