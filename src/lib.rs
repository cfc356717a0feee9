//! Clusterwright: Batch Content-Cluster Generation
//!
//! Generates a funnel-staged cluster of articles (awareness, consideration,
//! decision) one item at a time, persisting per-article progress after every
//! attempt so partial failures can be inspected and selectively retried.

pub mod cli;
pub mod cluster;
pub mod config;
pub mod content;
pub mod error;
pub mod generation;
pub mod links;
pub mod logging;
pub mod provider;
pub mod settings;
pub mod store;
