//! Cluster generation: prompt, schema, item pipeline, executor and entry points.
//! Executor drives the plan; the pipeline owns one slot; stores and provider stay in their domains.

pub mod executor;
pub mod pipeline;
pub mod prompt;
pub mod run;
pub mod schema;

pub use executor::{BatchScope, GenerationExecutor, GenerationOutcome};
pub use pipeline::{ItemOutcome, ItemPipeline};
pub use run::{create_cluster, ClusterService};
pub use schema::{response_schema, validate_payload, GeneratedArticle, GeneratedFaq};
