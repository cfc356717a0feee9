//! CLI parse: clap types for Clusterwright. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Clusterwright CLI - batch generation of SEO content clusters
#[derive(Parser)]
#[command(name = "clusterwright")]
#[command(about = "Generate funnel-staged content clusters with durable per-article progress")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create, generate and inspect content clusters
    Cluster {
        #[command(subcommand)]
        command: ClusterCommands,
    },
    /// Inspect and publish generated articles
    Content {
        #[command(subcommand)]
        command: ContentCommands,
    },
    /// Internal-link suggestions
    Links {
        #[command(subcommand)]
        command: LinksCommands,
    },
    /// Brand voice and style settings used in every prompt
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
pub enum ClusterCommands {
    /// Create a draft cluster
    Create {
        /// Cluster topic
        #[arg(long)]
        topic: String,
        /// Primary keyword every article targets
        #[arg(long)]
        keyword: String,
        /// Target audience
        #[arg(long, default_value = "")]
        audience: String,
        /// Category assigned to every article
        #[arg(long)]
        category: Option<String>,
        /// Cluster id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },
    /// Generate every article of a draft cluster
    Generate {
        /// Cluster id
        id: String,
    },
    /// Re-attempt the failed articles of a cluster in error
    Retry {
        /// Cluster id
        id: String,
        /// Resume a cluster stuck in generating after its batch died; every
        /// article not yet complete is attempted. Do not use while a batch is running.
        #[arg(long)]
        force: bool,
    },
    /// Show a cluster's status and per-article progress
    Show {
        /// Cluster id
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List clusters, newest first
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum ContentCommands {
    /// List generated articles
    List {
        /// Only articles of this cluster
        #[arg(long)]
        cluster: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one article with its FAQs
    Show {
        /// Article id
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Mark an article as published
    Publish {
        /// Article id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum LinksCommands {
    /// Rank published articles as internal-link targets for an article
    Suggest {
        /// Article id
        article_id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the stored style settings
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Update style settings; omitted fields are left unchanged
    Set {
        #[arg(long)]
        brand_voice: Option<String>,
        #[arg(long)]
        authority_block: Option<String>,
        #[arg(long)]
        site_name: Option<String>,
        #[arg(long)]
        extra_instructions: Option<String>,
    },
}
