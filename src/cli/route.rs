//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::command_name;
use crate::cli::parse::{
    ClusterCommands, Commands, ContentCommands, LinksCommands, SettingsCommands,
};
use crate::cli::presentation::{
    format_article_json, format_article_list_json, format_article_list_text,
    format_article_text, format_cluster_json, format_cluster_list_json,
    format_cluster_list_text, format_cluster_text, format_link_suggestions_json,
    format_link_suggestions_text, format_outcome_text, format_settings_json,
    format_settings_text,
};
use crate::cluster::NewCluster;
use crate::config::{AppConfig, ConfigLoader};
use crate::content::ArticleStatus;
use crate::error::ApiError;
use crate::generation::{create_cluster, ClusterService};
use crate::links::suggest_for_article;
use crate::provider::GatewayClient;
use crate::settings::SettingsUpdate;
use crate::store::{
    open_database, ContentItemStore, ProgressStore, SledClusterStore, SledContentStore,
    SledSettingsStore,
};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Runtime context for CLI execution: workspace, loaded config, and the stores.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: AppConfig,
    clusters: Arc<SledClusterStore>,
    content: Arc<SledContentStore>,
    settings: Arc<SledSettingsStore>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = load_config(&workspace_root, config_path.as_deref())?;
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed: {}",
                error_msgs.join("; ")
            ))
        })?;

        let store_path = config.storage.resolve(&workspace_root);
        debug!(store_path = %store_path.display(), "opening store");
        let db = open_database(&store_path)?;

        Ok(Self {
            clusters: Arc::new(SledClusterStore::new(&db)?),
            content: Arc::new(SledContentStore::new(&db)?),
            settings: Arc::new(SledSettingsStore::new(&db)?),
            workspace_root,
            config,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = %name, "command started");
        let result = self.execute_inner(command);
        info!(
            command = %name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Cluster { command } => self.handle_cluster_command(command),
            Commands::Content { command } => self.handle_content_command(command),
            Commands::Links { command } => self.handle_links_command(command),
            Commands::Settings { command } => self.handle_settings_command(command),
        }
    }

    fn handle_cluster_command(&self, command: &ClusterCommands) -> Result<String, ApiError> {
        match command {
            ClusterCommands::Create {
                topic,
                keyword,
                audience,
                category,
                id,
            } => {
                let job = create_cluster(
                    self.clusters.as_ref(),
                    NewCluster {
                        id: id.clone().unwrap_or_else(|| Uuid::new_v4().to_string()),
                        topic: topic.clone(),
                        primary_keyword: keyword.clone(),
                        target_audience: audience.clone(),
                        category: category.clone(),
                        stage_plan: self.config.generation.stage_plan(),
                    },
                )?;
                Ok(format!(
                    "Created cluster {} ({} articles planned).\n\nRun 'clusterwright cluster generate {}' to start.",
                    job.id,
                    job.stage_plan.total_items(),
                    job.id
                ))
            }
            ClusterCommands::Generate { id } => {
                let service = self.cluster_service()?;
                let outcome = block_on(service.start_generation(id))??;
                Ok(format_outcome_text(&outcome))
            }
            ClusterCommands::Retry { id, force } => {
                let service = self.cluster_service()?;
                let outcome = if *force {
                    block_on(service.recover_stalled(id))??
                } else {
                    block_on(service.retry_failed(id))??
                };
                Ok(format_outcome_text(&outcome))
            }
            ClusterCommands::Show { id, format } => {
                let job = self.clusters.read(id)?;
                Ok(if format == "json" {
                    format_cluster_json(&job)
                } else {
                    format_cluster_text(&job)
                })
            }
            ClusterCommands::List { format } => {
                let jobs = self.clusters.list()?;
                Ok(if format == "json" {
                    format_cluster_list_json(&jobs)
                } else {
                    format_cluster_list_text(&jobs)
                })
            }
        }
    }

    fn handle_content_command(&self, command: &ContentCommands) -> Result<String, ApiError> {
        match command {
            ContentCommands::List { cluster, format } => {
                let articles = self.content.list_articles(cluster.as_deref())?;
                Ok(if format == "json" {
                    format_article_list_json(&articles)
                } else {
                    format_article_list_text(&articles)
                })
            }
            ContentCommands::Show { id, format } => {
                let article = self
                    .content
                    .get_article(id)?
                    .ok_or_else(|| ApiError::ArticleNotFound(id.clone()))?;
                let faqs = self.content.faqs_for(id)?;
                Ok(if format == "json" {
                    format_article_json(&article, &faqs)
                } else {
                    format_article_text(&article, &faqs)
                })
            }
            ContentCommands::Publish { id } => {
                if self.content.get_article(id)?.is_none() {
                    return Err(ApiError::ArticleNotFound(id.clone()));
                }
                self.content.set_article_status(id, ArticleStatus::Published)?;
                Ok(format!("Published article {}", id))
            }
        }
    }

    fn handle_links_command(&self, command: &LinksCommands) -> Result<String, ApiError> {
        match command {
            LinksCommands::Suggest { article_id, format } => {
                let article = self
                    .content
                    .get_article(article_id)?
                    .ok_or_else(|| ApiError::ArticleNotFound(article_id.clone()))?;
                let suggestions = suggest_for_article(self.content.as_ref(), article_id)?;
                Ok(if format == "json" {
                    format_link_suggestions_json(&article, &suggestions)
                } else {
                    format_link_suggestions_text(&article, &suggestions)
                })
            }
        }
    }

    fn handle_settings_command(&self, command: &SettingsCommands) -> Result<String, ApiError> {
        match command {
            SettingsCommands::Show { format } => {
                let settings = self.settings.get()?;
                Ok(if format == "json" {
                    format_settings_json(&settings)
                } else {
                    format_settings_text(&settings)
                })
            }
            SettingsCommands::Set {
                brand_voice,
                authority_block,
                site_name,
                extra_instructions,
            } => {
                let settings = self.settings.update(SettingsUpdate {
                    brand_voice: brand_voice.clone(),
                    authority_block: authority_block.clone(),
                    site_name: site_name.clone(),
                    extra_instructions: extra_instructions.clone(),
                })?;
                Ok(format!("Settings updated.\n\n{}", format_settings_text(&settings)))
            }
        }
    }

    fn cluster_service(&self) -> Result<ClusterService, ApiError> {
        let generator = GatewayClient::from_config(&self.config.provider)
            .map_err(|e| ApiError::ProviderError(e.to_string()))?;
        Ok(ClusterService::new(
            self.clusters.clone(),
            self.content.clone(),
            self.settings.clone(),
            Arc::new(generator),
        )
        .with_pacing_delay(self.config.generation.pacing_delay()))
    }
}

fn load_config(workspace_root: &Path, config_path: Option<&Path>) -> Result<AppConfig, ApiError> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(workspace_root)?,
    };
    Ok(config)
}

/// Run a batch future to completion on a fresh multi-threaded runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output, ApiError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| ApiError::ConfigError(format!("Failed to start async runtime: {}", e)))?;
    Ok(runtime.block_on(future))
}
