//! Item pipeline: one plan slot in, one stored article plus its FAQs out.

use crate::cluster::{ClusterJob, PlanSlot};
use crate::content::{reading_time, slug_token, unique_slug, NewArticle, NewFaq};
use crate::error::{PipelineError, StorageError};
use crate::generation::prompt::{system_prompt, user_prompt, StageRequest};
use crate::generation::schema::{response_schema, validate_payload, GeneratedArticle, GeneratedFaq};
use crate::provider::ContentGenerator;
use crate::settings::StyleSettings;
use crate::store::ContentItemStore;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

const MAX_SLUG_ATTEMPTS: usize = 10;

/// What a successful slot produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub article_id: String,
    pub slug: String,
    pub faq_ids: Vec<String>,
}

/// Batch-scoped pipeline: settings are rendered into the system prompt once and
/// reused for every slot.
pub struct ItemPipeline {
    generator: Arc<dyn ContentGenerator>,
    content: Arc<dyn ContentItemStore>,
    system_prompt: String,
    schema: Value,
}

impl ItemPipeline {
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        content: Arc<dyn ContentItemStore>,
        settings: &StyleSettings,
    ) -> Self {
        Self {
            generator,
            content,
            system_prompt: system_prompt(settings),
            schema: response_schema(),
        }
    }

    pub async fn run(
        &self,
        cluster: &ClusterJob,
        slot: &PlanSlot<'_>,
    ) -> Result<ItemOutcome, PipelineError> {
        let request = StageRequest {
            slot: slot.index,
            stage: slot.stage,
            stage_description: slot.description,
            topic: &cluster.topic,
            primary_keyword: &cluster.primary_keyword,
            target_audience: &cluster.target_audience,
            category: cluster.category.as_deref(),
        };
        let payload = self
            .generator
            .generate(&self.system_prompt, &user_prompt(&request), &self.schema)
            .await?;
        let generated = validate_payload(payload)?;
        self.persist(cluster, slot, generated)
    }

    fn persist(
        &self,
        cluster: &ClusterJob,
        slot: &PlanSlot<'_>,
        generated: GeneratedArticle,
    ) -> Result<ItemOutcome, PipelineError> {
        let GeneratedArticle {
            title,
            slug: suggested_slug,
            content,
            excerpt,
            meta_description,
            tags,
            faqs,
        } = generated;

        let token = slug_token(Utc::now());
        let base_slug = unique_slug(&suggested_slug, &token);
        let minutes = reading_time(&content);
        let mut article = NewArticle {
            group_id: cluster.id.clone(),
            stage: slot.stage,
            title,
            slug: base_slug.clone(),
            content,
            excerpt,
            meta_description,
            tags,
            category: cluster.category.clone(),
            reading_time: minutes,
        };

        let mut attempt = 1;
        let article_id = loop {
            let inserted = if self.content.slug_exists(&article.slug)? {
                Err(StorageError::SlugTaken(article.slug.clone()))
            } else {
                self.content.insert_article(article.clone())
            };
            match inserted {
                Ok(id) => break id,
                Err(StorageError::SlugTaken(taken)) if attempt < MAX_SLUG_ATTEMPTS => {
                    debug!(slug = %taken, attempt, "slug collision, retrying with suffix");
                    attempt += 1;
                    article.slug = format!("{}-{}", base_slug, attempt);
                }
                Err(err) => return Err(err.into()),
            }
        };

        let faq_ids = match self.persist_faqs(cluster, &article_id, faqs) {
            Ok(ids) => ids,
            Err(err) => {
                // Leave nothing behind for a slot that reports failure.
                if let Err(cleanup) = self.content.delete_article(&article_id) {
                    warn!(
                        article_id = %article_id,
                        error = %cleanup,
                        "failed to remove article after FAQ write failure"
                    );
                }
                return Err(err.into());
            }
        };

        Ok(ItemOutcome {
            article_id,
            slug: article.slug,
            faq_ids,
        })
    }

    fn persist_faqs(
        &self,
        cluster: &ClusterJob,
        article_id: &str,
        faqs: Vec<GeneratedFaq>,
    ) -> Result<Vec<String>, StorageError> {
        faqs.into_iter()
            .enumerate()
            .map(|(position, faq)| {
                self.content.insert_faq(NewFaq {
                    group_id: cluster.id.clone(),
                    article_id: article_id.to_string(),
                    question: faq.question,
                    answer: faq.answer,
                    position,
                })
            })
            .collect()
    }
}
