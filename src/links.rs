//! Internal-link suggestions: additive relevance scoring over published articles.

use crate::cluster::FunnelStage;
use crate::content::{Article, ArticleStatus};
use crate::error::ApiError;
use crate::store::ContentItemStore;
use serde::Serialize;
use std::collections::HashSet;

pub const MAX_SUGGESTIONS: usize = 5;

const CATEGORY_SCORE: u32 = 50;
const TAG_SCORE: u32 = 15;

/// The fields the scorer looks at.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LinkCandidate {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub stage: Option<FunnelStage>,
}

impl From<&Article> for LinkCandidate {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            slug: article.slug.clone(),
            category: article.category.clone(),
            tags: article.tags.clone(),
            stage: Some(article.stage),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LinkSuggestion {
    pub candidate: LinkCandidate,
    pub score: u32,
}

/// Bonus for linking from `from` to `to` along the funnel.
pub fn stage_transition_bonus(from: FunnelStage, to: FunnelStage) -> u32 {
    match (from, to) {
        (FunnelStage::Tofu, FunnelStage::Mofu) => 30,
        (FunnelStage::Mofu, FunnelStage::Bofu) => 35,
        (FunnelStage::Mofu, FunnelStage::Tofu) => 25,
        (FunnelStage::Bofu, FunnelStage::Mofu) => 30,
        _ => 0,
    }
}

pub fn score(current: &LinkCandidate, candidate: &LinkCandidate) -> u32 {
    let mut total = 0;

    if let (Some(a), Some(b)) = (&current.category, &candidate.category) {
        if a == b {
            total += CATEGORY_SCORE;
        }
    }

    let current_tags: HashSet<String> = current.tags.iter().map(|t| t.to_lowercase()).collect();
    let candidate_tags: HashSet<String> =
        candidate.tags.iter().map(|t| t.to_lowercase()).collect();
    let overlap = candidate_tags.intersection(&current_tags).count() as u32;
    total += overlap * TAG_SCORE;

    if let (Some(from), Some(to)) = (current.stage, candidate.stage) {
        total += stage_transition_bonus(from, to);
    }

    total
}

/// Top [`MAX_SUGGESTIONS`] candidates by descending score. Equal scores keep
/// their order in `candidates`; the current item itself is never suggested.
pub fn suggest_links(current: &LinkCandidate, candidates: &[LinkCandidate]) -> Vec<LinkSuggestion> {
    let mut scored: Vec<LinkSuggestion> = candidates
        .iter()
        .filter(|c| current.id.is_empty() || c.id != current.id)
        .map(|c| LinkSuggestion {
            score: score(current, c),
            candidate: c.clone(),
        })
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(MAX_SUGGESTIONS);
    scored
}

/// Suggestions for a stored article drawn from published articles, newest first.
pub fn suggest_for_article(
    store: &dyn ContentItemStore,
    article_id: &str,
) -> Result<Vec<LinkSuggestion>, ApiError> {
    let article = store
        .get_article(article_id)?
        .ok_or_else(|| ApiError::ArticleNotFound(article_id.to_string()))?;

    let mut published: Vec<Article> = store
        .list_articles(None)?
        .into_iter()
        .filter(|a| a.status == ArticleStatus::Published)
        .collect();
    published.reverse();
    let candidates: Vec<LinkCandidate> = published.iter().map(LinkCandidate::from).collect();

    Ok(suggest_links(&LinkCandidate::from(&article), &candidates))
}
