//! Content records produced by cluster generation, plus slug and reading-time helpers.

use crate::cluster::FunnelStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    Published,
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleStatus::Draft => f.write_str("draft"),
            ArticleStatus::Published => f.write_str("published"),
        }
    }
}

/// A stored article. `group_id` points back at the owning cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub group_id: String,
    pub stage: FunnelStage,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub meta_description: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub reading_time: usize,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
}

/// Article fields before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub group_id: String,
    pub stage: FunnelStage,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub meta_description: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub reading_time: usize,
}

/// A stored FAQ pair, independent of its parent article record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    pub id: String,
    pub group_id: String,
    pub article_id: String,
    pub question: String,
    pub answer: String,
    pub position: usize,
}

#[derive(Debug, Clone)]
pub struct NewFaq {
    pub group_id: String,
    pub article_id: String,
    pub question: String,
    pub answer: String,
    pub position: usize,
}

/// Lowercase ASCII slug: accents folded, runs of anything else collapsed to one hyphen.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.nfkd() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_ascii() || ch.is_whitespace() {
            pending_hyphen = true;
        }
        // Other non-ASCII chars (combining marks, non-Latin scripts) are dropped.
    }
    slug
}

/// Uniqueness token derived from a creation timestamp (base-36 milliseconds).
pub fn slug_token(at: DateTime<Utc>) -> String {
    let mut millis = at.timestamp_millis().max(0) as u64;
    if millis == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while millis > 0 {
        let digit = (millis % 36) as u32;
        digits.push(std::char::from_digit(digit, 36).unwrap_or('0'));
        millis /= 36;
    }
    digits.iter().rev().collect()
}

pub fn unique_slug(base: &str, token: &str) -> String {
    let slug = slugify(base);
    if slug.is_empty() {
        format!("article-{}", token)
    } else {
        format!("{}-{}", slug, token)
    }
}

/// Minutes to read `body`, rounded up, never less than one.
pub fn reading_time(body: &str) -> usize {
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}
