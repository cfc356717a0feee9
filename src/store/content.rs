//! Article and FAQ records with a global slug index.

use crate::content::{Article, ArticleStatus, Faq, NewArticle, NewFaq};
use crate::error::StorageError;
use crate::store::{to_storage_data, to_storage_io};
use chrono::Utc;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, Transactional, Tree};
use std::io;
use uuid::Uuid;

const TREE_ARTICLES: &str = "articles";
const TREE_SLUGS: &str = "article_slugs";
const TREE_FAQS: &str = "faqs";

/// Content item persistence. Slugs are unique across the whole store.
pub trait ContentItemStore: Send + Sync {
    /// Insert an article and return its id. Fails with `SlugTaken` if the slug is in use.
    fn insert_article(&self, article: NewArticle) -> Result<String, StorageError>;

    fn insert_faq(&self, faq: NewFaq) -> Result<String, StorageError>;

    /// Whether `slug` is already reserved by some article.
    fn slug_exists(&self, slug: &str) -> Result<bool, StorageError>;

    /// Remove an article together with its slug reservation and FAQs.
    fn delete_article(&self, article_id: &str) -> Result<(), StorageError>;

    fn get_article(&self, article_id: &str) -> Result<Option<Article>, StorageError>;

    /// Articles in creation order, optionally limited to one cluster.
    fn list_articles(&self, group_id: Option<&str>) -> Result<Vec<Article>, StorageError>;

    fn faqs_for(&self, article_id: &str) -> Result<Vec<Faq>, StorageError>;

    fn set_article_status(
        &self,
        article_id: &str,
        status: ArticleStatus,
    ) -> Result<Article, StorageError>;
}

#[derive(Clone)]
pub struct SledContentStore {
    db: Db,
    articles: Tree,
    slugs: Tree,
    faqs: Tree,
}

impl SledContentStore {
    pub fn new(db: &Db) -> Result<Self, StorageError> {
        let articles = db.open_tree(TREE_ARTICLES).map_err(to_storage_io)?;
        let slugs = db.open_tree(TREE_SLUGS).map_err(to_storage_io)?;
        let faqs = db.open_tree(TREE_FAQS).map_err(to_storage_io)?;
        Ok(Self {
            db: db.clone(),
            articles,
            slugs,
            faqs,
        })
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush().map_err(to_storage_io)?;
        Ok(())
    }

    fn put_article(&self, article: &Article) -> Result<(), StorageError> {
        let value = serde_json::to_vec(article).map_err(to_storage_data)?;
        self.articles
            .insert(article.id.as_bytes(), value)
            .map_err(to_storage_io)?;
        Ok(())
    }
}

fn faq_prefix(article_id: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(article_id.len() + 1);
    prefix.extend_from_slice(article_id.as_bytes());
    prefix.push(b':');
    prefix
}

/// `<article_id>:<position as big-endian u64>`, so keys sort by numeric position.
fn encode_faq_key(article_id: &str, position: usize) -> Vec<u8> {
    let mut key = faq_prefix(article_id);
    key.extend_from_slice(&(position as u64).to_be_bytes());
    key
}

impl ContentItemStore for SledContentStore {
    fn insert_article(&self, new: NewArticle) -> Result<String, StorageError> {
        let id = Uuid::new_v4().to_string();
        let reserved = self
            .slugs
            .compare_and_swap(
                new.slug.as_bytes(),
                None as Option<&[u8]>,
                Some(id.as_bytes()),
            )
            .map_err(to_storage_io)?;
        if reserved.is_err() {
            return Err(StorageError::SlugTaken(new.slug));
        }

        let article = Article {
            id: id.clone(),
            group_id: new.group_id,
            stage: new.stage,
            title: new.title,
            slug: new.slug,
            content: new.content,
            excerpt: new.excerpt,
            meta_description: new.meta_description,
            tags: new.tags,
            category: new.category,
            reading_time: new.reading_time,
            status: ArticleStatus::Draft,
            created_at: Utc::now(),
        };
        if let Err(err) = self.put_article(&article) {
            // Release the slug so a retry can claim it.
            let _ = self.slugs.remove(article.slug.as_bytes());
            return Err(err);
        }
        self.flush()?;
        Ok(id)
    }

    fn insert_faq(&self, new: NewFaq) -> Result<String, StorageError> {
        let faq = Faq {
            id: Uuid::new_v4().to_string(),
            group_id: new.group_id,
            article_id: new.article_id,
            question: new.question,
            answer: new.answer,
            position: new.position,
        };
        let key = encode_faq_key(&faq.article_id, faq.position);
        let value = serde_json::to_vec(&faq).map_err(to_storage_data)?;
        self.faqs.insert(key, value).map_err(to_storage_io)?;
        self.flush()?;
        Ok(faq.id)
    }

    fn slug_exists(&self, slug: &str) -> Result<bool, StorageError> {
        self.slugs
            .contains_key(slug.as_bytes())
            .map_err(to_storage_io)
    }

    fn delete_article(&self, article_id: &str) -> Result<(), StorageError> {
        let article = self
            .get_article(article_id)?
            .ok_or_else(|| StorageError::NotFound(format!("article {}", article_id)))?;
        let faq_keys = self
            .faqs
            .scan_prefix(faq_prefix(article_id))
            .keys()
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_storage_io)?;

        (&self.articles, &self.slugs, &self.faqs)
            .transaction(|(articles, slugs, faqs)| {
                articles.remove(article_id.as_bytes())?;
                slugs.remove(article.slug.as_bytes())?;
                for key in &faq_keys {
                    faqs.remove(key.clone())?;
                }
                Ok::<(), ConflictableTransactionError<()>>(())
            })
            .map_err(|err: TransactionError<()>| match err {
                TransactionError::Storage(e) => to_storage_io(e),
                TransactionError::Abort(()) => StorageError::IoError(io::Error::new(
                    io::ErrorKind::Other,
                    format!("delete of article {} aborted", article_id),
                )),
            })?;
        self.flush()
    }

    fn get_article(&self, article_id: &str) -> Result<Option<Article>, StorageError> {
        let Some(raw) = self
            .articles
            .get(article_id.as_bytes())
            .map_err(to_storage_io)?
        else {
            return Ok(None);
        };
        let parsed = serde_json::from_slice(&raw).map_err(to_storage_data)?;
        Ok(Some(parsed))
    }

    fn list_articles(&self, group_id: Option<&str>) -> Result<Vec<Article>, StorageError> {
        let mut out = Vec::new();
        for result in self.articles.iter() {
            let (_, value) = result.map_err(to_storage_io)?;
            let article: Article = serde_json::from_slice(&value).map_err(to_storage_data)?;
            if group_id.map_or(true, |g| article.group_id == g) {
                out.push(article);
            }
        }
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    fn faqs_for(&self, article_id: &str) -> Result<Vec<Faq>, StorageError> {
        let mut out = Vec::new();
        for result in self.faqs.scan_prefix(faq_prefix(article_id)) {
            let (_, value) = result.map_err(to_storage_io)?;
            out.push(serde_json::from_slice(&value).map_err(to_storage_data)?);
        }
        Ok(out)
    }

    fn set_article_status(
        &self,
        article_id: &str,
        status: ArticleStatus,
    ) -> Result<Article, StorageError> {
        let mut article = self
            .get_article(article_id)?
            .ok_or_else(|| StorageError::NotFound(format!("article {}", article_id)))?;
        article.status = status;
        self.put_article(&article)?;
        self.flush()?;
        Ok(article)
    }
}
