//! Shared test utilities for integration tests
//!
//! Provides XDG environment isolation, temporary sled-backed stores and a scripted
//! content generator.

use async_trait::async_trait;
use clusterwright::cluster::{NewCluster, StagePlan};
use clusterwright::content::{Article, ArticleStatus, Faq, NewArticle, NewFaq};
use clusterwright::error::{GeneratorError, StorageError};
use clusterwright::provider::ContentGenerator;
use clusterwright::store::{
    open_database, ContentItemStore, SledClusterStore, SledContentStore, SledSettingsStore,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// Global mutex to serialize XDG environment variable access across all tests
static XDG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
    env_name: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
            env_name: std::env::var("CLUSTERWRIGHT_ENV").ok(),
        }
    }

    fn restore(self) {
        restore_var("HOME", self.home);
        restore_var("XDG_CONFIG_HOME", self.xdg_config_home);
        restore_var("CLUSTERWRIGHT_ENV", self.env_name);
    }
}

fn restore_var(name: &str, value: Option<String>) {
    match value {
        Some(v) => std::env::set_var(name, v),
        None => std::env::remove_var(name),
    }
}

/// Run `f` with XDG_CONFIG_HOME and HOME pointing into `test_dir`.
///
/// The global config file therefore lives at `<test_dir>/clusterwright/config.toml`.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path().to_str().unwrap());
    std::env::remove_var("CLUSTERWRIGHT_ENV");

    let result = f();

    env_state.restore();

    result
}

/// All three stores over one temporary database.
pub struct TestStores {
    pub dir: TempDir,
    pub clusters: Arc<SledClusterStore>,
    pub content: Arc<SledContentStore>,
    pub settings: Arc<SledSettingsStore>,
}

pub fn open_stores() -> TestStores {
    let dir = TempDir::new().unwrap();
    let db = open_database(dir.path().join("store")).unwrap();
    TestStores {
        clusters: Arc::new(SledClusterStore::new(&db).unwrap()),
        content: Arc::new(SledContentStore::new(&db).unwrap()),
        settings: Arc::new(SledSettingsStore::new(&db).unwrap()),
        dir,
    }
}

pub fn cluster_request(id: &str) -> NewCluster {
    NewCluster {
        id: id.to_string(),
        topic: "Rainwater harvesting".to_string(),
        primary_keyword: "rainwater harvesting system".to_string(),
        target_audience: "homeowners".to_string(),
        category: Some("Water".to_string()),
        stage_plan: StagePlan::funnel(),
    }
}

/// Generator that fails for scripted slots and records what it was asked for.
pub struct ScriptedGenerator {
    failing: Mutex<Vec<usize>>,
    pub calls: Mutex<Vec<usize>>,
    pub system_prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn failing_on(slots: &[usize]) -> Arc<Self> {
        Arc::new(Self {
            failing: Mutex::new(slots.to_vec()),
            calls: Mutex::new(Vec::new()),
            system_prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn succeed_from_now_on(&self) {
        self.failing.lock().clear();
    }
}

fn slot_of(user_prompt: &str) -> usize {
    (1..=64)
        .find(|n| user_prompt.contains(&format!("Write article {} of", n)))
        .unwrap_or(0)
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        _schema: &Value,
    ) -> Result<Value, GeneratorError> {
        let slot = slot_of(user_prompt);
        self.calls.lock().push(slot);
        self.system_prompts.lock().push(system_prompt.to_string());
        if self.failing.lock().contains(&slot) {
            return Err(GeneratorError::QuotaExhausted("out of credits".to_string()));
        }
        Ok(json!({
            "title": format!("Rainwater article {}", slot),
            "slug": "rainwater-harvesting",
            "content": vec!["water"; 400].join(" "),
            "excerpt": "Collect and reuse rainwater.",
            "metaDescription": "A practical guide to rainwater harvesting.",
            "tags": ["rainwater", "Water Saving"],
            "faqs": [
                {"question": "Is it legal?", "answer": "Usually, check local rules."},
                {"question": "What does it cost?", "answer": "It depends on tank size."}
            ]
        }))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Content store whose first `failures` FAQ inserts fail with an I/O error.
pub struct FaqFailingStore {
    pub inner: Arc<SledContentStore>,
    failures: Mutex<usize>,
}

impl FaqFailingStore {
    pub fn new(inner: Arc<SledContentStore>, failures: usize) -> Arc<Self> {
        Arc::new(Self {
            inner,
            failures: Mutex::new(failures),
        })
    }
}

impl ContentItemStore for FaqFailingStore {
    fn insert_article(&self, article: NewArticle) -> Result<String, StorageError> {
        self.inner.insert_article(article)
    }

    fn insert_faq(&self, faq: NewFaq) -> Result<String, StorageError> {
        let mut remaining = self.failures.lock();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "faq tree unavailable",
            )));
        }
        self.inner.insert_faq(faq)
    }

    fn slug_exists(&self, slug: &str) -> Result<bool, StorageError> {
        self.inner.slug_exists(slug)
    }

    fn delete_article(&self, article_id: &str) -> Result<(), StorageError> {
        self.inner.delete_article(article_id)
    }

    fn get_article(&self, article_id: &str) -> Result<Option<Article>, StorageError> {
        self.inner.get_article(article_id)
    }

    fn list_articles(&self, group_id: Option<&str>) -> Result<Vec<Article>, StorageError> {
        self.inner.list_articles(group_id)
    }

    fn faqs_for(&self, article_id: &str) -> Result<Vec<Faq>, StorageError> {
        self.inner.faqs_for(article_id)
    }

    fn set_article_status(
        &self,
        article_id: &str,
        status: ArticleStatus,
    ) -> Result<Article, StorageError> {
        self.inner.set_article_status(article_id, status)
    }
}
