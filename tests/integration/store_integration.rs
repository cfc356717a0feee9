//! Integration tests for the sled-backed stores sharing one database

use crate::integration::test_utils::{cluster_request, open_stores};
use clusterwright::cluster::{ClusterJob, ClusterPatch, ClusterStatus, FunnelStage, ItemStatus, ProgressMap};
use clusterwright::content::{ArticleStatus, NewArticle};
use clusterwright::error::StorageError;
use clusterwright::settings::{SettingsProvider, StyleSettings};
use clusterwright::store::{
    open_database, ContentItemStore, ProgressStore, SledClusterStore, SledContentStore,
};
use tempfile::TempDir;

fn new_article(group: &str, slug: &str) -> NewArticle {
    NewArticle {
        group_id: group.to_string(),
        stage: FunnelStage::Mofu,
        title: "Comparing tanks".to_string(),
        slug: slug.to_string(),
        content: "body".to_string(),
        excerpt: "excerpt".to_string(),
        meta_description: "meta".to_string(),
        tags: vec!["tanks".to_string()],
        category: None,
        reading_time: 1,
    }
}

#[test]
fn test_cluster_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store");
    {
        let db = open_database(&path).unwrap();
        let clusters = SledClusterStore::new(&db).unwrap();
        clusters
            .create(&ClusterJob::from_request(cluster_request("c1")).unwrap())
            .unwrap();
        clusters.begin("c1", ClusterStatus::Draft).unwrap();
        let mut progress = ProgressMap::new();
        progress.insert("article_1".to_string(), ItemStatus::Complete);
        progress.insert("article_2".to_string(), ItemStatus::Generating);
        clusters.write("c1", &ClusterPatch::progress(&progress)).unwrap();
    }

    let db = open_database(&path).unwrap();
    let clusters = SledClusterStore::new(&db).unwrap();
    let job = clusters.read("c1").unwrap();
    assert_eq!(job.status, ClusterStatus::Generating);
    let keys: Vec<&str> = job.progress.keys().map(String::as_str).collect();
    assert_eq!(keys, ["article_1", "article_2"]);
}

#[test]
fn test_slug_reservation_is_global() {
    let stores = open_stores();
    stores
        .content
        .insert_article(new_article("cluster-a", "rain-tanks-abc"))
        .unwrap();
    let err = stores
        .content
        .insert_article(new_article("cluster-b", "rain-tanks-abc"))
        .unwrap_err();
    assert!(matches!(err, StorageError::SlugTaken(slug) if slug == "rain-tanks-abc"));
    assert!(stores.content.slug_exists("rain-tanks-abc").unwrap());
}

#[test]
fn test_publish_changes_listing_status() {
    let stores = open_stores();
    let id = stores
        .content
        .insert_article(new_article("cluster-a", "one"))
        .unwrap();
    stores
        .content
        .set_article_status(&id, ArticleStatus::Published)
        .unwrap();
    let listed = stores.content.list_articles(None).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, ArticleStatus::Published);
}

#[test]
fn test_settings_default_then_persisted() {
    let stores = open_stores();
    assert_eq!(stores.settings.load().unwrap(), StyleSettings::default());

    let mut settings = stores.settings.load().unwrap();
    settings.authority_block = "Licensed plumbers since 1998".to_string();
    stores.settings.put(&settings).unwrap();
    assert_eq!(
        stores.settings.load().unwrap().authority_block,
        "Licensed plumbers since 1998"
    );
}

#[test]
fn test_content_store_on_shared_db_sees_other_trees_untouched() {
    let dir = TempDir::new().unwrap();
    let db = open_database(dir.path()).unwrap();
    let clusters = SledClusterStore::new(&db).unwrap();
    let content = SledContentStore::new(&db).unwrap();
    clusters
        .create(&ClusterJob::from_request(cluster_request("c1")).unwrap())
        .unwrap();
    content.insert_article(new_article("c1", "slug")).unwrap();

    assert_eq!(clusters.list().unwrap().len(), 1);
    assert_eq!(content.list_articles(Some("c1")).unwrap().len(), 1);
}
