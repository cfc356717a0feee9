//! End-to-end batch generation over real sled stores

use crate::integration::test_utils::{
    cluster_request, open_stores, FaqFailingStore, ScriptedGenerator,
};
use clusterwright::cluster::{ClusterStatus, ItemStatus, StagePlan};
use clusterwright::error::ApiError;
use clusterwright::generation::ClusterService;
use clusterwright::settings::SettingsUpdate;
use clusterwright::store::{ContentItemStore, ProgressStore};
use std::collections::HashSet;
use std::time::Duration;

fn service(
    stores: &crate::integration::test_utils::TestStores,
    generator: std::sync::Arc<ScriptedGenerator>,
) -> ClusterService {
    ClusterService::new(
        stores.clusters.clone(),
        stores.content.clone(),
        stores.settings.clone(),
        generator,
    )
    .with_pacing_delay(Duration::ZERO)
}

#[tokio::test]
async fn test_full_batch_persists_articles_and_faqs() {
    let stores = open_stores();
    let generator = ScriptedGenerator::failing_on(&[]);
    let service = service(&stores, generator.clone());
    service.create_cluster(cluster_request("rain")).unwrap();

    let outcome = service.start_generation("rain").await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.status, ClusterStatus::Complete);
    let keys: Vec<String> = outcome.progress.keys().cloned().collect();
    let expected: Vec<String> = (1..=6).map(|n| format!("article_{}", n)).collect();
    assert_eq!(keys, expected);

    let articles = stores.content.list_articles(Some("rain")).unwrap();
    assert_eq!(articles.len(), 6);
    let slugs: HashSet<&str> = articles.iter().map(|a| a.slug.as_str()).collect();
    assert_eq!(slugs.len(), 6, "identical suggested slugs must end up distinct");
    assert!(articles.iter().all(|a| a.reading_time == 2));
    assert!(articles.iter().all(|a| a.category.as_deref() == Some("Water")));

    let stages: Vec<String> = outcome
        .articles
        .values()
        .map(|id| {
            stores
                .content
                .get_article(id)
                .unwrap()
                .unwrap()
                .stage
                .to_string()
        })
        .collect();
    assert_eq!(stages, ["TOFU", "TOFU", "TOFU", "MOFU", "MOFU", "BOFU"]);

    for article in &articles {
        let faqs = stores.content.faqs_for(&article.id).unwrap();
        assert_eq!(faqs.len(), 2);
        assert!(faqs.iter().all(|f| f.group_id == "rain" && f.article_id == article.id));
    }
}

#[tokio::test]
async fn test_partial_failure_then_retry_completes_cluster() {
    let stores = open_stores();
    let generator = ScriptedGenerator::failing_on(&[3, 6]);
    let service = service(&stores, generator.clone());
    service.create_cluster(cluster_request("rain")).unwrap();

    let first = service.start_generation("rain").await.unwrap();
    assert!(!first.success);
    assert_eq!(first.status, ClusterStatus::Error);
    assert_eq!(first.progress.len(), 6);
    assert_eq!(first.progress["article_3"], ItemStatus::Error);
    assert_eq!(first.progress["article_6"], ItemStatus::Error);
    assert_eq!(first.failures.len(), 2);
    assert_eq!(first.failures["article_3"].kind, "generator");

    let stored = stores.clusters.read("rain").unwrap();
    assert_eq!(stored.status, ClusterStatus::Error);
    assert_eq!(stored.failed_keys(), vec!["article_3", "article_6"]);

    generator.succeed_from_now_on();
    let retried = service.retry_failed("rain").await.unwrap();
    assert!(retried.success);
    assert_eq!(retried.status, ClusterStatus::Complete);
    assert!(retried.failures.is_empty());
    assert_eq!(retried.articles.len(), 2);
    assert_eq!(*generator.calls.lock(), vec![1, 2, 3, 4, 5, 6, 3, 6]);

    let stored = stores.clusters.read("rain").unwrap();
    assert_eq!(stored.status, ClusterStatus::Complete);
    assert!(stored.item_errors.is_empty());
    let order: Vec<&str> = stored.progress.keys().map(String::as_str).collect();
    assert_eq!(
        order,
        ["article_1", "article_2", "article_3", "article_4", "article_5", "article_6"]
    );
    assert_eq!(stores.content.list_articles(Some("rain")).unwrap().len(), 6);
}

#[tokio::test]
async fn test_stored_settings_are_injected_into_prompts() {
    let stores = open_stores();
    stores
        .settings
        .update(SettingsUpdate {
            brand_voice: Some("Plain-spoken and practical".to_string()),
            site_name: Some("Rain Co".to_string()),
            ..SettingsUpdate::default()
        })
        .unwrap();
    let generator = ScriptedGenerator::failing_on(&[]);
    let service = service(&stores, generator.clone());
    service.create_cluster(cluster_request("rain")).unwrap();
    service.start_generation("rain").await.unwrap();

    let prompts = generator.system_prompts.lock();
    assert_eq!(prompts.len(), 6);
    assert!(prompts
        .iter()
        .all(|p| p.contains("Plain-spoken and practical") && p.contains("Rain Co")));
}

#[tokio::test]
async fn test_second_start_is_rejected_while_generating() {
    let stores = open_stores();
    let service = service(&stores, ScriptedGenerator::failing_on(&[]));
    service.create_cluster(cluster_request("rain")).unwrap();

    // Claim the cluster as another batch would.
    stores.clusters.begin("rain", ClusterStatus::Draft).unwrap();

    let err = service.start_generation("rain").await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::ClusterNotStartable {
            status: ClusterStatus::Generating,
            ..
        }
    ));
}

#[tokio::test]
async fn test_custom_plan_sizes_progress_map() {
    let stores = open_stores();
    let service = service(&stores, ScriptedGenerator::failing_on(&[]));
    let mut request = cluster_request("small");
    request.stage_plan = StagePlan {
        stages: vec![StagePlan::funnel().stages[2].clone()],
    };
    service.create_cluster(request).unwrap();

    let outcome = service.start_generation("small").await.unwrap();
    assert_eq!(outcome.progress.len(), 1);
    assert!(outcome.success);
}

#[tokio::test]
async fn test_faq_write_failure_leaves_no_article_and_retry_fills_the_slot() {
    let stores = open_stores();
    let content = FaqFailingStore::new(stores.content.clone(), 1);
    let service = ClusterService::new(
        stores.clusters.clone(),
        content,
        stores.settings.clone(),
        ScriptedGenerator::failing_on(&[]),
    )
    .with_pacing_delay(Duration::ZERO);
    service.create_cluster(cluster_request("rain")).unwrap();

    let first = service.start_generation("rain").await.unwrap();
    assert_eq!(first.status, ClusterStatus::Error);
    assert_eq!(first.progress["article_1"], ItemStatus::Error);
    assert_eq!(first.failures["article_1"].kind, "persistence");
    assert_eq!(stores.content.list_articles(Some("rain")).unwrap().len(), 5);

    let retried = service.retry_failed("rain").await.unwrap();
    assert!(retried.success);

    let articles = stores.content.list_articles(Some("rain")).unwrap();
    assert_eq!(articles.len(), 6);
    for article in &articles {
        assert_eq!(stores.content.faqs_for(&article.id).unwrap().len(), 2);
    }
    let stages: Vec<String> = articles.iter().map(|a| a.stage.to_string()).collect();
    assert_eq!(stages.iter().filter(|s| *s == "TOFU").count(), 3);
}
