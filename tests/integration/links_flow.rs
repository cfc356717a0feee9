//! Link suggestions over a generated and partly published cluster

use crate::integration::test_utils::{cluster_request, open_stores, ScriptedGenerator};
use clusterwright::content::ArticleStatus;
use clusterwright::error::ApiError;
use clusterwright::generation::ClusterService;
use clusterwright::links::{suggest_for_article, MAX_SUGGESTIONS};
use clusterwright::store::ContentItemStore;
use std::time::Duration;

#[tokio::test]
async fn test_suggestions_come_from_published_articles_only() {
    let stores = open_stores();
    let service = ClusterService::new(
        stores.clusters.clone(),
        stores.content.clone(),
        stores.settings.clone(),
        ScriptedGenerator::failing_on(&[]),
    )
    .with_pacing_delay(Duration::ZERO);
    service.create_cluster(cluster_request("rain")).unwrap();
    let outcome = service.start_generation("rain").await.unwrap();

    let ids: Vec<String> = outcome.articles.values().cloned().collect();
    // Publish everything except article_1 and article_6.
    for id in &ids[1..5] {
        stores
            .content
            .set_article_status(id, ArticleStatus::Published)
            .unwrap();
    }

    let suggestions = suggest_for_article(stores.content.as_ref(), &ids[0]).unwrap();
    assert_eq!(suggestions.len(), 4);
    assert!(suggestions.iter().all(|s| s.candidate.id != ids[0]));
    assert!(suggestions.iter().all(|s| s.candidate.id != ids[5]));

    // Same category and two shared tags everywhere; TOFU -> MOFU earns the bonus.
    let top = &suggestions[0];
    assert_eq!(top.score, 50 + 2 * 15 + 30);
    let mofu = [ids[3].as_str(), ids[4].as_str()];
    assert!(mofu.contains(&top.candidate.id.as_str()));
    assert!(suggestions.len() <= MAX_SUGGESTIONS);
}

#[test]
fn test_unknown_article_is_not_found() {
    let stores = open_stores();
    let err = suggest_for_article(stores.content.as_ref(), "missing").unwrap_err();
    assert!(matches!(err, ApiError::ArticleNotFound(id) if id == "missing"));
}
