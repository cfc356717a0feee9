//! Property-based tests for determinism guarantees

use clusterwright::cluster::{
    final_status, item_key, ClusterStatus, FunnelStage, ItemStatus, ProgressMap, StageDescriptor,
    StagePlan,
};
use clusterwright::content::{reading_time, slugify, unique_slug};
use clusterwright::links::{score, suggest_links, LinkCandidate, MAX_SUGGESTIONS};
use proptest::prelude::*;

fn stage_strategy() -> impl Strategy<Value = FunnelStage> {
    prop_oneof![
        Just(FunnelStage::Tofu),
        Just(FunnelStage::Mofu),
        Just(FunnelStage::Bofu)
    ]
}

fn plan_strategy() -> impl Strategy<Value = StagePlan> {
    prop::collection::vec((stage_strategy(), 1usize..6), 1..5).prop_map(|stages| StagePlan {
        stages: stages
            .into_iter()
            .map(|(stage, count)| StageDescriptor {
                stage,
                count,
                description: format!("{} content", stage),
            })
            .collect(),
    })
}

fn candidate_strategy() -> impl Strategy<Value = LinkCandidate> {
    (
        "[a-z0-9]{1,8}",
        prop::option::of(prop_oneof![Just("A".to_string()), Just("B".to_string())]),
        prop::collection::vec("[a-zA-Z]{1,4}", 0..4),
        prop::option::of(stage_strategy()),
    )
        .prop_map(|(id, category, tags, stage)| LinkCandidate {
            title: id.clone(),
            slug: id.clone(),
            id,
            category,
            tags,
            stage,
        })
}

/// Slot keys are article_1..article_n in attempt order, whatever the plan shape
#[test]
fn test_slot_keys_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&plan_strategy(), |plan| {
            let keys: Vec<String> = plan.slots().map(|slot| slot.key).collect();
            let expected: Vec<String> = (1..=plan.total_items()).map(item_key).collect();
            prop_assert_eq!(keys, expected);

            // Stages appear in plan order, each repeated `count` times
            let stages: Vec<FunnelStage> = plan.slots().map(|slot| slot.stage).collect();
            let expanded: Vec<FunnelStage> = plan
                .stages
                .iter()
                .flat_map(|d| std::iter::repeat(d.stage).take(d.count))
                .collect();
            prop_assert_eq!(stages, expanded);
            Ok(())
        })
        .unwrap();
}

/// Any error in a fully attempted map makes the cluster status error
#[test]
fn test_final_status_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(any::<bool>(), 1..12), |outcomes| {
            let mut progress = ProgressMap::new();
            for (i, ok) in outcomes.iter().enumerate() {
                let status = if *ok {
                    ItemStatus::Complete
                } else {
                    ItemStatus::Error
                };
                progress.insert(item_key(i + 1), status);
            }
            let expected = if outcomes.iter().all(|ok| *ok) {
                ClusterStatus::Complete
            } else {
                ClusterStatus::Error
            };
            prop_assert_eq!(final_status(&progress), expected);
            Ok(())
        })
        .unwrap();
}

/// Slugs only ever contain lowercase ASCII alphanumerics and single inner hyphens
#[test]
fn test_slug_charset_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(any::<String>(), "[0-9a-z]{1,9}"), |(title, token)| {
            let slug = slugify(&title);
            prop_assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));

            let unique = unique_slug(&title, &token);
            let expected_suffix = format!("-{}", token);
            prop_assert!(unique.ends_with(&expected_suffix));
            prop_assert_eq!(slugify(&slug), slug);
            Ok(())
        })
        .unwrap();
}

/// Reading time is at least one minute and never decreases with more words
#[test]
fn test_reading_time_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(0usize..2000, 0usize..500), |(words, extra)| {
            let short = vec!["word"; words].join(" ");
            let long = vec!["word"; words + extra].join(" ");
            prop_assert!(reading_time(&short) >= 1);
            prop_assert!(reading_time(&long) >= reading_time(&short));
            Ok(())
        })
        .unwrap();
}

/// Ranking is deterministic, capped, sorted and never suggests the current item
#[test]
fn test_link_ranking_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                candidate_strategy(),
                prop::collection::vec(candidate_strategy(), 0..12),
            ),
            |(current, pool)| {
                let first = suggest_links(&current, &pool);
                let second = suggest_links(&current, &pool);
                prop_assert_eq!(&first, &second);

                prop_assert!(first.len() <= MAX_SUGGESTIONS);
                prop_assert!(first.iter().all(|s| s.candidate.id != current.id));
                prop_assert!(first.windows(2).all(|w| w[0].score >= w[1].score));
                for suggestion in &first {
                    prop_assert_eq!(suggestion.score, score(&current, &suggestion.candidate));
                }
                Ok(())
            },
        )
        .unwrap();
}
